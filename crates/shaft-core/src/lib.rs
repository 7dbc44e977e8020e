//! # Shaft Core
//!
//! Rules engine for a turn-based rock-matching roguelike.
//!
//! The crate decides what happens to the board in response to an action and
//! sequences those decisions so that game logic and animation playback never
//! observe inconsistent state. It does no rendering, input recognition or
//! persistence of its own.
//!
//! ## Architecture
//!
//! - **Board** ([`board`]): an immutable square grid. Rotation, flood-fill
//!   removal with gravity and refill, and combat each return a new board plus a
//!   [`Transformation`] describing the change.
//! - **Generator** ([`generator`]): fills vacated cells from a weighted chance
//!   model under monster and exit caps, drawing from one seedable source.
//! - **Referee** ([`referee`]): a pure function from a settled board to the
//!   single next event (win, loss, attack, death, pickup).
//! - **State machine and queue** ([`state`], [`queue`]): admit, order and
//!   dispatch inputs according to the current phase of play.
//! - **Session** ([`session`]): owns one level's board, generator and queue.
//!
//! ## Usage
//!
//! ```
//! use shaft_core::{Input, InputType, LevelConfig, Session};
//!
//! let mut session = Session::new(LevelConfig::default().with_seed(42)).unwrap();
//! session.tick(); // boardBuilt
//!
//! session.submit(InputType::RotateRight);
//! session.tick(); // rotateRight, computed
//! let dispatched = session.tick().unwrap(); // the transformation
//! if let Some(transformation) = dispatched.input_type.as_transformation() {
//!     // ...play it back, then acknowledge:
//!     session.submit(Input::animations_finished(transformation));
//! }
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

// Primitives
pub mod coord;
pub mod entity;
pub mod tile;

// Board and mutation records
pub mod board;
pub mod transformation;

// Generation
pub mod chance;
pub mod generator;
pub mod rng;

// Rules and sequencing
pub mod input;
pub mod queue;
pub mod referee;
pub mod session;
pub mod state;

// Ambient
pub mod config;
pub mod error;

pub use board::{Board, Rotation};
pub use config::{Difficulty, EntityStatTable, LevelConfig};
pub use coord::{Direction, Directions, TileCoord};
pub use entity::{EntityData, EntityType};
pub use error::{BoardError, ConfigError};
pub use generator::TileGenerator;
pub use input::{Input, InputKind, InputType};
pub use queue::InputQueue;
pub use referee::Referee;
pub use rng::Lcg;
pub use session::{Session, SessionSnapshot};
pub use state::GameState;
pub use tile::{Color, Item, ItemKind, TileType, Tiles};
pub use transformation::{TileTransformation, Transformation};

#[cfg(test)]
mod tests;
