//! A running level: the owner of the board, the generator and the queue.
//!
//! The host submits inputs and calls [`Session::tick`] once per frame. Each
//! tick pops at most one input, performs the work owned by the new state,
//! and returns the input so the host can route it to presentation. Board
//! mutations come back as `transformation` inputs; the host plays them and
//! answers with [`Input::animations_finished`].
//!
//! # Example
//!
//! ```
//! use shaft_core::config::LevelConfig;
//! use shaft_core::input::{Input, InputKind, InputType};
//! use shaft_core::session::Session;
//! use shaft_core::state::GameState;
//!
//! let mut session = Session::new(LevelConfig::default().with_seed(4)).unwrap();
//! assert_eq!(session.tick().map(|i| i.kind()), Some(InputKind::BoardBuilt));
//!
//! session.submit(InputType::RotateLeft);
//! session.tick();
//! assert_eq!(session.state(), GameState::Computing);
//!
//! let transformation = session.tick().unwrap();
//! let transformation = transformation.input_type.as_transformation().unwrap();
//! assert_eq!(session.state(), GameState::Animating);
//!
//! session.submit(Input::animations_finished(transformation));
//! session.tick();
//! assert_eq!(session.state(), GameState::Reffing);
//! ```

use rand::{RngCore, SeedableRng};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use crate::board::Board;
use crate::config::LevelConfig;
use crate::entity::EntityData;
use crate::error::ConfigError;
use crate::generator::TileGenerator;
use crate::input::{Input, InputType};
use crate::queue::InputQueue;
use crate::rng::Lcg;
use crate::state::GameState;
use crate::tile::{TileType, Tiles};
use crate::transformation::Transformation;

/// What an external save collaborator persists between sessions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionSnapshot {
    /// The settled board.
    pub tiles: Tiles,
    /// The player's data.
    pub player: EntityData,
    /// Monsters generated so far in this level.
    #[serde(default)]
    pub spawned_monsters: u32,
}

/// One level in play.
#[derive(Debug)]
pub struct Session<R: RngCore = Lcg> {
    config: LevelConfig,
    board: Board,
    generator: TileGenerator<R>,
    queue: InputQueue,
}

impl Session<Lcg> {
    /// Starts a level with the default random source.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` is invalid or the board cannot
    /// be built.
    pub fn new(config: LevelConfig) -> Result<Self, ConfigError> {
        Self::with_source(config)
    }
}

impl<R: RngCore + SeedableRng> Session<R> {
    /// Starts a level drawing tiles from `R`, seeded from `config.seed`.
    ///
    /// A `boardBuilt` input is queued for the first tick.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` is invalid or the board cannot
    /// be built.
    pub fn with_source(config: LevelConfig) -> Result<Self, ConfigError> {
        let mut generator = TileGenerator::seeded(&config);
        let board = Board::build(&config, &mut generator)?;
        let mut queue = InputQueue::new();
        queue.append(Input::with_tiles(InputType::BoardBuilt, board.tiles().clone()));
        Ok(Self {
            config,
            board,
            generator,
            queue,
        })
    }

    /// Resumes a level from a saved snapshot.
    ///
    /// The snapshot's player data replaces whatever the saved grid holds at
    /// the player's position. Monsters already spawned keep counting toward
    /// the lifetime cap: the generator resumes from the saved count, or from
    /// the monsters on the board if that is higher.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] if `config` is invalid or the snapshot is
    /// not a well-formed board.
    pub fn restore(config: LevelConfig, snapshot: SessionSnapshot) -> Result<Self, ConfigError> {
        config.validate()?;
        let board = Board::new(snapshot.tiles)?;
        let board = Board::new(board.tiles_with(board.player_position(), TileType::Player(snapshot.player)))?;
        let on_board = u32::try_from(board.monsters().count()).unwrap_or(u32::MAX);
        let generator = TileGenerator::seeded(&config)
            .with_spawned_monsters(snapshot.spawned_monsters.max(on_board));
        let mut queue = InputQueue::new();
        queue.append(Input::with_tiles(InputType::BoardBuilt, board.tiles().clone()));
        Ok(Self {
            config,
            board,
            generator,
            queue,
        })
    }

    /// The current board.
    #[must_use]
    pub const fn board(&self) -> &Board {
        &self.board
    }

    /// The current phase.
    #[must_use]
    pub const fn state(&self) -> GameState {
        self.queue.state()
    }

    /// The level being played.
    #[must_use]
    pub const fn config(&self) -> &LevelConfig {
        &self.config
    }

    /// The tile generator.
    #[must_use]
    pub const fn generator(&self) -> &TileGenerator<R> {
        &self.generator
    }

    /// Number of inputs waiting.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.len()
    }

    /// Submits an input from outside the engine.
    ///
    /// Returns `false` if it was dropped, either because the current state
    /// refuses it or because it selects an invalid level.
    pub fn submit(&mut self, input: impl Into<Input>) -> bool {
        let input = input.into();
        if let InputType::SelectLevel(config) = &input.input_type {
            if let Err(err) = config.validate() {
                warn!(%err, "rejected level selection");
                return false;
            }
        }
        self.queue.append(input)
    }

    /// Advances by one input.
    ///
    /// Returns the input that was dispatched, or `None` if the queue was
    /// empty or its head was dropped.
    #[instrument(level = "debug", skip(self), fields(state = %self.queue.state()))]
    pub fn tick(&mut self) -> Option<Input> {
        let previous = self.queue.state();
        let input = self.queue.pop()?;
        match (self.queue.state(), &input.input_type) {
            (GameState::Computing, input_type) => {
                let (board, transformation) = self.board.apply(input_type, &mut self.generator);
                self.board = board;
                self.queue.append(Input::transformation(transformation));
            }
            (GameState::Targeting, input_type @ InputType::ItemUseSelected(_)) => {
                let transformation = Transformation::noop(input_type.clone(), self.board.tiles().clone());
                self.queue.append(Input::transformation(transformation));
            }
            (GameState::Playing, InputType::PlayAgain) => {
                self.rebuild(previous);
            }
            (GameState::Playing, InputType::SelectLevel(config)) => {
                let current = std::mem::replace(&mut self.config, (**config).clone());
                if !self.rebuild(previous) {
                    self.config = current;
                }
            }
            _ => {}
        }
        Some(input)
    }

    /// Ticks until the queue is empty, returning every dispatched input.
    ///
    /// Stops early when the session is waiting on presentation: a pending
    /// transformation is never acknowledged here.
    pub fn drain(&mut self) -> Vec<Input> {
        let mut dispatched = Vec::new();
        while !self.queue.is_empty() {
            if let Some(input) = self.tick() {
                dispatched.push(input);
            }
        }
        dispatched
    }

    /// The state worth persisting, available only while `playing`.
    #[must_use]
    pub fn snapshot(&self) -> Option<SessionSnapshot> {
        (self.state() == GameState::Playing).then(|| SessionSnapshot {
            tiles: self.board.tiles().clone(),
            player: self.board.player().clone(),
            spawned_monsters: self.generator.spawned_monsters(),
        })
    }

    /// Builds a fresh board from the current config and queues `boardBuilt`.
    ///
    /// On failure the board is kept and the queue returns to `previous`, so a
    /// won or lost level stays won or lost. Returns whether the build succeeded.
    fn rebuild(&mut self, previous: GameState) -> bool {
        let mut generator = TileGenerator::seeded(&self.config);
        match Board::build(&self.config, &mut generator) {
            Ok(board) => {
                debug!(seed = self.config.seed, size = self.config.board_size, "board rebuilt");
                self.board = board;
                self.generator = generator;
                self.queue
                    .append(Input::with_tiles(InputType::BoardBuilt, self.board.tiles().clone()));
                true
            }
            Err(err) => {
                warn!(%err, "could not rebuild board, keeping the current one");
                self.queue.revert(previous);
                false
            }
        }
    }
}
