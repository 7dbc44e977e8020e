//! The rules oracle.
//!
//! The [`Referee`] looks at a settled board and names the single next event
//! that must happen, or nothing. Rules are checked in a fixed priority order
//! and the first one that fires wins:
//!
//! 1. [`WinRule`]: the player touches the exit.
//! 2. [`LossRule`]: the player is dead, or is stuck with no attack, no match
//!    and no quarter turn that would open up a win or an attack. Pending
//!    deaths and adjacent loot are resolved first.
//! 3. [`PlayerAttackRule`]: a live monster sits directly above the player.
//! 4. [`MonsterAttackRule`]: a charged monster can reach the player.
//! 5. [`DeathRule`]: a monster's hp reached zero.
//! 6. [`CollectItemRule`]: an item shares an edge with the player.
//!
//! Ties inside a rule go to the first cell in row-major order. Evaluation is
//! pure: the same board always yields the same event.
//!
//! # Example
//!
//! ```
//! use shaft_core::board::Board;
//! use shaft_core::input::InputType;
//! use shaft_core::referee::Referee;
//! use shaft_core::tile::{Color, TileType};
//! use shaft_core::config::EntityStatTable;
//!
//! let rock = || TileType::Rock(Color::Blue);
//! let player = TileType::Player(EntityStatTable::default().player());
//! let board = Board::new(vec![
//!     vec![rock(), player, TileType::Exit],
//!     vec![rock(), TileType::Rock(Color::Red), rock()],
//!     vec![TileType::Rock(Color::Green), rock(), TileType::Rock(Color::Green)],
//! ])
//! .unwrap();
//!
//! let next = Referee::default().evaluate(&board).unwrap();
//! assert_eq!(next.input_type, InputType::GameWin);
//! ```

use std::fmt;
use tracing::trace;

use crate::board::{Board, Rotation};
use crate::input::{Input, InputType};
use crate::tile::Tiles;

/// One rule of the game.
///
/// Rules are read-only: they inspect a board and propose the next event.
pub trait Rule: Send + Sync {
    /// Short name for diagnostics.
    fn name(&self) -> &'static str;

    /// The event this rule demands for `board`, if any.
    fn evaluate(&self, board: &Board) -> Option<InputType>;
}

// =============================================================================
// Rules
// =============================================================================

/// Emits `gameWin` when the player is on or next to the exit.
#[derive(Debug, Clone, Copy, Default)]
pub struct WinRule;

impl WinRule {
    /// Returns `true` if the player occupies or touches the exit.
    #[must_use]
    pub fn is_won(board: &Board) -> bool {
        let player = board.player_position();
        board
            .exit_position()
            .is_some_and(|exit| exit == player || player.is_adjacent(exit))
    }
}

impl Rule for WinRule {
    fn name(&self) -> &'static str {
        "win"
    }

    fn evaluate(&self, board: &Board) -> Option<InputType> {
        Self::is_won(board).then_some(InputType::GameWin)
    }
}

/// Emits `gameLose` when the player is dead or has no way forward.
#[derive(Debug, Clone, Copy, Default)]
pub struct LossRule;

impl LossRule {
    /// Returns `true` if the level cannot continue.
    ///
    /// A pending death or an item next to the player still has to resolve,
    /// so neither board is lost yet. The quarter turns are simulated on
    /// copies; `board` is never touched.
    #[must_use]
    pub fn is_lost(board: &Board) -> bool {
        if board.player().is_dead() {
            return true;
        }
        if board.dying_monster().is_some() || board.adjacent_item().is_some() {
            return false;
        }
        if board.player_target().is_some() || board.has_removable_group() {
            return false;
        }
        let mut turned = board.clone();
        for _ in 1..4 {
            turned = turned.rotated(Rotation::Clockwise);
            if WinRule::is_won(&turned) || turned.player_target().is_some() {
                return false;
            }
        }
        true
    }
}

impl Rule for LossRule {
    fn name(&self) -> &'static str {
        "loss"
    }

    fn evaluate(&self, board: &Board) -> Option<InputType> {
        Self::is_lost(board).then_some(InputType::GameLose)
    }
}

/// Emits a player `attack` on the monster above the player.
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerAttackRule;

impl Rule for PlayerAttackRule {
    fn name(&self) -> &'static str {
        "player attack"
    }

    fn evaluate(&self, board: &Board) -> Option<InputType> {
        if !board.can_player_attack() {
            return None;
        }
        Some(InputType::Attack {
            attacker: board.player_position(),
            defender: board.player_target(),
            attacker_is_player: true,
        })
    }
}

/// Emits a monster `attack` for the first charged monster in reach.
#[derive(Debug, Clone, Copy, Default)]
pub struct MonsterAttackRule;

impl Rule for MonsterAttackRule {
    fn name(&self) -> &'static str {
        "monster attack"
    }

    fn evaluate(&self, board: &Board) -> Option<InputType> {
        let attacker = board.charged_attacker()?;
        Some(InputType::Attack {
            attacker,
            defender: board.monster_target(attacker),
            attacker_is_player: false,
        })
    }
}

/// Emits `monsterDies` for the first dead monster.
#[derive(Debug, Clone, Copy, Default)]
pub struct DeathRule;

impl Rule for DeathRule {
    fn name(&self) -> &'static str {
        "death"
    }

    fn evaluate(&self, board: &Board) -> Option<InputType> {
        let (coord, entity_type) = board.dying_monster()?;
        Some(InputType::MonsterDies { coord, entity_type })
    }
}

/// Emits `collectItem` for the first item next to the player.
#[derive(Debug, Clone, Copy, Default)]
pub struct CollectItemRule;

impl Rule for CollectItemRule {
    fn name(&self) -> &'static str {
        "collect item"
    }

    fn evaluate(&self, board: &Board) -> Option<InputType> {
        let (coord, item) = board.adjacent_item()?;
        Some(InputType::CollectItem { coord, item })
    }
}

// =============================================================================
// Referee
// =============================================================================

/// Ordered rule set.
pub struct Referee {
    rules: Vec<Box<dyn Rule>>,
}

impl Referee {
    /// A referee with a custom rule order.
    #[must_use]
    pub fn new(rules: Vec<Box<dyn Rule>>) -> Self {
        Self { rules }
    }

    /// The standard rule order.
    #[must_use]
    pub fn standard() -> Self {
        Self::new(vec![
            Box::new(WinRule),
            Box::new(LossRule),
            Box::new(PlayerAttackRule),
            Box::new(MonsterAttackRule),
            Box::new(DeathRule),
            Box::new(CollectItemRule),
        ])
    }

    /// The next event for `board`, carrying the board as its snapshot.
    #[must_use]
    pub fn evaluate(&self, board: &Board) -> Option<Input> {
        for rule in &self.rules {
            if let Some(input_type) = rule.evaluate(board) {
                trace!(rule = rule.name(), kind = %input_type.kind(), "referee decision");
                return Some(Input::with_tiles(input_type, board.tiles().clone()));
            }
        }
        trace!("referee found nothing to do");
        None
    }

    /// Like [`evaluate`](Self::evaluate), for a raw tile snapshot.
    ///
    /// # Panics
    ///
    /// Panics if `tiles` is not a well-formed settled board.
    #[must_use]
    pub fn evaluate_tiles(&self, tiles: &Tiles) -> Option<Input> {
        match Board::new(tiles.clone()) {
            Ok(board) => self.evaluate(&board),
            Err(err) => panic!("referee received a malformed board: {err}"),
        }
    }
}

impl Default for Referee {
    fn default() -> Self {
        Self::standard()
    }
}

impl fmt::Debug for Referee {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list()
            .entries(self.rules.iter().map(|rule| rule.name()))
            .finish()
    }
}
