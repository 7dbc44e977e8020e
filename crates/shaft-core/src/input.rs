//! Events understood by the engine.
//!
//! [`InputType`] is a closed set. [`InputKind`] mirrors it without payloads so
//! the state machine's transition table can be written and enumerated over
//! plain tags.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::config::LevelConfig;
use crate::coord::TileCoord;
use crate::entity::{EntityType, Rune};
use crate::tile::{Item, TileType, Tiles};
use crate::transformation::Transformation;

/// Every event the engine understands, with its payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum InputType {
    /// A completed touch on a tile.
    Touch {
        /// Touched cell.
        coord: TileCoord,
        /// Tile the player saw at that cell.
        tile_type: TileType,
    },
    /// A touch has started; asks for a removal preview.
    TouchBegan {
        /// Touched cell.
        coord: TileCoord,
        /// Tile the player saw at that cell.
        tile_type: TileType,
    },
    /// Rotate the board 90° counter-clockwise.
    RotateLeft,
    /// Rotate the board 90° clockwise.
    RotateRight,
    /// One entity attacks another.
    Attack {
        /// Attacking cell.
        attacker: TileCoord,
        /// Defending cell, if there is a target.
        defender: Option<TileCoord>,
        /// Whether the player is the attacker.
        attacker_is_player: bool,
    },
    /// An entity's hp dropped to zero or below.
    MonsterDies {
        /// Cell of the dead entity.
        coord: TileCoord,
        /// Species of the dead entity.
        entity_type: EntityType,
    },
    /// The level is won.
    GameWin,
    /// The level is lost.
    GameLose,
    /// Resume from pause.
    Play,
    /// Pause the game.
    Pause,
    /// Show the level goal panel (pauses).
    LevelGoalDetail,
    /// Presentation finished playing the last transformation.
    AnimationsFinished,
    /// Restart the current level.
    PlayAgain,
    /// Switch to another level.
    SelectLevel(Box<LevelConfig>),
    /// A board mutation finished.
    Transformation(Box<Transformation>),
    /// The referee found nothing left to do.
    ReffingFinished,
    /// A new board was built.
    BoardBuilt,
    /// The player picks up an item.
    CollectItem {
        /// Cell holding the item.
        coord: TileCoord,
        /// The item.
        item: Item,
    },
    /// The player chose a rune to use.
    ItemUseSelected(Rune),
    /// The player backed out of targeting.
    ItemUseCanceled,
    /// Whether the selected rune can be used on the current target.
    ItemCanBeUsed(bool),
    /// Reveal the exit.
    UnlockExit,
    /// A level goal was completed.
    GoalCompleted,
    /// Replace a socketed rune with a newly found one.
    RuneReplaced {
        /// Rune taken out.
        old: Rune,
        /// Rune put in.
        new: Rune,
    },
    /// A found rune was left behind.
    FoundRuneDiscarded(Rune),
    /// Open the store from the win screen.
    VisitStore,
}

impl InputType {
    /// The payload-free tag for this input.
    #[must_use]
    pub const fn kind(&self) -> InputKind {
        match self {
            Self::Touch { .. } => InputKind::Touch,
            Self::TouchBegan { .. } => InputKind::TouchBegan,
            Self::RotateLeft => InputKind::RotateLeft,
            Self::RotateRight => InputKind::RotateRight,
            Self::Attack { .. } => InputKind::Attack,
            Self::MonsterDies { .. } => InputKind::MonsterDies,
            Self::GameWin => InputKind::GameWin,
            Self::GameLose => InputKind::GameLose,
            Self::Play => InputKind::Play,
            Self::Pause => InputKind::Pause,
            Self::LevelGoalDetail => InputKind::LevelGoalDetail,
            Self::AnimationsFinished => InputKind::AnimationsFinished,
            Self::PlayAgain => InputKind::PlayAgain,
            Self::SelectLevel(_) => InputKind::SelectLevel,
            Self::Transformation(_) => InputKind::Transformation,
            Self::ReffingFinished => InputKind::ReffingFinished,
            Self::BoardBuilt => InputKind::BoardBuilt,
            Self::CollectItem { .. } => InputKind::CollectItem,
            Self::ItemUseSelected(_) => InputKind::ItemUseSelected,
            Self::ItemUseCanceled => InputKind::ItemUseCanceled,
            Self::ItemCanBeUsed(_) => InputKind::ItemCanBeUsed,
            Self::UnlockExit => InputKind::UnlockExit,
            Self::GoalCompleted => InputKind::GoalCompleted,
            Self::RuneReplaced { .. } => InputKind::RuneReplaced,
            Self::FoundRuneDiscarded(_) => InputKind::FoundRuneDiscarded,
            Self::VisitStore => InputKind::VisitStore,
        }
    }

    /// The wrapped transformation, for [`InputType::Transformation`].
    #[must_use]
    pub fn as_transformation(&self) -> Option<&Transformation> {
        match self {
            Self::Transformation(transformation) => Some(transformation),
            _ => None,
        }
    }
}

/// Payload-free tags of [`InputType`].
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum InputKind {
    Touch,
    TouchBegan,
    RotateLeft,
    RotateRight,
    Attack,
    MonsterDies,
    GameWin,
    GameLose,
    Play,
    Pause,
    LevelGoalDetail,
    AnimationsFinished,
    PlayAgain,
    SelectLevel,
    Transformation,
    ReffingFinished,
    BoardBuilt,
    CollectItem,
    ItemUseSelected,
    ItemUseCanceled,
    ItemCanBeUsed,
    UnlockExit,
    GoalCompleted,
    RuneReplaced,
    FoundRuneDiscarded,
    VisitStore,
}

impl InputKind {
    /// Every input kind.
    pub const ALL: [InputKind; 26] = [
        Self::Touch,
        Self::TouchBegan,
        Self::RotateLeft,
        Self::RotateRight,
        Self::Attack,
        Self::MonsterDies,
        Self::GameWin,
        Self::GameLose,
        Self::Play,
        Self::Pause,
        Self::LevelGoalDetail,
        Self::AnimationsFinished,
        Self::PlayAgain,
        Self::SelectLevel,
        Self::Transformation,
        Self::ReffingFinished,
        Self::BoardBuilt,
        Self::CollectItem,
        Self::ItemUseSelected,
        Self::ItemUseCanceled,
        Self::ItemCanBeUsed,
        Self::UnlockExit,
        Self::GoalCompleted,
        Self::RuneReplaced,
        Self::FoundRuneDiscarded,
        Self::VisitStore,
    ];
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

/// An event plus the board snapshot it was emitted against.
///
/// The referee only ever reads `end_tiles`; inputs submitted from outside the
/// engine usually carry none.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Input {
    /// The event.
    pub input_type: InputType,
    /// Board tiles at emission time.
    pub end_tiles: Option<Tiles>,
}

impl Input {
    /// Creates an input without a board snapshot.
    #[must_use]
    pub const fn new(input_type: InputType) -> Self {
        Self {
            input_type,
            end_tiles: None,
        }
    }

    /// Creates an input carrying a board snapshot.
    #[must_use]
    pub const fn with_tiles(input_type: InputType, end_tiles: Tiles) -> Self {
        Self {
            input_type,
            end_tiles: Some(end_tiles),
        }
    }

    /// Wraps a finished mutation, carrying its settled grid.
    #[must_use]
    pub fn transformation(transformation: Transformation) -> Self {
        let end_tiles = transformation.end_tiles.clone();
        Self::with_tiles(InputType::Transformation(Box::new(transformation)), end_tiles)
    }

    /// The signal presentation sends after replaying `transformation`.
    #[must_use]
    pub fn animations_finished(transformation: &Transformation) -> Self {
        Self::with_tiles(InputType::AnimationsFinished, transformation.end_tiles.clone())
    }

    /// Payload-free tag of the event.
    #[must_use]
    pub const fn kind(&self) -> InputKind {
        self.input_type.kind()
    }
}

impl From<InputType> for Input {
    fn from(input_type: InputType) -> Self {
        Self::new(input_type)
    }
}
