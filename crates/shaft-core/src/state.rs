//! The game phase state machine.
//!
//! Each [`GameState`] accepts a fixed set of input kinds and names the state
//! that follows. The table below is the whole machine; anything not listed is
//! refused.
//!
//! | State       | Input                                           | Next        |
//! |-------------|-------------------------------------------------|-------------|
//! | `playing`   | gameWin                                         | `gameWin`   |
//! |             | gameLose                                        | `gameLose`  |
//! |             | pause, levelGoalDetail                          | `paused`    |
//! |             | attack, touch, touchBegan, monsterDies, rotate*, collectItem, unlockExit, goalCompleted | `computing` |
//! |             | itemUseSelected                                 | `targeting` |
//! |             | boardBuilt                                      | `playing`   |
//! | `computing` | transformation                                  | `animating` |
//! | `animating` | animationsFinished                              | `reffing`   |
//! | `reffing`   | reffingFinished                                 | `playing`   |
//! |             | attack, monsterDies, collectItem                | `computing` |
//! |             | gameWin / gameLose                              | `gameWin` / `gameLose` |
//! | `paused`    | play, selectLevel, playAgain                    | `playing`   |
//! |             | runeReplaced, foundRuneDiscarded                | `computing` |
//! | `targeting` | itemUseCanceled                                 | `playing`   |
//! |             | itemCanBeUsed                                   | `targeting` |
//! |             | transformation wrapping itemUseSelected         | `targeting` |
//! | `gameWin`   | playAgain, selectLevel                          | `playing`   |
//! |             | visitStore                                      | `gameWin`   |
//! | `gameLose`  | playAgain, selectLevel                          | `playing`   |
//!
//! Entering `reffing` is the only place the referee runs.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::input::{Input, InputKind, InputType};
use crate::referee::Referee;

/// Phase of play.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameState {
    /// Waiting for the player.
    Playing,
    /// A board mutation is being computed.
    Computing,
    /// Presentation is replaying the last transformation.
    Animating,
    /// The referee is deciding what happens next.
    Reffing,
    /// Play is suspended.
    Paused,
    /// The player is choosing where to use a rune.
    Targeting,
    /// The level is won.
    GameWin,
    /// The level is lost.
    GameLose,
}

impl GameState {
    /// Every state.
    pub const ALL: [GameState; 8] = [
        Self::Playing,
        Self::Computing,
        Self::Animating,
        Self::Reffing,
        Self::Paused,
        Self::Targeting,
        Self::GameWin,
        Self::GameLose,
    ];

    /// The state that follows `input`, or `None` if this state refuses it.
    ///
    /// Depends on nothing but `self` and `input`.
    #[must_use]
    pub fn transition(self, input: &Input) -> Option<GameState> {
        use InputKind as K;

        let kind = input.kind();
        match self {
            Self::Playing => match kind {
                K::GameWin => Some(Self::GameWin),
                K::GameLose => Some(Self::GameLose),
                K::Pause | K::LevelGoalDetail => Some(Self::Paused),
                K::Attack
                | K::Touch
                | K::TouchBegan
                | K::MonsterDies
                | K::RotateLeft
                | K::RotateRight
                | K::CollectItem
                | K::UnlockExit
                | K::GoalCompleted => Some(Self::Computing),
                K::ItemUseSelected => Some(Self::Targeting),
                K::BoardBuilt => Some(Self::Playing),
                _ => None,
            },
            Self::Computing => (kind == K::Transformation).then_some(Self::Animating),
            Self::Animating => (kind == K::AnimationsFinished).then_some(Self::Reffing),
            Self::Reffing => match kind {
                K::ReffingFinished => Some(Self::Playing),
                K::Attack | K::MonsterDies | K::CollectItem => Some(Self::Computing),
                K::GameWin => Some(Self::GameWin),
                K::GameLose => Some(Self::GameLose),
                _ => None,
            },
            Self::Paused => match kind {
                K::Play | K::SelectLevel | K::PlayAgain => Some(Self::Playing),
                K::RuneReplaced | K::FoundRuneDiscarded => Some(Self::Computing),
                _ => None,
            },
            Self::Targeting => match &input.input_type {
                InputType::ItemUseCanceled => Some(Self::Playing),
                InputType::ItemCanBeUsed(_) => Some(Self::Targeting),
                InputType::Transformation(transformation)
                    if transformation.input_type.kind() == K::ItemUseSelected =>
                {
                    Some(Self::Targeting)
                }
                _ => None,
            },
            Self::GameWin => match kind {
                K::PlayAgain | K::SelectLevel => Some(Self::Playing),
                K::VisitStore => Some(Self::GameWin),
                _ => None,
            },
            Self::GameLose => match kind {
                K::PlayAgain | K::SelectLevel => Some(Self::Playing),
                _ => None,
            },
        }
    }

    /// Whether the queue should admit `input` while in this state.
    #[must_use]
    pub fn should_append(self, input: &Input) -> bool {
        self.transition(input).is_some()
    }

    /// Work done on entering this state through `input`.
    ///
    /// Entering `reffing` runs `referee` on the input's board snapshot and
    /// returns its verdict, or `reffingFinished` when no rule fires. Every
    /// other state returns `None`.
    ///
    /// # Panics
    ///
    /// Panics if `reffing` is entered through an input without a snapshot,
    /// or with a snapshot that is not a well-formed board.
    #[must_use]
    pub fn enter(self, input: &Input, referee: &Referee) -> Option<Input> {
        match self {
            Self::Reffing => {
                let Some(tiles) = &input.end_tiles else {
                    panic!("entered reffing through {} without a board snapshot", input.kind());
                };
                Some(
                    referee
                        .evaluate_tiles(tiles)
                        .unwrap_or_else(|| Input::with_tiles(InputType::ReffingFinished, tiles.clone())),
                )
            }
            Self::Playing
            | Self::Computing
            | Self::Animating
            | Self::Paused
            | Self::Targeting
            | Self::GameWin
            | Self::GameLose => None,
        }
    }
}

impl fmt::Display for GameState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Playing => "playing",
            Self::Computing => "computing",
            Self::Animating => "animating",
            Self::Reffing => "reffing",
            Self::Paused => "paused",
            Self::Targeting => "targeting",
            Self::GameWin => "gameWin",
            Self::GameLose => "gameLose",
        };
        f.write_str(name)
    }
}
