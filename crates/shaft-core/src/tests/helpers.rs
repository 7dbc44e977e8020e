//! Test helpers for building boards and driving sessions.
//!
//! Boards are written as ASCII art, top row first, one glyph per tile:
//!
//! | Glyph | Tile |
//! |-------|------|
//! | `b` `g` `u` `n` `r` `k` | blue, green, purple, brown, red, black rock |
//! | `P` | player with built-in stats |
//! | `M` | live rat |
//! | `D` | rat with zero hp |
//! | `E` | exit |
//! | `G` | one gold |
//! | `.` | empty |

use rand::{RngCore, SeedableRng};

use crate::board::Board;
use crate::chance::{TileTypeChanceModel, DEFAULT_TOTAL};
use crate::config::{EntityStatTable, LevelConfig};
use crate::coord::TileCoord;
use crate::entity::{EntityType, Rune, RuneKind};
use crate::input::{Input, InputKind, InputType};
use crate::rng::Lcg;
use crate::session::{Session, SessionSnapshot};
use crate::tile::{Color, Item, TileType, Tiles};
use crate::transformation::Transformation;

/// Upper bound on ticks per driven cycle.
const MAX_TICKS: usize = 256;

// =============================================================================
// Boards
// =============================================================================

/// The tile for one glyph.
///
/// # Panics
///
/// Panics on an unknown glyph.
pub fn tile_from_glyph(glyph: char) -> TileType {
    let table = EntityStatTable::default();
    match glyph {
        'b' => TileType::Rock(Color::Blue),
        'g' => TileType::Rock(Color::Green),
        'u' => TileType::Rock(Color::Purple),
        'n' => TileType::Rock(Color::Brown),
        'r' => TileType::Rock(Color::Red),
        'k' => TileType::Rock(Color::Black),
        'P' => TileType::Player(table.player()),
        'M' => table.monster(EntityType::Rat),
        'D' => TileType::Monster(table.entity(EntityType::Rat).with_hp(0)),
        'E' => TileType::Exit,
        'G' => TileType::Item(Item::gold(1)),
        '.' => TileType::Empty,
        other => panic!("unknown board glyph {other:?}"),
    }
}

/// A raw grid from ASCII rows, top row first. Not validated.
pub fn tiles_from_ascii(rows: &[&str]) -> Tiles {
    rows.iter()
        .rev()
        .map(|row| row.chars().map(tile_from_glyph).collect())
        .collect()
}

/// A validated board from ASCII rows, top row first.
///
/// # Panics
///
/// Panics if the rows do not describe a well-formed board.
pub fn board_from_ascii(rows: &[&str]) -> Board {
    Board::new(tiles_from_ascii(rows)).expect("test board should be well formed")
}

/// A level of `size` whose generator only ever produces blue and green rocks.
///
/// Two colors keep matches plentiful, and with no monsters, items or exits
/// every refill is predictable in kind.
pub fn rocks_only_config(size: usize) -> LevelConfig {
    LevelConfig::default()
        .with_board_size(size)
        .with_monster_caps(0, 0)
        .with_chance_model(TileTypeChanceModel::uniform_rocks(
            &[Color::Blue, Color::Green],
            DEFAULT_TOTAL,
        ))
}

// =============================================================================
// Inputs
// =============================================================================

/// A representative input of `kind`.
///
/// The `transformation` sample wraps a rotation, so `targeting` refuses it.
pub fn input_of_kind(kind: InputKind) -> Input {
    let coord = TileCoord::new(0, 0);
    let rune = Rune::new(RuneKind::Rainbow);
    let input_type = match kind {
        InputKind::Touch => InputType::Touch {
            coord,
            tile_type: TileType::Rock(Color::Blue),
        },
        InputKind::TouchBegan => InputType::TouchBegan {
            coord,
            tile_type: TileType::Rock(Color::Blue),
        },
        InputKind::RotateLeft => InputType::RotateLeft,
        InputKind::RotateRight => InputType::RotateRight,
        InputKind::Attack => InputType::Attack {
            attacker: coord,
            defender: None,
            attacker_is_player: true,
        },
        InputKind::MonsterDies => InputType::MonsterDies {
            coord,
            entity_type: EntityType::Rat,
        },
        InputKind::GameWin => InputType::GameWin,
        InputKind::GameLose => InputType::GameLose,
        InputKind::Play => InputType::Play,
        InputKind::Pause => InputType::Pause,
        InputKind::LevelGoalDetail => InputType::LevelGoalDetail,
        InputKind::AnimationsFinished => InputType::AnimationsFinished,
        InputKind::PlayAgain => InputType::PlayAgain,
        InputKind::SelectLevel => InputType::SelectLevel(Box::default()),
        InputKind::Transformation => InputType::Transformation(Box::new(Transformation::noop(
            InputType::RotateLeft,
            Vec::new(),
        ))),
        InputKind::ReffingFinished => InputType::ReffingFinished,
        InputKind::BoardBuilt => InputType::BoardBuilt,
        InputKind::CollectItem => InputType::CollectItem {
            coord,
            item: Item::gold(1),
        },
        InputKind::ItemUseSelected => InputType::ItemUseSelected(rune),
        InputKind::ItemUseCanceled => InputType::ItemUseCanceled,
        InputKind::ItemCanBeUsed => InputType::ItemCanBeUsed(true),
        InputKind::UnlockExit => InputType::UnlockExit,
        InputKind::GoalCompleted => InputType::GoalCompleted,
        InputKind::RuneReplaced => InputType::RuneReplaced { old: rune, new: rune },
        InputKind::FoundRuneDiscarded => InputType::FoundRuneDiscarded(rune),
        InputKind::VisitStore => InputType::VisitStore,
    };
    Input::new(input_type)
}

// =============================================================================
// Sessions
// =============================================================================

/// A rocks-only session resumed from `tiles`, with `boardBuilt` consumed.
///
/// # Panics
///
/// Panics if `tiles` is not a well-formed board of at least 3×3.
pub fn session_from_tiles(tiles: Tiles) -> Session {
    let board = Board::new(tiles).expect("test board should be well formed");
    let snapshot = SessionSnapshot {
        player: board.player().clone(),
        tiles: board.into_tiles(),
        spawned_monsters: 0,
    };
    let config = rocks_only_config(snapshot.tiles.len()).with_seed(5);
    let mut session = Session::<Lcg>::restore(config, snapshot).expect("test session should start");
    session.tick();
    session
}

/// A rocks-only session resumed from ASCII rows, top row first.
pub fn session_from_ascii(rows: &[&str]) -> Session {
    session_from_tiles(tiles_from_ascii(rows))
}

/// Submits `input_type` and ticks until the queue drains, acknowledging every
/// transformation as if presentation had played it instantly.
///
/// Returns every dispatched input in order.
///
/// # Panics
///
/// Panics if the session refuses `input_type` or the cycle does not settle.
pub fn run_cycle<R: RngCore + SeedableRng>(
    session: &mut Session<R>,
    input_type: InputType,
) -> Vec<Input> {
    assert!(session.submit(input_type), "session refused the input");
    settle(session)
}

/// Ticks until the queue drains, acknowledging transformations.
///
/// # Panics
///
/// Panics if the queue is still busy after many ticks.
pub fn settle<R: RngCore + SeedableRng>(session: &mut Session<R>) -> Vec<Input> {
    let mut dispatched = Vec::new();
    for _ in 0..MAX_TICKS {
        if session.pending() == 0 {
            return dispatched;
        }
        if let Some(input) = session.tick() {
            if let Some(transformation) = input.input_type.as_transformation() {
                session.submit(Input::animations_finished(transformation));
            }
            dispatched.push(input);
        }
    }
    panic!("session did not settle after {MAX_TICKS} ticks");
}

/// Kinds of the dispatched inputs, for compact assertions.
pub fn kinds(inputs: &[Input]) -> Vec<InputKind> {
    inputs.iter().map(Input::kind).collect()
}
