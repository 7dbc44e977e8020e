//! The closed set of tile variants a board cell can hold.
//!
//! ```
//! use shaft_core::tile::{Color, TileType};
//!
//! let rock = TileType::Rock(Color::Blue);
//! assert!(rock.is_rock());
//! assert!(rock.matches(&TileType::Rock(Color::Blue)));
//! assert!(!rock.matches(&TileType::Rock(Color::Red)));
//! ```

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::entity::{EntityData, EntityType};

/// A board grid, addressed as `tiles[row][col]` with row 0 at the bottom.
pub type Tiles = Vec<Vec<TileType>>;

/// Rock colors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Color {
    /// Blue rock.
    Blue,
    /// Green rock.
    Green,
    /// Purple rock.
    Purple,
    /// Brown rock.
    Brown,
    /// Red rock.
    Red,
    /// Black rock.
    Black,
}

impl Color {
    /// Every rock color.
    pub const ALL: [Color; 6] = [
        Self::Blue,
        Self::Green,
        Self::Purple,
        Self::Brown,
        Self::Red,
        Self::Black,
    ];
}

/// Kinds of pickups.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemKind {
    /// Gold coins.
    Gold,
    /// A gem.
    Gem,
}

/// A pickup lying on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Item {
    /// What the pickup is.
    pub kind: ItemKind,
    /// How much of it there is.
    pub amount: u32,
}

impl Item {
    /// Creates an item.
    #[must_use]
    pub const fn new(kind: ItemKind, amount: u32) -> Self {
        Self { kind, amount }
    }

    /// A pile of gold.
    #[must_use]
    pub const fn gold(amount: u32) -> Self {
        Self::new(ItemKind::Gold, amount)
    }
}

/// What occupies a board cell.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TileType {
    /// An inert, matchable rock.
    Rock(Color),
    /// The player, exactly one per board.
    Player(EntityData),
    /// A monster.
    Monster(EntityData),
    /// A pickup.
    Item(Item),
    /// The level exit, at most one per board.
    Exit,
    /// A vacated cell awaiting refill. Never present on a settled board.
    Empty,
}

impl TileType {
    /// Returns `true` for rocks of any color.
    #[must_use]
    pub const fn is_rock(&self) -> bool {
        matches!(self, Self::Rock(_))
    }

    /// Returns `true` for the player tile.
    #[must_use]
    pub const fn is_player(&self) -> bool {
        matches!(self, Self::Player(_))
    }

    /// Returns `true` for monster tiles.
    #[must_use]
    pub const fn is_monster(&self) -> bool {
        matches!(self, Self::Monster(_))
    }

    /// Returns `true` for the exit.
    #[must_use]
    pub const fn is_exit(&self) -> bool {
        matches!(self, Self::Exit)
    }

    /// Returns `true` for vacated cells.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        matches!(self, Self::Empty)
    }

    /// The rock color, if this is a rock.
    #[must_use]
    pub const fn color(&self) -> Option<Color> {
        match self {
            Self::Rock(color) => Some(*color),
            _ => None,
        }
    }

    /// Combat data of a player or monster tile.
    #[must_use]
    pub const fn entity(&self) -> Option<&EntityData> {
        match self {
            Self::Player(data) | Self::Monster(data) => Some(data),
            _ => None,
        }
    }

    /// The entity type of a player or monster tile.
    #[must_use]
    pub fn entity_type(&self) -> Option<EntityType> {
        self.entity().map(|data| data.entity_type)
    }

    /// Whether two tiles belong to the same flood-fill group.
    ///
    /// Only rocks match, and only rocks of the same color.
    #[must_use]
    pub fn matches(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Rock(a), Self::Rock(b)) => a == b,
            _ => false,
        }
    }

    /// One-character glyph used by the board's text rendering.
    #[must_use]
    pub const fn glyph(&self) -> char {
        match self {
            Self::Rock(Color::Blue) => 'b',
            Self::Rock(Color::Green) => 'g',
            Self::Rock(Color::Purple) => 'u',
            Self::Rock(Color::Brown) => 'n',
            Self::Rock(Color::Red) => 'r',
            Self::Rock(Color::Black) => 'k',
            Self::Player(_) => 'P',
            Self::Monster(_) => 'M',
            Self::Item(_) => 'G',
            Self::Exit => 'E',
            Self::Empty => '.',
        }
    }
}

impl fmt::Display for TileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rock(color) => write!(f, "rock({color:?})"),
            Self::Player(data) => write!(f, "player(hp {})", data.hp),
            Self::Monster(data) => write!(f, "{:?}(hp {})", data.entity_type, data.hp),
            Self::Item(item) => write!(f, "{:?} x{}", item.kind, item.amount),
            Self::Exit => f.write_str("exit"),
            Self::Empty => f.write_str("empty"),
        }
    }
}
