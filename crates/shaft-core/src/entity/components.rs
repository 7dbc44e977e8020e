//! Component values carried by [`EntityData`](super::EntityData).
//!
//! Every component is a plain value: updates go through methods that return a
//! new value instead of mutating in place.

use serde::{Deserialize, Serialize};

use crate::coord::Directions;
use crate::tile::{Item, ItemKind};

// =============================================================================
// Attack
// =============================================================================

/// How and when an entity attacks.
///
/// Monsters attack on a cadence: `turns_since_last_attack` counts turns since
/// the last attack and the attack is charged once it reaches `frequency`. The
/// player has no cadence and may attack once per turn, tracked by
/// `has_attacked`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackModel {
    /// Turns between attacks. Zero means the entity never attacks on its own.
    pub frequency: u32,
    /// Damage dealt by one attack.
    pub damage: i32,
    /// Turns elapsed since the last attack.
    pub turns_since_last_attack: u32,
    /// Whether the entity already attacked during the current turn.
    pub has_attacked: bool,
    /// Directions the attack can reach (one cell away).
    pub directions: Directions,
}

impl AttackModel {
    /// Creates an uncharged attack model.
    #[must_use]
    pub const fn new(frequency: u32, damage: i32, directions: Directions) -> Self {
        Self {
            frequency,
            damage,
            turns_since_last_attack: 0,
            has_attacked: false,
            directions,
        }
    }

    /// The player's attack: one hit per turn on the cell above.
    #[must_use]
    pub const fn player(damage: i32) -> Self {
        Self::new(0, damage, Directions::NORTH)
    }

    /// Returns `true` if a cadence attack is ready.
    #[must_use]
    pub const fn is_charged(&self) -> bool {
        self.frequency > 0 && self.turns_since_last_attack >= self.frequency
    }

    /// The model after attacking: the charge resets.
    #[must_use]
    pub const fn attacked(self) -> Self {
        Self {
            turns_since_last_attack: 0,
            has_attacked: true,
            ..self
        }
    }

    /// The model after a turn passes.
    #[must_use]
    pub const fn advanced_turn(self) -> Self {
        Self {
            turns_since_last_attack: self.turns_since_last_attack.saturating_add(1),
            has_attacked: false,
            ..self
        }
    }
}

// =============================================================================
// Carry
// =============================================================================

/// Currency held by an entity.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Carry {
    /// Gold pieces.
    pub gold: u32,
    /// Gems.
    pub gems: u32,
}

impl Carry {
    /// Creates a carry with the given gold and no gems.
    #[must_use]
    pub const fn gold(gold: u32) -> Self {
        Self { gold, gems: 0 }
    }

    /// The carry after picking up `item`.
    #[must_use]
    pub const fn adding(self, item: Item) -> Self {
        match item.kind {
            ItemKind::Gold => Self {
                gold: self.gold.saturating_add(item.amount),
                ..self
            },
            ItemKind::Gem => Self {
                gems: self.gems.saturating_add(item.amount),
                ..self
            },
        }
    }
}

// =============================================================================
// Status effects
// =============================================================================

/// Kinds of timed status effects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StatusEffectKind {
    /// Absorbs the next attack entirely, then wears off.
    Shield,
    /// Deals one damage at the start of every turn.
    Poison,
}

/// A buff or debuff with a remaining duration in turns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusEffect {
    /// What the effect does.
    pub kind: StatusEffectKind,
    /// Turns left before the effect expires.
    pub duration: u32,
}

impl StatusEffect {
    /// Creates a status effect lasting `duration` turns.
    #[must_use]
    pub const fn new(kind: StatusEffectKind, duration: u32) -> Self {
        Self { kind, duration }
    }
}

// =============================================================================
// Pickaxe and runes
// =============================================================================

/// Kinds of runes that can be socketed into a pickaxe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RuneKind {
    /// Removes every rock of one color.
    Rainbow,
    /// Doubles the next attack.
    FieryRage,
    /// Flips the board vertically.
    Flipflop,
}

/// A socketed rune and its current charge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rune {
    /// Rune effect.
    pub kind: RuneKind,
    /// Charge accumulated toward the next use.
    pub charge: u32,
}

impl Rune {
    /// Creates an uncharged rune.
    #[must_use]
    pub const fn new(kind: RuneKind) -> Self {
        Self { kind, charge: 0 }
    }
}

/// The player's pickaxe loadout.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pickaxe {
    /// Socketed runes, at most `slots` of them.
    pub runes: Vec<Rune>,
    /// Number of rune sockets.
    pub slots: usize,
}

impl Pickaxe {
    /// Creates an empty pickaxe with `slots` sockets.
    #[must_use]
    pub const fn new(slots: usize) -> Self {
        Self {
            runes: Vec::new(),
            slots,
        }
    }

    /// The pickaxe with the first rune equal to `old` replaced by `new`.
    ///
    /// When `old` is not socketed, `new` fills a free socket if there is one.
    #[must_use]
    pub fn replacing(&self, old: Rune, new: Rune) -> Self {
        let mut runes = self.runes.clone();
        if let Some(slot) = runes.iter_mut().find(|rune| **rune == old) {
            *slot = new;
        } else if runes.len() < self.slots {
            runes.push(new);
        }
        Self {
            runes,
            slots: self.slots,
        }
    }
}
