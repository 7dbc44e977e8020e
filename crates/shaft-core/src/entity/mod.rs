//! Combat identity of the player and monster tiles.
//!
//! [`EntityData`] is a value type. Every change (damage, a turn passing,
//! picking up gold) goes through a method that returns an updated copy, so a
//! board snapshot never observes a half-applied update.
//!
//! # Invariants
//!
//! - `hp <= original_hp` after every update.
//! - A `Shield` effect absorbs exactly one attack.
//!
//! # Example
//!
//! ```
//! use shaft_core::entity::{EntityData, EntityType};
//! use shaft_core::entity::components::AttackModel;
//! use shaft_core::coord::Directions;
//!
//! let rat = EntityData::new(EntityType::Rat, 2, AttackModel::new(2, 1, Directions::SOUTH));
//! let hit = rat.damaged(3);
//! assert_eq!(hit.hp, -1);
//! assert!(hit.is_dead());
//! assert_eq!(rat.with_hp(10).hp, 2);
//! ```

pub mod components;

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::tile::Item;

pub use components::{
    AttackModel, Carry, Pickaxe, Rune, RuneKind, StatusEffect, StatusEffectKind,
};

/// Species of an entity tile.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum EntityType {
    /// The player character.
    Player,
    /// Weak, quick monster.
    Rat,
    /// Armored monster that strikes sideways.
    Alamo,
    /// Slow, heavy hitter.
    Dragon,
    /// Fragile monster that attacks every turn.
    Bat,
    /// Salamander, strikes up and down.
    Sally,
}

impl EntityType {
    /// Every monster species (all types except [`EntityType::Player`]).
    pub const MONSTERS: [EntityType; 5] = [
        Self::Rat,
        Self::Alamo,
        Self::Dragon,
        Self::Bat,
        Self::Sally,
    ];
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Player => "player",
            Self::Rat => "rat",
            Self::Alamo => "alamo",
            Self::Dragon => "dragon",
            Self::Bat => "bat",
            Self::Sally => "sally",
        };
        f.write_str(name)
    }
}

/// Stats and loadout of a player or monster.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntityData {
    /// Species.
    pub entity_type: EntityType,
    /// Maximum hp.
    pub original_hp: i32,
    /// Current hp. May drop below zero; the referee decides when that is a death.
    pub hp: i32,
    /// Attack behavior.
    pub attack: AttackModel,
    /// Currency held. Monsters drop their gold on death.
    pub carry: Carry,
    /// Rune loadout, for entities that wield a pickaxe.
    pub pickaxe: Option<Pickaxe>,
    /// Active buffs and debuffs.
    pub status_effects: Vec<StatusEffect>,
    /// Dodge chance scalar.
    pub dodge: u32,
    /// Luck scalar.
    pub luck: u32,
}

impl EntityData {
    /// Creates an entity at full hp with nothing carried.
    #[must_use]
    pub fn new(entity_type: EntityType, hp: i32, attack: AttackModel) -> Self {
        Self {
            entity_type,
            original_hp: hp,
            hp,
            attack,
            carry: Carry::default(),
            pickaxe: None,
            status_effects: Vec::new(),
            dodge: 0,
            luck: 0,
        }
    }

    /// Returns `true` once hp has dropped to zero or below.
    #[must_use]
    pub const fn is_dead(&self) -> bool {
        self.hp <= 0
    }

    /// Returns `true` if an effect of `kind` is active.
    #[must_use]
    pub fn has_status(&self, kind: StatusEffectKind) -> bool {
        self.status_effects.iter().any(|effect| effect.kind == kind)
    }

    /// The entity with hp set to `hp`, clamped to `original_hp`.
    #[must_use]
    pub fn with_hp(&self, hp: i32) -> Self {
        Self {
            hp: hp.min(self.original_hp),
            ..self.clone()
        }
    }

    /// The entity carrying `carry`.
    #[must_use]
    pub fn with_carry(&self, carry: Carry) -> Self {
        Self {
            carry,
            ..self.clone()
        }
    }

    /// The entity with an additional status effect.
    #[must_use]
    pub fn with_status(&self, effect: StatusEffect) -> Self {
        let mut status_effects = self.status_effects.clone();
        status_effects.push(effect);
        Self {
            status_effects,
            ..self.clone()
        }
    }

    /// The entity wielding `pickaxe`.
    #[must_use]
    pub fn with_pickaxe(&self, pickaxe: Pickaxe) -> Self {
        Self {
            pickaxe: Some(pickaxe),
            ..self.clone()
        }
    }

    /// The entity after taking one attack of `damage`.
    ///
    /// An active shield absorbs the whole attack and is consumed.
    #[must_use]
    pub fn damaged(&self, damage: i32) -> Self {
        if let Some(index) = self
            .status_effects
            .iter()
            .position(|effect| effect.kind == StatusEffectKind::Shield)
        {
            let mut status_effects = self.status_effects.clone();
            status_effects.remove(index);
            return Self {
                status_effects,
                ..self.clone()
            };
        }
        self.with_hp(self.hp - damage)
    }

    /// The entity after performing an attack.
    #[must_use]
    pub fn attacked(&self) -> Self {
        Self {
            attack: self.attack.attacked(),
            ..self.clone()
        }
    }

    /// The entity after picking up `item`.
    #[must_use]
    pub fn collecting(&self, item: Item) -> Self {
        self.with_carry(self.carry.adding(item))
    }

    /// The entity after swapping rune `old` for `new`. No-op without a pickaxe.
    #[must_use]
    pub fn replacing_rune(&self, old: Rune, new: Rune) -> Self {
        match &self.pickaxe {
            Some(pickaxe) => self.with_pickaxe(pickaxe.replacing(old, new)),
            None => self.clone(),
        }
    }

    /// The entity after one turn passes.
    ///
    /// The attack charge advances, poison deals one damage, and every status
    /// effect loses a turn of duration. Expired effects are dropped.
    #[must_use]
    pub fn advanced_turn(&self) -> Self {
        let poison = self
            .status_effects
            .iter()
            .filter(|effect| effect.kind == StatusEffectKind::Poison)
            .count();
        let status_effects = self
            .status_effects
            .iter()
            .filter(|effect| effect.duration > 1)
            .map(|effect| StatusEffect::new(effect.kind, effect.duration - 1))
            .collect();
        Self {
            hp: self.hp - i32::try_from(poison).unwrap_or(i32::MAX),
            attack: self.attack.advanced_turn(),
            status_effects,
            ..self.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::coord::Directions;
    use crate::tile::ItemKind;

    fn rat() -> EntityData {
        EntityData::new(EntityType::Rat, 2, AttackModel::new(2, 1, Directions::SOUTH))
    }

    mod hp_tests {
        use super::*;

        #[test]
        fn hp_never_exceeds_original() {
            let rat = rat();
            assert_eq!(rat.with_hp(5).hp, 2);
            assert_eq!(rat.damaged(1).with_hp(4).hp, 2);
        }

        #[test]
        fn damage_can_go_negative() {
            let rat = rat().damaged(5);
            assert_eq!(rat.hp, -3);
            assert!(rat.is_dead());
        }

        #[test]
        fn update_does_not_alias() {
            let rat = rat();
            let _ = rat.damaged(1);
            assert_eq!(rat.hp, 2);
        }
    }

    mod status_tests {
        use super::*;

        #[test]
        fn shield_absorbs_one_attack() {
            let shielded = rat().with_status(StatusEffect::new(StatusEffectKind::Shield, 3));
            let once = shielded.damaged(2);
            assert_eq!(once.hp, 2);
            assert!(!once.has_status(StatusEffectKind::Shield));
            assert_eq!(once.damaged(2).hp, 0);
        }

        #[test]
        fn poison_ticks_and_expires() {
            let poisoned = rat().with_status(StatusEffect::new(StatusEffectKind::Poison, 2));
            let one = poisoned.advanced_turn();
            assert_eq!(one.hp, 1);
            assert!(one.has_status(StatusEffectKind::Poison));
            let two = one.advanced_turn();
            assert_eq!(two.hp, 0);
            assert!(!two.has_status(StatusEffectKind::Poison));
            assert_eq!(two.advanced_turn().hp, 0);
        }

        #[test]
        fn turn_advances_attack_charge() {
            let rat = rat().advanced_turn().advanced_turn();
            assert!(rat.attack.is_charged());
            assert!(!rat.attacked().attack.is_charged());
        }
    }

    mod loadout_tests {
        use super::*;

        #[test]
        fn collecting_adds_to_carry() {
            let rat = rat().collecting(Item::new(ItemKind::Gold, 4));
            assert_eq!(rat.carry.gold, 4);
        }

        #[test]
        fn rune_replacement_requires_pickaxe() {
            let old = Rune::new(RuneKind::Rainbow);
            let new = Rune::new(RuneKind::Flipflop);
            assert_eq!(rat().replacing_rune(old, new), rat());

            let armed = rat().with_pickaxe(Pickaxe::new(1));
            let replaced = armed.replacing_rune(old, new);
            assert_eq!(replaced.pickaxe.map(|p| p.runes), Some(vec![new]));
        }

        #[test]
        fn serialization_roundtrip() {
            let rat = rat().with_status(StatusEffect::new(StatusEffectKind::Shield, 1));
            let json = serde_json::to_string(&rat).unwrap();
            let deserialized: EntityData = serde_json::from_str(&json).unwrap();
            assert_eq!(rat, deserialized);
        }
    }
}
