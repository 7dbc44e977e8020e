//! Attacks, deaths and other single-cell updates.
//!
//! Combat never removes tiles. Damage may push hp below zero; the referee
//! notices the death on its next pass and a separate `monsterDies` input
//! turns the corpse into loot.

use tracing::debug;

use super::Board;
use crate::coord::TileCoord;
use crate::entity::{EntityType, Rune};
use crate::input::InputType;
use crate::tile::{Item, TileType};
use crate::transformation::{TileTransformation, Transformation};

impl Board {
    // =========================================================================
    // Targets
    // =========================================================================

    /// The live monster the player would hit: the cell directly above.
    #[must_use]
    pub fn player_target(&self) -> Option<TileCoord> {
        let above = self.player_position.row_above();
        match self.get(above) {
            Some(TileType::Monster(monster)) if !monster.is_dead() => Some(above),
            _ => None,
        }
    }

    /// Returns `true` if the player has a target and has not attacked this turn.
    #[must_use]
    pub fn can_player_attack(&self) -> bool {
        self.player_target().is_some() && !self.player().attack.has_attacked
    }

    /// The player's position, if the monster at `coord` can reach it.
    #[must_use]
    pub fn monster_target(&self, coord: TileCoord) -> Option<TileCoord> {
        let Some(TileType::Monster(monster)) = self.get(coord) else {
            return None;
        };
        monster
            .attack
            .directions
            .directions()
            .map(|direction| coord.offset(direction))
            .find(|target| *target == self.player_position)
    }

    /// The first live monster, in scan order, whose attack is charged and
    /// whose reach covers the player.
    #[must_use]
    pub fn charged_attacker(&self) -> Option<TileCoord> {
        self.monsters()
            .find(|(coord, monster)| {
                !monster.is_dead() && monster.attack.is_charged() && self.monster_target(*coord).is_some()
            })
            .map(|(coord, _)| coord)
    }

    /// The first monster, in scan order, whose hp is zero or below.
    #[must_use]
    pub fn dying_monster(&self) -> Option<(TileCoord, EntityType)> {
        self.monsters()
            .find(|(_, monster)| monster.is_dead())
            .map(|(coord, monster)| (coord, monster.entity_type))
    }

    /// The first item, in scan order, sharing an edge with the player.
    #[must_use]
    pub fn adjacent_item(&self) -> Option<(TileCoord, Item)> {
        self.iter().find_map(|(coord, tile)| match tile {
            TileType::Item(item) if coord.is_orthogonally_adjacent(self.player_position) => {
                Some((coord, *item))
            }
            _ => None,
        })
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Resolves an attack from the cell at `attacker`.
    pub fn attack(
        &self,
        attacker: TileCoord,
        attacker_is_player: bool,
        input_type: &InputType,
    ) -> (Self, Transformation) {
        if attacker_is_player {
            self.player_attack(input_type)
        } else {
            self.monster_attack(attacker, input_type)
        }
    }

    /// The player hits the monster directly above.
    ///
    /// No-op if that cell is off the board or holds no monster.
    pub fn player_attack(&self, input_type: &InputType) -> (Self, Transformation) {
        let target = self.player_position.row_above();
        let Some(TileType::Monster(monster)) = self.get(target) else {
            return self.unchanged(input_type);
        };
        let player = self.player();
        let monster = monster.damaged(player.attack.damage);
        debug!(%target, damage = player.attack.damage, hp = monster.hp, "player attack");

        let mut board = self.with_tile(target, TileType::Monster(monster));
        board = board.with_tile(self.player_position, TileType::Player(player.attacked()));
        board.single_move(self.player_position, target, input_type)
    }

    /// The monster at `coord` hits the player, if the player is within reach.
    pub fn monster_attack(&self, coord: TileCoord, input_type: &InputType) -> (Self, Transformation) {
        let Some(TileType::Monster(monster)) = self.get(coord) else {
            return self.unchanged(input_type);
        };
        let Some(target) = self.monster_target(coord) else {
            return self.unchanged(input_type);
        };
        let player = self.player().damaged(monster.attack.damage);
        debug!(attacker = %coord, damage = monster.attack.damage, hp = player.hp, "monster attack");

        let mut board = self.with_tile(coord, TileType::Monster(monster.attacked()));
        board = board.with_tile(target, TileType::Player(player));
        board.single_move(coord, target, input_type)
    }

    /// Replaces the dead monster at `coord` with its gold, at least one piece.
    ///
    /// No-op unless `coord` holds a monster.
    pub fn monster_dies(&self, coord: TileCoord, input_type: &InputType) -> (Self, Transformation) {
        let Some(TileType::Monster(monster)) = self.get(coord) else {
            return self.unchanged(input_type);
        };
        let gold = monster.carry.gold.max(1);
        debug!(%coord, entity = %monster.entity_type, gold, "monster dies");
        self.with_tile(coord, TileType::Item(Item::gold(gold)))
            .single_move(coord, coord, input_type)
    }

    /// Turns the top-most, left-most rock into the exit.
    ///
    /// No-op if the board already has an exit or holds no rock.
    pub fn unlock_exit(&self, input_type: &InputType) -> (Self, Transformation) {
        if self.exit_position.is_some() {
            return self.unchanged(input_type);
        }
        let Some(coord) = self
            .iter()
            .filter(|(_, tile)| tile.is_rock())
            .map(|(coord, _)| coord)
            .max_by_key(|coord| (coord.row(), -coord.col()))
        else {
            return self.unchanged(input_type);
        };
        debug!(%coord, "unlock exit");
        self.with_tile(coord, TileType::Exit).single_move(coord, coord, input_type)
    }

    /// Swaps a rune in the player's pickaxe.
    pub fn replace_rune(&self, old: Rune, new: Rune, input_type: &InputType) -> (Self, Transformation) {
        let player = self.player().replacing_rune(old, new);
        let position = self.player_position;
        self.with_tile(position, TileType::Player(player))
            .single_move(position, position, input_type)
    }

    fn with_tile(&self, coord: TileCoord, tile: TileType) -> Self {
        Self::settled(self.tiles_with(coord, tile))
    }

    fn single_move(self, from: TileCoord, to: TileCoord, input_type: &InputType) -> (Self, Transformation) {
        let transformation = Transformation::new(
            vec![vec![TileTransformation::new(from, to)]],
            input_type.clone(),
            self.tiles.clone(),
        );
        (self, transformation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{StatusEffect, StatusEffectKind};
    use crate::tests::helpers::board_from_ascii;

    fn attack(attacker: TileCoord, attacker_is_player: bool) -> InputType {
        InputType::Attack {
            attacker,
            defender: None,
            attacker_is_player,
        }
    }

    mod target_tests {
        use super::*;

        #[test]
        fn player_targets_monster_above() {
            let board = board_from_ascii(&["bMb", "gPg", "bgb"]);
            assert_eq!(board.player_target(), Some(TileCoord::new(2, 1)));
            assert!(board.can_player_attack());
        }

        #[test]
        fn dead_monster_is_not_a_target() {
            let board = board_from_ascii(&["bDb", "gPg", "bgb"]);
            assert_eq!(board.player_target(), None);
            assert_eq!(board.dying_monster(), Some((TileCoord::new(2, 1), EntityType::Rat)));
        }

        #[test]
        fn monster_reach_follows_directions() {
            let board = board_from_ascii(&["bMb", "gPM", "bgb"]);
            assert_eq!(board.monster_target(TileCoord::new(2, 1)), Some(TileCoord::new(1, 1)));
            assert_eq!(board.monster_target(TileCoord::new(1, 2)), None);
        }

        #[test]
        fn charged_attacker_needs_charge() {
            let board = board_from_ascii(&["bMb", "gPg", "bgb"]);
            assert_eq!(board.charged_attacker(), None);
            let later = board.advanced_turn().advanced_turn();
            assert_eq!(later.charged_attacker(), Some(TileCoord::new(2, 1)));
        }

        #[test]
        fn adjacent_item_requires_shared_edge() {
            let board = board_from_ascii(&["Gbb", "gPg", "bgb"]);
            assert_eq!(board.adjacent_item(), None);
            let board = board_from_ascii(&["bbb", "GPg", "bgb"]);
            assert_eq!(board.adjacent_item(), Some((TileCoord::new(1, 0), Item::gold(1))));
        }
    }

    mod attack_tests {
        use super::*;

        #[test]
        fn player_attack_damages_monster() {
            let board = board_from_ascii(&["bMb", "gPg", "bgb"]);
            let input = attack(board.player_position(), true);
            let (next, transformation) = board.attack(board.player_position(), true, &input);
            let (_, rat) = next.monsters().next().unwrap();
            assert_eq!(rat.hp, rat.original_hp - 1);
            assert!(next.player().attack.has_attacked);
            assert!(!next.can_player_attack());
            assert_eq!(transformation.groups[0][0].end, TileCoord::new(2, 1));
        }

        #[test]
        fn player_attack_without_monster_is_noop() {
            let board = board_from_ascii(&["bgb", "gPg", "bgb"]);
            let (next, transformation) = board.player_attack(&attack(board.player_position(), true));
            assert!(transformation.is_noop());
            assert_eq!(next, board);
        }

        #[test]
        fn player_attack_at_top_edge_is_noop() {
            let board = board_from_ascii(&["gPg", "bgb", "gbg"]);
            let (_, transformation) = board.player_attack(&attack(board.player_position(), true));
            assert!(transformation.is_noop());
        }

        #[test]
        fn monster_attack_damages_player_and_resets_charge() {
            let board = board_from_ascii(&["bMb", "gPg", "bgb"]).advanced_turn().advanced_turn();
            let coord = TileCoord::new(2, 1);
            let (next, _) = board.monster_attack(coord, &attack(coord, false));
            assert_eq!(next.player().hp, board.player().hp - 1);
            assert_eq!(next.charged_attacker(), None);
        }

        #[test]
        fn shield_absorbs_monster_attack() {
            let board = board_from_ascii(&["bMb", "gPg", "bgb"]);
            let shielded = board
                .player()
                .with_status(StatusEffect::new(StatusEffectKind::Shield, 2));
            let board = board.with_tile(board.player_position(), TileType::Player(shielded));
            let coord = TileCoord::new(2, 1);
            let (next, _) = board.monster_attack(coord, &attack(coord, false));
            assert_eq!(next.player().hp, board.player().hp);
            assert!(!next.player().has_status(StatusEffectKind::Shield));
        }

        #[test]
        fn out_of_reach_monster_attack_is_noop() {
            let board = board_from_ascii(&["bgb", "gPg", "Mgb"]);
            let coord = TileCoord::new(0, 0);
            let (_, transformation) = board.monster_attack(coord, &attack(coord, false));
            assert!(transformation.is_noop());
        }
    }

    mod single_cell_tests {
        use super::*;
        use crate::entity::RuneKind;

        #[test]
        fn dead_monster_drops_gold() {
            let board = board_from_ascii(&["bDb", "gPg", "bgb"]);
            let coord = TileCoord::new(2, 1);
            let input = InputType::MonsterDies {
                coord,
                entity_type: EntityType::Rat,
            };
            let (next, transformation) = board.monster_dies(coord, &input);
            assert_eq!(next.get(coord), Some(&TileType::Item(Item::gold(1))));
            assert_eq!(transformation.len(), 1);
            assert_eq!(next.dying_monster(), None);
        }

        #[test]
        fn unlock_exit_picks_top_left_rock() {
            let board = board_from_ascii(&["MbP", "ggg", "bgb"]);
            let (next, _) = board.unlock_exit(&InputType::UnlockExit);
            assert_eq!(next.exit_position(), Some(TileCoord::new(2, 1)));

            let (again, transformation) = next.unlock_exit(&InputType::UnlockExit);
            assert!(transformation.is_noop());
            assert_eq!(again, next);
        }

        #[test]
        fn rune_replacement_updates_player() {
            let board = board_from_ascii(&["bgb", "gPg", "bgb"]);
            let mut player = board.player().clone();
            player.pickaxe = Some(crate::entity::Pickaxe::new(1));
            let board = board.with_tile(board.player_position(), TileType::Player(player));
            let old = Rune::new(RuneKind::Rainbow);
            let new = Rune::new(RuneKind::FieryRage);
            let (next, _) = board.replace_rune(old, new, &InputType::RuneReplaced { old, new });
            assert_eq!(
                next.player().pickaxe.as_ref().map(|p| p.runes.clone()),
                Some(vec![new])
            );
        }
    }
}
