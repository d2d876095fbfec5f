use crate::common::Cell;
use crate::domains::ledger::{Category, Fact, StructureKind};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// What an agent has learned from the ledger.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Knowledge {
    pub home_base: Option<Cell>,
    pub enemy_base: Option<Cell>,
    pub attack_target: Option<Cell>,
    pub kill_order: Option<Cell>,
    pub landscaper_building_paused: bool,
    pub soup: Vec<Cell>,
    pub distress: Vec<Cell>,
    /// Known structures keyed by location, with `true` for our side.
    #[serde(skip)]
    pub structures: BTreeMap<Cell, (StructureKind, bool)>,
    pub facts_seen: usize,
}

impl Knowledge {
    /// Folds one decoded fact in. Location facts about the same cell overwrite older ones.
    pub fn absorb(&mut self, fact: &Fact) {
        self.facts_seen += 1;
        match fact.category {
            Category::FriendlyHqAtLocation => self.home_base = Some(fact.location),
            Category::EnemyHqAtLocation => self.enemy_base = Some(fact.location),
            Category::AttackAtLocation => self.attack_target = Some(fact.location),
            Category::KillOrder => self.kill_order = Some(fact.location),
            Category::PauseLandscaperBuilding => self.landscaper_building_paused = true,
            Category::SoupAtLocation => push_unique(&mut self.soup, fact.location),
            Category::SosAtLocation => push_unique(&mut self.distress, fact.location),
            _ => {}
        }
        if let Some(structure) = fact.category.structure() {
            self.structures.insert(fact.location, structure);
        }
    }

    pub fn absorb_all<'a, I: IntoIterator<Item = &'a Fact>>(&mut self, facts: I) {
        for fact in facts {
            self.absorb(fact);
        }
    }

    pub fn is_enemy_base_located(&self) -> bool {
        self.enemy_base.is_some()
    }

    /// Where an offensive agent should head: explicit attack orders first, then the
    /// enemy base.
    pub fn offensive_target(&self) -> Option<Cell> {
        self.attack_target.or(self.enemy_base)
    }
}

fn push_unique(cells: &mut Vec<Cell>, cell: Cell) {
    if !cells.contains(&cell) {
        cells.push(cell);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fact(category: Category, x: i32, y: i32) -> Fact {
        Fact { category, location: Cell::new(x, y), round: 1 }
    }

    #[test]
    fn absorbs_base_locations_and_orders() {
        let mut knowledge = Knowledge::default();
        knowledge.absorb_all(&[
            fact(Category::FriendlyHqAtLocation, 1, 1),
            fact(Category::EnemyHqAtLocation, 30, 30),
            fact(Category::SoupAtLocation, 4, 4),
            fact(Category::SoupAtLocation, 4, 4),
        ]);
        assert_eq!(knowledge.home_base, Some(Cell::new(1, 1)));
        assert!(knowledge.is_enemy_base_located());
        assert_eq!(knowledge.soup.len(), 1);
        assert_eq!(knowledge.facts_seen, 4);
        assert_eq!(
            knowledge.structures.get(&Cell::new(30, 30)),
            Some(&(StructureKind::Hq, false))
        );
    }

    #[test]
    fn attack_orders_outrank_enemy_base() {
        let mut knowledge = Knowledge::default();
        knowledge.absorb(&fact(Category::EnemyHqAtLocation, 30, 30));
        assert_eq!(knowledge.offensive_target(), Some(Cell::new(30, 30)));
        knowledge.absorb(&fact(Category::AttackAtLocation, 5, 6));
        assert_eq!(knowledge.offensive_target(), Some(Cell::new(5, 6)));
    }
}
