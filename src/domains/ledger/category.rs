use serde::{Deserialize, Serialize};

/// Kinds of fact carried on the ledger. The wire codes are shared with teammate
/// agents built independently and must not change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    SosAtLocation,
    SoupAtLocation,
    FriendlyHqAtLocation,
    EnemyHqAtLocation,
    FriendlyRefineryAtLocation,
    EnemyRefineryAtLocation,
    FriendlyDesignSchoolAtLocation,
    EnemyDesignSchoolAtLocation,
    FriendlyFulfillmentCenterAtLocation,
    EnemyFulfillmentCenterAtLocation,
    AttackAtLocation,
    KillOrder,
    PauseLandscaperBuilding,
}

impl Category {
    pub const ALL: [Category; 13] = [
        Category::SosAtLocation,
        Category::SoupAtLocation,
        Category::FriendlyHqAtLocation,
        Category::EnemyHqAtLocation,
        Category::FriendlyRefineryAtLocation,
        Category::EnemyRefineryAtLocation,
        Category::FriendlyDesignSchoolAtLocation,
        Category::EnemyDesignSchoolAtLocation,
        Category::FriendlyFulfillmentCenterAtLocation,
        Category::EnemyFulfillmentCenterAtLocation,
        Category::AttackAtLocation,
        Category::KillOrder,
        Category::PauseLandscaperBuilding,
    ];

    pub const fn code(self) -> i32 {
        match self {
            Category::SosAtLocation => -104,
            Category::SoupAtLocation => 249,
            Category::FriendlyHqAtLocation => 9,
            Category::EnemyHqAtLocation => 29,
            Category::FriendlyRefineryAtLocation => -477,
            Category::EnemyRefineryAtLocation => -443,
            Category::FriendlyDesignSchoolAtLocation => 793,
            Category::EnemyDesignSchoolAtLocation => 740,
            Category::FriendlyFulfillmentCenterAtLocation => 117,
            Category::EnemyFulfillmentCenterAtLocation => 177,
            Category::AttackAtLocation => -171,
            Category::KillOrder => 88,
            Category::PauseLandscaperBuilding => 8482,
        }
    }

    pub fn from_code(code: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|category| category.code() == code)
    }

    /// Category announcing the location of a structure of the given kind and side.
    pub fn locating(kind: StructureKind, friendly: bool) -> Self {
        match (kind, friendly) {
            (StructureKind::Hq, true) => Category::FriendlyHqAtLocation,
            (StructureKind::Hq, false) => Category::EnemyHqAtLocation,
            (StructureKind::Refinery, true) => Category::FriendlyRefineryAtLocation,
            (StructureKind::Refinery, false) => Category::EnemyRefineryAtLocation,
            (StructureKind::DesignSchool, true) => Category::FriendlyDesignSchoolAtLocation,
            (StructureKind::DesignSchool, false) => Category::EnemyDesignSchoolAtLocation,
            (StructureKind::FulfillmentCenter, true) => Category::FriendlyFulfillmentCenterAtLocation,
            (StructureKind::FulfillmentCenter, false) => Category::EnemyFulfillmentCenterAtLocation,
        }
    }

    /// The structure a location fact refers to, with `true` for our own side.
    pub fn structure(self) -> Option<(StructureKind, bool)> {
        StructureKind::ALL.into_iter().find_map(|kind| {
            [true, false]
                .into_iter()
                .find(|friendly| Self::locating(kind, *friendly) == self)
                .map(|friendly| (kind, friendly))
        })
    }
}

/// Buildings whose locations are worth announcing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StructureKind {
    Hq,
    Refinery,
    DesignSchool,
    FulfillmentCenter,
}

impl StructureKind {
    pub const ALL: [StructureKind; 4] = [
        StructureKind::Hq,
        StructureKind::Refinery,
        StructureKind::DesignSchool,
        StructureKind::FulfillmentCenter,
    ];
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn codes_are_unique_and_reversible() {
        let codes: HashSet<i32> = Category::ALL.iter().map(|c| c.code()).collect();
        assert_eq!(codes.len(), Category::ALL.len());
        for category in Category::ALL {
            assert_eq!(Category::from_code(category.code()), Some(category));
        }
        assert_eq!(Category::from_code(0), None);
    }

    #[test]
    fn structure_categories_map_both_ways() {
        for kind in StructureKind::ALL {
            for friendly in [true, false] {
                let category = Category::locating(kind, friendly);
                assert_eq!(category.structure(), Some((kind, friendly)));
            }
        }
        assert_eq!(Category::KillOrder.structure(), None);
    }
}
