//! Players and their per-game records.
//!
//! ## PlayerId
//!
//! Type-safe player identifier. Indices are 0-based and double as the index
//! into `GameState::players`.
//!
//! ## Player
//!
//! Everything the engine tracks for one participant. Tags, complexity and
//! fecundity are derived from owned traits through the catalog rather than
//! stored.

use serde::{Deserialize, Serialize};

use crate::catalog::{BiomeId, Catalog, TagId, TagSet, TraitId};

/// Player identifier.
///
/// Player indices are 0-based: the first player is `PlayerId(0)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct PlayerId(pub u8);

impl PlayerId {
    /// Create a new player ID.
    #[must_use]
    pub const fn new(id: u8) -> Self {
        Self(id)
    }

    /// Get the raw player index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterate over all player IDs for a game with `player_count` players.
    ///
    /// ```
    /// use primeval::core::PlayerId;
    ///
    /// let players: Vec<_> = PlayerId::all(3).collect();
    /// assert_eq!(players, vec![PlayerId(0), PlayerId(1), PlayerId(2)]);
    /// ```
    pub fn all(player_count: usize) -> impl Iterator<Item = PlayerId> {
        (0..player_count.min(u8::MAX as usize) as u8).map(PlayerId)
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0)
    }
}

/// Irrevocable binding of a player to a biome.
///
/// Granted once when the specialization trait is acquired and never removed.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Specialization {
    /// Trait that created the binding.
    pub granted_by: TraitId,
    pub biome: BiomeId,
    /// Extra tag taken from the biome's bonus tags, if it had any.
    pub bonus_tag: Option<TagId>,
}

/// One entry of the per-era acquisition ledger.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Acquisition {
    pub era: u8,
    pub trait_id: TraitId,
    /// Alleles actually paid.
    pub cost: u32,
}

/// A participant's full record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    /// Ordinal colour index for the renderer.
    pub color: u8,
    /// Roster seat this player was created from.
    pub seat: u8,
    /// Owned traits in acquisition order.
    pub traits: Vec<TraitId>,
    pub acquisitions: Vec<Acquisition>,
    /// Traits dealt during the draw step.
    pub hand: Vec<TraitId>,
    /// Spendable currency.
    pub alleles: u32,
    /// Marker cap.
    pub markers: u32,
    pub markers_on_board: u32,
    pub tiles_controlled: u32,
    pub extinctions_survived: u32,
    pub specializations: Vec<Specialization>,
    /// Reproduction already rolled this era.
    pub has_rolled: bool,
}

impl Player {
    /// Create a player with no traits and the starting marker cap.
    #[must_use]
    pub fn new(id: PlayerId, name: impl Into<String>, seat: u8, markers: u32) -> Self {
        Self {
            id,
            name: name.into(),
            color: id.0,
            seat,
            traits: Vec::new(),
            acquisitions: Vec::new(),
            hand: Vec::new(),
            alleles: 0,
            markers,
            markers_on_board: 0,
            tiles_controlled: 0,
            extinctions_survived: 0,
            specializations: Vec::new(),
            has_rolled: false,
        }
    }

    #[must_use]
    pub fn owns(&self, trait_id: TraitId) -> bool {
        self.traits.contains(&trait_id)
    }

    /// Markers that can still be placed.
    #[must_use]
    pub fn unused_markers(&self) -> u32 {
        self.markers.saturating_sub(self.markers_on_board)
    }

    /// Tags from owned traits plus specialization tags.
    #[must_use]
    pub fn tags(&self, catalog: &Catalog) -> TagSet {
        let mut tags = TagSet::new();
        for def in self.traits.iter().filter_map(|&t| catalog.get_trait(t)) {
            tags.extend_from(&def.tags);
        }
        for tag in self.specializations.iter().filter_map(|s| s.bonus_tag) {
            tags.insert(tag);
        }
        tags
    }

    /// Summed complexity of owned traits.
    #[must_use]
    pub fn complexity(&self, catalog: &Catalog) -> u32 {
        self.traits
            .iter()
            .filter_map(|&t| catalog.get_trait(t))
            .map(|def| def.complexity)
            .sum()
    }

    /// Summed fecundity modifiers of owned traits.
    #[must_use]
    pub fn fecundity(&self, catalog: &Catalog) -> i32 {
        self.traits
            .iter()
            .filter_map(|&t| catalog.get_trait(t))
            .map(|def| def.fecundity_bonus)
            .sum()
    }

    /// True if the player is specialized in `biome`.
    #[must_use]
    pub fn specializes_in(&self, biome: BiomeId) -> bool {
        self.specializations.iter().any(|s| s.biome == biome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn catalog() -> Catalog {
        Catalog::from_json(
            r#"{
            "traits": [
                {"id": "gills", "name": "Gills", "era_min": 0, "era_max": 11, "cost": 2,
                 "complexity": 2, "tags": ["Aquatic"], "fecundity_bonus": 1},
                {"id": "fins", "name": "Fins", "era_min": 0, "era_max": 11, "cost": 2,
                 "complexity": 3, "tags": ["Aquatic", "Swimmer"], "fecundity_bonus": -1}
            ],
            "biomes": [{"id": "reef", "name": "Reef", "climates": ["tropical"],
                        "bonus_tags": ["Reef"]}],
            "events": [{"id": "quiet", "name": "Quiet", "type": "flavor"}]
        }"#,
        )
        .unwrap()
    }

    #[test]
    fn test_player_id_basics() {
        let p1 = PlayerId::new(1);
        assert_eq!(p1.index(), 1);
        assert_eq!(format!("{}", p1), "Player 1");
        assert_eq!(PlayerId::all(4).count(), 4);
    }

    #[test]
    fn test_new_player() {
        let player = Player::new(PlayerId::new(2), "Ada", 3, 6);

        assert!(player.traits.is_empty());
        assert_eq!(player.markers, 6);
        assert_eq!(player.unused_markers(), 6);
        assert_eq!(player.color, 2);
        assert_eq!(player.seat, 3);
    }

    #[test]
    fn test_derived_values() {
        let catalog = catalog();
        let mut player = Player::new(PlayerId::new(0), "Ada", 0, 6);
        player.traits.push(catalog.trait_id("gills").unwrap());
        player.traits.push(catalog.trait_id("fins").unwrap());

        assert_eq!(player.complexity(&catalog), 5);
        assert_eq!(player.fecundity(&catalog), 0);
        assert_eq!(player.tags(&catalog).len(), 2);
    }

    #[test]
    fn test_specialization_tags() {
        let catalog = catalog();
        let reef = catalog.biome_id("reef").unwrap();
        let reef_tag = catalog.tag_id("Reef").unwrap();
        let mut player = Player::new(PlayerId::new(0), "Ada", 0, 6);

        assert!(!player.specializes_in(reef));
        player.specializations.push(Specialization {
            granted_by: catalog.trait_id("gills").unwrap(),
            biome: reef,
            bonus_tag: Some(reef_tag),
        });

        assert!(player.specializes_in(reef));
        assert!(player.tags(&catalog).contains(reef_tag));
    }
}
