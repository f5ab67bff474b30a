//! Validated rule definitions with interned identifiers.
//!
//! All ids are dense indices assigned by [`Catalog::build`](super::Catalog::build).
//! String keys from the data files only exist at load time and for display.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

macro_rules! catalog_id {
    ($(#[$meta:meta])* $name:ident, $label:literal) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        pub struct $name(pub u16);

        impl $name {
            /// Create an id from its raw index.
            #[must_use]
            pub const fn new(id: u16) -> Self {
                Self(id)
            }

            /// Raw index into the catalog table.
            #[must_use]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($label, "({})"), self.0)
            }
        }
    };
}

catalog_id!(
    /// Interned capability tag ("Aquatic", "Burrowing", ...).
    TagId,
    "Tag"
);
catalog_id!(
    /// Interned trait identifier.
    TraitId,
    "Trait"
);
catalog_id!(
    /// Interned biome identifier.
    BiomeId,
    "Biome"
);
catalog_id!(
    /// Interned event identifier.
    EventId,
    "Event"
);
catalog_id!(
    /// Interned organism identifier.
    OrganismId,
    "Organism"
);

/// Sorted, de-duplicated set of tags.
///
/// Tag sets are small (a handful per trait or biome), so a sorted inline
/// vector beats hashing for membership and intersection.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TagSet(SmallVec<[TagId; 8]>);

impl TagSet {
    /// Create an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a tag. Returns false if it was already present.
    pub fn insert(&mut self, tag: TagId) -> bool {
        match self.0.binary_search(&tag) {
            Ok(_) => false,
            Err(pos) => {
                self.0.insert(pos, tag);
                true
            }
        }
    }

    /// Add every tag of `other`.
    pub fn extend_from(&mut self, other: &TagSet) {
        for &tag in other.iter() {
            self.insert(tag);
        }
    }

    #[must_use]
    pub fn contains(&self, tag: TagId) -> bool {
        self.0.binary_search(&tag).is_ok()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &TagId> {
        self.0.iter()
    }

    /// Tags as a slice, in ascending id order.
    #[must_use]
    pub fn as_slice(&self) -> &[TagId] {
        &self.0
    }

    /// Number of tags present in both sets.
    #[must_use]
    pub fn overlap(&self, other: &TagSet) -> usize {
        self.0.iter().filter(|&&tag| other.contains(tag)).count()
    }

    /// True if any tag is present in both sets.
    #[must_use]
    pub fn intersects(&self, other: &TagSet) -> bool {
        self.0.iter().any(|&tag| other.contains(tag))
    }

    /// Tags present in both sets.
    #[must_use]
    pub fn intersection(&self, other: &TagSet) -> TagSet {
        self.0.iter().copied().filter(|&tag| other.contains(tag)).collect()
    }

    /// True if every tag of `self` is in `other`.
    #[must_use]
    pub fn is_subset(&self, other: &TagSet) -> bool {
        self.0.iter().all(|&tag| other.contains(tag))
    }
}

impl FromIterator<TagId> for TagSet {
    fn from_iter<I: IntoIterator<Item = TagId>>(iter: I) -> Self {
        let mut set = TagSet::new();
        for tag in iter {
            set.insert(tag);
        }
        set
    }
}

/// Latitude band of a tile. Fixed for the whole game.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Climate {
    Polar,
    Temperate,
    Tropical,
    Equatorial,
}

impl Climate {
    /// Zone used when matching biomes to tiles.
    ///
    /// The equatorial band shares the temperate zone.
    #[must_use]
    pub const fn zone(self) -> Climate {
        match self {
            Climate::Equatorial => Climate::Temperate,
            other => other,
        }
    }
}

/// An acquirable trait.
#[derive(Clone, Debug, PartialEq)]
pub struct TraitDef {
    pub id: TraitId,
    /// Key from the data files (`"gills"`).
    pub key: String,
    pub name: String,
    /// First era the trait can be bought in (inclusive).
    pub era_min: u8,
    /// Last era the trait can be bought in (inclusive).
    pub era_max: u8,
    pub cost: u32,
    pub complexity: u32,
    /// Tags granted to the owner.
    pub tags: TagSet,
    /// All must be owned, unless one alternate set is owned instead.
    pub hard_prereqs: Vec<TraitId>,
    pub alt_prereqs: Vec<Vec<TraitId>>,
    /// Each owned soft prerequisite discounts the cost by one (max 3).
    pub soft_prereqs: Vec<TraitId>,
    pub incompatible: Vec<TraitId>,
    /// Added to every reproduction roll.
    pub fecundity_bonus: i32,
    /// Acquiring this trait binds the owner to a biome.
    pub grants_specialization: bool,
}

impl TraitDef {
    /// True if `era` is inside the trait's window.
    #[must_use]
    pub fn available_in(&self, era: u8) -> bool {
        (self.era_min..=self.era_max).contains(&era)
    }
}

/// A biome a tile can carry.
#[derive(Clone, Debug, PartialEq)]
pub struct BiomeDef {
    pub id: BiomeId,
    pub key: String,
    pub name: String,
    /// Tags a player needs before placing markers here.
    pub required_tags: TagSet,
    /// Tags that add competition strength and drive event outcomes.
    pub bonus_tags: TagSet,
    /// Climate bands the biome can occur in.
    pub climates: Vec<Climate>,
    /// Biomes this one can turn into on a tile flip.
    pub transitions: Vec<BiomeId>,
    pub aquatic: bool,
    /// Display colour for the renderer.
    pub color: String,
}

impl BiomeDef {
    /// True if the biome can occur on a tile of the given climate.
    #[must_use]
    pub fn suits(&self, climate: Climate) -> bool {
        self.climates.iter().any(|c| c.zone() == climate.zone())
    }
}

/// Kind of era event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Selection pressure: markers are tested against safe/doomed tags.
    Extinction,
    /// Narrative only; resolves without losses.
    Flavor,
}

/// An era event card.
#[derive(Clone, Debug, PartialEq)]
pub struct EventDef {
    pub id: EventId,
    pub key: String,
    pub name: String,
    pub kind: EventKind,
    pub safe_tags: TagSet,
    pub doomed_tags: TagSet,
    /// Neutral tiles survive on a roll at or above this value.
    pub neutral_roll: u8,
}

/// A real organism used for end-of-game matching.
#[derive(Clone, Debug, PartialEq)]
pub struct OrganismDef {
    pub id: OrganismId,
    pub key: String,
    pub name: String,
    pub scientific_name: String,
    pub era_min: u8,
    pub era_max: u8,
    pub traits: Vec<TraitId>,
    pub complexity: u32,
    pub fun_fact: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tags(ids: &[u16]) -> TagSet {
        ids.iter().map(|&i| TagId::new(i)).collect()
    }

    #[test]
    fn test_tag_set_sorted_unique() {
        let mut set = tags(&[5, 1, 3]);
        assert!(!set.insert(TagId::new(3)));
        assert!(set.insert(TagId::new(2)));

        assert_eq!(
            set.as_slice(),
            &[TagId::new(1), TagId::new(2), TagId::new(3), TagId::new(5)]
        );
    }

    #[test]
    fn test_tag_set_relations() {
        let a = tags(&[1, 2, 3]);
        let b = tags(&[2, 3, 4]);

        assert_eq!(a.overlap(&b), 2);
        assert!(a.intersects(&b));
        assert_eq!(a.intersection(&b), tags(&[2, 3]));
        assert!(tags(&[2]).is_subset(&a));
        assert!(!tags(&[4]).is_subset(&a));
        assert!(TagSet::new().is_subset(&a));
        assert!(!TagSet::new().intersects(&a));
    }

    #[test]
    fn test_climate_zone() {
        assert_eq!(Climate::Equatorial.zone(), Climate::Temperate);
        assert_eq!(Climate::Tropical.zone(), Climate::Tropical);
        assert_eq!(Climate::Polar.zone(), Climate::Polar);
    }

    #[test]
    fn test_id_display() {
        assert_eq!(format!("{}", TraitId::new(4)), "Trait(4)");
        assert_eq!(BiomeId::new(2).index(), 2);
    }
}
