//! Catalog loading and lookup.
//!
//! [`CatalogSource`] mirrors the JSON data files. [`Catalog::build`] interns
//! every key and rejects dangling references up front, so the engine never
//! looks anything up by string during play.

use rustc_hash::FxHashMap;
use serde::Deserialize;

use super::definition::{
    BiomeDef, BiomeId, Climate, EventDef, EventId, EventKind, OrganismDef, OrganismId, TagId,
    TagSet, TraitDef, TraitId,
};
use crate::core::config::ERA_COUNT;

/// Errors raised while building a catalog.
#[derive(Debug, thiserror::Error)]
pub enum CatalogError {
    /// The source text was not valid catalog JSON.
    #[error("failed to parse catalog: {source}")]
    Parse {
        /// The underlying parse error.
        #[from]
        source: serde_json::Error,
    },

    /// Two entries of the same kind share a key.
    #[error("duplicate {kind} id `{key}`")]
    Duplicate {
        /// Table the duplicate was found in.
        kind: &'static str,
        /// The repeated key.
        key: String,
    },

    /// A trait references a trait that does not exist.
    #[error("`{owner}` references unknown trait `{key}`")]
    UnknownTrait {
        /// Entry holding the reference.
        owner: String,
        /// The missing trait key.
        key: String,
    },

    /// A biome transition names a biome that does not exist.
    #[error("biome `{owner}` transitions to unknown biome `{key}`")]
    UnknownBiome {
        /// Biome holding the reference.
        owner: String,
        /// The missing biome key.
        key: String,
    },

    /// An era window is inverted or past the last era.
    #[error("`{key}` has invalid era window {min}..={max}")]
    EraWindow {
        /// Offending entry.
        key: String,
        /// Window start.
        min: u8,
        /// Window end.
        max: u8,
    },

    /// An event's neutral roll is not a die face.
    #[error("event `{key}` has neutral roll {roll}, expected 1-6")]
    NeutralRoll {
        /// Offending event.
        key: String,
        /// The invalid roll.
        roll: u8,
    },

    /// A biome declares no climate bands.
    #[error("biome `{key}` lists no climates")]
    NoClimates {
        /// Offending biome.
        key: String,
    },

    /// A required table is empty.
    #[error("catalog has no {0}")]
    Empty(&'static str),

    /// More entries than ids can address.
    #[error("too many {0} entries")]
    TooMany(&'static str),
}

const DEFAULT_NEUTRAL_ROLL: u8 = 4;

fn default_color() -> String {
    "#888888".to_string()
}

fn default_event_kind() -> EventKind {
    EventKind::Extinction
}

/// Trait entry as written in the data files.
#[derive(Clone, Debug, Deserialize)]
pub struct TraitSource {
    pub id: String,
    pub name: String,
    pub era_min: u8,
    pub era_max: u8,
    pub cost: u32,
    #[serde(default)]
    pub complexity: u32,
    #[serde(default)]
    pub tags: Vec<String>,
    #[serde(default)]
    pub hard_prereqs: Vec<String>,
    #[serde(default)]
    pub alt_prereqs: Vec<Vec<String>>,
    #[serde(default)]
    pub soft_prereqs: Vec<String>,
    #[serde(default)]
    pub incompatible: Vec<String>,
    #[serde(default)]
    pub fecundity_bonus: i32,
    #[serde(default)]
    pub grants_specialization: bool,
}

/// Biome entry as written in the data files.
#[derive(Clone, Debug, Deserialize)]
pub struct BiomeSource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub required_tags: Vec<String>,
    #[serde(default)]
    pub bonus_tags: Vec<String>,
    pub climates: Vec<Climate>,
    #[serde(default)]
    pub transitions: Vec<String>,
    #[serde(default)]
    pub aquatic: bool,
    #[serde(default = "default_color")]
    pub color: String,
}

/// Event entry as written in the data files.
#[derive(Clone, Debug, Deserialize)]
pub struct EventSource {
    pub id: String,
    pub name: String,
    #[serde(rename = "type", default = "default_event_kind")]
    pub kind: EventKind,
    #[serde(default)]
    pub safe_tags: Vec<String>,
    #[serde(default)]
    pub doomed_tags: Vec<String>,
    /// Missing or null means 4.
    #[serde(default)]
    pub neutral_roll: Option<u8>,
}

/// Organism entry as written in the data files.
#[derive(Clone, Debug, Deserialize)]
pub struct OrganismSource {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub scientific_name: String,
    pub era_range: (u8, u8),
    pub traits: Vec<String>,
    #[serde(default)]
    pub complexity: u32,
    #[serde(default)]
    pub fun_fact: String,
}

/// Unvalidated catalog, one table per data file.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct CatalogSource {
    #[serde(default)]
    pub traits: Vec<TraitSource>,
    #[serde(default)]
    pub biomes: Vec<BiomeSource>,
    #[serde(default)]
    pub events: Vec<EventSource>,
    #[serde(default)]
    pub organisms: Vec<OrganismSource>,
}

/// Immutable, validated rule catalog.
///
/// ## Example
///
/// ```
/// use primeval::catalog::Catalog;
///
/// let catalog = Catalog::from_json(r#"{
///     "traits": [{"id": "gills", "name": "Gills", "era_min": 0, "era_max": 11,
///                 "cost": 2, "tags": ["Aquatic"]}],
///     "biomes": [{"id": "shallow_sea", "name": "Shallow Sea", "climates": ["temperate"]}],
///     "events": [{"id": "quiet", "name": "Quiet Era", "type": "flavor"}]
/// }"#).unwrap();
///
/// let gills = catalog.trait_id("gills").unwrap();
/// assert_eq!(catalog.get_trait(gills).unwrap().cost, 2);
/// ```
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    traits: Vec<TraitDef>,
    biomes: Vec<BiomeDef>,
    events: Vec<EventDef>,
    organisms: Vec<OrganismDef>,
    tag_names: Vec<String>,
    trait_keys: FxHashMap<String, TraitId>,
    biome_keys: FxHashMap<String, BiomeId>,
    event_keys: FxHashMap<String, EventId>,
    tag_keys: FxHashMap<String, TagId>,
}

fn dense_id(index: usize, kind: &'static str) -> Result<u16, CatalogError> {
    u16::try_from(index).map_err(|_| CatalogError::TooMany(kind))
}

fn check_window(key: &str, min: u8, max: u8) -> Result<(), CatalogError> {
    let last_era = (ERA_COUNT - 1) as u8;
    if min > max || max > last_era {
        return Err(CatalogError::EraWindow {
            key: key.to_string(),
            min,
            max,
        });
    }
    Ok(())
}

impl Catalog {
    /// Parse and validate a catalog from JSON text.
    pub fn from_json(text: &str) -> Result<Self, CatalogError> {
        let source: CatalogSource = serde_json::from_str(text)?;
        Self::build(source)
    }

    /// Validate a source catalog and intern every key.
    pub fn build(source: CatalogSource) -> Result<Self, CatalogError> {
        if source.biomes.is_empty() {
            return Err(CatalogError::Empty("biomes"));
        }
        if source.events.is_empty() {
            return Err(CatalogError::Empty("events"));
        }

        let mut catalog = Catalog::default();

        // Pass 1: assign ids so later references can resolve forwards.
        for (i, t) in source.traits.iter().enumerate() {
            let id = TraitId::new(dense_id(i, "trait")?);
            if catalog.trait_keys.insert(t.id.clone(), id).is_some() {
                return Err(CatalogError::Duplicate { kind: "trait", key: t.id.clone() });
            }
        }
        for (i, b) in source.biomes.iter().enumerate() {
            let id = BiomeId::new(dense_id(i, "biome")?);
            if catalog.biome_keys.insert(b.id.clone(), id).is_some() {
                return Err(CatalogError::Duplicate { kind: "biome", key: b.id.clone() });
            }
        }
        for (i, e) in source.events.iter().enumerate() {
            let id = EventId::new(dense_id(i, "event")?);
            if catalog.event_keys.insert(e.id.clone(), id).is_some() {
                return Err(CatalogError::Duplicate { kind: "event", key: e.id.clone() });
            }
        }

        // Pass 2: resolve references.
        for t in &source.traits {
            check_window(&t.id, t.era_min, t.era_max)?;
            let def = TraitDef {
                id: catalog.trait_keys[&t.id],
                key: t.id.clone(),
                name: t.name.clone(),
                era_min: t.era_min,
                era_max: t.era_max,
                cost: t.cost,
                complexity: t.complexity,
                tags: catalog.intern_tags(&t.tags)?,
                hard_prereqs: catalog.resolve_traits(&t.id, &t.hard_prereqs)?,
                alt_prereqs: t
                    .alt_prereqs
                    .iter()
                    .map(|set| catalog.resolve_traits(&t.id, set))
                    .collect::<Result<_, _>>()?,
                soft_prereqs: catalog.resolve_traits(&t.id, &t.soft_prereqs)?,
                incompatible: catalog.resolve_traits(&t.id, &t.incompatible)?,
                fecundity_bonus: t.fecundity_bonus,
                grants_specialization: t.grants_specialization,
            };
            catalog.traits.push(def);
        }

        for b in &source.biomes {
            if b.climates.is_empty() {
                return Err(CatalogError::NoClimates { key: b.id.clone() });
            }
            let transitions = b
                .transitions
                .iter()
                .map(|key| {
                    catalog.biome_keys.get(key).copied().ok_or_else(|| {
                        CatalogError::UnknownBiome {
                            owner: b.id.clone(),
                            key: key.clone(),
                        }
                    })
                })
                .collect::<Result<_, _>>()?;
            let def = BiomeDef {
                id: catalog.biome_keys[&b.id],
                key: b.id.clone(),
                name: b.name.clone(),
                required_tags: catalog.intern_tags(&b.required_tags)?,
                bonus_tags: catalog.intern_tags(&b.bonus_tags)?,
                climates: b.climates.clone(),
                transitions,
                aquatic: b.aquatic,
                color: b.color.clone(),
            };
            catalog.biomes.push(def);
        }

        for e in &source.events {
            let neutral_roll = e.neutral_roll.unwrap_or(DEFAULT_NEUTRAL_ROLL);
            if !(1..=6).contains(&neutral_roll) {
                return Err(CatalogError::NeutralRoll {
                    key: e.id.clone(),
                    roll: neutral_roll,
                });
            }
            let def = EventDef {
                id: catalog.event_keys[&e.id],
                key: e.id.clone(),
                name: e.name.clone(),
                kind: e.kind,
                safe_tags: catalog.intern_tags(&e.safe_tags)?,
                doomed_tags: catalog.intern_tags(&e.doomed_tags)?,
                neutral_roll,
            };
            catalog.events.push(def);
        }

        let mut organism_keys = FxHashMap::default();
        for (i, o) in source.organisms.iter().enumerate() {
            let id = OrganismId::new(dense_id(i, "organism")?);
            if organism_keys.insert(o.id.clone(), id).is_some() {
                return Err(CatalogError::Duplicate { kind: "organism", key: o.id.clone() });
            }
            let (era_min, era_max) = o.era_range;
            check_window(&o.id, era_min, era_max)?;
            let def = OrganismDef {
                id,
                key: o.id.clone(),
                name: o.name.clone(),
                scientific_name: o.scientific_name.clone(),
                era_min,
                era_max,
                traits: catalog.resolve_traits(&o.id, &o.traits)?,
                complexity: o.complexity,
                fun_fact: o.fun_fact.clone(),
            };
            catalog.organisms.push(def);
        }

        Ok(catalog)
    }

    fn intern_tags(&mut self, names: &[String]) -> Result<TagSet, CatalogError> {
        let mut set = TagSet::new();
        for name in names {
            let id = match self.tag_keys.get(name) {
                Some(&id) => id,
                None => {
                    let id = TagId::new(dense_id(self.tag_names.len(), "tag")?);
                    self.tag_names.push(name.clone());
                    self.tag_keys.insert(name.clone(), id);
                    id
                }
            };
            set.insert(id);
        }
        Ok(set)
    }

    fn resolve_traits(&self, owner: &str, keys: &[String]) -> Result<Vec<TraitId>, CatalogError> {
        keys.iter()
            .map(|key| {
                self.trait_keys
                    .get(key)
                    .copied()
                    .ok_or_else(|| CatalogError::UnknownTrait {
                        owner: owner.to_string(),
                        key: key.clone(),
                    })
            })
            .collect()
    }

    // === Lookup by id ===

    #[must_use]
    pub fn get_trait(&self, id: TraitId) -> Option<&TraitDef> {
        self.traits.get(id.index())
    }

    #[must_use]
    pub fn biome(&self, id: BiomeId) -> Option<&BiomeDef> {
        self.biomes.get(id.index())
    }

    #[must_use]
    pub fn event(&self, id: EventId) -> Option<&EventDef> {
        self.events.get(id.index())
    }

    #[must_use]
    pub fn organism(&self, id: OrganismId) -> Option<&OrganismDef> {
        self.organisms.get(id.index())
    }

    /// Display name of a tag.
    #[must_use]
    pub fn tag_name(&self, id: TagId) -> Option<&str> {
        self.tag_names.get(id.index()).map(String::as_str)
    }

    // === Lookup by key ===

    #[must_use]
    pub fn trait_id(&self, key: &str) -> Option<TraitId> {
        self.trait_keys.get(key).copied()
    }

    #[must_use]
    pub fn biome_id(&self, key: &str) -> Option<BiomeId> {
        self.biome_keys.get(key).copied()
    }

    #[must_use]
    pub fn event_id(&self, key: &str) -> Option<EventId> {
        self.event_keys.get(key).copied()
    }

    #[must_use]
    pub fn tag_id(&self, name: &str) -> Option<TagId> {
        self.tag_keys.get(name).copied()
    }

    // === Iteration ===

    pub fn traits(&self) -> impl Iterator<Item = &TraitDef> {
        self.traits.iter()
    }

    pub fn biomes(&self) -> impl Iterator<Item = &BiomeDef> {
        self.biomes.iter()
    }

    pub fn events(&self) -> impl Iterator<Item = &EventDef> {
        self.events.iter()
    }

    pub fn organisms(&self) -> impl Iterator<Item = &OrganismDef> {
        self.organisms.iter()
    }

    /// Biomes that can occur on a tile of the given climate.
    pub fn biomes_for(&self, climate: Climate) -> impl Iterator<Item = &BiomeDef> {
        self.biomes.iter().filter(move |b| b.suits(climate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BASE: &str = r#"{
        "traits": [
            {"id": "gills", "name": "Gills", "era_min": 0, "era_max": 4, "cost": 2,
             "tags": ["Aquatic"], "fecundity_bonus": 1},
            {"id": "lungs", "name": "Lungs", "era_min": 2, "era_max": 11, "cost": 3,
             "tags": ["Terrestrial", "Aquatic"], "hard_prereqs": ["gills"]}
        ],
        "biomes": [
            {"id": "reef", "name": "Reef", "climates": ["tropical"], "transitions": ["shore"],
             "bonus_tags": ["Aquatic"], "aquatic": true},
            {"id": "shore", "name": "Shore", "climates": ["temperate", "tropical"],
             "required_tags": ["Terrestrial"]}
        ],
        "events": [
            {"id": "ice", "name": "Ice Age", "type": "extinction",
             "safe_tags": ["Burrowing"], "doomed_tags": ["Aquatic"]}
        ]
    }"#;

    #[test]
    fn test_build_interns_keys() {
        let catalog = Catalog::from_json(BASE).unwrap();

        let gills = catalog.trait_id("gills").unwrap();
        let lungs = catalog.trait_id("lungs").unwrap();
        let lungs_def = catalog.get_trait(lungs).unwrap();

        assert_eq!(lungs_def.hard_prereqs, vec![gills]);
        assert_eq!(lungs_def.tags.len(), 2);

        let aquatic = catalog.tag_id("Aquatic").unwrap();
        assert!(catalog.get_trait(gills).unwrap().tags.contains(aquatic));
        assert_eq!(catalog.tag_name(aquatic), Some("Aquatic"));

        let reef = catalog.biome(catalog.biome_id("reef").unwrap()).unwrap();
        assert_eq!(reef.transitions, vec![catalog.biome_id("shore").unwrap()]);
    }

    #[test]
    fn test_event_defaults() {
        let catalog = Catalog::from_json(BASE).unwrap();
        let ice = catalog.event(catalog.event_id("ice").unwrap()).unwrap();

        assert_eq!(ice.neutral_roll, 4);
        assert_eq!(ice.kind, EventKind::Extinction);
    }

    #[test]
    fn test_dangling_trait_rejected() {
        let text = BASE.replace(r#""hard_prereqs": ["gills"]"#, r#""hard_prereqs": ["fins"]"#);
        let err = Catalog::from_json(&text).unwrap_err();

        assert!(matches!(err, CatalogError::UnknownTrait { ref key, .. } if key == "fins"));
    }

    #[test]
    fn test_dangling_biome_rejected() {
        let text = BASE.replace(r#""transitions": ["shore"]"#, r#""transitions": ["abyss"]"#);
        let err = Catalog::from_json(&text).unwrap_err();

        assert!(matches!(err, CatalogError::UnknownBiome { ref key, .. } if key == "abyss"));
    }

    #[test]
    fn test_duplicate_rejected() {
        let text = BASE.replace(r#""id": "lungs""#, r#""id": "gills""#);
        let err = Catalog::from_json(&text).unwrap_err();

        assert!(matches!(err, CatalogError::Duplicate { kind: "trait", .. }));
    }

    #[test]
    fn test_inverted_era_window_rejected() {
        let text = BASE.replace(r#""era_min": 2, "era_max": 11"#, r#""era_min": 6, "era_max": 3"#);
        let err = Catalog::from_json(&text).unwrap_err();

        assert!(matches!(err, CatalogError::EraWindow { min: 6, max: 3, .. }));
    }

    #[test]
    fn test_null_neutral_roll_defaults() {
        let text = BASE.replace(
            r#""type": "extinction","#,
            r#""type": "extinction", "neutral_roll": null,"#,
        );
        let catalog = Catalog::from_json(&text).unwrap();

        let ice = catalog.event(catalog.event_id("ice").unwrap()).unwrap();
        assert_eq!(ice.neutral_roll, 4);
    }

    #[test]
    fn test_bad_neutral_roll_rejected() {
        let text = BASE.replace(
            r#""type": "extinction","#,
            r#""type": "extinction", "neutral_roll": 9,"#,
        );
        let err = Catalog::from_json(&text).unwrap_err();

        assert!(matches!(err, CatalogError::NeutralRoll { roll: 9, .. }));
    }

    #[test]
    fn test_empty_tables_rejected() {
        let err = Catalog::build(CatalogSource::default()).unwrap_err();
        assert!(matches!(err, CatalogError::Empty("biomes")));
    }

    #[test]
    fn test_biomes_for_climate() {
        let catalog = Catalog::from_json(BASE).unwrap();

        let equatorial: Vec<_> = catalog
            .biomes_for(Climate::Equatorial)
            .map(|b| b.key.as_str())
            .collect();
        assert_eq!(equatorial, vec!["shore"]);

        let tropical: Vec<_> = catalog
            .biomes_for(Climate::Tropical)
            .map(|b| b.key.as_str())
            .collect();
        assert_eq!(tropical, vec!["reef", "shore"]);
    }
}
