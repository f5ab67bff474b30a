//! Rule catalog: traits, biomes, events and organisms.
//!
//! ## Key Types
//!
//! - `TraitId`, `BiomeId`, `EventId`, `TagId`: interned identifiers
//! - `TraitDef`, `BiomeDef`, `EventDef`, `OrganismDef`: validated definitions
//! - `Catalog`: immutable lookup built once from a `CatalogSource`
//!
//! The engine only ever reads the catalog. Every cross reference is
//! resolved when the catalog is built, so a dangling trait or biome key is a
//! load error rather than a lookup failure mid-game.

pub mod definition;
pub mod registry;

pub use definition::{
    BiomeDef, BiomeId, Climate, EventDef, EventId, EventKind, OrganismDef, OrganismId, TagId,
    TagSet, TraitDef, TraitId,
};
pub use registry::{Catalog, CatalogError, CatalogSource};
