//! Game and session configuration.
//!
//! Rule constants live in [`EngineConfig`]; networking bounds live in
//! [`SessionConfig`]. Both deserialize from TOML with every field optional:
//!
//! ```
//! use primeval::core::EngineConfig;
//!
//! let config = EngineConfig::from_toml_str("hand_size = 4\nboard_radius = 2").unwrap();
//! assert_eq!(config.hand_size, 4);
//! assert_eq!(config.starting_markers, 6);
//! ```

use serde::{Deserialize, Serialize};

/// Number of eras in a game.
pub const ERA_COUNT: usize = 12;

/// Maximum participants in one game.
pub const MAX_PLAYERS: usize = 4;

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The TOML text could not be parsed.
    #[error("failed to parse config TOML: {source}")]
    Toml {
        /// The underlying parse error.
        #[from]
        source: toml::de::Error,
    },

    /// A value parsed but is outside its allowed range.
    #[error("invalid config value for `{field}`: {reason}")]
    Invalid {
        /// Name of the offending field.
        field: &'static str,
        /// What is wrong with it.
        reason: String,
    },
}

fn invalid(field: &'static str, reason: impl Into<String>) -> ConfigError {
    ConfigError::Invalid {
        field,
        reason: reason.into(),
    }
}

/// How a game is being played.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GameMode {
    /// Hot-seat play on one device.
    #[default]
    Local,
    /// Peer-to-peer session with a host-authoritative state.
    Networked,
    /// One player against the rival population.
    Solo,
}

/// Rule constants consumed by the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Marker cap every player starts with.
    pub starting_markers: u32,
    /// Hard ceiling on the marker cap.
    pub max_markers: u32,
    /// Marker cap growth per era.
    pub markers_per_era: u32,
    /// Traits dealt to each hand during the draw step.
    pub hand_size: usize,
    /// Markers-on-board thresholds for the population bonus (+1 each).
    pub population_tiers: [u32; 3],
    /// Summed complexity thresholds for the trait surcharge (+1 each).
    pub complexity_tiers: [u32; 3],
    /// Maximum discount from owned soft prerequisites.
    pub soft_discount_cap: u32,
    /// Strength margin at which the runner-up is displaced.
    pub displacement_margin: u32,
    /// Strength bonus for a specialist on its own biome.
    pub specialization_bonus: u32,
    /// Largest random offset added to a flipped tile's era-lock.
    pub era_lock_max_offset: u32,
    /// Radius of the hexagonal board, in tiles.
    pub board_radius: u32,
    /// Events drawn into the deck at game start.
    pub event_deck_size: usize,
    /// Score per controlled tile at game end.
    pub tile_score: u32,
    /// Chance (percent) of one extra rival in a spawn.
    pub rival_spawn_bonus_chance: u32,
    /// Chance (percent) a spawn prefers tiles next to existing rivals.
    pub rival_adjacent_weight: u32,
    /// Chance (percent) each rival tile spreads to a neighbour.
    pub rival_spread_chance: u32,
    /// Chance (percent) a non-doomed rival tile loses half its rivals.
    pub rival_loss_chance: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            starting_markers: 6,
            max_markers: 12,
            markers_per_era: 1,
            hand_size: 3,
            population_tiers: [4, 7, 10],
            complexity_tiers: [6, 11, 16],
            soft_discount_cap: 3,
            displacement_margin: 3,
            specialization_bonus: 3,
            era_lock_max_offset: 2,
            board_radius: 3,
            event_deck_size: ERA_COUNT,
            tile_score: 3,
            rival_spawn_bonus_chance: 50,
            rival_adjacent_weight: 70,
            rival_spread_chance: 40,
            rival_loss_chance: 50,
        }
    }
}

impl EngineConfig {
    /// Parse from TOML text and validate.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Check value ranges.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.starting_markers == 0 {
            return Err(invalid("starting_markers", "must be at least 1"));
        }
        if self.starting_markers > self.max_markers {
            return Err(invalid(
                "starting_markers",
                format!("{} exceeds max_markers {}", self.starting_markers, self.max_markers),
            ));
        }
        if self.board_radius == 0 {
            return Err(invalid("board_radius", "must be at least 1"));
        }
        if self.event_deck_size == 0 {
            return Err(invalid("event_deck_size", "must be at least 1"));
        }
        for (field, value) in [
            ("rival_spawn_bonus_chance", self.rival_spawn_bonus_chance),
            ("rival_adjacent_weight", self.rival_adjacent_weight),
            ("rival_spread_chance", self.rival_spread_chance),
            ("rival_loss_chance", self.rival_loss_chance),
        ] {
            if value > 100 {
                return Err(invalid(field, format!("{value} is not a percentage")));
            }
        }
        if !self.population_tiers.windows(2).all(|w| w[0] <= w[1]) {
            return Err(invalid("population_tiers", "must be ascending"));
        }
        if !self.complexity_tiers.windows(2).all(|w| w[0] <= w[1]) {
            return Err(invalid("complexity_tiers", "must be ascending"));
        }
        Ok(())
    }
}

/// Bounds for a networked session.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Seats in the roster.
    pub slot_count: usize,
    /// Chat messages retained by the host.
    pub chat_history: usize,
    /// Most recent chat messages included in a welcome.
    pub welcome_chat: usize,
    /// Longest chat text accepted, in characters.
    pub max_chat_len: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            slot_count: MAX_PLAYERS,
            chat_history: 100,
            welcome_chat: 20,
            max_chat_len: 500,
        }
    }
}

impl SessionConfig {
    /// Parse from TOML text and validate.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(text)?;
        if config.slot_count == 0 || config.slot_count > MAX_PLAYERS {
            return Err(invalid(
                "slot_count",
                format!("{} is outside 1-{MAX_PLAYERS}", config.slot_count),
            ));
        }
        if config.welcome_chat > config.chat_history {
            return Err(invalid("welcome_chat", "exceeds chat_history"));
        }
        Ok(config)
    }
}
