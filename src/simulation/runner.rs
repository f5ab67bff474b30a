//! Batch play and aggregate statistics.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::policy::Policy;
use crate::catalog::{Catalog, TraitId};
use crate::core::{ActionError, GameMode, GameRng, Intent, PlayerId, SetupError};
use crate::rules::{Engine, GameResult};
use crate::scoring::{self, Score};

/// Settings for a batch of simulated games.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub games: u32,
    pub players: usize,
    pub mode: GameMode,
    /// Game `n` is seeded with `seed + n`.
    pub seed: u64,
    /// Intents applied before a game is abandoned.
    pub max_intents: usize,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            games: 100,
            players: 4,
            mode: GameMode::Local,
            seed: 0,
            max_intents: 10_000,
        }
    }
}

impl SimulationConfig {
    pub fn with_games(mut self, games: u32) -> Self {
        self.games = games;
        self
    }

    pub fn with_players(mut self, players: usize) -> Self {
        self.players = players;
        self
    }

    /// Solo mode, one seat.
    pub fn solo(mut self) -> Self {
        self.mode = GameMode::Solo;
        self.players = 1;
        self
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }
}

#[derive(Debug, Error)]
pub enum SimulationError {
    #[error("no policies to seat")]
    NoPolicies,

    #[error(transparent)]
    Setup(#[from] SetupError),

    #[error("{policy} chose {intent:?}, which was rejected: {source}")]
    Rejected {
        policy: String,
        intent: Intent,
        #[source]
        source: ActionError,
    },
}

/// One seat at the end of a game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SeatSummary {
    pub player: PlayerId,
    /// Index into the policy list.
    pub policy: usize,
    pub score: Score,
    pub extinctions_survived: u32,
    pub traits: Vec<TraitId>,
    pub won: bool,
}

/// One finished (or abandoned) game.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct GameSummary {
    pub seed: u64,
    pub era: u8,
    pub intents: usize,
    /// `None` when the game hit the intent limit.
    pub result: Option<GameResult>,
    pub seats: Vec<SeatSummary>,
}

/// Totals for every seat a policy played.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PolicyStats {
    pub name: String,
    pub seats: u32,
    pub wins: u32,
    pub total_score: u64,
    pub min_score: u32,
    pub max_score: u32,
    pub total_markers: u64,
    pub total_extinctions_survived: u64,
}

impl PolicyStats {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            seats: 0,
            wins: 0,
            total_score: 0,
            min_score: u32::MAX,
            max_score: 0,
            total_markers: 0,
            total_extinctions_survived: 0,
        }
    }

    fn add(&mut self, seat: &SeatSummary) {
        self.seats += 1;
        self.wins += u32::from(seat.won);
        self.total_score += u64::from(seat.score.total);
        self.min_score = self.min_score.min(seat.score.total);
        self.max_score = self.max_score.max(seat.score.total);
        self.total_markers += u64::from(seat.score.markers_on_board);
        self.total_extinctions_survived += u64::from(seat.extinctions_survived);
    }

    #[must_use]
    pub fn mean_score(&self) -> f64 {
        mean(self.total_score, self.seats)
    }

    /// Average markers left on the board.
    #[must_use]
    pub fn mean_markers(&self) -> f64 {
        mean(self.total_markers, self.seats)
    }
}

/// How often a trait ended up owned.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitPick {
    pub trait_id: TraitId,
    pub picks: u32,
    /// Share of all seats that owned it.
    pub rate: f64,
}

/// Aggregate over a batch.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BatchReport {
    pub games: u32,
    /// Games that reached the intent limit.
    pub abandoned: u32,
    /// Solo only.
    pub survived: u32,
    pub extinct: u32,
    pub policies: Vec<PolicyStats>,
    /// Most picked first, catalog order on ties.
    pub trait_picks: Vec<TraitPick>,
}

impl BatchReport {
    /// Wins divided by games played.
    #[must_use]
    pub fn win_rate(&self, policy: usize) -> f64 {
        self.policies
            .get(policy)
            .map_or(0.0, |p| mean(u64::from(p.wins), self.games))
    }

    /// Gap between the best and worst win rate.
    #[must_use]
    pub fn win_rate_spread(&self) -> f64 {
        let rates: Vec<f64> = (0..self.policies.len()).map(|i| self.win_rate(i)).collect();
        let max = rates.iter().copied().fold(f64::MIN, f64::max);
        let min = rates.iter().copied().fold(f64::MAX, f64::min);
        if rates.is_empty() {
            0.0
        } else {
            max - min
        }
    }

    /// True when every policy's win rate is within `tolerance` of the others.
    #[must_use]
    pub fn is_balanced(&self, tolerance: f64) -> bool {
        self.win_rate_spread() < tolerance
    }
}

fn mean(total: u64, count: u32) -> f64 {
    if count == 0 {
        0.0
    } else {
        total as f64 / f64::from(count)
    }
}

/// Plays games with automated policies.
///
/// Seat `i` is played by `policies[i % policies.len()]`.
pub struct Simulator<'a> {
    engine: &'a Engine,
    config: SimulationConfig,
}

impl<'a> Simulator<'a> {
    pub fn new(engine: &'a Engine, config: SimulationConfig) -> Self {
        Self { engine, config }
    }

    #[must_use]
    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Play one game from `seed` to its end or the intent limit.
    pub fn play_game(
        &self,
        policies: &mut [Box<dyn Policy>],
        seed: u64,
    ) -> Result<GameSummary, SimulationError> {
        if policies.is_empty() {
            return Err(SimulationError::NoPolicies);
        }
        let count = policies.len();
        let names: Vec<String> = (0..self.config.players)
            .map(|i| format!("{} #{}", policies[i % count].name(), i + 1))
            .collect();
        let mut rng = GameRng::new(seed);
        let mut state = self.engine.new_game(self.config.mode, &names, &mut rng)?;

        let mut intents = 0;
        while !state.is_over() && intents < self.config.max_intents {
            let Some(player) = state.acting_player() else {
                break;
            };
            let legal = self.engine.legal_intents(&state, player);
            let seat = state.player(player).map_or(0, |p| usize::from(p.seat));
            let policy = &mut policies[seat % count];
            let Some(intent) = policy.choose(self.engine, &state, player, &legal, &mut rng) else {
                break;
            };
            if let Err(source) = self.engine.apply_intent(&mut state, player, &intent, &mut rng) {
                return Err(SimulationError::Rejected {
                    policy: policy.name().to_string(),
                    intent,
                    source,
                });
            }
            intents += 1;
        }

        let result = self.engine.is_terminal(&state);
        let scores = scoring::final_scores(self.engine.catalog(), self.engine.config(), &state);
        let seats = state
            .players
            .iter()
            .zip(scores)
            .map(|(player, score)| SeatSummary {
                player: player.id,
                policy: usize::from(player.seat) % count,
                score,
                extinctions_survived: player.extinctions_survived,
                traits: player.traits.clone(),
                won: result.as_ref().is_some_and(|r| r.is_winner(player.id)),
            })
            .collect();

        tracing::debug!(seed, era = state.era, intents, ?result, "simulated game");
        Ok(GameSummary {
            seed,
            era: state.era,
            intents,
            result,
            seats,
        })
    }

    /// Play the configured number of games and aggregate them.
    pub fn run(&self, policies: &mut [Box<dyn Policy>]) -> Result<BatchReport, SimulationError> {
        if policies.is_empty() {
            return Err(SimulationError::NoPolicies);
        }
        let mut stats: Vec<PolicyStats> =
            policies.iter().map(|p| PolicyStats::new(p.name())).collect();
        let mut picks = vec![0u32; self.engine.catalog().traits().count()];
        let mut report = BatchReport {
            games: self.config.games,
            abandoned: 0,
            survived: 0,
            extinct: 0,
            policies: Vec::new(),
            trait_picks: Vec::new(),
        };

        for game in 0..self.config.games {
            let seed = self.config.seed.wrapping_add(u64::from(game));
            let summary = self.play_game(policies, seed)?;
            match summary.result {
                None => report.abandoned += 1,
                Some(GameResult::Survived) => report.survived += 1,
                Some(GameResult::Extinct) => report.extinct += 1,
                Some(GameResult::Winner(_)) => {}
            }
            for seat in &summary.seats {
                stats[seat.policy].add(seat);
                for trait_id in &seat.traits {
                    if let Some(count) = picks.get_mut(trait_id.index()) {
                        *count += 1;
                    }
                }
            }
        }

        let total_seats: u32 = stats.iter().map(|s| s.seats).sum();
        report.trait_picks = rank_picks(self.engine.catalog(), &picks, total_seats);
        report.policies = stats;

        tracing::info!(
            games = report.games,
            abandoned = report.abandoned,
            spread = report.win_rate_spread(),
            "simulation batch finished"
        );
        Ok(report)
    }
}

fn rank_picks(catalog: &Catalog, picks: &[u32], seats: u32) -> Vec<TraitPick> {
    let mut ranked: Vec<TraitPick> = catalog
        .traits()
        .map(|def| {
            let count = picks.get(def.id.index()).copied().unwrap_or(0);
            TraitPick {
                trait_id: def.id,
                picks: count,
                rate: mean(u64::from(count), seats),
            }
        })
        .collect();
    ranked.sort_by_key(|p| std::cmp::Reverse(p.picks));
    ranked
}

/// Complexity bought per allele, for spotting outlier traits.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraitValue {
    pub trait_id: TraitId,
    pub ratio: f64,
    /// Carries a tag some event names as safe.
    pub survival: bool,
}

/// Every trait with a non-zero cost, best value first.
#[must_use]
pub fn trait_values(catalog: &Catalog) -> Vec<TraitValue> {
    let mut values: Vec<TraitValue> = catalog
        .traits()
        .filter(|def| def.cost > 0)
        .map(|def| TraitValue {
            trait_id: def.id,
            ratio: f64::from(def.complexity) / f64::from(def.cost),
            survival: catalog.events().any(|e| def.tags.intersects(&e.safe_tags)),
        })
        .collect();
    values.sort_by(|a, b| b.ratio.total_cmp(&a.ratio));
    values
}
