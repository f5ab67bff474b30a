//! The draw step: reveal the era's event and refill hands.

use serde::{Deserialize, Serialize};

use crate::catalog::{Catalog, EventId, TraitId};
use crate::core::rng::shuffle;
use crate::core::{EngineConfig, GameState, PlayerId, RandomSource};

/// What the draw step revealed and dealt.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawReport {
    /// Event that will resolve at the end of this era.
    pub event: Option<EventId>,
    /// The discard pile was shuffled back into the deck first.
    pub reshuffled: bool,
    /// Traits newly dealt to each player.
    pub dealt: Vec<(PlayerId, Vec<TraitId>)>,
}

/// Move the previous event to the discard and reveal the top of the deck.
///
/// An empty deck is rebuilt from the shuffled discard pile. Returns the new
/// event and whether a reshuffle happened.
pub fn reveal_event(state: &mut GameState, rng: &mut dyn RandomSource) -> (Option<EventId>, bool) {
    if let Some(previous) = state.current_event.take() {
        state.event_discard.push_back(previous);
    }
    let mut reshuffled = false;
    if state.event_deck.is_empty() && !state.event_discard.is_empty() {
        let mut pile: Vec<EventId> = state.event_discard.iter().copied().collect();
        shuffle(rng, &mut pile);
        state.event_deck = pile.into_iter().collect();
        state.event_discard.clear();
        reshuffled = true;
    }
    state.current_event = state.event_deck.pop_front();
    (state.current_event, reshuffled)
}

/// Prune hands to what is still buyable and top them up to `hand_size`.
///
/// Dealt traits are drawn without repeats from those available this era that
/// the player neither owns nor already holds.
pub fn refill_hands(
    catalog: &Catalog,
    config: &EngineConfig,
    state: &mut GameState,
    rng: &mut dyn RandomSource,
) -> Vec<(PlayerId, Vec<TraitId>)> {
    let era = state.era;
    let mut dealt = Vec::with_capacity(state.players.len());

    for player in &mut state.players {
        let owned = player.traits.clone();
        player.hand.retain(|&t| {
            !owned.contains(&t) && catalog.get_trait(t).is_some_and(|d| d.available_in(era))
        });
        let mut pool: Vec<TraitId> = catalog
            .traits()
            .filter(|d| d.available_in(era))
            .map(|d| d.id)
            .filter(|t| !owned.contains(t) && !player.hand.contains(t))
            .collect();
        shuffle(rng, &mut pool);

        let wanted = config.hand_size.saturating_sub(player.hand.len());
        let new: Vec<TraitId> = pool.into_iter().take(wanted).collect();
        player.hand.extend_from_slice(&new);
        dealt.push((player.id, new));
    }
    dealt
}
