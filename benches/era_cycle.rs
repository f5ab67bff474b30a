//! Benchmarks for full games and snapshot encoding.

use std::hint::black_box;
use std::sync::Arc;

use criterion::{criterion_group, criterion_main, Criterion};
use primeval::catalog::Catalog;
use primeval::core::{EngineConfig, GameMode, GameRng, GameState, Intent, RandomSource};
use primeval::rules::Engine;
use primeval::simulation::{CladeSpecialist, Generalist, Policy, SimulationConfig, Simulator};

const CATALOG_JSON: &str = include_str!("../data/catalog.json");

fn engine() -> Engine {
    let catalog = Catalog::from_json(CATALOG_JSON).expect("bundled catalog");
    Engine::new(Arc::new(catalog), EngineConfig::default()).expect("default config")
}

/// Play to the end, rolling every era and ending every turn and phase.
fn play_out(engine: &Engine, mode: GameMode, names: &[&str], seed: u64) -> GameState {
    let mut rng = GameRng::new(seed);
    let mut state = engine.new_game(mode, names, &mut rng).expect("setup");
    while !state.is_over() {
        let Some(acting) = state.acting_player() else { break };
        let rolled = state.player(acting).is_some_and(|p| p.has_rolled);
        let intent = if state.phase.is_per_player() {
            if state.phase == primeval::rules::Phase::AlleleRoll && !rolled {
                Intent::RollReproduction { die: rng.roll_d6() }
            } else {
                Intent::EndTurn
            }
        } else {
            Intent::EndPhase
        };
        if engine.apply_intent(&mut state, acting, &intent, &mut rng).is_err() {
            break;
        }
    }
    state
}

fn bench_solo_game(c: &mut Criterion) {
    let engine = engine();
    c.bench_function("solo_game", |b| {
        b.iter(|| black_box(play_out(&engine, GameMode::Solo, &["Ada"], black_box(42))));
    });
}

fn bench_four_player_game(c: &mut Criterion) {
    let engine = engine();
    let names = ["Ada", "Bo", "Cy", "Di"];
    c.bench_function("four_player_game", |b| {
        b.iter(|| black_box(play_out(&engine, GameMode::Local, &names, black_box(7))));
    });
}

fn bench_snapshot(c: &mut Criterion) {
    let engine = engine();
    let state = play_out(&engine, GameMode::Local, &["Ada", "Bo", "Cy", "Di"], 7);

    c.bench_function("snapshot_clone", |b| b.iter(|| black_box(state.clone())));
    c.bench_function("snapshot_json", |b| {
        b.iter(|| black_box(state.to_json().expect("encode")));
    });
    c.bench_function("snapshot_bincode", |b| {
        b.iter(|| black_box(state.to_bytes().expect("encode")));
    });
}

fn bench_simulation(c: &mut Criterion) {
    let engine = engine();
    let catalog = engine.catalog();
    let simulator = Simulator::new(&engine, SimulationConfig::default().with_games(4));
    c.bench_function("simulation_batch", |b| {
        b.iter(|| {
            let mut policies: Vec<Box<dyn Policy>> = vec![
                Box::new(Generalist::new(catalog)),
                Box::new(CladeSpecialist::toward(catalog, "mammoth").expect("bundled organism")),
            ];
            black_box(simulator.run(&mut policies).expect("batch"))
        });
    });
}

criterion_group!(
    benches,
    bench_solo_game,
    bench_four_player_game,
    bench_snapshot,
    bench_simulation
);
criterion_main!(benches);
