//! Engine tests — batches, checkpoints, diagnostics and determinism.

use martingale_core::{
    account::Account,
    config::SimConfig,
    engine::SimEngine,
    error::SimError,
    event::{EventLog, SimEvent},
};

fn build_engine(seed: u64, iterations: u64) -> SimEngine {
    let _ = env_logger::builder().is_test(true).try_init();
    SimEngine::new(SimConfig::new(1.0, 2.0, iterations, 100), Account::new(200), seed)
}

#[test]
fn progress_checkpoints_are_clamped_to_iterations() {
    let engine = build_engine(1, 200);
    assert_eq!(engine.verify_progress_checkpoints(100), 100);
    assert_eq!(engine.verify_progress_checkpoints(200), 200);
    assert_eq!(engine.verify_progress_checkpoints(300), 200);
    assert_eq!(engine.verify_progress_checkpoints(-100), 200);
    assert_eq!(engine.verify_progress_checkpoints(0), 200);
}

#[test]
fn run_aggregates_every_iteration() {
    let engine = build_engine(42, 200);
    let mut log = EventLog::new();

    let aggregate = engine.run(50, &mut log).expect("run");

    assert_eq!(aggregate.trial_count(), 200);
    assert!(aggregate.average_rounds_to_ruin() > 0.0);
    assert_eq!(aggregate.mean_balance_series()[0], 200.0,
        "Every trial starts from the canonical balance");
    assert_eq!(aggregate.median_balance_series()[0], 200.0);
    assert!(aggregate.median_balance_series().len() <= aggregate.mean_balance_series().len());
}

#[test]
fn progress_reports_each_checkpoint_once() {
    let engine = build_engine(42, 200);
    let mut log = EventLog::new();
    engine.run(50, &mut log).expect("run");

    let progress = log.progress();
    assert_eq!(progress.len(), 50, "Expected one notification per checkpoint");
    assert_eq!(progress[0], 2.0);
    assert_eq!(progress[49], 100.0, "Last checkpoint must report completion");
    assert!(progress.windows(2).all(|w| w[0] < w[1]), "Progress must increase");
}

#[test]
fn uneven_checkpoints_fire_after_crossing_trial() {
    let engine = build_engine(7, 7);
    let mut log = EventLog::new();
    engine.run(3, &mut log).expect("run");

    let completed: Vec<u64> = log
        .events
        .iter()
        .filter_map(|e| match e {
            SimEvent::ProgressCheckpoint { completed, .. } => Some(*completed),
            _ => None,
        })
        .collect();
    assert_eq!(completed, vec![3, 5, 7]);
    assert_eq!(log.progress().last().copied(), Some(100.0));
}

#[test]
fn out_of_range_checkpoints_fall_back_to_iterations() {
    let engine = build_engine(3, 20);
    let mut log = EventLog::new();
    engine.run(-5, &mut log).expect("run");
    assert_eq!(log.progress().len(), 20);
}

#[test]
fn events_open_and_close_the_run() {
    let engine = build_engine(5, 10);
    let mut log = EventLog::new();
    engine.run(5, &mut log).expect("run");

    assert!(matches!(log.events.first(), Some(SimEvent::RunStarted { progress_checkpoints: 5, .. })));
    assert!(matches!(log.events.last(), Some(SimEvent::RunCompleted { trial_count: 10, .. })));
    assert_eq!(log.count("payout_out_of_range"), 0);
}

#[test]
fn same_seed_produces_identical_results() {
    const SEED: u64 = 0xDEAD_BEEF_CAFE_1234;
    let engine_a = build_engine(SEED, 100);
    let engine_b = build_engine(SEED, 100);

    let a = engine_a.run(10, &mut EventLog::new()).expect("engine_a run");
    let b = engine_b.run(10, &mut EventLog::new()).expect("engine_b run");

    assert_eq!(a, b, "Same seed must reproduce the whole batch");
}

#[test]
fn different_seeds_produce_different_results() {
    let a = build_engine(42, 50).run(1, &mut EventLog::new()).expect("run a");
    let b = build_engine(99, 50).run(1, &mut EventLog::new()).expect("run b");
    assert_ne!(a.mean_balance_series(), b.mean_balance_series(),
        "Different seeds produced identical batches — seed is not being used");
}

#[test]
fn single_trial_replays_from_seed() {
    let engine = build_engine(11, 10);
    let again = build_engine(11, 10);
    assert_eq!(engine.run_trial(3), again.run_trial(3));
    assert_eq!(engine.run_trial(3).balances()[0], 200);
}

#[test]
fn degenerate_trials_warn_but_still_count() {
    let _ = env_logger::builder().is_test(true).try_init();
    let engine = SimEngine::new(SimConfig::new(2.0, 2.0, 5, 100), Account::new(1), 9);
    let mut log = EventLog::new();

    let aggregate = engine.run(5, &mut log).expect("run");

    assert_eq!(log.count("degenerate_trial"), 5, "Every trial should be flagged");
    assert_eq!(aggregate.trial_count(), 5, "Degenerate trials still count");
    assert_eq!(aggregate.average_rounds_to_ruin(), 0.0);
    assert_eq!(aggregate.mean_balance_series(), &[1.0]);
    assert_eq!(aggregate.median_balance_series(), &[1.0]);
}

#[test]
fn invalid_payout_is_flagged_not_rejected() {
    let _ = env_logger::builder().is_test(true).try_init();
    let engine = SimEngine::new(SimConfig::new(1.0, 10_000.0, 4, 100), Account::new(20), 13);
    let mut log = EventLog::new();

    let aggregate = engine.run(4, &mut log).expect("run should proceed");

    assert_eq!(log.count("payout_out_of_range"), 1);
    assert_eq!(aggregate.trial_count(), 4);
}

#[test]
fn zero_iterations_is_a_configuration_error() {
    let engine = build_engine(1, 0);
    let result = engine.run(1, &mut EventLog::new());
    assert!(matches!(result, Err(SimError::InvalidConfig { field: "iterations", .. })));
}

#[test]
fn settings_can_change_between_runs() {
    let mut engine = build_engine(21, 10);
    engine.config_mut().set_base_bet(300.0);
    let aggregate = engine.run(1, &mut EventLog::new()).expect("run");
    assert_eq!(aggregate.average_rounds_to_ruin(), 0.0, "200 cannot cover a 300 bet");

    engine.account_mut().set_balance(1_000.0);
    let aggregate = engine.run(1, &mut EventLog::new()).expect("run");
    assert!(aggregate.average_rounds_to_ruin() >= 1.0);
}

#[test]
fn closures_observe_progress() {
    let engine = build_engine(8, 4);
    let mut seen = Vec::new();
    let mut observer = |event: &SimEvent| {
        if let SimEvent::ProgressCheckpoint { percent, .. } = event {
            seen.push(*percent);
        }
    };
    engine.run(2, &mut observer).expect("run");
    assert_eq!(seen, vec![50.0, 100.0]);
}

#[test]
fn reseeding_switches_trial_streams() {
    let mut engine = build_engine(1, 10);
    let fresh = build_engine(2, 10);
    engine.reseed(2);
    assert_eq!(engine.seed(), 2);
    assert_eq!(engine.run_trial(0), fresh.run_trial(0));
}
