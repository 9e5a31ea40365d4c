//! Compile-time hyperparameters for the MCCFR engine, named to match the
//! external interface contract (no command-line flags of consequence).

pub const K_PLAYERS: usize = 3;
pub const K_ACTIONS: usize = 5;

/// regret floor below which a negative-regret action becomes eligible for
/// pruning.
pub const K_PRUNE_CONSTANT: i32 = -300_000;
/// hard floor every regret is clamped to after an update.
pub const K_REGRET_FLOOR: i32 = i32::MIN / 2;
/// probability, once pruning is enabled, of skipping a negative-regret branch.
pub const K_PRUNE_THRESHOLD: f64 = 0.95;

/// training minutes before the preflop strategy-update pass starts running.
pub const K_STRATEGY_DELAY_MINUTES: u64 = 0;
/// training minutes after which linear-CFR discounting stops.
pub const K_LCFR_THRESHOLD_MINUTES: u64 = 400;
/// minutes between discount applications.
pub const K_DISCOUNT_INTERVAL_MINUTES: u64 = 10;
/// minutes between average/strategy snapshots.
pub const K_SNAPSHOT_INTERVAL_MINUTES: u64 = 20;
/// iterations between preflop strategy-update passes.
pub const K_STRATEGY_INTERVAL_ITERATIONS: u64 = 10_000;

/// self-play evaluation batch shape.
pub const K_BATTLE_MEANS: usize = 20;
pub const K_BATTLE_TRIALS: usize = 1_000;

pub const K_TRAINING_MINUTES: u64 = 60 * 24;
pub const K_SAVE_DIR: &str = "snapshots";

/// training minutes after which pruning probability kicks in (minutes 0 on
/// a local heads-up / small-player run since the tree is already tiny).
pub const K_PRUNING_PHASE_MINUTES: u64 = 0;
