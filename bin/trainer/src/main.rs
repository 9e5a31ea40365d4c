use clap::Parser;
use mc_cards::Round;
use mc_clustering::ClusterTable;
use mc_gameplay::{AbstractAction, Config as GameConfig, Play};
use mc_mccfr::{self as mccfr, Average, Engine, SequenceTable, Strategy};
use std::io::Read as _;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

/// external-sampling MCCFR trainer for abstracted no-limit hold'em.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Cli {
    /// directory snapshots are loaded from and written to.
    #[arg(long, default_value = mccfr::K_SAVE_DIR)]
    save_dir: PathBuf,
    /// total training budget in minutes; overrides the default schedule.
    #[arg(long)]
    minutes: Option<u64>,
}

fn init_logging() {
    let config = simplelog::ConfigBuilder::new()
        .set_location_level(log::LevelFilter::Off)
        .set_target_level(log::LevelFilter::Off)
        .set_thread_level(log::LevelFilter::Off)
        .build();
    let term = simplelog::TermLogger::new(
        log::LevelFilter::Info,
        config.clone(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );
    std::fs::create_dir_all("logs").expect("create logs directory");
    let time = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .expect("time moves forward")
        .as_secs();
    let file = simplelog::WriteLogger::new(
        log::LevelFilter::Debug,
        config,
        std::fs::File::create(format!("logs/{time}.log")).expect("create log file"),
    );
    simplelog::CombinedLogger::init(vec![term, file]).expect("initialize logger");
}

/// fold / check-call / pot-sized-bet / all-in, available on every street,
/// plus a half-pot raise restricted to the first two raises of a round.
fn standard_actions() -> Vec<AbstractAction> {
    vec![
        AbstractAction {
            play: Play::Fold,
            size_as_pot_fraction: 0.0,
            max_raise_number: usize::MAX,
            min_round: Round::Preflop,
            max_round: Round::River,
            max_players: 0,
            min_pot: 0,
        },
        AbstractAction {
            play: Play::CheckCall,
            size_as_pot_fraction: 0.0,
            max_raise_number: usize::MAX,
            min_round: Round::Preflop,
            max_round: Round::River,
            max_players: 0,
            min_pot: 0,
        },
        AbstractAction {
            play: Play::Bet,
            size_as_pot_fraction: 0.5,
            max_raise_number: 2,
            min_round: Round::Preflop,
            max_round: Round::River,
            max_players: 0,
            min_pot: 0,
        },
        AbstractAction {
            play: Play::Bet,
            size_as_pot_fraction: 1.0,
            max_raise_number: 3,
            min_round: Round::Preflop,
            max_round: Round::River,
            max_players: 0,
            min_pot: 0,
        },
        AbstractAction {
            play: Play::AllIn,
            size_as_pot_fraction: 0.0,
            max_raise_number: usize::MAX,
            min_round: Round::Preflop,
            max_round: Round::River,
            max_players: 0,
            min_pot: 0,
        },
    ]
}

/// uniform cycling placeholder over the 200 postflop buckets; the k-means
/// training that would produce the real assignments is out of scope here.
fn placeholder_buckets() -> Vec<u32> {
    const SPAN: u32 = 50_000;
    (0..SPAN).map(|i| i % 200).collect()
}

fn load_bincode<T: serde::de::DeserializeOwned>(path: &Path) -> anyhow::Result<Option<T>> {
    if !path.exists() {
        return Ok(None);
    }
    let mut buf = Vec::new();
    std::fs::File::open(path)?.read_to_end(&mut buf)?;
    Ok(Some(bincode::deserialize(&buf)?))
}

fn save_bincode<T: serde::Serialize>(path: &Path, value: &T) -> anyhow::Result<()> {
    let bytes = bincode::serialize(value)?;
    let tmp = path.with_extension("tmp");
    std::fs::write(&tmp, bytes)?;
    std::fs::rename(tmp, path)?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    init_logging();
    let cli = Cli::parse();
    std::fs::create_dir_all(&cli.save_dir)?;

    let table_path = cli.save_dir.join("sequence_table.bin");
    let strategy_path = cli.save_dir.join("strategy.bin");
    let average_path = cli.save_dir.join("average.bin");

    let game_config = GameConfig {
        big_blind: 100,
        small_blind: 50,
        ..Default::default()
    };
    let stacks = vec![20_000i64; mccfr::K_PLAYERS];

    let table = match load_bincode::<SequenceTable>(&table_path)? {
        Some(t) => {
            log::info!("loaded sequence table from {}", table_path.display());
            t
        }
        None => {
            log::info!("building sequence table for {} players", stacks.len());
            let t = SequenceTable::build(standard_actions(), game_config, stacks.clone());
            save_bincode(&table_path, &t)?;
            t
        }
    };
    let clusters = ClusterTable::new(placeholder_buckets(), placeholder_buckets(), placeholder_buckets());

    let strategy = match load_bincode::<Strategy>(&strategy_path)? {
        Some(s) => {
            log::info!("loaded strategy snapshot from {}", strategy_path.display());
            s
        }
        None => Strategy::new(&table, &clusters),
    };
    let mut average = load_bincode::<Average>(&average_path)?
        .unwrap_or_else(|| Average::initial_average(&table, &clusters, &strategy));

    let engine = Arc::new(Engine::new(table, clusters, game_config, stacks));
    let strategy = Arc::new(Mutex::new(strategy));
    let should_continue = Arc::new(AtomicBool::new(true));
    let prune_enabled = Arc::new(AtomicBool::new(false));
    let strategy_enabled = Arc::new(AtomicBool::new(mccfr::K_STRATEGY_DELAY_MINUTES == 0));

    let total_minutes = cli.minutes.unwrap_or(mccfr::K_TRAINING_MINUTES);
    let n_threads = mccfr::default_thread_count();
    log::info!("training for {total_minutes} minutes across {n_threads} threads");

    let bar = indicatif::ProgressBar::new(total_minutes);
    let style = indicatif::ProgressStyle::with_template("{spinner:.cyan} {elapsed} ~ {percent:>3}% {wide_bar:.cyan}")
        .expect("valid progress template");
    bar.set_style(style);
    bar.enable_steady_tick(Duration::from_secs(1));

    let handles = mccfr::train(
        Arc::clone(&engine),
        Arc::clone(&strategy),
        n_threads,
        Arc::clone(&should_continue),
        mccfr::K_STRATEGY_INTERVAL_ITERATIONS,
        Arc::clone(&prune_enabled),
        Arc::clone(&strategy_enabled),
    );

    let start = Instant::now();
    let mut last_discount_minute = 0u64;
    let mut last_snapshot_minute = 0u64;
    loop {
        std::thread::sleep(Duration::from_secs(60));
        let elapsed_minutes = start.elapsed().as_secs() / 60;
        bar.set_position(elapsed_minutes.min(total_minutes));

        if elapsed_minutes >= mccfr::K_PRUNING_PHASE_MINUTES {
            prune_enabled.store(true, Ordering::Relaxed);
        }

        if elapsed_minutes >= mccfr::K_STRATEGY_DELAY_MINUTES {
            strategy_enabled.store(true, Ordering::Relaxed);
        }

        if elapsed_minutes - last_discount_minute >= mccfr::K_DISCOUNT_INTERVAL_MINUTES
            && elapsed_minutes <= mccfr::K_LCFR_THRESHOLD_MINUTES
        {
            let d = elapsed_minutes as f32 / (elapsed_minutes as f32 + 1.0);
            strategy.lock().unwrap().discount(d);
            last_discount_minute = elapsed_minutes;
            log::debug!("applied linear-CFR discount d={d:.4} at minute {elapsed_minutes}");
        }

        if elapsed_minutes - last_snapshot_minute >= mccfr::K_SNAPSHOT_INTERVAL_MINUTES {
            let guard = strategy.lock().unwrap();
            average.add_assign(&engine.table, &engine.clusters, &guard);
            if let Err(e) = save_bincode(&strategy_path, &*guard) {
                log::warn!("snapshot write failed, will retry next interval: {e}");
            } else if let Err(e) = save_bincode(&average_path, &average) {
                log::warn!("average snapshot write failed, will retry next interval: {e}");
            } else {
                log::info!("saved snapshot at minute {elapsed_minutes}");
            }
            last_snapshot_minute = elapsed_minutes;
        }

        if elapsed_minutes >= total_minutes {
            break;
        }
    }

    should_continue.store(false, Ordering::Release);
    for handle in handles {
        let _ = handle.join();
    }
    bar.finish();

    {
        let guard = strategy.lock().unwrap();
        average.add_assign(&engine.table, &engine.clusters, &guard);
        save_bincode(&strategy_path, &*guard)?;
    }
    let mut normalized = average.clone();
    normalized.normalize();
    save_bincode(&average_path, &normalized)?;
    log::info!("training complete, final snapshot written to {}", cli.save_dir.display());

    Ok(())
}
