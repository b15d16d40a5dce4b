use std::time::Instant;

use anyhow::Context;
use chrono::Utc;
use clap::Parser;
use personbench_benchmark::{BenchConfig, Report, Trial};
use spdlog::info;

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

fn main() -> anyhow::Result<()> {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    let config = BenchConfig::parse();
    spdlog::default_logger().set_level_filter(config.log_level.filter());

    info!(
        "running {} trial(s): {} warmup + {} measured passes, {} worker(s), {:?}",
        config.trials,
        config.warmup,
        config.iterations,
        config.workers,
        config.commit_mode
    );

    let started_at = Utc::now();
    let mut samples = Vec::with_capacity(config.trials * config.iterations);
    let mut batch_len = 0;
    for trial_no in 0..config.trials {
        let trial = Trial::setup(&config)
            .with_context(|| format!("failed to set up trial {}", trial_no + 1))?;
        batch_len = trial.fixture().len();

        for _ in 0..config.warmup {
            trial.insert_all_or_abort();
        }
        for _ in 0..config.iterations {
            let start = Instant::now();
            trial.insert_all_or_abort();
            samples.push(start.elapsed());
        }
        trial.teardown();
        info!("trial {} done", trial_no + 1);
    }

    if let Some(report) = Report::from_samples(started_at, batch_len, &samples) {
        println!("{}", report);
    }
    Ok(())
}
