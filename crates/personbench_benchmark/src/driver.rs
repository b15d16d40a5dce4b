use std::{hint::black_box, process, thread};

use personbench_error::{BenchError, DataLoadError, SetupError};
use personbench_objectdb::StoreError;
use spdlog::{debug, error, info};

use crate::{
    config::BenchConfig,
    environment::reset_best_effort,
    fixture::load_fixture,
    lifecycle::{StoreHandle, setup_store, teardown_store},
    model::Person,
};

/// Exit code used when a timed pass runs against a trial whose setup failed.
pub const BROKEN_TRIAL_EXIT_CODE: i32 = 2;

/// One setup, repeated timed passes, one teardown.
pub struct Trial {
    fixture: Vec<Person>,
    store: Result<StoreHandle, SetupError>,
    workers: usize,
}

impl Trial {
    /// Loads the fixture, wipes the store root and creates a fresh store.
    ///
    /// A missing or malformed fixture aborts before the filesystem is
    /// touched. A store failure does not abort: it is kept in the trial and
    /// refused by every timed pass.
    pub fn setup(config: &BenchConfig) -> Result<Self, DataLoadError> {
        let fixture = load_fixture(&config.fixture_dir, &config.fixture)?;
        let left = reset_best_effort(&config.db_root);
        if left > 0 {
            debug!("{} entries left under {} after reset", left, config.db_root.display());
        }
        let store = setup_store(config);
        Ok(Self {
            fixture,
            store,
            workers: config.workers.max(1),
        })
    }

    pub fn fixture(&self) -> &[Person] {
        &self.fixture
    }

    pub fn store(&self) -> Result<&StoreHandle, &SetupError> {
        self.store.as_ref()
    }

    /// One timed pass: every person in the fixture saved once, in order.
    pub fn insert_all(&self) -> Result<usize, BenchError> {
        let handle = self.usable_store()?;
        let mut session = handle.session()?;
        for person in &self.fixture {
            black_box(session.save(person)?);
        }
        session.commit()?;
        Ok(self.fixture.len())
    }

    /// One timed pass split across `workers` threads. Each worker binds
    /// its own session and saves a contiguous shard.
    pub fn insert_parallel(&self, workers: usize) -> Result<usize, BenchError> {
        let handle = self.usable_store()?;
        if self.fixture.is_empty() {
            return Ok(0);
        }
        let shard_len = self.fixture.len().div_ceil(workers.max(1));

        thread::scope(|scope| -> Result<usize, BenchError> {
            let jobs: Vec<_> = self
                .fixture
                .chunks(shard_len)
                .map(|shard| {
                    scope.spawn(move || -> Result<usize, BenchError> {
                        let mut session = handle.session()?;
                        for person in shard {
                            black_box(session.save(person)?);
                        }
                        session.commit()?;
                        Ok(shard.len())
                    })
                })
                .collect();

            let mut saved = 0;
            for job in jobs {
                saved += job.join().map_err(|_| {
                    BenchError::Store(StoreError::InternalError("insert worker panicked".into()))
                })??;
            }
            Ok(saved)
        })
    }

    /// The configured pass: sequential with one worker, sharded otherwise.
    pub fn run_pass(&self) -> Result<usize, BenchError> {
        if self.workers > 1 {
            self.insert_parallel(self.workers)
        } else {
            self.insert_all()
        }
    }

    /// Timed entry point. A broken trial ends the process so that no timing
    /// is ever recorded for it. Any other failure panics and is reported by
    /// the measuring harness.
    pub fn insert_all_or_abort(&self) -> usize {
        settle_pass(self.run_pass())
    }

    pub fn teardown(self) {
        match self.store {
            Ok(handle) => teardown_store(handle),
            Err(_) => info!("no store to clean up"),
        }
    }

    fn usable_store(&self) -> Result<&StoreHandle, BenchError> {
        self.store
            .as_ref()
            .map_err(|e| BenchError::BrokenTrial(e.to_string()))
    }
}

fn settle_pass(result: Result<usize, BenchError>) -> usize {
    match result {
        Ok(saved) => saved,
        Err(BenchError::BrokenTrial(reason)) => {
            error!("no usable store, exiting: {}", reason);
            process::exit(BROKEN_TRIAL_EXIT_CODE);
        }
        Err(e) => {
            error!("timed pass failed: {}", e);
            panic!("timed pass failed: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completed_pass_returns_count() {
        assert_eq!(settle_pass(Ok(100)), 100);
    }

    #[test]
    #[should_panic(expected = "timed pass failed: store error: transaction conflict")]
    fn store_failure_panics_instead_of_exiting() {
        settle_pass(Err(BenchError::Store(StoreError::Conflict)));
    }
}
