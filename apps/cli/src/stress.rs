//! Random produce/recycle workload
//!
//! Each worker flips a coin per iteration: heads produces an object and
//! queues its handle, tails recycles a queued handle from either end of the
//! queue. Every object carries a random value that is checked again right
//! before it is recycled.

use std::collections::VecDeque;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::thread;
use std::time::Instant;

use anyhow::{Context, Result, anyhow, bail, ensure};
use serde::Serialize;
use slotpool::{FixedPool, Handle, PoolStatsSnapshot};
use tracing::{debug, info};

use crate::config::StressConfig;

/// Object type churned through the pool
#[derive(Debug, Default)]
pub struct Payload {
    value: u64,
    _body: [u64; 3],
}

#[derive(Debug, Default)]
struct Tally {
    produced: AtomicU64,
    recycled: AtomicU64,
    exhausted: AtomicU64,
}

/// Outcome of a run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Summary {
    pub pool: String,
    pub capacity: usize,
    pub threads: usize,
    pub iterations: u64,
    pub seed: u64,
    pub produced: u64,
    pub recycled: u64,
    pub exhausted: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stats: Option<PoolStatsSnapshot>,
}

/// Run the workload described by `config` to completion.
///
/// Every handle is recycled before returning, so a clean run leaves the
/// pool empty.
pub fn run(config: &StressConfig) -> Result<Summary> {
    let pool = FixedPool::<Payload>::with_config(config.pool_config())
        .with_context(|| format!("creating pool '{}'", config.name))?;
    let seed = config.seed.unwrap_or_else(|| fastrand::u64(..));
    let tally = Tally::default();

    info!(
        pool = %config.name,
        capacity = config.capacity,
        threads = config.threads,
        iterations = config.iterations,
        seed,
        "stress run starting"
    );
    let started = Instant::now();

    thread::scope(|scope| -> Result<()> {
        let workers: Vec<_> = (0..config.threads)
            .map(|worker| {
                let (pool, tally) = (&pool, &tally);
                let seed = seed.wrapping_add(worker as u64);
                scope.spawn(move || drive(pool, tally, config, worker, seed))
            })
            .collect();

        for handle in workers {
            handle
                .join()
                .map_err(|_| anyhow!("worker thread panicked"))??;
        }
        Ok(())
    })?;

    ensure!(
        pool.in_use() == 0,
        "{} objects still in use after every worker finished",
        pool.in_use()
    );
    if config.verify {
        pool.check_invariants().context("final invariant check")?;
    }

    info!(
        pool = %config.name,
        elapsed_ms = started.elapsed().as_millis(),
        "stress run finished"
    );

    Ok(Summary {
        pool: config.name.clone(),
        capacity: pool.capacity(),
        threads: config.threads,
        iterations: config.iterations,
        seed,
        produced: tally.produced.load(Ordering::Relaxed),
        recycled: tally.recycled.load(Ordering::Relaxed),
        exhausted: tally.exhausted.load(Ordering::Relaxed),
        stats: pool.stats(),
    })
}

fn drive(
    pool: &FixedPool<Payload>,
    tally: &Tally,
    config: &StressConfig,
    worker: usize,
    seed: u64,
) -> Result<()> {
    let mut rng = fastrand::Rng::with_seed(seed);
    let mut live: VecDeque<(Handle<Payload>, u64)> = VecDeque::new();

    for iteration in 1..=config.iterations {
        if live.is_empty() || rng.bool() {
            let value = rng.u64(..);
            match pool.produce_with(|| Payload {
                value,
                ..Payload::default()
            }) {
                Some(handle) => {
                    live.push_back((handle, value));
                    tally.produced.fetch_add(1, Ordering::Relaxed);
                }
                None => {
                    tally.exhausted.fetch_add(1, Ordering::Relaxed);
                }
            }
        } else {
            let entry = if rng.bool() {
                live.pop_front()
            } else {
                live.pop_back()
            };
            if let Some((handle, expected)) = entry {
                retire(pool, tally, config, handle, expected)?;
            }
        }

        if config.report_every > 0 && iteration % config.report_every == 0 {
            info!(
                worker,
                iteration,
                held = live.len(),
                in_use = pool.in_use(),
                available = pool.available(),
                "progress"
            );
            if config.verify {
                pool.check_invariants()
                    .with_context(|| format!("invariant check at iteration {iteration}"))?;
            }
        }
    }

    debug!(worker, remaining = live.len(), "draining");
    for (handle, expected) in live.drain(..) {
        retire(pool, tally, config, handle, expected)?;
    }
    Ok(())
}

fn retire(
    pool: &FixedPool<Payload>,
    tally: &Tally,
    config: &StressConfig,
    handle: Handle<Payload>,
    expected: u64,
) -> Result<()> {
    if config.verify && !pool.is_live(&handle) {
        bail!("handle {handle:?} is no longer live before recycle");
    }
    let found = value_of(&handle);
    if found != expected {
        bail!("payload corrupted: expected {expected:#x}, found {found:#x} behind {handle:?}");
    }

    let mut slot = Some(handle);
    pool.recycle(&mut slot);
    tally.recycled.fetch_add(1, Ordering::Relaxed);
    Ok(())
}

#[allow(unsafe_code)]
fn value_of(handle: &Handle<Payload>) -> u64 {
    // SAFETY: only the worker that produced `handle` holds it, and it is
    // read before that worker recycles it.
    unsafe { handle.as_ref() }.value
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:<12}{}", "pool", self.pool)?;
        writeln!(f, "{:<12}{}", "capacity", self.capacity)?;
        writeln!(f, "{:<12}{}", "threads", self.threads)?;
        writeln!(f, "{:<12}{}", "iterations", self.iterations)?;
        writeln!(f, "{:<12}{}", "seed", self.seed)?;
        writeln!(f, "{:<12}{}", "produced", self.produced)?;
        writeln!(f, "{:<12}{}", "recycled", self.recycled)?;
        writeln!(f, "{:<12}{}", "exhausted", self.exhausted)?;
        if let Some(stats) = &self.stats {
            writeln!(f, "{:<12}{}", "peak", stats.peak_in_use)?;
            writeln!(f, "{:<12}{}", "rejected", stats.rejected_recycles())?;
        }
        Ok(())
    }
}
