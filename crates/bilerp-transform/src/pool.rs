//! Bounded worker pool over scoped threads
//!
//! [`WorkerPool`] owns the handles of the workers it launched, one per
//! claimed row. It lives inside [`std::thread::scope`], so every worker is
//! joined before the scope returns, including when the coordinator bails
//! out early with an error.
//!
//! Only the coordinating thread touches the pool (`&mut self`); workers
//! only see their [`RowJob`] and the scheduler's completion table.

use crate::grid::ExtendedGrid;
use crate::scheduler::{RowClaim, RowScheduler};
use crate::{TransformError, TransformResult};
use log::{trace, warn};
use std::any::Any;
use std::thread::{Scope, ScopedJoinHandle};

/// Everything a worker needs to compute one destination row.
#[derive(Debug)]
pub struct RowJob<'a> {
    /// Row index in the destination
    pub row: usize,
    /// The row's pixel bytes, exclusively owned by this job
    pub pixels: &'a mut [u8],
    /// Read-only source samples
    pub grid: &'a ExtendedGrid,
    pub dest_width: usize,
    pub dest_height: usize,
}

struct Worker<'scope> {
    row: usize,
    handle: ScopedJoinHandle<'scope, TransformResult<()>>,
}

impl Worker<'_> {
    fn join(self) -> TransformResult<()> {
        let row = self.row;
        let result = match self.handle.join() {
            Ok(result) => result,
            Err(payload) => Err(TransformError::InvariantViolation(format!(
                "worker for row {row} panicked: {}",
                panic_message(payload.as_ref())
            ))),
        };
        if let Err(e) = &result {
            warn!("worker for row {row} failed: {e}");
        }
        result
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&'static str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "non-string panic payload"
    }
}

/// Launches row workers up to a concurrency bound and reaps them.
pub struct WorkerPool<'scope, 'env: 'scope, 'rows: 'scope> {
    scope: &'scope Scope<'scope, 'env>,
    scheduler: &'scope RowScheduler<'rows>,
    grid: &'scope ExtendedGrid,
    workers: Vec<Worker<'scope>>,
}

impl<'scope, 'env: 'scope, 'rows: 'scope> WorkerPool<'scope, 'env, 'rows> {
    /// Create an empty pool bound to a thread scope, a scheduler and the
    /// grid its workers read.
    pub fn new(
        scope: &'scope Scope<'scope, 'env>,
        scheduler: &'scope RowScheduler<'rows>,
        grid: &'scope ExtendedGrid,
    ) -> Self {
        WorkerPool {
            scope,
            scheduler,
            grid,
            workers: Vec::new(),
        }
    }

    /// Number of workers launched and not yet reaped.
    pub fn in_flight(&self) -> usize {
        self.workers.len()
    }

    /// Reap finished workers, then claim rows and launch workers until
    /// `max_concurrent` are running or no rows remain. Never blocks on a
    /// running worker.
    ///
    /// A worker is reaped once its row is marked completed or its thread
    /// has already exited (which covers workers that failed). Returns the
    /// number of workers launched by this call.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::Configuration`] if `max_concurrent` is 0,
    /// before any row is claimed. Otherwise returns the first error of a
    /// reaped worker; the rest of the image is abandoned, but workers still
    /// in the pool must be joined with [`WorkerPool::join_all`].
    pub fn launch_workers<F>(
        &mut self,
        max_concurrent: usize,
        work: &'scope F,
    ) -> TransformResult<usize>
    where
        F: Fn(RowJob<'_>) -> TransformResult<()> + Sync,
    {
        if max_concurrent == 0 {
            return Err(TransformError::Configuration(
                "worker pool size must be at least 1".to_string(),
            ));
        }

        self.join_finished()?;

        let mut launched = 0;
        while self.workers.len() < max_concurrent {
            let Some(claim) = self.scheduler.claim_next_row() else {
                break;
            };
            self.spawn(claim, work);
            launched += 1;
        }
        Ok(launched)
    }

    fn spawn<F>(&mut self, claim: RowClaim<'rows>, work: &'scope F)
    where
        F: Fn(RowJob<'_>) -> TransformResult<()> + Sync,
    {
        let row = claim.row;
        let scheduler = self.scheduler;
        let grid = self.grid;

        let handle = self.scope.spawn(move || {
            let job = RowJob {
                row: claim.row,
                pixels: claim.pixels,
                grid,
                dest_width: scheduler.width(),
                dest_height: scheduler.height(),
            };
            work(job)?;
            scheduler.mark_completed(row)
        });

        trace!("launched worker for row {row}");
        self.workers.push(Worker { row, handle });
    }

    /// Join, without blocking, every worker whose row is marked completed
    /// or whose thread has already exited. Running workers stay in the
    /// pool.
    ///
    /// # Errors
    ///
    /// Returns the first error of a joined worker. Workers not yet looked
    /// at when it surfaces stay in the pool for [`WorkerPool::join_all`].
    pub fn join_finished(&mut self) -> TransformResult<()> {
        let mut i = 0;
        while i < self.workers.len() {
            let worker = &self.workers[i];
            if self.scheduler.is_completed(worker.row) || worker.handle.is_finished() {
                self.workers.swap_remove(i).join()?;
            } else {
                i += 1;
            }
        }
        Ok(())
    }

    /// Block until every launched worker has terminated.
    ///
    /// All workers are joined even if one fails; the first failure is
    /// returned.
    pub fn join_all(&mut self) -> TransformResult<()> {
        let mut first_err = None;
        for worker in self.workers.drain(..) {
            if let Err(e) = worker.join() {
                first_err.get_or_insert(e);
            }
        }
        match first_err {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }
}
