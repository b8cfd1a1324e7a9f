//! Destination row scheduling
//!
//! [`RowScheduler`] owns the bookkeeping for one upscale call: which rows
//! are still unclaimed and which have completed. Each row moves through
//! `Unclaimed -> Claimed -> Completed` exactly once.
//!
//! Claiming a row hands out exclusive `&mut` access to that row's pixels,
//! so the borrow checker guarantees no two workers ever write the same
//! row. The unclaimed stack and the completion table sit behind separate
//! locks, each held only for the claim or mark itself.

use crate::{TransformError, TransformResult};
use bilerp_core::Raster;
use bilerp_core::color::BYTES_PER_PIXEL;
use log::trace;
use parking_lot::{Condvar, Mutex};
use std::time::Duration;

/// Exclusive responsibility for one destination row.
#[derive(Debug)]
pub struct RowClaim<'a> {
    /// Row index in the destination
    pub row: usize,
    /// The row's pixel bytes
    pub pixels: &'a mut [u8],
}

#[derive(Debug)]
struct Completion {
    done: Vec<bool>,
    count: usize,
}

/// Hands out destination rows and tracks their completion.
///
/// Created per upscale call from the destination raster; dropping it
/// releases the row borrows.
#[derive(Debug)]
pub struct RowScheduler<'a> {
    width: usize,
    height: usize,
    unclaimed: Mutex<Vec<RowClaim<'a>>>,
    completion: Mutex<Completion>,
    progress: Condvar,
}

impl<'a> RowScheduler<'a> {
    /// Put every row of `dest` in the unclaimed set.
    ///
    /// Rows are claimed from the high end first; callers must not rely on
    /// any particular order.
    pub fn new(dest: &'a mut Raster) -> Self {
        let width = dest.width() as usize;
        let height = dest.height() as usize;
        let unclaimed = dest
            .rows_mut()
            .enumerate()
            .map(|(row, pixels)| RowClaim { row, pixels })
            .collect();

        RowScheduler {
            width,
            height,
            unclaimed: Mutex::new(unclaimed),
            completion: Mutex::new(Completion {
                done: vec![false; height],
                count: 0,
            }),
            progress: Condvar::new(),
        }
    }

    /// Destination width in pixels.
    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    /// Destination height, the total number of rows.
    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Take one unclaimed row, or `None` once every row has been claimed.
    ///
    /// Safe to call from several threads; each row is returned once.
    pub fn claim_next_row(&self) -> Option<RowClaim<'a>> {
        let claim = self.unclaimed.lock().pop();
        if let Some(c) = &claim {
            debug_assert_eq!(c.pixels.len(), self.width * BYTES_PER_PIXEL);
            trace!("claimed row {}", c.row);
        }
        claim
    }

    /// True once no unclaimed rows remain. Workers may still be running.
    pub fn all_rows_claimed(&self) -> bool {
        self.unclaimed.lock().is_empty()
    }

    /// Mark a claimed row completed.
    ///
    /// # Errors
    ///
    /// Returns [`TransformError::InvariantViolation`] if the row is out of
    /// range or was already completed.
    pub fn mark_completed(&self, row: usize) -> TransformResult<()> {
        let mut completion = self.completion.lock();
        match completion.done.get_mut(row) {
            None => {
                return Err(TransformError::InvariantViolation(format!(
                    "completed row {row} outside height {}",
                    self.height
                )));
            }
            Some(true) => {
                return Err(TransformError::InvariantViolation(format!(
                    "row {row} completed twice"
                )));
            }
            Some(done) => *done = true,
        }
        completion.count += 1;
        drop(completion);

        trace!("completed row {row}");
        self.progress.notify_all();
        Ok(())
    }

    /// Whether `row` has been marked completed.
    pub fn is_completed(&self, row: usize) -> bool {
        self.completion.lock().done.get(row).copied().unwrap_or(false)
    }

    /// Number of rows marked completed so far.
    pub fn completed_count(&self) -> usize {
        self.completion.lock().count
    }

    /// True once every row has been marked completed.
    pub fn all_rows_completed(&self) -> bool {
        self.completed_count() == self.height
    }

    /// Park until the completed count moves past `seen` or `timeout`
    /// elapses. Returns the current count.
    pub fn wait_for_completion(&self, seen: usize, timeout: Duration) -> usize {
        let mut completion = self.completion.lock();
        if completion.count == seen {
            self.progress.wait_for(&mut completion, timeout);
        }
        completion.count
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_every_row_claimed_once() {
        let mut dest = Raster::new(4, 9).unwrap();
        let scheduler = RowScheduler::new(&mut dest);
        assert_eq!(scheduler.height(), 9);
        assert!(!scheduler.all_rows_claimed());

        let mut seen = HashSet::new();
        while let Some(claim) = scheduler.claim_next_row() {
            assert_eq!(claim.pixels.len(), 12);
            assert!(seen.insert(claim.row), "row {} claimed twice", claim.row);
        }
        assert_eq!(seen.len(), 9);
        assert!(scheduler.all_rows_claimed());
        assert!(scheduler.claim_next_row().is_none());
    }

    #[test]
    fn test_claims_from_high_end() {
        let mut dest = Raster::new(1, 3).unwrap();
        let scheduler = RowScheduler::new(&mut dest);
        assert_eq!(scheduler.claim_next_row().map(|c| c.row), Some(2));
        assert_eq!(scheduler.claim_next_row().map(|c| c.row), Some(1));
    }

    #[test]
    fn test_claimed_pixels_reach_destination() {
        let mut dest = Raster::new(2, 2).unwrap();
        {
            let scheduler = RowScheduler::new(&mut dest);
            while let Some(claim) = scheduler.claim_next_row() {
                claim.pixels.fill(claim.row as u8 + 1);
            }
        }
        assert_eq!(dest.row(0), &[1; 6]);
        assert_eq!(dest.row(1), &[2; 6]);
    }

    #[test]
    fn test_mark_completed() {
        let mut dest = Raster::new(1, 2).unwrap();
        let scheduler = RowScheduler::new(&mut dest);
        assert!(!scheduler.is_completed(1));

        scheduler.mark_completed(1).unwrap();
        assert!(scheduler.is_completed(1));
        assert_eq!(scheduler.completed_count(), 1);
        assert!(!scheduler.all_rows_completed());

        assert!(matches!(
            scheduler.mark_completed(1),
            Err(TransformError::InvariantViolation(_))
        ));
        assert!(matches!(
            scheduler.mark_completed(2),
            Err(TransformError::InvariantViolation(_))
        ));

        scheduler.mark_completed(0).unwrap();
        assert!(scheduler.all_rows_completed());
    }

    #[test]
    fn test_concurrent_claims_are_unique() {
        let mut dest = Raster::new(1, 500).unwrap();
        let scheduler = RowScheduler::new(&mut dest);

        let claimed: Vec<Vec<usize>> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..8)
                .map(|_| {
                    s.spawn(|| {
                        let mut rows = Vec::new();
                        while let Some(claim) = scheduler.claim_next_row() {
                            rows.push(claim.row);
                            scheduler.mark_completed(claim.row).unwrap();
                        }
                        rows
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        let mut all: Vec<usize> = claimed.into_iter().flatten().collect();
        all.sort_unstable();
        assert_eq!(all, (0..500).collect::<Vec<_>>());
        assert!(scheduler.all_rows_completed());
    }

    #[test]
    fn test_wait_for_completion_times_out() {
        let mut dest = Raster::new(1, 1).unwrap();
        let scheduler = RowScheduler::new(&mut dest);
        let count = scheduler.wait_for_completion(0, Duration::from_millis(1));
        assert_eq!(count, 0);

        scheduler.mark_completed(0).unwrap();
        // Count already moved past `seen`, returns without waiting
        assert_eq!(scheduler.wait_for_completion(0, Duration::from_secs(60)), 1);
    }
}
