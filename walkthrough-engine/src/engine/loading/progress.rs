use bevy::prelude::*;

use crate::engine::core::error::WalkthroughError;

/// Result of an accepted completion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProgressUpdate {
    pub percent: f32,
    /// True exactly once, on the completion that reaches the total.
    pub ready: bool,
}

/// Aggregates start/done load events into a percentage.
///
/// One-shot: once every started resource is done the tracker reports ready
/// and rejects any further call.
#[derive(Resource, Debug, Default, Clone)]
pub struct LoadingProgress {
    loaded: u32,
    total: u32,
    failed: u32,
    completed: bool,
}

impl LoadingProgress {
    pub fn notify_start(&mut self) -> Result<(), WalkthroughError> {
        if self.completed {
            return Err(WalkthroughError::TrackerClosed("notify_start"));
        }
        self.total += 1;
        Ok(())
    }

    /// Failed loads still count as done so completion never stalls.
    pub fn notify_done(&mut self, ok: bool) -> Result<ProgressUpdate, WalkthroughError> {
        if self.completed {
            return Err(WalkthroughError::TrackerClosed("notify_done"));
        }
        if self.loaded >= self.total {
            return Err(WalkthroughError::UnbalancedDone);
        }

        self.loaded += 1;
        if !ok {
            self.failed += 1;
        }

        let ready = self.loaded == self.total;
        self.completed = ready;

        Ok(ProgressUpdate {
            percent: self.percent().unwrap_or(0.0),
            ready,
        })
    }

    /// Undefined until something has started.
    pub fn percent(&self) -> Option<f32> {
        (self.total > 0).then(|| self.loaded as f32 / self.total as f32 * 100.0)
    }

    pub fn is_complete(&self) -> bool {
        self.completed
    }

    pub fn loaded(&self) -> u32 {
        self.loaded
    }

    pub fn total(&self) -> u32 {
        self.total
    }

    pub fn failed(&self) -> u32 {
        self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ready_fires_once_when_all_started_resources_finish() {
        let mut progress = LoadingProgress::default();
        for _ in 0..3 {
            progress.notify_start().unwrap();
        }

        let first = progress.notify_done(true).unwrap();
        let second = progress.notify_done(false).unwrap();
        let third = progress.notify_done(true).unwrap();

        assert!(!first.ready && !second.ready);
        assert!(third.ready);
        assert_eq!(third.percent, 100.0);
        assert_eq!(progress.failed(), 1);
        assert!(progress.is_complete());
    }

    #[test]
    fn percent_tracks_loaded_over_total() {
        let mut progress = LoadingProgress::default();
        assert_eq!(progress.percent(), None);

        for _ in 0..4 {
            progress.notify_start().unwrap();
        }
        let update = progress.notify_done(true).unwrap();
        assert_eq!(update.percent, 25.0);
        assert_eq!(progress.percent(), Some(25.0));
    }

    #[test]
    fn late_starts_delay_readiness() {
        let mut progress = LoadingProgress::default();
        progress.notify_start().unwrap();
        progress.notify_start().unwrap();
        assert!(!progress.notify_done(true).unwrap().ready);

        progress.notify_start().unwrap();
        assert!(!progress.notify_done(true).unwrap().ready);
        assert!(progress.notify_done(true).unwrap().ready);
    }

    #[test]
    fn tracker_is_inert_after_completion() {
        let mut progress = LoadingProgress::default();
        progress.notify_start().unwrap();
        progress.notify_done(true).unwrap();

        assert_eq!(
            progress.notify_start(),
            Err(WalkthroughError::TrackerClosed("notify_start"))
        );
        assert_eq!(
            progress.notify_done(true),
            Err(WalkthroughError::TrackerClosed("notify_done"))
        );
        assert_eq!(progress.total(), 1);
        assert_eq!(progress.loaded(), 1);
    }

    #[test]
    fn done_without_start_is_rejected() {
        let mut progress = LoadingProgress::default();
        assert_eq!(progress.notify_done(true), Err(WalkthroughError::UnbalancedDone));
        assert_eq!(progress.percent(), None);
        assert!(!progress.is_complete());
    }

    #[test]
    fn ready_fires_exactly_once_over_interleavings() {
        // Every interleaving of 4 starts and 4 dones where dones never outrun starts.
        for mask in 0u32..(1 << 8) {
            if mask.count_ones() != 4 {
                continue;
            }
            let mut progress = LoadingProgress::default();
            let mut ready_count = 0;
            let mut started = 0;
            let mut finished = 0;
            for bit in 0..8 {
                if mask & (1 << bit) != 0 {
                    if progress.notify_start().is_ok() {
                        started += 1;
                    }
                } else if let Ok(update) = progress.notify_done(true) {
                    finished += 1;
                    if update.ready {
                        ready_count += 1;
                        assert_eq!(finished, started);
                    }
                }
            }
            assert!(ready_count <= 1);
            if ready_count == 1 {
                assert!(progress.total() > 0);
                assert_eq!(progress.loaded(), progress.total());
            }
        }
    }
}
