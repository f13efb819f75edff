//! Fixed-interval refresh scheduler.
//!
//! `RefreshScheduler::run` calls the cycle callback once immediately and then on
//! every tick of a crossbeam `tick` timer. A manual refresh request triggers an
//! extra cycle right away. The loop ends when the shutdown channel fires (or its
//! sender is dropped), or when the optional cycle limit is reached; stopping the
//! timer is the only cancellation there is, a cycle in progress always completes.

use crossbeam_channel::{Receiver, never, select, tick};
use log::{debug, info};
use market_common::Result;
use std::time::Duration;

/// What started a cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// First cycle, run as soon as the scheduler starts.
    Startup,
    /// Interval timer fired.
    Timer,
    /// User asked for a refresh.
    Manual,
}

/// Drives refresh cycles on a fixed interval.
pub struct RefreshScheduler {
    interval: Duration,
    max_cycles: Option<u64>,
}

impl RefreshScheduler {
    /// Scheduler ticking every `interval`, stopping after `max_cycles` if set.
    pub fn new(interval: Duration, max_cycles: Option<u64>) -> Self {
        Self {
            interval,
            max_cycles,
        }
    }

    fn limit_reached(&self, cycles: u64) -> bool {
        self.max_cycles.is_some_and(|max| cycles >= max)
    }

    /// Run cycles until shutdown or the cycle limit. Returns the number of cycles run.
    ///
    /// An error from `on_cycle` stops the scheduler and is returned.
    pub fn run<F>(
        &self,
        refresh_rx: Receiver<()>,
        shutdown_rx: Receiver<()>,
        mut on_cycle: F,
    ) -> Result<u64>
    where
        F: FnMut(Trigger) -> Result<()>,
    {
        let ticker = tick(self.interval);
        let mut refresh_rx = refresh_rx;
        let mut cycles = 0;

        info!("Refresh scheduler started, interval {:?}", self.interval);
        on_cycle(Trigger::Startup)?;
        cycles += 1;

        while !self.limit_reached(cycles) {
            let trigger = select! {
                recv(shutdown_rx) -> _ => {
                    info!("Shutdown requested, stopping scheduler");
                    break;
                },
                recv(ticker) -> _ => Some(Trigger::Timer),
                recv(refresh_rx) -> msg => msg.ok().map(|()| Trigger::Manual),
            };
            let Some(trigger) = trigger else {
                debug!("Manual refresh channel closed, timer only from now on");
                refresh_rx = never();
                continue;
            };
            on_cycle(trigger)?;
            cycles += 1;
        }

        info!("Refresh scheduler stopped after {} cycles", cycles);
        Ok(cycles)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::unbounded;
    use market_common::BoardError;

    #[test]
    fn stops_at_cycle_limit() {
        let (_refresh_tx, refresh_rx) = unbounded();
        let (_shutdown_tx, shutdown_rx) = unbounded();
        let scheduler = RefreshScheduler::new(Duration::from_millis(1), Some(3));
        let mut triggers = Vec::new();
        let cycles = scheduler
            .run(refresh_rx, shutdown_rx, |t| {
                triggers.push(t);
                Ok(())
            })
            .unwrap();
        assert_eq!(cycles, 3);
        assert_eq!(triggers, vec![Trigger::Startup, Trigger::Timer, Trigger::Timer]);
    }

    #[test]
    fn manual_refresh_runs_before_timer() {
        let (refresh_tx, refresh_rx) = unbounded();
        let (_shutdown_tx, shutdown_rx) = unbounded();
        refresh_tx.send(()).unwrap();
        let scheduler = RefreshScheduler::new(Duration::from_secs(3600), Some(2));
        let mut triggers = Vec::new();
        scheduler
            .run(refresh_rx, shutdown_rx, |t| {
                triggers.push(t);
                Ok(())
            })
            .unwrap();
        assert_eq!(triggers, vec![Trigger::Startup, Trigger::Manual]);
    }

    #[test]
    fn shutdown_stops_the_timer() {
        let (_refresh_tx, refresh_rx) = unbounded();
        let (shutdown_tx, shutdown_rx) = unbounded();
        shutdown_tx.send(()).unwrap();
        let scheduler = RefreshScheduler::new(Duration::from_secs(3600), None);
        let cycles = scheduler.run(refresh_rx, shutdown_rx, |_| Ok(())).unwrap();
        assert_eq!(cycles, 1);
    }

    #[test]
    fn closed_refresh_channel_falls_back_to_timer() {
        let (refresh_tx, refresh_rx) = unbounded::<()>();
        drop(refresh_tx);
        let (_shutdown_tx, shutdown_rx) = unbounded();
        let scheduler = RefreshScheduler::new(Duration::from_millis(1), Some(2));
        let mut triggers = Vec::new();
        scheduler
            .run(refresh_rx, shutdown_rx, |t| {
                triggers.push(t);
                Ok(())
            })
            .unwrap();
        assert_eq!(triggers, vec![Trigger::Startup, Trigger::Timer]);
    }

    #[test]
    fn cycle_error_stops_the_scheduler() {
        let (_refresh_tx, refresh_rx) = unbounded();
        let (_shutdown_tx, shutdown_rx) = unbounded();
        let scheduler = RefreshScheduler::new(Duration::from_millis(1), None);
        let result = scheduler.run(refresh_rx, shutdown_rx, |_| {
            Err(BoardError::Format("broken pipe".into()))
        });
        assert!(matches!(result, Err(BoardError::Format(_))));
    }
}
