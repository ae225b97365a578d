//! Capture coordinator

use crate::traits::{CaptureRequest, Clock, PhotoCaptureService};
use crate::{Millis, Side};

use super::config::CaptureConfig;

/// Second request of a pair, waiting for its time
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PendingCapture {
    pub request: CaptureRequest,
    pub scheduled_at: Millis,
    pub side: Side,
}

/// Per-side capture outcome counters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct CaptureStats {
    pub requested: u32,
    pub succeeded: u32,
    pub failed: u32,
}

/// Sequences the two photo requests per side
///
/// Failures are logged and counted, never retried.
#[derive(Debug, Default)]
pub struct CaptureCoordinator {
    config: CaptureConfig,
    pending: [Option<PendingCapture>; 2],
    stats: [CaptureStats; 2],
}

impl CaptureCoordinator {
    pub fn new(config: CaptureConfig) -> Self {
        Self {
            config,
            pending: [None, None],
            stats: [CaptureStats::default(); 2],
        }
    }

    /// Ask the primary camera now and queue the secondary
    ///
    /// Blocks only for the first request. The second is queued
    /// `second_delay_ms` after the first one returned, read from `clock`,
    /// whether or not it succeeded. It replaces any older one for this side.
    pub fn begin_dual_capture<C, K>(&mut self, side: Side, service: &mut C, clock: &K)
    where
        C: PhotoCaptureService + ?Sized,
        K: Clock + ?Sized,
    {
        let first = self.config.primary(side).clone();
        self.issue(side, &first, service);
        let returned_at = clock.now_ms();

        let slot = &mut self.pending[side.index()];
        if slot.is_some() {
            log_warn!("{} second capture superseded", side);
        }
        *slot = Some(PendingCapture {
            request: self.config.secondary(side).clone(),
            scheduled_at: returned_at.saturating_add(u64::from(self.config.second_delay_ms)),
            side,
        });
    }

    /// Fire queued requests that are due
    pub fn tick<C>(&mut self, now: Millis, service: &mut C)
    where
        C: PhotoCaptureService + ?Sized,
    {
        for side in Side::ALL {
            let due = matches!(&self.pending[side.index()], Some(p) if now >= p.scheduled_at);
            if !due {
                continue;
            }
            if let Some(p) = self.pending[side.index()].take() {
                self.issue(p.side, &p.request, service);
            }
        }
    }

    fn issue<C>(&mut self, side: Side, request: &CaptureRequest, service: &mut C)
    where
        C: PhotoCaptureService + ?Sized,
    {
        let stats = &mut self.stats[side.index()];
        stats.requested = stats.requested.saturating_add(1);

        match service.capture(request) {
            Ok(status) => {
                stats.succeeded = stats.succeeded.saturating_add(1);
                log_info!("{} capture {}: {}", side, request.camera_id.as_str(), status.as_str());
            }
            Err(e) => {
                stats.failed = stats.failed.saturating_add(1);
                log_warn!("{} capture {} failed: {}", side, request.camera_id.as_str(), e);
            }
        }
    }

    /// Abandon every queued request
    pub fn cancel_all(&mut self) {
        for slot in self.pending.iter_mut() {
            if slot.take().is_some() {
                log_debug!("pending capture dropped");
            }
        }
    }

    pub fn pending(&self, side: Side) -> Option<&PendingCapture> {
        self.pending[side.index()].as_ref()
    }

    pub fn stats(&self, side: Side) -> CaptureStats {
        self.stats[side.index()]
    }

    pub fn config(&self) -> &CaptureConfig {
        &self.config
    }
}
