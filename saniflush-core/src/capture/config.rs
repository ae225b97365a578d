//! Camera targets

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::traits::CaptureRequest;
use crate::Side;

pub const DEFAULT_SECOND_CAPTURE_DELAY_MS: u32 = 500;

/// Which cameras photograph which toilet
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaptureConfig {
    /// `[side][0]` is asked first, `[side][1]` after `second_delay_ms`
    pub targets: [[CaptureRequest; 2]; 2],
    pub second_delay_ms: u32,
}

impl CaptureConfig {
    pub fn primary(&self, side: Side) -> &CaptureRequest {
        &self.targets[side.index()][0]
    }

    pub fn secondary(&self, side: Side) -> &CaptureRequest {
        &self.targets[side.index()][1]
    }
}

impl Default for CaptureConfig {
    fn default() -> Self {
        let target = |camera: &str, prefix: &str, flip: bool| {
            CaptureRequest::new(camera, prefix, flip).unwrap_or_default()
        };
        Self {
            targets: [
                [target("cam0", "left", false), target("cam1", "left", true)],
                [target("cam2", "right", false), target("cam3", "right", true)],
            ],
            second_delay_ms: DEFAULT_SECOND_CAPTURE_DELAY_MS,
        }
    }
}
