//! Photo capture service trait

use heapless::String;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

pub const MAX_CAMERA_ID_LEN: usize = 16;
pub const MAX_IMAGE_PREFIX_LEN: usize = 24;
pub const MAX_STATUS_LEN: usize = 48;

/// Free-form status text returned by the capture service
pub type CaptureStatus = String<MAX_STATUS_LEN>;

/// One photo request
#[derive(Debug, Clone, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct CaptureRequest {
    pub camera_id: String<MAX_CAMERA_ID_LEN>,
    /// Prefix for the stored image name
    pub image_prefix: String<MAX_IMAGE_PREFIX_LEN>,
    pub flip_vertical: bool,
}

impl CaptureRequest {
    /// Build a request, `None` if either string exceeds its capacity
    pub fn new(camera_id: &str, image_prefix: &str, flip_vertical: bool) -> Option<Self> {
        let mut request = Self {
            flip_vertical,
            ..Default::default()
        };
        request.camera_id.push_str(camera_id).ok()?;
        request.image_prefix.push_str(image_prefix).ok()?;
        Some(request)
    }
}

/// Capture failures
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CaptureError {
    /// No complete response before the deadline
    Timeout,
    /// Link to the camera service failed
    Transport,
    /// Service answered with a non-success status code
    Rejected(u16),
    /// Response could not be parsed
    Malformed,
}

/// Remote photo capture service
///
/// `capture` blocks until the service answers or its own timeout expires.
pub trait PhotoCaptureService {
    fn capture(&mut self, request: &CaptureRequest) -> Result<CaptureStatus, CaptureError>;
}
