//! Seams between the timing core and the outside world
//!
//! The core never touches hardware, a display or the network directly.
//! Boards and test harnesses plug in through these traits.

mod capture;
mod clock;
mod presentation;
mod relay;
mod settings;

pub use capture::{
    CaptureError, CaptureRequest, CaptureStatus, PhotoCaptureService, MAX_CAMERA_ID_LEN,
    MAX_IMAGE_PREFIX_LEN, MAX_STATUS_LEN,
};
pub use clock::Clock;
pub use presentation::{CounterSnapshot, PresentationSurface, TimerReading};
pub use relay::RelayOutput;
pub use settings::SettingsStore;
