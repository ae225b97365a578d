//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod button;
pub mod controller;
pub mod settings;
pub mod tick;

pub use button::button_task;
pub use controller::controller_task;
pub use settings::settings_task;
pub use tick::tick_task;
