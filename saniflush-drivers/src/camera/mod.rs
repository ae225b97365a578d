//! Photo capture transports

pub mod http;

pub use http::{HttpCaptureClient, RESPONSE_BUFFER_LEN};
