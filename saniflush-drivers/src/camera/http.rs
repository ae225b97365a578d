//! HTTP/1.0 photo capture client
//!
//! Sends one `GET /capture` per photo over any `embedded-io` byte stream
//! (on the board, a UART to a network bridge) and waits for the answer
//! until a deadline taken from an injected clock.
//!
//! ```text
//! GET /capture?camera=cam0&prefix=left&flip=0 HTTP/1.0
//! Host: camera.local
//!
//! HTTP/1.0 200 OK
//! Content-Length: 11
//!
//! saved 00042
//! ```
//!
//! A 2xx answer is success and its body becomes the status text. Any
//! other code is a rejection.

use core::fmt::Write as _;

use embedded_io::{Read, ReadReady, Write};
use heapless::String;
use saniflush_core::config::MAX_HOST_LEN;
use saniflush_core::traits::{
    CaptureError, CaptureRequest, CaptureStatus, Clock, PhotoCaptureService,
};
use saniflush_core::Millis;

/// Bytes of response kept; anything past this is dropped
pub const RESPONSE_BUFFER_LEN: usize = 256;

const REQUEST_LINE_LEN: usize = 192;

/// Capture client over a blocking byte stream
pub struct HttpCaptureClient<T, C> {
    transport: T,
    clock: C,
    host: String<MAX_HOST_LEN>,
    timeout_ms: u64,
}

impl<T, C> HttpCaptureClient<T, C>
where
    T: Read + Write + ReadReady,
    C: Clock,
{
    pub fn new(transport: T, clock: C, host: &str, timeout_ms: u32) -> Self {
        let mut h = String::new();
        // over-long hosts are cut rather than rejected
        for ch in host.chars() {
            if h.push(ch).is_err() {
                break;
            }
        }
        Self {
            transport,
            clock,
            host: h,
            timeout_ms: u64::from(timeout_ms),
        }
    }

    fn send(&mut self, request: &CaptureRequest) -> Result<(), CaptureError> {
        let mut head: String<REQUEST_LINE_LEN> = String::new();
        write_request(&mut head, request, &self.host).map_err(|_| CaptureError::Malformed)?;

        self.transport
            .write_all(head.as_bytes())
            .map_err(|_| CaptureError::Transport)?;
        self.transport.flush().map_err(|_| CaptureError::Transport)
    }

    fn receive(&mut self, deadline: Millis) -> Result<CaptureStatus, CaptureError> {
        let mut buf = [0u8; RESPONSE_BUFFER_LEN];
        let mut len = 0;

        loop {
            if len == buf.len() || response_complete(&buf[..len]) {
                break;
            }
            if self.clock.now_ms() >= deadline {
                return Err(CaptureError::Timeout);
            }
            let ready = self
                .transport
                .read_ready()
                .map_err(|_| CaptureError::Transport)?;
            if !ready {
                continue;
            }
            let n = self
                .transport
                .read(&mut buf[len..])
                .map_err(|_| CaptureError::Transport)?;
            if n == 0 {
                // peer closed: HTTP/1.0 end of body
                break;
            }
            len += n;
        }

        parse_response(&buf[..len])
    }
}

impl<T, C> PhotoCaptureService for HttpCaptureClient<T, C>
where
    T: Read + Write + ReadReady,
    C: Clock,
{
    fn capture(&mut self, request: &CaptureRequest) -> Result<CaptureStatus, CaptureError> {
        let deadline = self.clock.now_ms().saturating_add(self.timeout_ms);
        self.send(request)?;
        self.receive(deadline)
    }
}

fn write_request<W: core::fmt::Write>(
    out: &mut W,
    request: &CaptureRequest,
    host: &str,
) -> core::fmt::Result {
    out.write_str("GET /capture?camera=")?;
    write_query_value(out, &request.camera_id)?;
    out.write_str("&prefix=")?;
    write_query_value(out, &request.image_prefix)?;
    write!(
        out,
        "&flip={} HTTP/1.0\r\nHost: {}\r\n\r\n",
        u8::from(request.flip_vertical),
        host
    )
}

/// Percent-encode everything outside the unreserved set
fn write_query_value<W: core::fmt::Write>(out: &mut W, value: &str) -> core::fmt::Result {
    for b in value.bytes() {
        if b.is_ascii_alphanumeric() || matches!(b, b'-' | b'_' | b'.' | b'~') {
            out.write_char(char::from(b))?;
        } else {
            write!(out, "%{:02X}", b)?;
        }
    }
    Ok(())
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn header_end(buf: &[u8]) -> Option<usize> {
    find(buf, b"\r\n\r\n").map(|i| i + 4)
}

fn content_length(head: &[u8]) -> Option<usize> {
    let head = core::str::from_utf8(head).ok()?;
    head.split("\r\n").find_map(|line| {
        let (name, value) = line.split_once(':')?;
        if name.trim().eq_ignore_ascii_case("content-length") {
            value.trim().parse().ok()
        } else {
            None
        }
    })
}

/// Headers received and, when a length was announced, the whole body
fn response_complete(buf: &[u8]) -> bool {
    let Some(end) = header_end(buf) else {
        return false;
    };
    // an announced length past usize::MAX can never be satisfied
    content_length(&buf[..end])
        .and_then(|n| end.checked_add(n))
        .is_some_and(|total| buf.len() >= total)
}

fn parse_status_code(head: &[u8]) -> Result<u16, CaptureError> {
    let line_end = find(head, b"\r\n").ok_or(CaptureError::Malformed)?;
    let line = core::str::from_utf8(&head[..line_end]).map_err(|_| CaptureError::Malformed)?;

    let mut parts = line.split_ascii_whitespace();
    let version = parts.next().ok_or(CaptureError::Malformed)?;
    if !version.starts_with("HTTP/") {
        return Err(CaptureError::Malformed);
    }
    parts
        .next()
        .and_then(|code| code.parse().ok())
        .ok_or(CaptureError::Malformed)
}

fn parse_response(buf: &[u8]) -> Result<CaptureStatus, CaptureError> {
    let end = header_end(buf).ok_or(CaptureError::Malformed)?;
    let code = parse_status_code(&buf[..end])?;
    if !(200..300).contains(&code) {
        return Err(CaptureError::Rejected(code));
    }

    let mut body = &buf[end..];
    if let Some(n) = content_length(&buf[..end]) {
        body = &body[..n.min(body.len())];
    }

    let text = match core::str::from_utf8(body) {
        Ok(text) => text,
        // keep the valid prefix of a body cut mid-character
        Err(e) => core::str::from_utf8(&body[..e.valid_up_to()]).unwrap_or(""),
    };

    let mut status = CaptureStatus::new();
    for ch in text.trim().chars() {
        if status.push(ch).is_err() {
            break;
        }
    }
    Ok(status)
}

#[cfg(test)]
mod tests {
    use super::*;
    use core::cell::Cell;
    use embedded_io::{ErrorKind, ErrorType};
    use saniflush_core::traits::MAX_STATUS_LEN;
    use std::vec::Vec;

    /// Stream that records writes and replays a scripted response
    struct MockStream {
        sent: Vec<u8>,
        response: Vec<u8>,
        pos: usize,
        /// Largest chunk handed out per read
        chunk: usize,
        fail_writes: bool,
    }

    impl MockStream {
        fn new(response: &[u8]) -> Self {
            Self {
                sent: Vec::new(),
                response: response.to_vec(),
                pos: 0,
                chunk: 7,
                fail_writes: false,
            }
        }
    }

    impl ErrorType for MockStream {
        type Error = ErrorKind;
    }

    impl Read for MockStream {
        fn read(&mut self, buf: &mut [u8]) -> Result<usize, Self::Error> {
            let n = self.chunk.min(buf.len()).min(self.response.len() - self.pos);
            buf[..n].copy_from_slice(&self.response[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    impl ReadReady for MockStream {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(true)
        }
    }

    impl Write for MockStream {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            if self.fail_writes {
                return Err(ErrorKind::BrokenPipe);
            }
            self.sent.extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    /// Stream that never has data
    struct SilentStream;

    impl ErrorType for SilentStream {
        type Error = ErrorKind;
    }

    impl Read for SilentStream {
        fn read(&mut self, _buf: &mut [u8]) -> Result<usize, Self::Error> {
            Ok(0)
        }
    }

    impl ReadReady for SilentStream {
        fn read_ready(&mut self) -> Result<bool, Self::Error> {
            Ok(false)
        }
    }

    impl Write for SilentStream {
        fn write(&mut self, buf: &[u8]) -> Result<usize, Self::Error> {
            Ok(buf.len())
        }

        fn flush(&mut self) -> Result<(), Self::Error> {
            Ok(())
        }
    }

    /// Clock that advances 10 ms per reading
    #[derive(Default)]
    struct StepClock(Cell<Millis>);

    impl Clock for StepClock {
        fn now_ms(&self) -> Millis {
            let now = self.0.get();
            self.0.set(now + 10);
            now
        }
    }

    fn request(camera: &str, prefix: &str, flip: bool) -> CaptureRequest {
        CaptureRequest::new(camera, prefix, flip).unwrap()
    }

    #[test]
    fn test_request_format() {
        let stream = MockStream::new(b"HTTP/1.0 200 OK\r\nContent-Length: 2\r\n\r\nok");
        let mut client = HttpCaptureClient::new(stream, StepClock::default(), "camera.local", 3000);

        client.capture(&request("cam1", "left side", true)).unwrap();
        assert_eq!(
            client.transport.sent.as_slice(),
            b"GET /capture?camera=cam1&prefix=left%20side&flip=1 HTTP/1.0\r\nHost: camera.local\r\n\r\n"
        );
    }

    #[test]
    fn test_success_returns_trimmed_body() {
        let stream = MockStream::new(
            b"HTTP/1.0 200 OK\r\ncontent-length: 15\r\n\r\n  saved 00042\r\n",
        );
        let mut client = HttpCaptureClient::new(stream, StepClock::default(), "cam", 3000);

        let status = client.capture(&request("cam0", "left", false)).unwrap();
        assert_eq!(status.as_str(), "saved 00042");
    }

    #[test]
    fn test_body_until_close_without_length() {
        let stream = MockStream::new(b"HTTP/1.0 201 Created\r\n\r\nstored");
        let mut client = HttpCaptureClient::new(stream, StepClock::default(), "cam", 3000);

        let status = client.capture(&request("cam0", "left", false)).unwrap();
        assert_eq!(status.as_str(), "stored");
    }

    #[test]
    fn test_error_status_is_rejected() {
        let stream = MockStream::new(b"HTTP/1.0 503 Busy\r\nContent-Length: 0\r\n\r\n");
        let mut client = HttpCaptureClient::new(stream, StepClock::default(), "cam", 3000);

        let err = client.capture(&request("cam0", "left", false)).unwrap_err();
        assert_eq!(err, CaptureError::Rejected(503));
    }

    #[test]
    fn test_garbage_is_malformed() {
        let stream = MockStream::new(b"hello\r\n\r\n");
        let mut client = HttpCaptureClient::new(stream, StepClock::default(), "cam", 3000);
        assert_eq!(
            client.capture(&request("cam0", "left", false)),
            Err(CaptureError::Malformed)
        );

        let stream = MockStream::new(b"HTTP/1.0 200");
        let mut client = HttpCaptureClient::new(stream, StepClock::default(), "cam", 3000);
        assert_eq!(
            client.capture(&request("cam0", "left", false)),
            Err(CaptureError::Malformed)
        );
    }

    #[test]
    fn test_silence_times_out() {
        let mut client = HttpCaptureClient::new(SilentStream, StepClock::default(), "cam", 100);
        assert_eq!(
            client.capture(&request("cam0", "left", false)),
            Err(CaptureError::Timeout)
        );
    }

    #[test]
    fn test_write_failure_is_transport_error() {
        let mut stream = MockStream::new(b"");
        stream.fail_writes = true;
        let mut client = HttpCaptureClient::new(stream, StepClock::default(), "cam", 100);
        assert_eq!(
            client.capture(&request("cam0", "left", false)),
            Err(CaptureError::Transport)
        );
    }

    #[test]
    fn test_huge_content_length_reads_until_close() {
        let response = b"HTTP/1.0 200 OK\r\nContent-Length: 18446744073709551615\r\n\r\nx";
        assert!(!response_complete(response));

        let mut client =
            HttpCaptureClient::new(MockStream::new(response), StepClock::default(), "cam", 3000);
        let status = client.capture(&request("cam0", "left", false)).unwrap();
        assert_eq!(status.as_str(), "x");
    }

    #[test]
    fn test_long_body_is_cut_to_status_capacity() {
        let mut response = Vec::new();
        response.extend_from_slice(b"HTTP/1.0 200 OK\r\n\r\n");
        response.extend(core::iter::repeat(b'x').take(100));
        let mut client = HttpCaptureClient::new(
            MockStream::new(&response),
            StepClock::default(),
            "cam",
            3000,
        );

        let status = client.capture(&request("cam0", "left", false)).unwrap();
        assert_eq!(status.len(), MAX_STATUS_LEN);
    }
}
