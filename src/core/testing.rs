//! In-memory transport and progress doubles for unit tests.

use crate::core::fetch::{RemoteBody, Transport};
use crate::core::progress::Progress;
use crate::error::TransferError;
use std::cell::RefCell;
use std::collections::HashMap;
use std::io::{Cursor, Read, Write};
use std::sync::{Arc, Mutex};
use tracing_subscriber::fmt::MakeWriter;

pub enum FakeResponse {
    Body {
        bytes: Vec<u8>,
        content_length: Option<u64>,
    },
    Status(u16),
    /// Yields the given bytes, then fails mid-stream.
    Broken(Vec<u8>),
}

impl FakeResponse {
    pub fn sized(bytes: Vec<u8>) -> Self {
        let content_length = Some(bytes.len() as u64);
        FakeResponse::Body {
            bytes,
            content_length,
        }
    }

    pub fn streamed(bytes: Vec<u8>) -> Self {
        FakeResponse::Body {
            bytes,
            content_length: None,
        }
    }
}

/// Serves canned responses and records every requested URL. Unknown URLs get a 404.
#[derive(Default)]
pub struct FakeTransport {
    responses: HashMap<String, FakeResponse>,
    requests: RefCell<Vec<String>>,
}

impl FakeTransport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, url: &str, response: FakeResponse) -> Self {
        self.responses.insert(url.to_string(), response);
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.borrow().clone()
    }
}

impl Transport for FakeTransport {
    fn get(&self, url: &str) -> Result<RemoteBody, TransferError> {
        self.requests.borrow_mut().push(url.to_string());

        match self.responses.get(url) {
            Some(FakeResponse::Body {
                bytes,
                content_length,
            }) => Ok(RemoteBody {
                content_length: *content_length,
                reader: Box::new(Cursor::new(bytes.clone())),
            }),
            Some(FakeResponse::Broken(prefix)) => Ok(RemoteBody {
                content_length: Some(prefix.len() as u64 * 2),
                reader: Box::new(Cursor::new(prefix.clone()).chain(BrokenReader)),
            }),
            Some(FakeResponse::Status(status)) => Err(TransferError::Status {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(TransferError::Status {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}

struct BrokenReader;

impl Read for BrokenReader {
    fn read(&mut self, _buf: &mut [u8]) -> std::io::Result<usize> {
        Err(std::io::Error::new(
            std::io::ErrorKind::ConnectionReset,
            "connection reset by peer",
        ))
    }
}

/// Shared in-memory sink for formatted log lines.
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buf: Arc<Mutex<Vec<u8>>>,
}

impl CapturedLogs {
    pub fn contents(&self) -> String {
        let buf = self.buf.lock().unwrap();
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// A plain-text subscriber writing into this buffer.
    pub fn subscriber(&self) -> impl tracing::Subscriber + Send + Sync {
        tracing_subscriber::fmt()
            .with_writer(self.clone())
            .with_ansi(false)
            .with_target(false)
            .without_time()
            .finish()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, data: &[u8]) -> std::io::Result<usize> {
        self.buf.lock().unwrap().extend_from_slice(data);
        Ok(data.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

#[derive(Debug, Default)]
pub struct RecordingProgress {
    pub begun: Vec<(String, Option<u64>)>,
    pub advances: Vec<u64>,
    pub finished: usize,
    pub abandoned: usize,
}

impl Progress for RecordingProgress {
    fn begin(&mut self, label: &str, total: Option<u64>) {
        self.begun.push((label.to_string(), total));
    }

    fn advance(&mut self, bytes: u64) {
        self.advances.push(bytes);
    }

    fn finish(&mut self) {
        self.finished += 1;
    }

    fn abandon(&mut self) {
        self.abandoned += 1;
    }
}
