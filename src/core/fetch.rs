//! Streams a remote artifact into a local file.
//!
//! The fetcher is a pure "transfer bytes" primitive: it never checks whether
//! the destination already exists and overwrites it silently. Deciding
//! whether a fetch is needed is the installer's job.

use crate::core::progress::{Progress, TransferProgress};
use crate::error::{ModelsError, Result, TransferError};
use crate::utils::fs;
use std::fs::File;
use std::io::{ErrorKind, Read, Write};
use std::path::{Path, PathBuf};

pub const DEFAULT_CHUNK_SIZE: usize = 8192;

/// An open response body with its announced size.
pub struct RemoteBody {
    pub content_length: Option<u64>,
    pub reader: Box<dyn Read>,
}

/// Opens streaming GET requests.
///
/// Implementations must reject non-success responses with
/// [`TransferError::Status`] instead of handing back the error body.
pub trait Transport {
    fn get(&self, url: &str) -> std::result::Result<RemoteBody, TransferError>;
}

/// [`Transport`] backed by a blocking `reqwest` client.
pub struct HttpTransport {
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    pub fn new() -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(concat!("rvc-models/", env!("CARGO_PKG_VERSION")))
            // model files are large; no overall deadline on a transfer
            .timeout(None)
            .build()
            .map_err(|e| ModelsError::config_error(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub fn with_client(client: reqwest::blocking::Client) -> Self {
        Self { client }
    }
}

impl Transport for HttpTransport {
    fn get(&self, url: &str) -> std::result::Result<RemoteBody, TransferError> {
        let response = self
            .client
            .get(url)
            .send()
            .map_err(|source| TransferError::Request {
                url: url.to_string(),
                source,
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(TransferError::Status {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(RemoteBody {
            content_length: response.content_length(),
            reader: Box::new(response),
        })
    }
}

pub struct Fetcher<T> {
    transport: T,
    chunk_size: usize,
    atomic: bool,
}

impl<T: Transport> Fetcher<T> {
    pub fn new(transport: T) -> Self {
        Self {
            transport,
            chunk_size: DEFAULT_CHUNK_SIZE,
            atomic: false,
        }
    }

    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size.max(1);
        self
    }

    /// Write into `<name>.part` and rename into place only once the transfer
    /// has completed, so a half-written file never sits at the final path.
    pub fn atomic(mut self, atomic: bool) -> Self {
        self.atomic = atomic;
        self
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// Downloads `remote_url` into `local_path`, reporting each chunk under `label`.
    ///
    /// The parent directory of `local_path` must already exist. On error the
    /// contents of `local_path` are unspecified unless atomic mode is on.
    pub fn fetch(
        &self,
        remote_url: &str,
        local_path: &Path,
        label: &str,
        progress: &mut dyn Progress,
    ) -> Result<TransferProgress> {
        let body = self.transport.get(remote_url)?;

        let target = if self.atomic {
            partial_path(local_path)
        } else {
            local_path.to_path_buf()
        };

        match self.write_body(remote_url, body, &target, label, progress) {
            Ok(transferred) => {
                progress.finish();
                if self.atomic {
                    fs::replace_file(&target, local_path)?;
                }
                tracing::debug!(
                    url = remote_url,
                    bytes = transferred.bytes_transferred,
                    "transfer complete"
                );
                Ok(transferred)
            }
            Err(e) => {
                progress.abandon();
                if self.atomic {
                    if let Err(cleanup) = fs::remove_file_if_exists(&target) {
                        tracing::debug!("could not remove {}: {cleanup}", target.display());
                    }
                }
                Err(e)
            }
        }
    }

    fn write_body(
        &self,
        remote_url: &str,
        body: RemoteBody,
        target: &Path,
        label: &str,
        progress: &mut dyn Progress,
    ) -> Result<TransferProgress> {
        let RemoteBody {
            content_length,
            mut reader,
        } = body;

        let mut file = File::create(target).map_err(|e| fs::map_permission(e, target))?;
        let mut state = TransferProgress::new(content_length);
        progress.begin(label, content_length);

        let mut buf = vec![0u8; self.chunk_size];
        loop {
            let n = match reader.read(&mut buf) {
                Ok(0) => break,
                Ok(n) => n,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(source) => {
                    return Err(TransferError::Body {
                        url: remote_url.to_string(),
                        source,
                    }
                    .into())
                }
            };

            file.write_all(&buf[..n])?;
            state.record(n as u64);
            progress.advance(n as u64);
        }

        file.flush()?;
        Ok(state)
    }
}

fn partial_path(local_path: &Path) -> PathBuf {
    let mut name = local_path.file_name().unwrap_or_default().to_os_string();
    name.push(".part");
    local_path.with_file_name(name)
}
