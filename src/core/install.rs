use crate::core::catalog::{ArtifactSpec, Catalog};
use crate::core::fetch::{Fetcher, Transport};
use crate::core::progress::Progress;
use crate::utils::fs;
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Transfer,
    Unexpected,
}

/// Terminal state of one catalog entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum ArtifactStatus {
    Skipped,
    Done { bytes: u64 },
    Failed { kind: FailureKind, message: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArtifactOutcome {
    pub name: String,
    pub path: PathBuf,
    #[serde(flatten)]
    pub status: ArtifactStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct InstallReport {
    pub outcomes: Vec<ArtifactOutcome>,
}

impl InstallReport {
    pub fn skipped(&self) -> usize {
        self.count(|s| matches!(s, ArtifactStatus::Skipped))
    }

    pub fn installed(&self) -> usize {
        self.count(|s| matches!(s, ArtifactStatus::Done { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|s| matches!(s, ArtifactStatus::Failed { .. }))
    }

    pub fn has_failures(&self) -> bool {
        self.failed() > 0
    }

    pub fn failures(&self) -> impl Iterator<Item = &ArtifactOutcome> {
        self.outcomes
            .iter()
            .filter(|o| matches!(o.status, ArtifactStatus::Failed { .. }))
    }

    fn count(&self, pred: impl Fn(&ArtifactStatus) -> bool) -> usize {
        self.outcomes.iter().filter(|o| pred(&o.status)).count()
    }
}

/// Makes sure every catalog entry exists on disk, fetching the missing ones.
///
/// A file at the expected path counts as installed; its contents are not
/// inspected. Failures are logged per artifact and never stop the run.
pub struct Installer<T, P> {
    fetcher: Fetcher<T>,
    progress: P,
}

impl<T: Transport, P: Progress> Installer<T, P> {
    pub fn new(fetcher: Fetcher<T>, progress: P) -> Self {
        Self { fetcher, progress }
    }

    pub fn fetcher(&self) -> &Fetcher<T> {
        &self.fetcher
    }

    pub fn progress(&self) -> &P {
        &self.progress
    }

    pub fn install(&mut self, catalog: &Catalog) -> InstallReport {
        for dir in catalog.destination_directories() {
            if let Err(e) = fs::ensure_dir_exists(dir) {
                tracing::error!("Could not create {}: {e}", dir.display());
            }
        }

        let mut report = InstallReport::default();
        for artifact in catalog.artifacts() {
            let status = self.install_artifact(&artifact);
            report.outcomes.push(ArtifactOutcome {
                path: artifact.local_path(),
                name: artifact.name,
                status,
            });
        }

        tracing::info!(
            installed = report.installed(),
            skipped = report.skipped(),
            failed = report.failed(),
            "model check finished"
        );
        report
    }

    fn install_artifact(&mut self, artifact: &ArtifactSpec) -> ArtifactStatus {
        let task = artifact.task();

        if task.local_path.exists() {
            tracing::debug!("{} already present, skipping", task.local_path.display());
            return ArtifactStatus::Skipped;
        }

        tracing::info!("Downloading {} from {}", artifact.name, task.remote_url);
        match self
            .fetcher
            .fetch(&task.remote_url, &task.local_path, &artifact.name, &mut self.progress)
        {
            Ok(transferred) => ArtifactStatus::Done {
                bytes: transferred.bytes_transferred,
            },
            Err(e) if e.is_transfer() => {
                tracing::error!("Error downloading model {}: {e}", artifact.name);
                ArtifactStatus::Failed {
                    kind: FailureKind::Transfer,
                    message: e.to_string(),
                }
            }
            Err(e) => {
                tracing::error!("Unexpected error while installing {}: {e}", artifact.name);
                ArtifactStatus::Failed {
                    kind: FailureKind::Unexpected,
                    message: e.to_string(),
                }
            }
        }
    }
}
