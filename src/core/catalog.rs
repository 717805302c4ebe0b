//! The static list of model files RVC needs, grouped by where they are hosted
//! and where they land on disk.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const PREDICTORS_URL: &str =
    "https://huggingface.co/AnhP/Vietnamese-RVC-Project/resolve/main/predictors/";
pub const EMBEDDERS_URL: &str =
    "https://huggingface.co/Politrees/RVC_resources/resolve/main/embedders/pytorch/";

pub const PREDICTORS: &[&str] = &[
    "rmvpe.pt",
    "fcpe.pt",
    "fcpe_legacy.pt",
    "crepe_full.pth",
    "crepe_large.pth",
    "crepe_medium.pth",
    "crepe_small.pth",
    "crepe_tiny.pth",
    "fcn.pt",
];

pub const ONNX_PREDICTORS: &[&str] = &[
    "rmvpe.onnx",
    "fcpe.onnx",
    "fcpe_legacy.onnx",
    "crepe_full.onnx",
    "crepe_large.onnx",
    "crepe_medium.onnx",
    "crepe_small.onnx",
    "crepe_tiny.onnx",
    "fcn.onnx",
];

pub const EMBEDDERS: &[&str] = &["hubert_base.pt"];

/// A single artifact: where it lives remotely and where it belongs locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactSpec {
    pub name: String,
    pub base_location: String,
    pub destination_directory: PathBuf,
}

/// The concrete source and target of one fetch attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DownloadTask {
    pub remote_url: String,
    pub local_path: PathBuf,
}

impl ArtifactSpec {
    pub fn task(&self) -> DownloadTask {
        DownloadTask {
            remote_url: format!("{}{}", self.base_location, self.name),
            local_path: self.local_path(),
        }
    }

    pub fn local_path(&self) -> PathBuf {
        self.destination_directory.join(&self.name)
    }
}

/// Artifacts sharing a base location and destination directory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArtifactGroup {
    pub base_location: String,
    pub destination_directory: PathBuf,
    pub names: Vec<String>,
}

impl ArtifactGroup {
    pub fn new<S: AsRef<str>>(
        base_location: impl Into<String>,
        destination_directory: impl Into<PathBuf>,
        names: &[S],
    ) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(names.len());
        for name in names {
            let name = name.as_ref();
            if !unique.iter().any(|n| n == name) {
                unique.push(name.to_string());
            }
        }

        Self {
            base_location: base_location.into(),
            destination_directory: destination_directory.into(),
            names: unique,
        }
    }

    pub fn artifacts(&self) -> impl Iterator<Item = ArtifactSpec> + '_ {
        self.names.iter().map(|name| ArtifactSpec {
            name: name.clone(),
            base_location: self.base_location.clone(),
            destination_directory: self.destination_directory.clone(),
        })
    }
}

/// Remote base locations for the two artifact families.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Sources {
    pub predictors: String,
    pub embedders: String,
}

impl Default for Sources {
    fn default() -> Self {
        Self {
            predictors: PREDICTORS_URL.to_string(),
            embedders: EMBEDDERS_URL.to_string(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Catalog {
    pub groups: Vec<ArtifactGroup>,
}

impl Catalog {
    pub fn new(groups: Vec<ArtifactGroup>) -> Self {
        Self { groups }
    }

    /// The RVC predictor and embedder catalog rooted at `root`.
    pub fn rvc(root: &Path, sources: &Sources, include_onnx: bool) -> Self {
        let mut predictors: Vec<&str> = PREDICTORS.to_vec();
        if include_onnx {
            predictors.extend_from_slice(ONNX_PREDICTORS);
        }

        Self::new(vec![
            ArtifactGroup::new(
                sources.predictors.clone(),
                root.join("predictors"),
                predictors.as_slice(),
            ),
            ArtifactGroup::new(sources.embedders.clone(), root.join("embedders"), EMBEDDERS),
        ])
    }

    pub fn artifacts(&self) -> impl Iterator<Item = ArtifactSpec> + '_ {
        self.groups.iter().flat_map(|group| group.artifacts())
    }

    pub fn destination_directories(&self) -> Vec<&Path> {
        let mut dirs: Vec<&Path> = Vec::new();
        for group in &self.groups {
            let dir = group.destination_directory.as_path();
            if !dirs.contains(&dir) {
                dirs.push(dir);
            }
        }
        dirs
    }

    pub fn len(&self) -> usize {
        self.groups.iter().map(|g| g.names.len()).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
