//! Loading the manifest from disk.

use std::fs;
use std::path::{Path, PathBuf};

use crate::model::Manifest;
use crate::names::is_custom_element_name;

/// Errors that prevent the manifest from loading.
///
/// All of them are fatal: the playground never serves pages without a
/// manifest.
#[derive(Debug, thiserror::Error)]
pub enum ManifestLoadError {
    #[error("Failed to read manifest {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid manifest {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("Invalid manifest {0}: `tag` must not be empty")]
    EmptyTag(PathBuf),

    #[error("Invalid manifest {path}: `{tag}` is not a valid custom element name")]
    InvalidTag { path: PathBuf, tag: String },
}

/// Load and parse the manifest at `path`.
pub fn load(path: &Path) -> Result<Manifest, ManifestLoadError> {
    let content = fs::read_to_string(path).map_err(|source| ManifestLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;

    let manifest = Manifest::from_yaml(&content).map_err(|source| ManifestLoadError::Parse {
        path: path.to_path_buf(),
        source,
    })?;

    if manifest.tag.trim().is_empty() {
        return Err(ManifestLoadError::EmptyTag(path.to_path_buf()));
    }

    if !is_custom_element_name(&manifest.tag) {
        return Err(ManifestLoadError::InvalidTag {
            path: path.to_path_buf(),
            tag: manifest.tag,
        });
    }

    tracing::info!("Loaded manifest for <{}> from {}", manifest.tag, path.display());

    Ok(manifest)
}
