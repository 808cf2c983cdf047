//! Manifest publishing command.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use playground_manifest::{substitute_placeholders, Endpoints};

use super::config::ConfigFile;

/// Write the manifest with endpoint markers replaced.
pub fn run(config: &ConfigFile, out: &Path) -> Result<()> {
    let target = write_manifest(&config.paths.manifest, out, &config.endpoints())?;
    tracing::info!("Wrote {}", target.display());
    Ok(())
}

fn write_manifest(source: &Path, out: &Path, endpoints: &Endpoints) -> Result<PathBuf> {
    if endpoints.frontend_url.is_none() {
        tracing::warn!("FRONTEND_URL is not set; __FRONTEND__ will be left empty");
    }
    if endpoints.backend_url.is_none() {
        tracing::warn!("BACKEND_URL is not set; __BACKEND__ will be left empty");
    }

    let content = fs::read_to_string(source)
        .with_context(|| format!("Failed to read manifest {}", source.display()))?;

    fs::create_dir_all(out).with_context(|| format!("Failed to create {}", out.display()))?;

    let target = out.join("manifest.yaml");
    fs::write(&target, substitute_placeholders(&content, endpoints))
        .with_context(|| format!("Failed to write {}", target.display()))?;

    Ok(target)
}
