//! Current firmware version lookup.
//!
//! Each variant publishes `{variant}/current/release.nfo`, a one-liner of the
//! form `<label>:<version>`. The version is the field after the first colon.

use std::path::{Path, PathBuf};

use fw_common::{AppError, AppResult};

use super::naming::Variant;

pub const MANIFEST_NAME: &str = "release.nfo";

/// Manifest location relative to the firmware root.
pub fn manifest_path(variant: Variant) -> PathBuf {
    Path::new(variant.as_str()).join("current").join(MANIFEST_NAME)
}

/// Read the current version string for `variant`.
///
/// A missing or unparsable manifest means the server is set up wrong, not
/// that the client asked for something odd.
pub async fn read_version(root: &Path, variant: Variant) -> AppResult<String> {
    let relative = manifest_path(variant);
    let data = tokio::fs::read_to_string(root.join(&relative))
        .await
        .map_err(|e| AppError::ServerMisconfigured {
            path: relative.display().to_string(),
            detail: e.to_string(),
        })?;

    let version = parse_version(&data).ok_or_else(|| AppError::ServerMisconfigured {
        path: relative.display().to_string(),
        detail: "no version after ':'".to_string(),
    })?;

    tracing::debug!(variant = %variant, version = %version, "Resolved current firmware version");
    Ok(version)
}

/// Second `:`-separated field; anything after a further colon is ignored.
fn parse_version(manifest: &str) -> Option<String> {
    let version = manifest.split(':').nth(1)?.trim();
    (!version.is_empty()).then(|| version.to_string())
}
