//! Canonical artifact paths and checksum sidecar rewriting.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use fw_common::{AppError, AppResult};

use super::naming::{ChecksumKind, Variant};

/// `{variant}/current/fff-{version}-{board}-sysupgrade.bin[.md5|.sha256]`,
/// relative to the firmware root.
pub fn canonical_path(
    variant: Variant,
    version: &str,
    board: &str,
    checksum: Option<ChecksumKind>,
) -> PathBuf {
    let mut file = format!("fff-{}-{}-sysupgrade.bin", version, board);
    if let Some(kind) = checksum {
        file.push_str(kind.extension());
    }
    Path::new(variant.as_str()).join("current").join(file)
}

/// Resolve `relative` under `root` to an existing regular file.
///
/// The result is canonicalised and must stay inside the canonical root, even
/// though requested names have already passed the allow-list.
pub async fn resolve_artifact(root: &Path, relative: &Path, requested: &str) -> AppResult<PathBuf> {
    let not_found = || AppError::NotFound {
        file: requested.to_string(),
        resolved: relative.display().to_string(),
    };

    let root = tokio::fs::canonicalize(root)
        .await
        .map_err(|e| AppError::ServerMisconfigured {
            path: root.display().to_string(),
            detail: e.to_string(),
        })?;

    let full = match tokio::fs::canonicalize(root.join(relative)).await {
        Ok(p) => p,
        Err(e) if e.kind() == ErrorKind::PermissionDenied => return Err(e.into()),
        Err(e) => {
            tracing::debug!(resolved = %relative.display(), error = %e, "Firmware file not resolvable");
            return Err(not_found());
        }
    };

    if !full.starts_with(&root) {
        tracing::warn!(
            requested = %requested,
            resolved = %full.display(),
            "Resolved firmware path escapes the firmware root"
        );
        return Err(not_found());
    }

    if !tokio::fs::metadata(&full).await?.is_file() {
        return Err(not_found());
    }

    Ok(full)
}

/// Replace the filename in a `<digest>  <filename>` sidecar with the name the
/// client asked for, so its own `sha256sum -c`/`md5sum -c` matches.
///
/// Returns `None` when the content holds no digest token.
pub fn rewrite_checksum(content: &str, image_name: &str) -> Option<String> {
    let digest = content.split_whitespace().next()?;
    Some(format!("{}  {}\n", digest, image_name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canonical_path_layout() {
        assert_eq!(
            canonical_path(Variant::Node, "1.9.0", "tplink_tl-wr841-v9", None),
            PathBuf::from("node/current/fff-1.9.0-tplink_tl-wr841-v9-sysupgrade.bin")
        );
        assert_eq!(
            canonical_path(
                Variant::Layer3,
                "2.0",
                "glinet_gl-ar150",
                Some(ChecksumKind::Sha256)
            ),
            PathBuf::from("layer3/current/fff-2.0-glinet_gl-ar150-sysupgrade.bin.sha256")
        );
        assert_eq!(
            canonical_path(Variant::Node, "2.0", "x", Some(ChecksumKind::Md5)),
            PathBuf::from("node/current/fff-2.0-x-sysupgrade.bin.md5")
        );
    }

    #[test]
    fn checksum_keeps_digest_and_swaps_name() {
        assert_eq!(
            rewrite_checksum("abc123  fff-1.9.0-tplink_tl-wr841-v9-sysupgrade.bin\n", "oldname.bin")
                .as_deref(),
            Some("abc123  oldname.bin\n")
        );
        assert_eq!(
            rewrite_checksum("abc123  oldname.bin", "oldname.bin").as_deref(),
            Some("abc123  oldname.bin\n")
        );
        // bare digest without a filename
        assert_eq!(
            rewrite_checksum("d41d8cd98f00b204e9800998ecf8427e\n", "a.bin").as_deref(),
            Some("d41d8cd98f00b204e9800998ecf8427e  a.bin\n")
        );
    }

    #[test]
    fn empty_checksum_is_malformed() {
        assert_eq!(rewrite_checksum("", "a.bin"), None);
        assert_eq!(rewrite_checksum("  \n\t", "a.bin"), None);
    }

    #[tokio::test]
    async fn resolves_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let current = dir.path().join("node/current");
        std::fs::create_dir_all(&current).unwrap();
        std::fs::write(current.join("fff-1.0-b-sysupgrade.bin"), b"image").unwrap();

        let relative = canonical_path(Variant::Node, "1.0", "b", None);
        let full = resolve_artifact(dir.path(), &relative, "openwrt-b.bin")
            .await
            .unwrap();
        assert!(full.ends_with("node/current/fff-1.0-b-sysupgrade.bin"));
    }

    #[tokio::test]
    async fn missing_file_reports_rewritten_path() {
        let dir = tempfile::tempdir().unwrap();
        let relative = canonical_path(Variant::Node, "1.0", "b", Some(ChecksumKind::Md5));

        let err = resolve_artifact(dir.path(), &relative, "openwrt-b.bin.md5")
            .await
            .unwrap_err();
        match err {
            AppError::NotFound { file, resolved } => {
                assert_eq!(file, "openwrt-b.bin.md5");
                assert_eq!(resolved, "node/current/fff-1.0-b-sysupgrade.bin.md5");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn paths_outside_root_are_not_served() {
        let outer = tempfile::tempdir().unwrap();
        let root = outer.path().join("firmware");
        std::fs::create_dir_all(&root).unwrap();
        std::fs::write(outer.path().join("secret.bin"), b"secret").unwrap();

        let err = resolve_artifact(&root, Path::new("../secret.bin"), "openwrt-x.bin")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }

    #[tokio::test]
    async fn directories_are_not_served() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::create_dir_all(dir.path().join("node/current")).unwrap();

        let err = resolve_artifact(dir.path(), Path::new("node/current"), "openwrt-x.bin")
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound { .. }));
    }
}
