//! Requested-filename validation and normalisation.
//!
//! Turns whatever name an auto-updater asks for (old OpenWrt, Franken or fff
//! naming) into the variant and raw board token of the current build.

use std::fmt;
use std::sync::OnceLock;

use fw_common::{AppError, AppResult};
use regex::Regex;

/// Allow-list for requested names. Anchored, no path separators and nothing
/// that cannot go verbatim into a Content-Disposition header.
const FILE_PATTERN: &str = r"^(fff-[\w.]+|openwrt|franken-[\w.]+)-[\w.+-]*\.bin(\.md5|\.sha256)?$";

/// Applied in order; each strips everything up to the build-type infix.
const INFIX_PATTERNS: &[&str] = &[
    r"(.*)-generic-",
    r"(.*)-tiny-",
    r"(.*)-g-",
    r"(.*)-t-",
    r"fff-([^-]*)-([^-]*)-",
];

/// Applied after the infixes.
const SUFFIX_PATTERNS: &[&str] = &[r"-squashfs(.*)", r"-sysupgrade(.*)"];

fn file_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(FILE_PATTERN).expect("valid filename pattern"))
}

fn board_regexes() -> &'static [Regex] {
    static RES: OnceLock<Vec<Regex>> = OnceLock::new();
    RES.get_or_init(|| {
        INFIX_PATTERNS
            .iter()
            .chain(SUFFIX_PATTERNS)
            .map(|p| Regex::new(p).expect("valid board pattern"))
            .collect()
    })
}

// ─── Types ───────────────────────────────────────────────────

/// Checksum sidecar flavour, taken from the requested extension.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChecksumKind {
    Md5,
    Sha256,
}

impl ChecksumKind {
    /// Extension including the leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            Self::Md5 => ".md5",
            Self::Sha256 => ".sha256",
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        [Self::Md5, Self::Sha256]
            .into_iter()
            .find(|kind| name.ends_with(kind.extension()))
    }
}

/// Deployment flavour; each lives in its own subdirectory.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Variant {
    Node,
    Layer3,
}

impl Variant {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Node => "node",
            Self::Layer3 => "layer3",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A requested filename that passed the allow-list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FirmwareRequest {
    name: String,
    checksum: Option<ChecksumKind>,
}

impl FirmwareRequest {
    pub fn parse(file: &str) -> AppResult<Self> {
        if !file_regex().is_match(file) {
            return Err(AppError::InvalidFilename {
                file: file.to_string(),
            });
        }

        Ok(Self {
            name: file.to_string(),
            checksum: ChecksumKind::from_name(file),
        })
    }

    /// The name exactly as requested.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn checksum(&self) -> Option<ChecksumKind> {
        self.checksum
    }

    /// The requested name without a checksum extension, i.e. the image the
    /// client will verify locally.
    pub fn image_name(&self) -> &str {
        match self.checksum {
            Some(kind) => self
                .name
                .strip_suffix(kind.extension())
                .unwrap_or(&self.name),
            None => &self.name,
        }
    }

    pub fn variant(&self) -> Variant {
        extract_variant(&self.name)
    }

    pub fn board(&self) -> String {
        extract_board(&self.name)
    }
}

// ─── Normalisation ───────────────────────────────────────────

pub fn extract_variant(filename: &str) -> Variant {
    if filename.contains("layer3") {
        Variant::Layer3
    } else {
        Variant::Node
    }
}

/// Strip build-type infixes, then image-type suffixes, leaving the board.
pub fn extract_board(filename: &str) -> String {
    board_regexes()
        .iter()
        .fold(filename.to_string(), |name, re| {
            re.replace_all(&name, "").into_owned()
        })
}
