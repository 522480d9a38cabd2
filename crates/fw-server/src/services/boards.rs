//! Historical board renames.
//!
//! Board names in image filenames change between OpenWrt releases (vendor
//! prefixes get added, Ubiquiti models get spelled out). Old clients still
//! ask for the old spelling; this maps it onto the current one.

use std::sync::OnceLock;

use regex::Regex;

/// Global corrections applied before the table lookup (case-insensitive).
const CORRECTIONS: &[(&str, &str)] = &[
    (r"(?i)-wr841n-", "-wr841-"),
    (r"(?i)-cpe210-220-510-520-", "-cpe210-220-"),
];

/// Old board name → current board name. First match wins.
///
/// Append new renames at the end as they show up in firmware releases.
pub const BOARD_RENAMES: &[(&str, &str)] = &[
    // GL.iNet
    ("gl-ar150", "glinet_gl-ar150"),
    // TP-Link
    ("cpe210-v2", "tplink_cpe210-v2"),
    ("cpe210-v3", "tplink_cpe210-v3"),
    ("archer-c25-1", "tplink_archer-c25-1"),
    ("archer-c60-v1", "tplink_archer-c60-v1"),
    ("archer-c60-v2", "tplink_archer-c60-v2"),
    ("archer-c7-v2", "tplink_archer-c7-v2"),
    ("archer-c7-v5", "tplink_archer-c7-v5"),
    ("tl-mr3020-v1", "tplink_tl-mr3020-v1"),
    ("tl-wa850re-v1", "tplink_tl-wa850re-v1"),
    ("tl-wa860re-v1", "tplink_tl-wa860re-v1"),
    ("tl-wa901nd-v2", "tplink_tl-wa901nd-v2"),
    ("tl-wdr3500-v1", "tplink_tl-wdr3500-v1"),
    ("tl-wdr3600-v1", "tplink_tl-wdr3600-v1"),
    ("tl-wdr4300-v1", "tplink_tl-wdr4300-v1"),
    ("tl-wdr4310-v1", "tplink_tl-wdr4310-v1"),
    ("tl-wr1043n-v5", "tplink_tl-wr1043n-v5"),
    ("tl-wr1043nd-v1", "tplink_tl-wr1043nd-v1"),
    ("tl-wr1043nd-v2", "tplink_tl-wr1043nd-v2"),
    ("tl-wr1043nd-v3", "tplink_tl-wr1043nd-v3"),
    ("tl-wr1043nd-v4", "tplink_tl-wr1043nd-v4"),
    ("tl-wr740n-v4", "tplink_tl-wr740n-v4"),
    ("tl-wr741nd-v2", "tplink_tl-wr741nd-v2"),
    ("tl-wr741nd-v4", "tplink_tl-wr741nd-v4"),
    ("tl-wr841-v7", "tplink_tl-wr841-v7"),
    ("tl-wr841-v8", "tplink_tl-wr841-v8"),
    ("tl-wr841-v9", "tplink_tl-wr841-v9"),
    ("tl-wr841-v10", "tplink_tl-wr841-v10"),
    ("tl-wr841-v11", "tplink_tl-wr841-v11"),
    ("tl-wr841-v12", "tplink_tl-wr841-v12"),
    ("tl-wr842n-v2", "tplink_tl-wr842n-v2"),
    // Inverted: the vendor prefix was dropped for this one.
    // Flip back once the target release re-adds it.
    ("tplink_tl-wdr4900-v1", "tl-wdr4900-v1"),
    // Ubiquiti
    ("ubnt-bullet-m", "ubnt_bullet-m"),
    ("ubnt-pico-m", "ubnt_picostation-m"),
    ("ubnt-loco-m", "ubnt_nanostation-loco-m"),
    ("ubnt-loco-m-xw", "ubnt_nanostation-loco-m-xw"),
    ("ubnt-nano-m", "ubnt_nanostation-m"),
    ("ubnt-unifi", "ubnt_unifi"),
    // Also matches the AC Mesh, which cannot be told apart by name.
    ("ubnt-unifiac-lite", "ubnt_unifiac"),
];

fn corrections() -> &'static [(Regex, &'static str)] {
    static RES: OnceLock<Vec<(Regex, &'static str)>> = OnceLock::new();
    RES.get_or_init(|| {
        CORRECTIONS
            .iter()
            .map(|(pattern, replacement)| {
                (Regex::new(pattern).expect("valid correction pattern"), *replacement)
            })
            .collect()
    })
}

/// Map a raw board token onto its current name. Unknown boards pass through.
pub fn rewrite_board(board: &str) -> String {
    let corrected = corrections()
        .iter()
        .fold(board.to_string(), |b, (re, replacement)| {
            re.replace_all(&b, *replacement).into_owned()
        });

    match BOARD_RENAMES.iter().find(|(old, _)| *old == corrected) {
        Some((_, current)) => (*current).to_string(),
        None => corrected,
    }
}
