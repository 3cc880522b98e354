//! Deterministic auto-color assignment for columns.
//!
//! Reserved workflow columns have fixed colors so every board reads the same;
//! custom columns hash their name onto a palette.

/// Palette for custom columns (6-char hex without `#`).
const PALETTE: &[&str] = &[
    "d73a4a", // red
    "e36209", // orange
    "0e8a16", // green
    "006b75", // teal
    "1d76db", // blue
    "5319e7", // purple
    "d876e3", // pink
    "0075ca", // ocean
    "7057ff", // violet
    "008672", // sea green
    "bfd4f2", // light blue
    "fbca04", // gold
];

/// Fixed colors for the reserved columns, matched case-insensitively.
const RESERVED: &[(&str, &str)] = &[
    ("backlog", "8b949e"),
    ("todo", "1d76db"),
    ("in progress", "f9c513"),
    ("done", "0e8a16"),
];

/// Return a deterministic color for a column name.
pub fn auto_color(name: &str) -> &'static str {
    let normalized = name.trim().to_lowercase();
    if let Some((_, color)) = RESERVED.iter().find(|(n, _)| *n == normalized) {
        return color;
    }
    let idx = (fnv1a(&normalized) as usize) % PALETTE.len();
    PALETTE[idx]
}

/// FNV-1a hash (32-bit) for short strings.
fn fnv1a(s: &str) -> u32 {
    let mut hash: u32 = 0x811c_9dc5;
    for byte in s.bytes() {
        hash ^= byte as u32;
        hash = hash.wrapping_mul(0x0100_0193);
    }
    hash
}
