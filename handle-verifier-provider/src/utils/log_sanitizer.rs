//! Log sanitization utilities
//!
//! Remote servers can answer with arbitrarily large documents (HTML error
//! pages, JRD documents with dozens of links). Bodies are clipped before they
//! reach debug/error logs.

/// Maximum number of bytes of a body included in log output.
const TRUNCATE_LIMIT: usize = 256;

/// Largest char boundary at or below `index`.
fn floor_char_boundary(s: &str, index: usize) -> usize {
    if index >= s.len() {
        return s.len();
    }
    (0..=index).rev().find(|&i| s.is_char_boundary(i)).unwrap_or(0)
}

/// Clip a body for logging.
///
/// Line breaks become spaces so a multi-line HTML page stays on one log line.
/// Bodies longer than `TRUNCATE_LIMIT` bytes keep their head and gain a
/// `(N bytes total)` note.
pub fn truncate_for_log(body: &str) -> String {
    let cut = floor_char_boundary(body, TRUNCATE_LIMIT);
    let mut clipped: String = body[..cut]
        .chars()
        .map(|c| if c == '\r' || c == '\n' { ' ' } else { c })
        .collect();
    if cut < body.len() {
        clipped.push_str(&format!("... ({} bytes total)", body.len()));
    }
    clipped
}
