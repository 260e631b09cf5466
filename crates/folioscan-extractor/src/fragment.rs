//! Fragment model: one candidate markup element hypothesized to represent a
//! single holding, as harvested by the in-page collection script.

/// One candidate row/card/item lifted from the live page.
///
/// `cells` is populated for tabular rows (one entry per `td`/cell element,
/// already text-flattened); `text` is the element's full flattened text and
/// is always present.
#[derive(Debug, Clone, serde::Deserialize)]
pub struct RawFragment {
    #[serde(default)]
    pub cells: Vec<String>,
    pub text: String,
    /// Which structural selector matched this element.
    #[serde(default)]
    pub selector: String,
}

/// Compute a stable content key for a fragment.
///
/// Overlapping selectors routinely match the same element twice; the key is
/// SHA-256 over the fragment's full text, lower-cased with whitespace
/// collapsed, so those duplicates collide regardless of which selector found
/// them. Hex-encoded.
#[must_use]
pub fn make_fragment_key(fragment: &RawFragment) -> String {
    use sha2::{Digest, Sha256};
    let normalized = fragment
        .text
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase();
    format!("{:x}", Sha256::digest(normalized.as_bytes()))
}
