//! Mask operator

use crate::anonymization::models::MaskAnchor;

/// Replace up to `count` characters of `value` with `mask_char`
///
/// Counts `char`s, not bytes. Values shorter than `count` are masked entirely.
pub fn mask(value: &str, mask_char: char, count: usize, anchor: MaskAnchor) -> String {
    let total = value.chars().count();
    let masked = count.min(total);

    match anchor {
        MaskAnchor::Start => std::iter::repeat(mask_char)
            .take(masked)
            .chain(value.chars().skip(masked))
            .collect(),
        MaskAnchor::End => value
            .chars()
            .take(total - masked)
            .chain(std::iter::repeat(mask_char).take(masked))
            .collect(),
    }
}
