//! Dotted version string comparison.
//!
//! Versions are compared component-wise after splitting on `.`. Components are
//! read as unsigned integers; anything without leading digits counts as `0`,
//! and the shorter version is padded with zeros. So `"1.2"`, `"1.2.0"` and
//! `"1.2.x"` all compare equal.

use std::cmp::Ordering;

/// Compares two dotted version strings.
///
/// Returns [`Ordering::Less`] when `a` is older than `b`, [`Ordering::Greater`]
/// when newer, and [`Ordering::Equal`] when every padded component matches.
///
/// # Example
///
/// ```
/// use std::cmp::Ordering;
/// use lampa_core::compare_versions;
///
/// assert_eq!(compare_versions("1.0.0", "1.0.1"), Ordering::Less);
/// assert_eq!(compare_versions("2.0", "1.9.9"), Ordering::Greater);
/// assert_eq!(compare_versions("1.2", "1.2.0"), Ordering::Equal);
/// ```
#[must_use]
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let left = components(a);
    let right = components(b);
    let len = left.len().max(right.len());

    (0..len)
        .map(|index| {
            let l = left.get(index).copied().unwrap_or(0);
            let r = right.get(index).copied().unwrap_or(0);
            l.cmp(&r)
        })
        .find(|ordering| ordering.is_ne())
        .unwrap_or(Ordering::Equal)
}

/// Removes one leading `v` or `V` from a release tag (`"v1.4.0"` -> `"1.4.0"`).
#[must_use]
pub fn strip_tag_prefix(tag: &str) -> &str {
    let trimmed = tag.trim();
    trimmed
        .strip_prefix('v')
        .or_else(|| trimmed.strip_prefix('V'))
        .unwrap_or(trimmed)
}

fn components(version: &str) -> Vec<u64> {
    version.trim().split('.').map(parse_component).collect()
}

fn parse_component(component: &str) -> u64 {
    component
        .trim()
        .chars()
        .take_while(char::is_ascii_digit)
        .filter_map(|c| c.to_digit(10))
        .fold(0_u64, |acc, digit| {
            acc.saturating_mul(10).saturating_add(u64::from(digit))
        })
}
