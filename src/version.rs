//! Version ordering.
//!
//! Versions are opaque strings, but the "latest" version of a path is picked
//! with a comparator that understands numeric components, so `10.0.0` sorts
//! after `2.0.0`.

use std::cmp::Ordering;

/// Compare two version strings.
///
/// The part before the first `-` is the release, the rest a pre-release tag.
/// Release components (split on `.`) are compared in natural order: runs of
/// digits numerically, everything else lexicographically. A missing component
/// sorts first. With equal releases, a pre-release sorts before the plain
/// release.
///
/// ```rust
/// use anystore::compare_versions;
/// use std::cmp::Ordering;
///
/// assert_eq!(compare_versions("2.0.0", "10.0.0"), Ordering::Less);
/// assert_eq!(compare_versions("1.0.0-rc1", "1.0.0"), Ordering::Less);
/// ```
pub fn compare_versions(a: &str, b: &str) -> Ordering {
    let (a_release, a_pre) = split_pre_release(a);
    let (b_release, b_pre) = split_pre_release(b);

    compare_components(a_release, b_release)
        .then_with(|| match (a_pre, b_pre) {
            (None, None) => Ordering::Equal,
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (Some(a), Some(b)) => compare_components(a, b),
        })
        .then_with(|| a.cmp(b))
}

/// Sort versions ascending with [`compare_versions`].
pub fn sort_versions(versions: &mut [String]) {
    versions.sort_by(|a, b| compare_versions(a, b));
}

/// Maximum version under [`compare_versions`].
pub fn latest<'a, I>(versions: I) -> Option<&'a str>
where
    I: IntoIterator<Item = &'a str>,
{
    versions
        .into_iter()
        .max_by(|a, b| compare_versions(a, b))
}

fn split_pre_release(version: &str) -> (&str, Option<&str>) {
    match version.split_once('-') {
        Some((release, pre)) if !release.is_empty() => (release, Some(pre)),
        _ => (version, None),
    }
}

fn compare_components(a: &str, b: &str) -> Ordering {
    let mut a_parts = a.split(['.', '_']);
    let mut b_parts = b.split(['.', '_']);
    loop {
        match (a_parts.next(), b_parts.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => match natural_cmp(x, y) {
                Ordering::Equal => continue,
                other => return other,
            },
        }
    }
}

/// Compare strings chunk by chunk, digit runs numerically.
fn natural_cmp(a: &str, b: &str) -> Ordering {
    let mut a_chunks = Chunks(a);
    let mut b_chunks = Chunks(b);
    loop {
        match (a_chunks.next(), b_chunks.next()) {
            (None, None) => return Ordering::Equal,
            (None, Some(_)) => return Ordering::Less,
            (Some(_), None) => return Ordering::Greater,
            (Some(x), Some(y)) => {
                let ord = match (is_digits(x), is_digits(y)) {
                    (true, true) => compare_numeric(x, y),
                    // numbers sort before words, e.g. `1.0.0` before `1.0.a`
                    (true, false) => Ordering::Less,
                    (false, true) => Ordering::Greater,
                    (false, false) => x.cmp(y),
                };
                if ord != Ordering::Equal {
                    return ord;
                }
            }
        }
    }
}

fn is_digits(s: &str) -> bool {
    s.bytes().all(|b| b.is_ascii_digit())
}

// digit runs can exceed u64, compare by trimmed length first
fn compare_numeric(a: &str, b: &str) -> Ordering {
    let a = a.trim_start_matches('0');
    let b = b.trim_start_matches('0');
    a.len().cmp(&b.len()).then_with(|| a.cmp(b))
}

/// Iterator over alternating digit / non-digit runs.
struct Chunks<'a>(&'a str);

impl<'a> Iterator for Chunks<'a> {
    type Item = &'a str;

    fn next(&mut self) -> Option<&'a str> {
        let first = self.0.chars().next()?;
        let digit = first.is_ascii_digit();
        let end = self
            .0
            .find(|c: char| c.is_ascii_digit() != digit)
            .unwrap_or(self.0.len());
        let (chunk, rest) = self.0.split_at(end);
        self.0 = rest;
        Some(chunk)
    }
}
