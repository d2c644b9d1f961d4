use std::cmp::Ordering;

use anyhow::{Context, Result};
use log::{debug, warn};
use serde_json::{Map, Value};

use super::sections::Section;

/// A file and its perceptual hash as hex digits, lowercase, without `0x`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct HashedFile {
    pub(crate) path: String,
    pub(crate) hash: String,
}

/// Reads a `{ "<path>": { "hash": "0x..", ... }, ... }` index, keeping file order.
/// Entries without a usable hex hash are skipped.
pub(crate) fn parse_hash_index(raw: &str) -> Result<Vec<HashedFile>> {
    let index: Map<String, Value> =
        serde_json::from_str(raw).context("hash index is not a JSON object")?;

    let mut files = Vec::with_capacity(index.len());
    for (path, details) in index {
        let Some(hash) = details.get("hash") else {
            debug!("No hash recorded for {path}");
            continue;
        };
        match hash.as_str().and_then(normalize_hex) {
            Some(hash) => files.push(HashedFile { path, hash }),
            None => warn!("Ignoring unreadable hash {hash} for {path}"),
        }
    }
    Ok(files)
}

fn normalize_hex(raw: &str) -> Option<String> {
    let trimmed = raw.trim();
    let digits = trimmed
        .strip_prefix("0x")
        .or_else(|| trimmed.strip_prefix("0X"))
        .unwrap_or(trimmed);
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    Some(digits.to_ascii_lowercase())
}

/// Number of differing bits between two hex numbers of any length.
pub(crate) fn hamming_distance(a: &str, b: &str) -> u32 {
    let width = a.len().max(b.len());
    let pad = |s: &str| -> Vec<u32> {
        std::iter::repeat_n(0, width - s.len())
            .chain(s.chars().map(|c| c.to_digit(16).unwrap_or(0)))
            .collect()
    };
    pad(a)
        .into_iter()
        .zip(pad(b))
        .map(|(x, y)| (x ^ y).count_ones())
        .sum()
}

/// Each file followed by its closest later neighbours under `threshold`.
/// Files without a neighbour produce no section. A file can appear in more
/// than one section.
pub(crate) fn group_similar(
    files: &[HashedFile],
    threshold: u32,
    max_matches: usize,
) -> Vec<Section> {
    let mut sections = Vec::new();
    for (index, reference) in files.iter().enumerate() {
        let mut matches: Vec<(u32, &str)> = files[index + 1..]
            .iter()
            .map(|other| (hamming_distance(&reference.hash, &other.hash), other.path.as_str()))
            .filter(|(distance, _)| *distance < threshold)
            .collect();
        if matches.is_empty() {
            continue;
        }
        matches.sort_by(|a, b| match a.0.cmp(&b.0) {
            Ordering::Equal => a.1.cmp(b.1),
            other => other,
        });

        let mut paths = vec![reference.path.clone()];
        paths.extend(
            matches
                .into_iter()
                .take(max_matches)
                .map(|(_, path)| path.to_string()),
        );
        sections.push(Section { paths });
    }
    sections
}

/// The listing format `split_sections` reads: paths, then a separator line.
pub(crate) fn render_listing(sections: &[Section], separator: &str) -> String {
    let mut out = String::new();
    for section in sections {
        for path in &section.paths {
            out.push_str(path);
            out.push('\n');
        }
        out.push_str(separator);
        out.push('\n');
    }
    out
}
