use std::path::{Path, PathBuf};

/// One block of the listing: the paths handed to a single player run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct Section {
    pub(crate) paths: Vec<String>,
}

impl Section {
    pub(crate) fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

pub(crate) fn split_sections(raw: &str, separator: &str) -> Vec<Section> {
    raw.split(separator)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .map(|chunk| Section {
            paths: chunk
                .lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        })
        .collect()
}

/// Anchors a relative entry at `base`. Absolute paths and URLs pass through.
pub(crate) fn resolve_entry(base: Option<&Path>, entry: &str) -> PathBuf {
    let path = Path::new(entry);
    match base {
        Some(base) if path.is_relative() && !entry.contains("://") => base.join(path),
        _ => path.to_path_buf(),
    }
}
