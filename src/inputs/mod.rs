use std::collections::HashSet;
use std::path::{Path, PathBuf};

pub mod links;
pub mod local;

use crate::Result;

/// File extensions the Brain service accepts as media
pub const MEDIA_EXTENSIONS: &[&str] = &[
    "mp3", "3gp", "aifc", "mp4", "ogg", "aif", "wav", "amr", "flac", "wmv", "mpg", "mkv", "mp2",
    "mov", "webm", "3gpp", "m4a", "wma", "aiff", "aac", "3ga",
];

/// Extension of newline-delimited link list files
pub const LINK_LIST_EXTENSION: &str = "links";

/// Pattern searched when no inputs are given
pub const DEFAULT_PATTERN: &str = "./*";

/// A media source to search
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum MediaInput {
    /// Local audio or video file
    File(PathBuf),
    /// Remote media URL fetched by the service
    Link(String),
}

impl MediaInput {
    /// Name stored as asset metadata and used to find earlier uploads.
    /// Files are keyed by basename, links by the full URL.
    pub fn cache_key(&self) -> String {
        match self {
            MediaInput::File(path) => path
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.to_string_lossy().into_owned()),
            MediaInput::Link(link) => link.clone(),
        }
    }

    /// Human-readable name for console output
    pub fn display_name(&self) -> String {
        match self {
            MediaInput::File(_) => self.cache_key(),
            MediaInput::Link(link) => links::display_name(link),
        }
    }
}

/// Check whether a path carries one of the known media extensions
pub fn is_media_file(path: &Path) -> bool {
    has_extension(path, MEDIA_EXTENSIONS)
}

/// Check whether a path is a link list
pub fn is_link_list(path: &Path) -> bool {
    has_extension(path, &[LINK_LIST_EXTENSION])
}

fn has_extension(path: &Path, extensions: &[&str]) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
        .is_some_and(|ext| extensions.contains(&ext.as_str()))
}

/// Resolve file patterns and direct links into the list of inputs to search.
///
/// Falls back to [`DEFAULT_PATTERN`] when nothing is given. Non-media files are
/// dropped and link lists are expanded into their links. The first occurrence of
/// a duplicate input wins.
pub fn resolve_inputs(file_patterns: &[String], direct_links: &[String]) -> Result<Vec<MediaInput>> {
    let default_patterns = [DEFAULT_PATTERN.to_string()];
    let patterns = if file_patterns.is_empty() && direct_links.is_empty() {
        &default_patterns[..]
    } else {
        file_patterns
    };

    let mut inputs = Vec::new();

    for pattern in patterns {
        for path in local::expand_pattern(pattern)? {
            if is_media_file(&path) {
                inputs.push(MediaInput::File(path));
            } else if is_link_list(&path) {
                tracing::debug!("Reading link list: {}", path.display());
                inputs.extend(links::read_link_list(&path)?.into_iter().map(MediaInput::Link));
            } else {
                tracing::trace!("Skipping non-media file: {}", path.display());
            }
        }
    }

    for link in direct_links {
        inputs.push(MediaInput::Link(links::validate_link(link)?));
    }

    let mut seen = HashSet::new();
    inputs.retain(|input| seen.insert(input.clone()));

    Ok(inputs)
}
