use anyhow::Context;
use std::path::Path;
use url::Url;

use crate::{BrainSearchError, Result};

/// Validate a media link, accepting only HTTP and HTTPS URLs
pub fn validate_link(link: &str) -> Result<String> {
    let parsed = Url::parse(link).map_err(|_| BrainSearchError::InvalidUrl(link.to_string()))?;

    if !matches!(parsed.scheme(), "http" | "https") {
        return Err(BrainSearchError::InvalidUrl(format!("{} (must use HTTP or HTTPS)", link)).into());
    }

    Ok(link.to_string())
}

/// Read a newline-delimited link list. Blank lines and `#` comments are skipped.
pub fn read_link_list(path: &Path) -> Result<Vec<String>> {
    let content = fs_err::read_to_string(path)
        .with_context(|| format!("Failed to read link list {}", path.display()))?;

    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(validate_link)
        .collect()
}

/// Last path segment of a link, URL-decoded, for display
pub fn display_name(link: &str) -> String {
    Url::parse(link)
        .ok()
        .and_then(|url| {
            url.path_segments()
                .and_then(|segments| segments.last())
                .filter(|name| !name.is_empty())
                .map(|name| urlencoding::decode(name).map(|s| s.into_owned()).unwrap_or_else(|_| name.to_string()))
        })
        .unwrap_or_else(|| link.to_string())
}
