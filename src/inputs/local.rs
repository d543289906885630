use std::path::PathBuf;

use crate::{BrainSearchError, Result};

/// Expand a shell-style glob pattern into the regular files it matches
pub fn expand_pattern(pattern: &str) -> Result<Vec<PathBuf>> {
    let entries = glob::glob(pattern).map_err(|e| BrainSearchError::InvalidPattern {
        pattern: pattern.to_string(),
        reason: e.to_string(),
    })?;

    let mut files = Vec::new();
    for entry in entries {
        match entry {
            Ok(path) if path.is_file() => files.push(path),
            Ok(_) => {}
            Err(e) => tracing::warn!("Cannot read {}: {}", e.path().display(), e.error()),
        }
    }

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_expand_skips_directories() {
        let dir = tempfile::tempdir().unwrap();
        fs::create_dir(dir.path().join("nested.mp3")).unwrap();
        fs::write(dir.path().join("talk.mp3"), b"data").unwrap();

        let pattern = dir.path().join("*.mp3").to_string_lossy().into_owned();
        let files = expand_pattern(&pattern).unwrap();

        assert_eq!(files, vec![dir.path().join("talk.mp3")]);
    }

    #[test]
    fn test_expand_literal_path() {
        let dir = tempfile::tempdir().unwrap();
        let file = dir.path().join("talk.mp3");
        fs::write(&file, b"data").unwrap();

        let files = expand_pattern(&file.to_string_lossy()).unwrap();
        assert_eq!(files, vec![file]);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = expand_pattern("[unclosed").unwrap_err();
        assert!(matches!(
            err.downcast_ref::<BrainSearchError>(),
            Some(BrainSearchError::InvalidPattern { .. })
        ));
    }
}
