use anyhow::{Context, Result};
use std::path::{Path, PathBuf};
use std::process::Command;

pub mod html;

pub use html::{render_html, PageHit, ResultsPage, NO_RESULTS_NOTICE};

/// Default results page location, relative to the working directory
pub const DEFAULT_RESULTS_PATH: &str = "results.html";

/// Render the page and overwrite the results file with it
pub fn write_results(page: &ResultsPage, path: &Path) -> Result<PathBuf> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs_err::create_dir_all(parent)?;
    }

    fs_err::write(path, render_html(page)).context("Failed to write results page")?;

    tracing::info!("Wrote {} hits to {}", page.hits.len(), path.display());
    Ok(path.to_path_buf())
}

/// Open a file with the system's default handler
pub fn open_in_browser(path: &Path) -> Result<()> {
    let target = path
        .canonicalize()
        .with_context(|| format!("Cannot open {}", path.display()))?;

    tracing::debug!("Opening {} in the default browser", target.display());

    #[cfg(target_os = "windows")]
    let mut command = {
        let mut command = Command::new("cmd");
        command.args(["/C", "start", ""]).arg(&target);
        command
    };

    #[cfg(target_os = "macos")]
    let mut command = {
        let mut command = Command::new("open");
        command.arg(&target);
        command
    };

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    let mut command = {
        let mut command = Command::new("xdg-open");
        command.arg(&target);
        command
    };

    command
        .spawn()
        .with_context(|| format!("Failed to open {} in a browser", target.display()))?;

    Ok(())
}
