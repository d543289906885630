use std::fmt::Write;

use crate::assets::KnownAssets;
use crate::brain::SearchResult;
use crate::utils::{escape_html, format_duration, format_timestamp};

/// Notice shown when no hit passes the quality threshold
pub const NO_RESULTS_NOTICE: &str = "No results found";

/// A search hit that passed the quality threshold
#[derive(Debug, Clone, PartialEq)]
pub struct PageHit {
    pub asset_id: String,
    pub name: String,
    pub playback_url: Option<String>,
    pub duration: Option<f64>,
    pub quality: f64,
    pub time: f64,
}

/// Everything the results page shows
#[derive(Debug, Clone)]
pub struct ResultsPage {
    pub query: String,
    pub threshold: f64,
    pub hits: Vec<PageHit>,
    pub generated_at: chrono::DateTime<chrono::Utc>,
}

impl ResultsPage {
    /// Keep hits scoring at or above `threshold`, best first
    pub fn build(query: &str, results: &[SearchResult], known: &KnownAssets, threshold: f64) -> Self {
        let mut hits: Vec<PageHit> = results
            .iter()
            .flat_map(move |result| {
                let asset = known.by_id(&result.asset_id);
                result
                    .hits
                    .iter()
                    .filter(move |hit| hit.quality >= threshold)
                    .map(move |hit| PageHit {
                        asset_id: result.asset_id.clone(),
                        name: asset
                            .map(|(name, _)| name.to_string())
                            .unwrap_or_else(|| result.asset_id.clone()),
                        playback_url: asset.and_then(|(_, record)| record.playback_url.clone()),
                        duration: asset.and_then(|(_, record)| record.duration),
                        quality: hit.quality,
                        time: hit.time,
                    })
            })
            .collect();

        hits.sort_by(|a, b| b.quality.total_cmp(&a.quality));

        Self {
            query: query.to_string(),
            threshold,
            hits,
            generated_at: chrono::Utc::now(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.hits.is_empty()
    }
}

/// Render the results page as a standalone HTML document
pub fn render_html(page: &ResultsPage) -> String {
    let query = escape_html(&page.query);
    let mut html = String::new();

    let _ = write!(
        html,
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<title>Search results for "{query}"</title>
<style>
body {{ font-family: sans-serif; margin: 2em; }}
.hit {{ margin-bottom: 1.5em; }}
.meta {{ color: #666; font-size: 0.9em; }}
</style>
</head>
<body>
<h1>Search results for "{query}"</h1>
<p class="meta">Quality threshold {threshold:.2} &middot; generated {generated}</p>
"#,
        query = query,
        threshold = page.threshold,
        generated = page.generated_at.format("%Y-%m-%d %H:%M:%S UTC"),
    );

    if page.hits.is_empty() {
        let _ = writeln!(html, "<p>{}</p>", NO_RESULTS_NOTICE);
    }

    for (index, hit) in page.hits.iter().enumerate() {
        render_hit(&mut html, index, hit);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_hit(html: &mut String, index: usize, hit: &PageHit) {
    let player_id = format!("hit-{}", index);
    let duration = hit
        .duration
        .map(|d| format!(" of {}", format_duration(d)))
        .unwrap_or_default();

    let _ = write!(
        html,
        "<div class=\"hit\">\n<h3>{name}</h3>\n<p class=\"meta\">at {at}{duration} &middot; quality {quality:.2}</p>\n",
        name = escape_html(&hit.name),
        at = format_timestamp(hit.time),
        duration = duration,
        quality = hit.quality,
    );

    match &hit.playback_url {
        Some(url) => {
            let _ = write!(
                html,
                "<audio id=\"{id}\" controls preload=\"metadata\" src=\"{src}\"></audio>\n\
                 <script>\n\
                 document.getElementById(\"{id}\").addEventListener(\"loadedmetadata\", function () {{ this.currentTime = {time}; }});\n\
                 </script>\n",
                id = player_id,
                src = escape_html(url),
                time = hit.time,
            );
        }
        None => {
            let _ = writeln!(html, "<p class=\"meta\">No playback URL for asset {}</p>", escape_html(&hit.asset_id));
        }
    }

    html.push_str("</div>\n");
}
