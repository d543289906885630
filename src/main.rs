use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use brainsearch::brain::BrainClient;
use brainsearch::cli::Cli;
use brainsearch::config::Config;
use brainsearch::inputs;
use brainsearch::output::{self, ResultsPage};
use brainsearch::pipeline::{join_query, SearchPipeline};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let default_filter = if cli.verbose { "brainsearch=debug" } else { "brainsearch=info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let config = Config::load()?;
    let options = cli.resolve(&config)?;

    let media = inputs::resolve_inputs(&options.file_patterns, &options.links)?;
    if media.is_empty() && !options.pipeline.brain_assets {
        println!("No valid input files found.");
        return Ok(());
    }
    tracing::debug!("Resolved {} inputs", media.len());

    let client = BrainClient::new(&options.server_url, &options.user_id, &options.token)?;
    let pipeline = SearchPipeline::new(Box::new(client), options.pipeline.clone());

    let prepared = pipeline.prepare(&media).await?;
    let results = pipeline.search(&options.query, &prepared.asset_ids).await?;

    let page = ResultsPage::build(
        &join_query(&options.query),
        &results,
        &prepared.known,
        options.quality_threshold,
    );
    let path = output::write_results(&page, &options.results_path)?;

    if page.is_empty() {
        println!("No results found for \"{}\"", page.query);
    } else {
        println!("Found {} hits for \"{}\"", page.hits.len(), page.query);
    }
    println!("Results saved to: {}", path.display());

    if options.open_browser {
        if let Err(e) = output::open_in_browser(&path) {
            tracing::warn!("{:#}", e);
        }
    }

    Ok(())
}
