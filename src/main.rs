mod document;
mod model;
mod parser;
mod source;
mod store;

use std::path::PathBuf;

use clap::Parser;

#[derive(Parser)]
#[command(
    name = "season_extract",
    about = "Extract structured season data from iRacing schedule text"
)]
struct Cli {
    /// Path to the season schedule text (extracted from the season PDF)
    input: PathBuf,
    /// Output JSON file path
    #[arg(short, long, default_value = "data/iracing-season-data.json")]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let cli = Cli::parse();

    println!("Input: {}", cli.input.display());
    let text = source::read_text(&cli.input)?;
    source::write_debug_artifact(&cli.input, &text);

    let doc = document::build(&text);
    println!("Detected season: {}", doc.metadata.season);
    println!("Found {} series", doc.series.len());
    for series in &doc.series {
        let region_tag = series
            .region
            .as_deref()
            .map(|r| format!(" [{}]", r))
            .unwrap_or_default();
        let car_tag = series
            .car
            .as_deref()
            .map(|c| format!(" ({})", c))
            .unwrap_or_default();
        println!(
            "  - {}{}{} [{}]: {} weeks",
            series.name,
            region_tag,
            car_tag,
            series.category,
            series.schedule.len()
        );
    }

    document::validate(&doc)?;

    let bytes = store::save(&doc, &cli.output)?;
    let total_weeks: usize = doc.series.iter().map(|s| s.schedule.len()).sum();
    println!("\nOutput written to: {}", cli.output.display());
    println!("  JSON size: {:.1} KB", bytes as f64 / 1024.0);
    println!("  Series: {}", doc.series.len());
    println!("  Total weeks: {}", total_weeks);

    Ok(())
}
