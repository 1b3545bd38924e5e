//! Command-line host for the timeline engine.
//!
//! # Responsibility
//! - Load a record document, apply filters and zoom, and print the frame.
//! - Exercise reveal and detail lookups without a graphical surface.

use clap::{Parser, ValueEnum};
use log::{error, info};
use std::error::Error;
use std::path::PathBuf;
use std::process::ExitCode;
use timeline_core::layout::frame::PositionedCard;
use timeline_core::{
    default_log_level, init_logging, init_stderr_logging, Catalog, Facet, FilterConfig,
    LayoutRequest, RenderSurface, SearchScope, TimelineEngine, TimelineFrame, ZoomLevel,
};

const SAMPLE_DATA: &str = include_str!("../data/sample.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Json,
    Text,
}

#[derive(Debug, Parser)]
#[command(name = "timeline")]
#[command(about = "Lay out historical records on a vertical timeline")]
struct Args {
    /// Record document (JSON with `characters` and `events`); bundled sample when omitted
    #[arg(long, env = "TIMELINE_DATA_PATH")]
    data: Option<PathBuf>,

    /// Event category tag, or `all`
    #[arg(long, default_value = "all")]
    category: String,

    /// Character category tag, or `all`
    #[arg(long, default_value = "all")]
    character_category: String,

    /// Region tag fragment, or `all`
    #[arg(long, default_value = "all")]
    region: String,

    /// Period tag fragment, or `all`
    #[arg(long, default_value = "all")]
    period: String,

    /// Free-text search term
    #[arg(short, long, default_value = "")]
    search: String,

    /// Search scope: all, events, characters, region, period
    #[arg(long, default_value = "all")]
    scope: String,

    /// Zoom percentage, clamped to 80..=150
    #[arg(long, default_value_t = 100)]
    zoom: u32,

    /// Year labels to reveal one extra page for, in order
    #[arg(long = "reveal")]
    reveal: Vec<String>,

    /// Print the detail view of this character instead of the frame
    #[arg(long, conflicts_with = "event")]
    character: Option<String>,

    /// Print the detail view of this event instead of the frame
    #[arg(long)]
    event: Option<String>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// trace|debug|info|warn|error
    #[arg(long)]
    log_level: Option<String>,

    /// Absolute directory for rolling log files; stderr when omitted
    #[arg(long)]
    log_dir: Option<String>,
}

impl Args {
    fn filters(&self) -> FilterConfig {
        FilterConfig {
            category: Facet::parse(&self.category),
            character_category: Facet::parse(&self.character_category),
            region: Facet::parse(&self.region),
            period: Facet::parse(&self.period),
            search: self.search.clone(),
            scope: SearchScope::parse(&self.scope),
        }
    }
}

/// Prints frames and appended cards to stdout.
struct StdoutSurface {
    format: OutputFormat,
}

impl RenderSurface for StdoutSurface {
    fn render_frame(&mut self, frame: &TimelineFrame) {
        match self.format {
            OutputFormat::Json => match serde_json::to_string_pretty(frame) {
                Ok(json) => println!("{json}"),
                Err(err) => error!("event=render module=cli status=error error={err}"),
            },
            OutputFormat::Text => print_frame(frame),
        }
    }

    fn append_cards(&mut self, year_label: &str, cards: &[PositionedCard], remaining: usize) {
        if self.format == OutputFormat::Text {
            println!("-- {year_label}: +{} (remaining {remaining})", cards.len());
            cards.iter().for_each(print_card);
        }
    }
}

fn print_frame(frame: &TimelineFrame) {
    println!("{} | zoom {}%", frame.summary.caption(), frame.zoom_percent);
    if let Some(no_results) = frame.no_results {
        println!("no results; {}", no_results.caption());
        return;
    }
    for marker in &frame.markers {
        println!("[{:>8.1}] {}", marker.pixel_top, marker.label);
        frame
            .cards
            .iter()
            .filter(|card| card.year_label == marker.label)
            .for_each(print_card);
        if let Some(reveal) = frame.reveal_for(&marker.label) {
            println!("           {}", reveal.caption());
        }
    }
}

fn print_card(card: &PositionedCard) {
    println!(
        "[{:>8.1}] {:<5} {} ({})",
        card.pixel_top,
        format!("{:?}", card.side).to_lowercase(),
        card.title.plain_text(),
        card.category.plain_text()
    );
}

fn load_catalog(path: Option<&PathBuf>) -> Result<Catalog, Box<dyn Error>> {
    let catalog = match path {
        Some(path) => Catalog::from_path(path)?,
        None => Catalog::from_json_str(SAMPLE_DATA)?,
    };
    Ok(catalog)
}

fn run(args: &Args) -> Result<(), Box<dyn Error>> {
    let level = args
        .log_level
        .clone()
        .unwrap_or_else(|| default_log_level().to_string());
    match args.log_dir.as_deref() {
        Some(dir) => init_logging(&level, dir)?,
        None => init_stderr_logging(&level)?,
    }

    let catalog = load_catalog(args.data.as_ref())?;
    let mut engine = TimelineEngine::new(catalog);

    if let Some(id) = args.character.as_deref() {
        let detail = engine.character_detail(id)?;
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }
    if let Some(id) = args.event.as_deref() {
        let detail = engine.event_detail(id);
        println!("{}", serde_json::to_string_pretty(&detail)?);
        return Ok(());
    }

    let request = LayoutRequest::new(args.filters(), ZoomLevel::new(args.zoom));
    engine.recompute(request)?;

    let mut surface = StdoutSurface {
        format: args.format,
    };
    for year in &args.reveal {
        engine.reveal_more(year)?;
    }
    engine.present(Some(&mut surface))?;

    info!(
        "event=cli_done module=cli status=ok cards={}",
        engine.frame().cards.len()
    );
    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("event=cli_failed module=cli status=error error={err}");
            eprintln!("timeline: {err}");
            ExitCode::FAILURE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{load_catalog, Args};
    use clap::Parser;
    use timeline_core::{Facet, SearchScope};

    #[test]
    fn bundled_sample_loads() {
        let catalog = load_catalog(None).unwrap();
        assert!(!catalog.events().is_empty());
        assert!(!catalog.characters().is_empty());
    }

    #[test]
    fn args_map_onto_filters() {
        let args = Args::parse_from([
            "timeline",
            "--category",
            "military",
            "--scope",
            "characters",
            "--search",
            "华盛顿",
        ]);
        let filters = args.filters();
        assert_eq!(filters.category, Facet::Only("military".to_string()));
        assert!(filters.region.is_all());
        assert_eq!(filters.scope, SearchScope::Characters);
        assert_eq!(filters.search, "华盛顿");
    }
}
