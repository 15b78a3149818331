//! Natal Spiral - Entry Point
//!
//! Loads the registries once, obtains a raw chart from a file or the
//! astrology service, enriches it, and prints sentences, spiral placements,
//! the constellation or the chart summary.

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::runtime::Runtime;
use tracing_subscriber::EnvFilter;

use natal_spiral::chart::{enrich, BirthSubject, EnrichedChart};
use natal_spiral::core::error::{ChartError, NatalError, Result};
use natal_spiral::core::types::Body;
use natal_spiral::core::{EngineConfig, TracingSink};
use natal_spiral::geometry::{
    aspect_lines, build_constellation, generate_spiral_backbone, place_planets, AspectLine, PlacedBody,
    SpiralLayer,
};
use natal_spiral::registry::Registry;
use natal_spiral::sentence::{ChartPayload, GeneratedSentence, RngSource, SentenceEngine, TemplateTable};
use natal_spiral::source::{load_chart_file, AstroApiClient};

/// Natal Spiral - natal charts as spirals, constellations and sentences
#[derive(Parser, Debug)]
#[command(name = "natal-spiral")]
#[command(about = "Enrich a natal chart and render it as geometry and prose")]
struct Cli {
    /// Engine configuration TOML (defaults apply to omitted keys)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Random seed for reproducible sentence selection
    #[arg(long, global = true)]
    seed: Option<u64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args, Debug)]
struct ChartArgs {
    /// Raw chart JSON or a saved provider response
    chart: PathBuf,

    /// Display name of the chart subject
    #[arg(long, default_value = "Subject")]
    name: String,

    /// Output format
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Generate sentences for a context
    Sentence {
        #[command(flatten)]
        chart: ChartArgs,

        /// Template context (spiral_overview, planet_focus, ...)
        #[arg(long, default_value = "spiral_overview")]
        context: String,

        /// Planet to focus on, exposed to templates as `focus`
        #[arg(long)]
        focus: Option<String>,

        /// Aspect index to focus on, exposed to templates as `focus_aspect`
        #[arg(long)]
        aspect: Option<usize>,

        /// Number of sentences to draw
        #[arg(long, default_value_t = 1)]
        count: usize,
    },
    /// Spiral backbone, planet placements and aspect lines
    Spiral {
        #[command(flatten)]
        chart: ChartArgs,
    },
    /// Constellation nodes and strongest aspect links
    Constellation {
        #[command(flatten)]
        chart: ChartArgs,

        /// Override the configured link limit
        #[arg(long)]
        links: Option<usize>,
    },
    /// Dominant element, mode, primary house and aspect mood
    Summary {
        #[command(flatten)]
        chart: ChartArgs,
    },
    /// Fetch a chart from the astrology service
    Fetch {
        /// Birth subject JSON file
        subject: PathBuf,

        /// Write the raw chart here instead of stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct SpiralOutput<'a> {
    backbone: &'a [SpiralLayer],
    planets: &'a [PlacedBody],
    aspects: &'a [AspectLine],
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("natal_spiral=info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => EngineConfig::load(path)?,
        None => EngineConfig::default(),
    };
    let registry = Registry::bundled()?;

    match cli.command {
        Command::Sentence {
            chart,
            context,
            focus,
            aspect,
            count,
        } => {
            let templates = TemplateTable::bundled()?;
            let focus = focus
                .map(|name| {
                    Body::from_name(&name).ok_or_else(|| NatalError::InvalidArgument(format!("unknown planet '{}'", name)))
                })
                .transpose()?;
            let enriched = load_enriched(&chart, &registry)?;
            run_sentence(&enriched, &registry, &templates, &config, cli.seed, &context, focus, aspect, count, chart.format)
        }
        Command::Spiral { chart } => {
            let enriched = load_enriched(&chart, &registry)?;
            run_spiral(&enriched, &registry, &config, chart.format)
        }
        Command::Constellation { chart, links } => {
            let enriched = load_enriched(&chart, &registry)?;
            let constellation = build_constellation(
                &enriched,
                config.sphere_radius,
                links.unwrap_or(config.constellation_links),
                &config.default_aspect_color,
            );
            match chart.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&constellation)?),
                OutputFormat::Text => {
                    for node in &constellation.nodes {
                        println!("{:<8} {:<24} {}", node.body, node.label, node.color);
                    }
                    for link in &constellation.links {
                        println!(
                            "{} - {} {} ({:.2})",
                            constellation.nodes[link.from].body,
                            constellation.nodes[link.to].body,
                            link.kind,
                            link.strength
                        );
                    }
                }
            }
            Ok(())
        }
        Command::Summary { chart } => {
            let enriched = load_enriched(&chart, &registry)?;
            let summary = enriched.summary()?;
            match chart.format {
                OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&summary)?),
                OutputFormat::Text => {
                    println!("Dominant element: {}", summary.dominant_element);
                    println!("Dominant mode:    {}", summary.dominant_mode);
                    if let Some(house) = registry.house(summary.primary_house) {
                        println!("Primary house:    {} ({})", house.name, house.id);
                    }
                    println!("Signature:        {}", summary.signature);
                    println!("Aspect mood:      {}", summary.aspect_mood.name());
                    println!("Retrograde:       {}", summary.retrograde_count);
                }
            }
            Ok(())
        }
        Command::Fetch { subject, output } => run_fetch(&subject, output.as_deref()),
    }
}

fn load_enriched<'r>(args: &ChartArgs, registry: &'r Registry) -> Result<EnrichedChart<'r>> {
    let raw = load_chart_file(&args.chart)?;
    Ok(enrich(&raw, BirthSubject::named(args.name.clone()), registry, &TracingSink))
}

#[allow(clippy::too_many_arguments)]
fn run_sentence(
    chart: &EnrichedChart<'_>,
    registry: &Registry,
    templates: &TemplateTable,
    config: &EngineConfig,
    seed: Option<u64>,
    context: &str,
    focus: Option<Body>,
    aspect: Option<usize>,
    count: usize,
    format: OutputFormat,
) -> Result<()> {
    let (payload, context) = match chart.summary() {
        Ok(summary) => {
            let mut payload = ChartPayload::build(chart, &summary);
            if let Some(body) = focus {
                payload = payload.with_focus(body);
            }
            if let Some(index) = aspect {
                payload = payload.with_aspect_focus(index);
            }
            (payload, context)
        }
        Err(ChartError::EmptyChart { dropped }) => {
            tracing::warn!(dropped, "Chart is empty; describing the subject only");
            (ChartPayload::empty(&chart.subject), "empty_chart")
        }
    };

    let mut random = match seed {
        Some(seed) => RngSource::seeded(seed),
        None => RngSource::from_entropy(),
    };
    let engine = SentenceEngine::new(registry, templates, config);
    let sentences: Vec<GeneratedSentence> = (0..count)
        .map(|_| engine.generate(context, payload.as_value(), &mut random))
        .collect();

    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&sentences)?),
        OutputFormat::Text => {
            for sentence in &sentences {
                println!("{}", sentence.text());
            }
        }
    }
    Ok(())
}

fn run_spiral(chart: &EnrichedChart<'_>, registry: &Registry, config: &EngineConfig, format: OutputFormat) -> Result<()> {
    let backbone = generate_spiral_backbone(&config.spiral, &registry.house_palette());
    let planets = place_planets(chart, registry, &config.spiral);
    let aspects = aspect_lines(chart, &config.spiral, &config.default_aspect_color);

    match format {
        OutputFormat::Json => {
            let output = SpiralOutput {
                backbone: &backbone,
                planets: &planets,
                aspects: &aspects,
            };
            println!("{}", serde_json::to_string_pretty(&output)?);
        }
        OutputFormat::Text => {
            println!(
                "Backbone: {} layers, {} points",
                backbone.len(),
                backbone.iter().map(|l| l.points.len()).sum::<usize>()
            );
            for placed in &planets {
                let p = &placed.placement;
                println!(
                    "{:<8} house {:>2}  {:+6.2}° into {:.0}°  ({:.2}, {:.2}, {:.2})",
                    placed.body,
                    p.house,
                    p.degree_from_cusp,
                    p.house_size,
                    p.position.x,
                    p.position.y,
                    p.position.z
                );
            }
            for line in &aspects {
                println!("{} - {} {} ({:.2})", line.from, line.to, line.kind, line.strength);
            }
        }
    }
    Ok(())
}

fn run_fetch(subject_path: &Path, output: Option<&Path>) -> Result<()> {
    let content = std::fs::read_to_string(subject_path)?;
    let subject: BirthSubject = serde_json::from_str(&content)?;
    let client = AstroApiClient::from_env()?;

    let rt = Runtime::new()?;
    let raw = rt.block_on(client.fetch_chart(&subject))?;
    let json = serde_json::to_string_pretty(&raw)?;

    match output {
        Some(path) => {
            std::fs::write(path, json)?;
            tracing::info!(path = %path.display(), "Chart written");
        }
        None => println!("{}", json),
    }
    Ok(())
}
