mod app;

use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::info;

use skill_horizon::generate::{ClientSetup, DEFAULT_MODEL};
use skill_horizon::headless::{settle_graph, write_report};
use skill_horizon::layout::{CanvasSize, LayoutConfig};
use skill_horizon::skill::{Graph, fallback_graph};

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Skill tree JSON to show instead of the bundled one.
    #[arg(long, value_name = "FILE")]
    graph: Option<PathBuf>,

    /// Topic prefilled in the generation box.
    #[arg(long, default_value = "AI Software Engineering")]
    topic: String,

    /// Seed for the initial layout jitter.
    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, default_value = DEFAULT_MODEL)]
    model: String,

    /// Settle the layout without a window and print it as JSON.
    #[arg(long)]
    headless: bool,

    #[arg(long, default_value_t = 1280.0)]
    width: f32,

    #[arg(long, default_value_t = 800.0)]
    height: f32,
}

fn load_graph(path: Option<&PathBuf>) -> Result<Graph> {
    match path {
        Some(path) => {
            let graph = Graph::load(path)?;
            info!(
                "loaded {} nodes and {} edges from {}",
                graph.nodes.len(),
                graph.links.len(),
                path.display()
            );
            Ok(graph)
        }
        None => Ok(fallback_graph()),
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let args = Args::parse();
    let graph = load_graph(args.graph.as_ref())?;
    let mut config = LayoutConfig::default();
    if let Some(seed) = args.seed {
        config.seed = seed;
    }

    if args.headless {
        let report = settle_graph(graph, CanvasSize::new(args.width, args.height), config)?;
        return write_report(&report, io::stdout().lock()).context("failed to print layout");
    }

    let setup = ClientSetup::from_env(&args.model);
    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default()
            .with_inner_size([1440.0, 920.0])
            .with_min_inner_size([720.0, 480.0]),
        ..Default::default()
    };

    let topic = args.topic;
    eframe::run_native(
        "AI Horizons",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::SkillHorizonApp::new(
                cc, graph, config, topic, setup,
            )))
        }),
    )
    .map_err(|error| anyhow!("failed to run the viewer: {error}"))
}
