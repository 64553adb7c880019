mod app;
mod data;
mod layout;
mod util;

use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

use clap::Parser;

use layout::LayoutConfig;

#[derive(Debug, Parser)]
#[command(author, version, about)]
struct Args {
    /// Path to the knowledge map dataset (JSON).
    #[arg(long, default_value = "knowledge-map.json")]
    graph_path: PathBuf,

    /// Fixes the layout jitter seed; omit for a fresh arrangement per run.
    #[arg(long)]
    layout_seed: Option<u64>,

    /// Below this node count the layout is a plain circle, no simulation.
    #[arg(long, default_value_t = 50)]
    small_graph_threshold: usize,

    /// Upper bound on force simulation rounds.
    #[arg(long, default_value_t = 150)]
    max_iterations: usize,
}

fn main() -> eframe::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let seed = args.layout_seed.unwrap_or_else(|| {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|elapsed| elapsed.subsec_nanos() as u64)
            .unwrap_or(0)
    });
    let layout_config = LayoutConfig {
        small_graph_threshold: args.small_graph_threshold,
        max_iterations: args.max_iterations,
        seed,
        ..LayoutConfig::default()
    };

    let options = eframe::NativeOptions {
        viewport: eframe::egui::ViewportBuilder::default().with_inner_size([1440.0, 920.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Knowledge Map",
        options,
        Box::new(move |cc| {
            Ok(Box::new(app::KnowledgeMapApp::new(
                cc,
                args.graph_path.clone(),
                layout_config,
            )))
        }),
    )
}
