use std::io::Write;

use anyhow::{Context, Result, bail};
use serde::Serialize;

use crate::engine::LayoutEngine;
use crate::layout::{CanvasSize, LayoutConfig};
use crate::skill::Graph;

/// Ticks allowed before a headless run gives up waiting for rest.
pub const MAX_SETTLE_STEPS: usize = 5_000;

#[derive(Debug, Serialize)]
pub struct PlacedNode {
    pub id: String,
    pub tier: u32,
    pub x: f32,
    pub y: f32,
    pub pinned: bool,
}

/// Settled layout of one graph, serialized by `--headless`.
#[derive(Debug, Serialize)]
pub struct LayoutReport {
    pub width: f32,
    pub height: f32,
    pub max_tier: u32,
    pub settled: bool,
    pub ticks: u64,
    pub nodes: Vec<PlacedNode>,
    pub edges: usize,
    pub dangling_edges: usize,
}

pub fn settle_graph(graph: Graph, size: CanvasSize, config: LayoutConfig) -> Result<LayoutReport> {
    if !size.has_area() {
        bail!(
            "canvas must have a positive size, got {}x{}",
            size.width,
            size.height
        );
    }

    let mut engine = LayoutEngine::new(config);
    engine.start(graph, size);
    engine.settle(MAX_SETTLE_STEPS);

    let store = engine.store();
    let simulation = engine
        .simulation()
        .context("layout did not start for a canvas with area")?;
    let nodes = store
        .nodes()
        .iter()
        .zip(simulation.nodes())
        .map(|(node, placed)| PlacedNode {
            id: node.id.clone(),
            tier: placed.tier,
            x: placed.position.x,
            y: placed.position.y,
            pinned: placed.is_pinned(),
        })
        .collect();

    Ok(LayoutReport {
        width: size.width,
        height: size.height,
        max_tier: simulation.tiers().max_tier(),
        settled: simulation.is_idle(),
        ticks: simulation.ticks(),
        nodes,
        edges: store.edges().len(),
        dangling_edges: store.dangling_count(),
    })
}

pub fn write_report(report: &LayoutReport, mut out: impl Write) -> Result<()> {
    serde_json::to_writer_pretty(&mut out, report).context("failed to serialize layout report")?;
    writeln!(out).context("failed to write layout report")?;
    Ok(())
}
