//! grid-rescue — end-to-end demo of the rescue route planner.
//!
//! Scatters survivor reports over a synthetic 6 × 6 street grid, blocks one
//! street, and dispatches two vehicles from opposite corners.  Routes and
//! the edited graph are written as GeoJSON under `output/grid-rescue/`.
//!
//! ```text
//! cargo run -p grid-rescue [-- planner.json]
//! cargo run -p grid-rescue --features osm -- planner.json area.osm.pbf
//! ```
//!
//! Set `RUST_LOG=debug` to see every assignment.

mod network;

use std::path::Path;
use std::time::Instant;

use anyhow::{Context, Result};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing_subscriber::EnvFilter;

use rd_core::GeoPoint;
use rd_graph::{EdgeModification, EdgeState, PointRequest};
use rd_plan::{Planner, PlannerConfig, RouteRequest, geojson};

use network::{GridSource, SIZE, SPACING, grid_bbox, node_id, node_pos};

// ── Constants ─────────────────────────────────────────────────────────────────

const SURVIVOR_COUNT: usize = 12;
const SEED:           u64   = 42;
const OUTPUT_DIR:     &str  = "output/grid-rescue";

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut args = std::env::args().skip(1);
    let mut config = match args.next() {
        Some(path) => load_config(Path::new(&path))?,
        None => PlannerConfig::default(),
    };
    std::fs::create_dir_all(OUTPUT_DIR)?;
    config.cache.db_path = Path::new(OUTPUT_DIR).join("graph_cache.sqlite");

    println!("=== grid-rescue ===");
    println!("Survivors: {SURVIVOR_COUNT}  |  Vehicles: 2  |  Seed: {SEED}");
    println!();

    // 1. Planner over the cache and a graph source.
    let planner = open_planner(config, args.next())?;
    let bbox = grid_bbox();

    // 2. Request: two pickups, random survivors, one blocked street.
    let request = RouteRequest::new(bbox, reports(SEED)).with_edits(vec![EdgeModification::new(
        node_id(2, 2),
        node_id(2, 3),
        0,
        EdgeState::Blocked,
    )]);

    // 3. Plan.  The second call is served from the cache.
    let t0 = Instant::now();
    let plan = planner.plan_routes(&request)?;
    let cold = t0.elapsed();
    let t1 = Instant::now();
    planner.plan_routes(&request)?;
    let warm = t1.elapsed();

    println!("Session {}", plan.session);
    println!(
        "Display graph: {} nodes, {} edges  |  cached areas: {}",
        plan.display_graph.node_count(),
        plan.display_graph.edge_count(),
        planner.cache().len()?,
    );
    println!("Planned in {:.1} ms (cold), {:.1} ms (warm)", ms(cold), ms(warm));
    println!();

    // 4. Summary table.
    println!("{:<8} {:<8} {:<12} {:<10}", "Vehicle", "Nodes", "Cost", "Points");
    println!("{}", "-".repeat(40));
    for r in &plan.routes {
        println!("{:<8} {:<8} {:<12.1} {:<10}", r.vehicle, r.nodes.len(), r.cost, r.coordinates.len());
    }
    if !plan.unassigned.is_empty() {
        println!("Unreached survivor groups: {}", plan.unassigned.len());
    }
    println!();

    // 5. GeoJSON output.
    let out = Path::new(OUTPUT_DIR);
    write_json(&out.join("graph.geojson"), &geojson::graph_edges(&plan.display_graph))?;
    write_json(&out.join("routes.geojson"), &geojson::routes(&plan.routes))?;
    write_json(
        &out.join("unassigned.geojson"),
        &geojson::unassigned(&plan.display_graph, &plan.unassigned),
    )?;
    println!("GeoJSON written to {OUTPUT_DIR}/");
    Ok(())
}

// ── Helpers ───────────────────────────────────────────────────────────────────

fn load_config(path: &Path) -> Result<PlannerConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading planner config {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing planner config {}", path.display()))
}

#[cfg(not(feature = "osm"))]
fn open_planner(config: PlannerConfig, pbf: Option<String>) -> Result<Planner> {
    if pbf.is_some() {
        anyhow::bail!("reading an OSM extract needs the `osm` feature");
    }
    Ok(Planner::open(config, GridSource)?)
}

#[cfg(feature = "osm")]
fn open_planner(config: PlannerConfig, pbf: Option<String>) -> Result<Planner> {
    let planner = match pbf {
        Some(path) => Planner::open(config, rd_graph::osm::PbfSource::new(path))?,
        None => Planner::open(config, GridSource)?,
    };
    Ok(planner)
}

/// Pickups at two opposite corners, then seeded survivor reports jittered
/// around grid intersections and mid-blocks.
fn reports(seed: u64) -> Vec<PointRequest> {
    let mut rng = SmallRng::seed_from_u64(seed);
    let mut points = vec![
        PointRequest::pickup(1, node_pos(0, 0)),
        PointRequest::pickup(2, node_pos(SIZE - 1, SIZE - 1)),
    ];
    for i in 0..SURVIVOR_COUNT {
        let row = rng.gen_range(0..SIZE) as f64;
        let col = rng.gen_range(0..SIZE - 1) as f64 + rng.gen_range(0.0..1.0);
        let corner = node_pos(0, 0);
        let pos = GeoPoint::new(
            corner.lat + row * SPACING + rng.gen_range(-0.000_05..0.000_05),
            corner.lon + col * SPACING,
        );
        points.push(PointRequest::survivor(
            100 + i as i64,
            pos,
            rng.gen_range(1..=5),
            rng.gen_range(1..=10),
        ));
    }
    points
}

fn write_json(path: &Path, value: &serde_json::Value) -> Result<()> {
    let text = serde_json::to_string_pretty(value)?;
    std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))
}

fn ms(d: std::time::Duration) -> f64 {
    d.as_secs_f64() * 1_000.0
}
