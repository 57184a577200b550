//! Event replay CLI for the region engine.
//!
//! Loads an image, feeds a recorded list of surface events through an
//! `InteractionMachine`, and writes each resulting region's crop to disk.
//!
//! Usage:
//!   cargo run -- <image.png> <events.json>               Crops go to ./crops
//!   cargo run -- <image.png> <events.json> <out_dir>     Crops go to out_dir
//!   cargo run -- <image.png> <events.json> --trace       Also print every transition
//!
//! Engine settings come from `REGION_*` variables, read from `.env` too.

use std::path::{Path, PathBuf};
use std::time::Instant;

use region_crop::{EngineConfig, InteractionMachine, Rect, SurfaceEvent, Transition};
use serde::Serialize;

fn main() {
    dotenvy::dotenv().ok();
    region_crop::init_logging();

    let args: Vec<String> = std::env::args().collect();
    let positional: Vec<&String> = args.iter().skip(1).filter(|a| !a.starts_with("--")).collect();

    if positional.len() < 2 {
        eprintln!("Usage:");
        eprintln!("  region-replay <image> <events.json> [out_dir] [--trace]");
        std::process::exit(1);
    }

    let trace = args.contains(&"--trace".to_string());
    let image_path = Path::new(positional[0]);
    let events_path = Path::new(positional[1]);
    let out_dir = positional
        .get(2)
        .map(|p| PathBuf::from(p.as_str()))
        .unwrap_or_else(|| PathBuf::from("crops"));

    let config = EngineConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Invalid configuration: {}", e);
        std::process::exit(1);
    });

    let machine = replay(image_path, events_path, config, trace);
    write_crops(&machine, &out_dir);
}

/// Loads the image and runs every event through a fresh machine.
fn replay(image_path: &Path, events_path: &Path, config: EngineConfig, trace: bool) -> InteractionMachine {
    let image = image::open(image_path).unwrap_or_else(|e| {
        eprintln!("Failed to open {}: {}", image_path.display(), e);
        std::process::exit(1);
    });

    let script = std::fs::read_to_string(events_path).unwrap_or_else(|e| {
        eprintln!("Failed to read {}: {}", events_path.display(), e);
        std::process::exit(1);
    });
    let events: Vec<SurfaceEvent> = serde_json::from_str(&script).unwrap_or_else(|e| {
        eprintln!("Invalid event script: {}", e);
        std::process::exit(1);
    });

    let mut machine = InteractionMachine::with_config(config);
    machine.load_image(image);

    let start = Instant::now();
    let mut created = 0usize;
    for event in events.iter().cloned() {
        let transition = machine.handle(event);
        if matches!(transition, Transition::Created { .. }) {
            created += 1;
        }
        if trace {
            match serde_json::to_string(&transition) {
                Ok(line) => println!("{}", line),
                Err(e) => log::warn!("Could not serialize transition: {}", e),
            }
        }
    }

    eprintln!(
        "--- Replayed {} events in {}ms, {} regions created, {} kept ---",
        events.len(),
        start.elapsed().as_millis(),
        created,
        machine.store().len()
    );

    machine
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct PreviewRow {
    ordinal: usize,
    id: String,
    rect: Rect,
    width: u32,
    height: u32,
    file: String,
}

/// Writes one file per region, numbered by insertion order, and prints a
/// JSON summary of what was written.
fn write_crops(machine: &InteractionMachine, out_dir: &Path) {
    if let Err(e) = std::fs::create_dir_all(out_dir) {
        eprintln!("Failed to create {}: {}", out_dir.display(), e);
        std::process::exit(1);
    }

    let extension = match machine.config().artifact_format {
        region_crop::ArtifactFormat::Png => "png",
        region_crop::ArtifactFormat::Jpeg => "jpg",
    };

    let mut rows = Vec::new();
    for preview in machine.store().previews() {
        let file = out_dir.join(format!("{:02}-{}.{}", preview.ordinal, preview.id, extension));
        if let Err(e) = std::fs::write(&file, preview.artifact.bytes()) {
            eprintln!("  WARNING: Failed to write {}: {}", file.display(), e);
            continue;
        }
        rows.push(PreviewRow {
            ordinal: preview.ordinal,
            id: preview.id.to_string(),
            rect: preview.rect,
            width: preview.artifact.width(),
            height: preview.artifact.height(),
            file: file.display().to_string(),
        });
    }

    match serde_json::to_string_pretty(&rows) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Failed to serialize summary: {}", e),
    }
}
