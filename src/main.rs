// src/main.rs

//! Loads a puzzle from a share link or code, draws it into an in-memory
//! surface and prints a JSON summary.

use std::path::Path;

use anyhow::Context;
use log::{info, warn};
use serde_json::json;

use puzzle_canvas::scene::mock::RecordingSurface;
use puzzle_canvas::{Config, Editor};

const USAGE: &str = "usage: puzzle-canvas <url|code> [config.json]";

/// Main entry point for the `puzzle-canvas` tool.
fn main() -> anyhow::Result<()> {
    // Default filter is "info" if RUST_LOG is not set.
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .format_timestamp_micros()
        .init();

    let mut args = std::env::args().skip(1);
    let Some(code) = args.next() else {
        anyhow::bail!(USAGE);
    };
    let config = match args.next() {
        Some(path) => Config::load(Path::new(&path))?,
        None => {
            info!("No config file given; using defaults.");
            Config::default()
        }
    };
    if args.next().is_some() {
        warn!("Ignoring extra arguments. {}", USAGE);
    }

    let grid_config = config.grid.clone();
    let mut editor = Editor::new(config);
    let mut surface = RecordingSurface::new();
    editor
        .render(Some(&code), &mut surface, grid_config)
        .context("Failed to load puzzle")?;

    let record = editor.to_record(editor.metadata());
    let (solved, message) = editor.check();
    let summary = json!({
        "grid": record.grid,
        "metadata": record.metadata,
        "cells": record.cells.len(),
        "edges": record.edges.len(),
        "decorations": record.decorations.len(),
        "nodes": surface.node_count(),
        "check": { "ok": solved, "message": message },
    });
    println!("{}", serde_json::to_string_pretty(&summary)?);
    info!("Done.");
    Ok(())
}
