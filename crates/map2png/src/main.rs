use anyhow::{bail, Context, Result};
use clap::Parser;
use log::{info, warn};
use rayon::prelude::*;
use std::{fs, path::PathBuf, time::Instant};

use mapfile::{BoundingBox, DataFile, GridTiling};
use maprender::{render, LabelFont, RenderOptions, Scene, WebMercator};

mod config;
mod demo;

use config::Config;

/// Query `bbox`, tessellate what comes back and write `map_<n>.png`.
fn render_one(
    file: &DataFile,
    grid: &GridTiling,
    bbox: &BoundingBox,
    n: usize,
    config: &Config,
    font: Option<&LabelFont>,
) -> Result<PathBuf> {
    let started = Instant::now();

    let mut scene = Scene::new();
    let mut features = 0usize;
    file.for_each_feature(grid, bbox, |feature| {
        features += 1;
        scene.tessellate(&feature, &WebMercator);
        true
    })
    .context("querying features")?;
    let shapes = scene.len();

    let options = RenderOptions {
        width: config.width,
        height: config.height,
        ..Default::default()
    };
    let pixmap = render(scene, &options, font).context("rendering")?;

    let out_path = config.output_dir.join(format!("map_{n}.png"));
    pixmap
        .save_png(&out_path)
        .with_context(|| format!("writing {}", out_path.display()))?;

    info!(
        "{} <- {} features, {} shapes in {:.2?}",
        out_path.display(),
        features,
        shapes,
        started.elapsed()
    );
    Ok(out_path)
}

fn main() -> Result<()> {
    env_logger::init();

    let config = Config::parse();
    let grid = GridTiling::new(config.cell_size_deg);

    if let Some(demo_path) = &config.write_demo {
        demo::write_demo(demo_path, &grid)?;
        let b = demo::DEMO_BBOX;
        info!(
            "Wrote {}; try --bbox {},{},{},{}",
            demo_path.display(),
            b.min_lat,
            b.min_lon,
            b.max_lat,
            b.max_lon
        );
        return Ok(());
    }

    let data_path = config
        .data_file
        .as_ref()
        .context("--data-file is required unless --write-demo is given")?;
    let file = DataFile::open(data_path)
        .with_context(|| format!("opening {}", data_path.display()))?;
    info!("{}: {} tiles", data_path.display(), file.tile_count());

    let font = config
        .font
        .as_ref()
        .map(|path| {
            LabelFont::load(path).with_context(|| format!("loading font {}", path.display()))
        })
        .transpose()?;

    fs::create_dir_all(&config.output_dir)?;

    info!("Rendering {} boxes...", config.bbox.len());

    // Render boxes in parallel over the shared mapping, reporting any errors.
    let failed = config
        .bbox
        .par_iter()
        .enumerate()
        .filter(|(n, bbox)| {
            match render_one(&file, &grid, bbox, *n, &config, font.as_ref()) {
                Ok(_) => false,
                Err(err) => {
                    warn!("Error rendering box {}: {:#}", n, err);
                    true
                }
            }
        })
        .count();

    if failed > 0 {
        bail!("{} of {} boxes failed", failed, config.bbox.len());
    }
    Ok(())
}
