use clap::Parser;
use mapfile::BoundingBox;
use std::path::PathBuf;

/// `map2png` - render regions of a MAPT tile file to PNG images.
///
/// Every `--bbox` becomes one image, `map_<n>.png` in the output directory,
/// numbered in the order the boxes were given.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// The MAPT file to read.
    #[arg(long, env = "MAP2PNG_DATA_FILE", required_unless_present = "write_demo")]
    pub data_file: Option<PathBuf>,

    /// Region to render as `minLat,minLon,maxLat,maxLon` in degrees.
    ///
    /// May be repeated; several boxes can also be joined with `;`.
    #[arg(
        long,
        env = "MAP2PNG_BBOX",
        value_parser = parse_bbox,
        value_delimiter = ';',
        required_unless_present = "write_demo"
    )]
    pub bbox: Vec<BoundingBox>,

    #[arg(long, env = "MAP2PNG_WIDTH", default_value_t = 800)]
    pub width: u32,

    #[arg(long, env = "MAP2PNG_HEIGHT", default_value_t = 600)]
    pub height: u32,

    #[arg(long, env = "MAP2PNG_OUTPUT_DIR", default_value = ".")]
    pub output_dir: PathBuf,

    /// Cell size of the tile grid the file was written with, in degrees.
    #[arg(long, env = "MAP2PNG_CELL_SIZE_DEG", default_value_t = 1.0)]
    pub cell_size_deg: f64,

    /// TrueType/OpenType font for place labels. Without one, places are
    /// drawn as small squares.
    #[arg(long, env = "MAP2PNG_FONT")]
    pub font: Option<PathBuf>,

    /// Write a small sample MAPT file to this path and exit.
    #[arg(long, env = "MAP2PNG_WRITE_DEMO")]
    pub write_demo: Option<PathBuf>,
}

/// Parse `minLat,minLon,maxLat,maxLon`.
pub fn parse_bbox(s: &str) -> Result<BoundingBox, String> {
    let values = s
        .split(',')
        .map(|part| {
            part.trim()
                .parse::<f64>()
                .map_err(|e| format!("'{}': {}", part.trim(), e))
        })
        .collect::<Result<Vec<_>, _>>()?;

    let [min_lat, min_lon, max_lat, max_lon] = values[..] else {
        return Err(format!(
            "expected 4 comma-separated numbers (minLat,minLon,maxLat,maxLon), got {}",
            values.len()
        ));
    };

    let bbox = BoundingBox::new(min_lat, min_lon, max_lat, max_lon);
    if !bbox.is_valid() {
        return Err(format!("minimum exceeds maximum in '{s}'"));
    }
    Ok(bbox)
}
