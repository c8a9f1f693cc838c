//! geomap - drive map layers from the command line
//!
//! Loads CSV files as data frames, runs them through a layer and writes the
//! rendered features as GeoJSON, or prints the tiles of a base map.

use anyhow::{anyhow, bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use gm_core::{MapContext, MapLayerOptions, PanelData, Projection, Theme, UpdateOutcome};
use gm_layers::LayerRegistry;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

mod export;
mod frame;

use export::{layer_to_geojson, OutputCoords};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum MapProjection {
    /// Spherical Web Mercator (EPSG:3857)
    WebMercator,
    /// Plain longitude/latitude
    Geographic,
}

impl From<MapProjection> for Projection {
    fn from(projection: MapProjection) -> Self {
        match projection {
            MapProjection::WebMercator => Projection::WebMercator,
            MapProjection::Geographic => Projection::Geographic,
        }
    }
}

#[derive(Parser)]
#[command(name = "geomap")]
#[command(about = "Render geomap layers from CSV data", long_about = None)]
struct Args {
    /// Log debug output (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// List the available layer types
    Layers,

    /// Render data frames through a layer and write GeoJSON
    Render {
        /// CSV file with a header row; repeat for several frames
        #[arg(long = "data", required = true)]
        data: Vec<PathBuf>,

        /// Layer options as JSON (defaults to the layer's default options)
        #[arg(long)]
        options: Option<PathBuf>,

        /// Layer type, used when no options file is given
        #[arg(long, default_value = "arrows")]
        layer: String,

        /// Map projection
        #[arg(long, value_enum, default_value = "web-mercator")]
        projection: MapProjection,

        /// Keep projected coordinates instead of writing longitude/latitude
        #[arg(long)]
        projected: bool,

        /// Output file (stdout when omitted)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Print the URL of a base map tile
    Tiles {
        /// Base map type
        #[arg(long, default_value = "osm-standard")]
        layer: String,

        /// Layer options as JSON
        #[arg(long)]
        options: Option<PathBuf>,

        #[arg(long)]
        z: u8,

        #[arg(long)]
        x: u32,

        #[arg(long)]
        y: u32,
    },
}

fn init_logging(verbose: bool) {
    let default_level = if verbose { "debug" } else { "info" };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn read_options(
    path: Option<&Path>,
    registry: &LayerRegistry,
    layer: &str,
) -> Result<MapLayerOptions> {
    match path {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("Failed to read {}", path.display()))?;
            serde_json::from_str(&text)
                .with_context(|| format!("Invalid layer options in {}", path.display()))
        }
        None => registry
            .get(layer)
            .map(|item| item.default_options())
            .ok_or_else(|| anyhow!("Unknown layer type: {}", layer)),
    }
}

fn list_layers(registry: &LayerRegistry) {
    for item in registry.base_maps() {
        println!("{:<14} base map   {}", item.id(), item.name());
    }
    for item in registry.data_layers() {
        println!("{:<14} data layer {} - {}", item.id(), item.name(), item.description());
    }
}

fn render(
    registry: &LayerRegistry,
    data: &[PathBuf],
    options: &MapLayerOptions,
    projection: Projection,
    coords: OutputCoords,
    output: Option<&Path>,
) -> Result<()> {
    let series = data
        .iter()
        .map(|path| frame::load_csv(path))
        .collect::<Result<Vec<_>>>()?;

    let map = MapContext::new(projection);
    let mut handler = registry.create(&map, options, &Theme::default())?;
    let layer = handler.init()?;
    let Some(vector) = layer.as_vector() else {
        bail!("Layer type {} does not render features", options.layer_type);
    };

    let outcome = handler.update(&PanelData::new(series))?;
    for warning in outcome.warnings() {
        warn!("{}", warning);
    }
    match &outcome {
        UpdateOutcome::Rendered { frame_index, features, .. } => {
            info!("Rendered {} features from {}", features, data[*frame_index].display());
        }
        UpdateOutcome::Cleared { .. } => warn!("No frame could be rendered"),
        UpdateOutcome::Ignored => info!("No data to render"),
    }

    let collection = layer_to_geojson(vector, projection, coords);
    handler.dispose();

    let json = serde_json::to_string_pretty(&collection)?;
    match output {
        Some(path) => {
            std::fs::write(path, json)
                .with_context(|| format!("Failed to write {}", path.display()))?;
            info!("Wrote {}", path.display());
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn print_tile(
    registry: &LayerRegistry,
    options: &MapLayerOptions,
    z: u8,
    x: u32,
    y: u32,
) -> Result<()> {
    let mut handler = registry.create(&MapContext::default(), options, &Theme::default())?;
    let layer = handler.init()?;
    let Some(tiles) = layer.as_tile() else {
        bail!("Layer type {} is not a base map", options.layer_type);
    };

    if !tiles.visible_at(z as f64) {
        warn!(
            "Zoom {} is outside the layer's range {:?}..{:?}",
            z, tiles.min_zoom, tiles.max_zoom
        );
    }
    println!("{}", tiles.source.tile_url(z, x, y));
    if let Some(attributions) = &tiles.source.attributions {
        println!("{}", attributions);
    }
    handler.dispose();
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let registry = LayerRegistry::standard();

    match args.command {
        Command::Layers => list_layers(&registry),
        Command::Render {
            data,
            options,
            layer,
            projection,
            projected,
            output,
        } => {
            let options = read_options(options.as_deref(), &registry, &layer)?;
            let coords = if projected {
                OutputCoords::Projected
            } else {
                OutputCoords::LonLat
            };
            render(
                &registry,
                &data,
                &options,
                projection.into(),
                coords,
                output.as_deref(),
            )?;
        }
        Command::Tiles {
            layer,
            options,
            z,
            x,
            y,
        } => {
            let options = read_options(options.as_deref(), &registry, &layer)?;
            print_tile(&registry, &options, z, x, y)?;
        }
    }

    Ok(())
}
