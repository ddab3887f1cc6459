//! Command implementations for the SWI CLI.
//!
//! Provides subcommands for inspecting calculation results, rendering
//! risk tiles and exporting per-mesh values.

use clap::Subcommand;

pub mod analyze;
pub mod export;
pub mod input;
pub mod render;

#[derive(Subcommand)]
pub enum Command {
    /// Report grid spacing, coverage and risk counts of a calculation result
    Analyze {
        /// Calculation result JSON (`.gz` is decompressed)
        #[arg(short, long)]
        input: String,

        /// Forecast hour to classify
        #[arg(short = 't', long, default_value_t = 0)]
        forecast_hour: u32,

        /// Print the report as JSON
        #[arg(long)]
        json: bool,

        /// Only show the risk timeline of one area, as `PREFECTURE/AREA`
        #[arg(short, long)]
        area: Option<String>,
    },

    /// Render risk tiles covering the dataset as PNG files
    Render {
        /// Calculation result JSON (`.gz` is decompressed)
        #[arg(short, long)]
        input: String,

        /// Forecast hour to render
        #[arg(short = 't', long, default_value_t = 0)]
        forecast_hour: u32,

        /// Map zoom level
        #[arg(short, long, default_value_t = 12)]
        zoom: u8,

        /// Tiles are written as `<output_dir>/<z>/<x>/<y>.png`
        #[arg(short, long)]
        output_dir: String,

        /// Tile edge in pixels
        #[arg(long, default_value_t = 256)]
        tile_size: u32,
    },

    /// Export per-mesh values and risk levels as CSV
    Export {
        /// Calculation result JSON (`.gz` is decompressed)
        #[arg(short, long)]
        input: String,

        /// Output CSV path
        #[arg(short, long)]
        output: String,

        /// Only export this forecast hour (default: every hour)
        #[arg(short = 't', long)]
        forecast_hour: Option<u32>,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Analyze {
            input,
            forecast_hour,
            json,
            area,
        } => analyze::run_analyze(&input, forecast_hour, json, area.as_deref()).await,
        Command::Render {
            input,
            forecast_hour,
            zoom,
            output_dir,
            tile_size,
        } => render::run_render(&input, forecast_hour, zoom, &output_dir, tile_size).await,
        Command::Export {
            input,
            output,
            forecast_hour,
        } => export::run_export(&input, &output, forecast_hour).await,
    }
}
