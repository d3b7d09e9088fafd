//! batchcrop - crop many images with one rectangle
//!
//! # Subcommands
//!
//! - `crop` - Crop every image to a rectangle and save into a directory
//! - `edit` - Replay pointer events against the interactive editor
//! - `plan` - Show the region each image would be cropped to
//!
//! Logging goes through `env_logger`; set `RUST_LOG=debug` to see editor
//! transitions and per-image outcomes.

mod commands;
mod script;
mod settings;

use std::path::PathBuf;

use anyhow::Result;
use batchcrop_core::CropRect;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "batchcrop",
    version,
    about = "Crop a batch of images with one shared crop box"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Crop every image to RECT and save the results into an output directory
    Crop(CropArgs),
    /// Load images into the editor, replay a pointer-event script, print the box
    Edit(EditArgs),
    /// Print the clamped region each image would be cropped to
    Plan(PlanArgs),
}

/// Settings shared by every subcommand.
#[derive(Args, Debug, Clone, Default)]
struct ConfigArgs {
    /// JSON file with crop settings; missing fields keep their defaults
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,
    /// Number of worker threads for the batch
    #[arg(long)]
    workers: Option<usize>,
    /// Output quality (1-100) for formats that support one
    #[arg(long)]
    quality: Option<u8>,
}

#[derive(Args, Debug)]
struct CropArgs {
    /// Crop rectangle in original pixels, as X1,Y1,X2,Y2
    #[arg(long, allow_hyphen_values = true)]
    rect: CropRect,
    /// Directory to write cropped images into (created if missing)
    #[arg(long, short)]
    output: PathBuf,
    #[command(flatten)]
    settings: ConfigArgs,
    /// Source images
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct EditArgs {
    /// Canvas size as WIDTHxHEIGHT
    #[arg(long, default_value = "1200x800", value_parser = script::parse_size)]
    viewport: (u32, u32),
    /// Pointer-event script, e.g. "down:300,300 up down:325,325 drag:345,345 up"
    #[arg(long, default_value = "")]
    events: String,
    /// Crop every image with the resulting box into this directory
    #[arg(long, short)]
    output: Option<PathBuf>,
    #[command(flatten)]
    settings: ConfigArgs,
    /// Source images
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

#[derive(Args, Debug)]
struct PlanArgs {
    /// Crop rectangle in original pixels, as X1,Y1,X2,Y2
    #[arg(long, allow_hyphen_values = true)]
    rect: CropRect,
    /// Also show the name each crop would be saved under in this directory
    #[arg(long, short)]
    output: Option<PathBuf>,
    #[command(flatten)]
    settings: ConfigArgs,
    /// Source images
    #[arg(required = true)]
    images: Vec<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    if let Err(err) = run() {
        eprintln!("error: {err:#}");
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Crop(args) => commands::crop(args),
        Commands::Edit(args) => commands::edit(args),
        Commands::Plan(args) => commands::plan(args),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_crop() {
        let cli = Cli::try_parse_from([
            "batchcrop", "crop", "--rect", "10,20,160,170", "--output", "out", "--workers", "2",
            "a.jpg", "b.png",
        ])
        .unwrap();

        let Commands::Crop(args) = cli.command else {
            panic!("expected crop");
        };
        assert_eq!(args.rect, CropRect::new(10, 20, 160, 170));
        assert_eq!(args.output, PathBuf::from("out"));
        assert_eq!(args.settings.workers, Some(2));
        assert_eq!(args.images.len(), 2);
    }

    #[test]
    fn test_parse_negative_rect() {
        let cli = Cli::try_parse_from(["batchcrop", "plan", "--rect", "-50,-10,100,100", "a.jpg"])
            .unwrap();
        let Commands::Plan(args) = cli.command else {
            panic!("expected plan");
        };
        assert_eq!(args.rect, CropRect::new(-50, -10, 100, 100));
    }

    #[test]
    fn test_parse_edit_viewport() {
        let cli = Cli::try_parse_from(["batchcrop", "edit", "--viewport", "600x500", "a.jpg"]).unwrap();
        let Commands::Edit(args) = cli.command else {
            panic!("expected edit");
        };
        assert_eq!(args.viewport, (600, 500));
        assert!(args.events.is_empty());
    }

    #[test]
    fn test_images_required() {
        assert!(Cli::try_parse_from(["batchcrop", "crop", "--rect", "0,0,20,20", "-o", "out"]).is_err());
    }

    #[test]
    fn test_bad_rect_rejected() {
        assert!(Cli::try_parse_from(["batchcrop", "plan", "--rect", "1,2,3", "a.jpg"]).is_err());
    }
}
