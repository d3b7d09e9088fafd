//! Subcommand implementations.

use std::path::Path;

use anyhow::{Context, Result};
use batchcrop_core::batch::{crop_region, resolve_output_path};
use batchcrop_core::decode::decode_file;
use batchcrop_core::session::file_name;
use batchcrop_core::{
    clamp_to_image, BatchCropEngine, BatchProgress, BatchResult, CropController, LoadError,
};
use log::{info, warn};

use crate::{script, settings, CropArgs, EditArgs, PlanArgs};

/// Warning line for a batch that did not save every image.
fn failure_note(result: &BatchResult) -> Option<String> {
    if result.is_complete_success() {
        None
    } else {
        Some(format!("{} of {} images failed", result.failed(), result.total))
    }
}

fn report(result: &BatchResult, output: &Path) {
    println!("{}", result.summary(output));
    if let Some(note) = failure_note(result) {
        warn!("{}", note);
    }
}

fn log_progress(progress: BatchProgress) {
    info!(
        "progress {}/{} ({:.0}%)",
        progress.completed,
        progress.total,
        progress.fraction() * 100.0
    );
}

pub fn crop(args: CropArgs) -> Result<()> {
    let config = settings::resolve(&args.settings)?;
    let engine = BatchCropEngine::new(&config);
    info!("cropping {} images on {} workers", args.images.len(), engine.workers());

    let result = engine
        .run(&args.images, args.rect, &args.output)
        .context("batch crop failed")?;

    report(&result, &args.output);
    Ok(())
}

pub fn edit(args: EditArgs) -> Result<()> {
    let config = settings::resolve(&args.settings)?;
    let events = script::parse_script(&args.events).context("invalid event script")?;
    let (width, height) = args.viewport;

    let mut controller = CropController::new(config, width, height);
    if let Err(err) = controller.add_images(&args.images) {
        warn!("{}", err);
    }

    for event in events {
        if let Err(err) = controller.dispatch(event) {
            warn!("{}", err);
        }
    }

    let state = controller.render();
    println!("{}", state.status);
    if let Some(rect) = controller.rect() {
        println!("{}", rect);
    }

    if let Some(output) = &args.output {
        let result = controller
            .start_batch(output, log_progress)
            .context("batch crop failed")?;
        report(&result, output);
    }
    Ok(())
}

pub fn plan(args: PlanArgs) -> Result<()> {
    let config = settings::resolve(&args.settings)?;

    for path in &args.images {
        let source = match decode_file(path) {
            Ok(source) => source,
            Err(err) => {
                println!("{}", LoadError::new(path, err));
                continue;
            }
        };

        let (width, height) = source.dimensions();
        let clamped = clamp_to_image(args.rect, width, height, config.min_size);
        let (_, _, crop_w, crop_h) = crop_region(clamped, width, height);

        let name = file_name(path);
        match &args.output {
            Some(dir) => println!(
                "{}: {} ({}x{}) -> {}",
                name,
                clamped,
                crop_w,
                crop_h,
                resolve_output_path(dir, &name).display()
            ),
            None => println!("{}: {} ({}x{})", name, clamped, crop_w, crop_h),
        }
    }
    Ok(())
}
