//! Concurrent crop-and-save over a list of images.
//!
//! This module provides functionality for:
//! - Clamping the shared crop rectangle to each image's own bounds
//! - Saving crops under collision-resolved names in the output directory
//! - Running the work on a bounded worker pool and aggregating the outcomes
//!
//! # Architecture
//!
//! Every image becomes one task on a fixed-width `rayon` pool. Each task
//! reports through its own channel; the submitting thread blocks on those
//! channels in submission order, so results and progress come back in the
//! order the paths were given even though the work finishes out of order.
//! A failing image is recorded and the rest of the batch carries on. Only a
//! missing output directory or a pool that cannot start stops a batch.

mod crop;
mod naming;
mod result;

use std::fs;
use std::io::{self, BufWriter, Write};
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::path::{Path, PathBuf};
use std::sync::mpsc;

use log::{debug, info, warn};
use thiserror::Error;

use crate::config::CropConfig;
use crate::decode::{decode_file, DecodeError};
use crate::encode::{encode_to, output_format, EncodeError};
use crate::session::file_name;
use crate::CropRect;

pub use crop::{apply_crop, clamp_to_image, crop_region};
pub use naming::{candidate_name, claim_output_file, resolve_output_path};
pub use result::{BatchProgress, BatchResult, ItemOutcome, SUMMARY_FAILURE_LIMIT};

/// Failures that stop a whole batch.
#[derive(Debug, Error)]
pub enum BatchError {
    /// The output directory could not be created
    #[error("cannot create output directory {path}: {reason}")]
    OutputDir { path: String, reason: String },

    /// The worker pool could not be started
    #[error("failed to start worker threads: {0}")]
    WorkerPool(String),
}

/// Why a single image failed; becomes the reason part of its failure message.
#[derive(Debug, Error)]
enum ItemError {
    #[error(transparent)]
    Decode(#[from] DecodeError),

    #[error(transparent)]
    Encode(#[from] EncodeError),

    #[error("write failed: {0}")]
    Io(#[from] io::Error),
}

/// One image's crop-and-save job.
#[derive(Debug, Clone)]
struct CropTask {
    source: PathBuf,
    rect: CropRect,
    output_dir: PathBuf,
    quality: u8,
    min_size: i32,
}

impl CropTask {
    fn run(&self) -> ItemOutcome {
        match self.crop_and_save() {
            Ok(output) => {
                debug!("cropped {} -> {}", self.source.display(), output.display());
                ItemOutcome::Saved {
                    source: self.source.clone(),
                    output,
                }
            }
            Err(err) => {
                let message = format!("{}: {}", file_name(&self.source), err);
                warn!("crop failed: {}", message);
                ItemOutcome::Failed {
                    source: self.source.clone(),
                    message,
                }
            }
        }
    }

    fn crop_and_save(&self) -> Result<PathBuf, ItemError> {
        let decoded = decode_file(&self.source)?;
        let (cropped, used) = apply_crop(&decoded.image, self.rect, self.min_size);
        debug!("{}: clamped {} to {}", self.source.display(), self.rect, used);

        let name = file_name(&self.source);
        let format = output_format(Path::new(&name), decoded.format)?;
        let (output, file) = claim_output_file(&self.output_dir, &name)?;

        let mut writer = BufWriter::new(file);
        let written = encode_to(&cropped, format, self.quality, &mut writer)
            .map_err(ItemError::from)
            .and_then(|()| writer.flush().map_err(ItemError::from));
        drop(writer);

        if let Err(err) = written {
            // Don't leave a truncated file holding the claimed name
            let _ = fs::remove_file(&output);
            return Err(err);
        }
        Ok(output)
    }

    fn run_isolated(&self) -> ItemOutcome {
        catch_unwind(AssertUnwindSafe(|| self.run())).unwrap_or_else(|_| self.terminated())
    }

    fn terminated(&self) -> ItemOutcome {
        let message = format!("{}: worker terminated unexpectedly", file_name(&self.source));
        warn!("crop failed: {}", message);
        ItemOutcome::Failed {
            source: self.source.clone(),
            message,
        }
    }
}

/// Crops a list of images with one shared rectangle.
#[derive(Debug, Clone)]
pub struct BatchCropEngine {
    workers: usize,
    quality: u8,
    min_size: i32,
}

impl Default for BatchCropEngine {
    fn default() -> Self {
        Self::new(&CropConfig::default())
    }
}

impl BatchCropEngine {
    pub fn new(config: &CropConfig) -> Self {
        Self {
            workers: config.workers.max(1),
            quality: config.quality.clamp(1, 100),
            min_size: config.min_size.max(1),
        }
    }

    pub fn workers(&self) -> usize {
        self.workers
    }

    /// Crop every image in `paths` to `rect` and save into `output_dir`,
    /// logging progress as it goes.
    pub fn run(
        &self,
        paths: &[PathBuf],
        rect: CropRect,
        output_dir: &Path,
    ) -> Result<BatchResult, BatchError> {
        self.run_with_progress(paths, rect, output_dir, |progress| {
            info!(
                "batch progress {}/{} ({:.0}%)",
                progress.completed,
                progress.total,
                progress.fraction() * 100.0
            );
        })
    }

    /// Like [`run`](Self::run), calling `on_progress` after each item is
    /// collected.
    ///
    /// Items are collected in the order of `paths`, so `completed` counts
    /// 1, 2, ... `total` and the n-th call reports on the n-th path.
    ///
    /// # Errors
    ///
    /// Only fatal conditions are errors. A file that cannot be decoded or
    /// written is recorded in the returned [`BatchResult`] instead.
    pub fn run_with_progress<F>(
        &self,
        paths: &[PathBuf],
        rect: CropRect,
        output_dir: &Path,
        mut on_progress: F,
    ) -> Result<BatchResult, BatchError>
    where
        F: FnMut(BatchProgress),
    {
        fs::create_dir_all(output_dir).map_err(|e| BatchError::OutputDir {
            path: output_dir.display().to_string(),
            reason: e.to_string(),
        })?;

        let total = paths.len();
        let mut result = BatchResult::new(total);
        if total == 0 {
            return Ok(result);
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.workers)
            .thread_name(|index| format!("batchcrop-worker-{}", index))
            .build()
            .map_err(|e| BatchError::WorkerPool(e.to_string()))?;

        info!(
            "cropping {} images to {} into {} with {} workers",
            total,
            rect,
            output_dir.display(),
            self.workers
        );

        let pending: Vec<(CropTask, mpsc::Receiver<ItemOutcome>)> = paths
            .iter()
            .map(|source| {
                let task = CropTask {
                    source: source.clone(),
                    rect,
                    output_dir: output_dir.to_path_buf(),
                    quality: self.quality,
                    min_size: self.min_size,
                };
                let (tx, rx) = mpsc::sync_channel(1);
                let job = task.clone();
                pool.spawn(move || {
                    let _ = tx.send(job.run_isolated());
                });
                (task, rx)
            })
            .collect();

        for (index, (task, rx)) in pending.into_iter().enumerate() {
            let outcome = rx.recv().unwrap_or_else(|_| task.terminated());
            result.record(outcome);
            on_progress(BatchProgress {
                completed: index + 1,
                total,
            });
        }

        info!(
            "batch complete: {} succeeded, {} failed",
            result.succeeded,
            result.failed()
        );
        Ok(result)
    }
}
