//! Per-file analysis and batch processing.
//!
//! Each file in the batch goes through the same pipeline:
//!
//! ```text
//! read bytes → header → pixel grid ─┬→ file size / color depth / color count
//!                                   ├→ brightness
//!                                   └→ pixel dump (optional)
//! ```
//!
//! The grid is decoded once and shared by every step after it.
//!
//! ## Failure isolation
//!
//! A file that fails at any step becomes a [`FileFailure`] carrying its index,
//! path and [`ErrorKind`]. It is left out of the ranking and never affects
//! the other files. There are no retries.
//!
//! ## Parallel Processing
//!
//! Files are analyzed in parallel using [rayon](https://docs.rs/rayon). Workers
//! share nothing mutable: each returns an owned result, and rayon's indexed
//! `collect` keeps them in submission order. Ranking runs afterwards on the
//! calling thread, once every file has finished.

use crate::bmp::{self, BmpHeader, DecodeError, Limits, PixelGrid};
use crate::brightness::{DegenerateImage, compute_brightness};
use crate::config::{AnalyzerConfig, SizeMismatchPolicy};
use crate::dump::write_pixel_dump;
use crate::metadata::{self, SizeMismatch};
use crate::rank::{ImageAnalysis, Ranking, rank};
use rayon::prelude::*;
use serde::Serialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::mpsc::Sender;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AnalysisError {
    #[error("cannot read file: {0}")]
    FileUnavailable(#[source] std::io::Error),
    #[error(transparent)]
    Decode(#[from] DecodeError),
    #[error(transparent)]
    Degenerate(#[from] DegenerateImage),
    #[error("declared file size {declared} bytes does not match actual size {actual} bytes")]
    SizeMismatch { declared: u32, actual: u64 },
    #[error("failed to write pixel dump: {0}")]
    Dump(#[source] std::io::Error),
}

/// Failure category reported alongside each failed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum ErrorKind {
    FileUnavailable,
    TruncatedHeader,
    InvalidSignature,
    UnsupportedHeader,
    UnsupportedDepth,
    UnsupportedCompression,
    InvalidPixelOffset,
    InvalidDimensions,
    PartialPixelData,
    LimitExceeded,
    DegenerateImage,
    SizeMismatch,
    DumpFailed,
}

impl ErrorKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::FileUnavailable => "FileUnavailable",
            Self::TruncatedHeader => "TruncatedHeader",
            Self::InvalidSignature => "InvalidSignature",
            Self::UnsupportedHeader => "UnsupportedHeader",
            Self::UnsupportedDepth => "UnsupportedDepth",
            Self::UnsupportedCompression => "UnsupportedCompression",
            Self::InvalidPixelOffset => "InvalidPixelOffset",
            Self::InvalidDimensions => "InvalidDimensions",
            Self::PartialPixelData => "PartialPixelData",
            Self::LimitExceeded => "LimitExceeded",
            Self::DegenerateImage => "DegenerateImage",
            Self::SizeMismatch => "SizeMismatch",
            Self::DumpFailed => "DumpFailed",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl AnalysisError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::FileUnavailable(_) => ErrorKind::FileUnavailable,
            Self::Decode(e) => match e {
                DecodeError::TruncatedHeader { .. } => ErrorKind::TruncatedHeader,
                DecodeError::InvalidSignature => ErrorKind::InvalidSignature,
                DecodeError::UnsupportedHeader(_) => ErrorKind::UnsupportedHeader,
                DecodeError::UnsupportedDepth(_) => ErrorKind::UnsupportedDepth,
                DecodeError::UnsupportedCompression(_) => ErrorKind::UnsupportedCompression,
                DecodeError::InvalidPixelOffset { .. } => ErrorKind::InvalidPixelOffset,
                DecodeError::InvalidDimensions { .. } => ErrorKind::InvalidDimensions,
                DecodeError::PartialPixelData { .. } => ErrorKind::PartialPixelData,
                DecodeError::LimitExceeded(_) => ErrorKind::LimitExceeded,
            },
            Self::Degenerate(_) => ErrorKind::DegenerateImage,
            Self::SizeMismatch { .. } => ErrorKind::SizeMismatch,
            Self::Dump(_) => ErrorKind::DumpFailed,
        }
    }
}

/// Non-fatal issue attached to a successful report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "kind")]
pub enum Warning {
    SizeMismatch { declared: u32, actual: u64 },
}

impl From<SizeMismatch> for Warning {
    fn from(m: SizeMismatch) -> Self {
        Warning::SizeMismatch {
            declared: m.declared,
            actual: m.actual,
        }
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Warning::SizeMismatch { declared, actual } => write!(
                f,
                "declared file size {declared} bytes differs from actual size {actual} bytes"
            ),
        }
    }
}

/// Per-file result for a successfully analyzed image.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageReport {
    /// 1-based position in the batch.
    pub index: usize,
    pub path: PathBuf,
    pub valid: bool,
    pub width: u32,
    pub height: u32,
    pub declared_file_size: u32,
    pub size_in_mb: f64,
    pub color_depth: u16,
    pub color_count: usize,
    pub brightness: f64,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub warnings: Vec<Warning>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dump_path: Option<PathBuf>,
}

impl ImageReport {
    /// The subset of this report that feeds the ranking.
    pub fn analysis(&self) -> ImageAnalysis {
        ImageAnalysis {
            image_index: self.index,
            file_path: self.path.clone(),
            file_size_bytes: self.declared_file_size,
            color_depth: self.color_depth,
            color_count: self.color_count,
            brightness: self.brightness,
        }
    }
}

/// A file that could not be analyzed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileFailure {
    pub index: usize,
    pub path: PathBuf,
    pub kind: ErrorKind,
    pub message: String,
}

impl FileFailure {
    pub fn new(index: usize, path: &Path, error: &AnalysisError) -> Self {
        Self {
            index,
            path: path.to_path_buf(),
            kind: error.kind(),
            message: error.to_string(),
        }
    }
}

/// Progress events sent while a batch is being processed.
///
/// Events arrive in completion order, which is not necessarily batch order.
#[derive(Debug, Clone, PartialEq)]
pub enum ProcessEvent {
    ImageAnalyzed {
        index: usize,
        path: PathBuf,
        brightness: f64,
        warnings: usize,
    },
    ImageFailed {
        index: usize,
        path: PathBuf,
        kind: ErrorKind,
        message: String,
    },
}

/// Everything a batch produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchOutcome {
    /// Successful reports, in batch order.
    pub reports: Vec<ImageReport>,
    /// Failed files, in batch order.
    pub failures: Vec<FileFailure>,
    /// Successful files sorted by brightness.
    pub ranking: Ranking,
}

impl BatchOutcome {
    pub fn total(&self) -> usize {
        self.reports.len() + self.failures.len()
    }
}

/// Settings for analyzing a batch.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProcessOptions {
    pub size_mismatch: SizeMismatchPolicy,
    pub limits: Limits,
    /// Write pixel dumps here; `None` disables them.
    pub dump_dir: Option<PathBuf>,
}

impl ProcessOptions {
    pub fn from_config(config: &AnalyzerConfig) -> Self {
        Self {
            size_mismatch: config.analysis.size_mismatch,
            limits: config.limits.to_limits(),
            dump_dir: config.dump.enabled.then(|| config.dump.dir.clone()),
        }
    }
}

/// Header and grid decoded from one buffer.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedImage {
    pub header: BmpHeader,
    pub grid: PixelGrid,
}

/// Read the header and decode the pixel grid of an in-memory BMP.
pub fn decode(bytes: &[u8], limits: &Limits) -> Result<DecodedImage, DecodeError> {
    let header = bmp::read_header(bytes)?;
    let grid = bmp::decode_pixels(bytes, &header, limits)?;
    Ok(DecodedImage { header, grid })
}

/// Analyze one file. `index` is its 1-based batch position, used for the
/// report and the dump file name.
pub fn analyze_file(
    index: usize,
    path: &Path,
    options: &ProcessOptions,
) -> Result<ImageReport, AnalysisError> {
    let (image, actual_len) = {
        let bytes = std::fs::read(path).map_err(AnalysisError::FileUnavailable)?;
        (decode(&bytes, &options.limits)?, bytes.len() as u64)
    };
    let DecodedImage { header, grid } = image;
    log::debug!(
        "{}: {}x{} {} bpp",
        path.display(),
        grid.width(),
        grid.height(),
        header.color_depth
    );

    let size = metadata::file_size_report(&header, Some(actual_len));
    let mut warnings = Vec::new();
    if let Some(mismatch) = size.mismatch {
        match options.size_mismatch {
            SizeMismatchPolicy::Warn => {
                log::warn!(
                    "{}: header declares {} bytes, file has {}",
                    path.display(),
                    mismatch.declared,
                    mismatch.actual
                );
                warnings.push(Warning::from(mismatch));
            }
            SizeMismatchPolicy::Error => {
                return Err(AnalysisError::SizeMismatch {
                    declared: mismatch.declared,
                    actual: mismatch.actual,
                });
            }
        }
    }

    let brightness = compute_brightness(&grid)?;
    let color_count = metadata::color_count(&grid);

    let dump_path = match &options.dump_dir {
        Some(dir) => {
            let written =
                write_pixel_dump(&grid, dir, index, path).map_err(AnalysisError::Dump)?;
            log::debug!("{}: pixel dump at {}", path.display(), written.display());
            Some(written)
        }
        None => None,
    };

    Ok(ImageReport {
        index,
        path: path.to_path_buf(),
        valid: header.signature_valid,
        width: grid.width(),
        height: grid.height(),
        declared_file_size: size.declared_bytes,
        size_in_mb: size.size_in_mb,
        color_depth: metadata::color_depth(&header),
        color_count,
        brightness,
        warnings,
        dump_path,
    })
}

/// Analyze every path in parallel, then rank the successes.
///
/// `paths` order defines the 1-based image indices. When `events` is given,
/// one event per file is sent as soon as that file finishes.
pub fn analyze_batch(
    paths: &[PathBuf],
    options: &ProcessOptions,
    events: Option<Sender<ProcessEvent>>,
) -> BatchOutcome {
    let results: Vec<Result<ImageReport, FileFailure>> = paths
        .par_iter()
        .enumerate()
        .map(|(i, path)| {
            let index = i + 1;
            let result =
                analyze_file(index, path, options).map_err(|e| FileFailure::new(index, path, &e));
            if let Some(tx) = &events {
                // A dropped receiver only means nobody is listening.
                let _ = tx.send(event_for(&result));
            }
            result
        })
        .collect();

    let mut outcome = BatchOutcome::default();
    for result in results {
        match result {
            Ok(report) => outcome.reports.push(report),
            Err(failure) => {
                log::warn!(
                    "{}: {} ({})",
                    failure.path.display(),
                    failure.message,
                    failure.kind
                );
                outcome.failures.push(failure);
            }
        }
    }
    outcome.ranking = rank(outcome.reports.iter().map(ImageReport::analysis).collect());
    outcome
}

fn event_for(result: &Result<ImageReport, FileFailure>) -> ProcessEvent {
    match result {
        Ok(report) => ProcessEvent::ImageAnalyzed {
            index: report.index,
            path: report.path.clone(),
            brightness: report.brightness,
            warnings: report.warnings.len(),
        },
        Err(failure) => ProcessEvent::ImageFailed {
            index: failure.index,
            path: failure.path.clone(),
            kind: failure.kind,
            message: failure.message.clone(),
        },
    }
}
