//! CLI output formatting for batch analysis.
//!
//! # Entity Display Contract
//!
//! Every image is shown with a header line (its 3-digit batch index and file
//! name) followed by indented context lines. Reports and failures share the
//! same header, so the output reads as one inventory in submission order.
//!
//! # Output Format
//!
//! ## Progress
//!
//! Printed as files finish, in completion order:
//!
//! ```text
//! 002 dark.bmp: brightness 10.00
//! 003 broken.bmp: failed (InvalidSignature)
//! 001 mid.bmp: brightness 50.00 (1 warning)
//! ```
//!
//! ## Report
//!
//! ```text
//! 001 mid.bmp
//!     Source: photos/mid.bmp
//!     Valid file
//!     Resolution: 4x3
//!     Image width: 4
//!     Image height: 3
//!     File size: 90 bytes
//!     Size (mb): 0.000086 MB
//!     Color Depth: 24 bits per pixel
//!     Color count: 1
//!     Pixel dump: pixel-dumps/001-mid.pixels.txt
//!     Brightness: 50.00
//! 003 broken.bmp
//!     Source: photos/broken.bmp
//!     Error (InvalidSignature): missing BM signature
//!
//! Sorted Brightness Values:
//! Image #2 - File: photos/dark.bmp, Brightness: 10.00
//! Image #1 - File: photos/mid.bmp, Brightness: 50.00
//!
//! Darkest: Image #2 (dark.bmp)
//! Brightest: Image #1 (mid.bmp)
//!
//! Analyzed 2 of 3 files (1 failed)
//! ```
//!
//! # Architecture
//!
//! Each view has a `format_*` function (returns `Vec<String>`) for testability
//! and a `print_*` wrapper that writes to stdout. Format functions are pure.

use crate::process::{BatchOutcome, FileFailure, ImageReport, ProcessEvent};
use crate::rank::Ranking;
use std::path::Path;

// ============================================================================
// Shared helpers
// ============================================================================

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

/// Return indentation string: 4 spaces per depth level.
fn indent(depth: usize) -> String {
    "    ".repeat(depth)
}

/// File name for display, falling back to the whole path.
fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|f| f.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn entity_header(index: usize, path: &Path) -> String {
    format!("{} {}", format_index(index), display_name(path))
}

fn format_brightness(value: f64) -> String {
    format!("{:.2}", value)
}

fn plural(n: usize, word: &str) -> String {
    if n == 1 {
        format!("{} {}", n, word)
    } else {
        format!("{} {}s", n, word)
    }
}

// ============================================================================
// Progress
// ============================================================================

/// Format a single progress event as display lines.
pub fn format_process_event(event: &ProcessEvent) -> Vec<String> {
    match event {
        ProcessEvent::ImageAnalyzed {
            index,
            path,
            brightness,
            warnings,
        } => {
            let mut line = format!(
                "{}: brightness {}",
                entity_header(*index, path),
                format_brightness(*brightness)
            );
            if *warnings > 0 {
                line.push_str(&format!(" ({})", plural(*warnings, "warning")));
            }
            vec![line]
        }
        ProcessEvent::ImageFailed {
            index, path, kind, ..
        } => vec![format!("{}: failed ({})", entity_header(*index, path), kind)],
    }
}

// ============================================================================
// Per-file results
// ============================================================================

pub fn format_image_report(report: &ImageReport) -> Vec<String> {
    let ctx = indent(1);
    let mut lines = vec![
        entity_header(report.index, &report.path),
        format!("{}Source: {}", ctx, report.path.display()),
    ];
    if report.valid {
        lines.push(format!("{}Valid file", ctx));
    }
    lines.push(format!("{}Resolution: {}x{}", ctx, report.width, report.height));
    lines.push(format!("{}Image width: {}", ctx, report.width));
    lines.push(format!("{}Image height: {}", ctx, report.height));
    lines.push(format!("{}File size: {} bytes", ctx, report.declared_file_size));
    lines.push(format!("{}Size (mb): {:.6} MB", ctx, report.size_in_mb));
    lines.push(format!(
        "{}Color Depth: {} bits per pixel",
        ctx, report.color_depth
    ));
    lines.push(format!("{}Color count: {}", ctx, report.color_count));
    if let Some(dump) = &report.dump_path {
        lines.push(format!("{}Pixel dump: {}", ctx, dump.display()));
    }
    lines.push(format!(
        "{}Brightness: {}",
        ctx,
        format_brightness(report.brightness)
    ));
    for warning in &report.warnings {
        lines.push(format!("{}Warning: {}", ctx, warning));
    }
    lines
}

pub fn format_failure(failure: &FileFailure) -> Vec<String> {
    vec![
        entity_header(failure.index, &failure.path),
        format!("{}Source: {}", indent(1), failure.path.display()),
        format!("{}Error ({}): {}", indent(1), failure.kind, failure.message),
    ]
}

// ============================================================================
// Ranking
// ============================================================================

pub fn format_ranking(ranking: &Ranking) -> Vec<String> {
    if ranking.is_empty() {
        return vec!["No images to rank".to_string()];
    }
    let mut lines = vec!["Sorted Brightness Values:".to_string()];
    for row in ranking.summary() {
        lines.push(format!(
            "Image #{} - File: {}, Brightness: {}",
            row.image_index,
            row.file_path.display(),
            format_brightness(row.brightness)
        ));
    }
    lines
}

// ============================================================================
// Whole batch
// ============================================================================

/// Reports and failures merged in batch order, then the ranking and a
/// one-line summary.
pub fn format_batch_outcome(outcome: &BatchOutcome) -> Vec<String> {
    let mut entries: Vec<(usize, Vec<String>)> = outcome
        .reports
        .iter()
        .map(|r| (r.index, format_image_report(r)))
        .chain(
            outcome
                .failures
                .iter()
                .map(|f| (f.index, format_failure(f))),
        )
        .collect();
    entries.sort_by_key(|(index, _)| *index);
    let mut lines: Vec<String> = entries.into_iter().flat_map(|(_, l)| l).collect();

    if outcome.total() > 0 {
        lines.push(String::new());
    }
    lines.extend(format_ranking(&outcome.ranking));
    lines.extend(format_extremes(&outcome.ranking));
    lines.push(String::new());
    lines.push(format_batch_summary(outcome));
    lines
}

/// Darkest and brightest image, when there are at least two to compare.
fn format_extremes(ranking: &Ranking) -> Vec<String> {
    match (ranking.darkest(), ranking.brightest()) {
        (Some(dark), Some(bright)) if ranking.len() > 1 => vec![
            String::new(),
            format!(
                "Darkest: Image #{} ({})",
                dark.image_index,
                display_name(&dark.file_path)
            ),
            format!(
                "Brightest: Image #{} ({})",
                bright.image_index,
                display_name(&bright.file_path)
            ),
        ],
        _ => Vec::new(),
    }
}

pub fn format_batch_summary(outcome: &BatchOutcome) -> String {
    format!(
        "Analyzed {} of {} files ({} failed)",
        outcome.reports.len(),
        outcome.total(),
        outcome.failures.len()
    )
}

pub fn print_batch_outcome(outcome: &BatchOutcome) {
    for line in format_batch_outcome(outcome) {
        println!("{}", line);
    }
}

// ============================================================================
// Tests
// ============================================================================
