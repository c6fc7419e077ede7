//! Brightness ranking across a batch.
//!
//! The ranking is built once, after every file in the batch has either been
//! analyzed or failed, and is read-only afterwards. Files that failed are
//! never part of it.
//!
//! Order is ascending brightness (darkest first). Equal brightness keeps
//! submission order, so the output is deterministic regardless of how the
//! per-file work was scheduled.

use serde::Serialize;
use std::path::{Path, PathBuf};

/// Analysis of one successfully processed file.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageAnalysis {
    /// 1-based position in the submitted batch.
    pub image_index: usize,
    pub file_path: PathBuf,
    pub file_size_bytes: u32,
    pub color_depth: u16,
    pub color_count: usize,
    pub brightness: f64,
}

/// One row of the ranking summary.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RankedImage<'a> {
    pub image_index: usize,
    pub file_path: &'a Path,
    pub brightness: f64,
}

/// Analyses sorted ascending by brightness.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Ranking {
    entries: Vec<ImageAnalysis>,
}

/// Sort analyses by brightness, ties broken by `image_index`.
pub fn rank(mut entries: Vec<ImageAnalysis>) -> Ranking {
    entries.sort_by(|a, b| {
        a.brightness
            .total_cmp(&b.brightness)
            .then(a.image_index.cmp(&b.image_index))
    });
    Ranking { entries }
}

impl Ranking {
    pub fn entries(&self) -> &[ImageAnalysis] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ImageAnalysis> {
        self.entries.iter()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn darkest(&self) -> Option<&ImageAnalysis> {
        self.entries.first()
    }

    pub fn brightest(&self) -> Option<&ImageAnalysis> {
        self.entries.last()
    }

    /// Index, path and brightness for each entry, in ranking order.
    pub fn summary(&self) -> Vec<RankedImage<'_>> {
        self.entries
            .iter()
            .map(|e| RankedImage {
                image_index: e.image_index,
                file_path: &e.file_path,
                brightness: e.brightness,
            })
            .collect()
    }
}

impl<'a> IntoIterator for &'a Ranking {
    type Item = &'a ImageAnalysis;
    type IntoIter = std::slice::Iter<'a, ImageAnalysis>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}
