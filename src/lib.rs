//! # bmp-rank
//!
//! Decodes BMP images, reports their structural metadata and perceived
//! brightness, and ranks a batch of images from darkest to brightest.
//!
//! # Architecture: Per-File Pipeline, Batch Barrier
//!
//! ```text
//! paths ─→ scan ─→ [ read → bmp header → bmp pixels → metadata / brightness / dump ]  (parallel, per file)
//!                                                   ─→ rank  (once, after every file finished)
//! ```
//!
//! Every file is decoded exactly once; the resulting [`bmp::PixelGrid`] feeds
//! color counting, brightness and the pixel dump. A file that fails at any
//! step is reported with a typed [`process::ErrorKind`] and dropped from the
//! ranking without affecting the rest of the batch.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`bmp`] | Header reader and scanline decoder for uncompressed 24/32-bit BMP |
//! | [`metadata`] | Color depth, distinct color count, declared file size and mismatch check |
//! | [`brightness`] | BT.601 luma averaged over the whole grid |
//! | [`rank`] | Ascending brightness ranking with deterministic tie-breaks |
//! | [`scan`] | Expands files and directories into the ordered batch |
//! | [`dump`] | Per-image text dumps of every pixel |
//! | [`process`] | Per-file pipeline, rayon fan-out, progress events, failure isolation |
//! | [`config`] | `bmp-rank.toml` loading, merging over stock defaults, validation |
//! | [`output`] | CLI output formatting |
//!
//! # Design Decisions
//!
//! ## Own Decoder
//!
//! Pixels are read straight from the scanlines rather than through an image
//! library. The decoder handles row padding, bottom-up and top-down row order
//! and BGR(A) channel order itself, and rejects anything it cannot decode
//! exactly (palettes, RLE, non-standard bit masks) with a specific error.
//! The `image` crate is used only in tests, as a reference decoder.
//!
//! ## Index-Based Identity
//!
//! An image is identified by its 1-based position in the submitted batch.
//! The index survives parallel processing unchanged, breaks brightness ties
//! in the ranking and names the pixel dump file, so two inputs called
//! `img.bmp` in different directories never collide.

pub mod bmp;
pub mod brightness;
pub mod config;
pub mod dump;
pub mod metadata;
pub mod output;
pub mod process;
pub mod rank;
pub mod scan;

#[cfg(test)]
pub(crate) mod test_helpers;
