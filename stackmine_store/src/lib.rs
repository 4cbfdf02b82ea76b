#![deny(
    clippy::all,
    clippy::nursery,
    clippy::pedantic,
    clippy::style,
    clippy::complexity,
    clippy::perf,
    clippy::correctness,
    clippy::suspicious,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(
    clippy::similar_names,
    clippy::missing_safety_doc,
    clippy::missing_panics_doc,
    clippy::missing_errors_doc
)]

//! On-disk artifacts of a mining run.

mod csv;

use anyhow::{Context, Result};
use serde::Serialize;
use serde::de::DeserializeOwned;
use stackmine_core::BundleDescription;
use std::path::{Path, PathBuf};
use tracing::debug;

pub use csv::{write_bundles_csv, write_csv_row};

pub const RAW_POSTS: &str = "raw_posts.json";
pub const EXTRACTED_ITEMS: &str = "extracted_items.json";
pub const BUNDLES_RAW: &str = "bundles_raw.json";
pub const BUNDLES: &str = "bundles.json";
pub const BUNDLES_CSV: &str = "bundles.csv";

/// Pretty-print `value` as JSON into `path`.
pub fn save_json<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<()> {
    let content = serde_json::to_string_pretty(value)?;
    std::fs::write(path, content)
        .with_context(|| format!("Failed to write {}", path.display()))?;
    debug!("Wrote {}", path.display());
    Ok(())
}

pub fn load_json<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&content).with_context(|| format!("Invalid JSON in {}", path.display()))
}

/// The directory a run writes its artifacts to.
#[derive(Debug, Clone)]
pub struct OutputDir {
    root: PathBuf,
}

impl OutputDir {
    /// Open `root`, creating it if needed.
    pub fn new(root: impl Into<PathBuf>) -> Result<Self> {
        let root = root.into();
        std::fs::create_dir_all(&root)
            .with_context(|| format!("Failed to create output directory {}", root.display()))?;
        Ok(Self { root })
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn path(&self, file: &str) -> PathBuf {
        self.root.join(file)
    }

    pub fn save<T: Serialize + ?Sized>(&self, file: &str, value: &T) -> Result<PathBuf> {
        let path = self.path(file);
        save_json(&path, value)?;
        Ok(path)
    }

    /// Write `bundles.json` and `bundles.csv`.
    pub fn save_descriptions(&self, descriptions: &[BundleDescription]) -> Result<()> {
        self.save(BUNDLES, descriptions)?;
        let path = self.path(BUNDLES_CSV);
        let file = std::fs::File::create(&path)
            .with_context(|| format!("Failed to create {}", path.display()))?;
        let mut writer = std::io::BufWriter::new(file);
        write_bundles_csv(&mut writer, descriptions)?;
        std::io::Write::flush(&mut writer)?;
        debug!("Wrote {}", path.display());
        Ok(())
    }
}
