use std::fmt;
use std::path::{Component, Path};

use crate::error::{AppError, Context, Result};

pub mod local;

pub use local::LocalDatasetStore;

/// Identifies one file inside a published `owner/slug` dataset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatasetRef {
    pub owner: String,
    pub slug: String,
    pub file: String,
}

impl DatasetRef {
    pub fn parse(handle: &str, file: &str) -> Result<Self> {
        let mut parts = handle.trim().split('/');
        let (Some(owner), Some(slug), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(AppError::message(format!(
                "dataset handle must look like `owner/slug`, found `{handle}`"
            )));
        };

        if !is_plain_segment(owner) || !is_plain_segment(slug) {
            return Err(AppError::message(format!(
                "dataset handle must look like `owner/slug`, found `{handle}`"
            )));
        }

        let file = file.trim();
        if !is_plain_segment(file) {
            return Err(AppError::message(format!(
                "invalid dataset file name `{file}`"
            )));
        }

        Ok(Self {
            owner: owner.to_string(),
            slug: slug.to_string(),
            file: file.to_string(),
        })
    }
}

/// A single relative path component, so joining it under a root cannot escape it.
fn is_plain_segment(segment: &str) -> bool {
    let mut components = Path::new(segment).components();
    matches!(
        (components.next(), components.next()),
        (Some(Component::Normal(_)), None)
    )
}

impl fmt::Display for DatasetRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}:{}", self.owner, self.slug, self.file)
    }
}

/// Header row plus string cells. The shape is whatever the dataset publishes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl Table {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn head(&self, n: usize) -> &[Vec<String>] {
        &self.rows[..n.min(self.rows.len())]
    }

    pub fn write_csv(&self, path: &Path) -> Result<()> {
        let mut writer = csv::Writer::from_path(path)
            .with_context(|| format!("Failed to create CSV writer for {}", path.display()))?;

        writer.write_record(&self.headers)?;
        for row in &self.rows {
            writer.write_record(row)?;
        }

        writer.flush()?;
        Ok(())
    }
}

/// Supplies tabular datasets by reference.
pub trait DatasetProvider {
    fn load(&self, dataset: &DatasetRef, row_limit: Option<usize>) -> Result<Table>;
}
