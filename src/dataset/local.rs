use std::path::PathBuf;

use log::{debug, info};

use crate::error::{AppError, Context, Result};

use super::{DatasetProvider, DatasetRef, Table};

/// Reads datasets mirrored on disk as `{root}/{owner}/{slug}/{file}`.
pub struct LocalDatasetStore {
    root: PathBuf,
}

impl LocalDatasetStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn path_for(&self, dataset: &DatasetRef) -> PathBuf {
        self.root
            .join(&dataset.owner)
            .join(&dataset.slug)
            .join(&dataset.file)
    }
}

impl DatasetProvider for LocalDatasetStore {
    fn load(&self, dataset: &DatasetRef, row_limit: Option<usize>) -> Result<Table> {
        let path = self.path_for(dataset);
        if !path.exists() {
            return Err(AppError::message(format!(
                "dataset file not found: {}",
                path.display()
            )));
        }

        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .from_path(&path)
            .with_context(|| format!("Failed to open dataset {}", path.display()))?;

        let headers = reader
            .headers()
            .with_context(|| format!("Failed to read header row of {}", path.display()))?
            .iter()
            .map(|field| field.trim().to_string())
            .collect();

        let mut rows = Vec::new();
        for result in reader.records() {
            if row_limit.is_some_and(|limit| rows.len() >= limit) {
                debug!("row limit reached for {}", dataset);
                break;
            }
            let record = result.context("Failed to read dataset record")?;
            rows.push(record.iter().map(str::to_string).collect());
        }

        info!("loaded {} rows from {}", rows.len(), path.display());
        Ok(Table { headers, rows })
    }
}
