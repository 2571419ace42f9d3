//! Subscription registry
//!
//! Persists target records as a pretty-printed JSON array. Every write
//! replaces the whole file (temp file + rename); there is no locking, so the
//! last writer wins. Writes that follow a verification reread the file first
//! to keep manual edits made mid-run, which narrows but does not close the
//! lost-update window.

use std::fs;
use std::path::{Path, PathBuf};

use crate::core::{FormError, FormSchema, Result, TargetRecord};

/// Which records a read returns
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RecordFilter {
    #[default]
    All,
    Verified,
    Unverified,
}

impl RecordFilter {
    fn matches(self, record: &TargetRecord) -> bool {
        match self {
            RecordFilter::All => true,
            RecordFilter::Verified => record.verified,
            RecordFilter::Unverified => !record.verified,
        }
    }
}

/// JSON-file backed collection of target records
#[derive(Debug, Clone)]
pub struct SubscriptionRegistry {
    path: PathBuf,
}

impl SubscriptionRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every record. A missing file is an empty registry.
    pub fn list(&self) -> Result<Vec<TargetRecord>> {
        if !self.path.exists() {
            return Ok(Vec::new());
        }

        let content = fs::read_to_string(&self.path).map_err(|e| {
            FormError::persistence(format!("Failed to read {}: {}", self.path.display(), e))
        })?;

        let records: Vec<TargetRecord> = serde_json::from_str(&content).map_err(|e| {
            FormError::persistence(format!("Failed to parse {}: {}", self.path.display(), e))
        })?;

        for record in &records {
            if let Some(schema) = &record.input_fields {
                schema
                    .validate()
                    .map_err(|e| FormError::persistence(format!("{}: {}", record.url, e)))?;
            }
        }

        Ok(records)
    }

    /// Read records matching a filter
    pub fn load(&self, filter: RecordFilter) -> Result<Vec<TargetRecord>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| filter.matches(r))
            .collect())
    }

    /// Read records matching a filter, paired with their position in the file
    pub fn load_indexed(&self, filter: RecordFilter) -> Result<Vec<(usize, TargetRecord)>> {
        Ok(self
            .list()?
            .into_iter()
            .enumerate()
            .filter(|(_, r)| filter.matches(r))
            .collect())
    }

    /// Replace the whole persisted collection
    pub fn save(&self, records: &[TargetRecord]) -> Result<()> {
        let content = serde_json::to_string_pretty(records)?;

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            if !dir.exists() {
                fs::create_dir_all(dir).map_err(|e| {
                    FormError::persistence(format!("Failed to create {}: {}", dir.display(), e))
                })?;
            }
        }

        let tmp = self.temp_path();
        fs::write(&tmp, content).map_err(|e| {
            FormError::persistence(format!("Failed to write {}: {}", tmp.display(), e))
        })?;
        fs::rename(&tmp, &self.path).map_err(|e| {
            FormError::persistence(format!("Failed to replace {}: {}", self.path.display(), e))
        })?;

        tracing::debug!(path = %self.path.display(), records = records.len(), "registry saved");
        Ok(())
    }

    /// Append a new unverified record
    pub fn add(&self, url: &str, schema: Option<FormSchema>) -> Result<TargetRecord> {
        let url = url.trim();
        url::Url::parse(url).map_err(|e| FormError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;
        if let Some(schema) = &schema {
            schema.validate()?;
        }

        let record = TargetRecord::new(url, schema);
        let mut records = self.list()?;
        records.push(record.clone());
        self.save(&records)?;

        tracing::info!(%url, "target added as unverified");
        Ok(record)
    }

    /// Flip the verified flag of the record at a 1-based position.
    ///
    /// Returns the updated record.
    pub fn toggle(&self, position: usize) -> Result<TargetRecord> {
        let mut records = self.list()?;
        let count = records.len();

        let record = position
            .checked_sub(1)
            .and_then(|i| records.get_mut(i))
            .ok_or_else(|| {
                FormError::InvalidSelection(format!(
                    "position {} is outside 1..={}",
                    position, count
                ))
            })?;
        record.verified = !record.verified;
        let updated = record.clone();

        self.save(&records)?;
        tracing::info!(url = %updated.url, verified = updated.verified, "verification toggled");
        Ok(updated)
    }

    /// Mark a record verified against the latest on-disk state.
    ///
    /// `index` is the record's position when it was read. If the file changed
    /// since then and that slot holds a different url, the first unverified
    /// record with the same url is marked instead. Returns `false` when no
    /// such record remains.
    pub fn mark_verified(&self, index: usize, url: &str) -> Result<bool> {
        let mut records = self.list()?;

        let slot = match records.get(index) {
            Some(r) if r.url == url => Some(index),
            _ => records.iter().position(|r| r.url == url && !r.verified),
        };

        let Some(slot) = slot else {
            tracing::warn!(%url, "record vanished from registry before it could be marked verified");
            return Ok(false);
        };

        records[slot].verified = true;
        self.save(&records)?;
        tracing::info!(%url, "registry updated: target verified");
        Ok(true)
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self
            .path
            .file_name()
            .map(|n| n.to_os_string())
            .unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }
}
