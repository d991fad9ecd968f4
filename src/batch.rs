//! Batch generation driver
//!
//! Walks every record in the collection, ensures a pronunciation asset
//! exists for its term, and writes the asset reference into the record's
//! audio field. Records are processed strictly one at a time, and every
//! failure is scoped to its record: the batch always runs to the end.

use crate::db::records::{self, Record};
use crate::db::Collection;
use crate::error::{Error, Result};
use crate::pipeline::{AssetAction, MediaPipeline};
use crate::term::Term;
use sqlx::SqlitePool;
use std::time::Instant;
use tracing::{error, info, warn};

/// Counters for one batch run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchSummary {
    pub records_seen: usize,
    pub generated: usize,
    pub reused: usize,
    pub skipped: usize,
    pub failed: usize,
}

/// Drives audio generation across a whole collection.
pub struct BatchRunner<'a> {
    pool: &'a SqlitePool,
    pipeline: &'a MediaPipeline,
    term_field: String,
}

impl<'a> BatchRunner<'a> {
    pub fn new(collection: &'a Collection, pipeline: &'a MediaPipeline, term_field: String) -> Self {
        Self {
            pool: collection.pool(),
            pipeline,
            term_field,
        }
    }

    /// Process every record once. Returns the run's counters; the only
    /// errors that propagate are those that prevent the batch from starting
    /// at all (listing the records).
    pub async fn run(&self, replace_existing: bool) -> Result<BatchSummary> {
        let started = Instant::now();
        let ids = records::record_ids(self.pool).await?;
        info!(
            records = ids.len(),
            replace_existing, "Starting audio generation batch"
        );

        let mut summary = BatchSummary::default();
        for record_id in ids {
            summary.records_seen += 1;
            match self.process_record(record_id, replace_existing).await {
                Ok(AssetAction::Generated) => summary.generated += 1,
                Ok(AssetAction::Reused) => summary.reused += 1,
                Err(e) if e.is_skip() => {
                    warn!(record_id, "Skipping record: {}", e);
                    summary.skipped += 1;
                }
                Err(e) => {
                    error!(record_id, "Record failed: {}", e);
                    summary.failed += 1;
                }
            }
        }

        info!(
            records = summary.records_seen,
            generated = summary.generated,
            reused = summary.reused,
            skipped = summary.skipped,
            failed = summary.failed,
            elapsed = ?started.elapsed(),
            "Batch complete"
        );
        Ok(summary)
    }

    /// One record, start to finish: discover the audio field, normalize the
    /// term, ensure the asset, write the reference back. The write-back is
    /// committed before this returns, so an interrupted run leaves every
    /// finished record consistent. On failure the record is left unmodified.
    async fn process_record(&self, record_id: i64, replace_existing: bool) -> Result<AssetAction> {
        let record = records::load_record(self.pool, record_id).await?;

        let audio_field = find_audio_field(&record)
            .ok_or(Error::MissingAudioField { record_id })?
            .to_string();

        // An absent term field is treated the same as an empty one.
        let raw_term = record.field(&self.term_field).unwrap_or("");
        let term = Term::normalize(raw_term)?;

        let outcome = self.pipeline.ensure_audio(&term, replace_existing).await?;

        // Reused assets get the reference written too, so records pointing
        // at stale or missing markup are repaired by a plain run.
        records::write_field(
            self.pool,
            record_id,
            &audio_field,
            &outcome.reference.field_value(),
        )
        .await?;

        Ok(outcome.action)
    }
}

/// Locate the field that receives the audio reference: the first field
/// whose name contains "audio" case-insensitively, else a field named
/// exactly "Audio".
fn find_audio_field(record: &Record) -> Option<&str> {
    record
        .fields
        .iter()
        .find(|f| f.name.to_lowercase().contains("audio"))
        .or_else(|| record.fields.iter().find(|f| f.name == "Audio"))
        .map(|f| f.name.as_str())
}
