pub mod classifier;

use crate::catalog::{CatalogStore, Entry};
use classifier::{Classification, Classifier, ClassifyItem, ServiceError};
use std::{
    collections::HashMap,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
};

/// Partition entries into fixed-size batches, preserving input order. Every
/// entry lands in exactly one batch; empty input yields no batches.
pub fn batches(entries: &[Entry], size: usize) -> Vec<Vec<Entry>> {
    entries.chunks(size).map(|chunk| chunk.to_vec()).collect()
}

#[derive(thiserror::Error, Debug)]
pub enum PipelineError {
    #[error("an enrichment run is already in progress")]
    Busy,

    #[error(transparent)]
    Service(#[from] ServiceError),
}

#[derive(Debug, Clone, Default)]
pub struct RunSummary {
    pub batches: usize,
    pub enriched: usize,
    /// Batch items the service returned no classification for. They stay
    /// unprocessed and are picked up by the next run.
    pub unmatched: usize,
}

/// Fired after each batch commit so callers can observe partial progress.
#[derive(Debug, Clone)]
pub struct BatchProgress {
    pub index: usize,
    pub total: usize,
    pub enriched: usize,
}

/// Drives the classification service one batch at a time and makes each
/// batch's result durable before the next one starts. Strictly sequential:
/// at most one outstanding service call, at most one run at a time.
pub struct Pipeline {
    catalog: Arc<CatalogStore>,
    classifier: Arc<dyn Classifier>,
    batch_size: usize,
    busy: AtomicBool,
}

impl Pipeline {
    pub fn new(catalog: Arc<CatalogStore>, classifier: Arc<dyn Classifier>, batch_size: usize) -> Self {
        Pipeline {
            catalog,
            classifier,
            batch_size,
            busy: AtomicBool::new(false),
        }
    }

    /// Enrich all currently-unprocessed entries. On a service failure the run
    /// aborts: batches already committed stay committed, the rest are left
    /// for a future run to re-derive from `processed` state.
    pub fn run(&self, mut on_batch: impl FnMut(&BatchProgress)) -> Result<RunSummary, PipelineError> {
        if self
            .busy
            .compare_exchange(false, true, Ordering::SeqCst, Ordering::SeqCst)
            .is_err()
        {
            return Err(PipelineError::Busy);
        }

        let result = self.run_inner(&mut on_batch);
        self.busy.store(false, Ordering::SeqCst);
        result
    }

    fn run_inner(
        &self,
        on_batch: &mut dyn FnMut(&BatchProgress),
    ) -> Result<RunSummary, PipelineError> {
        let pending = self.catalog.unprocessed();
        if pending.is_empty() {
            log::debug!("nothing to enrich");
            return Ok(RunSummary::default());
        }

        let batches = batches(&pending, self.batch_size);
        let total = batches.len();
        let mut summary = RunSummary {
            batches: total,
            ..Default::default()
        };

        for (idx, batch) in batches.into_iter().enumerate() {
            let items = batch
                .iter()
                .map(|e| ClassifyItem {
                    title: e.title.clone(),
                    url: e.url.clone(),
                })
                .collect::<Vec<_>>();

            log::info!(
                "classifier={} batch {}/{total} ({} items)",
                self.classifier.name(),
                idx + 1,
                items.len()
            );
            let results = self.classifier.classify(&items)?;

            // correlate by url within this batch only
            let by_url: HashMap<&str, &Classification> =
                results.iter().map(|c| (c.url.as_str(), c)).collect();

            let mut updated = vec![];
            for entry in batch {
                match by_url.get(entry.url.as_str()) {
                    Some(classification) => updated.push(enriched(entry, classification)),
                    None => {
                        log::warn!("no classification for {}, leaving unprocessed", entry.url);
                        summary.unmatched += 1;
                    }
                }
            }

            // durable before the next batch starts
            let merged = self.catalog.commit(updated);
            summary.enriched += merged;

            on_batch(&BatchProgress {
                index: idx + 1,
                total,
                enriched: merged,
            });
        }

        Ok(summary)
    }
}

/// Enrichment is atomic per entry: identity fields are kept, the three
/// classification fields and the processed flag flip together.
fn enriched(entry: Entry, classification: &Classification) -> Entry {
    Entry {
        description: Some(classification.description.clone()),
        category: Some(classification.category),
        tags: Some(classification.tags.clone()),
        processed: true,
        ..entry
    }
}
