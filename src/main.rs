use std::sync::Arc;

use anyhow::bail;
use clap::Parser;
use inquire::error::InquireResult;
use tracing_subscriber::EnvFilter;

mod catalog;
mod cli;
mod config;
mod enrich;
mod entry_id;
mod import;
mod query;
mod storage;
#[cfg(test)]
mod tests;

use catalog::CatalogStore;
use enrich::{classifier::HttpClassifier, Pipeline};
use entry_id::EntryId;
use storage::BackendLocal;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    let args = cli::Args::parse();

    let base_path = config::base_path();
    let config = config::Config::load_with(&base_path);

    let store = Arc::new(BackendLocal::new(&base_path)?);
    let catalog = Arc::new(CatalogStore::load(store)?);

    match args.command {
        cli::Command::Import { file } => {
            let html = std::fs::read_to_string(&file)?;
            let records = import::parse_export(&html, config.import_limit);
            let parsed = records.len();

            let fresh = import::dedup_candidates(&catalog.snapshot(), records);
            let added = catalog.append(fresh);

            println!(
                "{parsed} records parsed, {added} new entries added, {} duplicates skipped, catalog at {} entries",
                parsed - added,
                catalog.len()
            );
            Ok(())
        }

        cli::Command::Enrich => {
            let classifier = Arc::new(HttpClassifier::new(&config.classifier));
            let pipeline = Pipeline::new(catalog.clone(), classifier, config.batch_size);

            let summary = pipeline.run(|progress| {
                println!(
                    "batch {}/{} committed ({} enriched)",
                    progress.index, progress.total, progress.enriched
                );
            })?;

            println!(
                "{} batches processed, {} entries enriched, {} still unprocessed",
                summary.batches,
                summary.enriched,
                catalog.unprocessed().len()
            );
            Ok(())
        }

        cli::Command::Search {
            query,
            category,
            count,
        } => {
            let entries = catalog.snapshot();
            let facet = category.as_deref().unwrap_or(query::FACET_ALL);
            let results = query::filter(&entries, facet, query.as_deref().unwrap_or(""));

            if count {
                println!("{} entries found", results.len());
                return Ok(());
            }

            println!("{}", serde_json::to_string_pretty(&results).unwrap());
            Ok(())
        }

        cli::Command::Categories => {
            for facet in query::category_facets(&catalog.snapshot()) {
                println!("{facet}");
            }
            Ok(())
        }

        cli::Command::Delete { id, yes } => {
            if !yes {
                match inquire::prompt_confirmation(format!("Delete entry {id}?")) {
                    InquireResult::Ok(true) => {}
                    InquireResult::Ok(false) => return Ok(()),
                    InquireResult::Err(err) => bail!("An error occurred: {}", err),
                }
            }

            if catalog.delete(&EntryId::from(id.as_str())) {
                println!("entry {id} deleted");
            } else {
                println!("entry {id} not found");
            }
            Ok(())
        }

        cli::Command::Stats => {
            let entries = catalog.snapshot();
            let processed = entries.iter().filter(|e| e.processed).count();

            println!(
                "{} entries, {} processed, {} unprocessed",
                entries.len(),
                processed,
                entries.len() - processed
            );

            for facet in query::category_facets(&entries) {
                if facet == query::FACET_ALL {
                    continue;
                }
                let matched = query::filter(&entries, &facet, "").len();
                println!("  {facet}: {matched}");
            }
            Ok(())
        }
    }
}
