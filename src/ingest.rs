use sqlx::SqlitePool;
use thiserror::Error;
use tracing::{info, warn};

use crate::db;
use crate::extract::{self, SaleCandidate};
use crate::fetch::{self, FetchError};
use crate::price;
use crate::settings::Settings;

#[derive(Debug, Error)]
pub enum IngestError {
    #[error(transparent)]
    Fetch(#[from] FetchError),
    #[error("store operation failed: {0}")]
    Store(#[from] sqlx::Error),
}

/// Counters for one ingestion run.
#[derive(Debug, Default)]
pub struct RunStats {
    pub rows_seen: usize,
    pub incomplete: usize,
    pub bad_price: usize,
    pub inserted: usize,
    pub duplicates: usize,
}

/// One full pass: fetch the listing, extract rows, persist the complete
/// candidates. Row-level problems are absorbed into the stats; fetch and
/// store failures abort the run.
pub async fn run(pool: &SqlitePool, settings: &Settings) -> Result<RunStats, IngestError> {
    let html = fetch::fetch_listing(settings).await?;

    let mut stats = RunStats::default();
    let candidates = collect_candidates(&html, &mut stats);
    info!(
        "Extracted {} complete rows ({} dropped)",
        candidates.len(),
        stats.incomplete
    );

    persist(pool, &candidates, &mut stats).await?;
    info!(
        "Run complete: {} inserted, {} duplicates, {} bad prices",
        stats.inserted, stats.duplicates, stats.bad_price
    );
    Ok(stats)
}

fn collect_candidates(html: &str, stats: &mut RunStats) -> Vec<SaleCandidate> {
    let mut candidates = Vec::new();
    for row in extract::extract_rows(html) {
        stats.rows_seen += 1;
        match row.into_candidate() {
            Ok(candidate) => candidates.push(candidate),
            Err(reason) => {
                warn!("Dropping listing row: {}", reason);
                stats.incomplete += 1;
            }
        }
    }
    candidates
}

/// Persist candidates over a single pooled connection, held for the whole
/// phase and released on every exit path when the guard drops. Identifiers
/// continue from the stored maximum, one per successfully normalized
/// candidate; natural-key conflicts are counted, not retried.
async fn persist(
    pool: &SqlitePool,
    candidates: &[SaleCandidate],
    stats: &mut RunStats,
) -> Result<(), IngestError> {
    let mut conn = pool.acquire().await?;
    let mut next_id = db::max_sale_id(&mut conn).await?;

    for candidate in candidates {
        let price = match price::normalize(&candidate.price_raw) {
            Ok(p) => p,
            Err(e) => {
                warn!("{}; dropping sale of {:?}", e, candidate.username);
                stats.bad_price += 1;
                continue;
            }
        };

        next_id += 1;
        let written = db::insert_sale(
            &mut conn,
            next_id,
            &candidate.username,
            price,
            candidate.sale_date,
        )
        .await?;
        if written {
            stats.inserted += 1;
        } else {
            stats.duplicates += 1;
        }
    }
    Ok(())
}
