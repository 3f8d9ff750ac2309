//! Parallel statistics fan-out.
//!
//! Aggregate counts are gathered with one minimal page request per category
//! or area, issued concurrently. The join tolerates partial failure: a
//! failed sub-request logs a warning and contributes nothing, rather than
//! aborting the whole aggregate.

use futures::stream::{self, StreamExt};
use tourmap_core::{ContentType, SortOrder};

use crate::client::{PageQuery, TourClient};
use crate::error::ClientError;
use crate::types::{Page, RawTourItem};

/// One-row probe: only `totalCount` from the metadata is of interest.
const PROBE_PAGE: PageQuery = PageQuery {
    page_no: 1,
    num_of_rows: 1,
};

impl TourClient {
    /// Total item counts per content category, optionally scoped to an area.
    ///
    /// Returned pairs are sorted by category code; categories whose
    /// sub-request failed are absent.
    pub async fn category_counts(&self, area_code: Option<&str>) -> Vec<(ContentType, u64)> {
        let results: Vec<(ContentType, Result<Page<RawTourItem>, ClientError>)> =
            stream::iter(ContentType::ALL)
                .map(|category| async move {
                    let result = self
                        .area_based_list(PROBE_PAGE, area_code, Some(category), SortOrder::Recent)
                        .await;
                    (category, result)
                })
                .buffer_unordered(self.stats_concurrency().max(1))
                .collect()
                .await;

        let mut counts = Vec::new();
        for (category, result) in results {
            match result {
                Ok(page) => counts.push((category, page.total_count)),
                Err(err) => tracing::warn!(
                    category = category.label(),
                    error = %err,
                    "category count sub-request failed; skipping"
                ),
            }
        }
        counts.sort_by_key(|(category, _)| category.code());
        counts
    }

    /// Total item counts per area code.
    ///
    /// Same partial-failure behavior as [`TourClient::category_counts`];
    /// results are sorted by area code.
    pub async fn area_counts(&self, area_codes: &[String]) -> Vec<(String, u64)> {
        let results: Vec<(&String, Result<Page<RawTourItem>, ClientError>)> =
            stream::iter(area_codes)
                .map(|area| async move {
                    let result = self
                        .area_based_list(PROBE_PAGE, Some(area), None, SortOrder::Recent)
                        .await;
                    (area, result)
                })
                .buffer_unordered(self.stats_concurrency().max(1))
                .collect()
                .await;

        let mut counts = Vec::new();
        for (area, result) in results {
            match result {
                Ok(page) => counts.push((area.clone(), page.total_count)),
                Err(err) => tracing::warn!(
                    area = %area,
                    error = %err,
                    "area count sub-request failed; skipping"
                ),
            }
        }
        counts.sort();
        counts
    }
}
