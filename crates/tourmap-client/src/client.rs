//! HTTP client for the upstream tourism REST API.
//!
//! Wraps `reqwest` with service-parameter injection, retry with a fixed
//! back-off table, envelope unwrapping, and typed error classification.
//! Every endpoint checks the envelope `resultCode` and surfaces non-success
//! codes as [`ClientError::Api`] even when the HTTP status is 200.

use std::time::Duration;

use reqwest::{Client, Url};
use tourmap_core::{AppConfig, ContentType, SortOrder};

use crate::error::ClientError;
use crate::retry::{retry_with_backoff, BACKOFF_SCHEDULE};
use crate::types::{
    AccessibilityDetail, CommonDetail, Envelope, IntroDetail, Page, RawTourItem, TourImage,
};

/// The addressable unit of pagination.
#[derive(Debug, Clone, Copy)]
pub struct PageQuery {
    pub page_no: u32,
    pub num_of_rows: u32,
}

/// Client for the upstream tourism REST API.
///
/// Use [`TourClient::new`] for production or [`TourClient::with_base_url`]
/// to point at a mock server in tests.
pub struct TourClient {
    client: Client,
    base_url: Url,
    service_key: String,
    app_name: String,
    os_tag: String,
    backoff: Vec<Duration>,
    stats_concurrency: usize,
}

impl TourClient {
    /// Creates a client pointed at the configured production endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the underlying `reqwest::Client`
    /// cannot be constructed, or [`ClientError::InvalidBaseUrl`] if the
    /// configured base URL does not parse.
    pub fn new(config: &AppConfig) -> Result<Self, ClientError> {
        Self::with_base_url(config, &config.base_url)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Same as [`TourClient::new`].
    pub fn with_base_url(config: &AppConfig, base_url: &str) -> Result<Self, ClientError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(format!("{}/0.1 (tour-discovery)", config.app_name))
            .build()?;

        // Normalise: exactly one trailing slash so endpoint segments append
        // to the service root rather than replacing the last path segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| ClientError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            base_url,
            service_key: config.service_key.clone(),
            app_name: config.app_name.clone(),
            os_tag: config.os_tag.clone(),
            backoff: BACKOFF_SCHEDULE.to_vec(),
            stats_concurrency: config.stats_concurrency,
        })
    }

    /// Replaces the fixed back-off table (tests shrink the delays).
    #[must_use]
    pub fn with_backoff_schedule(mut self, schedule: Vec<Duration>) -> Self {
        self.backoff = schedule;
        self
    }

    pub(crate) fn stats_concurrency(&self) -> usize {
        self.stats_concurrency
    }

    /// Fetches one page of the area/category listing.
    ///
    /// `None` parameters are omitted from the request entirely. The
    /// `arrange` hint is sent upstream, but callers still re-sort each page
    /// client-side because the upstream ordering is not stable across pages.
    ///
    /// # Errors
    ///
    /// - [`ClientError::Api`] on a non-success envelope code.
    /// - [`ClientError::Transport`] on network failure or non-2xx status
    ///   after retry exhaustion.
    /// - [`ClientError::Deserialize`] when the response does not match the
    ///   envelope shape.
    pub async fn area_based_list(
        &self,
        page: PageQuery,
        area_code: Option<&str>,
        content_type: Option<ContentType>,
        sort: SortOrder,
    ) -> Result<Page<RawTourItem>, ClientError> {
        let mut params: Vec<(&str, &str)> =
            vec![("arrange", sort.arrange_code()), ("listYN", "Y")];
        if let Some(area) = area_code {
            params.push(("areaCode", area));
        }
        if let Some(ct) = content_type {
            params.push(("contentTypeId", ct.code()));
        }
        self.fetch_page("areaBasedList1", page, &params).await
    }

    /// Fetches one page of keyword search results.
    ///
    /// Callers must ensure `keyword` is non-blank; a blank keyword is a
    /// validation rejection handled before any request is made.
    ///
    /// # Errors
    ///
    /// Same classification as [`TourClient::area_based_list`].
    pub async fn search_keyword(
        &self,
        keyword: &str,
        page: PageQuery,
        area_code: Option<&str>,
        content_type: Option<ContentType>,
        sort: SortOrder,
    ) -> Result<Page<RawTourItem>, ClientError> {
        let mut params: Vec<(&str, &str)> = vec![
            ("keyword", keyword),
            ("arrange", sort.arrange_code()),
            ("listYN", "Y"),
        ];
        if let Some(area) = area_code {
            params.push(("areaCode", area));
        }
        if let Some(ct) = content_type {
            params.push(("contentTypeId", ct.code()));
        }
        self.fetch_page("searchKeyword1", page, &params).await
    }

    /// Common descriptive detail for a single item, or `None` when the id
    /// is unknown upstream.
    ///
    /// # Errors
    ///
    /// Same classification as [`TourClient::area_based_list`].
    pub async fn detail_common(&self, content_id: &str) -> Result<Option<CommonDetail>, ClientError> {
        let params = [
            ("contentId", content_id),
            ("defaultYN", "Y"),
            ("overviewYN", "Y"),
            ("addrinfoYN", "Y"),
        ];
        Ok(self
            .fetch_detail("detailCommon1", &params)
            .await?
            .into_iter()
            .next())
    }

    /// Operating information (hours, rest days, parking) for a single item.
    ///
    /// # Errors
    ///
    /// Same classification as [`TourClient::area_based_list`].
    pub async fn detail_intro(
        &self,
        content_id: &str,
        content_type: ContentType,
    ) -> Result<Option<IntroDetail>, ClientError> {
        let params = [
            ("contentId", content_id),
            ("contentTypeId", content_type.code()),
        ];
        Ok(self
            .fetch_detail("detailIntro1", &params)
            .await?
            .into_iter()
            .next())
    }

    /// All images registered for a single item.
    ///
    /// # Errors
    ///
    /// Same classification as [`TourClient::area_based_list`].
    pub async fn detail_images(&self, content_id: &str) -> Result<Vec<TourImage>, ClientError> {
        let params = [
            ("contentId", content_id),
            ("imageYN", "Y"),
            ("subImageYN", "Y"),
        ];
        self.fetch_detail("detailImage1", &params).await
    }

    /// Barrier-free accessibility information for a single item.
    ///
    /// # Errors
    ///
    /// Same classification as [`TourClient::area_based_list`].
    pub async fn detail_accessibility(
        &self,
        content_id: &str,
    ) -> Result<Option<AccessibilityDetail>, ClientError> {
        let params = [("contentId", content_id)];
        Ok(self
            .fetch_detail("detailWithTour1", &params)
            .await?
            .into_iter()
            .next())
    }

    async fn fetch_page(
        &self,
        endpoint: &str,
        page: PageQuery,
        extra: &[(&str, &str)],
    ) -> Result<Page<RawTourItem>, ClientError> {
        let page_no = page.page_no.to_string();
        let num_of_rows = page.num_of_rows.to_string();
        let mut params: Vec<(&str, &str)> =
            vec![("pageNo", &page_no), ("numOfRows", &num_of_rows)];
        params.extend_from_slice(extra);

        let url = self.build_url(endpoint, &params);
        let body = self.request_json(endpoint, &url).await?;
        Self::check_api_error(&body)?;

        let envelope: Envelope<RawTourItem> =
            serde_json::from_value(body).map_err(|e| ClientError::Deserialize {
                context: format!("{endpoint}(pageNo={})", page.page_no),
                source: e,
            })?;

        Ok(envelope.response.body.unwrap_or_default().into())
    }

    async fn fetch_detail<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: &str,
        extra: &[(&str, &str)],
    ) -> Result<Vec<T>, ClientError> {
        let url = self.build_url(endpoint, extra);
        let body = self.request_json(endpoint, &url).await?;
        Self::check_api_error(&body)?;

        let envelope: Envelope<T> =
            serde_json::from_value(body).map_err(|e| ClientError::Deserialize {
                context: endpoint.to_owned(),
                source: e,
            })?;

        Ok(envelope.response.body.unwrap_or_default().items)
    }

    /// Builds the full request URL: the fixed service-identification
    /// parameters plus `extra`, all percent-encoded via
    /// [`Url::query_pairs_mut`]. Callers omit absent parameters rather than
    /// sending placeholder values.
    fn build_url(&self, endpoint: &str, extra: &[(&str, &str)]) -> Url {
        let mut url = self.base_url.clone();
        if let Ok(mut segments) = url.path_segments_mut() {
            segments.pop_if_empty().push(endpoint);
        }
        {
            let mut pairs = url.query_pairs_mut();
            pairs.append_pair("serviceKey", &self.service_key);
            pairs.append_pair("MobileOS", &self.os_tag);
            pairs.append_pair("MobileApp", &self.app_name);
            pairs.append_pair("_type", "json");
            for (k, v) in extra {
                pairs.append_pair(k, v);
            }
        }
        url
    }

    /// Sends a GET request through the retry loop, asserts a 2xx status, and
    /// parses the body as JSON. 5xx and network-level failures are retried
    /// per the back-off table; 4xx fails immediately.
    async fn request_json(
        &self,
        context: &str,
        url: &Url,
    ) -> Result<serde_json::Value, ClientError> {
        retry_with_backoff(&self.backoff, || {
            let url = url.clone();
            async move {
                let response = self.client.get(url).send().await?;
                let response = response.error_for_status()?;
                let body = response.text().await?;
                serde_json::from_str(&body).map_err(|e| ClientError::Deserialize {
                    context: context.to_owned(),
                    source: e,
                })
            }
        })
        .await
    }

    /// Checks the envelope `resultCode` and raises [`ClientError::Api`] for
    /// anything other than the success sentinel.
    fn check_api_error(body: &serde_json::Value) -> Result<(), ClientError> {
        let header = body.pointer("/response/header");
        let code = header
            .and_then(|h| h.get("resultCode"))
            .and_then(serde_json::Value::as_str)
            .unwrap_or_default();
        if code != "0000" {
            let message = header
                .and_then(|h| h.get("resultMsg"))
                .and_then(serde_json::Value::as_str)
                .unwrap_or("unknown error")
                .to_owned();
            return Err(ClientError::Api {
                code: code.to_owned(),
                message,
            });
        }
        Ok(())
    }
}
