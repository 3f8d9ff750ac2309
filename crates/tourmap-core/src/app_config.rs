#[derive(Clone)]
pub struct AppConfig {
    /// Upstream service credential. Redacted from `Debug` output.
    pub service_key: String,
    pub base_url: String,
    /// Application-name tag sent on every upstream call.
    pub app_name: String,
    /// Operating-system tag sent on every upstream call.
    pub os_tag: String,
    pub log_level: String,
    pub request_timeout_secs: u64,
    /// Rows per page for list and search queries.
    pub page_size: u32,
    /// Bound on parallel sub-requests in statistics fan-out.
    pub stats_concurrency: usize,
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("service_key", &"[redacted]")
            .field("base_url", &self.base_url)
            .field("app_name", &self.app_name)
            .field("os_tag", &self.os_tag)
            .field("log_level", &self.log_level)
            .field("request_timeout_secs", &self.request_timeout_secs)
            .field("page_size", &self.page_size)
            .field("stats_concurrency", &self.stats_concurrency)
            .finish()
    }
}
