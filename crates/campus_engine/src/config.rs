use std::time::Duration;

/// Portal endpoints and session limits for the crawl worker.
#[derive(Debug, Clone)]
pub struct PortalConfig {
    /// Portal root, without a trailing slash.
    pub base_url: String,
    /// Login form path, relative to `base_url`.
    pub login_path: String,
    pub connect_timeout: Duration,
    pub request_timeout: Duration,
    pub max_bytes: u64,
    /// Days from today within which a deadline counts as upcoming.
    pub look_ahead_days: u32,
}

impl Default for PortalConfig {
    fn default() -> Self {
        Self {
            base_url: "https://ecampus.smu.ac.kr".to_string(),
            login_path: "/login.php".to_string(),
            connect_timeout: Duration::from_secs(10),
            request_timeout: Duration::from_secs(30),
            max_bytes: 5 * 1024 * 1024,
            look_ahead_days: 7,
        }
    }
}

impl PortalConfig {
    /// Joins a portal path (starting with `/`) onto the base URL.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url.trim_end_matches('/'), path)
    }

    pub fn login_url(&self) -> String {
        self.url(&self.login_path)
    }
}
