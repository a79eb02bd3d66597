use std::env;

pub const DEFAULT_REPORT_BASE_URL: &str = "http://mis.ercot.com";
pub const DEFAULT_REAL_TIME_URL: &str =
    "http://www.ercot.com/content/cdr/html/real_time_system_conditions.html";

#[derive(Debug, Clone)]
pub struct Config {
    pub report_base_url: String,
    pub real_time_url: String,
    pub http_timeout_secs: u64,
    pub http_max_retries: usize,
}

impl Config {
    pub fn from_env() -> Self {
        Config {
            report_base_url: env::var("ERCOT_REPORT_BASE_URL")
                .unwrap_or_else(|_| DEFAULT_REPORT_BASE_URL.to_string()),
            real_time_url: env::var("ERCOT_REAL_TIME_URL")
                .unwrap_or_else(|_| DEFAULT_REAL_TIME_URL.to_string()),
            http_timeout_secs: env::var("HTTP_TIMEOUT_SECS")
                .unwrap_or_else(|_| "60".to_string())
                .parse()
                .unwrap_or(60),
            http_max_retries: env::var("HTTP_MAX_RETRIES")
                .unwrap_or_else(|_| "3".to_string())
                .parse()
                .unwrap_or(3),
        }
    }

    /// Point both endpoints at one host, e.g. a mock server in tests.
    pub fn with_base_url(base_url: &str) -> Self {
        let base_url = base_url.trim_end_matches('/');
        Config {
            report_base_url: base_url.to_string(),
            real_time_url: format!("{base_url}/content/cdr/html/real_time_system_conditions.html"),
            ..Config::default()
        }
    }

    pub fn report_index_url(&self) -> String {
        format!("{}/misapp/GetReports.do", self.report_base_url)
    }

    pub fn download_url(&self, download_path: &str) -> String {
        format!("{}{}", self.report_base_url, download_path)
    }
}

impl Default for Config {
    fn default() -> Self {
        Config {
            report_base_url: DEFAULT_REPORT_BASE_URL.to_string(),
            real_time_url: DEFAULT_REAL_TIME_URL.to_string(),
            http_timeout_secs: 60,
            http_max_retries: 3,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_base_url_trims_trailing_slash() {
        let config = Config::with_base_url("http://127.0.0.1:1234/");
        assert_eq!(config.report_base_url, "http://127.0.0.1:1234");
        assert_eq!(
            config.report_index_url(),
            "http://127.0.0.1:1234/misapp/GetReports.do"
        );
        assert_eq!(
            config.real_time_url,
            "http://127.0.0.1:1234/content/cdr/html/real_time_system_conditions.html"
        );
    }

    #[test]
    fn test_download_url_joins_relative_path() {
        let config = Config::default();
        assert_eq!(
            config.download_url("/misdownload/servlets/mirDownload?doclookupId=1"),
            "http://mis.ercot.com/misdownload/servlets/mirDownload?doclookupId=1"
        );
    }
}
