use crate::services::harvester::HarvestMode;

/// Application configuration
#[derive(Clone, Debug)]
pub struct Config {
    /// Run Chromium without a visible window
    pub headless: bool,
    /// Tender site entry point
    pub base_url: String,
    /// District filter (Hebrew label, validated against the closed list)
    pub district: String,
    /// Committee date filter, DD/MM/YYYY
    pub committee_date: String,
    /// Harvest mode: "single" or "multi"
    pub harvest_mode: HarvestMode,
    /// Tender number searched for in single-target mode
    pub target_tender: String,
    /// Full-run attempts before giving up
    pub max_attempts: usize,
    /// Scroll passes over the result list
    pub scroll_attempts: usize,
    /// Candidates processed per run in multi-target mode
    pub max_candidates: usize,
    /// Detail-text window read after each tender number, in characters
    pub detail_window_chars: usize,
    /// Optional CSV output path; no export when unset
    pub export_path: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            headless: false,
            base_url: "https://apps.land.gov.il/MichrazimSite/#/homePage".to_string(),
            district: "ירושלים".to_string(),
            committee_date: "01/07/2025".to_string(),
            harvest_mode: HarvestMode::Multi,
            target_tender: "474/2024".to_string(),
            max_attempts: 2,
            scroll_attempts: 5,
            max_candidates: 5,
            detail_window_chars: 3000,
            export_path: None,
        }
    }
}

impl Config {
    pub fn from_env() -> Self {
        let default = Self::default();
        Self {
            headless: std::env::var("HEADLESS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.headless),
            base_url: std::env::var("BASE_URL").unwrap_or(default.base_url),
            district: std::env::var("DISTRICT").unwrap_or(default.district),
            committee_date: std::env::var("COMMITTEE_DATE").unwrap_or(default.committee_date),
            harvest_mode: std::env::var("HARVEST_MODE").ok().and_then(|v| v.parse().ok()).unwrap_or(default.harvest_mode),
            target_tender: std::env::var("TARGET_TENDER").unwrap_or(default.target_tender),
            max_attempts: std::env::var("MAX_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_attempts),
            scroll_attempts: std::env::var("SCROLL_ATTEMPTS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.scroll_attempts),
            max_candidates: std::env::var("MAX_CANDIDATES").ok().and_then(|v| v.parse().ok()).unwrap_or(default.max_candidates),
            detail_window_chars: std::env::var("DETAIL_WINDOW_CHARS").ok().and_then(|v| v.parse().ok()).unwrap_or(default.detail_window_chars),
            export_path: std::env::var("CSV_EXPORT_PATH").ok(),
        }
    }
}
