//! Result harvesting - business capability layer
//!
//! After the search fires, results load lazily as the page scrolls. The
//! harvester scrolls the list, finds tender numbers in the rendered text,
//! expands each detail view and hands the harvested text to the record
//! parser.

use std::collections::HashSet;
use std::str::FromStr;

use regex::Regex;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::Result;
use crate::infrastructure::delay::random_delay;
use crate::infrastructure::PageDriver;
use crate::model::TenderRecord;
use crate::services::record_parser::parse_records;

/// Fixed scroll step per pass, in pixels.
const SCROLL_STEP: i64 = 1_000;

/// Marker words that follow a tender number in the rendered result list.
/// The current layout renders "<number> מכרז"; an older one used "מתחם".
const CANDIDATE_MARKER: &str = "מכרז";
const CANDIDATE_MARKER_ALT: &str = "מתחם";

/// Results-list container, for the wait after navigating back from a detail
/// view.
const RESULTS_LIST: &str = "app-michraz, [class*='card']";

/// Which harvesting strategy runs after the search.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HarvestMode {
    /// Look for one configured tender number and parse the whole page text
    Single,
    /// Discover tender numbers in page text and process the first few
    Multi,
}

impl FromStr for HarvestMode {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(HarvestMode::Single),
            "multi" => Ok(HarvestMode::Multi),
            other => Err(format!("unknown harvest mode: {}", other)),
        }
    }
}

/// Find unique tender numbers (`digits/digits` followed by a marker word) in
/// page text, first-seen order, capped at `max`.
pub fn discover_candidates(text: &str, max: usize) -> Vec<String> {
    let mut candidates = scan_with_marker(text, CANDIDATE_MARKER, max);
    if candidates.is_empty() {
        debug!("no candidates with primary marker, retrying with alternate");
        candidates = scan_with_marker(text, CANDIDATE_MARKER_ALT, max);
    }
    candidates
}

fn scan_with_marker(text: &str, marker: &str, max: usize) -> Vec<String> {
    let Ok(re) = Regex::new(&format!(r"(\d+/\d+)\s*{}", regex::escape(marker))) else {
        return Vec::new();
    };

    let mut seen = HashSet::new();
    let mut candidates = Vec::new();
    for cap in re.captures_iter(text) {
        let id = cap[1].to_string();
        if seen.insert(id.clone()) {
            candidates.push(id);
            if candidates.len() >= max {
                break;
            }
        }
    }
    candidates
}

/// Detail text following the tender identifier, capped at `max_chars`
/// characters. The identifier itself stays outside the window so its digits
/// cannot be mistaken for a lot number in an unmarked scope.
fn detail_window(page_text: &str, tender_number: &str, max_chars: usize) -> Option<String> {
    let idx = page_text.find(tender_number)?;
    let after = idx + tender_number.len();
    Some(page_text[after..].chars().take(max_chars).collect())
}

/// Result harvester
pub struct Harvester {
    mode: HarvestMode,
    target_tender: String,
    scroll_attempts: usize,
    max_candidates: usize,
    detail_window_chars: usize,
}

impl Harvester {
    pub fn from_config(config: &Config) -> Self {
        Self {
            mode: config.harvest_mode,
            target_tender: config.target_tender.clone(),
            scroll_attempts: config.scroll_attempts,
            max_candidates: config.max_candidates,
            detail_window_chars: config.detail_window_chars,
        }
    }

    /// Run the configured harvesting strategy.
    ///
    /// An empty result is a valid outcome here; only the retry driver treats
    /// it as a failure signal.
    pub async fn harvest(&self, driver: &PageDriver) -> Result<Vec<TenderRecord>> {
        match self.mode {
            HarvestMode::Single => self.harvest_single(driver).await,
            HarvestMode::Multi => self.harvest_multi(driver).await,
        }
    }

    // ========== Single-target mode ==========

    async fn harvest_single(&self, driver: &PageDriver) -> Result<Vec<TenderRecord>> {
        info!("📜 scrolling for tender {}...", self.target_tender);

        for attempt in 1..=self.scroll_attempts {
            debug!("scroll attempt {}/{}", attempt, self.scroll_attempts);
            driver.scroll_by(SCROLL_STEP).await?;
            random_delay(800, 1500).await;

            if driver.body_text().await?.contains(&self.target_tender) {
                info!("✓ found '{}' in page text", self.target_tender);
                break;
            }
        }

        if !self.expand_card(driver, &self.target_tender).await? {
            info!("tender {} not found in the DOM", self.target_tender);
            return Ok(Vec::new());
        }

        // Detail expansion is slow; give it real time
        random_delay(4000, 6000).await;

        let page_text = driver.body_text().await?;
        if page_text.is_empty() {
            return Ok(Vec::new());
        }

        let records = parse_records(&page_text, &self.target_tender, HarvestMode::Single);
        if records.is_empty() {
            debug!(
                "parsed 0 lots, page snippet: {}",
                page_text.chars().take(2000).collect::<String>()
            );
        }

        Ok(records)
    }

    /// Locate the smallest element containing the tender number, walk up to
    /// its clickable card container, and click a nested title/link if one
    /// exists, else the card itself. Returns whether anything was clicked.
    async fn expand_card(&self, driver: &PageDriver, tender_number: &str) -> Result<bool> {
        let js_code = format!(
            r#"
            (() => {{
                const needle = {id};
                const el = Array.from(document.querySelectorAll('*')).find(e =>
                    e.children.length === 0 && e.innerText && e.innerText.includes(needle));
                if (!el) return false;

                let card = el;
                let parent = el.parentElement;
                while (parent && parent !== document.body) {{
                    if (parent.tagName.includes('APP-MICHRAZ') ||
                        (typeof parent.className === 'string' && parent.className.includes('card'))) {{
                        card = parent;
                        break;
                    }}
                    parent = parent.parentElement;
                }}

                const link = card.querySelector('.michraz-link, .title, a, h2');
                (link || card).click();
                return true;
            }})()
            "#,
            id = serde_json::to_string(tender_number)?,
        );
        driver.eval_as::<bool>(js_code).await
    }

    // ========== Multi-target mode ==========

    async fn harvest_multi(&self, driver: &PageDriver) -> Result<Vec<TenderRecord>> {
        info!("📜 scrolling {} passes to load the result list...", self.scroll_attempts);

        for attempt in 1..=self.scroll_attempts {
            debug!("scroll attempt {}/{}", attempt, self.scroll_attempts);
            driver.scroll_by(SCROLL_STEP).await?;
            random_delay(800, 1500).await;
        }

        let list_text = driver.body_text().await?;
        let candidates = discover_candidates(&list_text, self.max_candidates);
        if candidates.is_empty() {
            info!("no tender numbers discovered in the result list");
            return Ok(Vec::new());
        }
        info!("✓ discovered {} candidate tender(s): {:?}", candidates.len(), candidates);

        let mut records = Vec::new();
        for tender_number in &candidates {
            info!("📂 expanding tender {}...", tender_number);

            if !self.expand_candidate(driver, tender_number).await? {
                warn!("could not locate an element for {}, skipping", tender_number);
                continue;
            }
            random_delay(4000, 6000).await;

            let page_text = driver.body_text().await?;
            match detail_window(&page_text, tender_number, self.detail_window_chars) {
                Some(window) => {
                    let parsed = parse_records(&window, tender_number, HarvestMode::Multi);
                    info!("✓ tender {}: {} lot(s) parsed", tender_number, parsed.len());
                    records.extend(parsed);
                }
                None => warn!("{} missing from the expanded page text", tender_number),
            }

            driver.go_back().await?;
            // A timeout here is logged, not fatal; the next candidate still
            // gets its chance.
            if let Err(e) = driver.wait_for_visible(RESULTS_LIST, 10_000).await {
                warn!("result list did not reappear after back navigation: {}", e);
            }
            random_delay(500, 1000).await;
        }

        Ok(records)
    }

    /// Click the smallest text-bearing element whose text starts with the
    /// tender number. Returns whether anything was clicked.
    async fn expand_candidate(&self, driver: &PageDriver, tender_number: &str) -> Result<bool> {
        let js_code = format!(
            r#"
            (() => {{
                const needle = {id};
                const el = Array.from(document.querySelectorAll('*')).find(e =>
                    e.children.length === 0 && e.innerText &&
                    e.innerText.trim().startsWith(needle));
                if (!el) return false;
                el.click();
                return true;
            }})()
            "#,
            id = serde_json::to_string(tender_number)?,
        );
        driver.eval_as::<bool>(js_code).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn discovery_deduplicates_repeated_identifiers() {
        let text = "474/2024 מכרז ... 474/2024 מכרז ... 101/2025 מכרז";
        let candidates = discover_candidates(text, 5);
        assert_eq!(candidates, vec!["474/2024", "101/2025"]);
    }

    #[test]
    fn discovery_preserves_first_seen_order_and_cap() {
        let text = "1/2024 מכרז 2/2024 מכרז 3/2024 מכרז";
        let candidates = discover_candidates(text, 2);
        assert_eq!(candidates, vec!["1/2024", "2/2024"]);
    }

    #[test]
    fn discovery_falls_back_to_alternate_marker() {
        let text = "no primary here, but 88/2023 מתחם appears";
        let candidates = discover_candidates(text, 5);
        assert_eq!(candidates, vec!["88/2023"]);
    }

    #[test]
    fn discovery_ignores_numbers_without_marker() {
        let text = "תאריך 01/07/2025 בלבד";
        assert!(discover_candidates(text, 5).is_empty());
    }

    #[test]
    fn detail_window_starts_after_the_identifier() {
        let text = "list header 474/2024 מכרז details follow here";
        let window = detail_window(text, "474/2024", 3000).unwrap();
        assert!(!window.contains("474/2024"));
        assert!(window.contains("details follow here"));
    }

    #[test]
    fn detail_window_caps_length_and_misses_cleanly() {
        let text = "474/2024 0123456789";
        assert_eq!(detail_window(text, "474/2024", 5).unwrap(), " 0123");
        assert!(detail_window(text, "999/2024", 5).is_none());
    }

    #[test]
    fn unmarked_window_keeps_identifier_digits_out_of_the_lot_number() {
        // A tender with no per-lot section and no award data yet: the global
        // lot must stay empty instead of swallowing the leading digits of
        // the tender number.
        let page_text = "474/2024 מכרז פורסם, טרם נדון, no award data";
        let window = detail_window(page_text, "474/2024", 3000).unwrap();
        let records = parse_records(&window, "474/2024", HarvestMode::Multi);
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].lot_number, "");
        assert_eq!(records[0].winner_name, crate::model::FieldValue::NotPublished);
    }

    #[test]
    fn harvest_mode_parses_from_config_strings() {
        assert_eq!("single".parse::<HarvestMode>().unwrap(), HarvestMode::Single);
        assert_eq!("Multi".parse::<HarvestMode>().unwrap(), HarvestMode::Multi);
        assert!("both".parse::<HarvestMode>().is_err());
    }
}
