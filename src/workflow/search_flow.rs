//! Search sequencing - workflow layer
//!
//! The ordered steps from landing page to a fired search:
//! navigate home → pick the tender-results view → open advanced search →
//! apply filters → pick the committee date → submit.
//!
//! Every step fails fast on a selector timeout; only steps that explicitly
//! try an ordered fallback chain survive a miss.

use tracing::info;

use crate::error::{Result, ScrapeError};
use crate::infrastructure::delay::random_delay;
use crate::infrastructure::PageDriver;
use crate::model::FilterSelection;
use crate::services::{DatePicker, FilterPanel};

/// The entry buttons on the home page are matched by position, not text:
/// the second one opens the tender-results view.
const ENTRY_BUTTONS: &str = "button.button-enter";
const TENDER_RESULTS_INDEX: usize = 1;
const ENTRY_RENDER_TIMEOUT_MS: u64 = 15_000;

const ADVANCED_SEARCH: &str = ".advanced-search";

/// Submit fallbacks, in order of preference.
const SUBMIT_FALLBACKS: [&str; 3] = [".icon-search", "button.search-btn", "button[type='submit']"];
const SUBMIT_TEXT: &str = "חפש";

/// Search sequencing flow
pub struct SearchFlow {
    filter_panel: FilterPanel,
    date_picker: DatePicker,
}

impl SearchFlow {
    pub fn new() -> Self {
        Self {
            filter_panel: FilterPanel::new(),
            date_picker: DatePicker::new(),
        }
    }

    /// Run the whole sequence against a fresh page.
    pub async fn run(
        &self,
        driver: &PageDriver,
        base_url: &str,
        selection: &FilterSelection,
    ) -> Result<()> {
        self.navigate_home(driver, base_url).await?;
        self.select_tender_results(driver).await?;
        self.open_advanced_search(driver).await?;

        self.filter_panel.apply(driver, selection).await?;
        self.date_picker.select(driver, &selection.committee_date).await?;

        // Leaving the date field commits it before the search fires
        driver.press_key("Tab").await?;

        self.submit_search(driver).await?;
        Ok(())
    }

    async fn navigate_home(&self, driver: &PageDriver, base_url: &str) -> Result<()> {
        info!("🌐 navigating to {}...", base_url);
        driver.goto(base_url).await?;
        driver.simulate_human_interaction().await?;
        random_delay(200, 500).await;
        Ok(())
    }

    async fn select_tender_results(&self, driver: &PageDriver) -> Result<()> {
        info!("🔘 selecting the tender-results view...");
        // The SPA renders the entry buttons well after the load event
        driver.wait_for_visible(ENTRY_BUTTONS, ENTRY_RENDER_TIMEOUT_MS).await?;
        if !driver.click_nth(ENTRY_BUTTONS, TENDER_RESULTS_INDEX).await? {
            return Err(ScrapeError::fallbacks_exhausted(
                "tender-results entry button",
            ));
        }
        random_delay(200, 500).await;
        Ok(())
    }

    async fn open_advanced_search(&self, driver: &PageDriver) -> Result<()> {
        info!("🔧 opening advanced search...");
        driver.click(ADVANCED_SEARCH).await?;
        random_delay(50, 100).await;
        Ok(())
    }

    /// Submit the search: a button labeled "חפש" if one is visible, else the
    /// first visible selector from the fallback list.
    async fn submit_search(&self, driver: &PageDriver) -> Result<()> {
        info!("🔍 submitting search...");

        let mut clicked = driver.click_by_text("button", SUBMIT_TEXT).await?;
        if !clicked {
            for selector in SUBMIT_FALLBACKS {
                if driver.click_if_visible(selector).await? {
                    clicked = true;
                    break;
                }
            }
        }
        if !clicked {
            return Err(ScrapeError::fallbacks_exhausted("search submit button"));
        }

        // Give the result list its first load
        random_delay(1000, 2000).await;
        Ok(())
    }
}

impl Default for SearchFlow {
    fn default() -> Self {
        Self::new()
    }
}
