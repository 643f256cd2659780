//! Advanced-search filter panel - business capability layer
//!
//! Sets the three multiselect filters (district, purpose, status). Each
//! control follows the same dance: open the dropdown, click the matching
//! option(s) by visible text, dismiss with Escape.

use tracing::info;

use crate::error::{Result, ScrapeError};
use crate::infrastructure::delay::random_delay;
use crate::infrastructure::PageDriver;
use crate::model::FilterSelection;

const DISTRICT_CONTROL: &str = "#Merchav_id .p-multiselect-label-container";
const PURPOSE_CONTROL: &str = "#YeudMichraz_id .p-multiselect-label-container";
const STATUS_CONTROL: &str = "#StatusMichraz_id .p-multiselect-label-container";

const MULTISELECT_ITEM: &str = "li.p-multiselect-item";
// The status dropdown renders plain list items
const STATUS_ITEM: &str = "li";

/// Filter panel service
pub struct FilterPanel;

impl FilterPanel {
    pub fn new() -> Self {
        Self
    }

    /// Apply district, purpose and status filters in order.
    pub async fn apply(&self, driver: &PageDriver, selection: &FilterSelection) -> Result<()> {
        info!("🔎 setting district: {}", selection.district.label());
        self.select_options(
            driver,
            DISTRICT_CONTROL,
            MULTISELECT_ITEM,
            &[selection.district.label()],
        )
        .await?;

        info!("🔎 setting purposes: {:?}", FilterSelection::PURPOSES);
        self.select_options(
            driver,
            PURPOSE_CONTROL,
            MULTISELECT_ITEM,
            &FilterSelection::PURPOSES,
        )
        .await?;

        info!("🔎 setting status: {}", FilterSelection::STATUS);
        self.select_options(driver, STATUS_CONTROL, STATUS_ITEM, &[FilterSelection::STATUS])
            .await?;

        Ok(())
    }

    /// Open one multiselect, click every wanted option by its visible text,
    /// then close the dropdown.
    async fn select_options(
        &self,
        driver: &PageDriver,
        control: &str,
        item_selector: &str,
        labels: &[&str],
    ) -> Result<()> {
        driver.click(control).await?;

        for label in labels {
            if !driver.click_by_text(item_selector, label).await? {
                return Err(ScrapeError::fallbacks_exhausted(format!(
                    "filter option '{}' under {}",
                    label, control
                )));
            }
        }

        driver.press_key("Escape").await?;
        random_delay(50, 100).await;

        Ok(())
    }
}

impl Default for FilterPanel {
    fn default() -> Self {
        Self::new()
    }
}
