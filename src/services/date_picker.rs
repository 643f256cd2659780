//! Committee-date picker - business capability layer
//!
//! Drives the site's three-tier calendar widget (day grid, month grid, year
//! grid). The widget opens on the day grid; depending on the displayed
//! year/month we descend into the year or month grid first, then come back
//! down to pick the day.

use tracing::{debug, info, warn};

use crate::error::{PickerError, Result, ScrapeError};
use crate::infrastructure::delay::random_delay;
use crate::infrastructure::PageDriver;
use crate::model::CommitteeDate;

/// Month names as rendered by the widget, indexed by numeric month - 1.
pub const MONTH_NAMES: [&str; 12] = [
    "ינואר", "פברואר", "מרץ", "אפריל", "מאי", "יוני",
    "יולי", "אוגוסט", "ספטמבר", "אוקטובר", "נובמבר", "דצמבר",
];

/// Rendered month name for a numeric month (1-12).
pub fn month_name(month: u32) -> &'static str {
    MONTH_NAMES[(month as usize) - 1]
}

/// Which grid transitions are needed to reach the target month view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlignmentPlan {
    /// Displayed year and month already match the target
    Aligned,
    /// Year matches, month does not: go through the month grid only
    SwitchMonth,
    /// Year mismatch: go through the year grid, which auto-advances to the
    /// month grid after a year is selected
    SwitchYear,
}

/// Decide how many grid levels to descend, from the currently displayed
/// year/month labels.
pub fn plan_alignment(
    displayed_year: &str,
    displayed_month: &str,
    target_year: i32,
    target_month: u32,
) -> AlignmentPlan {
    if displayed_year.trim() != target_year.to_string() {
        AlignmentPlan::SwitchYear
    } else if displayed_month.trim() != month_name(target_month) {
        AlignmentPlan::SwitchMonth
    } else {
        AlignmentPlan::Aligned
    }
}

// Widget-open control, in fallback order: exact accessibility label, partial
// label, positional guesses against the raw inputs.
const OPEN_BUTTON_EXACT: &str = r#"button[aria-label="ועדת מכרזים מתאריך - פתיחת תאריכון"]"#;
const OPEN_BUTTON_PARTIAL: &str = r#"button[aria-label*="ועדת מכרזים מתאריך"]"#;
const OPEN_INPUT_NTH: &str = r#"input[placeholder="מתאריך"]:nth-of-type(2)"#;
const OPEN_INPUT_FIRST: &str = r#"input[placeholder="מתאריך"]"#;

const PANEL: &str = ".p-datepicker";
const YEAR_LABEL: &str = ".p-datepicker-year";
const MONTH_LABEL: &str = ".p-datepicker-month";
const YEAR_GRID: &str = ".p-yearpicker";
const MONTH_GRID: &str = ".p-monthpicker";

/// Date-picker service
pub struct DatePicker {
    open_timeout_ms: u64,
    grid_timeout_ms: u64,
}

impl DatePicker {
    pub fn new() -> Self {
        Self {
            open_timeout_ms: 10_000,
            grid_timeout_ms: 3_000,
        }
    }

    /// Open the picker, align it to the target month, and select the day.
    pub async fn select(&self, driver: &PageDriver, date: &CommitteeDate) -> Result<()> {
        info!("📅 picking committee date {} from the calendar widget...", date);

        self.open(driver).await?;
        self.align(driver, date).await?;
        random_delay(100, 200).await;
        self.pick_day(driver, date).await?;

        // Repaint can leave the panel open after selection
        if driver.is_visible(PANEL).await? {
            driver.press_key("Escape").await?;
        }

        Ok(())
    }

    /// Click the open control (fallback chain) and wait for the day grid.
    async fn open(&self, driver: &PageDriver) -> Result<()> {
        if driver.click_if_visible(OPEN_BUTTON_EXACT).await? {
            debug!("picker opened via exact aria-label");
        } else if driver.click_if_visible(OPEN_BUTTON_PARTIAL).await? {
            warn!("exact aria-label not found, opened via partial match");
        } else if driver.click_if_visible(OPEN_INPUT_NTH).await?
            || driver.click_if_visible(OPEN_INPUT_FIRST).await?
        {
            warn!("aria-label buttons not found, opened via positional input guess");
        } else {
            warn!("no picker-open control matched; waiting on the panel anyway");
        }

        driver
            .wait_for_visible(PANEL, self.open_timeout_ms)
            .await
            .map_err(|_| {
                ScrapeError::Picker(PickerError::OpenTimeout {
                    timeout_ms: self.open_timeout_ms,
                })
            })?;
        random_delay(100, 200).await;

        Ok(())
    }

    /// From the day grid, descend through year/month grids as needed until
    /// the displayed year and month match the target.
    async fn align(&self, driver: &PageDriver, date: &CommitteeDate) -> Result<()> {
        driver
            .wait_for_visible(YEAR_LABEL, 5_000)
            .await
            .map_err(|_| {
                ScrapeError::Picker(PickerError::GridTimeout {
                    grid: "day",
                    timeout_ms: 5_000,
                })
            })?;

        let displayed_year = driver.read_text(YEAR_LABEL).await?.unwrap_or_default();
        let displayed_month = driver.read_text(MONTH_LABEL).await?.unwrap_or_default();
        let target_month = month_name(date.month);

        match plan_alignment(&displayed_year, &displayed_month, date.year, date.month) {
            AlignmentPlan::Aligned => {
                debug!("calendar already on {} {}", displayed_month, displayed_year);
            }
            AlignmentPlan::SwitchYear => {
                info!("switching year {} -> {}", displayed_year, date.year);
                driver.click(YEAR_LABEL).await?;
                self.wait_for_grid(driver, YEAR_GRID, "year").await?;
                self.click_cell(driver, YEAR_GRID, &date.year.to_string()).await?;

                // Selecting a year auto-advances the widget to the month grid
                info!("year selected, picking month {}...", target_month);
                self.wait_for_grid(driver, MONTH_GRID, "month").await?;
                self.click_cell(driver, MONTH_GRID, target_month).await?;
            }
            AlignmentPlan::SwitchMonth => {
                info!("switching month {} -> {}", displayed_month, target_month);
                driver.click(MONTH_LABEL).await?;
                self.wait_for_grid(driver, MONTH_GRID, "month").await?;
                self.click_cell(driver, MONTH_GRID, target_month).await?;
            }
        }

        Ok(())
    }

    async fn wait_for_grid(
        &self,
        driver: &PageDriver,
        selector: &str,
        grid: &'static str,
    ) -> Result<()> {
        driver
            .wait_for_visible(selector, self.grid_timeout_ms)
            .await
            .map_err(|_| {
                ScrapeError::Picker(PickerError::GridTimeout {
                    grid,
                    timeout_ms: self.grid_timeout_ms,
                })
            })
    }

    async fn click_cell(&self, driver: &PageDriver, grid: &str, text: &str) -> Result<()> {
        let selector = format!("{} span", grid);
        if !driver.click_by_text(&selector, text).await? {
            return Err(ScrapeError::fallbacks_exhausted(format!(
                "calendar cell '{}' in {}",
                text, grid
            )));
        }
        Ok(())
    }

    /// Click the day cell directly in the DOM, skipping the visibility wait:
    /// the calendar repaints too fast for the generic click helper.
    ///
    /// A day that is not present in the grid is a silent no-op by design of
    /// the original flow; the sequencer does not verify the selection took.
    async fn pick_day(&self, driver: &PageDriver, date: &CommitteeDate) -> Result<()> {
        let day = date.day_label();
        debug!("clicking day {}", day);

        let js_code = format!(
            r#"
            (() => {{
                const wanted = {day};
                const cells = Array.from(document.querySelectorAll(
                    '.p-datepicker-calendar td:not(.p-datepicker-other-month) span'));
                const target = cells.find(el => (el.textContent || '').trim() === wanted);
                if (!target) return false;
                target.click();
                return true;
            }})()
            "#,
            day = serde_json::to_string(&day)?,
        );

        let clicked = driver.eval_as::<bool>(js_code).await?;
        if !clicked {
            warn!("day {} not present in the rendered grid, no selection made", day);
        }
        random_delay(200, 500).await;

        Ok(())
    }
}

impl Default for DatePicker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn month_table_is_complete() {
        assert_eq!(month_name(1), "ינואר");
        assert_eq!(month_name(7), "יולי");
        assert_eq!(month_name(12), "דצמבר");
    }

    #[test]
    fn aligned_when_both_labels_match() {
        assert_eq!(
            plan_alignment("2025", "יולי", 2025, 7),
            AlignmentPlan::Aligned
        );
    }

    #[test]
    fn month_switch_when_only_month_differs() {
        assert_eq!(
            plan_alignment("2025", "יוני", 2025, 7),
            AlignmentPlan::SwitchMonth
        );
    }

    #[test]
    fn year_switch_when_year_differs() {
        assert_eq!(
            plan_alignment("2024", "יולי", 2025, 7),
            AlignmentPlan::SwitchYear
        );
        // Year takes precedence even when the month also differs
        assert_eq!(
            plan_alignment("2024", "מרץ", 2025, 7),
            AlignmentPlan::SwitchYear
        );
    }

    #[test]
    fn labels_are_trimmed_before_comparison() {
        assert_eq!(
            plan_alignment(" 2025 ", " יולי ", 2025, 7),
            AlignmentPlan::Aligned
        );
    }
}
