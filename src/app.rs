//! Retry/restart driver - orchestration layer
//!
//! Runs the full scrape up to a bounded number of attempts. Success means a
//! non-empty record set; anything else closes the browser completely and
//! starts the next attempt from clean state.

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::browser::Session;
use crate::config::Config;
use crate::infrastructure::PageDriver;
use crate::model::{FilterSelection, TenderRecord};
use crate::services::{csv_export, Harvester};
use crate::workflow::SearchFlow;

/// Application orchestrator
pub struct App {
    config: Config,
    selection: FilterSelection,
    session: Option<Session>,
}

impl App {
    /// Validate configuration and prepare the app. No browser is launched
    /// yet; each attempt owns its own session.
    pub fn initialize(config: Config) -> Result<Self> {
        let selection = FilterSelection::from_config(&config.district, &config.committee_date)
            .context("invalid filter configuration")?;

        log_startup(&config, &selection);

        Ok(Self {
            config,
            selection,
            session: None,
        })
    }

    /// Run the bounded attempt loop and return whatever was harvested.
    ///
    /// Exhausting all attempts without records is reported, not an error.
    pub async fn run(&mut self) -> Result<Vec<TenderRecord>> {
        let mut harvested: Vec<TenderRecord> = Vec::new();

        for attempt in 1..=self.config.max_attempts {
            info!("\n{}", "=".repeat(60));
            info!("🎯 attempt {}/{}", attempt, self.config.max_attempts);
            info!("{}", "=".repeat(60));

            match self.run_attempt().await {
                Ok(records) if !records.is_empty() => {
                    harvested = records;
                    break;
                }
                Ok(_) => {
                    warn!("⚠️ attempt {} produced no records", attempt);
                }
                Err(e) => {
                    error!("❌ attempt {} failed: {:#}", attempt, e);
                }
            }

            // Full restart between attempts clears any corrupted page state
            self.close_session().await;
        }

        log_summary(&harvested, self.config.max_attempts);

        if !harvested.is_empty() {
            if let Some(path) = self.config.export_path.clone() {
                csv_export::export_records(&path, &harvested)
                    .context("failed to export records")?;
            }
        }

        self.close_session().await;
        Ok(harvested)
    }

    /// One full pass: fresh session, search sequencing, harvest. Every
    /// attempt starts from an empty result set.
    async fn run_attempt(&mut self) -> Result<Vec<TenderRecord>> {
        self.close_session().await;

        let session = Session::launch(self.config.headless).await?;
        let driver = PageDriver::new(session.page().clone());
        self.session = Some(session);

        SearchFlow::new()
            .run(&driver, &self.config.base_url, &self.selection)
            .await
            .context("search sequencing failed")?;

        let records = Harvester::from_config(&self.config)
            .harvest(&driver)
            .await
            .context("harvest failed")?;

        Ok(records)
    }

    /// Close the active session, if any. Safe to call repeatedly.
    pub async fn shutdown(&mut self) {
        self.close_session().await;
    }

    async fn close_session(&mut self) {
        if let Some(session) = self.session.take() {
            session.close().await;
        }
    }
}

// ========== Log helpers ==========

fn log_startup(config: &Config, selection: &FilterSelection) {
    info!("{}", "=".repeat(60));
    info!("🚀 michraz scraper starting");
    info!("📍 district: {}", selection.district.label());
    info!("📅 committee date: {}", selection.committee_date);
    info!("⚙️ mode: {:?}, attempts: {}", config.harvest_mode, config.max_attempts);
    info!("{}", "=".repeat(60));
}

fn log_summary(records: &[TenderRecord], max_attempts: usize) {
    info!("\n{}", "=".repeat(60));
    info!(
        "📊 finished at {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S")
    );
    if records.is_empty() {
        warn!("❌ no records harvested after {} attempt(s)", max_attempts);
    } else {
        info!("✅ harvested {} record(s)", records.len());
        if let Ok(pretty) = serde_json::to_string_pretty(records) {
            info!("--- extraction results ---\n{}", pretty);
        }
    }
    info!("{}", "=".repeat(60));
}
