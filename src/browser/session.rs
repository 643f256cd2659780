//! Browser session lifecycle.
//!
//! Owns the Chromium process and the single page every interaction routes
//! through. A session always starts from clean state: fresh process, cleared
//! cookies and storage, spoofed identity attributes, automation flag
//! suppressed.

use chromiumoxide::cdp::browser_protocol::emulation::{
    SetGeolocationOverrideParams, SetLocaleOverrideParams, SetTimezoneOverrideParams,
};
use chromiumoxide::cdp::browser_protocol::network::{
    ClearBrowserCookiesParams, SetUserAgentOverrideParams,
};
use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::error::{BrowserError, Result, ScrapeError};

/// Desktop Chrome identity presented to the site
const USER_AGENT: &str = "Mozilla/5.0 (Macintosh; Intel Mac OS X 10_15_7) \
     AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Runs before any site script on every navigation: hides the automation
/// flag and wipes whatever storage survived the fresh profile.
const STEALTH_INIT_SCRIPT: &str = r#"
    Object.defineProperty(navigator, 'webdriver', { get: () => undefined });
    try {
        localStorage.clear();
        sessionStorage.clear();
    } catch (e) {}
"#;

/// A launched browser with its single page.
pub struct Session {
    browser: Browser,
    page: Page,
}

impl Session {
    /// Launch Chromium with anti-detection configuration and open one page.
    ///
    /// Fails with a launch error if the browser process cannot start.
    pub async fn launch(headless: bool) -> Result<Self> {
        info!("🚀 launching browser (headless: {})...", headless);

        let mut builder = BrowserConfig::builder();
        if !headless {
            builder = builder.with_head();
        }

        // Strict no-cache launch: every run starts from a blank profile
        let config = builder
            .window_size(1280, 800)
            .args(vec![
                "--disable-blink-features=AutomationControlled",
                "--no-sandbox",
                "--disable-setuid-sandbox",
                "--disable-web-security",
                "--disable-features=IsolateOrigins,site-per-process",
                "--disable-back-forward-cache",
                "--aggressive-cache-discard",
                "--disk-cache-size=0",
                "--disable-application-cache",
                "--media-cache-size=0",
            ])
            .build()
            .map_err(|message| {
                ScrapeError::Browser(BrowserError::ConfigurationFailed { message })
            })?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(ScrapeError::launch_failed)?;
        debug!("browser process started");

        // The CDP handler must be polled continuously for the connection to work
        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        // Short pause to let browser state settle
        sleep(Duration::from_millis(300)).await;

        let page = browser.new_page("about:blank").await.map_err(|e| {
            ScrapeError::Browser(BrowserError::PageCreationFailed {
                source: Box::new(e),
            })
        })?;

        Self::configure_identity(&page).await?;

        info!("✅ browser session ready");
        Ok(Self { browser, page })
    }

    /// Spoof user agent, locale, timezone and geolocation, install the
    /// stealth init script, and clear cookies.
    async fn configure_identity(page: &Page) -> Result<()> {
        page.evaluate_on_new_document(STEALTH_INIT_SCRIPT).await?;

        let user_agent = SetUserAgentOverrideParams::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(|message| {
                ScrapeError::Browser(BrowserError::ConfigurationFailed { message })
            })?;
        page.set_user_agent(user_agent).await?;

        let timezone = SetTimezoneOverrideParams::builder()
            .timezone_id("Asia/Jerusalem")
            .build()
            .map_err(|message| {
                ScrapeError::Browser(BrowserError::ConfigurationFailed { message })
            })?;
        page.execute(timezone).await?;

        page.execute(SetLocaleOverrideParams {
            locale: Some("he-IL".to_string()),
            ..Default::default()
        })
        .await?;

        // Jerusalem
        page.execute(SetGeolocationOverrideParams {
            latitude: Some(31.7683),
            longitude: Some(35.2137),
            accuracy: Some(1.0),
            ..Default::default()
        })
        .await?;

        page.execute(ClearBrowserCookiesParams::default()).await?;
        debug!("session identity configured, cookies cleared");

        Ok(())
    }

    /// The session's single page.
    pub fn page(&self) -> &Page {
        &self.page
    }

    /// Close the browser, releasing all resources.
    ///
    /// Consumes the session; callers holding `Option<Session>` get idempotent
    /// close for free. Failures are logged, not propagated: teardown is
    /// best-effort.
    pub async fn close(mut self) {
        info!("🧹 closing browser...");
        if let Err(e) = self.browser.close().await {
            warn!("browser close failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("browser did not exit cleanly: {}", e);
        }
    }
}
