//! Page driver - infrastructure layer
//!
//! Holds the single page resource and exposes interaction capabilities
//! (navigate, eval, click, type, key press, scroll). Site-specific services
//! receive a `&PageDriver` and compose these primitives; nothing above this
//! layer talks to chromiumoxide directly.

use chromiumoxide::cdp::browser_protocol::input::{
    DispatchKeyEventParams, DispatchKeyEventType, DispatchMouseEventParams, DispatchMouseEventType,
};
use chromiumoxide::Page;
use rand::Rng;
use serde::de::DeserializeOwned;
use serde_json::Value as JsonValue;
use std::time::Duration;
use tokio::time::{sleep, Instant};
use tracing::debug;

use crate::error::{Result, ScrapeError};
use crate::infrastructure::delay::random_delay;

/// Default visibility wait before a generic click
const DEFAULT_CLICK_TIMEOUT_MS: u64 = 5_000;
/// Interval between visibility polls
const POLL_INTERVAL_MS: u64 = 100;

/// Page driver
///
/// Responsibilities:
/// - hold the single `Page` resource
/// - expose navigation / evaluation / interaction capabilities
/// - pace every action through the delay provider
/// - know nothing about tenders, filters or the site's flow
pub struct PageDriver {
    page: Page,
}

impl PageDriver {
    pub fn new(page: Page) -> Self {
        Self { page }
    }

    /// Reference to the underlying page (for operations not covered here)
    pub fn page(&self) -> &Page {
        &self.page
    }

    // ========== Navigation ==========

    /// Navigate and wait for the navigation to settle.
    pub async fn goto(&self, url: &str) -> Result<()> {
        self.page
            .goto(url)
            .await
            .map_err(|e| ScrapeError::navigation_failed(url, e))?;
        self.page
            .wait_for_navigation()
            .await
            .map_err(|e| ScrapeError::navigation_failed(url, e))?;
        Ok(())
    }

    /// Go back one entry in session history.
    pub async fn go_back(&self) -> Result<()> {
        self.eval("(() => { history.back(); return true; })()").await?;
        Ok(())
    }

    // ========== Evaluation ==========

    /// Run JS in the page and return the JSON result.
    pub async fn eval(&self, js_code: impl Into<String>) -> Result<JsonValue> {
        let result = self.page.evaluate(js_code.into()).await?;
        let json_value = result.into_value()?;
        Ok(json_value)
    }

    /// Run JS in the page and deserialize the result.
    pub async fn eval_as<T: DeserializeOwned>(&self, js_code: impl Into<String>) -> Result<T> {
        let json_value = self.eval(js_code).await?;
        let typed_value = serde_json::from_value(json_value)?;
        Ok(typed_value)
    }

    /// Full rendered text of the page body.
    pub async fn body_text(&self) -> Result<String> {
        self.eval_as::<String>("document.body.innerText || ''").await
    }

    /// Trimmed text content of the first element matching `selector`.
    pub async fn read_text(&self, selector: &str) -> Result<Option<String>> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({sel});
                return el ? (el.textContent || '').trim() : null;
            }})()
            "#,
            sel = serde_json::to_string(selector)?,
        );
        self.eval_as::<Option<String>>(js_code).await
    }

    // ========== Visibility ==========

    /// Whether the first element matching `selector` is currently visible.
    pub async fn is_visible(&self, selector: &str) -> Result<bool> {
        let js_code = format!(
            r#"
            (() => {{
                const el = document.querySelector({sel});
                if (!el) return false;
                const style = window.getComputedStyle(el);
                if (style.display === 'none' || style.visibility === 'hidden') return false;
                return el.offsetParent !== null || el.getClientRects().length > 0;
            }})()
            "#,
            sel = serde_json::to_string(selector)?,
        );
        self.eval_as::<bool>(js_code).await
    }

    /// Poll until `selector` is visible, failing with a selector timeout once
    /// the bound elapses.
    pub async fn wait_for_visible(&self, selector: &str, timeout_ms: u64) -> Result<()> {
        let deadline = Instant::now() + Duration::from_millis(timeout_ms);
        loop {
            if self.is_visible(selector).await? {
                return Ok(());
            }
            if Instant::now() >= deadline {
                return Err(ScrapeError::selector_timeout(selector, timeout_ms));
            }
            sleep(Duration::from_millis(POLL_INTERVAL_MS)).await;
        }
    }

    // ========== Interaction ==========

    /// Wait for `selector` to become visible, click it, then pause briefly.
    pub async fn click(&self, selector: &str) -> Result<()> {
        self.click_with_timeout(selector, DEFAULT_CLICK_TIMEOUT_MS).await
    }

    /// Same as [`Self::click`] with an explicit visibility bound.
    pub async fn click_with_timeout(&self, selector: &str, timeout_ms: u64) -> Result<()> {
        debug!("clicking '{}'", selector);
        self.wait_for_visible(selector, timeout_ms).await?;
        self.page.find_element(selector).await?.click().await?;
        random_delay(100, 300).await;
        Ok(())
    }

    /// Click `selector` only if it is currently visible; returns whether a
    /// click happened.
    pub async fn click_if_visible(&self, selector: &str) -> Result<bool> {
        if self.is_visible(selector).await? {
            self.click(selector).await?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    /// Click the `index`-th element matching `selector`; returns whether such
    /// an element existed.
    pub async fn click_nth(&self, selector: &str, index: usize) -> Result<bool> {
        let elements = self.page.find_elements(selector).await?;
        match elements.get(index) {
            Some(element) => {
                element.click().await?;
                random_delay(100, 300).await;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Click the first element under `selector` whose rendered text equals
    /// `text` (falling back to a contains match); returns whether a click
    /// happened.
    ///
    /// Best-effort heuristic: text targeting is inherently fragile and only
    /// as stable as the site's visible labels.
    pub async fn click_by_text(&self, selector: &str, text: &str) -> Result<bool> {
        let js_code = format!(
            r#"
            (() => {{
                const wanted = {text};
                const els = Array.from(document.querySelectorAll({sel}));
                const hit = els.find(e => (e.textContent || '').trim() === wanted)
                    || els.find(e => (e.textContent || '').includes(wanted));
                if (!hit) return false;
                hit.click();
                return true;
            }})()
            "#,
            sel = serde_json::to_string(selector)?,
            text = serde_json::to_string(text)?,
        );
        let clicked = self.eval_as::<bool>(js_code).await?;
        if clicked {
            random_delay(100, 300).await;
        }
        Ok(clicked)
    }

    /// Type text into `selector` with a small per-character delay.
    pub async fn type_text(&self, selector: &str, text: &str) -> Result<()> {
        self.wait_for_visible(selector, DEFAULT_CLICK_TIMEOUT_MS).await?;
        self.page.find_element(selector).await?.click().await?;
        for ch in text.chars() {
            let params = DispatchKeyEventParams::builder()
                .r#type(DispatchKeyEventType::Char)
                .text(ch.to_string())
                .build()
                .map_err(ScrapeError::Other)?;
            self.page.execute(params).await?;
            sleep(Duration::from_millis(10)).await;
        }
        random_delay(50, 150).await;
        Ok(())
    }

    /// Press a key (e.g. "Escape", "Tab", "Enter") against the focused element.
    pub async fn press_key(&self, key: &str) -> Result<()> {
        debug!("pressing key '{}'", key);
        let down = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::KeyDown)
            .key(key.to_string())
            .build()
            .map_err(ScrapeError::Other)?;
        self.page.execute(down).await?;
        let up = DispatchKeyEventParams::builder()
            .r#type(DispatchKeyEventType::KeyUp)
            .key(key.to_string())
            .build()
            .map_err(ScrapeError::Other)?;
        self.page.execute(up).await?;
        Ok(())
    }

    /// Scroll the window down by `pixels`.
    pub async fn scroll_by(&self, pixels: i64) -> Result<()> {
        self.eval(format!(
            "(() => {{ window.scrollBy(0, {}); return true; }})()",
            pixels
        ))
        .await?;
        Ok(())
    }

    /// Small random mouse movement and wheel nudge between steps.
    pub async fn simulate_human_interaction(&self) -> Result<()> {
        let (x, y, wheel) = {
            let mut rng = rand::thread_rng();
            (
                rng.gen_range(0.0..500.0),
                rng.gen_range(0.0..500.0),
                rng.gen_range(0.0..100.0),
            )
        };

        let move_params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseMoved)
            .x(x)
            .y(y)
            .build()
            .map_err(ScrapeError::Other)?;
        self.page.execute(move_params).await?;

        random_delay(200, 600).await;

        let wheel_params = DispatchMouseEventParams::builder()
            .r#type(DispatchMouseEventType::MouseWheel)
            .x(x)
            .y(y)
            .delta_x(0.0)
            .delta_y(wheel)
            .build()
            .map_err(ScrapeError::Other)?;
        self.page.execute(wheel_params).await?;

        Ok(())
    }
}
