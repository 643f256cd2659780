use std::fmt;

/// Top-level application error type
#[derive(Debug)]
pub enum ScrapeError {
    /// Browser / session lifecycle errors
    Browser(BrowserError),
    /// Selector wait / lookup errors
    Selector(SelectorError),
    /// Date-picker widget errors
    Picker(PickerError),
    /// Configuration errors
    Config(ConfigError),
    /// Record export errors
    Export(ExportError),
    /// Anything else (wraps third-party errors without a better home)
    Other(String),
}

impl fmt::Display for ScrapeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ScrapeError::Browser(e) => write!(f, "browser error: {}", e),
            ScrapeError::Selector(e) => write!(f, "selector error: {}", e),
            ScrapeError::Picker(e) => write!(f, "date picker error: {}", e),
            ScrapeError::Config(e) => write!(f, "config error: {}", e),
            ScrapeError::Export(e) => write!(f, "export error: {}", e),
            ScrapeError::Other(msg) => write!(f, "error: {}", msg),
        }
    }
}

impl std::error::Error for ScrapeError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ScrapeError::Browser(e) => Some(e),
            ScrapeError::Selector(e) => Some(e),
            ScrapeError::Picker(e) => Some(e),
            ScrapeError::Config(e) => Some(e),
            ScrapeError::Export(e) => Some(e),
            ScrapeError::Other(_) => None,
        }
    }
}

/// Browser / session lifecycle errors
#[derive(Debug)]
pub enum BrowserError {
    /// The Chromium process could not be started
    LaunchFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Invalid browser configuration
    ConfigurationFailed {
        message: String,
    },
    /// Creating the page failed
    PageCreationFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Navigation failed
    NavigationFailed {
        url: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// Running JS / a CDP command against the page failed
    ScriptExecutionFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for BrowserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowserError::LaunchFailed { source } => {
                write!(f, "failed to launch browser: {}", source)
            }
            BrowserError::ConfigurationFailed { message } => {
                write!(f, "browser configuration failed: {}", message)
            }
            BrowserError::PageCreationFailed { source } => {
                write!(f, "failed to create page: {}", source)
            }
            BrowserError::NavigationFailed { url, source } => {
                write!(f, "navigation to {} failed: {}", url, source)
            }
            BrowserError::ScriptExecutionFailed { source } => {
                write!(f, "script execution failed: {}", source)
            }
        }
    }
}

impl std::error::Error for BrowserError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BrowserError::LaunchFailed { source }
            | BrowserError::PageCreationFailed { source }
            | BrowserError::NavigationFailed { source, .. }
            | BrowserError::ScriptExecutionFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
            BrowserError::ConfigurationFailed { .. } => None,
        }
    }
}

/// Selector wait / lookup errors
#[derive(Debug)]
pub enum SelectorError {
    /// The element never became visible within the bound
    Timeout { selector: String, timeout_ms: u64 },
    /// An ordered fallback chain was exhausted without a match
    FallbacksExhausted { step: String },
}

impl fmt::Display for SelectorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SelectorError::Timeout {
                selector,
                timeout_ms,
            } => {
                write!(
                    f,
                    "element '{}' not visible within {}ms",
                    selector, timeout_ms
                )
            }
            SelectorError::FallbacksExhausted { step } => {
                write!(f, "all selector fallbacks failed for step: {}", step)
            }
        }
    }
}

impl std::error::Error for SelectorError {}

/// Date-picker widget errors
#[derive(Debug)]
pub enum PickerError {
    /// The picker panel never appeared after clicking the open control
    OpenTimeout { timeout_ms: u64 },
    /// A picker grid (year / month / day) never appeared
    GridTimeout { grid: &'static str, timeout_ms: u64 },
}

impl fmt::Display for PickerError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PickerError::OpenTimeout { timeout_ms } => {
                write!(f, "date picker panel did not open within {}ms", timeout_ms)
            }
            PickerError::GridTimeout { grid, timeout_ms } => {
                write!(f, "{} grid did not appear within {}ms", grid, timeout_ms)
            }
        }
    }
}

impl std::error::Error for PickerError {}

/// Configuration errors
#[derive(Debug)]
pub enum ConfigError {
    /// District is not in the closed list
    InvalidDistrict { value: String },
    /// Committee date does not match DD/MM/YYYY (or has out-of-range parts)
    InvalidDate { value: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::InvalidDistrict { value } => {
                write!(f, "unknown district: {}", value)
            }
            ConfigError::InvalidDate { value } => {
                write!(f, "invalid committee date '{}', expected DD/MM/YYYY", value)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Record export errors
#[derive(Debug)]
pub enum ExportError {
    /// Writing the output file failed
    WriteFailed {
        path: String,
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// CSV serialization failed
    CsvFailed {
        source: Box<dyn std::error::Error + Send + Sync>,
    },
}

impl fmt::Display for ExportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExportError::WriteFailed { path, source } => {
                write!(f, "failed to write {}: {}", path, source)
            }
            ExportError::CsvFailed { source } => {
                write!(f, "csv serialization failed: {}", source)
            }
        }
    }
}

impl std::error::Error for ExportError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ExportError::WriteFailed { source, .. } | ExportError::CsvFailed { source } => {
                Some(source.as_ref() as &(dyn std::error::Error + 'static))
            }
        }
    }
}

// ========== Conversions from common error types ==========
// anyhow picks these up automatically at the workflow/app layer since
// ScrapeError implements std::error::Error.

impl From<chromiumoxide::error::CdpError> for ScrapeError {
    fn from(err: chromiumoxide::error::CdpError) -> Self {
        ScrapeError::Browser(BrowserError::ScriptExecutionFailed {
            source: Box::new(err),
        })
    }
}

impl From<serde_json::Error> for ScrapeError {
    fn from(err: serde_json::Error) -> Self {
        ScrapeError::Other(format!("json error: {}", err))
    }
}

impl From<std::io::Error> for ScrapeError {
    fn from(err: std::io::Error) -> Self {
        ScrapeError::Export(ExportError::WriteFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

impl From<csv::Error> for ScrapeError {
    fn from(err: csv::Error) -> Self {
        ScrapeError::Export(ExportError::CsvFailed {
            source: Box::new(err),
        })
    }
}

// ========== Convenience constructors ==========

impl ScrapeError {
    /// Create a browser launch error
    pub fn launch_failed(source: impl std::error::Error + Send + Sync + 'static) -> Self {
        ScrapeError::Browser(BrowserError::LaunchFailed {
            source: Box::new(source),
        })
    }

    /// Create a navigation error
    pub fn navigation_failed(
        url: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        ScrapeError::Browser(BrowserError::NavigationFailed {
            url: url.into(),
            source: Box::new(source),
        })
    }

    /// Create a selector visibility timeout error
    pub fn selector_timeout(selector: impl Into<String>, timeout_ms: u64) -> Self {
        ScrapeError::Selector(SelectorError::Timeout {
            selector: selector.into(),
            timeout_ms,
        })
    }

    /// Create an exhausted-fallback-chain error
    pub fn fallbacks_exhausted(step: impl Into<String>) -> Self {
        ScrapeError::Selector(SelectorError::FallbacksExhausted { step: step.into() })
    }
}

// ========== Result type alias ==========

/// Application result type
pub type Result<T> = std::result::Result<T, ScrapeError>;
