//! Command-line and environment configuration.

use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use ratatui::layout::Rect;
use reqwest::Url;

use crate::api::HttpFetcher;
use crate::drag::DEFAULT_SENSITIVITY;
use crate::query::{QueryClient, QueryError};

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl LogLevel {
    #[must_use]
    pub const fn as_tracing_level(self) -> tracing::Level {
        match self {
            Self::Trace => tracing::Level::TRACE,
            Self::Debug => tracing::Level::DEBUG,
            Self::Info => tracing::Level::INFO,
            Self::Warn => tracing::Level::WARN,
            Self::Error => tracing::Level::ERROR,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "dashcam",
    version = env!("CARGO_PKG_VERSION"),
    about = "Browse dashcam recordings and their GPS tracks in the terminal",
    long_about = None
)]
pub struct Cli {
    /// Base URL of the recordings API.
    #[arg(long, env = "DASHCAM_API_URL", default_value = "http://localhost:8080/api")]
    pub api_url: Url,

    /// Redraws per second.
    #[arg(long, default_value_t = 60, value_parser = clap::value_parser!(u32).range(1..=240))]
    pub frame_rate: u32,

    /// Scroll distance per column of pointer travel while dragging.
    #[arg(long, default_value_t = DEFAULT_SENSITIVITY, value_parser = positive)]
    pub drag_sensitivity: f64,

    /// Columns moved by the previous/next controls.
    #[arg(long, default_value_t = 24.0, value_parser = positive)]
    pub scroll_step: f64,

    /// Log file. The terminal belongs to the UI, so logs never go to stdout.
    #[arg(long, default_value = "dashcam.log")]
    pub log_file: PathBuf,

    /// Log level for this crate. `RUST_LOG` takes precedence.
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,
}

fn positive(s: &str) -> Result<f64, String> {
    let value: f64 = s.parse().map_err(|e| format!("{e}"))?;
    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(format!("expected a positive number, got {value}"))
    }
}

/// Everything the application needs at startup.
#[derive(Debug, Clone)]
pub struct Settings {
    pub client: QueryClient,
    pub drag_sensitivity: f64,
    pub scroll_step: f64,
    /// Terminal size at startup.
    pub area: Rect,
}

impl Cli {
    /// Builds the application settings, including the HTTP-backed query
    /// client.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be created.
    pub fn settings(&self, area: Rect) -> Result<Settings, QueryError> {
        let fetcher = HttpFetcher::new(self.api_url.clone())?;
        Ok(Settings {
            client: QueryClient::new(fetcher),
            drag_sensitivity: self.drag_sensitivity,
            scroll_step: self.scroll_step,
            area,
        })
    }
}
