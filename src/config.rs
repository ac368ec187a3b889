use chrono::{Offset, Utc};
use clap::Parser;
use std::time::Duration;

pub const DEFAULT_TOP_K: usize = 1;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DisplayKind {
    Console,
    Gui,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub model_url: String,
    pub metadata_url: Option<String>,
    pub top_k: usize,
    pub http_timeout: Duration,
    pub http_connect_timeout: Duration,
    pub display: DisplayKind,
    pub logger_timezone: chrono::FixedOffset,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            model_url: String::new(),
            metadata_url: None,
            top_k: DEFAULT_TOP_K,
            http_timeout: Duration::from_secs(30),
            http_connect_timeout: Duration::from_secs(5),
            display: DisplayKind::Console,
            logger_timezone: Utc.fix(),
        }
    }
}

/// Classify histology images with a remotely hosted model.
#[derive(Debug, Parser)]
#[command(version, about)]
pub struct Args {
    /// URL of the ONNX model definition
    #[arg(long)]
    pub model_url: Option<String>,

    /// URL of the label metadata document ({"labels": [...]})
    #[arg(long)]
    pub metadata_url: Option<String>,

    /// Number of ranked predictions to keep
    #[arg(long)]
    pub top_k: Option<usize>,

    /// Show results in a window instead of the terminal
    #[arg(long)]
    pub gui: bool,

    /// UTC offset in hours used for log timestamps
    #[arg(long, allow_hyphen_values = true)]
    pub utc_offset_hours: Option<i32>,
}

impl Config {
    pub fn from_args(args: Args) -> Self {
        let mut config = Config::default();

        if let Some(model_url) = args.model_url {
            config.model_url = model_url;
        }
        if let Some(metadata_url) = args.metadata_url {
            config.metadata_url = Some(metadata_url).filter(|url| !url.is_empty());
        }
        if let Some(top_k) = args.top_k {
            config.top_k = top_k.max(1);
        }
        if args.gui {
            config.display = DisplayKind::Gui;
        }
        if let Some(offset) = args
            .utc_offset_hours
            .and_then(|hours| chrono::FixedOffset::east_opt(hours * 3600))
        {
            config.logger_timezone = offset;
        }

        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();

        assert!(config.model_url.is_empty());
        assert_eq!(config.metadata_url, None);
        assert_eq!(config.top_k, 1);
        assert_eq!(config.display, DisplayKind::Console);
    }

    #[test]
    fn test_from_args_overrides() {
        let args = Args::parse_from([
            "histology-classifier",
            "--model-url",
            "https://models.example/model.onnx",
            "--metadata-url",
            "https://models.example/metadata.json",
            "--top-k",
            "3",
            "--gui",
            "--utc-offset-hours",
            "-7",
        ]);

        let config = Config::from_args(args);

        assert_eq!(config.model_url, "https://models.example/model.onnx");
        assert_eq!(
            config.metadata_url.as_deref(),
            Some("https://models.example/metadata.json")
        );
        assert_eq!(config.top_k, 3);
        assert_eq!(config.display, DisplayKind::Gui);
        assert_eq!(config.logger_timezone.local_minus_utc(), -7 * 3600);
    }

    #[test]
    fn test_top_k_is_at_least_one() {
        let args = Args::parse_from(["histology-classifier", "--top-k", "0"]);

        let config = Config::from_args(args);

        assert_eq!(config.top_k, 1);
    }
}
