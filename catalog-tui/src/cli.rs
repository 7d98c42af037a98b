//! Command line arguments.

use std::num::NonZeroUsize;
use std::time::Duration;

use catalog_lib::CatalogConfig;
use clap::Parser;
use log::LevelFilter;

/// Browse a product catalog with infinite scroll.
///
/// Flags override the `CATALOG_URL`, `CATALOG_PAGE_SIZE` and
/// `CATALOG_TIMEOUT_SECS` environment variables, which may also come from a
/// `.env` file.
#[derive(Debug, Parser)]
#[command(name = "catalog-tui", version)]
pub struct Cli {
    /// Products endpoint.
    #[arg(long)]
    pub url: Option<String>,

    /// Products per page.
    #[arg(long)]
    pub page_size: Option<NonZeroUsize>,

    /// Request timeout in seconds.
    #[arg(long)]
    pub timeout_secs: Option<u64>,

    /// Rows past the bottom edge at which the next page starts loading.
    #[arg(long)]
    pub margin: Option<u32>,

    /// Disable scroll-triggered loading; press `m` to load more instead.
    #[arg(long)]
    pub no_trigger: bool,

    /// Log level written to the log file.
    #[arg(long, default_value = "info")]
    pub log_level: LevelFilter,
}

impl Cli {
    /// Layers the flags on top of `config`.
    pub fn apply(&self, mut config: CatalogConfig) -> CatalogConfig {
        if let Some(url) = &self.url {
            config = config.with_base_url(url.clone());
        }
        if let Some(page_size) = self.page_size {
            config = config.with_page_size(page_size);
        }
        if let Some(secs) = self.timeout_secs {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        if let Some(margin) = self.margin {
            let trigger = config.trigger.with_root_margin(margin);
            config = config.with_trigger(trigger);
        }
        config
    }
}
