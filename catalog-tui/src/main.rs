mod app;
mod cli;
mod paths;
mod render;
mod terminal;
mod viewport;

use std::fs::File;

use catalog_lib::CatalogConfig;
use catalog_lib::PaginationController;
use catalog_lib::viewport::RowViewport;
use clap::Parser;
use log::info;
use simplelog::Config;
use simplelog::WriteLogger;

use crate::app::App;
use crate::cli::Cli;
use crate::terminal::TerminalGuard;
use crate::viewport::HostViewport;

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    let cli = Cli::parse();

    paths::rotate_logs();
    let log_path = paths::log_file().unwrap_or_else(|| "catalog-tui.log".into());
    let log_file = File::create(&log_path)?;
    WriteLogger::init(cli.log_level, Config::default(), log_file)?;

    let config = cli.apply(CatalogConfig::from_env()?);
    let controller = PaginationController::from_config(&config)?;
    info!(
        "starting catalog-tui (url={}, page_size={})",
        config.base_url,
        controller.page_size()
    );
    {
        let controller = controller.clone();
        tokio::spawn(async move {
            controller.refetch().await;
        });
    }

    let viewport = if cli.no_trigger {
        HostViewport::Unsupported
    } else {
        HostViewport::Rows(RowViewport::default())
    };
    let app = App::new(controller, viewport, config.trigger);

    let mut terminal = TerminalGuard::new()?;
    app::run(app, &mut terminal).await?;
    info!("exiting");
    Ok(())
}
