use anyhow::Result;
use tracing::warn;

use michraz_scraper::{App, Config};
use michraz_scraper::utils::logging;

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();

    let config = Config::from_env();
    let mut app = App::initialize(config)?;

    // Interrupts get best-effort browser teardown before the process exits
    let outcome = tokio::select! {
        res = app.run() => res.map(Some),
        _ = tokio::signal::ctrl_c() => {
            warn!("\n⚠️ interrupt received, closing browser safely...");
            Ok(None)
        }
    };

    app.shutdown().await;
    outcome?;

    Ok(())
}
