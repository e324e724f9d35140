//! Wiring & DI. Entry point: bootstrap adapters, inject into the controller,
//! run the UI. No business logic here.

use dotenv::dotenv;
use std::sync::Arc;
use todo_deck::adapters::http::{MockGateway, RestGateway};
use todo_deck::adapters::ui::{cli::CliInputPort, toast};
use todo_deck::ports::{InputPort, TaskGateway};
use todo_deck::shared::config::AppConfig;
use todo_deck::usecases::TaskListService;
use tokio::sync::mpsc;
use tracing::info;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let env_loaded = dotenv();
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    match &env_loaded {
        Ok(path) => info!(path = %path.display(), "loaded .env"),
        Err(_) => info!("no .env found"),
    }

    todo_deck::adapters::ui::init_ui();

    let cfg = AppConfig::load().unwrap_or_default();

    let gateway: Arc<dyn TaskGateway> = if cfg.use_mock_or_default() {
        info!("using in-memory mock gateway (TODO_DECK_USE_MOCK)");
        Arc::new(MockGateway::new())
    } else {
        let base_url = cfg.base_url_or_default();
        info!(base_url = %base_url, "using REST gateway");
        Arc::new(
            RestGateway::new(&base_url, cfg.request_timeout_or_default())
                .map_err(|e| anyhow::anyhow!("{}", e))?,
        )
    };

    // --- Notification pump: one toast per terminal outcome ---
    let (notify_tx, notify_rx) = mpsc::unbounded_channel();
    tokio::spawn(toast::run_printer(notify_rx));

    let service = Arc::new(TaskListService::new(gateway, notify_tx));

    // Initial load; a failure is already surfaced as a toast and leaves the
    // (empty) collection in place.
    let _ = service.load_all().await;

    let cli = CliInputPort::new(Arc::clone(&service));
    cli.run().await.map_err(|e| anyhow::anyhow!("{}", e))?;
    Ok(())
}
