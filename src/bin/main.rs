use std::sync::Arc;

use swapdesk::{
    api::{start_server, ApiState},
    config::Config,
    fees::FeeApiClient,
    poller::RatePoller,
    rates::ExchangeRateClient,
    state::{ClientStateStore, InMemoryStateStore, JsonFileStateStore},
};
use tracing::info;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    // Load environment variables
    dotenv::dotenv().ok();

    let config = Config::from_env();

    if config.rate_endpoint.is_none() {
        info!("EXCHANGE_API_URL not set; serving bundled rates only");
    }
    if config.fee_endpoint.is_none() {
        info!("FEE_API_URL not set; serving bundled fees only");
    }

    info!("Swap engine API server");
    info!("Port: {}", config.port);

    // Create components
    let fees = FeeApiClient::new(config.fee_endpoint.clone());
    let rates = ExchangeRateClient::new(config.rate_endpoint.clone());

    let store: Arc<dyn ClientStateStore> = match &config.state_path {
        Some(path) => {
            info!("Client state backend: json file at {}", path.display());
            Arc::new(JsonFileStateStore::new(path.clone()))
        }
        None => {
            info!("Client state backend: in-memory");
            Arc::new(InMemoryStateStore::new())
        }
    };

    let poller = RatePoller::spawn(rates.clone(), config.poll_interval);
    let state = ApiState::new(fees, rates, store, poller.subscribe());

    info!("Starting API server...");

    tokio::select! {
        result = start_server(state, config.port) => result?,
        _ = tokio::signal::ctrl_c() => {
            info!("Shutting down");
        }
    }

    poller.shutdown();

    Ok(())
}
