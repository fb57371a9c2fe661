use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::EnvFilter;
use trader_assessment::{
    config::{get_config, init_config},
    routes, AppState,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    init_config()?;
    let config = get_config();

    let app_state = AppState::from_config(config).await?;
    {
        let tracker = app_state.tracker.lock().await;
        info!(
            phase = %tracker.phase(),
            questions = tracker.bank().len(),
            scoring_model = %config.scoring_model,
            "Assessment tracker ready"
        );
    }

    let app = routes::router(app_state);

    let listener = TcpListener::bind(&config.server_address).await?;
    info!("Listening on {}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let json = std::env::var("LOG_FORMAT")
        .map(|v| v.eq_ignore_ascii_case("json"))
        .unwrap_or(false);

    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }
}
