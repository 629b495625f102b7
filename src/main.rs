use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use revision_scheduler::config::Config;
use revision_scheduler::handlers;
use revision_scheduler::state::AppState;

#[tokio::main]
async fn main() {
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "revision_scheduler=debug,tower_http=debug".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  let config = Config::load();
  let state = AppState::from_config(&config).expect("Failed to open review stores");
  let app = handlers::router(state);

  let bind_addr = config.server_bind_addr();
  let listener = tokio::net::TcpListener::bind(&bind_addr)
    .await
    .unwrap_or_else(|_| panic!("Failed to bind to {}", bind_addr));

  tracing::info!("Server running on http://localhost:{}", config.server_port);

  axum::serve(listener, app)
    .await
    .expect("Server failed to start");
}
