// INICIO DEL ARCHIVO [apps/gateway/src/main.rs]
/*!
 * =================================================================
 * APARATO: GATEWAY ENTRYPOINT (ESTRATO L1-APP)
 * RESPONSABILIDAD: IGNICION DEL PROCESO Y SERVIDO HTTP SOBERANO
 * =================================================================
 */

mod errors;
mod handlers;
mod middleware;
mod routes;
mod state;

use state::AppState;
use std::net::{IpAddr, SocketAddr};
use tracing::{error, info};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();
    connectbridge_models::telemetry::init_tracing("connectbridge_gateway");

    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;

    runtime.block_on(async {
        info!("🚀 [GATEWAY]: ignition sequence starting...");

        let app_state = AppState::ignite().await;

        let port: u16 = std::env::var("PORT").ok().and_then(|v| v.parse().ok()).unwrap_or(8080);

        let router = routes::build_router(app_state);

        let bind_address = SocketAddr::new("0.0.0.0".parse::<IpAddr>().unwrap(), port);

        let listener = tokio::net::TcpListener::bind(bind_address)
            .await
            .expect("CRITICAL_FAULT: failed to bind network port.");

        info!("🚀 [GATEWAY_ONLINE]: listening at {}", bind_address);

        if let Err(server_error) = axum::serve(listener, router).await {
            error!("💀 [GATEWAY_COLLAPSE]: runtime failure: {}", server_error);
            std::process::exit(1);
        }

        Ok(())
    })
}
// FIN DEL ARCHIVO [apps/gateway/src/main.rs]
