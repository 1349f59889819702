use std::{future::Future, net::SocketAddr, sync::Arc};

use axum::Router;
use configs::{AppConfig, DatabaseKind};
use service::user::{InMemoryUserRepository, SeaOrmUserRepository, UserPolicy, UserRepository};
use tower_http::cors::CorsLayer;
use tracing::{info, warn};

use crate::routes;
use crate::state::AppState;

fn build_cors() -> CorsLayer {
    CorsLayer::very_permissive()
}

fn bind_addr(cfg: &AppConfig) -> anyhow::Result<SocketAddr> {
    Ok(format!("{}:{}", cfg.server.host, cfg.server.port).parse()?)
}

/// Pick the repository from `database.url` and wire the user service.
pub async fn build_state(cfg: &AppConfig) -> anyhow::Result<AppState> {
    let repo: Arc<dyn UserRepository> = match cfg.database.kind()? {
        DatabaseKind::Memory => {
            warn!("database.url is memory://; users are lost on restart");
            Arc::new(InMemoryUserRepository::new())
        }
        DatabaseKind::Postgres | DatabaseKind::Sqlite => {
            let db = models::db::connect_and_migrate(&cfg.database).await?;
            Arc::new(SeaOrmUserRepository::new(db))
        }
    };
    let policy = UserPolicy { min_age: cfg.users.min_age };
    info!(min_age = policy.min_age, "user policy loaded");
    Ok(AppState::new(repo, policy))
}

pub fn build_app(state: AppState) -> Router {
    routes::build_router(state, build_cors())
}

/// Serve until `shutdown` resolves, then drain in-flight requests.
pub async fn run_until<F>(cfg: AppConfig, shutdown: F) -> anyhow::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let state = build_state(&cfg).await?;
    let app = build_app(state);

    let addr = bind_addr(&cfg)?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!(%addr, "starting users api");
    axum::serve(listener, app).with_graceful_shutdown(shutdown).await?;
    info!("users api stopped");
    Ok(())
}
