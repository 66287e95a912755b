use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use tokend::api;
use tokend::cli;
use tokend::config;
use tokend::service::TokenService;
use tokend::store::postgres::PgStore;
use tokend::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "tokend=debug,tower_http=debug".into()),
        ))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cfg = config::load()?;
    let args = cli::Cli::parse();

    let result = match args.command {
        Some(cli::Commands::Serve { port }) => run_server(cfg, port).await,
        Some(cli::Commands::Token { command }) => {
            let state = connect_state(&cfg).await?;
            handle_token_command(command, &state).await
        }
        Some(cli::Commands::Audit { user_id }) => {
            let state = connect_state(&cfg).await?;
            handle_audit_command(&user_id, &state).await
        }
        None => {
            let port = cfg.port;
            run_server(cfg, port).await
        }
    };

    if let Err(ref e) = result {
        eprintln!("Error: {:?}", e);
    }
    result
}

/// Connect to Postgres and assemble the shared state. The same `PgStore`
/// backs both store contracts.
async fn connect_state(cfg: &config::Config) -> anyhow::Result<Arc<AppState>> {
    let db = PgStore::connect(&cfg.database_url).await?;
    db.migrate().await?;
    let store = Arc::new(db);
    let service = TokenService::new(store.clone(), store.clone());
    Ok(Arc::new(AppState {
        service,
        audit: store,
    }))
}

async fn run_server(cfg: config::Config, port: u16) -> anyhow::Result<()> {
    tracing::info!("Connecting to database...");
    let db = PgStore::connect(&cfg.database_url).await?;

    tracing::info!("Running migrations...");
    db.migrate().await?;

    let store = Arc::new(db);
    let service = TokenService::new(store.clone(), store.clone());
    let state = Arc::new(AppState {
        service,
        audit: store,
    });

    let app = api::router(state)
        .layer(axum::middleware::from_fn(request_id_middleware))
        .layer(axum::middleware::from_fn(security_headers_middleware));

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("Tokend listening on {}", addr);
    axum::serve(listener, app).await?;

    Ok(())
}

/// Middleware: injects a unique X-Request-Id into every response so
/// clients can correlate errors with server logs.
async fn request_id_middleware(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let req_id = uuid::Uuid::new_v4().to_string();
    let mut resp = next.run(req).await;
    if let Ok(val) = axum::http::HeaderValue::from_str(&req_id) {
        resp.headers_mut().insert("x-request-id", val);
    }
    resp
}

/// Middleware: response hardening. Raw secrets transit these responses,
/// so they must never be cached or sniffed.
async fn security_headers_middleware(
    req: axum::extract::Request,
    next: axum::middleware::Next,
) -> axum::response::Response {
    let mut resp = next.run(req).await;
    let headers = resp.headers_mut();

    headers.insert("X-Content-Type-Options", "nosniff".parse().unwrap());
    headers.insert("Cache-Control", "no-store".parse().unwrap());
    headers.insert("Referrer-Policy", "no-referrer".parse().unwrap());
    headers.remove("Server");

    resp
}

async fn handle_token_command(
    cmd: cli::TokenCommands,
    state: &Arc<AppState>,
) -> anyhow::Result<()> {
    match cmd {
        cli::TokenCommands::Generate { user_id } => {
            let issued = state.service.generate(&user_id).await?;
            println!("Token issued for user '{}'.", issued.user_id);
            println!("Secret (shown once, store it now): {}", issued.token);
        }
        cli::TokenCommands::Rotate { token } => {
            let issued = state.service.rotate(&token).await?;
            println!("Token rotated for user '{}'.", issued.user_id);
            println!("New secret (shown once, store it now): {}", issued.token);
        }
        cli::TokenCommands::Invalidate { token } => {
            state.service.invalidate(&token).await?;
            println!("Token invalidated.");
        }
        cli::TokenCommands::List { user_id, active } => {
            let tokens = if active {
                state.service.list_active_tokens(&user_id).await?
            } else {
                state.service.list_tokens(&user_id).await?
            };
            if tokens.is_empty() {
                println!("No tokens for user '{}'.", user_id);
                return Ok(());
            }
            for t in tokens {
                println!(
                    "{}  user={}  active={}  created={}  rotated={}",
                    t.id,
                    t.user_id,
                    t.is_active,
                    t.created_at.to_rfc3339(),
                    t.rotated_at.map(|ts| ts.to_rfc3339()).unwrap_or_else(|| "-".into()),
                );
            }
        }
    }
    Ok(())
}

async fn handle_audit_command(user_id: &str, state: &Arc<AppState>) -> anyhow::Result<()> {
    let logs = state.audit.find_by_user(user_id).await?;
    if logs.is_empty() {
        println!("No audit entries for user '{}'.", user_id);
        return Ok(());
    }
    for entry in logs {
        println!(
            "{}  {}  token={}  user={}",
            entry.timestamp.to_rfc3339(),
            entry.action,
            entry.token_value,
            entry.user_id,
        );
    }
    Ok(())
}
