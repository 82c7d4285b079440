mod admin;
mod app;
mod auth;
mod catalog;
mod config;
mod enquiries;
mod error;
mod export;
mod newsletter;
mod pagination;
mod state;
mod validation;

use crate::{app::build_app, state::AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = std::env::var("RUST_LOG")
        .unwrap_or_else(|_| "storefront=debug,axum=info,tower_http=info".to_string());
    let json_logs = std::env::var("LOG_FORMAT")
        .map(|v| v == "json")
        .unwrap_or(false);

    if json_logs {
        tracing_subscriber::fmt()
            .with_env_filter(env_filter)
            .with_target(false)
            .json()
            .init();
    } else {
        tracing_subscriber::fmt().with_env_filter(env_filter).init();
    }

    // `storefront hash-password <plain>` prints a value usable as ADMIN_PASSWORD.
    let args: Vec<String> = std::env::args().skip(1).collect();
    if let [cmd, plain] = args.as_slice() {
        if cmd == "hash-password" {
            println!("{}", auth::credentials::hash_password(plain)?);
            return Ok(());
        }
    }

    let app_state = AppState::init().await?;

    // Run migrations if present
    if let Err(e) = sqlx::migrate!("./migrations").run(&app_state.db).await {
        tracing::warn!(error = %e, "migration failed; continuing");
    }

    app::serve(build_app(app_state)).await
}
