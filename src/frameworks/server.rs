// Framework bootstrap for the QR token issuance service.

use crate::domain::signing::TokenSigner;
use crate::frameworks::config::Settings;
use crate::interface_adapters::routes::app;
use crate::interface_adapters::state::AppState;

use std::net::SocketAddr;
use std::{io::Result, sync::Arc};

fn init_runtime() {
    let _ = dotenvy::dotenv();

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    let json = matches!(std::env::var("LOG_FORMAT").as_deref(), Ok("json"));
    if json {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .json()
            .with_current_span(true)
            .init();
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .compact()
            .init();
    }

    std::panic::set_hook(Box::new(|info| {
        let backtrace = std::backtrace::Backtrace::capture();
        tracing::error!(%info, ?backtrace, "panic");
    }));
}

pub async fn run(listener: tokio::net::TcpListener, settings: Settings) -> Result<()> {
    let address = listener.local_addr()?;
    let state = build_state(&settings)?;
    let app = app(state);

    tracing::info!(%address, lookahead = settings.lookahead.get(), "listening");

    // Serve app and report errors rather than panicking
    axum::serve(listener, app).await.inspect_err(|e| {
        tracing::error!(error = %e, "server error");
    })
}

pub async fn run_with_config() -> Result<()> {
    init_runtime();

    let settings = Settings::load()
        .map_err(std::io::Error::other)
        .inspect_err(|e| {
            tracing::error!(error = %e, "failed to load settings");
        })?;

    let address = SocketAddr::from(([0, 0, 0, 0], settings.port));

    // Bind TCP listener with error handling
    let listener = tokio::net::TcpListener::bind(address)
        .await
        .inspect_err(|e| {
            tracing::error!(%address, error = %e, "failed to bind");
        })?;

    run(listener, settings).await
}

fn build_state(settings: &Settings) -> Result<AppState> {
    let signer = match &settings.secret {
        Some(secret) => {
            let signer = TokenSigner::new(secret)
                .map_err(|e| std::io::Error::other(format!("failed to initialize signer: {e}")))?;
            Some(Arc::new(signer))
        }
        None => {
            // Startup continues; each issuance request reports the missing secret.
            tracing::warn!("QR_SECRET is not configured; token issuance will fail");
            None
        }
    };

    Ok(AppState {
        signer,
        lookahead: settings.lookahead,
    })
}
