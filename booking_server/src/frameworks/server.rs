use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::sync::Mutex;

use crate::frameworks::{config, db};
use crate::interface_adapters::clients::sms::SmsGatewayClient;
use crate::interface_adapters::routes;
use crate::interface_adapters::state::{
    AppState, InMemoryOtpStore, PostgresQueueStore, PostgresSessionGate, PostgresUserDirectory,
    SystemClock,
};
use crate::use_cases::phone_locks::PhoneLocks;
use crate::use_cases::sweep_codes::SweepCodesUseCase;

fn init_tracing() {
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

pub async fn run() {
    // Load .env locally; safe to ignore when not present.
    let _ = dotenvy::dotenv();
    init_tracing();

    let pool = match db::connect_pool(&config::database_url()).await {
        Ok(pool) => pool,
        Err(error) => {
            tracing::error!(%error, "failed to connect to database");
            return;
        }
    };
    if let Err(error) = db::run_migrations(&pool).await {
        tracing::error!(%error, "failed to run migrations");
        return;
    }

    let sms = match SmsGatewayClient::new(
        config::sms_gateway_url(),
        config::sms_gateway_api_key(),
        config::sms_send_timeout(),
    ) {
        Ok(client) => client,
        Err(error) => {
            tracing::error!(%error, "failed to build sms client");
            return;
        }
    };

    let state = AppState {
        codes: Arc::new(Mutex::new(HashMap::new())),
        phone_locks: Arc::new(PhoneLocks::new()),
        notifier: Arc::new(sms),
        directory: Arc::new(PostgresUserDirectory { db: pool.clone() }),
        gate: Arc::new(PostgresSessionGate { db: pool.clone() }),
        queues: Arc::new(PostgresQueueStore { db: pool }),
    };

    spawn_code_sweeper(state.clone());

    // Wire the HTTP routes for the booking API.
    let app = routes::app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config::http_port()));
    tracing::info!(%addr, "listening");

    // Bind TCP listener with error handling.
    let listener = match tokio::net::TcpListener::bind(addr).await {
        Ok(listener) => listener,
        Err(error) => {
            tracing::error!(%addr, %error, "failed to bind");
            return; // Abort startup on bind failure.
        }
    };

    // Serve app and report errors rather than panicking.
    if let Err(error) = axum::serve(listener, app).await {
        tracing::error!(%error, "server error");
    }
}

// Background cleanup of abandoned codes so the store stays bounded.
fn spawn_code_sweeper(state: AppState) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(config::code_sweep_interval());
        loop {
            ticker.tick().await;

            let use_case = SweepCodesUseCase {
                clock: SystemClock,
                store: InMemoryOtpStore {
                    codes: state.codes.clone(),
                },
            };
            match use_case.execute().await {
                Ok(0) => {}
                Ok(removed) => tracing::debug!(removed, "swept abandoned codes"),
                Err(_) => tracing::warn!("code sweep failed"),
            }

            state.phone_locks.prune().await;
        }
    });
}
