//! salon-server: booking lifecycle and notification service
//!
//! Serves the HTTP API and runs two background workers: the email outbox
//! deliverer and the appointment reminder scheduler.

use std::sync::Arc;

use salon_server::config::BoxError;
use salon_server::core::{BackgroundTasks, TaskKind};
use salon_server::notify::{LogMailer, Mailer, SmtpMailer};
use salon_server::utils::logger::{LOG_RETENTION_DAYS, cleanup_old_logs};
use salon_server::{AppState, Config, DbService, api, init_logger};
use tokio_util::sync::CancellationToken;

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    // Load .env file
    let _ = dotenvy::dotenv();

    let config = Config::from_env()?;
    init_logger(config.log_level.as_deref(), config.log_dir.as_deref());

    tracing::info!("Starting salon-server (env: {})", config.environment);

    let db = DbService::new(&config.database_url).await?;

    let mailer: Arc<dyn Mailer> = match &config.smtp {
        Some(smtp) => {
            tracing::info!(host = %smtp.host, port = smtp.port, "SMTP delivery enabled");
            Arc::new(SmtpMailer::new(
                &smtp.host,
                smtp.port,
                smtp.username.clone(),
                smtp.password.clone(),
            )?)
        }
        None => {
            tracing::warn!("SMTP_HOST not set, emails will only be logged");
            Arc::new(LogMailer)
        }
    };

    let http_port = config.http_port;
    let log_dir = config.log_dir.clone();
    let state = AppState::new(db.pool.clone(), config);

    let mut tasks = BackgroundTasks::new();
    let shutdown = tasks.shutdown_token();
    tasks.spawn(
        "email_outbox",
        TaskKind::Worker,
        state.email_worker(mailer).run(shutdown.clone()),
    );
    tasks.spawn(
        "booking_reminders",
        TaskKind::Periodic,
        state.reminder_scheduler().run(shutdown.clone()),
    );
    if let Some(dir) = log_dir {
        tasks.spawn(
            "log_cleanup",
            TaskKind::Periodic,
            log_cleanup(dir.into(), shutdown.clone()),
        );
    }
    tasks.log_summary();

    let app = api::build_app(state);
    let addr = format!("0.0.0.0:{http_port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("salon-server HTTP listening on {addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tasks.shutdown().await;
    db.pool.close().await;
    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Daily removal of expired log files
async fn log_cleanup(dir: std::path::PathBuf, shutdown: CancellationToken) {
    let mut interval = tokio::time::interval(std::time::Duration::from_secs(24 * 3600));
    loop {
        tokio::select! {
            _ = shutdown.cancelled() => break,
            _ = interval.tick() => {
                if let Err(e) = cleanup_old_logs(&dir, LOG_RETENTION_DAYS) {
                    tracing::warn!(error = %e, "Log cleanup failed");
                }
            }
        }
    }
}

async fn shutdown_signal() {
    use tokio::signal;

    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C signal, shutting down gracefully...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM signal, shutting down gracefully...");
        },
    }
}
