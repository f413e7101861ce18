use anyhow::Result;
use statboard::*;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt::time::FormatTime;

#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

struct LocalTimer;

impl FormatTime for LocalTimer {
    fn format_time(&self, w: &mut tracing_subscriber::fmt::format::Writer<'_>) -> std::fmt::Result {
        write!(
            w,
            "{}",
            chrono::Local::now().format("%Y-%m-%dT%H:%M:%S%.3f%:z")
        )
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_timer(LocalTimer)
        .with_env_filter(filter)
        .init();

    let app_config = config::AppConfig::load()?;
    let publisher = dashboard::ViewPublisher::new(app_config.publishing.broadcast_capacity);
    let feed_client = feed::FeedClient::new(&app_config.feed)?;
    tracing::info!(
        url = %feed_client.url(),
        refresh_interval_ms = app_config.refresh.interval_ms,
        "polling stats feed"
    );

    let controller = dashboard::DashboardController::new(
        feed_client,
        app_config.publishing.recent_window,
        publisher.clone(),
    );
    let (shutdown_tx, shutdown_rx) = tokio::sync::oneshot::channel();
    let dashboard_handle = dashboard::spawn(
        controller,
        std::time::Duration::from_millis(app_config.refresh.interval_ms),
        shutdown_rx,
    );

    let app = routes::app(&publisher);
    let addr = format!("{}:{}", app_config.server.host, app_config.server.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Listening on http://{}", addr);

    tokio::select! {
        result = axum::serve(listener, app) => {
            result?;
        }
        _ = async {
            #[cfg(unix)]
            {
                let mut sigterm = match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
                    Ok(s) => s,
                    Err(_) => {
                        let _ = tokio::signal::ctrl_c().await;
                        return;
                    }
                };
                tokio::select! {
                    _ = tokio::signal::ctrl_c() => {}
                    _ = sigterm.recv() => {}
                }
            }
            #[cfg(not(unix))]
            {
                let _ = tokio::signal::ctrl_c().await;
            }
        } => {
            tracing::info!("Received shutdown signal");
            let _ = shutdown_tx.send(());
            let _ = dashboard_handle.await;
        }
    }

    Ok(())
}
