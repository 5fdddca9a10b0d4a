use std::{net::SocketAddr, sync::Arc, time::Duration};

use anyhow::Context;
use tokio::{signal, sync::mpsc};
use tracing::{error, info};

use erp_rules as app;
use app::jobs::{InMemoryJobQueue, JobQueue};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cfg = app::config::load_config()?;
    app::config::init_tracing(cfg.log_level(), cfg.log_json);

    // Init DB
    let db_pool = app::db::establish_connection_from_app_config(&cfg).await?;
    if cfg.auto_migrate {
        app::db::run_migrations(&db_pool).await.map_err(|e| {
            error!("Failed running migrations: {}", e);
            e
        })?;
    }
    let db = Arc::new(db_pool);

    // Init events
    let (event_tx, event_rx) = mpsc::channel(cfg.event_channel_capacity);
    let event_sender = app::events::EventSender::new(event_tx);
    tokio::spawn(app::events::process_events(
        event_rx,
        vec![Box::new(app::events::LoggingEventHandler)],
    ));

    let window = cfg
        .stock_reposting
        .window()
        .context("invalid stock_reposting window")?;
    let repost_interval = Duration::from_secs(cfg.stock_reposting.repost_interval_secs);

    // Services and background work
    let job_queue: Arc<dyn JobQueue> = Arc::new(InMemoryJobQueue::new());
    let factory = app::services::factory::ServiceFactory::new(
        db.clone(),
        event_sender,
        job_queue.clone(),
        Arc::new(cfg.clone()),
    );

    app::services::background::BackgroundWorker::new(
        job_queue.clone(),
        factory.payroll_entry_service(),
        factory.repost_item_valuation_service(),
        window,
    )
    .start();
    app::services::background::start_repost_scheduler(job_queue, repost_interval);

    let router = app::build_router(app::AppState::new(&factory, db));

    // Bind and serve
    let host: std::net::IpAddr = cfg
        .host
        .parse()
        .with_context(|| format!("invalid host {}", cfg.host))?;
    let addr = SocketAddr::from((host, cfg.port));
    info!("erp-rules listening on http://{}", addr);
    let listener = tokio::net::TcpListener::bind(addr).await?;

    axum::serve(listener, router.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!("failed to install Ctrl+C handler: {}", e);
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};
        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => error!("failed to install SIGTERM handler: {}", e),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
