use anyhow::{Context, Result};
use clap::Parser;
use jobmarket::{
    AppState,
    config::{self, CliArgs, Config},
    create_app, db,
    media::MediaStorage,
    run_migrations,
};
use std::{net::SocketAddr, sync::Arc};
use tracing::info;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

/// Sets up stdout logging, plus a daily rolling file when a log directory is configured
///
/// The returned guard flushes the file writer on drop and must live as long as the server.
fn init_tracing(config: &Config, debug: bool, json: bool) -> Result<Option<WorkerGuard>> {
    let default_level = if debug { "jobmarket=debug,tower_http=debug" } else { "jobmarket=info,tower_http=info" };
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .context("Failed to build log filter")?;

    let (file_layer, guard) = match &config.log_dir {
        Some(dir) => {
            let appender = tracing_appender::rolling::daily(dir, "jobmarket.log");
            let (writer, guard) = tracing_appender::non_blocking(appender);
            (Some(fmt::layer().with_writer(writer).with_ansi(false).json()), Some(guard))
        }
        None => (None, None),
    };

    let registry = tracing_subscriber::registry().with(env_filter).with(file_layer);
    let installed = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer().with_target(false).compact()).try_init()
    };
    installed.context("Failed to install tracing subscriber")?;

    Ok(guard)
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables before clap reads them
    dotenv::dotenv().ok();

    let args = CliArgs::parse();
    let (debug, log_json) = (args.debug, args.log_json);
    let config = config::get_config(args);

    let _log_guard = init_tracing(&config, debug, log_json)?;
    info!(
        database_url = %config.database_url,
        media_root = %config.media_root,
        "Starting jobmarket"
    );

    let pool = db::init_pool(&config.database_url)?;
    {
        let conn = &mut pool.get().context("Failed to get a database connection")?;
        run_migrations(conn)?;
    }

    tokio::fs::create_dir_all(&config.media_root)
        .await
        .with_context(|| format!("Failed to create media root {}", config.media_root))?;

    let state = AppState {
        pool: Arc::new(pool),
        media: Arc::new(MediaStorage::new(&config.media_root, config.media_url_prefix())),
    };
    let app = create_app(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!("Listening on {}", addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
