use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use internship_watch::allowlist::CompanyAllowlist;
use internship_watch::config::{Config, RunMode};
use internship_watch::job::{self, Delivery, RunGuard, ScrapeJob};
use internship_watch::notify::Notifier;
use internship_watch::scrape::Scraper;
use internship_watch::web::{self, AppState};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!("Fatal error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    // Load .env file if present
    let _ = dotenvy::dotenv();

    init_tracing()?;

    info!("Starting internship-watch");

    let config = Config::from_env().context("Failed to load configuration")?;
    config.validate().context("Invalid configuration")?;

    info!(search_url = %config.search_url, mode = ?config.run_mode, "Configuration loaded");

    let allowlist = CompanyAllowlist::load(&config.company_list_path)
        .context("Failed to load company list")?;
    info!(companies = allowlist.len(), "Company list loaded");

    let scraper = Scraper::new(config.search_url.clone(), allowlist, config.request_timeout)
        .context("Failed to build HTTP client")?;

    let delivery = match &config.mail {
        Some(mail) if config.notify_enabled => Some(Delivery {
            notifier: Notifier::new(mail).context("Failed to configure mail relay")?,
            recipient: mail.recipient.clone(),
        }),
        _ => None,
    };

    match config.run_mode {
        RunMode::Once => {
            let scrape_job = ScrapeJob::new(scraper, delivery);
            scrape_job.run().await.context("Failed to send notification")?;
        }
        RunMode::Watch => {
            let scrape_job = Arc::new(ScrapeJob::new(scraper, delivery));
            let watch = tokio::spawn(job::watch_loop(
                scrape_job,
                config.scrape_interval,
                RunGuard::new(),
            ));

            shutdown_signal().await;
            info!("Shutting down...");
            watch.abort();
        }
        RunMode::Serve => {
            let state = AppState {
                scraper,
                guard: RunGuard::new(),
            };
            tokio::select! {
                result = web::serve(&config, state) => result?,
                () = shutdown_signal() => info!("Shutting down..."),
            }
        }
    }

    info!("Shutdown complete");

    Ok(())
}

fn init_tracing() -> Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,internship_watch=debug"));

    // Check if JSON logging is requested
    let use_json = std::env::var("LOG_FORMAT")
        .map(|v| matches!(v.to_lowercase().as_str(), "json" | "structured"))
        .unwrap_or(false);

    if use_json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .try_init()
            .map_err(|e| anyhow::anyhow!("Failed to initialize tracing: {e}"))?;
    }

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
}
