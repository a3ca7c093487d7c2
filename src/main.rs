use actix_cors::Cors;
use actix_web::{middleware::from_fn, App, HttpServer};
use anyhow::Context;
use lavado::config::Config;
use lavado::middleware::request_id;
use lavado::AppState;
use tracing_actix_web::TracingLogger;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env().context("Failed to load configuration")?;

    init_tracing(&config.app.log_level, config.app.is_production());

    config.validate().context("Configuration validation failed")?;

    tracing::info!("Starting Lavado point-of-sale backend");
    tracing::info!(
        env = %config.app.env,
        backend = ?config.billing.storage_backend,
        isv_rate = %config.billing.isv_tax_rate,
        invoice_prefix = %config.billing.invoice_prefix,
        "Configuration loaded"
    );

    let state = AppState::from_config(&config)
        .await
        .context("Failed to initialize storage")?;

    // Start HTTP server
    let bind_address = config.server.bind_address();
    let server = HttpServer::new(move || {
        let state = state.clone();
        App::new()
            .wrap(Cors::permissive())
            .wrap(from_fn(request_id))
            .wrap(TracingLogger::default())
            .configure(move |cfg| state.configure(cfg))
    })
    .workers(config.server.workers)
    .shutdown_timeout(config.server.shutdown_timeout_secs)
    .bind(&bind_address)
    .with_context(|| format!("Failed to bind {}", bind_address))?
    .run();

    tracing::info!("Server started at http://{}", bind_address);

    server.await?;
    Ok(())
}

fn init_tracing(log_level: &str, json: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("lavado={},actix_web=info", log_level).into());

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}
