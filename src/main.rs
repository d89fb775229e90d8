use actix_web::middleware::NormalizePath;
use actix_web::{App, HttpServer};
use anyhow::Context;

use hrms_lite::db::init_db;
use hrms_lite::utils::employee_filter::EmployeeIdFilter;
use hrms_lite::{AppState, Config, routes, telemetry};
use tracing::info;

#[actix_web::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::from_env()?;

    // Rolling daily log
    let _guard = telemetry::init(&config.log_dir, "hrms-lite.log");

    info!(addr = %config.server_addr, "Server starting...");

    let pool = init_db(&config.database_url)
        .await
        .with_context(|| format!("Failed to open database {}", config.database_url))?;

    // The filter answers "definitely absent" authoritatively, so it must be
    // complete before the first request is served
    let employee_filter = EmployeeIdFilter::warmed(&pool, 500)
        .await
        .context("Failed to warm up employee id filter")?;

    let state = AppState::new(pool, employee_filter);
    let server_addr = config.server_addr.clone();

    HttpServer::new(move || {
        App::new()
            .wrap(actix_web::middleware::Logger::default())
            .wrap(NormalizePath::trim())
            .configure(|cfg| routes::configure(cfg, &state, &config))
    })
    .bind(&server_addr)
    .with_context(|| format!("Failed to bind {server_addr}"))?
    .run()
    .await?;

    Ok(())
}
