#![warn(clippy::all, clippy::pedantic)]

use std::net::SocketAddr;

use actix_web::{App, HttpServer, web};
use reachup::HostMonitor;
use tracing::info;

mod error;
mod routes;

use error::AppError;
use logger::init_tracing;

#[actix_web::main]
async fn main() -> Result<(), AppError> {
    init_tracing();

    let addr: SocketAddr = option_env!("REACHUP_HTTP_ADDR").unwrap_or("0.0.0.0:8080").parse()?;

    let monitor = HostMonitor::new();
    monitor.start().await;

    run_server(addr, monitor).await
}

async fn run_server(addr: SocketAddr, monitor: HostMonitor) -> Result<(), AppError> {
    info!(%addr, "reachup server listening");

    let monitor = web::Data::new(monitor);
    HttpServer::new(move || App::new().app_data(monitor.clone()).configure(routes::routes))
        .bind(addr)?
        .run()
        .await?;

    Ok(())
}
