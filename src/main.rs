mod auth;
mod booking;
mod catalog;
mod config;
mod db;
mod error;
mod models;
mod phone;
mod privacy;
mod routes;
mod schedule;
mod session;
mod state;

use actix_web::{middleware, web, App, HttpServer};

use crate::{config::Config, state::AppState};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(err) = run().await {
        eprintln!("Startup error: {err}");
        std::process::exit(1);
    }
    Ok(())
}

async fn run() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .init();

    let config = Config::from_env();

    let pool = db::connect(&config.database_url, 5).await?;
    db::run_migrations(&pool).await?;
    if config.seed_defaults {
        db::seed_defaults(&pool, &config.salon_id).await?;
    }

    let address = format!("0.0.0.0:{}", config.port);
    log::info!(
        "Starting Kuaförüm for salon {} on http://{address}",
        config.salon_id
    );

    let state = AppState::new(pool, config);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(state.clone()))
            .wrap(middleware::Logger::default())
            .configure(routes::configure)
    })
    .bind(address)?
    .run()
    .await?;

    Ok(())
}
