// src/main.rs

mod app_state;
mod config;
mod error;
mod jobs;
mod models;
mod store;
mod task_api;

use std::io;

use actix_cors::Cors;
use actix_web::{http, middleware::Logger, web, App, HttpServer};
use env_logger::Env;
use log::{error, info};

use crate::app_state::AppState;
use crate::config::Config;
use crate::jobs::BackgroundJobs;

#[actix_web::main]
async fn main() -> io::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let config = Config::from_env().map_err(|e| {
        error!("Invalid configuration: {}", e);
        io::Error::other(e)
    })?;
    let store = store::connect(&config.database_url, config.database_max_connections)
        .await
        .map_err(|e| {
            error!("Could not open task store: {}", e);
            io::Error::other(e)
        })?;

    let frontend_origin = config.frontend_origin.clone();
    let state = AppState {
        store: store.clone(),
    };

    info!("Server running at http://{}", config.bind_address);
    info!("Allowed CORS Origin: {}", frontend_origin);

    let server = HttpServer::new(move || {
        let cors = Cors::default()
            .allowed_origin(&frontend_origin)
            .allowed_methods(vec!["GET", "POST", "PATCH", "DELETE", "OPTIONS"])
            .allowed_headers(vec![http::header::CONTENT_TYPE, http::header::ACCEPT])
            .max_age(3600);

        App::new()
            .wrap(Logger::default())
            .wrap(cors)
            .app_data(web::Data::new(state.clone()))
            .configure(task_api::configure)
    })
    .bind(&config.bind_address)?
    .run();

    let jobs = BackgroundJobs::start(&config, store.clone());

    // Resolves once actix has finished a graceful shutdown (SIGINT/SIGTERM).
    let result = server.await;

    jobs.shutdown();
    store.close().await;
    info!("Server stopped");
    result
}
