//! Main entry point for the Veita registry server.
//!
//! Sets up configuration, logging, and the storage backend, then starts the
//! HTTP server.

use std::sync::Arc;

use actix_web::{App, HttpServer, middleware::Logger, web};
use tracing::info;

use veita_fleet::FleetService;
use veita_persistence::{
    CredentialPersistence, ExternalDbPersistService, InMemoryPersistService, NodePersistence,
    StorageMode,
};
use veita_server::{
    api,
    model::{AppState, config::Configuration},
    startup,
};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let configuration = Configuration::new();

    let logging_config = configuration.logging_config();
    let _logging_guard = startup::init_logging(&logging_config)?;

    let storage_mode = configuration.storage_mode();
    info!("Storage mode: {:?}", storage_mode);

    let (nodes, credentials): (Arc<dyn NodePersistence>, Arc<dyn CredentialPersistence>) =
        match storage_mode {
            StorageMode::External => {
                let db = configuration.database_connection().await?;
                let persist = Arc::new(ExternalDbPersistService::new(db));
                (persist.clone(), persist)
            }
            StorageMode::Memory => {
                info!("Using in-memory storage; fleet state will not survive a restart");
                let persist = Arc::new(InMemoryPersistService::new());
                (persist.clone(), persist)
            }
        };

    let fleet = FleetService::new(nodes, credentials);

    if configuration.admin_token().is_none() {
        tracing::warn!("No admin token configured; registration and key endpoints are disabled");
    }

    let app_state = web::Data::new(AppState {
        configuration: configuration.clone(),
        fleet,
    });

    let address = configuration.server_address();
    let port = configuration.server_port();
    info!("Starting Veita registry server on {}:{}", address, port);

    HttpServer::new(move || {
        App::new()
            .wrap(Logger::default())
            .app_data(app_state.clone())
            .service(api::routes())
    })
    .bind((address, port))?
    .run()
    .await?;

    info!("Veita server shutdown complete");
    Ok(())
}
