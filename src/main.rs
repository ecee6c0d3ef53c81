use actix_cors::Cors;
use actix_web::{web, App, HttpServer};
use std::sync::Arc;
use tracing::{info, Level};
use tracing_actix_web::TracingLogger;
use tracing_subscriber::EnvFilter;
use utoipa::OpenApi; // bring trait into scope for ApiDoc::openapi()
use utoipa_swagger_ui::SwaggerUi;

use dangermeter::openapi::ApiDoc;
use dangermeter::{config, AppState, FsDocumentStore};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Environment variables are set externally; load .env automatically only
    // in debug builds to reduce manual setup overhead.
    if cfg!(debug_assertions) {
        let _ = dotenv::dotenv();
    }

    // Structured logging initialisation
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(Level::INFO.into()))
        .init();

    info!("Bootstrapping dangermeter server");

    let store = FsDocumentStore::from_env();
    info!("Document path: {}", store.primary_path().display());

    let openapi = ApiDoc::openapi();

    let server = HttpServer::new(move || {
        // The widget is embedded on third-party pages, so any origin may
        // post; only the comment methods are exposed.
        let cors = Cors::default()
            .allow_any_origin()
            .allowed_methods(["POST", "DELETE", "OPTIONS"])
            .allowed_header(actix_web::http::header::CONTENT_TYPE)
            .max_age(3600);

        App::new()
            .wrap(TracingLogger::default())
            .wrap(cors)
            .configure(config)
            .service(SwaggerUi::new("/docs").url("/docs/openapi.json", openapi.clone()))
            .app_data(web::Data::new(AppState {
                store: Arc::new(store.clone()),
            }))
    })
    .bind(("0.0.0.0", 8080))?;

    info!("Listening on http://0.0.0.0:8080 (all interfaces)");

    server.run().await
}
