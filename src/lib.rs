pub mod application;
pub mod config;
pub mod domain;
pub mod errors;
pub mod handlers;
pub mod infrastructure;
pub mod openapi;

use std::sync::Mutex;

use actix_web::{middleware::Logger, web, App, HttpServer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use application::checkout::CheckoutSession;
use domain::session::Session;
use infrastructure::http_backend::HttpBackend;
use openapi::ApiDoc;

pub use config::Config;

/// Build and return an actix-web `Server` bound to `host:port`.
///
/// All workers share one checkout session: the server is one terminal.
/// The caller is responsible for `.await`-ing (or `tokio::spawn`-ing) the
/// returned server.
pub fn build_server(
    backend: HttpBackend,
    session: Session,
    host: &str,
    port: u16,
) -> std::io::Result<actix_web::dev::Server> {
    let checkout = web::Data::new(Mutex::new(CheckoutSession::new()));
    let backend = web::Data::new(backend);
    let session = web::Data::new(session);
    let openapi = ApiDoc::openapi();

    Ok(HttpServer::new(move || {
        App::new()
            .app_data(checkout.clone())
            .app_data(backend.clone())
            .app_data(session.clone())
            .wrap(Logger::default())
            .configure(handlers::configure::<HttpBackend>)
            .service(
                SwaggerUi::new("/swagger-ui/{_:.*}").url("/api-docs/openapi.json", openapi.clone()),
            )
    })
    .bind((host.to_string(), port))?
    .run())
}
