use dotenvy::dotenv;
use warung_pos::build_server;
use warung_pos::infrastructure::http_backend::HttpBackend;
use warung_pos::Config;

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    dotenv().ok();
    env_logger::init_from_env(env_logger::Env::default().default_filter_or("info"));

    let config = Config::from_env().map_err(std::io::Error::other)?;
    let backend = HttpBackend::new(&config.backend).map_err(std::io::Error::other)?;

    log::info!(
        "Terminal for {} ({}) using backend {}",
        config.session.operator,
        config.session.role,
        config.backend.base_url
    );
    log::info!("Starting server at http://{}:{}", config.host, config.port);

    build_server(backend, config.session, &config.host, config.port)?.await
}
