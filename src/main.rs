use actix_cors::Cors;
use actix_governor::{Governor, GovernorConfigBuilder};
use actix_web::{middleware::Logger, HttpServer};

use ya_note::{config::Config, errors::ServerError, AppState};

fn startup_error(e: ServerError) -> std::io::Error {
    log::error!("startup failed: {e}");
    std::io::Error::new(std::io::ErrorKind::Other, e.to_string())
}

fn cors(origin: Option<&str>) -> Cors {
    match origin {
        Some(origin) => Cors::default()
            .allowed_origin(origin)
            .allow_any_method()
            .allow_any_header()
            .supports_credentials()
            .max_age(3600),
        None => Cors::default(),
    }
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init_from_env(env_logger::Env::new().default_filter_or("info"));

    let config = Config::from_env().map_err(startup_error)?;
    let pool = ya_note::establish_pool(&config.database_url, config.pool_size)
        .map_err(startup_error)?;
    ya_note::run_migrations(&pool).map_err(startup_error)?;
    let state = AppState::from(&config);

    let governor_conf = GovernorConfigBuilder::default()
        .per_second(config.rate_limit_per_second)
        .burst_size(config.rate_limit_burst)
        .finish()
        .ok_or_else(|| {
            startup_error(ServerError::EnvironmentError(
                "RATE_LIMIT_PER_SECOND and RATE_LIMIT_BURST must be positive".to_string(),
            ))
        })?;

    log::info!("listening on 0.0.0.0:{}", config.port);
    let cors_origin = config.cors_origin.clone();

    HttpServer::new(move || {
        ya_note::app(pool.clone(), state.clone())
            .wrap(cors(cors_origin.as_deref()))
            .wrap(Governor::new(&governor_conf))
            .wrap(Logger::default())
    })
    .bind(("0.0.0.0", config.port))?
    .run()
    .await
}
