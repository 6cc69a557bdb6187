use actix_web::{
    dev::{ServiceFactory, ServiceRequest, ServiceResponse},
    web, App,
};
use diesel::connection::SimpleConnection;
use diesel::r2d2::ConnectionManager;
use diesel::sqlite::SqliteConnection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};
use jsonwebtoken::{Header, Validation};

pub mod auth;
pub mod config;
pub mod errors;
pub mod forms;
pub mod handlers;
pub mod models;
pub mod schema;
pub mod urls;

use errors::ServerError;

pub type Pool = r2d2::Pool<ConnectionManager<SqliteConnection>>;

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

pub const IN_MEMORY_DATABASE: &str = ":memory:";

/// Shared, read-only state every handler can reach.
#[derive(Clone)]
pub struct AppState {
    pub secret: String,
    pub session_ttl_secs: u64,
    pub jwt_header: Header,
    pub jwt_validator: Validation,
}

impl AppState {
    pub fn new(secret: String, session_ttl_secs: u64) -> Self {
        AppState {
            secret,
            session_ttl_secs,
            jwt_header: Header::default(),
            jwt_validator: Validation::default(),
        }
    }
}

impl From<&config::Config> for AppState {
    fn from(config: &config::Config) -> Self {
        AppState::new(config.secret_key.clone(), config.session_ttl_secs)
    }
}

#[derive(Debug)]
struct SqlitePragmas;

impl r2d2::CustomizeConnection<SqliteConnection, diesel::r2d2::Error> for SqlitePragmas {
    fn on_acquire(&self, conn: &mut SqliteConnection) -> Result<(), diesel::r2d2::Error> {
        conn.batch_execute("PRAGMA foreign_keys = ON; PRAGMA busy_timeout = 5000;")
            .map_err(diesel::r2d2::Error::QueryError)
    }
}

/// An in-memory database lives only as long as its connection, so such a
/// pool holds exactly one connection that is never recycled.
pub fn establish_pool(database_url: &str, size: u32) -> Result<Pool, ServerError> {
    let manager = ConnectionManager::<SqliteConnection>::new(database_url);
    let builder = Pool::builder().connection_customizer(Box::new(SqlitePragmas));

    let pool = if database_url == IN_MEMORY_DATABASE {
        builder
            .max_size(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .build(manager)?
    } else {
        builder.max_size(size).build(manager)?
    };

    Ok(pool)
}

pub fn run_migrations(pool: &Pool) -> Result<(), ServerError> {
    let mut pooled = pool.get()?;
    let connection: &mut SqliteConnection = &mut pooled;

    let applied = connection.run_pending_migrations(MIGRATIONS).map_err(|e| {
        log::error!("{e}");
        ServerError::MigrationError
    })?;
    for version in applied {
        log::info!("applied migration {version}");
    }

    Ok(())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    use handlers::{note, user};

    cfg.service(
        web::resource(urls::HOME)
            .name("notes:home")
            .route(web::get().to(handlers::index)),
    )
    .service(
        web::resource(urls::ADD)
            .name("notes:add")
            .route(web::get().to(note::add_form))
            .route(web::post().to(note::add)),
    )
    .service(
        web::resource(urls::LIST)
            .name("notes:list")
            .route(web::get().to(note::list)),
    )
    .service(
        web::resource(urls::SUCCESS)
            .name("notes:success")
            .route(web::get().to(handlers::success)),
    )
    .service(
        web::resource("/note/{slug}/")
            .name("notes:detail")
            .route(web::get().to(note::detail)),
    )
    .service(
        web::resource("/edit/{slug}/")
            .name("notes:edit")
            .route(web::get().to(note::edit_form))
            .route(web::post().to(note::edit)),
    )
    .service(
        web::resource("/delete/{slug}/")
            .name("notes:delete")
            .route(web::get().to(note::delete_confirm))
            .route(web::post().to(note::delete))
            .route(web::delete().to(note::delete)),
    )
    .service(
        web::resource(urls::LOGIN)
            .name("users:login")
            .route(web::get().to(user::login_form))
            .route(web::post().to(user::login)),
    )
    .service(
        web::resource(urls::LOGOUT)
            .name("users:logout")
            .route(web::get().to(user::logout))
            .route(web::post().to(user::logout)),
    )
    .service(
        web::resource(urls::SIGNUP)
            .name("users:signup")
            .route(web::get().to(user::signup_form))
            .route(web::post().to(user::signup)),
    );
}

/// The application without server-only middleware.
pub fn app(
    pool: Pool,
    state: AppState,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .app_data(web::Data::new(pool))
        .app_data(web::Data::new(state))
        .configure(configure)
}
