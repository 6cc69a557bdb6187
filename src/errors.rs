use actix_web::{http::header, HttpResponse};
use derive_more::Display;

#[derive(Debug, Display)]
pub enum ServerError {
    #[display(fmt = "diesel error")]
    DieselError,
    #[display(fmt = "environment error: {}", _0)]
    EnvironmentError(String),
    #[display(fmt = "pooling error")]
    R2D2Error,
    #[display(fmt = "migration error")]
    MigrationError,
    #[display(fmt = "argon2 error")]
    ArgonError,
    #[display(fmt = "jwt error")]
    JWTError,
    /// Carries the already encoded `next` target for the login redirect.
    #[display(fmt = "authentication required")]
    AuthenticationRequired(String),
    #[display(fmt = "not found")]
    NotFound,
    #[display(fmt = "payload error")]
    PayloadError,
}

impl std::error::Error for ServerError {}

impl From<r2d2::Error> for ServerError {
    fn from(e: r2d2::Error) -> ServerError {
        log::error!("{e}");
        ServerError::R2D2Error
    }
}

impl From<std::env::VarError> for ServerError {
    fn from(e: std::env::VarError) -> ServerError {
        ServerError::EnvironmentError(e.to_string())
    }
}

impl From<diesel::result::Error> for ServerError {
    fn from(e: diesel::result::Error) -> ServerError {
        match e {
            diesel::result::Error::NotFound => ServerError::NotFound,
            e => {
                log::error!("{e}");
                ServerError::DieselError
            }
        }
    }
}

impl From<actix_web::error::PayloadError> for ServerError {
    fn from(e: actix_web::error::PayloadError) -> Self {
        log::warn!("{e}");
        ServerError::PayloadError
    }
}

impl From<jsonwebtoken::errors::Error> for ServerError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        log::error!("{e}");
        ServerError::JWTError
    }
}

impl From<argon2::Error> for ServerError {
    fn from(e: argon2::Error) -> ServerError {
        log::error!("{e}");
        ServerError::ArgonError
    }
}

impl From<argon2::password_hash::Error> for ServerError {
    fn from(e: argon2::password_hash::Error) -> ServerError {
        log::error!("{e}");
        ServerError::ArgonError
    }
}

impl actix_web::error::ResponseError for ServerError {
    fn error_response(&self) -> HttpResponse {
        match self {
            ServerError::DieselError => {
                HttpResponse::InternalServerError().body("Library Error: Diesel Error.")
            }
            ServerError::EnvironmentError(_) => HttpResponse::InternalServerError()
                .body("Server Error: Use of an uninitialized environment variable."),
            ServerError::R2D2Error => {
                HttpResponse::InternalServerError().body("Server Error: Pooling Error.")
            }
            ServerError::MigrationError => {
                HttpResponse::InternalServerError().body("Server Error: Migration Error.")
            }
            ServerError::ArgonError => {
                HttpResponse::InternalServerError().body("Library Error: Argon2 Error.")
            }
            ServerError::JWTError => {
                HttpResponse::InternalServerError().body("Library Error: JWT Library Malfunctioned")
            }
            ServerError::AuthenticationRequired(next) => HttpResponse::Found()
                .insert_header((
                    header::LOCATION,
                    format!("{}?next={}", crate::urls::LOGIN, next),
                ))
                .finish(),
            ServerError::NotFound => HttpResponse::NotFound().body("Not Found"),
            ServerError::PayloadError => {
                HttpResponse::BadRequest().body("Invalid Request: unreadable payload")
            }
        }
    }
}
