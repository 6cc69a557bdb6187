use std::future::{ready, Ready};

use actix_web::{
    cookie::{Cookie, SameSite},
    dev::Payload,
    web, FromRequest, HttpRequest,
};
use argon2::{
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Algorithm, Argon2, Params, Version,
};
use jsonwebtoken::{decode, encode, get_current_timestamp, DecodingKey, EncodingKey};
use percent_encoding::{utf8_percent_encode, AsciiSet, CONTROLS};
use rand::rngs::OsRng;
use serde_derive::{Deserialize, Serialize};

use crate::{errors::ServerError, models::User, AppState, Pool};

pub const SESSION_COOKIE: &str = "sessionid";

// `/` stays literal so the login page receives a readable path.
const NEXT_ENCODE_SET: &AsciiSet = &CONTROLS
    .add(b' ')
    .add(b'"')
    .add(b'#')
    .add(b'%')
    .add(b'&')
    .add(b'+')
    .add(b'<')
    .add(b'=')
    .add(b'>')
    .add(b'?')
    .add(b'`')
    .add(b'{')
    .add(b'}');

#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub username: String,
    pub iat: u64,
    pub exp: u64,
}

/// An authenticated request's user. Extracting it on an anonymous request
/// fails with a redirect to the login page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CurrentUser {
    pub id: i32,
    pub username: String,
}

impl FromRequest for CurrentUser {
    type Error = ServerError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _: &mut Payload) -> Self::Future {
        ready(match authenticate(req) {
            Ok(Some(user)) => Ok(user),
            Ok(None) => Err(ServerError::AuthenticationRequired(next_param(req))),
            Err(e) => Err(e),
        })
    }
}

// A valid token whose user has since been deleted counts as anonymous.
fn authenticate(req: &HttpRequest) -> Result<Option<CurrentUser>, ServerError> {
    let (state, pool) = match (
        req.app_data::<web::Data<AppState>>(),
        req.app_data::<web::Data<Pool>>(),
    ) {
        (Some(state), Some(pool)) => (state, pool),
        _ => {
            log::error!("AppState or Pool is not registered, every request is anonymous");
            return Ok(None);
        }
    };
    let claims = match req
        .cookie(SESSION_COOKIE)
        .and_then(|cookie| decode_session(state, cookie.value()))
    {
        Some(claims) => claims,
        None => return Ok(None),
    };
    let id = match claims.sub.parse::<i32>() {
        Ok(id) => id,
        Err(_) => return Ok(None),
    };

    let mut connection = pool.get()?;
    if !User::exists(&mut connection, id)? {
        log::info!("session for deleted user {id} ignored");
        return Ok(None);
    }

    Ok(Some(CurrentUser {
        id,
        username: claims.username,
    }))
}

/// Path and query of the request, encoded for use as the `next` parameter.
pub fn next_param(req: &HttpRequest) -> String {
    let target = req
        .uri()
        .path_and_query()
        .map(|pq| pq.as_str())
        .unwrap_or_else(|| req.path());
    utf8_percent_encode(target, NEXT_ENCODE_SET).to_string()
}

/// Only local absolute paths are followed after login. Browsers drop tabs and
/// newlines from URLs, so any control or whitespace character disqualifies.
pub fn safe_next(next: Option<&str>) -> Option<&str> {
    next.filter(|n| {
        n.starts_with('/')
            && !n.starts_with("//")
            && !n.contains('\\')
            && !n.chars().any(|c| c.is_control() || c.is_whitespace())
    })
}

pub fn issue_session(state: &AppState, user: &User) -> Result<String, ServerError> {
    let now = get_current_timestamp();
    let claims = Claims {
        sub: user.id.to_string(),
        username: user.username.clone(),
        iat: now,
        exp: now + state.session_ttl_secs,
    };

    Ok(encode(
        &state.jwt_header,
        &claims,
        &EncodingKey::from_secret(state.secret.as_bytes()),
    )?)
}

pub fn decode_session(state: &AppState, token: &str) -> Option<Claims> {
    match decode::<Claims>(
        token,
        &DecodingKey::from_secret(state.secret.as_bytes()),
        &state.jwt_validator,
    ) {
        Ok(data) => Some(data.claims),
        Err(e) => {
            log::debug!("rejected session token: {e}");
            None
        }
    }
}

pub fn session_cookie(token: String) -> Cookie<'static> {
    Cookie::build(SESSION_COOKIE, token)
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .finish()
}

pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE, "").path("/").finish();
    cookie.make_removal();
    cookie
}

fn hasher(secret: &[u8]) -> Result<Argon2<'_>, ServerError> {
    Ok(Argon2::new_with_secret(
        secret,
        Algorithm::default(),
        Version::default(),
        Params::default(),
    )?)
}

pub fn hash_password(secret: &str, password: &str) -> Result<String, ServerError> {
    let salt = SaltString::generate(&mut OsRng);
    Ok(hasher(secret.as_bytes())?
        .hash_password(password.as_bytes(), &salt)?
        .to_string())
}

/// Burns the same argon2 work as a real check so a login for an unknown
/// username takes as long as one with a wrong password. Always `false`.
pub fn verify_unknown_user(secret: &str, password: &str) -> Result<bool, ServerError> {
    hash_password(secret, password)?;
    Ok(false)
}

/// A stored value that is not a PHC string is an unusable password and
/// matches nothing.
pub fn verify_password(secret: &str, password: &str, hash: &str) -> Result<bool, ServerError> {
    let parsed_hash = match PasswordHash::new(hash) {
        Ok(parsed_hash) => parsed_hash,
        Err(e) => {
            log::warn!("stored password is not usable: {e}");
            return Ok(false);
        }
    };
    Ok(hasher(secret.as_bytes())?
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}
