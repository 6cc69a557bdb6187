use actix_web::{http::header, http::StatusCode, web, HttpResponse};
use futures::StreamExt;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::json;

use crate::{
    auth::CurrentUser,
    errors::ServerError,
    forms::{FormErrors, NON_FIELD_ERRORS},
};

pub mod note;
pub mod user;

/// Largest urlencoded body a form page accepts.
pub const MAX_FORM_BYTES: usize = 2_621_440;

pub async fn index(user: Option<CurrentUser>) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "user": user.map(|u| u.username),
    }))
}

pub async fn success(_user: CurrentUser) -> HttpResponse {
    HttpResponse::Ok().json(json!({
        "message": "Success!",
    }))
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// A page carrying a form, with `errors` empty unless validation failed.
pub(crate) fn render_form<T: Serialize>(
    status: StatusCode,
    form: &T,
    errors: &FormErrors,
) -> HttpResponse {
    HttpResponse::build(status).json(json!({
        "form": form,
        "errors": errors,
    }))
}

/// Reads an urlencoded form off the raw payload. Handlers call this only after
/// the request has been authorized, so a rejected body never hides a 404.
/// Oversized or undecodable bodies come back as form errors.
pub(crate) async fn read_form<T: DeserializeOwned>(
    mut payload: web::Payload,
) -> Result<Result<T, FormErrors>, ServerError> {
    let mut body = web::BytesMut::new();
    while let Some(chunk) = payload.next().await {
        let chunk = chunk?;
        if body.len() + chunk.len() > MAX_FORM_BYTES {
            return Ok(Err(FormErrors::single(
                NON_FIELD_ERRORS,
                format!("The submitted form is larger than {MAX_FORM_BYTES} bytes."),
            )));
        }
        body.extend_from_slice(&chunk);
    }

    match serde_urlencoded::from_bytes::<T>(&body) {
        Ok(form) => Ok(Ok(form)),
        Err(e) => {
            log::debug!("undecodable form body: {e}");
            Ok(Err(FormErrors::single(
                NON_FIELD_ERRORS,
                "The submitted form could not be read.",
            )))
        }
    }
}
