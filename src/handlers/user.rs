use actix_web::{http::header, http::StatusCode, web, HttpResponse};
use chrono::Utc;
use serde_derive::Deserialize;
use serde_json::json;

use super::{redirect, render_form};
use crate::{
    auth::{self, CurrentUser},
    errors::ServerError,
    forms::{FormErrors, LoginForm, SignupForm},
    models::{NewUser, User},
    urls, AppState, Pool,
};

#[derive(Deserialize)]
pub struct NextQuery {
    pub next: Option<String>,
}

pub async fn signup_form() -> HttpResponse {
    render_form(StatusCode::OK, &SignupForm::default(), &FormErrors::default())
}

pub async fn signup(
    input: web::Form<SignupForm>,
    pool: web::Data<Pool>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let mut connection = pool.get()?;
    let form = input.into_inner();

    let cleaned = match form.clean(|name| User::username_taken(&mut connection, name))? {
        Ok(cleaned) => cleaned,
        Err(errors) => return Ok(render_form(StatusCode::BAD_REQUEST, &form, &errors)),
    };

    let password = auth::hash_password(&state.secret, &cleaned.password)?;
    let user = NewUser {
        username: &cleaned.username,
        password: &password,
        date_joined: Utc::now().naive_utc(),
    }
    .insert(&mut connection)?;
    log::info!("signed up user {} ({})", user.id, user.username);

    Ok(redirect(urls::LOGIN))
}

pub async fn login_form(query: web::Query<NextQuery>) -> HttpResponse {
    let form = LoginForm {
        next: query.into_inner().next,
        ..LoginForm::default()
    };
    render_form(StatusCode::OK, &form, &FormErrors::default())
}

pub async fn login(
    input: web::Form<LoginForm>,
    query: web::Query<NextQuery>,
    pool: web::Data<Pool>,
    state: web::Data<AppState>,
) -> Result<HttpResponse, ServerError> {
    let mut form = input.into_inner();
    if form.next.as_deref().map_or(true, str::is_empty) {
        form.next = query.into_inner().next;
    }

    if let Err(errors) = form.clean() {
        return Ok(render_form(StatusCode::BAD_REQUEST, &form, &errors));
    }

    let mut connection = pool.get()?;
    let verified = match User::find_by_username(&mut connection, form.username.trim())? {
        Some(user) => auth::verify_password(&state.secret, &form.password, &user.password)?
            .then_some(user),
        None => {
            auth::verify_unknown_user(&state.secret, &form.password)?;
            None
        }
    };
    let user = match verified {
        Some(user) => user,
        None => {
            log::warn!("failed login for {:?}", form.username);
            return Ok(render_form(
                StatusCode::BAD_REQUEST,
                &form,
                &LoginForm::invalid_credentials(),
            ));
        }
    };

    let token = auth::issue_session(&state, &user)?;
    let location = auth::safe_next(form.next.as_deref()).unwrap_or(urls::HOME);
    log::info!("user {} logged in", user.id);

    Ok(HttpResponse::Found()
        .insert_header((header::LOCATION, location))
        .cookie(auth::session_cookie(token))
        .finish())
}

pub async fn logout(user: Option<CurrentUser>) -> HttpResponse {
    if let Some(user) = user {
        log::info!("user {} logged out", user.id);
    }

    HttpResponse::Ok()
        .cookie(auth::removal_cookie())
        .json(json!({ "message": "You have been logged out." }))
}
