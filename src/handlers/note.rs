use actix_web::{http::StatusCode, web, HttpResponse};
use chrono::Utc;
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use serde_json::json;

use super::{read_form, redirect, render_form};
use crate::{
    auth::CurrentUser,
    errors::ServerError,
    forms::{note::duplicate_slug, FormErrors, NoteForm},
    models::{NewNote, Note, NoteChanges},
    urls, Pool,
};

// Someone else's note is reported exactly like a missing one.
fn owned_note(
    connection: &mut SqliteConnection,
    user: &CurrentUser,
    slug: &str,
) -> Result<Note, ServerError> {
    Note::find_owned(connection, user.id, slug)?.ok_or(ServerError::NotFound)
}

fn invalid(form: &NoteForm, errors: &FormErrors) -> HttpResponse {
    render_form(StatusCode::BAD_REQUEST, form, errors)
}

fn is_unique_violation(err: &DieselError) -> bool {
    matches!(
        err,
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _)
    )
}

pub async fn list(user: CurrentUser, pool: web::Data<Pool>) -> Result<HttpResponse, ServerError> {
    let mut connection = pool.get()?;
    let notes = Note::list_for(&mut connection, user.id)?;

    Ok(HttpResponse::Ok().json(json!({ "object_list": notes })))
}

pub async fn add_form(_user: CurrentUser) -> HttpResponse {
    render_form(StatusCode::OK, &NoteForm::default(), &FormErrors::default())
}

pub async fn add(
    user: CurrentUser,
    payload: web::Payload,
    pool: web::Data<Pool>,
) -> Result<HttpResponse, ServerError> {
    let form = match read_form::<NoteForm>(payload).await? {
        Ok(form) => form,
        Err(errors) => return Ok(invalid(&NoteForm::default(), &errors)),
    };
    let mut connection = pool.get()?;

    let cleaned = match form.clean(|slug| Note::slug_taken(&mut connection, slug, None))? {
        Ok(cleaned) => cleaned,
        Err(errors) => return Ok(invalid(&form, &errors)),
    };

    let new_note = NewNote {
        title: &cleaned.title,
        text: &cleaned.text,
        slug: &cleaned.slug,
        author_id: user.id,
        created_at: Utc::now().naive_utc(),
    };

    match new_note.insert(&mut connection) {
        Ok(note) => {
            log::info!("user {} created note {}", user.id, note.slug);
            Ok(redirect(urls::SUCCESS))
        }
        Err(e) if is_unique_violation(&e) => Ok(invalid(
            &form,
            &FormErrors::single("slug", duplicate_slug(&cleaned.slug)),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn detail(
    user: CurrentUser,
    slug: web::Path<String>,
    pool: web::Data<Pool>,
) -> Result<HttpResponse, ServerError> {
    let mut connection = pool.get()?;
    let note = owned_note(&mut connection, &user, &slug)?;

    Ok(HttpResponse::Ok().json(json!({ "object": note })))
}

pub async fn edit_form(
    user: CurrentUser,
    slug: web::Path<String>,
    pool: web::Data<Pool>,
) -> Result<HttpResponse, ServerError> {
    let mut connection = pool.get()?;
    let note = owned_note(&mut connection, &user, &slug)?;

    Ok(render_form(
        StatusCode::OK,
        &NoteForm::from(&note),
        &FormErrors::default(),
    ))
}

pub async fn edit(
    user: CurrentUser,
    slug: web::Path<String>,
    payload: web::Payload,
    pool: web::Data<Pool>,
) -> Result<HttpResponse, ServerError> {
    let note = {
        let mut connection = pool.get()?;
        owned_note(&mut connection, &user, &slug)?
    };
    let form = match read_form::<NoteForm>(payload).await? {
        Ok(form) => form,
        Err(errors) => return Ok(invalid(&NoteForm::from(&note), &errors)),
    };
    let mut connection = pool.get()?;

    let cleaned = match form.clean(|s| Note::slug_taken(&mut connection, s, Some(note.id)))? {
        Ok(cleaned) => cleaned,
        Err(errors) => return Ok(invalid(&form, &errors)),
    };

    let changes = NoteChanges {
        title: &cleaned.title,
        text: &cleaned.text,
        slug: &cleaned.slug,
    };

    match Note::update(&mut connection, note.id, &changes) {
        Ok(updated) => {
            log::info!("user {} edited note {}", user.id, updated.slug);
            Ok(redirect(urls::SUCCESS))
        }
        Err(e) if is_unique_violation(&e) => Ok(invalid(
            &form,
            &FormErrors::single("slug", duplicate_slug(&cleaned.slug)),
        )),
        Err(e) => Err(e.into()),
    }
}

pub async fn delete_confirm(
    user: CurrentUser,
    slug: web::Path<String>,
    pool: web::Data<Pool>,
) -> Result<HttpResponse, ServerError> {
    let mut connection = pool.get()?;
    let note = owned_note(&mut connection, &user, &slug)?;

    Ok(HttpResponse::Ok().json(json!({ "object": note })))
}

pub async fn delete(
    user: CurrentUser,
    slug: web::Path<String>,
    pool: web::Data<Pool>,
) -> Result<HttpResponse, ServerError> {
    let mut connection = pool.get()?;
    let note = owned_note(&mut connection, &user, &slug)?;

    Note::delete(&mut connection, note.id)?;
    log::info!("user {} deleted note {}", user.id, note.slug);

    Ok(redirect(urls::SUCCESS))
}
