use actix_web::{http::StatusCode, test};
use serde_json::json;

use ya_note::urls;

mod common;

use common::TestContext;

#[actix_web::test]
async fn anonymous_client_has_no_form() {
    let ctx = TestContext::new();
    let author = ctx.create_user("UserAuthor");
    let note = ctx.create_note(&author, "Заголовок", "Описание", "note_slug");
    let app = test::init_service(ya_note::app(ctx.pool.clone(), ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri(&urls::edit(&note.slug))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::FOUND);
    let body = test::read_body(resp).await;
    assert!(body.is_empty());
}

#[actix_web::test]
async fn authorized_client_has_form() {
    let ctx = TestContext::new();
    let author = ctx.create_user("UserAuthor");
    let note = ctx.create_note(&author, "Заголовок", "Описание", "note_slug");
    let app = test::init_service(ya_note::app(ctx.pool.clone(), ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri(&urls::edit(&note.slug))
        .cookie(ctx.login(&author))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(
        body["form"],
        json!({"title": "Заголовок", "text": "Описание", "slug": "note_slug"})
    );
    assert_eq!(body["errors"], json!({}));
}

#[actix_web::test]
async fn add_page_has_empty_form() {
    let ctx = TestContext::new();
    let author = ctx.create_user("UserAuthor");
    let app = test::init_service(ya_note::app(ctx.pool.clone(), ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri(urls::ADD)
        .cookie(ctx.login(&author))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["form"], json!({"title": "", "text": "", "slug": ""}));
}

#[actix_web::test]
async fn notes_list_holds_only_own_notes() {
    let ctx = TestContext::new();
    let author = ctx.create_user("UserAuthor");
    let reader = ctx.create_user("UserReader");
    ctx.create_note(&author, "First", "Text", "first");
    ctx.create_note(&reader, "Foreign", "Text", "foreign");
    ctx.create_note(&author, "Second", "Text", "second");
    let app = test::init_service(ya_note::app(ctx.pool.clone(), ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri(urls::LIST)
        .cookie(ctx.login(&author))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    let slugs: Vec<&str> = body["object_list"]
        .as_array()
        .unwrap()
        .iter()
        .map(|note| note["slug"].as_str().unwrap())
        .collect();
    assert_eq!(slugs, ["first", "second"]);
}

#[actix_web::test]
async fn detail_page_shows_the_note() {
    let ctx = TestContext::new();
    let author = ctx.create_user("UserAuthor");
    let note = ctx.create_note(&author, "Заголовок", "Описание", "note_slug");
    let app = test::init_service(ya_note::app(ctx.pool.clone(), ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri(&urls::detail(&note.slug))
        .cookie(ctx.login(&author))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["object"]["title"], "Заголовок");
    assert_eq!(body["object"]["text"], "Описание");
    assert_eq!(body["object"]["author_id"], author.id);
}

#[actix_web::test]
async fn home_page_names_the_current_user() {
    let ctx = TestContext::new();
    let author = ctx.create_user("UserAuthor");
    let app = test::init_service(ya_note::app(ctx.pool.clone(), ctx.state.clone())).await;

    let req = test::TestRequest::get().uri(urls::HOME).to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"], serde_json::Value::Null);

    let req = test::TestRequest::get()
        .uri(urls::HOME)
        .cookie(ctx.login(&author))
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body["user"], "UserAuthor");
}
