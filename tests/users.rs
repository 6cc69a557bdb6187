use actix_web::{http::StatusCode, test};

use ya_note::{auth::SESSION_COOKIE, urls};

mod common;

use common::{assert_redirects, TestContext};

const PASSWORD: &str = "s3cret-pass";

#[actix_web::test]
async fn signup_creates_user_with_hashed_password() {
    let ctx = TestContext::new();
    let app = test::init_service(ya_note::app(ctx.pool.clone(), ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri(urls::SIGNUP)
        .set_form([
            ("username", "UserAuthor"),
            ("password1", PASSWORD),
            ("password2", PASSWORD),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_redirects(&resp, urls::LOGIN);
    let user = ctx.find_user("UserAuthor").unwrap();
    assert_ne!(user.password, PASSWORD);
    assert!(ya_note::auth::verify_password(common::TEST_SECRET, PASSWORD, &user.password).unwrap());
}

#[actix_web::test]
async fn signup_rejects_taken_username() {
    let ctx = TestContext::new();
    ctx.create_user("UserAuthor");
    let app = test::init_service(ya_note::app(ctx.pool.clone(), ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri(urls::SIGNUP)
        .set_form([
            ("username", "UserAuthor"),
            ("password1", PASSWORD),
            ("password2", PASSWORD),
        ])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: serde_json::Value = test::read_body_json(resp).await;
    assert!(body["errors"]["username"].is_array());
    assert!(body["form"].get("password1").is_none());
    assert_eq!(ctx.user_count(), 1);
}

#[actix_web::test]
async fn login_sets_session_and_follows_next() {
    let ctx = TestContext::new();
    ctx.create_user_with_password("UserAuthor", PASSWORD);
    let app = test::init_service(ya_note::app(ctx.pool.clone(), ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri("/auth/login/?next=/notes/")
        .set_form([("username", "UserAuthor"), ("password", PASSWORD)])
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_redirects(&resp, urls::LIST);
    let session = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .unwrap()
        .into_owned();
    assert!(session.http_only().unwrap_or(false));

    let req = test::TestRequest::get()
        .uri(urls::LIST)
        .cookie(session)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
}

#[actix_web::test]
async fn login_ignores_foreign_next() {
    let ctx = TestContext::new();
    ctx.create_user_with_password("UserAuthor", PASSWORD);
    let app = test::init_service(ya_note::app(ctx.pool.clone(), ctx.state.clone())).await;

    for next in [
        "https://evil.example/",
        "//evil.example/",
        "/\t/evil.example/",
        "/\n/evil.example/",
    ] {
        let req = test::TestRequest::post()
            .uri(urls::LOGIN)
            .set_form([
                ("username", "UserAuthor"),
                ("password", PASSWORD),
                ("next", next),
            ])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_redirects(&resp, urls::HOME);
    }
}

#[actix_web::test]
async fn login_rejects_bad_credentials() {
    let ctx = TestContext::new();
    ctx.create_user_with_password("UserAuthor", PASSWORD);
    ctx.create_user("UserReader");
    let app = test::init_service(ya_note::app(ctx.pool.clone(), ctx.state.clone())).await;

    for (username, password) in [
        ("UserAuthor", "wrong-pass"),
        ("Nobody", PASSWORD),
        ("UserReader", "!"),
    ] {
        let req = test::TestRequest::post()
            .uri(urls::LOGIN)
            .set_form([("username", username), ("password", password)])
            .to_request();
        let resp = test::call_service(&app, req).await;

        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{username}");
        assert!(resp
            .response()
            .cookies()
            .all(|c| c.name() != SESSION_COOKIE));
        let body: serde_json::Value = test::read_body_json(resp).await;
        assert!(body["errors"]["__all__"].is_array());
    }
}

#[actix_web::test]
async fn login_page_echoes_next() {
    let ctx = TestContext::new();
    let app = test::init_service(ya_note::app(ctx.pool.clone(), ctx.state.clone())).await;

    let req = test::TestRequest::get()
        .uri("/auth/login/?next=/add/")
        .to_request();
    let body: serde_json::Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["form"]["next"], "/add/");
}

#[actix_web::test]
async fn logout_clears_the_session() {
    let ctx = TestContext::new();
    let author = ctx.create_user("UserAuthor");
    let app = test::init_service(ya_note::app(ctx.pool.clone(), ctx.state.clone())).await;

    let req = test::TestRequest::post()
        .uri(urls::LOGOUT)
        .cookie(ctx.login(&author))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), StatusCode::OK);
    let removal = resp
        .response()
        .cookies()
        .find(|c| c.name() == SESSION_COOKIE)
        .unwrap();
    assert_eq!(removal.value(), "");
}
