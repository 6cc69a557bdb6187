#![allow(dead_code)]

use actix_web::{cookie::Cookie, dev::ServiceResponse, http::header, http::StatusCode};
use chrono::Utc;
use diesel::prelude::*;

use ya_note::{
    auth,
    models::{NewNote, NewUser, Note, User},
    schema::{notes, users},
    AppState, Pool,
};

pub const TEST_SECRET: &str = "integration-test-secret";

/// A fresh in-memory database plus the state the app is built with.
pub struct TestContext {
    pub pool: Pool,
    pub state: AppState,
}

impl TestContext {
    pub fn new() -> Self {
        let pool = ya_note::establish_pool(ya_note::IN_MEMORY_DATABASE, 1).unwrap();
        ya_note::run_migrations(&pool).unwrap();
        TestContext {
            pool,
            state: AppState::new(TEST_SECRET.to_string(), 3600),
        }
    }

    /// A user that cannot log in with a password, only through `login`.
    pub fn create_user(&self, username: &str) -> User {
        self.insert_user(username, "!")
    }

    pub fn create_user_with_password(&self, username: &str, password: &str) -> User {
        let hash = auth::hash_password(TEST_SECRET, password).unwrap();
        self.insert_user(username, &hash)
    }

    fn insert_user(&self, username: &str, password: &str) -> User {
        let mut connection = self.pool.get().unwrap();
        NewUser {
            username,
            password,
            date_joined: Utc::now().naive_utc(),
        }
        .insert(&mut connection)
        .unwrap()
    }

    pub fn create_note(&self, author: &User, title: &str, text: &str, slug: &str) -> Note {
        let mut connection = self.pool.get().unwrap();
        NewNote {
            title,
            text,
            slug,
            author_id: author.id,
            created_at: Utc::now().naive_utc(),
        }
        .insert(&mut connection)
        .unwrap()
    }

    pub fn note_count(&self) -> i64 {
        let mut connection = self.pool.get().unwrap();
        Note::count(&mut connection).unwrap()
    }

    pub fn user_count(&self) -> i64 {
        let mut connection = self.pool.get().unwrap();
        User::count(&mut connection).unwrap()
    }

    pub fn delete_user(&self, user: &User) {
        let mut connection = self.pool.get().unwrap();
        diesel::delete(users::table.find(user.id))
            .execute(&mut *connection)
            .unwrap();
    }

    pub fn refresh(&self, note: &Note) -> Note {
        let mut connection = self.pool.get().unwrap();
        notes::table
            .find(note.id)
            .first::<Note>(&mut *connection)
            .unwrap()
    }

    pub fn find_note(&self, slug: &str) -> Option<Note> {
        let mut connection = self.pool.get().unwrap();
        Note::find_by_slug(&mut connection, slug).unwrap()
    }

    pub fn find_user(&self, username: &str) -> Option<User> {
        let mut connection = self.pool.get().unwrap();
        User::find_by_username(&mut connection, username).unwrap()
    }

    /// Session cookie for `user`, as if they had just logged in.
    pub fn login(&self, user: &User) -> Cookie<'static> {
        auth::session_cookie(auth::issue_session(&self.state, user).unwrap())
    }
}

pub fn location(resp: &ServiceResponse) -> Option<&str> {
    resp.headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

pub fn assert_redirects(resp: &ServiceResponse, expected: &str) {
    assert_eq!(resp.status(), StatusCode::FOUND, "expected a redirect");
    assert_eq!(location(resp), Some(expected));
}
