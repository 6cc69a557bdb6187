use diesel::QueryResult;
use serde_derive::{Deserialize, Serialize};

use super::{max_length, FormErrors, NON_FIELD_ERRORS, REQUIRED};

pub const MAX_USERNAME_LENGTH: usize = 150;
pub const MIN_PASSWORD_LENGTH: usize = 8;

pub const INVALID_LOGIN: &str = "Please enter a correct username and password. \
     Note that both fields may be case-sensitive.";

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct SignupForm {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password1: String,
    #[serde(default, skip_serializing)]
    pub password2: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanSignup {
    pub username: String,
    pub password: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct LoginForm {
    #[serde(default)]
    pub username: String,
    #[serde(default, skip_serializing)]
    pub password: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
}

fn is_valid_username(value: &str) -> bool {
    value
        .chars()
        .all(|c| c.is_alphanumeric() || matches!(c, '_' | '@' | '.' | '+' | '-'))
}

impl SignupForm {
    pub fn clean<F>(&self, username_taken: F) -> QueryResult<Result<CleanSignup, FormErrors>>
    where
        F: FnOnce(&str) -> QueryResult<bool>,
    {
        let mut errors = FormErrors::default();

        let username = self.username.trim();
        if username.is_empty() {
            errors.add("username", REQUIRED);
        } else {
            max_length(&mut errors, "username", username, MAX_USERNAME_LENGTH);
            if !is_valid_username(username) {
                errors.add(
                    "username",
                    "Enter a valid username. This value may contain only letters, \
                     numbers, and @/./+/-/_ characters.",
                );
            }
            if !errors.has("username") && username_taken(username)? {
                errors.add("username", "A user with that username already exists.");
            }
        }

        if self.password1.is_empty() {
            errors.add("password1", REQUIRED);
        }
        if self.password2.is_empty() {
            errors.add("password2", REQUIRED);
        }

        if !self.password1.is_empty() && !self.password2.is_empty() {
            if self.password1 != self.password2 {
                errors.add("password2", "The two password fields didn’t match.");
            } else {
                let password = self.password1.as_str();
                if password.chars().count() < MIN_PASSWORD_LENGTH {
                    errors.add(
                        "password2",
                        format!(
                            "This password is too short. It must contain at least \
                             {MIN_PASSWORD_LENGTH} characters."
                        ),
                    );
                }
                if password.chars().all(|c| c.is_ascii_digit()) {
                    errors.add("password2", "This password is entirely numeric.");
                }
                if !username.is_empty() && password.eq_ignore_ascii_case(username) {
                    errors.add("password2", "The password is too similar to the username.");
                }
            }
        }

        Ok(errors.finish(CleanSignup {
            username: username.to_string(),
            password: self.password1.clone(),
        }))
    }
}

impl LoginForm {
    /// Field presence only; credentials are checked against the store.
    pub fn clean(&self) -> Result<(), FormErrors> {
        let mut errors = FormErrors::default();
        if self.username.trim().is_empty() {
            errors.add("username", REQUIRED);
        }
        if self.password.is_empty() {
            errors.add("password", REQUIRED);
        }
        errors.finish(())
    }

    pub fn invalid_credentials() -> FormErrors {
        FormErrors::single(NON_FIELD_ERRORS, INVALID_LOGIN)
    }
}
