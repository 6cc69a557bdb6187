//! Paths of every named route.

pub const HOME: &str = "/";
pub const ADD: &str = "/add/";
pub const LIST: &str = "/notes/";
pub const SUCCESS: &str = "/done/";

pub const LOGIN: &str = "/auth/login/";
pub const LOGOUT: &str = "/auth/logout/";
pub const SIGNUP: &str = "/auth/signup/";

pub fn detail(slug: &str) -> String {
    format!("/note/{slug}/")
}

pub fn edit(slug: &str) -> String {
    format!("/edit/{slug}/")
}

pub fn delete(slug: &str) -> String {
    format!("/delete/{slug}/")
}
