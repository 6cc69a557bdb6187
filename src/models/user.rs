use chrono::NaiveDateTime;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;

use crate::schema::users::{self, dsl};

#[derive(Clone, Debug, Queryable)]
pub struct User {
    pub id: i32,
    pub username: String,
    /// PHC string produced by `auth::hash_password`.
    pub password: String,
    pub date_joined: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = users)]
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub date_joined: NaiveDateTime,
}

impl User {
    pub fn find_by_username(conn: &mut SqliteConnection, name: &str) -> QueryResult<Option<User>> {
        dsl::users
            .filter(dsl::username.eq(name))
            .first::<User>(conn)
            .optional()
    }

    pub fn username_taken(conn: &mut SqliteConnection, name: &str) -> QueryResult<bool> {
        diesel::select(exists(dsl::users.filter(dsl::username.eq(name)))).get_result(conn)
    }

    pub fn exists(conn: &mut SqliteConnection, user_id: i32) -> QueryResult<bool> {
        diesel::select(exists(dsl::users.find(user_id))).get_result(conn)
    }

    pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
        dsl::users.count().get_result(conn)
    }
}

impl<'a> NewUser<'a> {
    pub fn insert(&self, conn: &mut SqliteConnection) -> QueryResult<User> {
        conn.transaction(|conn| {
            diesel::insert_into(dsl::users).values(self).execute(conn)?;
            dsl::users
                .filter(dsl::username.eq(self.username))
                .first::<User>(conn)
        })
    }
}
