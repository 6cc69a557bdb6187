use chrono::NaiveDateTime;
use diesel::dsl::exists;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use serde_derive::Serialize;

use crate::schema::notes::{self, dsl};

#[derive(Clone, Debug, Queryable, Serialize, PartialEq, Eq)]
pub struct Note {
    pub id: i32,
    pub title: String,
    pub text: String,
    pub slug: String,
    pub author_id: i32,
    pub created_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = notes)]
pub struct NewNote<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub slug: &'a str,
    pub author_id: i32,
    pub created_at: NaiveDateTime,
}

/// Fields an edit may touch. The author is deliberately absent.
#[derive(Debug, AsChangeset)]
#[diesel(table_name = notes)]
pub struct NoteChanges<'a> {
    pub title: &'a str,
    pub text: &'a str,
    pub slug: &'a str,
}

impl Note {
    pub fn count(conn: &mut SqliteConnection) -> QueryResult<i64> {
        dsl::notes.count().get_result(conn)
    }

    /// Looks a note up by slug, but only among the notes of `author`.
    pub fn find_owned(
        conn: &mut SqliteConnection,
        author: i32,
        note_slug: &str,
    ) -> QueryResult<Option<Note>> {
        dsl::notes
            .filter(dsl::slug.eq(note_slug))
            .filter(dsl::author_id.eq(author))
            .first::<Note>(conn)
            .optional()
    }

    pub fn find_by_slug(conn: &mut SqliteConnection, note_slug: &str) -> QueryResult<Option<Note>> {
        dsl::notes
            .filter(dsl::slug.eq(note_slug))
            .first::<Note>(conn)
            .optional()
    }

    pub fn list_for(conn: &mut SqliteConnection, author: i32) -> QueryResult<Vec<Note>> {
        dsl::notes
            .filter(dsl::author_id.eq(author))
            .order(dsl::id.asc())
            .load::<Note>(conn)
    }

    /// Whether `note_slug` is used by any note other than `except`.
    pub fn slug_taken(
        conn: &mut SqliteConnection,
        note_slug: &str,
        except: Option<i32>,
    ) -> QueryResult<bool> {
        match except {
            Some(own_id) => diesel::select(exists(
                dsl::notes
                    .filter(dsl::slug.eq(note_slug))
                    .filter(dsl::id.ne(own_id)),
            ))
            .get_result(conn),
            None => diesel::select(exists(dsl::notes.filter(dsl::slug.eq(note_slug))))
                .get_result(conn),
        }
    }

    pub fn update(
        conn: &mut SqliteConnection,
        note_id: i32,
        changes: &NoteChanges,
    ) -> QueryResult<Note> {
        conn.transaction(|conn| {
            diesel::update(dsl::notes.find(note_id))
                .set(changes)
                .execute(conn)?;
            dsl::notes.find(note_id).first::<Note>(conn)
        })
    }

    pub fn delete(conn: &mut SqliteConnection, note_id: i32) -> QueryResult<usize> {
        diesel::delete(dsl::notes.find(note_id)).execute(conn)
    }
}

impl<'a> NewNote<'a> {
    pub fn insert(&self, conn: &mut SqliteConnection) -> QueryResult<Note> {
        conn.transaction(|conn| {
            diesel::insert_into(dsl::notes).values(self).execute(conn)?;
            dsl::notes
                .filter(dsl::slug.eq(self.slug))
                .first::<Note>(conn)
        })
    }
}
