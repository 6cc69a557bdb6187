use diesel::QueryResult;
use serde_derive::{Deserialize, Serialize};

use super::{
    max_length,
    slug::{is_valid_slug, random_slug, slugify, MAX_SLUG_LENGTH},
    FormErrors, REQUIRED,
};
use crate::models::Note;

pub const MAX_TITLE_LENGTH: usize = 100;

const DUPLICATE_SLUG_WARNING: &str = " - такой slug уже существует, придумайте уникальное значение!";

pub fn duplicate_slug(slug: &str) -> String {
    format!("{slug}{DUPLICATE_SLUG_WARNING}")
}

/// Title, text and slug as submitted by the user.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
pub struct NoteForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub text: String,
    #[serde(default)]
    pub slug: String,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CleanNote {
    pub title: String,
    pub text: String,
    pub slug: String,
}

impl From<&Note> for NoteForm {
    fn from(note: &Note) -> Self {
        NoteForm {
            title: note.title.clone(),
            text: note.text.clone(),
            slug: note.slug.clone(),
        }
    }
}

impl NoteForm {
    /// Validates the fields and settles the slug. A blank slug is derived from
    /// the title. `slug_taken` is asked whether the final slug already belongs
    /// to another note; its error aborts validation.
    pub fn clean<F>(&self, slug_taken: F) -> QueryResult<Result<CleanNote, FormErrors>>
    where
        F: FnOnce(&str) -> QueryResult<bool>,
    {
        let mut errors = FormErrors::default();

        let title = self.title.trim();
        if title.is_empty() {
            errors.add("title", REQUIRED);
        }
        max_length(&mut errors, "title", title, MAX_TITLE_LENGTH);

        let text = self.text.trim();
        if text.is_empty() {
            errors.add("text", REQUIRED);
        }

        let mut slug = self.slug.trim().to_string();
        if slug.is_empty() && !title.is_empty() {
            slug = slugify(title);
            if slug.is_empty() {
                slug = random_slug();
            }
        }

        if !slug.is_empty() {
            max_length(&mut errors, "slug", &slug, MAX_SLUG_LENGTH);
            if !is_valid_slug(&slug) {
                errors.add(
                    "slug",
                    "Enter a valid “slug” consisting of letters, numbers, underscores or hyphens.",
                );
            }
            if !errors.has("slug") && slug_taken(&slug)? {
                errors.add("slug", duplicate_slug(&slug));
            }
        }

        Ok(errors.finish(CleanNote {
            title: title.to_string(),
            text: text.to_string(),
            slug,
        }))
    }
}
