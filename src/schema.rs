diesel::table! {
    notes (id) {
        id -> Integer,
        title -> Text,
        text -> Text,
        slug -> Text,
        author_id -> Integer,
        created_at -> Timestamp,
    }
}

diesel::table! {
    users (id) {
        id -> Integer,
        username -> Text,
        password -> Text,
        date_joined -> Timestamp,
    }
}

diesel::joinable!(notes -> users (author_id));

diesel::allow_tables_to_appear_in_same_query!(notes, users);
