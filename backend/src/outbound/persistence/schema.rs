//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations/` exactly, and the
//! column names are audited against [`crate::domain::entity_map`] in tests.
//! `diesel print-schema` regenerates them from a live database.

diesel::table! {
    /// User accounts. `id` is a UUID v4 primary key.
    users (id) {
        id -> Uuid,
        /// Store-generated secondary identifier (`BIGSERIAL`).
        additional_id -> Int8,
        nickname -> Varchar,
        email -> Varchar,
        /// Argon2id PHC string.
        password_hash -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        /// Optimistic concurrency counter, starts at 1.
        version -> Int4,
    }
}

diesel::table! {
    /// At most one profile per user (`user_id` is unique).
    profiles (id) {
        id -> Int8,
        user_id -> Uuid,
        profile_image -> Nullable<Text>,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Blog posts, each owned by one user.
    posts (id) {
        id -> Int8,
        author_id -> Uuid,
        title -> Varchar,
        content -> Text,
        like_count -> Int8,
        comment_count -> Int8,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
        version -> Int4,
    }
}

diesel::table! {
    /// Registered tags with unique names.
    tags (id) {
        id -> Int8,
        name -> Varchar,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(posts -> users (author_id));
diesel::joinable!(profiles -> users (user_id));

diesel::allow_tables_to_appear_in_same_query!(posts, profiles, tags, users);
