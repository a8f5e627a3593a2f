//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match `backend/migrations` exactly. Regenerate with
//! `diesel print-schema` after changing a migration.

diesel::table! {
    /// Registered accounts.
    users (id) {
        id -> Uuid,
        /// Unique login handle (max 150 characters).
        username -> Varchar,
        /// bcrypt hash of the password.
        password_hash -> Text,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// One profile per account, keyed by the owner.
    profiles (user_id) {
        user_id -> Uuid,
        bio -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    categories (id) {
        id -> Int8,
        name -> Varchar,
        slug -> Varchar,
    }
}

diesel::table! {
    tags (id) {
        id -> Int8,
        name -> Varchar,
        slug -> Varchar,
    }
}

diesel::table! {
    posts (id) {
        id -> Int8,
        author_id -> Uuid,
        /// Post title (max 200 characters).
        title -> Varchar,
        content -> Text,
        /// Optional category; cleared when the category is deleted.
        category_id -> Nullable<Int8>,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    post_tags (post_id, tag_id) {
        post_id -> Int8,
        tag_id -> Int8,
    }
}

diesel::table! {
    comments (id) {
        id -> Int8,
        post_id -> Int8,
        author_id -> Uuid,
        content -> Text,
        created_at -> Timestamptz,
        updated_at -> Timestamptz,
    }
}

diesel::table! {
    /// Like relations on posts. The composite key enforces one per pair.
    post_likes (user_id, post_id) {
        user_id -> Uuid,
        post_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::table! {
    /// Like relations on comments. The composite key enforces one per pair.
    comment_likes (user_id, comment_id) {
        user_id -> Uuid,
        comment_id -> Int8,
        created_at -> Timestamptz,
    }
}

diesel::joinable!(profiles -> users (user_id));
diesel::joinable!(posts -> users (author_id));
diesel::joinable!(posts -> categories (category_id));
diesel::joinable!(post_tags -> posts (post_id));
diesel::joinable!(post_tags -> tags (tag_id));
diesel::joinable!(comments -> posts (post_id));
diesel::joinable!(comments -> users (author_id));
diesel::joinable!(post_likes -> posts (post_id));
diesel::joinable!(comment_likes -> comments (comment_id));

diesel::allow_tables_to_appear_in_same_query!(
    users,
    profiles,
    categories,
    tags,
    posts,
    post_tags,
    comments,
    post_likes,
    comment_likes,
);
