//! Diesel schema for user persistence.

diesel::table! {
    /// Registered user accounts.
    users (id) {
        /// User identifier.
        id -> Uuid,
        /// Display name.
        name -> Text,
        /// Lowercase email address, unique.
        email -> Text,
        /// Argon2 PHC password hash.
        password_hash -> Text,
        /// Optional profile image URL.
        profile_image_url -> Nullable<Text>,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
