//! Diesel schema for task persistence.

diesel::table! {
    /// Tasks, each owned by one user.
    tasks (id) {
        /// Task identifier.
        id -> Uuid,
        /// Owning user.
        owner_id -> Uuid,
        /// Trimmed title.
        title -> Text,
        /// Trimmed description, empty when unset.
        description -> Text,
        /// Priority label.
        #[max_length = 16]
        priority -> Varchar,
        /// Status label.
        #[max_length = 16]
        status -> Varchar,
        /// Due date.
        due_date -> Timestamptz,
        /// Ordered checklist items as a JSON array.
        checklist -> Jsonb,
        /// Attachment links and paths as a JSON array.
        attachments -> Jsonb,
        /// Completion percentage.
        progress -> Int2,
        /// Pin flag.
        pinned -> Bool,
        /// Creation timestamp.
        created_at -> Timestamptz,
        /// Last update timestamp.
        updated_at -> Timestamptz,
    }
}
