//! Diesel table definitions for the PostgreSQL schema.
//!
//! These definitions must match the migrations under `backend/migrations`
//! exactly; Diesel uses them for compile-time query validation.

diesel::table! {
    /// Landing-page sign-ups.
    ///
    /// `phone_number` carries a unique constraint; `phone_number`, `city`,
    /// `role`, and `created_at` are indexed for the console's filters.
    sign_ups (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Submitted full name.
        full_name -> Varchar,
        /// Normalised mobile number, globally unique.
        phone_number -> Varchar,
        /// Optional contact email.
        email -> Nullable<Varchar>,
        /// City enumeration code.
        city -> Varchar,
        /// Fitness goal enumeration code.
        fitness_goal -> Varchar,
        /// Role enumeration code.
        role -> Varchar,
        /// Consent affirmation, always true for stored rows.
        consent -> Bool,
        /// Creation timestamp, defaulted by the database.
        created_at -> Timestamptz,
        /// Client address captured at creation.
        ip_address -> Nullable<Varchar>,
        /// User agent captured at creation.
        user_agent -> Text,
        /// `utm_source` captured at creation.
        utm_source -> Varchar,
        /// `utm_medium` captured at creation.
        utm_medium -> Varchar,
        /// `utm_campaign` captured at creation.
        utm_campaign -> Varchar,
        /// Operator-reviewed validity flag.
        is_valid -> Bool,
        /// Whether an operator has contacted this person.
        is_contacted -> Bool,
        /// Free-form operator notes.
        notes -> Text,
    }
}

diesel::table! {
    /// Append-only landing-page view log.
    page_views (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Visit timestamp, defaulted by the database.
        visited_at -> Timestamptz,
        /// Client address captured at creation.
        ip_address -> Nullable<Varchar>,
        /// User agent captured at creation.
        user_agent -> Text,
        /// `Referer` header captured at creation.
        referrer -> Text,
        /// `utm_source` captured at creation.
        utm_source -> Varchar,
        /// `utm_medium` captured at creation.
        utm_medium -> Varchar,
        /// `utm_campaign` captured at creation.
        utm_campaign -> Varchar,
    }
}

diesel::table! {
    /// Staff operators allowed into the administrative console.
    operators (id) {
        /// Primary key: UUID v4 identifier.
        id -> Uuid,
        /// Login name, unique.
        username -> Varchar,
        /// Lowercase hex SHA-256 digest of the password.
        password_digest -> Varchar,
        /// Whether this operator may delete records.
        is_superuser -> Bool,
        /// Provisioning timestamp.
        created_at -> Timestamptz,
    }
}
