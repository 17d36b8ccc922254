//! Sign-up records and the request metadata stamped onto them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use super::enums::{City, FitnessGoal, Role};
use super::phone::PhoneNumber;

/// Marketing campaign tags lifted verbatim from the query string.
///
/// Absent parameters are captured as empty strings, matching how the rows
/// are stored and filtered.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct UtmTags {
    /// `utm_source` query parameter.
    pub source: String,
    /// `utm_medium` query parameter.
    pub medium: String,
    /// `utm_campaign` query parameter.
    pub campaign: String,
}

/// Request-scoped metadata captured for analytics on every landing hit.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestMeta {
    /// Client address; first `X-Forwarded-For` entry when present,
    /// otherwise the peer address.
    pub ip_address: Option<String>,
    /// `User-Agent` header, empty when absent.
    pub user_agent: String,
    /// `Referer` header, empty when absent.
    pub referrer: String,
    /// Campaign tags from the query string.
    pub utm: UtmTags,
}

/// A persisted sign-up record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SignUp {
    /// Primary key, assigned at creation.
    pub id: Uuid,
    /// Submitted full name.
    pub full_name: String,
    /// Normalised, globally unique mobile number.
    pub phone_number: PhoneNumber,
    /// Optional contact email.
    pub email: Option<String>,
    /// City chosen on the form.
    pub city: City,
    /// Fitness goal chosen on the form.
    pub fitness_goal: FitnessGoal,
    /// Role chosen on the form.
    pub role: Role,
    /// Consent affirmation; always true for stored rows.
    pub consent: bool,
    /// Creation instant, immutable, newest-first default ordering.
    pub created_at: DateTime<Utc>,
    /// Client address captured at creation.
    pub ip_address: Option<String>,
    /// User agent captured at creation.
    pub user_agent: String,
    /// Campaign tags captured at creation.
    pub utm: UtmTags,
    /// Operator-reviewed validity flag, defaults to true.
    pub is_valid: bool,
    /// Whether an operator has contacted this person, defaults to false.
    pub is_contacted: bool,
    /// Free-form operator notes.
    pub notes: String,
}

/// A validated sign-up ready for persistence.
///
/// `created_at`, `is_valid`, `is_contacted`, and `notes` take their storage
/// defaults; everything user- or request-derived is fixed here.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSignUp {
    /// Pre-assigned primary key.
    pub id: Uuid,
    /// Submitted full name.
    pub full_name: String,
    /// Normalised mobile number.
    pub phone_number: PhoneNumber,
    /// Optional contact email.
    pub email: Option<String>,
    /// City chosen on the form.
    pub city: City,
    /// Fitness goal chosen on the form.
    pub fitness_goal: FitnessGoal,
    /// Role chosen on the form.
    pub role: Role,
    /// Client address captured at creation.
    pub ip_address: Option<String>,
    /// User agent captured at creation.
    pub user_agent: String,
    /// Campaign tags captured at creation.
    pub utm: UtmTags,
}
