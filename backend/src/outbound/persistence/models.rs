//! Internal Diesel row structs and their domain conversions.
//!
//! These types are implementation details of the persistence layer and are
//! never exposed to the domain.

use chrono::{DateTime, Utc};
use diesel::prelude::*;
use uuid::Uuid;

use crate::domain::ports::SignUpPersistenceError;
use crate::domain::{
    NewPageView, NewSignUp, OperatorRecord, PageView, PasswordDigest, PhoneNumber, SignUp, UtmTags,
};

use super::schema::{operators, page_views, sign_ups};

/// Row struct for reading from the sign_ups table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = sign_ups)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct SignUpRow {
    pub id: Uuid,
    pub full_name: String,
    pub phone_number: String,
    pub email: Option<String>,
    pub city: String,
    pub fitness_goal: String,
    pub role: String,
    pub consent: bool,
    pub created_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: String,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
    pub is_valid: bool,
    pub is_contacted: bool,
    pub notes: String,
}

fn corrupt(column: &str, value: &str) -> SignUpPersistenceError {
    SignUpPersistenceError::query(format!("stored {column} value is not valid: {value}"))
}

impl SignUpRow {
    /// Convert a stored row back into the domain entity.
    ///
    /// Enumeration codes and the phone number were validated on the way in,
    /// so a parse failure here means the row was altered out of band.
    pub(crate) fn into_domain(self) -> Result<SignUp, SignUpPersistenceError> {
        let city = self.city.parse().map_err(|_| corrupt("city", &self.city))?;
        let fitness_goal = self
            .fitness_goal
            .parse()
            .map_err(|_| corrupt("fitness_goal", &self.fitness_goal))?;
        let role = self.role.parse().map_err(|_| corrupt("role", &self.role))?;
        let phone_number = PhoneNumber::parse(&self.phone_number)
            .map_err(|_| corrupt("phone_number", &self.phone_number))?;
        Ok(SignUp {
            id: self.id,
            full_name: self.full_name,
            phone_number,
            email: self.email,
            city,
            fitness_goal,
            role,
            consent: self.consent,
            created_at: self.created_at,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            utm: UtmTags {
                source: self.utm_source,
                medium: self.utm_medium,
                campaign: self.utm_campaign,
            },
            is_valid: self.is_valid,
            is_contacted: self.is_contacted,
            notes: self.notes,
        })
    }
}

/// Insertable struct for creating new sign-up rows.
///
/// `created_at`, `is_valid`, `is_contacted`, and `notes` take their column
/// defaults.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = sign_ups)]
pub(crate) struct NewSignUpRow<'a> {
    pub id: Uuid,
    pub full_name: &'a str,
    pub phone_number: &'a str,
    pub email: Option<&'a str>,
    pub city: &'a str,
    pub fitness_goal: &'a str,
    pub role: &'a str,
    pub consent: bool,
    pub ip_address: Option<&'a str>,
    pub user_agent: &'a str,
    pub utm_source: &'a str,
    pub utm_medium: &'a str,
    pub utm_campaign: &'a str,
}

impl<'a> NewSignUpRow<'a> {
    pub(crate) fn from_domain(signup: &'a NewSignUp) -> Self {
        Self {
            id: signup.id,
            full_name: &signup.full_name,
            phone_number: signup.phone_number.as_str(),
            email: signup.email.as_deref(),
            city: signup.city.code(),
            fitness_goal: signup.fitness_goal.code(),
            role: signup.role.code(),
            consent: true,
            ip_address: signup.ip_address.as_deref(),
            user_agent: &signup.user_agent,
            utm_source: &signup.utm.source,
            utm_medium: &signup.utm.medium,
            utm_campaign: &signup.utm.campaign,
        }
    }
}

/// Changeset for operator review edits; `None` fields are left untouched.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = sign_ups)]
pub(crate) struct SignUpReviewChangeset<'a> {
    pub is_valid: Option<bool>,
    pub is_contacted: Option<bool>,
    pub notes: Option<&'a str>,
}

/// Row struct for reading from the page_views table.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = page_views)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct PageViewRow {
    pub id: Uuid,
    pub visited_at: DateTime<Utc>,
    pub ip_address: Option<String>,
    pub user_agent: String,
    pub referrer: String,
    pub utm_source: String,
    pub utm_medium: String,
    pub utm_campaign: String,
}

impl PageViewRow {
    pub(crate) fn into_domain(self) -> PageView {
        PageView {
            id: self.id,
            visited_at: self.visited_at,
            ip_address: self.ip_address,
            user_agent: self.user_agent,
            referrer: self.referrer,
            utm: UtmTags {
                source: self.utm_source,
                medium: self.utm_medium,
                campaign: self.utm_campaign,
            },
        }
    }
}

/// Insertable struct for appending page-view rows; `visited_at` takes its
/// column default.
#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = page_views)]
pub(crate) struct NewPageViewRow<'a> {
    pub id: Uuid,
    pub ip_address: Option<&'a str>,
    pub user_agent: &'a str,
    pub referrer: &'a str,
    pub utm_source: &'a str,
    pub utm_medium: &'a str,
    pub utm_campaign: &'a str,
}

impl<'a> NewPageViewRow<'a> {
    pub(crate) fn from_domain(view: &'a NewPageView) -> Self {
        Self {
            id: view.id,
            ip_address: view.ip_address.as_deref(),
            user_agent: &view.user_agent,
            referrer: &view.referrer,
            utm_source: &view.utm.source,
            utm_medium: &view.utm.medium,
            utm_campaign: &view.utm.campaign,
        }
    }
}

/// Row struct for reading operators; the provisioning timestamp is not
/// needed by the domain and is left unselected.
#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = operators)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub(crate) struct OperatorRow {
    pub id: Uuid,
    pub username: String,
    pub password_digest: String,
    pub is_superuser: bool,
}

impl OperatorRow {
    pub(crate) fn into_domain(self) -> OperatorRecord {
        OperatorRecord {
            id: self.id,
            username: self.username,
            password_digest: PasswordDigest::from_hex(self.password_digest),
            is_superuser: self.is_superuser,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{City, FitnessGoal, Role};
    use rstest::rstest;

    fn stored_row() -> SignUpRow {
        SignUpRow {
            id: Uuid::new_v4(),
            full_name: "Ali Rezaei".to_owned(),
            phone_number: "09123456789".to_owned(),
            email: None,
            city: "TEHRAN".to_owned(),
            fitness_goal: "WEIGHT_LOSS".to_owned(),
            role: "USER".to_owned(),
            consent: true,
            created_at: Utc::now(),
            ip_address: None,
            user_agent: String::new(),
            utm_source: String::new(),
            utm_medium: String::new(),
            utm_campaign: String::new(),
            is_valid: true,
            is_contacted: false,
            notes: String::new(),
        }
    }

    #[rstest]
    fn row_converts_to_domain_entity() {
        let entity = stored_row().into_domain().expect("row is well formed");
        assert_eq!(entity.city, City::Tehran);
        assert_eq!(entity.fitness_goal, FitnessGoal::WeightLoss);
        assert_eq!(entity.role, Role::User);
    }

    #[rstest]
    #[case::city("city")]
    #[case::goal("fitness_goal")]
    #[case::role("role")]
    fn corrupt_enumeration_codes_surface_as_query_errors(#[case] column: &str) {
        let mut row = stored_row();
        match column {
            "city" => row.city = "ATLANTIS".to_owned(),
            "fitness_goal" => row.fitness_goal = "TELEPORTATION".to_owned(),
            _ => row.role = "WIZARD".to_owned(),
        }
        let err = row.into_domain().expect_err("row is corrupt");
        assert!(matches!(err, SignUpPersistenceError::Query { .. }));
    }
}
