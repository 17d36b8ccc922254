//! Console listing queries and pagination envelopes.

use chrono::{DateTime, Utc};

use super::enums::{City, FitnessGoal, Role};
use super::page_view::PageView;
use super::signup::SignUp;

const DEFAULT_PER_PAGE: u32 = 50;
const MAX_PER_PAGE: u32 = 200;

/// A 1-based page request with a clamped page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    number: u32,
    per_page: u32,
}

impl Page {
    /// Build a page request, clamping the number to at least 1 and the size
    /// to `1..=200`.
    pub fn new(number: u32, per_page: u32) -> Self {
        Self {
            number: number.max(1),
            per_page: per_page.clamp(1, MAX_PER_PAGE),
        }
    }

    /// 1-based page number.
    pub fn number(self) -> u32 {
        self.number
    }

    /// Records per page.
    pub fn per_page(self) -> u32 {
        self.per_page
    }

    /// Offset of the first record on this page.
    pub fn offset(self) -> i64 {
        i64::from(self.number - 1) * i64::from(self.per_page)
    }

    /// Limit for this page.
    pub fn limit(self) -> i64 {
        i64::from(self.per_page)
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1, DEFAULT_PER_PAGE)
    }
}

/// Filters and pagination for the sign-up list.
///
/// All filters are conjunctive; `search` matches name, phone, or email as a
/// case-insensitive substring. Results are always newest-first.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SignUpListQuery {
    /// Restrict to one city.
    pub city: Option<City>,
    /// Restrict to one role.
    pub role: Option<Role>,
    /// Restrict to one fitness goal.
    pub fitness_goal: Option<FitnessGoal>,
    /// Restrict by validity flag.
    pub is_valid: Option<bool>,
    /// Restrict by contacted flag.
    pub is_contacted: Option<bool>,
    /// Inclusive lower creation-time bound.
    pub created_from: Option<DateTime<Utc>>,
    /// Exclusive upper creation-time bound.
    pub created_to: Option<DateTime<Utc>>,
    /// Free-text search across name, phone, and email.
    pub search: Option<String>,
    /// Page request.
    pub page: Page,
}

/// One page of sign-up records plus the filtered total.
#[derive(Debug, Clone, PartialEq)]
pub struct SignUpPage {
    /// Records on this page, newest first.
    pub items: Vec<SignUp>,
    /// Total records matching the filters across all pages.
    pub total: i64,
    /// Echoed page number.
    pub page: u32,
    /// Echoed page size.
    pub per_page: u32,
}

/// Operator-editable review fields; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ReviewUpdate {
    /// New validity flag.
    pub is_valid: Option<bool>,
    /// New contacted flag.
    pub is_contacted: Option<bool>,
    /// Replacement notes text.
    pub notes: Option<String>,
}

impl ReviewUpdate {
    /// True when no field would change.
    pub fn is_empty(&self) -> bool {
        self.is_valid.is_none() && self.is_contacted.is_none() && self.notes.is_none()
    }
}

/// Filters and pagination for the page-view list.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PageViewListQuery {
    /// Inclusive lower visit-time bound.
    pub visited_from: Option<DateTime<Utc>>,
    /// Exclusive upper visit-time bound.
    pub visited_to: Option<DateTime<Utc>>,
    /// Exact `utm_source` match.
    pub utm_source: Option<String>,
    /// Exact `utm_medium` match.
    pub utm_medium: Option<String>,
    /// Page request.
    pub page: Page,
}

/// One page of page-view records plus the filtered total.
#[derive(Debug, Clone, PartialEq)]
pub struct PageViewPage {
    /// Records on this page, newest first.
    pub items: Vec<PageView>,
    /// Total records matching the filters across all pages.
    pub total: i64,
    /// Echoed page number.
    pub page: u32,
    /// Echoed page size.
    pub per_page: u32,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(0, 0, 1, 1)]
    #[case(1, 50, 1, 50)]
    #[case(3, 500, 3, 200)]
    fn page_clamps_inputs(
        #[case] number: u32,
        #[case] per_page: u32,
        #[case] expected_number: u32,
        #[case] expected_per_page: u32,
    ) {
        let page = Page::new(number, per_page);
        assert_eq!(page.number(), expected_number);
        assert_eq!(page.per_page(), expected_per_page);
    }

    #[rstest]
    fn offset_and_limit_follow_the_page() {
        let page = Page::new(3, 25);
        assert_eq!(page.offset(), 50);
        assert_eq!(page.limit(), 25);
    }

    #[rstest]
    fn review_update_emptiness() {
        assert!(ReviewUpdate::default().is_empty());
        let update = ReviewUpdate {
            is_contacted: Some(true),
            ..ReviewUpdate::default()
        };
        assert!(!update.is_empty());
    }
}
