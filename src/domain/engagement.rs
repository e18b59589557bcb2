//! Engagement domain model
//!
//! An engagement is one line of a career history: a project worked on
//! between two months, with free-text metadata about the role.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::month::{month_distance_inclusive, MonthError, MonthSpan};

/// Opaque engagement identifier
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EngagementId(String);

impl EngagementId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Identifier assigned to the engagement read from a sheet row
    pub fn for_row(row: usize) -> Self {
        Self(format!("project-{}", row))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for EngagementId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for EngagementId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for EngagementId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// A single work engagement
///
/// Month fields hold the text as supplied; they are only validated when
/// the engagement is analyzed, so one bad row fails the whole analysis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Engagement {
    pub id: EngagementId,

    /// Project name
    pub name: String,

    /// First month worked, `YYYY-MM`
    pub start_month: String,

    /// Last month worked (inclusive), `YYYY-MM`
    pub end_month: String,

    #[serde(default)]
    pub role: String,

    #[serde(default)]
    pub client: String,

    #[serde(default)]
    pub skills: String,

    /// Freelance, full-time, contract...
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub employment_type: Option<String>,
}

impl Engagement {
    /// Creates an engagement with empty metadata
    pub fn new(
        id: impl Into<EngagementId>,
        name: impl Into<String>,
        start_month: impl Into<String>,
        end_month: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            start_month: start_month.into(),
            end_month: end_month.into(),
            role: String::new(),
            client: String::new(),
            skills: String::new(),
            employment_type: None,
        }
    }

    /// Sets role, client and skills
    pub fn with_details(
        mut self,
        role: impl Into<String>,
        client: impl Into<String>,
        skills: impl Into<String>,
    ) -> Self {
        self.role = role.into();
        self.client = client.into();
        self.skills = skills.into();
        self
    }

    pub fn with_employment_type(mut self, employment_type: impl Into<String>) -> Self {
        self.employment_type = Some(employment_type.into());
        self
    }

    /// Parses and validates the month range
    pub fn span(&self) -> Result<MonthSpan, MonthError> {
        MonthSpan::parse(&self.start_month, &self.end_month)
    }

    /// Inclusive number of months covered
    pub fn duration_months(&self) -> Result<u32, MonthError> {
        month_distance_inclusive(self.start_month.parse()?, self.end_month.parse()?)
    }
}
