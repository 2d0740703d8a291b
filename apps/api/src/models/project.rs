use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// Project category. Unknown swallows anything the DB or client sends that
/// we don't recognize, so analysis never fails on a new category value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ProjectCategory {
    Commercial,
    Residential,
    Infrastructure,
    Industrial,
    Healthcare,
    Education,
    #[serde(other)]
    #[default]
    Unknown,
}

impl ProjectCategory {
    pub fn parse(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "commercial" => Self::Commercial,
            "residential" => Self::Residential,
            "infrastructure" => Self::Infrastructure,
            "industrial" => Self::Industrial,
            "healthcare" => Self::Healthcare,
            "education" => Self::Education,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Commercial => "commercial",
            Self::Residential => "residential",
            Self::Infrastructure => "infrastructure",
            Self::Industrial => "industrial",
            Self::Healthcare => "healthcare",
            Self::Education => "education",
            Self::Unknown => "unknown",
        }
    }
}

/// The slice of a project the analyzer reads: budget and category.
/// Owned by the project CRUD side; this component only consumes it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProjectSummary {
    pub budget: f64,
    #[serde(default)]
    pub category: ProjectCategory,
}

/// Minimal project row — only the columns the analysis and prefill
/// paths read. The full relational schema lives with the CRUD service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ProjectRow {
    pub id: Uuid,
    pub budget: f64,
    pub category: String,
    pub deadline: Option<NaiveDate>,
}

impl ProjectRow {
    pub fn summary(&self) -> ProjectSummary {
        ProjectSummary {
            budget: self.budget,
            category: ProjectCategory::parse(&self.category),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_categories() {
        assert_eq!(
            ProjectCategory::parse("Infrastructure"),
            ProjectCategory::Infrastructure
        );
        assert_eq!(
            ProjectCategory::parse("commercial"),
            ProjectCategory::Commercial
        );
    }

    #[test]
    fn test_parse_unknown_category() {
        assert_eq!(ProjectCategory::parse("mixed-use"), ProjectCategory::Unknown);
        assert_eq!(ProjectCategory::parse(""), ProjectCategory::Unknown);
    }

    #[test]
    fn test_deserialize_unrecognized_falls_to_unknown() {
        let cat: ProjectCategory = serde_json::from_str("\"marina\"").unwrap();
        assert_eq!(cat, ProjectCategory::Unknown);
    }

    #[test]
    fn test_serialize_lowercase() {
        assert_eq!(
            serde_json::to_string(&ProjectCategory::Healthcare).unwrap(),
            "\"healthcare\""
        );
    }
}
