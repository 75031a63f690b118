use chrono::{DateTime, Utc};
use sqlx::FromRow;
use std::str::FromStr;
use uuid::Uuid;

/// Database model for category
#[derive(Debug, Clone, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub parent_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Category {
    /// Case-insensitive name comparison used by every path lookup
    pub fn name_matches(&self, name: &str) -> bool {
        self.name.to_lowercase() == name.to_lowercase()
    }
}

/// How the third segment of a category path is matched.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SubSubCategoryMatch {
    /// Direct child of the subcategory with the same name
    #[default]
    ChildName,
    /// Legacy behaviour: substring of the subcategory's description.
    /// Selects the subcategory itself, never its children.
    DescriptionSubstring,
}

impl FromStr for SubSubCategoryMatch {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "child" | "child_name" => Ok(Self::ChildName),
            "description" | "description_substring" => Ok(Self::DescriptionSubstring),
            other => Err(format!(
                "LISTINGS_SUB_SUB_MATCH must be 'child' or 'description', got '{}'",
                other
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sub_sub_match_parses_config_values() {
        assert_eq!(
            "child".parse::<SubSubCategoryMatch>(),
            Ok(SubSubCategoryMatch::ChildName)
        );
        assert_eq!(
            " Description ".parse::<SubSubCategoryMatch>(),
            Ok(SubSubCategoryMatch::DescriptionSubstring)
        );
        assert!("fuzzy".parse::<SubSubCategoryMatch>().is_err());
    }
}
