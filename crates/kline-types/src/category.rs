//! Market category definitions.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Market category an instrument trades in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    /// Spot pairs.
    Spot,
    /// USD-margined perpetual and delivery futures.
    #[serde(rename = "um")]
    UsdMargined,
}

impl Category {
    /// Returns the category as a string slice.
    ///
    /// This is also the name of the category's archive directory and the
    /// suffix used in output file names.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Spot => "spot",
            Self::UsdMargined => "um",
        }
    }

    /// Returns the name of the output directory for this category.
    #[must_use]
    pub const fn output_dir(&self) -> &'static str {
        match self {
            Self::Spot => "spotkdata",
            Self::UsdMargined => "kdata",
        }
    }

    /// Returns all categories.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Spot, Self::UsdMargined]
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Category {
    type Err = CategoryParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "spot" => Ok(Self::Spot),
            "um" | "futures" | "future" | "usdm" => Ok(Self::UsdMargined),
            _ => Err(CategoryParseError(s.to_string())),
        }
    }
}

/// Error returned when parsing an invalid category string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CategoryParseError(String);

impl std::fmt::Display for CategoryParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid category '{}', expected one of: spot, um", self.0)
    }
}

impl std::error::Error for CategoryParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_parse() {
        assert_eq!("spot".parse::<Category>().unwrap(), Category::Spot);
        assert_eq!("UM".parse::<Category>().unwrap(), Category::UsdMargined);
        assert_eq!("futures".parse::<Category>().unwrap(), Category::UsdMargined);
        assert!("coinm".parse::<Category>().is_err());
    }

    #[test]
    fn test_output_dirs() {
        assert_eq!(Category::Spot.output_dir(), "spotkdata");
        assert_eq!(Category::UsdMargined.output_dir(), "kdata");
    }

    #[test]
    fn test_serde_names() {
        let json = serde_json::to_string(&Category::all()).unwrap();
        assert_eq!(json, r#"["spot","um"]"#);
    }
}
