use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{BakeryError, Result};

/// One of the four quality attributes every product carries.
///
/// Declaration order is the iteration order of every criteria map in the
/// crate, so failed-criteria lists come out as defects, texture, smell, taste.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Criterion {
    Defects,
    Texture,
    Smell,
    Taste,
}

/// Qualitative level held by a criterion. Each criterion accepts only the
/// levels of its own scale, see [`Criterion::scale`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Level {
    Have,
    Few,
    None,
    Bad,
    Poor,
    Good,
    Excellent,
}

impl Criterion {
    pub const ALL: [Criterion; 4] = [
        Criterion::Defects,
        Criterion::Texture,
        Criterion::Smell,
        Criterion::Taste,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Criterion::Defects => "defects",
            Criterion::Texture => "texture",
            Criterion::Smell => "smell",
            Criterion::Taste => "taste",
        }
    }

    /// Allowed levels, worst first.
    pub fn scale(self) -> &'static [Level] {
        match self {
            Criterion::Defects => &[Level::Have, Level::Few, Level::None],
            Criterion::Texture | Criterion::Taste => &[Level::Poor, Level::Good, Level::Excellent],
            Criterion::Smell => &[Level::Bad, Level::Good, Level::Excellent],
        }
    }

    pub fn worst(self) -> Level {
        self.scale()[0]
    }

    pub fn accepts(self, level: Level) -> bool {
        self.scale().contains(&level)
    }

    /// Parses `value` as a level on this criterion's scale.
    pub fn level(self, value: &str) -> Result<Level> {
        Level::parse(value)
            .filter(|level| self.accepts(*level))
            .ok_or_else(|| BakeryError::InvalidLevel {
                criterion: self,
                value: value.to_string(),
            })
    }
}

impl fmt::Display for Criterion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

impl FromStr for Criterion {
    type Err = BakeryError;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "defects" => Ok(Criterion::Defects),
            "texture" => Ok(Criterion::Texture),
            "smell" => Ok(Criterion::Smell),
            "taste" => Ok(Criterion::Taste),
            other => Err(BakeryError::InvalidAttribute(other.to_string())),
        }
    }
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::Have => "have",
            Level::Few => "few",
            Level::None => "none",
            Level::Bad => "bad",
            Level::Poor => "poor",
            Level::Good => "good",
            Level::Excellent => "excellent",
        }
    }

    pub fn parse(s: &str) -> Option<Level> {
        match s.trim().to_lowercase().as_str() {
            "have" => Some(Level::Have),
            "few" => Some(Level::Few),
            "none" => Some(Level::None),
            "bad" => Some(Level::Bad),
            "poor" => Some(Level::Poor),
            "good" => Some(Level::Good),
            "excellent" => Some(Level::Excellent),
            _ => None,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn worst_levels_match_fresh_product_defaults() {
        assert_eq!(Criterion::Defects.worst(), Level::Have);
        assert_eq!(Criterion::Texture.worst(), Level::Poor);
        assert_eq!(Criterion::Smell.worst(), Level::Bad);
        assert_eq!(Criterion::Taste.worst(), Level::Poor);
    }

    #[test]
    fn criterion_parse_rejects_unknown_key() {
        assert_eq!("smell".parse::<Criterion>().unwrap(), Criterion::Smell);
        let err = "crust".parse::<Criterion>().unwrap_err();
        assert!(matches!(err, BakeryError::InvalidAttribute(ref k) if k == "crust"));
    }

    #[test]
    fn level_must_belong_to_criterion_scale() {
        assert_eq!(Criterion::Defects.level("none").unwrap(), Level::None);
        assert_eq!(Criterion::Smell.level("Excellent").unwrap(), Level::Excellent);
        assert!(matches!(
            Criterion::Texture.level("none"),
            Err(BakeryError::InvalidLevel { criterion: Criterion::Texture, .. })
        ));
        assert!(Criterion::Taste.level("delicious").is_err());
    }

    #[test]
    fn criteria_order_is_declaration_order() {
        let mut shuffled = vec![Criterion::Taste, Criterion::Defects, Criterion::Smell, Criterion::Texture];
        shuffled.sort();
        assert_eq!(shuffled, Criterion::ALL.to_vec());
    }
}
