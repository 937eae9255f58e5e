use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::attribute::{Criterion, Level};
use crate::error::{BakeryError, Result};

/// The three standards a product can be certified against.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StandardKind {
    Gost,
    BakeryEnterprise,
    Organic,
}

impl StandardKind {
    pub const ALL: [StandardKind; 3] = [
        StandardKind::Gost,
        StandardKind::BakeryEnterprise,
        StandardKind::Organic,
    ];

    pub fn display_name(self) -> &'static str {
        match self {
            StandardKind::Gost => "GOST ST-1",
            StandardKind::BakeryEnterprise => "Bakery Enterprise Standard",
            StandardKind::Organic => "Organic Bakery",
        }
    }

    pub fn key(self) -> &'static str {
        match self {
            StandardKind::Gost => "gost",
            StandardKind::BakeryEnterprise => "bakery-enterprise",
            StandardKind::Organic => "organic",
        }
    }

    fn required(self) -> [Level; 4] {
        // defects, texture, smell, taste
        match self {
            StandardKind::Gost => [Level::None, Level::Good, Level::Good, Level::Good],
            StandardKind::BakeryEnterprise => {
                [Level::None, Level::Excellent, Level::Excellent, Level::Excellent]
            }
            StandardKind::Organic => [Level::None, Level::Good, Level::Good, Level::Excellent],
        }
    }
}

impl fmt::Display for StandardKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// A named set of required levels, one per criterion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QualityStandard {
    pub kind: StandardKind,
    pub criteria: BTreeMap<Criterion, Level>,
}

impl QualityStandard {
    pub fn new(kind: StandardKind) -> Self {
        let criteria = Criterion::ALL
            .into_iter()
            .zip(kind.required())
            .collect();
        Self { kind, criteria }
    }

    pub fn name(&self) -> &'static str {
        self.kind.display_name()
    }

    pub fn required(&self, criterion: Criterion) -> Level {
        self.criteria[&criterion]
    }
}

/// The fixed catalog of standards.
#[derive(Debug, Clone)]
pub struct StandardCatalog {
    standards: Vec<QualityStandard>,
}

impl Default for StandardCatalog {
    fn default() -> Self {
        Self {
            standards: StandardKind::ALL.into_iter().map(QualityStandard::new).collect(),
        }
    }
}

impl StandardCatalog {
    pub fn by_kind(&self, kind: StandardKind) -> &QualityStandard {
        // Built in `StandardKind::ALL` order.
        &self.standards[kind as usize]
    }

    /// Exact lookup on the display name.
    pub fn by_display_name(&self, name: &str) -> Result<&QualityStandard> {
        self.standards
            .iter()
            .find(|s| s.name() == name)
            .ok_or_else(|| BakeryError::UnknownStandard(name.to_string()))
    }

    /// Accepts either the display name or the short key (`gost`,
    /// `bakery-enterprise`, `organic`), keys case-insensitive.
    pub fn lookup(&self, name: &str) -> Result<&QualityStandard> {
        let lower = name.trim().to_lowercase();
        self.standards
            .iter()
            .find(|s| s.kind.key() == lower)
            .map_or_else(|| self.by_display_name(name), Ok)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gost_criteria() {
        let gost = QualityStandard::new(StandardKind::Gost);
        assert_eq!(gost.name(), "GOST ST-1");
        let expected: BTreeMap<_, _> = [
            (Criterion::Defects, Level::None),
            (Criterion::Texture, Level::Good),
            (Criterion::Smell, Level::Good),
            (Criterion::Taste, Level::Good),
        ]
        .into_iter()
        .collect();
        assert_eq!(gost.criteria, expected);
    }

    #[test]
    fn enterprise_and_organic_criteria() {
        let enterprise = QualityStandard::new(StandardKind::BakeryEnterprise);
        assert_eq!(enterprise.required(Criterion::Defects), Level::None);
        assert_eq!(enterprise.required(Criterion::Smell), Level::Excellent);

        let organic = QualityStandard::new(StandardKind::Organic);
        assert_eq!(organic.required(Criterion::Texture), Level::Good);
        assert_eq!(organic.required(Criterion::Smell), Level::Good);
        assert_eq!(organic.required(Criterion::Taste), Level::Excellent);
    }

    #[test]
    fn required_levels_sit_on_each_scale() {
        for kind in StandardKind::ALL {
            let standard = QualityStandard::new(kind);
            for (criterion, level) in &standard.criteria {
                assert!(criterion.accepts(*level), "{kind}: {criterion}={level}");
            }
        }
    }

    #[test]
    fn catalog_lookup_by_display_name() {
        let catalog = StandardCatalog::default();
        let organic = catalog.by_display_name("Organic Bakery").unwrap();
        assert_eq!(organic.kind, StandardKind::Organic);

        let err = catalog.by_display_name("ISO 22000").unwrap_err();
        assert!(matches!(err, BakeryError::UnknownStandard(ref n) if n == "ISO 22000"));
    }

    #[test]
    fn catalog_lookup_accepts_keys() {
        let catalog = StandardCatalog::default();
        assert_eq!(catalog.lookup("GOST").unwrap().kind, StandardKind::Gost);
        assert_eq!(
            catalog.lookup("bakery-enterprise").unwrap().kind,
            StandardKind::BakeryEnterprise
        );
        assert_eq!(catalog.lookup("GOST ST-1").unwrap().kind, StandardKind::Gost);
        assert!(catalog.lookup("unknown").is_err());
    }
}
