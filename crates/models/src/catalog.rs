use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumProperty, EnumString, IntoEnumIterator};

/// Campus names offered by the admin program form
pub const KNOWN_CAMPUSES: [&str; 4] = ["บางเขน", "กำแพงแสน", "ศรีราชา", "สกลนคร"];

/// Returns true if `campus` is one of the campus names the admin form offers
pub fn is_known_campus(campus: &str) -> bool {
    KNOWN_CAMPUSES.contains(&campus.trim())
}

/// A level of the university → faculty → department → program hierarchy
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CatalogLevel {
    University,
    Faculty,
    Department,
    Program,
}

impl CatalogLevel {
    /// The level directly above this one, if any
    pub fn parent(self) -> Option<Self> {
        match self {
            Self::University => None,
            Self::Faculty => Some(Self::University),
            Self::Department => Some(Self::Faculty),
            Self::Program => Some(Self::Department),
        }
    }

    /// The level directly below this one, if any
    pub fn child(self) -> Option<Self> {
        match self {
            Self::University => Some(Self::Faculty),
            Self::Faculty => Some(Self::Department),
            Self::Department => Some(Self::Program),
            Self::Program => None,
        }
    }

    /// This level followed by every level beneath it
    pub fn descendants(self) -> Vec<Self> {
        Self::iter().skip_while(|level| *level != self).collect()
    }
}

/// Whether a university is state-run or private
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr, EnumProperty,
)]
pub enum UniversityType {
    #[default]
    #[strum(props(label = "รัฐบาล"))]
    Public,
    #[strum(props(label = "เอกชน"))]
    Private,
}

impl UniversityType {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    /// Thai display label
    pub fn label(&self) -> &'static str {
        self.get_str("label").unwrap_or_default()
    }
}

/// Degree level of a program. Stored using the Thai label the admin form submits.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
pub enum DegreeType {
    #[default]
    #[strum(to_string = "ปริญญาตรี", serialize = "Bachelor")]
    Bachelor,
    #[strum(to_string = "ปริญญาโท", serialize = "Master")]
    Master,
    #[strum(to_string = "ปริญญาเอก", serialize = "Doctorate")]
    Doctorate,
}

impl DegreeType {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }

    pub fn all() -> Vec<DegreeType> {
        DegreeType::iter().collect()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn test_level_navigation() {
        assert_eq!(CatalogLevel::University.parent(), None);
        assert_eq!(CatalogLevel::Faculty.parent(), Some(CatalogLevel::University));
        assert_eq!(CatalogLevel::Department.child(), Some(CatalogLevel::Program));
        assert_eq!(CatalogLevel::Program.child(), None);

        assert_eq!(
            CatalogLevel::Faculty.descendants(),
            vec![
                CatalogLevel::Faculty,
                CatalogLevel::Department,
                CatalogLevel::Program
            ]
        );
        assert_eq!(CatalogLevel::from_str("department"), Ok(CatalogLevel::Department));
    }

    #[test]
    fn test_degree_type_parses_label_and_name() {
        assert_eq!(DegreeType::from_str("ปริญญาโท"), Ok(DegreeType::Master));
        assert_eq!(DegreeType::from_str("Doctorate"), Ok(DegreeType::Doctorate));
        assert!(DegreeType::from_str("Diploma").is_err());

        assert_eq!(DegreeType::Bachelor.as_str(), "ปริญญาตรี");
        assert_eq!(DegreeType::all().len(), 3);
    }

    #[test]
    fn test_university_type_labels() {
        assert_eq!(UniversityType::from_str("Private"), Ok(UniversityType::Private));
        assert_eq!(UniversityType::Public.label(), "รัฐบาล");
        assert_eq!(UniversityType::Private.as_str(), "Private");
    }

    #[test]
    fn test_known_campus() {
        assert!(is_known_campus("บางเขน"));
        assert!(is_known_campus(" ศรีราชา "));
        assert!(!is_known_campus("Rangsit"));
    }
}
