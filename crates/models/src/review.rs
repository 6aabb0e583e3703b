use crate::error::ValidationError;
use serde::{Deserialize, Serialize};
use std::{
    collections::BTreeMap,
    fmt::{Display as FmtDisplay, Formatter, Result as FmtResult},
    str::FromStr,
};
use strum::{AsRefStr, Display, EnumIter, EnumProperty, EnumString, IntoEnumIterator};

/// Subject code → exam score (0-100). Open for storage, see [`crate::subject::Subject`].
pub type Scores = BTreeMap<String, f64>;

/// Earliest and latest Buddhist-calendar admission year accepted
pub const ADMISSION_YEARS: std::ops::RangeInclusive<u16> = 2500..=2700;

/// The two shapes a review can take
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, EnumIter, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ReviewType {
    /// Entrance/admission experience
    #[default]
    Admission,
    /// In-program study experience
    Study,
}

impl ReviewType {
    pub fn as_str(&self) -> &str {
        self.as_ref()
    }
}

/// A star rating, always within 1..=5
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct Rating(u8);

impl Rating {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 5;

    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    pub fn value(self) -> u8 {
        self.0
    }

    /// Converts a form value where 0 means "not yet chosen"
    pub fn from_input(value: u8, field: &'static str) -> Result<Self, ValidationError> {
        match value {
            0 => Err(ValidationError::MissingRating(field)),
            v => Self::try_from(v),
        }
    }
}

impl TryFrom<u8> for Rating {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::new(value).ok_or(ValidationError::RatingOutOfRange(value))
    }
}

impl From<Rating> for u8 {
    fn from(rating: Rating) -> Self {
        rating.0
    }
}

/// TCAS admission round
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, EnumIter, EnumProperty,
)]
#[serde(try_from = "u8", into = "u8")]
pub enum AdmissionRound {
    #[strum(props(label = "Portfolio"))]
    Portfolio = 1,
    #[strum(props(label = "Quota"))]
    Quota = 2,
    #[strum(props(label = "Admission"))]
    Admission = 3,
    #[strum(props(label = "Direct"))]
    Direct = 4,
}

impl AdmissionRound {
    pub fn number(self) -> u8 {
        self as u8
    }

    pub fn label(&self) -> &'static str {
        self.get_str("label").unwrap_or_default()
    }

    /// Rounds 1, 2 and 4 collect portfolio details, round 3 collects GPAX and scores
    pub fn is_portfolio_round(self) -> bool {
        !matches!(self, Self::Admission)
    }
}

impl TryFrom<u8> for AdmissionRound {
    type Error = ValidationError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        Self::iter()
            .find(|round| round.number() == value)
            .ok_or(ValidationError::InvalidRound(value))
    }
}

impl From<AdmissionRound> for u8 {
    fn from(round: AdmissionRound) -> Self {
        round.number()
    }
}

/// Year of study of the reviewer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum StudyYear {
    Year(u8),
    Graduated,
}

impl StudyYear {
    pub const MAX_YEAR: u8 = 6;
}

impl FromStr for StudyYear {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "graduated" | "grad" => Ok(Self::Graduated),
            other => other
                .parse::<u8>()
                .ok()
                .filter(|year| (1..=Self::MAX_YEAR).contains(year))
                .map(Self::Year)
                .ok_or_else(|| ValidationError::InvalidStudyYear(s.to_string())),
        }
    }
}

impl TryFrom<String> for StudyYear {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<StudyYear> for String {
    fn from(year: StudyYear) -> Self {
        year.to_string()
    }
}

impl FmtDisplay for StudyYear {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            Self::Year(year) => write!(f, "{year}"),
            Self::Graduated => write!(f, "graduated"),
        }
    }
}

/// Round-dependent admission details
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AdmissionExtras {
    /// Rounds 1, 2 and 4
    Portfolio {
        project_name: Option<String>,
        portfolio_url: Option<String>,
        achievements: Option<String>,
    },
    /// Round 3
    Scores { gpax: Option<f64>, scores: Scores },
}

impl AdmissionExtras {
    fn kind(&self) -> &'static str {
        match self {
            Self::Portfolio { .. } => "portfolio",
            Self::Scores { .. } => "score",
        }
    }

    /// Empty extras of the kind `round` expects
    pub fn empty_for(round: AdmissionRound) -> Self {
        if round.is_portfolio_round() {
            Self::Portfolio {
                project_name: None,
                portfolio_url: None,
                achievements: None,
            }
        } else {
            Self::Scores {
                gpax: None,
                scores: Scores::new(),
            }
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdmissionReview {
    pub round: AdmissionRound,
    /// Buddhist-calendar year
    pub year: u16,
    pub rating_academic: Rating,
    pub rating_social: Rating,
    pub rating_facility: Rating,
    pub extras: AdmissionExtras,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyReview {
    pub study_year: Option<StudyYear>,
    pub favorite_subjects: Option<String>,
    pub workload_rating: Option<Rating>,
    pub study_tips: Option<String>,
    pub rating_social_friends: Rating,
    pub rating_cost: Rating,
    pub rating_food: Rating,
    pub rating_environment: Rating,
    pub rating_overall: Rating,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "review_type", rename_all = "lowercase")]
pub enum ReviewShape {
    Admission(AdmissionReview),
    Study(StudyReview),
}

/// The three dimensions every stored review carries, whatever its shape
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LegacyRatings {
    pub academic: Rating,
    pub social: Rating,
    pub facility: Rating,
}

impl LegacyRatings {
    pub fn mean(&self) -> f64 {
        (self.academic.value() as f64 + self.social.value() as f64 + self.facility.value() as f64)
            / 3.0
    }
}

/// Everything a user writes in a review, minus identity and catalog placement
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewContent {
    #[serde(flatten)]
    pub shape: ReviewShape,
    pub comment: Option<String>,
}

impl ReviewContent {
    pub fn review_type(&self) -> ReviewType {
        match self.shape {
            ReviewShape::Admission(_) => ReviewType::Admission,
            ReviewShape::Study(_) => ReviewType::Study,
        }
    }

    /// Study reviews map overall → academic, friends → social, environment → facility
    pub fn legacy_ratings(&self) -> LegacyRatings {
        match &self.shape {
            ReviewShape::Admission(a) => LegacyRatings {
                academic: a.rating_academic,
                social: a.rating_social,
                facility: a.rating_facility,
            },
            ReviewShape::Study(s) => LegacyRatings {
                academic: s.rating_overall,
                social: s.rating_social_friends,
                facility: s.rating_environment,
            },
        }
    }

    /// This review's contribution to an overall average
    pub fn overall_score(&self) -> f64 {
        match &self.shape {
            ReviewShape::Study(s) => s.rating_overall.value() as f64,
            ReviewShape::Admission(_) => self.legacy_ratings().mean(),
        }
    }

    /// Trims every free-text field and drops the ones left blank
    pub fn normalized(mut self) -> Self {
        fn tidy(field: &mut Option<String>) {
            *field = field.as_deref().and_then(normalize_text);
        }

        tidy(&mut self.comment);
        match &mut self.shape {
            ReviewShape::Admission(AdmissionReview {
                extras:
                    AdmissionExtras::Portfolio {
                        project_name,
                        portfolio_url,
                        achievements,
                    },
                ..
            }) => {
                tidy(project_name);
                tidy(portfolio_url);
                tidy(achievements);
            }
            ReviewShape::Admission(_) => {}
            ReviewShape::Study(study) => {
                tidy(&mut study.favorite_subjects);
                tidy(&mut study.study_tips);
            }
        }
        self
    }

    /// Checks the shape-specific constraints the types alone cannot express
    pub fn validate(&self) -> Result<(), ValidationError> {
        let ReviewShape::Admission(admission) = &self.shape else {
            return Ok(());
        };

        if !ADMISSION_YEARS.contains(&admission.year) {
            return Err(ValidationError::AdmissionYearOutOfRange(admission.year));
        }

        let expected = AdmissionExtras::empty_for(admission.round);
        if expected.kind() != admission.extras.kind() {
            return Err(ValidationError::ExtrasRoundMismatch {
                round: admission.round.number(),
                extras: admission.extras.kind(),
            });
        }

        if let AdmissionExtras::Scores { gpax, scores } = &admission.extras {
            validate_gpax(*gpax)?;
            validate_scores(scores)?;
        }

        Ok(())
    }
}

/// Trimmed text, or `None` when nothing but whitespace was entered
pub fn normalize_text(value: &str) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

pub fn validate_gpax(gpax: Option<f64>) -> Result<(), ValidationError> {
    match gpax {
        Some(g) if !(0.0..=4.0).contains(&g) => Err(ValidationError::GpaxOutOfRange(g)),
        _ => Ok(()),
    }
}

pub fn validate_score(subject: &str, value: f64) -> Result<(), ValidationError> {
    if subject.trim().is_empty() {
        return Err(ValidationError::EmptySubject);
    }
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::ScoreOutOfRange {
            subject: subject.to_string(),
            value,
        });
    }
    Ok(())
}

pub fn validate_scores(scores: &Scores) -> Result<(), ValidationError> {
    scores
        .iter()
        .try_for_each(|(subject, value)| validate_score(subject, *value))
}
