use crate::review::{ReviewContent, ReviewShape};
use serde::Serialize;
use std::fmt::{Display, Formatter, Result as FmtResult};

/// Shown in place of an average when no review supplies the dimension
pub const NO_DATA: &str = "-";

/// The rating columns of one stored review, as read back for aggregation.
///
/// Columns are optional so rows written before the study shape existed
/// (or with a missing value) still aggregate over what they do carry.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RatingSample {
    pub academic: Option<u8>,
    pub social: Option<u8>,
    pub facility: Option<u8>,
    /// Explicit overall score of a study review
    pub overall: Option<u8>,
    pub social_friends: Option<u8>,
    pub cost: Option<u8>,
    pub food: Option<u8>,
    pub environment: Option<u8>,
    pub workload: Option<u8>,
}

impl RatingSample {
    /// This review's contribution to the overall average
    pub fn overall_score(&self) -> Option<f64> {
        if let Some(overall) = valid(self.overall) {
            return Some(overall);
        }

        match (valid(self.academic), valid(self.social), valid(self.facility)) {
            (Some(a), Some(s), Some(f)) => Some((a + s + f) / 3.0),
            _ => None,
        }
    }
}

impl From<&ReviewContent> for RatingSample {
    fn from(content: &ReviewContent) -> Self {
        let legacy = content.legacy_ratings();
        let mut sample = RatingSample {
            academic: Some(legacy.academic.value()),
            social: Some(legacy.social.value()),
            facility: Some(legacy.facility.value()),
            ..Default::default()
        };

        if let ReviewShape::Study(study) = &content.shape {
            sample.overall = Some(study.rating_overall.value());
            sample.social_friends = Some(study.rating_social_friends.value());
            sample.cost = Some(study.rating_cost.value());
            sample.food = Some(study.rating_food.value());
            sample.environment = Some(study.rating_environment.value());
            sample.workload = study.workload_rating.map(|r| r.value());
        }

        sample
    }
}

/// A one-decimal mean, or nothing when no review supplied a value
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Average(Option<f64>);

impl Average {
    pub const NONE: Self = Average(None);

    fn of(values: impl Iterator<Item = f64>) -> Self {
        let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
        if count == 0 {
            return Self::NONE;
        }
        Average(Some(round_one_decimal(sum / count as f64)))
    }

    pub fn value(&self) -> Option<f64> {
        self.0
    }

    pub fn is_no_data(&self) -> bool {
        self.0.is_none()
    }
}

impl Display for Average {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self.0 {
            Some(v) => write!(f, "{v:.1}"),
            None => write!(f, "{NO_DATA}"),
        }
    }
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

fn valid(rating: Option<u8>) -> Option<f64> {
    rating.filter(|r| (1..=5).contains(r)).map(f64::from)
}

/// Rating summary of a set of reviews
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ReviewSummary {
    pub count: usize,
    pub avg_academic: Average,
    pub avg_social: Average,
    pub avg_facility: Average,
    pub avg_overall: Average,
    pub avg_social_friends: Average,
    pub avg_cost: Average,
    pub avg_food: Average,
    pub avg_environment: Average,
    pub avg_workload: Average,
}

/// Summarizes a snapshot of reviews. Used for both program and university grain.
pub fn summarize(samples: &[RatingSample]) -> ReviewSummary {
    let dim = |pick: fn(&RatingSample) -> Option<u8>| {
        Average::of(samples.iter().filter_map(|s| valid(pick(s))))
    };

    ReviewSummary {
        count: samples.len(),
        avg_academic: dim(|s| s.academic),
        avg_social: dim(|s| s.social),
        avg_facility: dim(|s| s.facility),
        avg_overall: Average::of(samples.iter().filter_map(RatingSample::overall_score)),
        avg_social_friends: dim(|s| s.social_friends),
        avg_cost: dim(|s| s.cost),
        avg_food: dim(|s| s.food),
        avg_environment: dim(|s| s.environment),
        avg_workload: dim(|s| s.workload),
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn admission(academic: u8, social: u8, facility: u8) -> RatingSample {
        RatingSample {
            academic: Some(academic),
            social: Some(social),
            facility: Some(facility),
            ..Default::default()
        }
    }

    #[test]
    fn test_empty_is_no_data() {
        let summary = summarize(&[]);

        assert_eq!(summary.count, 0);
        assert!(summary.avg_academic.is_no_data());
        assert!(summary.avg_overall.is_no_data());
        assert_eq!(summary.avg_overall.to_string(), NO_DATA);
        assert_eq!(serde_json::to_value(summary.avg_overall).unwrap(), serde_json::Value::Null);
    }

    #[test]
    fn test_single_admission_review() {
        let summary = summarize(&[admission(4, 5, 3)]);

        assert_eq!(summary.count, 1);
        assert_eq!(summary.avg_overall.to_string(), "4.0");
        assert_eq!(summary.avg_academic.value(), Some(4.0));
        assert!(summary.avg_cost.is_no_data());
    }

    #[test]
    fn test_admission_overall_is_mean_of_means() {
        let samples = [admission(5, 4, 4), admission(2, 3, 3), admission(1, 1, 2)];
        let expected = ((13.0 / 3.0) + (8.0 / 3.0) + (4.0 / 3.0)) / 3.0;

        let summary = summarize(&samples);
        assert_eq!(summary.avg_overall.value(), Some(round_one_decimal(expected)));
        assert_eq!(summary.avg_overall.to_string(), "2.8");
    }

    #[test]
    fn test_study_overall_takes_precedence() {
        let study = RatingSample {
            academic: Some(5),
            social: Some(1),
            facility: Some(1),
            overall: Some(5),
            cost: Some(3),
            ..Default::default()
        };
        let summary = summarize(&[study, admission(3, 3, 3)]);

        // (5 + 3) / 2, not ((7/3) + 3) / 2
        assert_eq!(summary.avg_overall.value(), Some(4.0));
        assert_eq!(summary.avg_cost.value(), Some(3.0));
        assert_eq!(summary.count, 2);
    }

    #[test]
    fn test_invalid_values_are_ignored() {
        let broken = RatingSample {
            academic: Some(0),
            social: Some(4),
            facility: None,
            ..Default::default()
        };
        let summary = summarize(&[broken, admission(4, 4, 4)]);

        assert_eq!(summary.avg_academic.value(), Some(4.0));
        assert_eq!(summary.avg_social.value(), Some(4.0));
        assert_eq!(summary.avg_overall.value(), Some(4.0));
    }
}
