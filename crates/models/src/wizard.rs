//! Multi-step review form.
//!
//! ```text
//! ChooseType ─┬─ AdmissionDetails ─┬─ Ratings ── Comment ── Submitting ─┬─ Success
//!             └─ StudyDetails ─────┘                        ▲           └─ Failure
//!                                                           └── retry ──────┘
//! ```
//!
//! Fields survive stepping back and forth within one attempt and are only
//! cleared by [`ReviewForm::restart`] or a successful submission.

use crate::{
    error::ValidationError,
    review::{
        AdmissionExtras, AdmissionReview, AdmissionRound, Rating, ReviewContent, ReviewShape,
        ReviewType, Scores, StudyReview, StudyYear, validate_gpax, validate_score,
    },
    subject::Subject,
};
use serde::Serialize;
use strum::{AsRefStr, IntoEnumIterator, IntoStaticStr};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Serialize, AsRefStr)]
pub enum FormStep {
    ChooseType,
    AdmissionDetails,
    StudyDetails,
    Ratings,
    Comment,
    Submitting,
    Success,
    /// Holds the store's error message; all entered data is kept
    Failure(String),
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FormError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("choose a review type first")]
    TypeNotChosen,

    #[error("cannot {action} from the {step} step")]
    InvalidTransition { action: &'static str, step: String },

    #[error("a score for {0} has already been added")]
    DuplicateSubject(String),

    #[error("no score for {0} has been added")]
    UnknownSubject(String),
}

/// One star-rating input of the form
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum RatingField {
    Academic,
    Social,
    Facility,
    SocialFriends,
    Cost,
    Food,
    Environment,
    Overall,
}

impl RatingField {
    const ADMISSION: [RatingField; 3] = [Self::Academic, Self::Social, Self::Facility];
    const STUDY: [RatingField; 5] = [
        Self::SocialFriends,
        Self::Cost,
        Self::Food,
        Self::Environment,
        Self::Overall,
    ];

    /// Ratings that must be chosen before leaving the ratings step
    pub fn required_for(review_type: ReviewType) -> &'static [RatingField] {
        match review_type {
            ReviewType::Admission => &Self::ADMISSION,
            ReviewType::Study => &Self::STUDY,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct AdmissionFields {
    pub round: Option<AdmissionRound>,
    pub year: Option<u16>,
    pub project_name: String,
    pub portfolio_url: String,
    pub achievements: String,
    gpax: Option<f64>,
    scores: Scores,
}

impl AdmissionFields {
    pub fn gpax(&self) -> Option<f64> {
        self.gpax
    }

    pub fn scores(&self) -> &Scores {
        &self.scores
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct StudyFields {
    pub study_year: Option<StudyYear>,
    pub favorite_subjects: String,
    pub study_tips: String,
    workload_rating: u8,
}

impl StudyFields {
    pub fn workload_rating(&self) -> u8 {
        self.workload_rating
    }
}

/// Star inputs, 0 meaning "not yet chosen"
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct RatingInputs([u8; 8]);

impl RatingInputs {
    fn index(field: RatingField) -> usize {
        field as usize
    }

    fn get(&self, field: RatingField) -> u8 {
        self.0[Self::index(field)]
    }

    fn set(&mut self, field: RatingField, value: u8) {
        self.0[Self::index(field)] = value;
    }

    fn rating(&self, field: RatingField) -> Result<Rating, ValidationError> {
        Rating::from_input(self.get(field), field.into())
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReviewForm {
    step: FormStep,
    review_type: Option<ReviewType>,
    pub admission: AdmissionFields,
    pub study: StudyFields,
    pub comment: String,
    ratings: RatingInputs,
}

impl Default for ReviewForm {
    fn default() -> Self {
        Self::new()
    }
}

impl ReviewForm {
    pub fn new() -> Self {
        Self {
            step: FormStep::ChooseType,
            review_type: None,
            admission: AdmissionFields::default(),
            study: StudyFields::default(),
            comment: String::new(),
            ratings: RatingInputs::default(),
        }
    }

    pub fn step(&self) -> &FormStep {
        &self.step
    }

    pub fn review_type(&self) -> Option<ReviewType> {
        self.review_type
    }

    /// Clears every field and returns to the first step
    pub fn restart(&mut self) {
        *self = Self::new();
    }

    fn invalid(&self, action: &'static str) -> FormError {
        FormError::InvalidTransition {
            action,
            step: self.step.as_ref().to_string(),
        }
    }

    fn require_step(&self, allowed: &[FormStep], action: &'static str) -> Result<(), FormError> {
        if allowed.contains(&self.step) {
            Ok(())
        } else {
            Err(self.invalid(action))
        }
    }

    pub fn choose_type(&mut self, review_type: ReviewType) -> Result<(), FormError> {
        self.require_step(&[FormStep::ChooseType], "choose a review type")?;
        self.review_type = Some(review_type);
        Ok(())
    }

    /// Whether the portfolio inputs should be shown for the chosen round
    pub fn shows_portfolio_fields(&self) -> bool {
        self.admission
            .round
            .is_some_and(AdmissionRound::is_portfolio_round)
    }

    /// Whether the GPAX and score inputs should be shown for the chosen round
    pub fn shows_score_fields(&self) -> bool {
        self.admission
            .round
            .is_some_and(|round| !round.is_portfolio_round())
    }

    pub fn set_gpax(&mut self, gpax: Option<f64>) -> Result<(), FormError> {
        validate_gpax(gpax)?;
        self.admission.gpax = gpax;
        Ok(())
    }

    /// Subjects the score selector still offers
    pub fn available_subjects(&self) -> Vec<Subject> {
        Subject::iter()
            .filter(|subject| !self.admission.scores.contains_key(subject.code()))
            .collect()
    }

    pub fn add_score(&mut self, subject: Subject, value: f64) -> Result<(), FormError> {
        let code = subject.code().to_string();
        if self.admission.scores.contains_key(&code) {
            return Err(FormError::DuplicateSubject(code));
        }
        validate_score(&code, value)?;
        self.admission.scores.insert(code, value);
        Ok(())
    }

    pub fn update_score(&mut self, code: &str, value: f64) -> Result<(), FormError> {
        validate_score(code, value)?;
        match self.admission.scores.get_mut(code) {
            Some(score) => {
                *score = value;
                Ok(())
            }
            None => Err(FormError::UnknownSubject(code.to_string())),
        }
    }

    pub fn remove_score(&mut self, code: &str) -> Option<f64> {
        self.admission.scores.remove(code)
    }

    pub fn set_workload(&mut self, value: u8) -> Result<(), FormError> {
        if value != 0 {
            Rating::try_from(value)?;
        }
        self.study.workload_rating = value;
        Ok(())
    }

    pub fn rating(&self, field: RatingField) -> u8 {
        self.ratings.get(field)
    }

    /// Sets a star rating; 0 clears it
    pub fn set_rating(&mut self, field: RatingField, value: u8) -> Result<(), FormError> {
        if value > Rating::MAX {
            return Err(ValidationError::RatingOutOfRange(value).into());
        }
        self.ratings.set(field, value);
        Ok(())
    }

    /// The step `next` would move to, or why it cannot
    pub fn check_advance(&self) -> Result<FormStep, FormError> {
        match self.step {
            FormStep::ChooseType => match self.review_type {
                Some(ReviewType::Admission) => Ok(FormStep::AdmissionDetails),
                Some(ReviewType::Study) => Ok(FormStep::StudyDetails),
                None => Err(FormError::TypeNotChosen),
            },
            FormStep::AdmissionDetails => {
                if self.admission.round.is_none() {
                    return Err(ValidationError::MissingField("admission round").into());
                }
                if self.admission.year.is_none() {
                    return Err(ValidationError::MissingField("admission year").into());
                }
                Ok(FormStep::Ratings)
            }
            FormStep::StudyDetails => Ok(FormStep::Ratings),
            FormStep::Ratings => {
                let review_type = self.review_type.ok_or(FormError::TypeNotChosen)?;
                for field in RatingField::required_for(review_type) {
                    self.ratings.rating(*field)?;
                }
                Ok(FormStep::Comment)
            }
            _ => Err(self.invalid("advance")),
        }
    }

    pub fn can_advance(&self) -> bool {
        self.check_advance().is_ok()
    }

    pub fn next(&mut self) -> Result<&FormStep, FormError> {
        self.step = self.check_advance()?;
        Ok(&self.step)
    }

    pub fn back(&mut self) -> Result<&FormStep, FormError> {
        self.step = match (&self.step, self.review_type) {
            (FormStep::AdmissionDetails | FormStep::StudyDetails, _) => FormStep::ChooseType,
            (FormStep::Ratings, Some(ReviewType::Admission)) => FormStep::AdmissionDetails,
            (FormStep::Ratings, Some(ReviewType::Study)) => FormStep::StudyDetails,
            (FormStep::Comment, _) => FormStep::Ratings,
            (FormStep::Failure(_), _) => FormStep::Comment,
            _ => return Err(self.invalid("go back")),
        };
        Ok(&self.step)
    }

    /// Builds the normalized review from the entered fields
    pub fn build_content(&self) -> Result<ReviewContent, FormError> {
        let shape = match self.review_type.ok_or(FormError::TypeNotChosen)? {
            ReviewType::Admission => ReviewShape::Admission(self.build_admission()?),
            ReviewType::Study => ReviewShape::Study(self.build_study()?),
        };

        let content = ReviewContent {
            shape,
            comment: Some(self.comment.clone()),
        }
        .normalized();
        content.validate()?;
        Ok(content)
    }

    fn build_admission(&self) -> Result<AdmissionReview, FormError> {
        let fields = &self.admission;
        let round = fields
            .round
            .ok_or(ValidationError::MissingField("admission round"))?;
        let year = fields
            .year
            .ok_or(ValidationError::MissingField("admission year"))?;

        let extras = if round.is_portfolio_round() {
            AdmissionExtras::Portfolio {
                project_name: Some(fields.project_name.clone()),
                portfolio_url: Some(fields.portfolio_url.clone()),
                achievements: Some(fields.achievements.clone()),
            }
        } else {
            AdmissionExtras::Scores {
                gpax: fields.gpax,
                scores: fields.scores.clone(),
            }
        };

        Ok(AdmissionReview {
            round,
            year,
            rating_academic: self.ratings.rating(RatingField::Academic)?,
            rating_social: self.ratings.rating(RatingField::Social)?,
            rating_facility: self.ratings.rating(RatingField::Facility)?,
            extras,
        })
    }

    fn build_study(&self) -> Result<StudyReview, FormError> {
        let fields = &self.study;
        let workload_rating = match fields.workload_rating {
            0 => None,
            v => Some(Rating::try_from(v)?),
        };

        Ok(StudyReview {
            study_year: fields.study_year,
            favorite_subjects: Some(fields.favorite_subjects.clone()),
            workload_rating,
            study_tips: Some(fields.study_tips.clone()),
            rating_social_friends: self.ratings.rating(RatingField::SocialFriends)?,
            rating_cost: self.ratings.rating(RatingField::Cost)?,
            rating_food: self.ratings.rating(RatingField::Food)?,
            rating_environment: self.ratings.rating(RatingField::Environment)?,
            rating_overall: self.ratings.rating(RatingField::Overall)?,
        })
    }

    /// Confirms the comment step (or retries after a failure) and hands back the review to store
    pub fn submit(&mut self) -> Result<ReviewContent, FormError> {
        if !matches!(self.step, FormStep::Comment | FormStep::Failure(_)) {
            return Err(self.invalid("submit"));
        }

        let content = self.build_content()?;
        self.step = FormStep::Submitting;
        Ok(content)
    }

    /// Records the outcome of the store call started by [`ReviewForm::submit`]
    pub fn finish(&mut self, outcome: Result<(), String>) -> Result<&FormStep, FormError> {
        self.require_step(&[FormStep::Submitting], "finish")?;

        match outcome {
            Ok(()) => {
                self.restart();
                self.step = FormStep::Success;
            }
            Err(message) => self.step = FormStep::Failure(message),
        }
        Ok(&self.step)
    }

    /// True once a submission has succeeded and the wizard should close
    pub fn is_done(&self) -> bool {
        self.step == FormStep::Success
    }
}

#[cfg(test)]
mod test {
    use super::*;

    fn admission_form_at_ratings() -> ReviewForm {
        let mut form = ReviewForm::new();
        form.choose_type(ReviewType::Admission).unwrap();
        form.next().unwrap();
        form.admission.round = Some(AdmissionRound::Admission);
        form.admission.year = Some(2567);
        form.next().unwrap();
        form
    }

    #[test]
    fn test_choose_type_routes_details_step() {
        let mut form = ReviewForm::new();
        assert_eq!(form.next(), Err(FormError::TypeNotChosen));

        form.choose_type(ReviewType::Study).unwrap();
        assert_eq!(form.next(), Ok(&FormStep::StudyDetails));

        form.back().unwrap();
        form.choose_type(ReviewType::Admission).unwrap();
        assert_eq!(form.next(), Ok(&FormStep::AdmissionDetails));
    }

    #[test]
    fn test_admission_details_require_round_and_year() {
        let mut form = ReviewForm::new();
        form.choose_type(ReviewType::Admission).unwrap();
        form.next().unwrap();

        assert!(!form.can_advance());
        form.admission.round = Some(AdmissionRound::Portfolio);
        assert_eq!(
            form.check_advance(),
            Err(FormError::Validation(ValidationError::MissingField(
                "admission year"
            )))
        );
        form.admission.year = Some(2567);
        assert!(form.shows_portfolio_fields());
        assert!(!form.shows_score_fields());
        assert_eq!(form.next(), Ok(&FormStep::Ratings));
    }

    #[test]
    fn test_study_details_never_block() {
        let mut form = ReviewForm::new();
        form.choose_type(ReviewType::Study).unwrap();
        form.next().unwrap();
        assert_eq!(form.next(), Ok(&FormStep::Ratings));
    }

    #[test]
    fn test_ratings_unlock_with_last_rating() {
        let mut form = admission_form_at_ratings();

        form.set_rating(RatingField::Academic, 4).unwrap();
        form.set_rating(RatingField::Social, 5).unwrap();
        assert!(!form.can_advance());

        form.set_rating(RatingField::Facility, 1).unwrap();
        assert!(form.can_advance());

        form.set_rating(RatingField::Facility, 0).unwrap();
        assert!(!form.can_advance());

        assert!(form.set_rating(RatingField::Facility, 6).is_err());
    }

    #[test]
    fn test_study_requires_five_ratings() {
        let mut form = ReviewForm::new();
        form.choose_type(ReviewType::Study).unwrap();
        form.next().unwrap();
        form.next().unwrap();

        // admission ratings do not count for the study shape
        for field in RatingField::ADMISSION {
            form.set_rating(field, 5).unwrap();
        }
        assert!(!form.can_advance());

        for field in RatingField::STUDY {
            assert!(!form.can_advance());
            form.set_rating(field, 3).unwrap();
        }
        assert!(form.can_advance());
    }

    #[test]
    fn test_scores_selector() {
        let mut form = admission_form_at_ratings();
        let total = form.available_subjects().len();

        form.add_score(Subject::AMath1, 72.5).unwrap();
        assert_eq!(form.available_subjects().len(), total - 1);
        assert!(!form.available_subjects().contains(&Subject::AMath1));
        assert_eq!(
            form.add_score(Subject::AMath1, 10.0),
            Err(FormError::DuplicateSubject("A_Math1".to_string()))
        );
        assert!(form.add_score(Subject::APhy, 120.0).is_err());

        form.update_score("A_Math1", 80.0).unwrap();
        assert_eq!(form.admission.scores().get("A_Math1"), Some(&80.0));
        assert_eq!(form.remove_score("A_Math1"), Some(80.0));
        assert_eq!(form.available_subjects().len(), total);
        assert!(form.update_score("A_Math1", 1.0).is_err());
    }

    #[test]
    fn test_fields_survive_back_navigation() {
        let mut form = admission_form_at_ratings();
        form.set_rating(RatingField::Academic, 4).unwrap();
        form.set_gpax(Some(3.5)).unwrap();

        form.back().unwrap();
        form.back().unwrap();
        assert_eq!(form.step(), &FormStep::ChooseType);
        form.next().unwrap();
        form.next().unwrap();

        assert_eq!(form.rating(RatingField::Academic), 4);
        assert_eq!(form.admission.gpax(), Some(3.5));
        assert_eq!(form.admission.year, Some(2567));
    }

    #[test]
    fn test_submit_success_clears_everything() {
        let mut form = admission_form_at_ratings();
        for (field, value) in [
            (RatingField::Academic, 4),
            (RatingField::Social, 5),
            (RatingField::Facility, 3),
        ] {
            form.set_rating(field, value).unwrap();
        }
        form.set_gpax(Some(3.5)).unwrap();
        form.add_score(Subject::AMath1, 72.5).unwrap();
        form.next().unwrap();
        form.comment = "ข้อสอบยากแต่คุ้ม".to_string();

        let content = form.submit().unwrap();
        assert_eq!(form.step(), &FormStep::Submitting);
        assert_eq!(content.overall_score(), 4.0);
        let ReviewShape::Admission(admission) = &content.shape else {
            panic!("expected an admission review");
        };
        assert_eq!(
            admission.extras,
            AdmissionExtras::Scores {
                gpax: Some(3.5),
                scores: Scores::from([("A_Math1".to_string(), 72.5)]),
            }
        );

        form.finish(Ok(())).unwrap();
        assert!(form.is_done());
        assert_eq!(form.review_type(), None);
        assert_eq!(form.rating(RatingField::Academic), 0);
        assert!(form.comment.is_empty());
    }

    #[test]
    fn test_submit_failure_keeps_data_and_allows_retry() {
        let mut form = admission_form_at_ratings();
        for field in RatingField::ADMISSION {
            form.set_rating(field, 2).unwrap();
        }
        form.next().unwrap();
        form.submit().unwrap();

        form.finish(Err("network down".to_string())).unwrap();
        assert_eq!(form.step(), &FormStep::Failure("network down".to_string()));
        assert_eq!(form.rating(RatingField::Social), 2);

        let retried = form.submit().unwrap();
        assert_eq!(retried.legacy_ratings().social.value(), 2);
        assert_eq!(form.step(), &FormStep::Submitting);
    }

    #[test]
    fn test_study_submission_maps_legacy_ratings() {
        let mut form = ReviewForm::new();
        form.choose_type(ReviewType::Study).unwrap();
        form.next().unwrap();
        form.set_workload(2).unwrap();
        form.study.study_year = Some(StudyYear::Year(3));
        form.next().unwrap();
        for (field, value) in [
            (RatingField::Overall, 5),
            (RatingField::SocialFriends, 4),
            (RatingField::Cost, 3),
            (RatingField::Food, 4),
            (RatingField::Environment, 5),
        ] {
            form.set_rating(field, value).unwrap();
        }
        form.next().unwrap();

        let content = form.submit().unwrap();
        let legacy = content.legacy_ratings();
        assert_eq!(
            (legacy.academic.value(), legacy.social.value(), legacy.facility.value()),
            (5, 4, 5)
        );
        assert_eq!(content.comment, None);
    }

    #[test]
    fn test_build_content_names_missing_rating_and_trims_text() {
        let mut form = ReviewForm::new();
        form.choose_type(ReviewType::Study).unwrap();
        form.study.study_tips = "  อ่านก่อนเรียน\n".to_string();
        form.comment = " \n ".to_string();
        assert_eq!(
            form.build_content(),
            Err(FormError::Validation(ValidationError::MissingRating(
                "social_friends"
            )))
        );

        for field in RatingField::STUDY {
            form.set_rating(field, 4).unwrap();
        }
        let content = form.build_content().unwrap();
        assert_eq!(content.comment, None);
        let ReviewShape::Study(study) = &content.shape else {
            panic!("expected a study review");
        };
        assert_eq!(study.study_tips.as_deref(), Some("อ่านก่อนเรียน"));
    }

    #[test]
    fn test_out_of_order_actions_are_rejected() {
        let mut form = ReviewForm::new();
        assert!(form.submit().is_err());
        assert!(form.back().is_err());
        assert!(form.finish(Ok(())).is_err());

        form.choose_type(ReviewType::Study).unwrap();
        form.next().unwrap();
        assert!(form.choose_type(ReviewType::Admission).is_err());
    }
}
