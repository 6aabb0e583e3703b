//! Fixtures for store tests running against in-memory SQLite

use crate::{
    entities::{departments, faculties, profiles, programs, reviews, universities},
    services::{
        catalog::{CatalogService, NewProgram, NewUnit, NewUniversity},
        review::ReviewService,
    },
};
use models::{
    review::{
        AdmissionExtras, AdmissionReview, AdmissionRound, Rating, ReviewContent, ReviewShape,
        Scores, StudyReview, StudyYear,
    },
    viewer::{Role, Viewer},
};
use sea_orm::{ConnectOptions, ConnectionTrait, Database, DatabaseConnection, EntityTrait, Schema};
use std::sync::atomic::{AtomicUsize, Ordering};

pub async fn setup_db() -> DatabaseConnection {
    // One connection so every query sees the same in-memory database
    let mut options = ConnectOptions::new("sqlite::memory:");
    options.max_connections(1).min_connections(1).sqlx_logging(false);
    let db = Database::connect(options).await.unwrap();

    create_table(&db, universities::Entity).await;
    create_table(&db, faculties::Entity).await;
    create_table(&db, departments::Entity).await;
    create_table(&db, programs::Entity).await;
    create_table(&db, reviews::Entity).await;
    create_table(&db, profiles::Entity).await;
    db
}

async fn create_table<E: EntityTrait>(db: &DatabaseConnection, entity: E) {
    let backend = db.get_database_backend();
    let statement = Schema::new(backend).create_table_from_entity(entity);
    db.execute(backend.build(&statement)).await.unwrap();
}

pub fn new_university(name: &str) -> NewUniversity {
    NewUniversity {
        name: name.to_string(),
        name_en: None,
        university_type: Default::default(),
        logo_url: None,
    }
}

pub fn new_unit(name: &str) -> NewUnit {
    NewUnit {
        name: name.to_string(),
        name_en: None,
    }
}

pub fn new_program(name: &str) -> NewProgram {
    NewProgram {
        name: name.to_string(),
        name_en: None,
        degree_type: Default::default(),
        campus: "บางเขน".to_string(),
    }
}

static SEQ: AtomicUsize = AtomicUsize::new(0);

/// A fresh university with one faculty, department and program beneath it
pub async fn seed_program(
    db: &DatabaseConnection,
) -> (
    universities::Model,
    faculties::Model,
    departments::Model,
    programs::Model,
) {
    let n = SEQ.fetch_add(1, Ordering::Relaxed);

    let uni = CatalogService::create_university(db, new_university(&format!("University {n}")))
        .await
        .unwrap();
    let faculty = CatalogService::create_faculty(db, uni.id, new_unit("Engineering"))
        .await
        .unwrap();
    let department =
        CatalogService::create_department(db, faculty.id, new_unit("Computer Engineering"))
            .await
            .unwrap();
    let program = CatalogService::create_program(db, department.id, new_program("B.Eng. CompE"))
        .await
        .unwrap();

    (uni, faculty, department, program)
}

fn rating(value: u8) -> Rating {
    Rating::new(value).unwrap()
}

/// Round 3, 2567, ratings 4/5/3, GPAX 3.50 and one A-Level score
pub fn admission_round_three() -> ReviewContent {
    ReviewContent {
        shape: ReviewShape::Admission(AdmissionReview {
            round: AdmissionRound::Admission,
            year: 2567,
            rating_academic: rating(4),
            rating_social: rating(5),
            rating_facility: rating(3),
            extras: AdmissionExtras::Scores {
                gpax: Some(3.5),
                scores: Scores::from([("A_Math1".to_string(), 72.5)]),
            },
        }),
        comment: Some("ข้อสอบยากแต่คุ้ม".to_string()),
    }
}

/// Overall 5, friends 4, cost 3, food 4, environment 5, workload 2
pub fn study_review() -> ReviewContent {
    ReviewContent {
        shape: ReviewShape::Study(StudyReview {
            study_year: Some(StudyYear::Year(2)),
            favorite_subjects: Some("Data Structures".to_string()),
            workload_rating: Some(rating(2)),
            study_tips: None,
            rating_social_friends: rating(4),
            rating_cost: rating(3),
            rating_food: rating(4),
            rating_environment: rating(5),
            rating_overall: rating(5),
        }),
        comment: None,
    }
}

pub async fn insert_review(db: &DatabaseConnection, program_id: uuid::Uuid, author: &str) {
    ReviewService::insert(
        db,
        &Viewer::new(author, Role::User),
        program_id,
        &admission_round_three(),
    )
    .await
    .unwrap();
}
