use crate::{
    m20250801_create_catalog_tables::{Departments, Faculties, Programs, Universities},
    m20250801_create_review_tables::Reviews,
};
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Parent lookups used by listing and cascade delete
        manager
            .create_index(
                Index::create()
                    .name("idx_faculties_university_id")
                    .table(Faculties::Table)
                    .col(Faculties::UniversityId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_departments_faculty_id")
                    .table(Departments::Table)
                    .col(Departments::FacultyId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_programs_department_id")
                    .table(Programs::Table)
                    .col(Programs::DepartmentId)
                    .to_owned(),
            )
            .await?;

        // Review listing per program and across the feed
        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_program_id_created_at")
                    .table(Reviews::Table)
                    .col(Reviews::ProgramId)
                    .col(Reviews::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_created_at")
                    .table(Reviews::Table)
                    .col(Reviews::CreatedAt)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_rating_total")
                    .table(Reviews::Table)
                    .col(Reviews::RatingTotal)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_reviews_user_id")
                    .table(Reviews::Table)
                    .col(Reviews::UserId)
                    .to_owned(),
            )
            .await?;

        // Logo seeding updates by name
        manager
            .create_index(
                Index::create()
                    .name("idx_universities_name")
                    .table(Universities::Table)
                    .col(Universities::Name)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Drop indexes in reverse order
        for name in [
            "idx_universities_name",
            "idx_reviews_user_id",
            "idx_reviews_rating_total",
            "idx_reviews_created_at",
            "idx_reviews_program_id_created_at",
            "idx_programs_department_id",
            "idx_departments_faculty_id",
            "idx_faculties_university_id",
        ] {
            manager
                .drop_index(Index::drop().name(name).to_owned())
                .await?;
        }

        Ok(())
    }
}
