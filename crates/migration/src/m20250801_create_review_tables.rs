use crate::m20250801_create_catalog_tables::Programs;
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create reviews table; one row holds either shape
        manager
            .create_table(
                Table::create()
                    .table(Reviews::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Reviews::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Reviews::ProgramId).uuid().not_null())
                    .col(ColumnDef::new(Reviews::UserId).string().not_null())
                    .col(
                        ColumnDef::new(Reviews::ReviewType)
                            .text()
                            .not_null()
                            .default("admission"),
                    )
                    .col(ColumnDef::new(Reviews::RatingAcademic).small_integer().not_null())
                    .col(ColumnDef::new(Reviews::RatingSocial).small_integer().not_null())
                    .col(ColumnDef::new(Reviews::RatingFacility).small_integer().not_null())
                    .col(ColumnDef::new(Reviews::RatingTotal).double().not_null())
                    .col(ColumnDef::new(Reviews::Comment).text())
                    .col(ColumnDef::new(Reviews::AdmissionRound).small_integer())
                    .col(ColumnDef::new(Reviews::AdmissionYear).integer())
                    .col(ColumnDef::new(Reviews::ProjectName).string())
                    .col(ColumnDef::new(Reviews::PortfolioUrl).string())
                    .col(ColumnDef::new(Reviews::Achievements).text())
                    .col(ColumnDef::new(Reviews::Gpax).double())
                    .col(ColumnDef::new(Reviews::Scores).json())
                    .col(ColumnDef::new(Reviews::StudyYear).text())
                    .col(ColumnDef::new(Reviews::FavoriteSubjects).text())
                    .col(ColumnDef::new(Reviews::WorkloadRating).small_integer())
                    .col(ColumnDef::new(Reviews::StudyTips).text())
                    .col(ColumnDef::new(Reviews::RatingSocialFriends).small_integer())
                    .col(ColumnDef::new(Reviews::RatingCost).small_integer())
                    .col(ColumnDef::new(Reviews::RatingFood).small_integer())
                    .col(ColumnDef::new(Reviews::RatingEnvironment).small_integer())
                    .col(ColumnDef::new(Reviews::RatingOverall).small_integer())
                    .col(
                        ColumnDef::new(Reviews::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-reviews-program_id")
                            .from(Reviews::Table, Reviews::ProgramId)
                            .to(Programs::Table, Programs::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create profiles table, keyed by the identity provider's subject
        manager
            .create_table(
                Table::create()
                    .table(Profiles::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Profiles::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Profiles::FullName).string())
                    .col(ColumnDef::new(Profiles::Email).string())
                    .col(ColumnDef::new(Profiles::AvatarUrl).string())
                    .col(
                        ColumnDef::new(Profiles::Role)
                            .string()
                            .not_null()
                            .default("user"),
                    )
                    .col(
                        ColumnDef::new(Profiles::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Profiles::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Reviews::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum Reviews {
    Table,
    Id,
    ProgramId,
    UserId,
    ReviewType,
    RatingAcademic,
    RatingSocial,
    RatingFacility,
    RatingTotal,
    Comment,
    AdmissionRound,
    AdmissionYear,
    ProjectName,
    PortfolioUrl,
    Achievements,
    Gpax,
    Scores,
    StudyYear,
    FavoriteSubjects,
    WorkloadRating,
    StudyTips,
    RatingSocialFriends,
    RatingCost,
    RatingFood,
    RatingEnvironment,
    RatingOverall,
    CreatedAt,
}

#[derive(Iden)]
enum Profiles {
    Table,
    Id,
    FullName,
    Email,
    AvatarUrl,
    Role,
    CreatedAt,
}
