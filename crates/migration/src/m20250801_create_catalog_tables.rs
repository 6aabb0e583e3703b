use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // Create universities table
        manager
            .create_table(
                Table::create()
                    .table(Universities::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Universities::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Universities::Name).string().not_null())
                    .col(ColumnDef::new(Universities::NameEn).string())
                    .col(
                        ColumnDef::new(Universities::Type)
                            .text()
                            .not_null()
                            .default("Public"),
                    )
                    .col(ColumnDef::new(Universities::LogoUrl).string())
                    .col(
                        ColumnDef::new(Universities::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        // Create faculties table
        manager
            .create_table(
                Table::create()
                    .table(Faculties::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Faculties::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Faculties::UniversityId).uuid().not_null())
                    .col(ColumnDef::new(Faculties::Name).string().not_null())
                    .col(ColumnDef::new(Faculties::NameEn).string())
                    .col(
                        ColumnDef::new(Faculties::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-faculties-university_id")
                            .from(Faculties::Table, Faculties::UniversityId)
                            .to(Universities::Table, Universities::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create departments table
        manager
            .create_table(
                Table::create()
                    .table(Departments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Departments::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Departments::FacultyId).uuid().not_null())
                    .col(ColumnDef::new(Departments::Name).string().not_null())
                    .col(ColumnDef::new(Departments::NameEn).string())
                    .col(
                        ColumnDef::new(Departments::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-departments-faculty_id")
                            .from(Departments::Table, Departments::FacultyId)
                            .to(Faculties::Table, Faculties::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // Create programs table
        manager
            .create_table(
                Table::create()
                    .table(Programs::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Programs::Id).uuid().not_null().primary_key())
                    .col(ColumnDef::new(Programs::DepartmentId).uuid().not_null())
                    .col(ColumnDef::new(Programs::Name).string().not_null())
                    .col(ColumnDef::new(Programs::NameEn).string())
                    .col(
                        ColumnDef::new(Programs::DegreeType)
                            .text()
                            .not_null()
                            .default("ปริญญาตรี"),
                    )
                    .col(ColumnDef::new(Programs::Campus).string().not_null())
                    .col(
                        ColumnDef::new(Programs::CreatedAt)
                            .timestamp()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-programs-department_id")
                            .from(Programs::Table, Programs::DepartmentId)
                            .to(Departments::Table, Departments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Programs::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Departments::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Faculties::Table).to_owned())
            .await?;

        manager
            .drop_table(Table::drop().table(Universities::Table).to_owned())
            .await?;

        Ok(())
    }
}

#[derive(Iden)]
pub(crate) enum Universities {
    Table,
    Id,
    Name,
    NameEn,
    Type,
    LogoUrl,
    CreatedAt,
}

#[derive(Iden)]
pub(crate) enum Faculties {
    Table,
    Id,
    UniversityId,
    Name,
    NameEn,
    CreatedAt,
}

#[derive(Iden)]
pub(crate) enum Departments {
    Table,
    Id,
    FacultyId,
    Name,
    NameEn,
    CreatedAt,
}

#[derive(Iden)]
pub(crate) enum Programs {
    Table,
    Id,
    DepartmentId,
    Name,
    NameEn,
    DegreeType,
    Campus,
    CreatedAt,
}
