use crate::{
    entities::{departments, faculties, programs, reviews, universities},
    error::{ServiceError, ServiceResult},
};
use chrono::Utc;
use log::{debug, info};
use models::{
    catalog::{CatalogLevel, DegreeType, UniversityType},
    error::ValidationError,
};
use sea_orm::{
    ActiveValue::Set, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, QuerySelect, TransactionTrait, sea_query::Expr,
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Deserialize)]
pub struct NewUniversity {
    pub name: String,
    pub name_en: Option<String>,
    #[serde(default)]
    pub university_type: UniversityType,
    pub logo_url: Option<String>,
}

/// Attributes of a faculty or department
#[derive(Debug, Clone, Deserialize)]
pub struct NewUnit {
    pub name: String,
    pub name_en: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewProgram {
    pub name: String,
    pub name_en: Option<String>,
    #[serde(default)]
    pub degree_type: DegreeType,
    pub campus: String,
}

/// Number of rows removed per level by a cascading delete
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CascadeReport {
    pub universities: u64,
    pub faculties: u64,
    pub departments: u64,
    pub programs: u64,
    pub reviews: u64,
}

impl CascadeReport {
    pub fn total(&self) -> u64 {
        self.universities + self.faculties + self.departments + self.programs + self.reviews
    }

    /// True when nothing was deleted, i.e. the record was already gone
    pub fn is_empty(&self) -> bool {
        self.total() == 0
    }
}

pub struct CatalogService;

impl CatalogService {
    fn required_name(name: &str, what: &'static str) -> ServiceResult<String> {
        let name = name.trim();
        if name.is_empty() {
            return Err(ValidationError::EmptyName(what).into());
        }
        Ok(name.to_string())
    }

    fn optional_text(value: Option<String>) -> Option<String> {
        value
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    pub async fn create_university(
        db: &DatabaseConnection,
        attrs: NewUniversity,
    ) -> ServiceResult<universities::Model> {
        let model = universities::ActiveModel {
            id: Set(Uuid::now_v7()),
            name: Set(Self::required_name(&attrs.name, "university name")?),
            name_en: Set(Self::optional_text(attrs.name_en)),
            university_type: Set(attrs.university_type),
            logo_url: Set(Self::optional_text(attrs.logo_url)),
            created_at: Set(Utc::now().naive_utc()),
        };

        let university = universities::Entity::insert(model)
            .exec_with_returning(db)
            .await?;
        info!("Created university {} ({})", university.name, university.id);
        Ok(university)
    }

    pub async fn create_faculty(
        db: &DatabaseConnection,
        university_id: Uuid,
        attrs: NewUnit,
    ) -> ServiceResult<faculties::Model> {
        let name = Self::required_name(&attrs.name, "faculty name")?;
        Self::require_parent::<universities::Entity>(db, university_id, "university").await?;

        let faculty = faculties::Entity::insert(faculties::ActiveModel {
            id: Set(Uuid::now_v7()),
            university_id: Set(university_id),
            name: Set(name),
            name_en: Set(Self::optional_text(attrs.name_en)),
            created_at: Set(Utc::now().naive_utc()),
        })
        .exec_with_returning(db)
        .await?;

        info!("Created faculty {} under university {university_id}", faculty.id);
        Ok(faculty)
    }

    pub async fn create_department(
        db: &DatabaseConnection,
        faculty_id: Uuid,
        attrs: NewUnit,
    ) -> ServiceResult<departments::Model> {
        let name = Self::required_name(&attrs.name, "department name")?;
        Self::require_parent::<faculties::Entity>(db, faculty_id, "faculty").await?;

        let department = departments::Entity::insert(departments::ActiveModel {
            id: Set(Uuid::now_v7()),
            faculty_id: Set(faculty_id),
            name: Set(name),
            name_en: Set(Self::optional_text(attrs.name_en)),
            created_at: Set(Utc::now().naive_utc()),
        })
        .exec_with_returning(db)
        .await?;

        info!("Created department {} under faculty {faculty_id}", department.id);
        Ok(department)
    }

    pub async fn create_program(
        db: &DatabaseConnection,
        department_id: Uuid,
        attrs: NewProgram,
    ) -> ServiceResult<programs::Model> {
        let name = Self::required_name(&attrs.name, "program name")?;
        let campus = Self::required_name(&attrs.campus, "campus")?;
        Self::require_parent::<departments::Entity>(db, department_id, "department").await?;

        let program = programs::Entity::insert(programs::ActiveModel {
            id: Set(Uuid::now_v7()),
            department_id: Set(department_id),
            name: Set(name),
            name_en: Set(Self::optional_text(attrs.name_en)),
            degree_type: Set(attrs.degree_type),
            campus: Set(campus),
            created_at: Set(Utc::now().naive_utc()),
        })
        .exec_with_returning(db)
        .await?;

        info!("Created program {} under department {department_id}", program.id);
        Ok(program)
    }

    async fn require_parent<E>(
        db: &DatabaseConnection,
        id: Uuid,
        level: &'static str,
    ) -> ServiceResult<()>
    where
        E: EntityTrait,
        <E::PrimaryKey as sea_orm::PrimaryKeyTrait>::ValueType: From<Uuid>,
    {
        match E::find_by_id(id).one(db).await? {
            Some(_) => Ok(()),
            None => Err(ValidationError::MissingParent(level).into()),
        }
    }

    pub async fn list_universities(
        db: &DatabaseConnection,
    ) -> ServiceResult<Vec<universities::Model>> {
        let universities = universities::Entity::find()
            .order_by_asc(universities::Column::CreatedAt)
            .order_by_asc(universities::Column::Id)
            .all(db)
            .await?;
        debug!("Listed {} universities", universities.len());
        Ok(universities)
    }

    pub async fn list_faculties(
        db: &DatabaseConnection,
        university_id: Uuid,
    ) -> ServiceResult<Vec<faculties::Model>> {
        Ok(faculties::Entity::find()
            .filter(faculties::Column::UniversityId.eq(university_id))
            .order_by_asc(faculties::Column::CreatedAt)
            .order_by_asc(faculties::Column::Id)
            .all(db)
            .await?)
    }

    pub async fn list_departments(
        db: &DatabaseConnection,
        faculty_id: Uuid,
    ) -> ServiceResult<Vec<departments::Model>> {
        Ok(departments::Entity::find()
            .filter(departments::Column::FacultyId.eq(faculty_id))
            .order_by_asc(departments::Column::CreatedAt)
            .order_by_asc(departments::Column::Id)
            .all(db)
            .await?)
    }

    pub async fn list_programs(
        db: &DatabaseConnection,
        department_id: Uuid,
    ) -> ServiceResult<Vec<programs::Model>> {
        Ok(programs::Entity::find()
            .filter(programs::Column::DepartmentId.eq(department_id))
            .order_by_asc(programs::Column::CreatedAt)
            .order_by_asc(programs::Column::Id)
            .all(db)
            .await?)
    }

    pub async fn get_university(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> ServiceResult<universities::Model> {
        universities::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("university", id))
    }

    pub async fn get_faculty(db: &DatabaseConnection, id: Uuid) -> ServiceResult<faculties::Model> {
        faculties::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("faculty", id))
    }

    pub async fn get_department(
        db: &DatabaseConnection,
        id: Uuid,
    ) -> ServiceResult<departments::Model> {
        departments::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("department", id))
    }

    pub async fn get_program(db: &DatabaseConnection, id: Uuid) -> ServiceResult<programs::Model> {
        programs::Entity::find_by_id(id)
            .one(db)
            .await?
            .ok_or_else(|| ServiceError::not_found("program", id))
    }

    /// Sets the logo of every university with exactly this name, returning how many changed
    pub async fn update_university_logo(
        db: &DatabaseConnection,
        name: &str,
        logo_url: &str,
    ) -> ServiceResult<u64> {
        let result = universities::Entity::update_many()
            .col_expr(universities::Column::LogoUrl, Expr::value(logo_url))
            .filter(universities::Column::Name.eq(name.trim()))
            .exec(db)
            .await?;

        debug!("Updated logo of {} universities named {name}", result.rows_affected);
        Ok(result.rows_affected)
    }

    /// Deletes a record and everything beneath it in one transaction.
    ///
    /// Deleting a record that no longer exists succeeds with an empty report.
    pub async fn delete(
        db: &DatabaseConnection,
        level: CatalogLevel,
        id: Uuid,
    ) -> ServiceResult<CascadeReport> {
        let txn = db.begin().await?;

        let (mut university_ids, mut faculty_ids, mut department_ids, mut program_ids) =
            (vec![], vec![], vec![], vec![]);
        match level {
            CatalogLevel::University => university_ids.push(id),
            CatalogLevel::Faculty => faculty_ids.push(id),
            CatalogLevel::Department => department_ids.push(id),
            CatalogLevel::Program => program_ids.push(id),
        }

        // Collect the subtree top-down
        if !university_ids.is_empty() {
            faculty_ids.extend(
                Self::child_ids(
                    &txn,
                    faculties::Entity::find()
                        .filter(faculties::Column::UniversityId.is_in(university_ids.clone())),
                    faculties::Column::Id,
                )
                .await?,
            );
        }
        if !faculty_ids.is_empty() {
            department_ids.extend(
                Self::child_ids(
                    &txn,
                    departments::Entity::find()
                        .filter(departments::Column::FacultyId.is_in(faculty_ids.clone())),
                    departments::Column::Id,
                )
                .await?,
            );
        }
        if !department_ids.is_empty() {
            program_ids.extend(
                Self::child_ids(
                    &txn,
                    programs::Entity::find()
                        .filter(programs::Column::DepartmentId.is_in(department_ids.clone())),
                    programs::Column::Id,
                )
                .await?,
            );
        }

        // Remove it bottom-up so no row ever points at a missing parent
        let mut report = CascadeReport::default();
        if !program_ids.is_empty() {
            report.reviews = reviews::Entity::delete_many()
                .filter(reviews::Column::ProgramId.is_in(program_ids.clone()))
                .exec(&txn)
                .await?
                .rows_affected;
            report.programs = programs::Entity::delete_many()
                .filter(programs::Column::Id.is_in(program_ids))
                .exec(&txn)
                .await?
                .rows_affected;
        }
        if !department_ids.is_empty() {
            report.departments = departments::Entity::delete_many()
                .filter(departments::Column::Id.is_in(department_ids))
                .exec(&txn)
                .await?
                .rows_affected;
        }
        if !faculty_ids.is_empty() {
            report.faculties = faculties::Entity::delete_many()
                .filter(faculties::Column::Id.is_in(faculty_ids))
                .exec(&txn)
                .await?
                .rows_affected;
        }
        if !university_ids.is_empty() {
            report.universities = universities::Entity::delete_many()
                .filter(universities::Column::Id.is_in(university_ids))
                .exec(&txn)
                .await?
                .rows_affected;
        }

        txn.commit().await?;

        if report.is_empty() {
            debug!("{level} {id} was already deleted");
        } else {
            info!("Deleted {level} {id}: {report:?}");
        }
        Ok(report)
    }

    async fn child_ids<C, E>(
        conn: &C,
        query: sea_orm::Select<E>,
        id_column: E::Column,
    ) -> ServiceResult<Vec<Uuid>>
    where
        C: ConnectionTrait,
        E: EntityTrait,
    {
        Ok(query
            .select_only()
            .column(id_column)
            .into_tuple::<Uuid>()
            .all(conn)
            .await?)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::{new_program, new_unit, new_university, setup_db};

    #[tokio::test]
    async fn test_create_and_list_hierarchy() {
        let db = setup_db().await;

        let uni = CatalogService::create_university(&db, new_university("Kasetsart"))
            .await
            .unwrap();
        assert_eq!(uni.university_type, UniversityType::Public);

        let faculty = CatalogService::create_faculty(&db, uni.id, new_unit("Engineering"))
            .await
            .unwrap();
        let department =
            CatalogService::create_department(&db, faculty.id, new_unit("Computer Engineering"))
                .await
                .unwrap();
        let program = CatalogService::create_program(
            &db,
            department.id,
            new_program("B.Eng. CompE, Bang Khen campus"),
        )
        .await
        .unwrap();

        let programs = CatalogService::list_programs(&db, department.id).await.unwrap();
        assert_eq!(programs, vec![program]);
        assert_eq!(
            CatalogService::list_faculties(&db, uni.id).await.unwrap(),
            vec![faculty]
        );
    }

    #[tokio::test]
    async fn test_list_keeps_creation_order() {
        let db = setup_db().await;
        let uni = CatalogService::create_university(&db, new_university("Chulalongkorn"))
            .await
            .unwrap();

        let mut created = vec![];
        for name in ["Science", "Arts", "Medicine", "Law"] {
            let faculty = CatalogService::create_faculty(&db, uni.id, new_unit(name))
                .await
                .unwrap();
            created.push(faculty.name);
        }

        let listed: Vec<_> = CatalogService::list_faculties(&db, uni.id)
            .await
            .unwrap()
            .into_iter()
            .map(|f| f.name)
            .collect();
        assert_eq!(listed, created);
    }

    #[tokio::test]
    async fn test_create_rejects_blank_name_and_missing_parent() {
        let db = setup_db().await;

        let err = CatalogService::create_university(&db, new_university("   "))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::EmptyName("university name"))
        ));

        let err = CatalogService::create_faculty(&db, Uuid::now_v7(), new_unit("Orphan"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            ServiceError::Validation(ValidationError::MissingParent("university"))
        ));
    }

    #[tokio::test]
    async fn test_delete_university_cascades() {
        let db = setup_db().await;
        let (uni, faculty, department, program) = crate::test_support::seed_program(&db).await;
        crate::test_support::insert_review(&db, program.id, "author").await;

        let report = CatalogService::delete(&db, CatalogLevel::University, uni.id)
            .await
            .unwrap();
        assert_eq!(
            report,
            CascadeReport {
                universities: 1,
                faculties: 1,
                departments: 1,
                programs: 1,
                reviews: 1,
            }
        );

        assert!(CatalogService::list_faculties(&db, uni.id).await.unwrap().is_empty());
        assert!(CatalogService::list_departments(&db, faculty.id).await.unwrap().is_empty());
        assert!(CatalogService::list_programs(&db, department.id).await.unwrap().is_empty());
        assert!(reviews::Entity::find().all(&db).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_failed_cascade_rolls_back_everything() {
        let db = setup_db().await;
        let (uni, faculty, department, program) = crate::test_support::seed_program(&db).await;
        crate::test_support::insert_review(&db, program.id, "author").await;

        // Reviews, programs and departments go first, then this aborts the faculty step
        db.execute_unprepared(
            "CREATE TRIGGER faculties_locked BEFORE DELETE ON faculties \
             BEGIN SELECT RAISE(ABORT, 'faculties are locked'); END",
        )
        .await
        .unwrap();

        let err = CatalogService::delete(&db, CatalogLevel::University, uni.id)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::Transport(_)));

        assert_eq!(CatalogService::get_university(&db, uni.id).await.unwrap(), uni);
        assert_eq!(
            CatalogService::list_faculties(&db, uni.id).await.unwrap(),
            vec![faculty.clone()]
        );
        assert_eq!(
            CatalogService::list_departments(&db, faculty.id).await.unwrap(),
            vec![department.clone()]
        );
        assert_eq!(
            CatalogService::list_programs(&db, department.id).await.unwrap(),
            vec![program]
        );
        assert_eq!(reviews::Entity::find().all(&db).await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_delete_department_leaves_siblings() {
        let db = setup_db().await;
        let (_, faculty, department, _) = crate::test_support::seed_program(&db).await;
        let sibling = CatalogService::create_department(&db, faculty.id, new_unit("Physics"))
            .await
            .unwrap();

        let report = CatalogService::delete(&db, CatalogLevel::Department, department.id)
            .await
            .unwrap();
        assert_eq!(report.departments, 1);
        assert_eq!(report.programs, 1);
        assert_eq!(report.faculties, 0);

        assert_eq!(
            CatalogService::list_departments(&db, faculty.id).await.unwrap(),
            vec![sibling]
        );
    }

    #[tokio::test]
    async fn test_double_delete_is_noop() {
        let db = setup_db().await;
        let (uni, ..) = crate::test_support::seed_program(&db).await;

        CatalogService::delete(&db, CatalogLevel::University, uni.id)
            .await
            .unwrap();
        let again = CatalogService::delete(&db, CatalogLevel::University, uni.id)
            .await
            .unwrap();
        assert!(again.is_empty());
    }

    #[tokio::test]
    async fn test_get_and_update_logo() {
        let db = setup_db().await;
        let uni = CatalogService::create_university(&db, new_university("Mahidol"))
            .await
            .unwrap();

        let changed = CatalogService::update_university_logo(
            &db,
            "Mahidol",
            "https://assets.mytcas.com/i/logo/003.png",
        )
        .await
        .unwrap();
        assert_eq!(changed, 1);

        let fetched = CatalogService::get_university(&db, uni.id).await.unwrap();
        assert_eq!(
            fetched.logo_url.as_deref(),
            Some("https://assets.mytcas.com/i/logo/003.png")
        );

        let missing = CatalogService::get_program(&db, Uuid::now_v7()).await;
        assert!(matches!(missing, Err(ServiceError::NotFound { entity: "program", .. })));
    }
}
