use crate::{
    auth::AdminUser,
    dtos::catalog::{
        CascadeReportResponse, CreateProgramRequest, CreateUniversityRequest, CreateUnitRequest,
        DepartmentResponse, FacultyResponse, ProgramResponse, UniversityResponse,
    },
    error::AppResult,
    state::AppState,
};
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use database::services::catalog::CatalogService;
use log::info;
use models::catalog::CatalogLevel;
use uuid::Uuid;

/// List all universities in creation order
#[utoipa::path(
    get,
    path = "/universities",
    responses(
        (status = 200, description = "Universities retrieved successfully", body = Vec<UniversityResponse>),
        (status = 500, description = "Internal server error")
    ),
    tag = "Catalog"
)]
pub async fn list_universities(
    State(state): State<AppState>,
) -> AppResult<Json<Vec<UniversityResponse>>> {
    let universities = CatalogService::list_universities(&state.db).await?;
    Ok(Json(universities.into_iter().map(Into::into).collect()))
}

/// Create a university
#[utoipa::path(
    post,
    path = "/universities",
    request_body = CreateUniversityRequest,
    responses(
        (status = 201, description = "University created", body = UniversityResponse),
        (status = 400, description = "Name is empty"),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Admin role required")
    ),
    security(("jwt" = [])),
    tag = "Catalog"
)]
pub async fn create_university(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Json(body): Json<CreateUniversityRequest>,
) -> AppResult<(StatusCode, Json<UniversityResponse>)> {
    let university = CatalogService::create_university(&state.db, body.into()).await?;
    Ok((StatusCode::CREATED, Json(university.into())))
}

/// Get a university by ID
#[utoipa::path(
    get,
    path = "/universities/{id}",
    params(("id" = Uuid, Path, description = "University ID")),
    responses(
        (status = 200, description = "University found", body = UniversityResponse),
        (status = 404, description = "University not found")
    ),
    tag = "Catalog"
)]
pub async fn get_university(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<UniversityResponse>> {
    Ok(Json(CatalogService::get_university(&state.db, id).await?.into()))
}

/// Delete a university with all its faculties, departments, programs and reviews
#[utoipa::path(
    delete,
    path = "/universities/{id}",
    params(("id" = Uuid, Path, description = "University ID")),
    responses(
        (status = 200, description = "Deleted, with counts per level", body = CascadeReportResponse),
        (status = 401, description = "Unauthorized - invalid or missing JWT"),
        (status = 403, description = "Admin role required")
    ),
    security(("jwt" = [])),
    tag = "Catalog"
)]
pub async fn delete_university(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CascadeReportResponse>> {
    delete_record(&state, &admin.user_id, CatalogLevel::University, id).await
}

/// List the faculties of a university
#[utoipa::path(
    get,
    path = "/universities/{id}/faculties",
    params(("id" = Uuid, Path, description = "University ID")),
    responses(
        (status = 200, description = "Faculties retrieved successfully", body = Vec<FacultyResponse>)
    ),
    tag = "Catalog"
)]
pub async fn list_faculties(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<FacultyResponse>>> {
    let faculties = CatalogService::list_faculties(&state.db, id).await?;
    Ok(Json(faculties.into_iter().map(Into::into).collect()))
}

/// Create a faculty under a university
#[utoipa::path(
    post,
    path = "/universities/{id}/faculties",
    params(("id" = Uuid, Path, description = "University ID")),
    request_body = CreateUnitRequest,
    responses(
        (status = 201, description = "Faculty created", body = FacultyResponse),
        (status = 400, description = "Name is empty or the university does not exist"),
        (status = 403, description = "Admin role required")
    ),
    security(("jwt" = [])),
    tag = "Catalog"
)]
pub async fn create_faculty(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateUnitRequest>,
) -> AppResult<(StatusCode, Json<FacultyResponse>)> {
    let faculty = CatalogService::create_faculty(&state.db, id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(faculty.into())))
}

/// Get a faculty by ID
#[utoipa::path(
    get,
    path = "/faculties/{id}",
    params(("id" = Uuid, Path, description = "Faculty ID")),
    responses(
        (status = 200, description = "Faculty found", body = FacultyResponse),
        (status = 404, description = "Faculty not found")
    ),
    tag = "Catalog"
)]
pub async fn get_faculty(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<FacultyResponse>> {
    Ok(Json(CatalogService::get_faculty(&state.db, id).await?.into()))
}

/// Delete a faculty and everything beneath it
#[utoipa::path(
    delete,
    path = "/faculties/{id}",
    params(("id" = Uuid, Path, description = "Faculty ID")),
    responses(
        (status = 200, description = "Deleted, with counts per level", body = CascadeReportResponse),
        (status = 403, description = "Admin role required")
    ),
    security(("jwt" = [])),
    tag = "Catalog"
)]
pub async fn delete_faculty(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CascadeReportResponse>> {
    delete_record(&state, &admin.user_id, CatalogLevel::Faculty, id).await
}

/// List the departments of a faculty
#[utoipa::path(
    get,
    path = "/faculties/{id}/departments",
    params(("id" = Uuid, Path, description = "Faculty ID")),
    responses(
        (status = 200, description = "Departments retrieved successfully", body = Vec<DepartmentResponse>)
    ),
    tag = "Catalog"
)]
pub async fn list_departments(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<DepartmentResponse>>> {
    let departments = CatalogService::list_departments(&state.db, id).await?;
    Ok(Json(departments.into_iter().map(Into::into).collect()))
}

/// Create a department under a faculty
#[utoipa::path(
    post,
    path = "/faculties/{id}/departments",
    params(("id" = Uuid, Path, description = "Faculty ID")),
    request_body = CreateUnitRequest,
    responses(
        (status = 201, description = "Department created", body = DepartmentResponse),
        (status = 400, description = "Name is empty or the faculty does not exist"),
        (status = 403, description = "Admin role required")
    ),
    security(("jwt" = [])),
    tag = "Catalog"
)]
pub async fn create_department(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateUnitRequest>,
) -> AppResult<(StatusCode, Json<DepartmentResponse>)> {
    let department = CatalogService::create_department(&state.db, id, body.into()).await?;
    Ok((StatusCode::CREATED, Json(department.into())))
}

/// Get a department by ID
#[utoipa::path(
    get,
    path = "/departments/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Department found", body = DepartmentResponse),
        (status = 404, description = "Department not found")
    ),
    tag = "Catalog"
)]
pub async fn get_department(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<DepartmentResponse>> {
    Ok(Json(CatalogService::get_department(&state.db, id).await?.into()))
}

/// Delete a department, its programs and their reviews
#[utoipa::path(
    delete,
    path = "/departments/{id}",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Deleted, with counts per level", body = CascadeReportResponse),
        (status = 403, description = "Admin role required")
    ),
    security(("jwt" = [])),
    tag = "Catalog"
)]
pub async fn delete_department(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CascadeReportResponse>> {
    delete_record(&state, &admin.user_id, CatalogLevel::Department, id).await
}

/// List the programs of a department
#[utoipa::path(
    get,
    path = "/departments/{id}/programs",
    params(("id" = Uuid, Path, description = "Department ID")),
    responses(
        (status = 200, description = "Programs retrieved successfully", body = Vec<ProgramResponse>)
    ),
    tag = "Catalog"
)]
pub async fn list_programs(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<Vec<ProgramResponse>>> {
    let programs = CatalogService::list_programs(&state.db, id).await?;
    Ok(Json(programs.into_iter().map(Into::into).collect()))
}

/// Create a program under a department
#[utoipa::path(
    post,
    path = "/departments/{id}/programs",
    params(("id" = Uuid, Path, description = "Department ID")),
    request_body = CreateProgramRequest,
    responses(
        (status = 201, description = "Program created", body = ProgramResponse),
        (status = 400, description = "Invalid fields or the department does not exist"),
        (status = 403, description = "Admin role required")
    ),
    security(("jwt" = [])),
    tag = "Catalog"
)]
pub async fn create_program(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    Path(id): Path<Uuid>,
    Json(body): Json<CreateProgramRequest>,
) -> AppResult<(StatusCode, Json<ProgramResponse>)> {
    let program = CatalogService::create_program(&state.db, id, body.into_new_program()?).await?;
    Ok((StatusCode::CREATED, Json(program.into())))
}

/// Get a program by ID
#[utoipa::path(
    get,
    path = "/programs/{id}",
    params(("id" = Uuid, Path, description = "Program ID")),
    responses(
        (status = 200, description = "Program found", body = ProgramResponse),
        (status = 404, description = "Program not found")
    ),
    tag = "Catalog"
)]
pub async fn get_program(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ProgramResponse>> {
    Ok(Json(CatalogService::get_program(&state.db, id).await?.into()))
}

/// Delete a program and its reviews
#[utoipa::path(
    delete,
    path = "/programs/{id}",
    params(("id" = Uuid, Path, description = "Program ID")),
    responses(
        (status = 200, description = "Deleted, with counts per level", body = CascadeReportResponse),
        (status = 403, description = "Admin role required")
    ),
    security(("jwt" = [])),
    tag = "Catalog"
)]
pub async fn delete_program(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<CascadeReportResponse>> {
    delete_record(&state, &admin.user_id, CatalogLevel::Program, id).await
}

async fn delete_record(
    state: &AppState,
    admin_id: &str,
    level: CatalogLevel,
    id: Uuid,
) -> AppResult<Json<CascadeReportResponse>> {
    info!("Admin {admin_id} deleting {level} {id}");
    let report = CatalogService::delete(&state.db, level, id).await?;
    Ok(Json(report.into()))
}
