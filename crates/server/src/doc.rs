use crate::routes::{auth, catalog, health, review, search};
use utoipa::{
    Modify, OpenApi,
    openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "jwt",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

/// API Documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        health::health,
        auth::me,
        auth::sign_in,
        catalog::list_universities,
        catalog::create_university,
        catalog::get_university,
        catalog::delete_university,
        catalog::list_faculties,
        catalog::create_faculty,
        catalog::get_faculty,
        catalog::delete_faculty,
        catalog::list_departments,
        catalog::create_department,
        catalog::get_department,
        catalog::delete_department,
        catalog::list_programs,
        catalog::create_program,
        catalog::get_program,
        catalog::delete_program,
        review::list_program_reviews,
        review::create_review,
        review::program_summary,
        review::university_summaries,
        review::feed,
        review::delete_review,
        search::search,
        search::subjects
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health"),
        (name = "Authentication", description = "Authentication related endpoints"),
        (name = "Catalog", description = "Universities, faculties, departments and programs"),
        (name = "Reviews", description = "Program reviews, rating summaries and the review feed"),
        (name = "Search", description = "Global search and the exam subject list"),
    ),
    info(
        title = "University Review API",
        version = "1.0.0",
        description = "Thai university catalog and program reviews",
        license(
            name = "MIT OR Apache-2.0",
        )
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_document_lists_routes_and_scheme() {
        let doc = ApiDoc::openapi();

        assert!(doc.paths.paths.contains_key("/programs/{id}/reviews"));
        assert!(doc.paths.paths.contains_key("/search"));
        assert!(
            doc.components
                .as_ref()
                .is_some_and(|c| c.security_schemes.contains_key("jwt"))
        );
    }
}
