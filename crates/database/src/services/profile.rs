use crate::{entities::profiles, error::ServiceResult};
use chrono::Utc;
use log::{debug, info, warn};
use models::viewer::{Role, Viewer};
use sea_orm::{
    ActiveValue::Set, DatabaseConnection, EntityTrait, sea_query::OnConflict,
};
use serde::Deserialize;

/// What the identity provider tells us about a user on sign-in
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SignIn {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

pub struct ProfileService;

impl ProfileService {
    /// Role of a user; users without a profile are plain users
    pub async fn get_role(db: &DatabaseConnection, user_id: &str) -> ServiceResult<Role> {
        let Some(profile) = profiles::Entity::find_by_id(user_id).one(db).await? else {
            debug!("No profile for {user_id}, treating as user");
            return Ok(Role::User);
        };

        Ok(profile.role.parse().unwrap_or_else(|_| {
            warn!("Profile {user_id} has unknown role {:?}", profile.role);
            Role::User
        }))
    }

    /// The context object passed to permission-checked operations
    pub async fn viewer(db: &DatabaseConnection, user_id: &str) -> ServiceResult<Viewer> {
        let role = Self::get_role(db, user_id).await?;
        Ok(Viewer::new(user_id, role))
    }

    /// Creates the profile on first sign-in, refreshing contact details afterwards.
    /// The role is never touched here.
    pub async fn upsert_profile(
        db: &DatabaseConnection,
        user_id: &str,
        sign_in: SignIn,
    ) -> ServiceResult<profiles::Model> {
        let model = profiles::ActiveModel {
            id: Set(user_id.to_string()),
            full_name: Set(sign_in.full_name),
            email: Set(sign_in.email),
            avatar_url: Set(sign_in.avatar_url),
            role: Set(Role::User.to_string()),
            created_at: Set(Utc::now().naive_utc()),
        };

        let profile = profiles::Entity::insert(model)
            .on_conflict(
                OnConflict::column(profiles::Column::Id)
                    .update_columns([
                        profiles::Column::FullName,
                        profiles::Column::Email,
                        profiles::Column::AvatarUrl,
                    ])
                    .to_owned(),
            )
            .exec_with_returning(db)
            .await?;

        info!("Upserted profile {user_id}");
        Ok(profile)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::test_support::setup_db;
    use sea_orm::{ActiveModelTrait, IntoActiveModel};

    #[tokio::test]
    async fn test_unknown_user_is_plain_user() {
        let db = setup_db().await;
        assert_eq!(ProfileService::get_role(&db, "nobody").await.unwrap(), Role::User);
    }

    #[tokio::test]
    async fn test_upsert_keeps_role() {
        let db = setup_db().await;

        let profile = ProfileService::upsert_profile(
            &db,
            "sub-1",
            SignIn {
                email: Some("a@example.com".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(profile.role, "user");

        let mut promoted = profile.into_active_model();
        promoted.role = Set("admin".to_string());
        promoted.update(&db).await.unwrap();

        let refreshed = ProfileService::upsert_profile(
            &db,
            "sub-1",
            SignIn {
                email: Some("b@example.com".to_string()),
                full_name: Some("Somchai".to_string()),
                avatar_url: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(refreshed.email.as_deref(), Some("b@example.com"));
        assert_eq!(refreshed.role, "admin");

        let viewer = ProfileService::viewer(&db, "sub-1").await.unwrap();
        assert!(viewer.is_admin());
    }
}
