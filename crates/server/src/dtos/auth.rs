use database::services::profile::SignIn;
use models::viewer::Viewer;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Profile details from the identity provider, sent by the client after sign-in
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct ProfileRequest {
    pub email: Option<String>,
    pub full_name: Option<String>,
    pub avatar_url: Option<String>,
}

impl From<ProfileRequest> for SignIn {
    fn from(req: ProfileRequest) -> Self {
        Self {
            email: req.email,
            full_name: req.full_name,
            avatar_url: req.avatar_url,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct MeResponse {
    pub user_id: String,
    /// `user` or `admin`
    pub role: String,
    pub is_admin: bool,
}

impl From<Viewer> for MeResponse {
    fn from(viewer: Viewer) -> Self {
        Self {
            is_admin: viewer.is_admin(),
            role: viewer.role.to_string(),
            user_id: viewer.user_id,
        }
    }
}
