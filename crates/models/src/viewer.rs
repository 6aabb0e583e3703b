use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Role {
    #[default]
    User,
    Admin,
}

/// The signed-in user an operation is performed for
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Viewer {
    pub user_id: String,
    pub role: Role,
}

impl Viewer {
    pub fn new(user_id: impl Into<String>, role: Role) -> Self {
        Self {
            user_id: user_id.into(),
            role,
        }
    }

    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }

    /// Authors may remove their own reviews, admins may remove anything
    pub fn can_delete_review(&self, author_id: &str) -> bool {
        self.is_admin() || self.user_id == author_id
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_review_delete_permission() {
        let author = Viewer::new("user-a", Role::User);
        let other = Viewer::new("user-b", Role::User);
        let admin = Viewer::new("root", Role::Admin);

        assert!(author.can_delete_review("user-a"));
        assert!(!other.can_delete_review("user-a"));
        assert!(admin.can_delete_review("user-a"));
    }

    #[test]
    fn test_role_parse() {
        assert_eq!("admin".parse::<Role>(), Ok(Role::Admin));
        assert!("owner".parse::<Role>().is_err());
        assert_eq!(Role::default().as_ref(), "user");
    }
}
