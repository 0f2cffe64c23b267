//! User CRUD over the store. Every result is a [`PublicUser`].

use serde::Deserialize;
use warden_core::{normalize_email, normalize_name};

use crate::auth::{AuthError, PublicUser, UserId};
use crate::store::UserStore;

/// Partial update. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UserUpdate {
    /// New display name.
    pub name: Option<String>,
    /// New email.
    pub email: Option<String>,
}

/// User management service.
#[derive(Debug, Clone)]
pub struct UserService {
    store: UserStore,
}

impl UserService {
    /// Create a user service.
    #[must_use]
    pub const fn new(store: UserStore) -> Self {
        Self { store }
    }

    /// All users, in ID order.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub async fn list_users(&self) -> Result<Vec<PublicUser>, AuthError> {
        let users = self.store.list().await?;
        Ok(users.iter().map(crate::auth::User::to_public).collect())
    }

    /// A single user, or `None` if absent.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub async fn get_user(&self, id: UserId) -> Result<Option<PublicUser>, AuthError> {
        Ok(self.store.get(id).await?.map(|u| u.to_public()))
    }

    /// Apply a partial update.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist, `InvalidInput` for a
    /// malformed field, and `UserExists` if the new email is taken.
    pub async fn update_user(
        &self,
        id: UserId,
        update: UserUpdate,
    ) -> Result<PublicUser, AuthError> {
        let name = update.name.as_deref().map(normalize_name).transpose()?;
        let email = update.email.as_deref().map(normalize_email).transpose()?;

        let user = self
            .store
            .update(id, name.as_deref(), email.as_deref())
            .await?
            .ok_or_else(|| AuthError::NotFound("User not found".to_string()))?;

        tracing::info!(user_id = id, "Updated user");
        Ok(user.to_public())
    }

    /// Delete a user.
    ///
    /// # Errors
    ///
    /// Returns `NotFound` if the user does not exist.
    pub async fn delete_user(&self, id: UserId) -> Result<(), AuthError> {
        if !self.store.delete(id).await? {
            return Err(AuthError::NotFound("User not found".to_string()));
        }

        tracing::info!(user_id = id, "Deleted user");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::auth::{NewUser, UserRole};

    async fn service_with(emails: &[&str]) -> (UserService, Vec<UserId>) {
        let store = UserStore::in_memory().await.unwrap();
        let mut ids = Vec::new();
        for email in emails {
            let user = store
                .create(&NewUser {
                    name: "Ana".to_string(),
                    email: (*email).to_string(),
                    password_hash: "$argon2id$placeholder".to_string(),
                    role: UserRole::User,
                })
                .await
                .unwrap();
            ids.push(user.id);
        }
        (UserService::new(store), ids)
    }

    #[tokio::test]
    async fn test_list_and_get() {
        let (service, ids) = service_with(&["a@x.com", "b@x.com"]).await;

        let users = service.list_users().await.unwrap();
        assert_eq!(users.len(), 2);
        assert_eq!(users[0].email, "a@x.com");

        let user = service.get_user(ids[1]).await.unwrap().unwrap();
        assert_eq!(user.email, "b@x.com");

        assert!(service.get_user(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_update_user() {
        let (service, ids) = service_with(&["a@x.com"]).await;

        let updated = service
            .update_user(
                ids[0],
                UserUpdate {
                    name: Some("Bea".to_string()),
                    email: Some("BEA@x.com".to_string()),
                },
            )
            .await
            .unwrap();
        assert_eq!(updated.name, "Bea");
        assert_eq!(updated.email, "bea@x.com");

        let unchanged = service
            .update_user(ids[0], UserUpdate::default())
            .await
            .unwrap();
        assert_eq!(unchanged, updated);
    }

    #[tokio::test]
    async fn test_update_errors() {
        let (service, ids) = service_with(&["a@x.com", "b@x.com"]).await;

        let missing = service.update_user(999, UserUpdate::default()).await;
        assert!(matches!(missing, Err(AuthError::NotFound(_))));

        let invalid = service
            .update_user(
                ids[0],
                UserUpdate {
                    email: Some("not-an-email".to_string()),
                    ..UserUpdate::default()
                },
            )
            .await;
        assert!(matches!(invalid, Err(AuthError::InvalidInput(_))));

        let taken = service
            .update_user(
                ids[0],
                UserUpdate {
                    email: Some("b@x.com".to_string()),
                    ..UserUpdate::default()
                },
            )
            .await;
        assert!(matches!(taken, Err(AuthError::UserExists)));
    }

    #[tokio::test]
    async fn test_delete_user() {
        let (service, ids) = service_with(&["a@x.com"]).await;

        service.delete_user(ids[0]).await.unwrap();
        assert!(service.get_user(ids[0]).await.unwrap().is_none());

        assert!(matches!(
            service.delete_user(ids[0]).await,
            Err(AuthError::NotFound(_))
        ));
    }
}
