//! Per-organization service-user provisioning.
//!
//! Folder, dashboard and datasource endpoints act on the caller's current
//! organization, so the adapter keeps one service user per organization and
//! authenticates org-scoped upstream calls as that user. The account is
//! created on first use; later passes hit the create conflict and rotate
//! the password instead, so credentials only ever live for one request.

use domain::models::{Organization, OrgRole, User, UserOrganization};
use shared::password::generated_password;
use shared::service_login::service_login;

use crate::api::{BasicAuth, GrafanaApi};
use crate::reconcile::sync_user_organizations;

/// Credentials of an organization's service user, valid until the next
/// provisioning pass rotates the password.
#[derive(Debug, Clone)]
pub struct ServiceUser {
    pub id: i64,
    pub login: String,
    pub password: String,
    pub org_id: i64,
}

impl ServiceUser {
    pub fn credentials(&self) -> BasicAuth {
        BasicAuth::new(self.login.clone(), self.password.clone())
    }
}

/// Creates the service user for `org` (or, when it already exists, rotates
/// its password) and makes it an Admin of exactly that organization.
///
/// Provisioning failures are logged rather than returned: the credentials
/// are handed back regardless and the org-scoped call that needed them
/// surfaces the authentication failure itself.
pub async fn ensure_service_user(api: &dyn GrafanaApi, org: &Organization) -> ServiceUser {
    let login = service_login(org.id, &org.name);
    let password = generated_password();

    let user = User {
        name: login.clone(),
        login: login.clone(),
        password: Some(password.clone()),
        org_id: org.id,
        ..Default::default()
    };
    let mut id = 0;
    match api.create_user(&user).await {
        Ok(created) => id = created,
        Err(err) if err.is_conflict() => {
            // The account already exists, fetch it and rotate its password.
            match api.user_by_login_or_email(&login).await {
                Ok(Some(existing)) => id = existing.id,
                Ok(None) => {
                    tracing::warn!(login = %login, "service user vanished after conflict")
                }
                Err(err) => {
                    tracing::warn!(login = %login, error = %err, "service user lookup failed")
                }
            }
            if id > 0 {
                rotate_password(api, id, &login, &password).await;
            }
        }
        Err(err) => {
            tracing::warn!(login = %login, error = %err, "service user creation failed")
        }
    }

    if id > 0 {
        let member = User {
            id,
            login: login.clone(),
            ..Default::default()
        };
        let desired = [UserOrganization {
            org_id: org.id,
            name: org.name.clone(),
            role: Some(OrgRole::Admin),
        }];
        if let Err(err) = sync_user_organizations(api, &member, &desired).await {
            tracing::warn!(
                login = %login,
                org_id = %org.id,
                error = %err,
                "service user membership sync failed"
            );
        }
    }

    ServiceUser {
        id,
        login,
        password,
        org_id: org.id,
    }
}

async fn rotate_password(api: &dyn GrafanaApi, id: i64, login: &str, password: &str) {
    if let Err(err) = api.update_user_password(id, password).await {
        tracing::warn!(login = %login, error = %err, "service user password rotation failed");
    }
}
