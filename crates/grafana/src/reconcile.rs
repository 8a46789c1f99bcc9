//! Membership reconciliation: drive a user's organization memberships to a
//! desired set.
//!
//! Changes apply in desired-set order, additions and role changes first,
//! removals after. The first upstream failure aborts the pass without
//! rolling back already-applied changes; a rerun converges from wherever the
//! previous pass stopped. Removing the user from an organization where they
//! are the last admin is refused by Grafana and treated as a skip, not a
//! failure.

use domain::models::{OrgRole, User, UserOrganization};
use thiserror::Error;

use crate::api::GrafanaApi;
use crate::error::UpstreamError;

#[derive(Debug, Error)]
pub enum ReconcileError {
    /// An empty desired set would strip every membership; rejected outright.
    #[error("desired organization set must not be empty")]
    EmptyDesiredSet,

    /// A desired entry named an organization upstream does not have.
    #[error("organization not found: {0}")]
    OrganizationNotFound(String),

    #[error(transparent)]
    Upstream(#[from] UpstreamError),
}

/// One applied membership mutation.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
#[serde(tag = "change", rename_all = "camelCase")]
pub enum MembershipChange {
    Added { org_id: i64, role: OrgRole },
    RoleChanged { org_id: i64, role: OrgRole },
    Removed { org_id: i64 },
}

/// Result of one reconciliation pass.
#[derive(Debug, Default, serde::Serialize)]
pub struct ReconcileOutcome {
    /// Mutations applied this pass, in order.
    pub applied: Vec<MembershipChange>,
    /// Organizations the user could not be removed from because they are
    /// the last admin there.
    pub skipped_removals: Vec<i64>,
    /// Memberships as re-fetched after the pass.
    pub memberships: Vec<UserOrganization>,
}

/// Reconciles `user`'s memberships to exactly `desired`.
///
/// Each desired entry is resolved against upstream by org id when set,
/// otherwise by name, and applied immediately; a missing role defaults to
/// Viewer. A failure partway leaves the changes already applied for earlier
/// entries in place. Memberships not in the desired set are removed after
/// all additions and role changes.
pub async fn sync_user_organizations(
    api: &dyn GrafanaApi,
    user: &User,
    desired: &[UserOrganization],
) -> Result<ReconcileOutcome, ReconcileError> {
    if desired.is_empty() {
        return Err(ReconcileError::EmptyDesiredSet);
    }
    if user.id <= 0 {
        return Err(ReconcileError::Upstream(UpstreamError::MissingKey("user id")));
    }

    let current = api.user_organizations(user.id).await?;
    let mut outcome = ReconcileOutcome::default();
    let mut desired_ids: Vec<i64> = Vec::with_capacity(desired.len());

    for entry in desired {
        let org = if entry.org_id > 0 {
            api.org_by_id(entry.org_id).await?
        } else {
            api.org_by_name(&entry.name).await?
        };
        let org = org.ok_or_else(|| {
            ReconcileError::OrganizationNotFound(if entry.org_id > 0 {
                entry.org_id.to_string()
            } else {
                entry.name.clone()
            })
        })?;
        let role = entry.role.unwrap_or_default();
        desired_ids.push(org.id);

        match current.iter().find(|m| m.org_id == org.id) {
            Some(member) if member.role == Some(role) => {}
            Some(_) => {
                api.update_org_user_role(org.id, user.id, role).await?;
                outcome.applied.push(MembershipChange::RoleChanged {
                    org_id: org.id,
                    role,
                });
            }
            None => {
                api.add_org_user(org.id, user.login_or_email(), role)
                    .await?;
                outcome.applied.push(MembershipChange::Added {
                    org_id: org.id,
                    role,
                });
            }
        }
    }

    for member in &current {
        if desired_ids.contains(&member.org_id) {
            continue;
        }
        match api.remove_org_user(member.org_id, user.id).await {
            Ok(()) => outcome.applied.push(MembershipChange::Removed {
                org_id: member.org_id,
            }),
            Err(UpstreamError::LastOrgAdmin) => {
                tracing::warn!(
                    user_id = %user.id,
                    org_id = %member.org_id,
                    "user is the last admin, membership kept"
                );
                outcome.skipped_removals.push(member.org_id);
            }
            Err(err) => return Err(err.into()),
        }
    }

    outcome.memberships = api.user_organizations(user.id).await?;
    Ok(outcome)
}
