//! Upstream entity models.
//!
//! All entities are owned by the upstream Grafana instance; the adapter only
//! holds transient in-memory copies for the duration of one request.

pub mod dashboard;
pub mod datasource;
pub mod folder;
pub mod organization;
pub mod user;

pub use dashboard::{Dashboard, DashboardMeta, DashboardModel};
pub use datasource::Datasource;
pub use folder::Folder;
pub use organization::{Organization, OrganizationUser};
pub use user::{OrgRole, User, UserOrganization};
