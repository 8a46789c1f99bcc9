use axum::{
    middleware,
    routing::{delete, get, patch},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tower_http::{compression::CompressionLayer, timeout::TimeoutLayer, trace::TraceLayer};

use grafana::GrafanaApi;

use crate::config::Config;
use crate::middleware::{metrics_handler, metrics_middleware, require_basic_auth, trace_id};
use crate::routes::{dashboards, datasources, folders, health, index, organizations, users};

#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub grafana: Arc<dyn GrafanaApi>,
}

pub fn create_app(config: Config, grafana: Arc<dyn GrafanaApi>) -> Router {
    let config = Arc::new(config);

    let state = AppState {
        config: config.clone(),
        grafana,
    };

    // Adapter surface; basic auth applies here when configured.
    let api_routes = Router::new()
        .route("/", get(index::index))
        .route(
            "/users",
            get(users::get_user)
                .post(users::create_user)
                .delete(users::delete_user),
        )
        .route("/users/search/:query", get(users::search_users))
        .route("/users/organizations", patch(users::sync_organizations))
        .route(
            "/users/:selector",
            get(users::get_user_by_path)
                .put(users::update_user)
                .delete(users::delete_user_by_path),
        )
        .route(
            "/organizations",
            get(organizations::get_organizations)
                .post(organizations::create_organization)
                .delete(organizations::delete_organization_by_query),
        )
        .route(
            "/organizations/:org",
            get(organizations::get_organization).delete(organizations::delete_organization),
        )
        .route(
            "/organizations/:org/users",
            get(organizations::get_organization_users),
        )
        .route(
            "/organizations/:org/users/:user_id",
            delete(organizations::remove_organization_user),
        )
        .route(
            "/organizations/:org/folders",
            get(folders::list_folders).post(folders::create_folder),
        )
        .route(
            "/organizations/:org/folders/:folder",
            get(folders::get_folder).delete(folders::delete_folder),
        )
        .route(
            "/organizations/:org/dashboards",
            get(dashboards::list_dashboards).post(dashboards::upsert_dashboard),
        )
        .route(
            "/organizations/:org/dashboards/:dashboard",
            get(dashboards::get_dashboard).delete(dashboards::delete_dashboard),
        )
        .route(
            "/organizations/:org/datasources",
            get(datasources::list_datasources).post(datasources::create_datasource),
        )
        .route(
            "/organizations/:org/datasources/:datasource",
            get(datasources::get_datasource).delete(datasources::delete_datasource),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_basic_auth,
        ));

    // Probes and metrics stay reachable without credentials.
    let public_routes = Router::new()
        .route("/health", get(health::health_check))
        .route("/health/ready", get(health::ready))
        .route("/health/live", get(health::live))
        .route("/metrics", get(metrics_handler));

    Router::new()
        .merge(public_routes)
        .merge(api_routes)
        // Global middleware (order matters: bottom layers run first)
        .layer(CompressionLayer::new())
        .layer(TimeoutLayer::new(Duration::from_secs(
            config.server.request_timeout_secs,
        )))
        .layer(middleware::from_fn(metrics_middleware))
        .layer(TraceLayer::new_for_http())
        .layer(middleware::from_fn(trace_id))
        .with_state(state)
}
