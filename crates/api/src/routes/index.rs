//! Root index page.

use axum::response::Html;

/// `GET /` — a minimal landing page naming the service.
pub async fn index() -> Html<String> {
    Html(format!(
        "<!DOCTYPE html>\n<html>\n<head><title>Grafana Adapter</title></head>\n\
         <body>\n<h1>Grafana Adapter</h1>\n<p>version {}</p>\n</body>\n</html>\n",
        env!("CARGO_PKG_VERSION")
    ))
}
