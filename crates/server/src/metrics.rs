use std::time::Instant;

use axum::{
    extract::{MatchedPath, Request, State},
    middleware::Next,
    response::Response,
};
use common::observability::observe_request;

use crate::context::ServiceKind;

/// Count and time every routed request. The `route` label is the route
/// template (`/faculty/:faculty_id`), not the concrete path.
pub async fn track_metrics(State(kind): State<ServiceKind>, req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().to_string();
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map(|p| p.as_str().to_owned())
        .unwrap_or_else(|| "unmatched".to_owned());

    let response = next.run(req).await;

    observe_request(
        kind.name(),
        &method,
        &route,
        response.status().as_u16(),
        start.elapsed().as_secs_f64(),
    );
    response
}
