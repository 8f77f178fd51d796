use axum::http::HeaderName;
use tower_http::request_id::{MakeRequestId, RequestId, SetRequestIdLayer};
use uuid::Uuid;

/// Header carrying the per-request id, echoed back to clients.
pub const REQUEST_ID_HEADER: &str = "x-ihealth-request-id";

#[derive(Clone, Default)]
pub struct RequestUuid;

impl MakeRequestId for RequestUuid {
    fn make_request_id<B>(&mut self, _request: &axum::http::Request<B>) -> Option<RequestId> {
        // v7 ids sort by time, so request ids line up with log order
        let value = Uuid::now_v7().to_string().parse().ok()?;
        Some(RequestId::new(value))
    }
}

/// Build the request-id layer. Apply with `.layer(request_id_layer())` in router.
pub fn request_id_layer() -> SetRequestIdLayer<RequestUuid> {
    SetRequestIdLayer::new(HeaderName::from_static(REQUEST_ID_HEADER), RequestUuid)
}
