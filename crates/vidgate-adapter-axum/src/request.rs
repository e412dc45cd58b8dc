use axum::body::Body as AxumBody;
use axum::http::Request;
use vidgate_core::body::Body;
use vidgate_core::http::Request as CoreRequest;

/// Convert an Axum/Hyper request into a core request. Bodies stay
/// streaming; the router never inspects them, so there is no reason to
/// buffer on the way in.
pub fn into_core_request(request: Request<AxumBody>) -> CoreRequest {
    let (parts, body) = request.into_parts();
    let body = Body::from_stream(body.into_data_stream());
    CoreRequest::from_parts(parts, body)
}
