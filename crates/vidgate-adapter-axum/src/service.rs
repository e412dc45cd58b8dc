use std::convert::Infallible;
use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};

use axum::body::Body as AxumBody;
use axum::http::{Request, Response};
use tokio::{runtime::Handle, task};
use tower::Service;

use vidgate_core::router::EdgeRouter;

use crate::request::into_core_request;
use crate::response::into_axum_response;

/// Tower service wrapping the gateway router so it can sit behind
/// Axum/Hyper. The router's future is not `Send` (its bodies use
/// `LocalBoxStream` for wasm32 compatibility), so it runs to completion on
/// the current worker via `block_in_place`.
#[derive(Clone)]
pub struct VidgateAxumService {
    router: EdgeRouter,
}

impl VidgateAxumService {
    pub fn new(router: EdgeRouter) -> Self {
        Self { router }
    }
}

impl Service<Request<AxumBody>> for VidgateAxumService {
    type Response = Response<AxumBody>;
    type Error = Infallible;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response, Self::Error>> + Send>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<AxumBody>) -> Self::Future {
        let router = self.router.clone();
        Box::pin(async move {
            let core_request = into_core_request(request);
            let core_response =
                task::block_in_place(move || Handle::current().block_on(router.route(core_request)));
            Ok(into_axum_response(core_response))
        })
    }
}
