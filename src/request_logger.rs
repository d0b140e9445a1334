use actix_web::{
    body::MessageBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error,
};
use futures::future::LocalBoxFuture;
use log::debug;
use std::future::{ready, Ready};
use std::time::Instant;

const REDACTED_HEADERS: [&str; 2] = ["authorization", "cookie"];

/// Middleware that logs each request with its status and latency
pub struct RequestLogger;

impl<S, B> Transform<S, ServiceRequest> for RequestLogger
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestLoggerMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestLoggerMiddleware { service }))
    }
}

pub struct RequestLoggerMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for RequestLoggerMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: MessageBody,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let peer_addr = req
            .connection_info()
            .peer_addr()
            .unwrap_or("unknown")
            .to_string();
        let method = req.method().to_string();
        let path = req.path().to_string();
        let query = req.query_string().to_string();

        debug!("{method} {path}?{query} from {peer_addr}");
        for (name, value) in req.headers() {
            if REDACTED_HEADERS.iter().any(|h| name.as_str().eq_ignore_ascii_case(h)) {
                debug!("  {name}: [REDACTED]");
            } else {
                match value.to_str() {
                    Ok(v) => debug!("  {name}: {v}"),
                    Err(_) => debug!("  {name}: <non-UTF8 value, {} bytes>", value.len()),
                }
            }
        }

        let started = Instant::now();
        let fut = self.service.call(req);
        Box::pin(async move {
            let res = fut.await?;
            debug!(
                "{method} {path} -> {} in {:.1?}",
                res.status().as_u16(),
                started.elapsed()
            );
            Ok(res)
        })
    }
}
