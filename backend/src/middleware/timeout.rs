//! Request timeout middleware.
//!
//! Bounds the time spent handling a single request. When the bound elapses
//! the in-flight handler future is dropped and the request fails with a
//! `service_unavailable` domain error, rendered through the shared error
//! schema by its `ResponseError` implementation.

use std::task::{Context, Poll};
use std::time::Duration;

use actix_web::Error;
use actix_web::dev::{Service, ServiceRequest, ServiceResponse, Transform};
use futures_util::future::{LocalBoxFuture, Ready, ready};
use tracing::warn;

use crate::domain::Error as DomainError;

/// Middleware factory failing requests that outlive `duration`.
///
/// # Examples
/// ```
/// use std::time::Duration;
///
/// use actix_web::App;
/// use blog_backend::middleware::RequestTimeout;
///
/// let app = App::new().wrap(RequestTimeout::new(Duration::from_secs(30)));
/// ```
#[derive(Debug, Clone, Copy)]
pub struct RequestTimeout {
    duration: Duration,
}

impl RequestTimeout {
    /// Create a timeout of `duration` per request.
    pub fn new(duration: Duration) -> Self {
        Self { duration }
    }

    /// The configured bound.
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

impl<S, B> Transform<S, ServiceRequest> for RequestTimeout
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type InitError = ();
    type Transform = RequestTimeoutMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(RequestTimeoutMiddleware {
            service,
            duration: self.duration,
        }))
    }
}

/// Service wrapper produced by [`RequestTimeout`].
pub struct RequestTimeoutMiddleware<S> {
    service: S,
    duration: Duration,
}

impl<S, B> Service<ServiceRequest> for RequestTimeoutMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(cx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let duration = self.duration;
        // The request itself moves into the inner service; routing needs sole
        // ownership of it, so only the path is kept for logging.
        let path = req.path().to_owned();
        let fut = self.service.call(req);
        Box::pin(async move {
            if let Ok(result) = tokio::time::timeout(duration, fut).await {
                return result;
            }
            warn!(path = %path, timeout_ms = duration.as_millis(), "request timed out");
            Err(DomainError::service_unavailable(format!(
                "request exceeded {}ms",
                duration.as_millis()
            ))
            .into())
        })
    }
}
