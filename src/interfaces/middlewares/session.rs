use actix_web::{
    body::BoxBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage,
};
use futures_util::future::{ok, LocalBoxFuture, Ready};
use std::{
    rc::Rc,
    task::{Context, Poll},
};
use tracing::error;

use crate::{
    constants::SESSION_COOKIE,
    repositories::session::SessionRepository,
    repositories::sqlx_repo::SqlxSessionRepo,
};

/// Resolves the session cookie to a `Principal` and stores it in the
/// request extensions. Requests without a valid session pass through
/// unauthenticated; the per-action guards decide whether that is a 401.
pub struct SessionMiddleware {
    session_repo: SqlxSessionRepo,
}

impl SessionMiddleware {
    pub fn new(session_repo: SqlxSessionRepo) -> Self {
        SessionMiddleware { session_repo }
    }
}

impl<S> Transform<S, ServiceRequest> for SessionMiddleware
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionMiddlewareService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ok(SessionMiddlewareService {
            service: Rc::new(service),
            session_repo: self.session_repo.clone(),
        })
    }
}

pub struct SessionMiddlewareService<S> {
    service: Rc<S>,
    session_repo: SqlxSessionRepo,
}

impl<S> Service<ServiceRequest> for SessionMiddlewareService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<BoxBody>, Error = Error> + 'static,
{
    type Response = ServiceResponse<BoxBody>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    fn poll_ready(&self, ctx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.service.poll_ready(ctx)
    }

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = Rc::clone(&self.service);
        let session_repo = self.session_repo.clone();

        Box::pin(async move {
            let token = req.cookie(SESSION_COOKIE).map(|c| c.value().to_string());

            if let Some(token) = token {
                match session_repo.resolve_principal(&token).await {
                    Ok(Some(principal)) => {
                        req.extensions_mut().insert(principal);
                    }
                    Ok(None) => {}
                    Err(e) => {
                        // A store failure degrades to unauthenticated rather
                        // than failing the whole request.
                        error!("Session lookup failed: {}", e);
                    }
                }
            }

            service.call(req).await
        })
    }
}
