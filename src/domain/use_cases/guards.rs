use actix_web::{HttpMessage, HttpRequest};

use crate::domain::entities::user::Principal;
use crate::errors::AppError;

/// Pulls the authenticated principal out of the request extensions, where
/// the session middleware placed it. 401 when the request carried no valid
/// session.
pub fn require_auth(req: &HttpRequest) -> Result<Principal, AppError> {
    req.extensions()
        .get::<Principal>()
        .cloned()
        .ok_or(AppError::Unauthorized)
}

/// 401 when unauthenticated, 403 when authenticated without the admin role.
pub fn require_admin(req: &HttpRequest) -> Result<Principal, AppError> {
    let principal = require_auth(req)?;
    if principal.is_admin() {
        Ok(principal)
    } else {
        Err(AppError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn with_principal(role: &str) -> HttpRequest {
        let req = TestRequest::default().to_http_request();
        req.extensions_mut().insert(Principal {
            id: 7,
            username: "jo".into(),
            role: role.into(),
        });
        req
    }

    #[test]
    fn missing_principal_is_unauthorized() {
        let req = TestRequest::default().to_http_request();
        assert!(matches!(require_auth(&req), Err(AppError::Unauthorized)));
        assert!(matches!(require_admin(&req), Err(AppError::Unauthorized)));
    }

    #[test]
    fn editor_passes_auth_but_not_admin() {
        let req = with_principal("editor");
        assert!(require_auth(&req).is_ok());
        assert!(matches!(require_admin(&req), Err(AppError::Forbidden)));
    }

    #[test]
    fn admin_passes_both_guards() {
        let req = with_principal("admin");
        assert_eq!(require_admin(&req).unwrap().id, 7);
    }
}
