//! Role checks layered under the token middleware.

use axum::{
    extract::{Request, State},
    middleware::{self, Next},
    response::Response,
    Router,
};
use models::user::Role;
use service::auth::domain::Claims;
use uuid::Uuid;

use crate::errors::JsonApiError;

#[derive(Clone, Copy, Debug)]
pub struct AllowedRoles(pub &'static [Role]);

pub const ADMIN: &[Role] = &[Role::Admin];
pub const ADMIN_FACULTY: &[Role] = &[Role::Admin, Role::Faculty];
pub const ADMIN_STAFF: &[Role] = &[Role::Admin, Role::Staff];

/// 401 when the request carries no claims, 403 when the role is not allowed.
pub async fn require_roles(State(allowed): State<AllowedRoles>, req: Request, next: Next) -> Result<Response, JsonApiError> {
    let claims = req
        .extensions()
        .get::<Claims>()
        .ok_or_else(|| JsonApiError::unauthorized("authentication required"))?;
    if !allowed.0.contains(&claims.role) {
        tracing::warn!(user = %claims.sub, role = %claims.role, path = %req.uri().path(), "role_denied");
        return Err(JsonApiError::forbidden(format!("role {} may not access this endpoint", claims.role)));
    }
    Ok(next.run(req).await)
}

/// Put every route of `router` behind `roles`.
pub fn restrict<S>(router: Router<S>, roles: &'static [Role]) -> Router<S>
where
    S: Clone + Send + Sync + 'static,
{
    router.route_layer(middleware::from_fn_with_state(AllowedRoles(roles), require_roles))
}

/// Allow the owner of a record or one of `roles`.
pub fn ensure_self_or(claims: &Claims, owner: Uuid, roles: &[Role]) -> Result<(), JsonApiError> {
    if claims.uid == owner || roles.contains(&claims.role) {
        return Ok(());
    }
    Err(JsonApiError::forbidden("not allowed to access another user's records"))
}

pub fn has_role(claims: &Claims, roles: &[Role]) -> bool { roles.contains(&claims.role) }

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::{Request as HttpRequest, StatusCode}, routing::get};
    use tower::ServiceExt;

    fn claims(role: Role) -> Claims {
        Claims { sub: "someone".into(), uid: Uuid::new_v4(), role, iat: 0, exp: i64::MAX }
    }

    fn app() -> Router {
        restrict(Router::new().route("/admin", get(|| async { "ok" })), ADMIN)
    }

    #[tokio::test]
    async fn missing_claims_is_unauthorized() -> anyhow::Result<()> {
        let resp = app().oneshot(HttpRequest::builder().uri("/admin").body(Body::empty())?).await?;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
        Ok(())
    }

    #[tokio::test]
    async fn wrong_role_is_forbidden_and_right_role_passes() -> anyhow::Result<()> {
        let mut req = HttpRequest::builder().uri("/admin").body(Body::empty())?;
        req.extensions_mut().insert(claims(Role::Student));
        assert_eq!(app().oneshot(req).await?.status(), StatusCode::FORBIDDEN);

        let mut req = HttpRequest::builder().uri("/admin").body(Body::empty())?;
        req.extensions_mut().insert(claims(Role::Admin));
        assert_eq!(app().oneshot(req).await?.status(), StatusCode::OK);
        Ok(())
    }

    #[test]
    fn owner_or_role() {
        let c = claims(Role::Student);
        assert!(ensure_self_or(&c, c.uid, ADMIN).is_ok());
        assert!(ensure_self_or(&c, Uuid::new_v4(), ADMIN).is_err());
        assert!(ensure_self_or(&claims(Role::Admin), Uuid::new_v4(), ADMIN).is_ok());
    }
}
