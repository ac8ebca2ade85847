//! Session extraction and role gating
//!
//! `Session` validates the bearer token and yields the caller's identity.
//! `Authorized<P>` additionally requires the caller's role to be in the set
//! named by the policy `P`, so a handler's signature states who may call it.

use axum::{
    async_trait,
    extract::{FromRef, FromRequestParts},
    http::request::Parts,
};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use common::error::AuthFailure;
use common::gate::{RoleSet, authorize};
use common::jwt::JwtService;
use common::role::Role;
use std::marker::PhantomData;
use uuid::Uuid;

use crate::error::ApiError;

/// Identity carried by a validated session token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Session {
    pub user_id: Uuid,
    pub role: Role,
}

impl Session {
    pub fn is_admin(&self) -> bool {
        self.role == Role::Admin
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for Session
where
    JwtService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let TypedHeader(Authorization(bearer)) =
            TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
                .await
                .map_err(|rejection| {
                    if rejection.is_missing() {
                        AuthFailure::TokenNotFound
                    } else {
                        AuthFailure::InvalidToken
                    }
                })?;

        let claims = JwtService::from_ref(state).validate(bearer.token())?;

        Ok(Session {
            user_id: claims.user_id,
            role: claims.role,
        })
    }
}

/// Roles allowed through an [`Authorized`] extractor
pub trait Policy: Send + Sync + 'static {
    const ALLOWED: RoleSet;
}

macro_rules! policies {
    ($($(#[$doc:meta])* $name:ident => $set:expr;)*) => {
        $(
            $(#[$doc])*
            #[derive(Debug, Clone, Copy)]
            pub struct $name;

            impl Policy for $name {
                const ALLOWED: RoleSet = $set;
            }
        )*
    };
}

policies! {
    /// Any authenticated role
    AnyRole => RoleSet::ANY;
    AdminOnly => RoleSet::ADMIN_ONLY;
    #[allow(dead_code)] // no route is seller-only yet
    SellerOnly => RoleSet::SELLER_ONLY;
    CustomerOnly => RoleSet::CUSTOMER_ONLY;
    AdminOrSeller => RoleSet::ADMIN_OR_SELLER;
    #[allow(dead_code)]
    AdminOrCustomer => RoleSet::ADMIN_OR_CUSTOMER;
    SellerOrCustomer => RoleSet::SELLER_OR_CUSTOMER;
}

/// A session whose role passed the gate of policy `P`
#[derive(Debug, Clone, Copy)]
pub struct Authorized<P> {
    pub session: Session,
    policy: PhantomData<fn() -> P>,
}

#[async_trait]
impl<S, P> FromRequestParts<S> for Authorized<P>
where
    P: Policy,
    JwtService: FromRef<S>,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let session = Session::from_request_parts(parts, state).await?;
        authorize(session.role, P::ALLOWED)?;

        Ok(Authorized {
            session,
            policy: PhantomData,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::{Request, header::AUTHORIZATION};
    use chrono::{Duration, Utc};
    use common::error::ServiceError;
    use common::jwt::JwtConfig;

    fn jwt() -> JwtService {
        JwtService::new(&JwtConfig {
            secret: "gate-tests".to_string(),
            ttl_seconds: 3600,
        })
    }

    fn parts(authorization: Option<String>) -> Parts {
        let mut builder = Request::builder().uri("/v1/pemesanan");
        if let Some(value) = authorization {
            builder = builder.header(AUTHORIZATION, value);
        }
        builder.body(()).unwrap().into_parts().0
    }

    fn bearer(jwt: &JwtService, role: Role) -> (Uuid, String) {
        let user_id = Uuid::new_v4();
        let token = jwt.issue(user_id, role).unwrap().token;
        (user_id, format!("Bearer {token}"))
    }

    fn failure(err: ApiError) -> Option<AuthFailure> {
        match err {
            ApiError::Service(ServiceError::Unauthorized(failure)) => Some(failure),
            _ => None,
        }
    }

    #[tokio::test]
    async fn valid_token_yields_session() {
        let jwt = jwt();
        let (user_id, header) = bearer(&jwt, Role::Seller);

        let session = Session::from_request_parts(&mut parts(Some(header)), &jwt)
            .await
            .unwrap();

        assert_eq!(session.user_id, user_id);
        assert_eq!(session.role, Role::Seller);
    }

    #[tokio::test]
    async fn missing_header_is_token_not_found() {
        let err = Session::from_request_parts(&mut parts(None), &jwt())
            .await
            .unwrap_err();
        assert_eq!(failure(err), Some(AuthFailure::TokenNotFound));
    }

    #[tokio::test]
    async fn garbage_and_foreign_tokens_are_invalid() {
        let jwt = jwt();
        let foreign = JwtService::new(&JwtConfig {
            secret: "someone-else".to_string(),
            ttl_seconds: 3600,
        });
        let (_, foreign_header) = bearer(&foreign, Role::Admin);

        for header in [
            "Bearer not.a.token".to_string(),
            "Basic YWRtaW46YWRtaW4=".to_string(),
            foreign_header,
        ] {
            let err = Session::from_request_parts(&mut parts(Some(header)), &jwt)
                .await
                .unwrap_err();
            assert_eq!(failure(err), Some(AuthFailure::InvalidToken));
        }
    }

    #[tokio::test]
    async fn expired_token_is_rejected() {
        let jwt = jwt();
        let issued = jwt
            .issue_at(Uuid::new_v4(), Role::Customer, Utc::now() - Duration::hours(2))
            .unwrap();

        let err = Session::from_request_parts(
            &mut parts(Some(format!("Bearer {}", issued.token))),
            &jwt,
        )
        .await
        .unwrap_err();

        assert_eq!(failure(err), Some(AuthFailure::TokenExpired));
    }

    #[tokio::test]
    async fn customer_is_gated_by_policy() {
        let jwt = jwt();
        let (_, header) = bearer(&jwt, Role::Customer);

        let admin =
            Authorized::<AdminOnly>::from_request_parts(&mut parts(Some(header.clone())), &jwt)
                .await
                .unwrap_err();
        assert!(matches!(admin, ApiError::Service(ServiceError::Forbidden)));

        let seller =
            Authorized::<SellerOnly>::from_request_parts(&mut parts(Some(header.clone())), &jwt)
                .await
                .unwrap_err();
        assert!(matches!(seller, ApiError::Service(ServiceError::Forbidden)));

        let allowed =
            Authorized::<CustomerOnly>::from_request_parts(&mut parts(Some(header.clone())), &jwt)
                .await
                .unwrap();
        assert_eq!(allowed.session.role, Role::Customer);

        assert!(
            Authorized::<AdminOrCustomer>::from_request_parts(&mut parts(Some(header)), &jwt)
                .await
                .is_ok()
        );
    }

    #[tokio::test]
    async fn gate_runs_after_authentication() {
        let err = Authorized::<AnyRole>::from_request_parts(&mut parts(None), &jwt())
            .await
            .unwrap_err();
        assert_eq!(failure(err), Some(AuthFailure::TokenNotFound));
    }
}
