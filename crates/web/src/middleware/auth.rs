use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use storage::models::{Role, RoleSet};

use crate::error::WebError;
use crate::state::AppState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// User id
    pub sub: String,
    pub exp: usize,
    pub iat: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
}

/// HS256 keys shared by the verifier and the signing helper.
#[derive(Clone)]
pub struct TokenKeys {
    encoding: EncodingKey,
    decoding: DecodingKey,
    validation: Validation,
    issuer: Option<String>,
}

impl TokenKeys {
    pub fn new(secret: &str, issuer: Option<String>) -> Self {
        let mut validation = Validation::default();
        if let Some(issuer) = &issuer {
            validation.set_issuer(&[issuer]);
            validation.set_required_spec_claims(&["exp", "iss"]);
        }

        Self {
            encoding: EncodingKey::from_secret(secret.as_bytes()),
            decoding: DecodingKey::from_secret(secret.as_bytes()),
            validation,
            issuer,
        }
    }

    /// Issues a token for `user_id`. Login lives outside this service; this
    /// is for tooling and tests.
    pub fn sign(&self, user_id: i32, ttl: Duration) -> Result<String, WebError> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            exp: (now + ttl).timestamp() as usize,
            iat: now.timestamp() as usize,
            iss: self.issuer.clone(),
        };

        encode(&Header::default(), &claims, &self.encoding)
            .map_err(|e| WebError::InternalServerError(format!("Failed to sign token: {e}")))
    }

    pub fn verify(&self, token: &str) -> Result<i32, WebError> {
        let claims = decode::<Claims>(token, &self.decoding, &self.validation)
            .map_err(|e| WebError::Unauthorized(e.to_string()))?
            .claims;

        claims
            .sub
            .parse()
            .map_err(|_| WebError::Unauthorized(format!("Invalid subject '{}'", claims.sub)))
    }
}

/// The authenticated user, with the roles loaded at request time.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user_id: i32,
    pub roles: RoleSet,
}

impl Caller {
    pub fn require_creator(&self) -> Result<(), WebError> {
        self.require(self.roles.contains(&Role::CompetitionCreator), "create:competition")
    }

    pub fn require_admin(&self, competition_id: i32) -> Result<(), WebError> {
        self.require(
            self.roles.is_admin_of(competition_id),
            &Role::Admin(competition_id).to_string(),
        )
    }

    /// Admin or referee of the competition.
    pub fn require_access(&self, competition_id: i32) -> Result<(), WebError> {
        self.require(
            self.roles.has_access_to(competition_id),
            &Role::Referee(competition_id).to_string(),
        )
    }

    fn require(&self, granted: bool, role: &str) -> Result<(), WebError> {
        if granted {
            Ok(())
        } else {
            tracing::warn!(user_id = self.user_id, role, "Missing role");
            Err(WebError::Forbidden)
        }
    }
}

/// Validates the bearer token and attaches a [`Caller`] to the request.
pub async fn require_auth(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, WebError> {
    let token = req
        .headers()
        .get("Authorization")
        .and_then(|header| header.to_str().ok())
        .and_then(|header| header.strip_prefix("Bearer "))
        .ok_or_else(|| {
            tracing::warn!("Missing or malformed Authorization header");
            WebError::Unauthorized("Missing bearer token".to_string())
        })?;

    let user_id = state.tokens.verify(token).inspect_err(|e| {
        tracing::warn!("Invalid token: {}", e);
    })?;

    let user = state.store.get_user(user_id).await.map_err(|e| {
        if e.is_not_found() {
            tracing::warn!(user_id, "Token for unknown user");
            WebError::Unauthorized("Unknown user".to_string())
        } else {
            WebError::from(e)
        }
    })?;

    req.extensions_mut().insert(Caller {
        user_id: user.user_id,
        roles: user.roles,
    });

    Ok(next.run(req).await)
}
