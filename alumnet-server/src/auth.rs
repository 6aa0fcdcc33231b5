//! Password hashing, session tokens and the bearer-token extractor.

use alumnet_common::UserId;
use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    async_trait,
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use sled::{Db, Tree};
use tracing::debug;

use crate::{
    error::{AppError, Result},
    state::State,
    store::{decode, encode},
};

const TOKEN_BYTES: usize = 32;

#[derive(Serialize, Deserialize)]
struct Session {
    user: UserId,
    expires_at: DateTime<Utc>,
}

#[derive(Clone)]
pub struct Sessions {
    tree: Tree,
    ttl: Duration,
}

impl Sessions {
    pub fn new(db: &Db, ttl_days: i64) -> Result<Self> {
        Ok(Self {
            tree: db.open_tree("sessions")?,
            ttl: Duration::days(ttl_days),
        })
    }

    pub fn issue(&self, user: &UserId) -> Result<String> {
        let token = hex::encode(rand::random::<[u8; TOKEN_BYTES]>());
        let session = Session {
            user: user.clone(),
            expires_at: Utc::now() + self.ttl,
        };
        self.tree.insert(token.as_str(), encode(&session)?)?;
        Ok(token)
    }

    pub fn resolve(&self, token: &str) -> Result<UserId> {
        let Some(bytes) = self.tree.get(token)? else {
            return Err(AppError::Unauthorized("Not authorized, token failed"));
        };
        let session: Session = decode(&bytes)?;
        if session.expires_at <= Utc::now() {
            self.tree.remove(token)?;
            return Err(AppError::Unauthorized("Not authorized, token expired"));
        }
        Ok(session.user)
    }

    pub fn revoke(&self, token: &str) -> Result<()> {
        self.tree.remove(token)?;
        Ok(())
    }
}

pub fn hash_password(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
        .map_err(|e| AppError::Internal(anyhow::anyhow!("Error hashing password: {e}")))
}

pub fn verify_password(password: &str, hash: &str) -> bool {
    PasswordHash::new(hash)
        .map(|parsed| {
            Argon2::default()
                .verify_password(password.as_bytes(), &parsed)
                .is_ok()
        })
        .unwrap_or(false)
}

/// The caller, resolved from `Authorization: Bearer <token>`.
pub struct AuthUser {
    pub id: UserId,
    pub token: String,
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self> {
        let state = parts
            .extensions
            .get::<State>()
            .cloned()
            .ok_or_else(|| AppError::Internal(anyhow::anyhow!("State extension missing")))?;

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .ok_or(AppError::Unauthorized("Not authorized, no token"))?;

        let id = state.sessions.resolve(token)?;
        debug!("authenticated {id}");
        Ok(Self {
            id,
            token: token.to_string(),
        })
    }
}
