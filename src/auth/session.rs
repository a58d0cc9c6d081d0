//! Server-side session table.
//!
//! Maps random session tokens to the logged-in user. The cookie carries
//! `<token>.<signature>`, where the signature is an HMAC of the token under
//! the process secret, so forged cookies are turned away before the table is
//! consulted. Sessions live in memory and are lost on restart.

use std::{collections::HashMap, sync::Arc};

use base64::{engine::general_purpose, Engine};
use chrono::{DateTime, Duration, Utc};
use ring::{
    hmac,
    rand::{SecureRandom, SystemRandom},
};
use tokio::sync::RwLock;

use crate::{error::AuthError, model::CurrentUser};

/// Random token stored as the key of the session table
pub type SessionToken = String;

const TOKEN_LEN: usize = 32;
const SECRET_LEN: usize = 32;

#[derive(Debug, Clone)]
pub struct Session {
    pub user: CurrentUser,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl Session {
    pub fn is_expired(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}

#[derive(Clone)]
pub struct SessionStore {
    sessions: Arc<RwLock<HashMap<SessionToken, Session>>>,
    key: hmac::Key,
    ttl: Duration,
    rng: SystemRandom,
}

impl SessionStore {
    pub fn new(secret: &[u8], ttl: Duration) -> Self {
        Self {
            sessions: Arc::new(RwLock::new(HashMap::new())),
            key: hmac::Key::new(hmac::HMAC_SHA256, secret),
            ttl,
            rng: SystemRandom::new(),
        }
    }

    /// Start a session for `user` and return the signed cookie value.
    pub async fn create_session(&self, user: CurrentUser) -> Result<String, AuthError> {
        let mut bytes = [0u8; TOKEN_LEN];
        self.rng.fill(&mut bytes).map_err(|_| AuthError::Random)?;
        let token = general_purpose::URL_SAFE_NO_PAD.encode(bytes);

        let now = Utc::now();
        let expires_at = now
            .checked_add_signed(self.ttl)
            .ok_or(AuthError::SessionLifetime)?;
        let session = Session {
            user,
            created_at: now,
            expires_at,
        };

        let mut sessions = self.sessions.write().await;
        sessions.retain(|_, s| !s.is_expired(now));
        sessions.insert(token.clone(), session);

        Ok(self.sign(&token))
    }

    /// Look up the user behind a cookie value. Expired sessions are dropped.
    pub async fn resolve(&self, cookie_value: &str) -> Option<CurrentUser> {
        let token = self.verify(cookie_value)?;
        let now = Utc::now();

        {
            let sessions = self.sessions.read().await;
            match sessions.get(token) {
                Some(session) if !session.is_expired(now) => return Some(session.user.clone()),
                Some(_) => {}
                None => return None,
            }
        }

        self.sessions.write().await.remove(token);
        None
    }

    /// Remove the session behind a cookie value. Returns whether one existed.
    pub async fn destroy_session(&self, cookie_value: &str) -> bool {
        match self.verify(cookie_value) {
            Some(token) => self.sessions.write().await.remove(token).is_some(),
            None => false,
        }
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }

    fn sign(&self, token: &str) -> String {
        let tag = hmac::sign(&self.key, token.as_bytes());
        format!(
            "{token}.{}",
            general_purpose::URL_SAFE_NO_PAD.encode(tag.as_ref())
        )
    }

    fn verify<'a>(&self, cookie_value: &'a str) -> Option<&'a str> {
        let (token, signature) = cookie_value.split_once('.')?;
        let signature = general_purpose::URL_SAFE_NO_PAD.decode(signature).ok()?;
        hmac::verify(&self.key, token.as_bytes(), &signature).ok()?;
        Some(token)
    }
}

/// Fresh random secret for signing session cookies.
pub fn generate_secret() -> Result<Vec<u8>, AuthError> {
    let mut secret = vec![0u8; SECRET_LEN];
    SystemRandom::new()
        .fill(&mut secret)
        .map_err(|_| AuthError::Random)?;
    Ok(secret)
}
