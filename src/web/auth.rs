use argon2::Argon2;
use argon2::password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString};
use axum_extra::{
    TypedHeader,
    headers::{Authorization, authorization::Bearer},
};
use rand_core::OsRng;

pub type BearerHeader = TypedHeader<Authorization<Bearer>>;

/// Checks a presented credential. Call sites never compare secrets themselves.
pub trait CredentialVerifier: Send + Sync {
    fn verify(&self, candidate: &str) -> bool;
}

/// Fixed shared secret, e.g. the cron trigger token.
pub struct SharedSecret {
    secret: String,
}

impl SharedSecret {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }
}

impl CredentialVerifier for SharedSecret {
    fn verify(&self, candidate: &str) -> bool {
        constant_time_eq(self.secret.as_bytes(), candidate.as_bytes())
    }
}

/// Rejects everything; used when no secret is configured.
pub struct DenyAll;

impl CredentialVerifier for DenyAll {
    fn verify(&self, _candidate: &str) -> bool {
        false
    }
}

/// Argon2 PHC-string backed password check.
pub struct PasswordHashCredential {
    password_hash: String,
}

impl PasswordHashCredential {
    pub fn from_hash(password_hash: impl Into<String>) -> Result<Self, argon2::password_hash::Error> {
        let password_hash = password_hash.into();
        PasswordHash::new(&password_hash)?;
        Ok(Self { password_hash })
    }

    pub fn from_plain(password: &str) -> Result<Self, argon2::password_hash::Error> {
        Ok(Self {
            password_hash: hash_password(password)?,
        })
    }
}

impl CredentialVerifier for PasswordHashCredential {
    fn verify(&self, candidate: &str) -> bool {
        verify_password(candidate, &self.password_hash)
    }
}

pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|hash| hash.to_string())
}

pub fn verify_password(password: &str, password_hash: &str) -> bool {
    let parsed = PasswordHash::new(password_hash);
    match parsed {
        Ok(hash) => Argon2::default()
            .verify_password(password.as_bytes(), &hash)
            .is_ok(),
        Err(_) => false,
    }
}

/// True when the request carried a bearer token accepted by `verifier`.
pub fn bearer_authorized(bearer: Option<&BearerHeader>, verifier: &dyn CredentialVerifier) -> bool {
    bearer.is_some_and(|TypedHeader(auth)| verifier.verify(auth.token()))
}

fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b).fold(0_u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
