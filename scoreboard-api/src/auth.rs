//! Authentication for the scoreboard API.
//!
//! Credentials are JWT bearer tokens (HS256). A verified token yields a
//! `Principal` - the identity and role set threaded explicitly through every
//! service call. There is no ambient "current user" anywhere in the crate.

use crate::error::{ApiError, ApiResult};
use jsonwebtoken::{decode, encode, Algorithm, DecodingKey, EncodingKey, Header, Validation};
use scoreboard_core::{content_hash, Principal, RoleTag};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

// ============================================================================
// CLOCK ABSTRACTION
// ============================================================================

/// Clock abstraction for token time validation.
///
/// Owning time validation (instead of letting `jsonwebtoken` do it) keeps
/// expiry checks deterministic in tests and avoids system-time panics in
/// broken CI environments.
pub trait Clock: Send + Sync {
    /// Current time as Unix epoch seconds.
    fn now_epoch_secs(&self) -> i64;
}

/// Production clock using system time.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now_epoch_secs(&self) -> i64 {
        chrono::Utc::now().timestamp()
    }
}

/// Fixed clock for deterministic tests.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub i64);

impl Clock for FixedClock {
    fn now_epoch_secs(&self) -> i64 {
        self.0
    }
}

// ============================================================================
// JWT SECRET
// ============================================================================

const INSECURE_DEFAULT_SECRET: &str = "INSECURE_DEFAULT_SECRET_CHANGE_IN_PRODUCTION";

/// Type-safe JWT secret that prevents accidental logging.
#[derive(Clone)]
pub struct JwtSecret(SecretString);

impl JwtSecret {
    pub fn new(secret: String) -> Self {
        let normalized = if secret.trim().is_empty() {
            INSECURE_DEFAULT_SECRET.to_string()
        } else {
            secret
        };
        Self(SecretString::new(normalized.into()))
    }

    /// Expose the secret value (only for cryptographic operations).
    pub fn expose(&self) -> &str {
        self.0.expose_secret()
    }

    /// Length of the secret without exposing it.
    pub fn len(&self) -> usize {
        self.0.expose_secret().len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.expose_secret().is_empty()
    }

    pub fn is_insecure_default(&self) -> bool {
        self.0.expose_secret() == INSECURE_DEFAULT_SECRET
    }
}

impl std::fmt::Debug for JwtSecret {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "JwtSecret([REDACTED, {} chars])", self.len())
    }
}

// ============================================================================
// CONFIGURATION
// ============================================================================

/// Authentication configuration.
#[derive(Clone)]
pub struct AuthConfig {
    /// JWT secret key for signing and verification
    pub jwt_secret: JwtSecret,

    /// JWT algorithm (default: HS256)
    pub jwt_algorithm: Algorithm,

    /// JWT token expiration in seconds (default: 1 hour)
    pub jwt_expiration_secs: i64,

    /// Clock skew tolerance in seconds (default: 60)
    pub jwt_clock_skew_secs: i64,

    /// Clock for token time validation (injected for testing)
    pub clock: Arc<dyn Clock>,
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &self.jwt_secret)
            .field("jwt_algorithm", &self.jwt_algorithm)
            .field("jwt_expiration_secs", &self.jwt_expiration_secs)
            .field("jwt_clock_skew_secs", &self.jwt_clock_skew_secs)
            .field("clock", &"<Clock>")
            .finish()
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: JwtSecret::new(
                std::env::var("SCOREBOARD_JWT_SECRET").unwrap_or_default(),
            ),
            jwt_algorithm: Algorithm::HS256,
            jwt_expiration_secs: 3600,
            jwt_clock_skew_secs: 60,
            clock: Arc::new(SystemClock),
        }
    }
}

impl AuthConfig {
    /// Create authentication configuration from environment variables.
    ///
    /// # Environment Variables
    /// - `SCOREBOARD_JWT_SECRET`: JWT signing secret
    /// - `SCOREBOARD_JWT_EXPIRATION_SECS`: token expiration (default: 3600)
    /// - `SCOREBOARD_JWT_CLOCK_SKEW_SECS`: skew tolerance (default: 60)
    pub fn from_env() -> Self {
        Self {
            jwt_secret: JwtSecret::new(
                std::env::var("SCOREBOARD_JWT_SECRET").unwrap_or_default(),
            ),
            jwt_algorithm: Algorithm::HS256,
            jwt_expiration_secs: std::env::var("SCOREBOARD_JWT_EXPIRATION_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(3600),
            jwt_clock_skew_secs: std::env::var("SCOREBOARD_JWT_CLOCK_SKEW_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(60),
            clock: Arc::new(SystemClock),
        }
    }

    /// Validate the authentication configuration for production use.
    ///
    /// Called at server startup. In development, insecure defaults log a
    /// warning; in production (`SCOREBOARD_ENVIRONMENT=production`) they are
    /// a startup error.
    pub fn validate_for_production(&self) -> ApiResult<()> {
        let environment = std::env::var("SCOREBOARD_ENVIRONMENT")
            .unwrap_or_else(|_| "development".to_string())
            .to_lowercase();
        let is_production = environment == "production" || environment == "prod";

        if self.jwt_secret.is_insecure_default() {
            if is_production {
                return Err(ApiError::internal_error(
                    "Cannot start in production with the insecure default JWT secret. \
                     Set SCOREBOARD_JWT_SECRET to a secure value.",
                ));
            }
            tracing::warn!(
                "Using insecure default JWT secret. Set SCOREBOARD_JWT_SECRET \
                 before deploying."
            );
        } else if self.jwt_secret.len() < 32 {
            if is_production {
                return Err(ApiError::internal_error(format!(
                    "JWT secret is too short for production use ({} chars, minimum 32).",
                    self.jwt_secret.len()
                )));
            }
            tracing::warn!(
                "JWT secret is short ({} chars); use at least 32 for production.",
                self.jwt_secret.len()
            );
        }

        Ok(())
    }
}

// ============================================================================
// JWT CLAIMS
// ============================================================================

/// JWT claims: standard time claims plus the typed role set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Subject: the user's email (the stable identity)
    pub sub: String,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Granted role tags
    #[serde(default)]
    pub roles: BTreeSet<RoleTag>,
}

impl Claims {
    pub fn new(email: String, roles: BTreeSet<RoleTag>, config: &AuthConfig) -> Self {
        let now = config.clock.now_epoch_secs();
        Self {
            sub: email,
            iat: now,
            exp: now + config.jwt_expiration_secs,
            roles,
        }
    }
}

// ============================================================================
// TOKEN OPERATIONS
// ============================================================================

/// Issue a signed token for an authenticated user.
pub fn generate_token(
    config: &AuthConfig,
    email: &str,
    roles: &BTreeSet<RoleTag>,
) -> ApiResult<String> {
    let claims = Claims::new(email.to_string(), roles.clone(), config);
    encode(
        &Header::new(config.jwt_algorithm),
        &claims,
        &EncodingKey::from_secret(config.jwt_secret.expose().as_bytes()),
    )
    .map_err(|e| ApiError::internal_error(format!("Failed to sign token: {}", e)))
}

/// Verify a bearer token and build the request's `Principal`.
///
/// Time claims are validated against the injected clock with the configured
/// skew tolerance. Every failure mode collapses to the same generic 401.
pub fn verify_token(config: &AuthConfig, token: &str) -> ApiResult<Principal> {
    let mut validation = Validation::new(config.jwt_algorithm);
    // Time validation is done below against the injected clock.
    validation.validate_exp = false;
    validation.required_spec_claims.clear();

    let data = decode::<Claims>(
        token,
        &DecodingKey::from_secret(config.jwt_secret.expose().as_bytes()),
        &validation,
    )
    .map_err(|e| {
        tracing::debug!("Token rejected: {}", e);
        ApiError::unauthorized()
    })?;

    let now = config.clock.now_epoch_secs();
    let skew = config.jwt_clock_skew_secs;

    if data.claims.exp < now - skew {
        tracing::debug!(sub = %data.claims.sub, "Token expired");
        return Err(ApiError::unauthorized());
    }
    if data.claims.iat > now + skew {
        tracing::debug!(sub = %data.claims.sub, "Token issued in the future");
        return Err(ApiError::unauthorized());
    }

    Ok(Principal::new(data.claims.sub, data.claims.roles))
}

/// Digest a password for storage or comparison.
///
/// Stored users carry `content_hash(password)`; the plaintext never leaves
/// the login handler's stack.
pub fn password_digest(password: &str) -> String {
    content_hash(password.as_bytes())
}
