//! Authentication utilities library
//!
//! Provides the credential primitives used by the identity service:
//! - Password hashing (Argon2id) with a self-describing encoded hash
//! - HS256 JWT issuing and verification against a caller-supplied clock
//! - Authentication coordination (password check + token pair)
//!
//! Everything here is synchronous and free of I/O. Credential storage and
//! role lookup belong to the service using this crate.
//!
//! # Examples
//!
//! ## Password Hashing
//! ```
//! use auth::{HashParameters, PasswordHasher};
//!
//! let params = HashParameters { memory_cost_kib: 256, iterations: 1, parallelism: 1, ..Default::default() };
//! let hasher = PasswordHasher::new(params);
//! let hash = hasher.hash(b"my_password").unwrap().encode();
//! assert!(hasher.verify(b"my_password", &hash).unwrap());
//! ```
//!
//! ## JWT Tokens
//! ```
//! use auth::JwtHandler;
//! use chrono::Duration;
//!
//! let handler = JwtHandler::new(b"secret_key_at_least_32_bytes_long!").unwrap();
//! let token = handler.issue("user123", 1_700_000_000, Duration::minutes(15)).unwrap();
//! let claims = handler.verify(&token, 1_700_000_000).unwrap();
//! assert_eq!(claims.subject, "user123");
//! ```
//!
//! ## Complete Authentication Flow
//! ```
//! use auth::{Authenticator, HashParameters, TokenLifetimes};
//!
//! let params = HashParameters { memory_cost_kib: 256, iterations: 1, parallelism: 1, ..Default::default() };
//! let auth = Authenticator::new(
//!     b"secret_key_at_least_32_bytes_long!",
//!     params,
//!     TokenLifetimes::default(),
//! )
//! .unwrap();
//!
//! // Register: hash password
//! let hash = auth.hash_password("password123").unwrap();
//!
//! // Login: verify and generate tokens
//! let now = 1_700_000_000;
//! let pair = auth.authenticate("password123", &hash, "user123", now).unwrap();
//!
//! // Validate token
//! let claims = auth.validate_token(&pair.access_token, now).unwrap();
//! assert_eq!(claims.subject, "user123");
//! ```

pub mod authenticator;
pub mod jwt;
pub mod password;

// Re-export commonly used items
pub use authenticator::AuthenticationError;
pub use authenticator::Authenticator;
pub use authenticator::TokenLifetimes;
pub use authenticator::TokenPair;
pub use jwt::JwtError;
pub use jwt::JwtHandler;
pub use jwt::TokenClaims;
pub use password::EncodedHash;
pub use password::HashParameters;
pub use password::PasswordError;
pub use password::PasswordHasher;
