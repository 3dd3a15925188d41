//! Password input and Argon2id hash storage.
//!
//! Plain passwords never reach persistence. [`Password`] zeroises its buffer
//! on drop and [`PasswordHash`] keeps an Argon2id digest as a self-describing
//! PHC string (`$argon2id$v=19$m=..,t=..,p=..$<salt>$<hash>`).

use std::fmt;

use argon2::password_hash::{
    PasswordHash as PhcHash, PasswordHasher, PasswordVerifier, SaltString,
};
use argon2::{Algorithm, Argon2, Params};
use thiserror::Error;
use zeroize::Zeroizing;

/// Maximum accepted password length in characters.
pub const PASSWORD_MAX: usize = 128;

const SALT_LEN: usize = 16;

// Stored hashes choose their own cost; verification refuses anything beyond
// these bounds so a tampered row cannot pin a worker.
const MAX_MEMORY_KIB: u32 = 64 * 1024;
const MAX_ITERATIONS: u32 = 8;
const MAX_LANES: u32 = 4;

/// Validation errors for password input.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordValidationError {
    /// No password characters, or only whitespace, were supplied.
    #[error("password must not be blank")]
    Empty,
    /// The password exceeds [`PASSWORD_MAX`].
    #[error("password must be at most {max} characters")]
    TooLong { max: usize },
}

/// Errors raised when decoding a stored hash.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PasswordHashParseError {
    /// The value is not a PHC string.
    #[error("password hash is not a valid PHC string: {message}")]
    Malformed { message: String },
    /// The PHC string names an algorithm other than Argon2id.
    #[error("unsupported password hash algorithm `{algorithm}`")]
    UnsupportedAlgorithm { algorithm: String },
    /// The stored cost parameters are missing or out of bounds.
    #[error("password hash cost parameters are not accepted")]
    CostOutOfBounds,
}

/// Hashing a password failed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("password hashing failed: {message}")]
pub struct PasswordHashingError {
    message: String,
}

impl PasswordHashingError {
    fn new(err: impl fmt::Display) -> Self {
        Self {
            message: err.to_string(),
        }
    }
}

/// Plain-text password held only long enough to hash it.
pub struct Password(Zeroizing<String>);

impl Password {
    /// Validate and wrap a plain-text password.
    ///
    /// The value is kept verbatim; a blank value is rejected.
    pub fn new(raw: impl Into<String>) -> Result<Self, PasswordValidationError> {
        let raw = Zeroizing::new(raw.into());
        if raw.trim().is_empty() {
            return Err(PasswordValidationError::Empty);
        }
        if raw.chars().count() > PASSWORD_MAX {
            return Err(PasswordValidationError::TooLong { max: PASSWORD_MAX });
        }
        Ok(Self(raw))
    }

    fn expose(&self) -> &[u8] {
        self.0.as_bytes()
    }
}

impl fmt::Debug for Password {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Password(<redacted>)")
    }
}

/// Argon2id hash of a password in PHC string form.
#[derive(Clone, PartialEq, Eq)]
pub struct PasswordHash(String);

impl PasswordHash {
    /// Hash `password` with a fresh random salt and the default Argon2id cost.
    ///
    /// # Errors
    ///
    /// Returns [`PasswordHashingError`] when the hasher rejects its input.
    ///
    /// # Examples
    /// ```
    /// use blog_backend::domain::{Password, PasswordHash};
    ///
    /// let password = Password::new("secret").expect("valid password");
    /// let hash = PasswordHash::derive(&password).expect("hash password");
    /// assert!(hash.verify(&password));
    /// assert!(hash.encode().starts_with("$argon2id$"));
    /// ```
    pub fn derive(password: &Password) -> Result<Self, PasswordHashingError> {
        let salt = SaltString::encode_b64(&rand::random::<[u8; SALT_LEN]>())
            .map_err(PasswordHashingError::new)?;
        let phc = Argon2::default()
            .hash_password(password.expose(), &salt)
            .map_err(PasswordHashingError::new)?;
        Ok(Self(phc.to_string()))
    }

    /// Check `password` against the stored hash.
    pub fn verify(&self, password: &Password) -> bool {
        PhcHash::new(&self.0)
            .and_then(|phc| Argon2::default().verify_password(password.expose(), &phc))
            .is_ok()
    }

    /// The PHC string stored by the persistence adapters.
    pub fn encode(&self) -> String {
        self.0.clone()
    }

    /// Decode a value produced by [`PasswordHash::encode`].
    ///
    /// # Errors
    ///
    /// Rejects non-PHC values, algorithms other than Argon2id, and cost
    /// parameters above the accepted bounds.
    pub fn parse(encoded: &str) -> Result<Self, PasswordHashParseError> {
        let phc = PhcHash::new(encoded).map_err(|err| PasswordHashParseError::Malformed {
            message: err.to_string(),
        })?;
        if phc.algorithm != Algorithm::Argon2id.ident() {
            return Err(PasswordHashParseError::UnsupportedAlgorithm {
                algorithm: phc.algorithm.as_str().to_owned(),
            });
        }
        let params =
            Params::try_from(&phc).map_err(|_| PasswordHashParseError::CostOutOfBounds)?;
        if params.m_cost() > MAX_MEMORY_KIB
            || params.t_cost() > MAX_ITERATIONS
            || params.p_cost() > MAX_LANES
        {
            return Err(PasswordHashParseError::CostOutOfBounds);
        }
        if phc.hash.is_none() || phc.salt.is_none() {
            return Err(PasswordHashParseError::Malformed {
                message: "salt and hash are required".to_owned(),
            });
        }
        Ok(Self(encoded.to_owned()))
    }
}

impl fmt::Debug for PasswordHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PasswordHash")
            .field("algorithm", &"argon2id")
            .finish_non_exhaustive()
    }
}
