use argon2::password_hash::rand_core::OsRng;
use argon2::password_hash::rand_core::RngCore;
use argon2::Algorithm;
use argon2::Argon2;
use argon2::Params;
use argon2::Version;

use super::compare::constant_time_eq;
use super::encoded::EncodedHash;
use super::errors::PasswordError;
use super::params::HashParameters;

/// Password hashing implementation.
///
/// Derives Argon2id keys under a process-wide default cost and verifies
/// secrets against hashes carrying their own cost parameters.
#[derive(Debug, Clone)]
pub struct PasswordHasher {
    default_parameters: HashParameters,
}

impl PasswordHasher {
    /// Create a hasher that hashes new secrets with `default_parameters`.
    pub fn new(default_parameters: HashParameters) -> Self {
        Self { default_parameters }
    }

    /// Check that `parameters` can be used to hash new secrets.
    ///
    /// # Errors
    /// * `InvalidParameters` - Above the cost ceiling, salt too short, or
    ///   rejected by Argon2
    pub fn validate(parameters: &HashParameters) -> Result<(), PasswordError> {
        if !parameters.within_limits() {
            return Err(PasswordError::InvalidParameters(format!(
                "m={}, t={} exceed the cost ceiling",
                parameters.memory_cost_kib, parameters.iterations
            )));
        }

        if (parameters.salt_length as usize) < argon2::MIN_SALT_LEN {
            return Err(PasswordError::InvalidParameters(format!(
                "salt must be at least {} bytes",
                argon2::MIN_SALT_LEN
            )));
        }

        argon2_for(parameters)
            .map(|_| ())
            .map_err(|e| PasswordError::InvalidParameters(e.to_string()))
    }

    pub fn default_parameters(&self) -> HashParameters {
        self.default_parameters
    }

    /// Hash a secret with the default parameters.
    ///
    /// # Errors
    /// * `RandomSourceUnavailable` - The OS random source could not be read
    /// * `InvalidParameters` - Argon2 rejected the configured parameters
    pub fn hash(&self, secret: &[u8]) -> Result<EncodedHash, PasswordError> {
        self.hash_with(secret, self.default_parameters)
    }

    /// Hash a secret with explicit parameters.
    ///
    /// Draws `salt_length` random bytes and derives `key_length` bytes.
    ///
    /// # Errors
    /// * `RandomSourceUnavailable` - The OS random source could not be read
    /// * `InvalidParameters` - Argon2 rejected `parameters`
    pub fn hash_with(
        &self,
        secret: &[u8],
        parameters: HashParameters,
    ) -> Result<EncodedHash, PasswordError> {
        if !parameters.within_limits() {
            return Err(PasswordError::InvalidParameters(format!(
                "m={}, t={} exceed the cost ceiling",
                parameters.memory_cost_kib, parameters.iterations
            )));
        }

        let argon2 = argon2_for(&parameters)
            .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        let mut salt = vec![0u8; parameters.salt_length as usize];
        OsRng
            .try_fill_bytes(&mut salt)
            .map_err(|e| PasswordError::RandomSourceUnavailable(e.to_string()))?;

        let mut key = vec![0u8; parameters.key_length as usize];
        argon2
            .hash_password_into(secret, &salt, &mut key)
            .map_err(|e| PasswordError::InvalidParameters(e.to_string()))?;

        EncodedHash::new(parameters, salt, key)
    }

    /// Verify a secret against a stored hash string.
    ///
    /// The key is re-derived with the parameters recovered from `encoded`, not
    /// with the defaults. Parameters Argon2 refuses (too-short salt or key,
    /// zero cost) count as a mismatch. Parameters above the cost ceiling are
    /// treated as corruption and never derived.
    ///
    /// # Errors
    /// * `MalformedHash`, `UnsupportedVersion`, `InvalidEncoding` - `encoded` is corrupt
    pub fn verify(&self, secret: &[u8], encoded: &str) -> Result<bool, PasswordError> {
        let stored = EncodedHash::decode(encoded)?;
        let parameters = stored.parameters();

        if !parameters.within_limits() {
            return Err(PasswordError::MalformedHash(format!(
                "cost m={}, t={} exceeds the ceiling",
                parameters.memory_cost_kib, parameters.iterations
            )));
        }

        let Ok(argon2) = argon2_for(&parameters) else {
            return Ok(false);
        };

        let mut derived = vec![0u8; parameters.key_length as usize];
        if argon2
            .hash_password_into(secret, stored.salt(), &mut derived)
            .is_err()
        {
            return Ok(false);
        }

        Ok(constant_time_eq(&derived, stored.key()))
    }
}

impl Default for PasswordHasher {
    fn default() -> Self {
        Self::new(HashParameters::default())
    }
}

fn argon2_for(parameters: &HashParameters) -> Result<Argon2<'static>, argon2::Error> {
    let params = Params::new(
        parameters.memory_cost_kib,
        parameters.iterations,
        u32::from(parameters.parallelism),
        Some(parameters.key_length as usize),
    )?;

    Ok(Argon2::new(Algorithm::Argon2id, Version::V0x13, params))
}
