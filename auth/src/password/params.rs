use serde::Deserialize;
use serde::Serialize;

/// Argon2id cost parameters.
///
/// A value of this type is never mutated. The process default comes from
/// configuration; verification always uses the parameters embedded in the
/// stored hash, so hashes created under older defaults keep verifying.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HashParameters {
    /// Memory cost in KiB.
    pub memory_cost_kib: u32,
    /// Number of passes over memory.
    pub iterations: u32,
    /// Degree of parallelism (lanes).
    pub parallelism: u8,
    /// Salt length in bytes.
    pub salt_length: u32,
    /// Derived key length in bytes.
    pub key_length: u32,
}

/// Largest memory cost (1 GiB) this process will derive with.
pub const MAX_MEMORY_COST_KIB: u32 = 1024 * 1024;

/// Largest number of passes this process will derive with.
pub const MAX_ITERATIONS: u32 = 64;

/// Largest salt or derived key accepted, in bytes.
pub const MAX_OUTPUT_LENGTH: u32 = 1024;

impl HashParameters {
    pub const DEFAULT: HashParameters = HashParameters {
        memory_cost_kib: 64 * 1024,
        iterations: 3,
        parallelism: 2,
        salt_length: 16,
        key_length: 32,
    };

    /// Whether deriving with these parameters stays under the process cost
    /// ceiling. Stored hashes above it are never derived.
    pub fn within_limits(&self) -> bool {
        self.memory_cost_kib <= MAX_MEMORY_COST_KIB
            && self.iterations <= MAX_ITERATIONS
            && self.salt_length <= MAX_OUTPUT_LENGTH
            && self.key_length <= MAX_OUTPUT_LENGTH
    }
}

impl Default for HashParameters {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_parameters() {
        let params = HashParameters::default();
        assert_eq!(params.memory_cost_kib, 65536);
        assert_eq!(params.iterations, 3);
        assert_eq!(params.parallelism, 2);
        assert_eq!(params.salt_length, 16);
        assert_eq!(params.key_length, 32);
    }

    #[test]
    fn test_within_limits() {
        assert!(HashParameters::DEFAULT.within_limits());

        let huge_memory = HashParameters {
            memory_cost_kib: u32::MAX,
            ..HashParameters::DEFAULT
        };
        assert!(!huge_memory.within_limits());

        let many_passes = HashParameters {
            iterations: MAX_ITERATIONS + 1,
            ..HashParameters::DEFAULT
        };
        assert!(!many_passes.within_limits());

        let at_ceiling = HashParameters {
            memory_cost_kib: MAX_MEMORY_COST_KIB,
            iterations: MAX_ITERATIONS,
            ..HashParameters::DEFAULT
        };
        assert!(at_ceiling.within_limits());
    }

    #[test]
    fn test_partial_deserialize_falls_back_to_defaults() {
        let params: HashParameters =
            serde_json::from_str(r#"{"memory_cost_kib": 19456, "iterations": 2}"#)
                .expect("Failed to deserialize parameters");

        assert_eq!(params.memory_cost_kib, 19456);
        assert_eq!(params.iterations, 2);
        assert_eq!(params.parallelism, HashParameters::DEFAULT.parallelism);
        assert_eq!(params.key_length, HashParameters::DEFAULT.key_length);
    }
}
