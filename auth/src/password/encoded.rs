use std::fmt;
use std::str::FromStr;

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;

use super::errors::PasswordError;
use super::params::HashParameters;

/// Algorithm tag written into every encoded hash.
pub const ALGORITHM: &str = "argon2id";

/// Argon2 version this implementation derives and accepts (0x13).
pub const VERSION: u32 = 0x13;

/// A derived password key together with the salt and cost parameters used to
/// produce it.
///
/// Text form: `$argon2id$v=19$m=<kib>,t=<iterations>,p=<lanes>$<salt>$<key>`
/// with unpadded URL-safe base64 segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedHash {
    parameters: HashParameters,
    salt: Vec<u8>,
    key: Vec<u8>,
}

impl EncodedHash {
    /// Build an encoded hash from its parts.
    ///
    /// # Errors
    /// * `InvalidParameters` - Salt or key length disagrees with `parameters`
    pub fn new(
        parameters: HashParameters,
        salt: Vec<u8>,
        key: Vec<u8>,
    ) -> Result<Self, PasswordError> {
        if salt.len() != parameters.salt_length as usize {
            return Err(PasswordError::InvalidParameters(format!(
                "salt is {} bytes, parameters require {}",
                salt.len(),
                parameters.salt_length
            )));
        }

        if key.len() != parameters.key_length as usize {
            return Err(PasswordError::InvalidParameters(format!(
                "key is {} bytes, parameters require {}",
                key.len(),
                parameters.key_length
            )));
        }

        Ok(Self {
            parameters,
            salt,
            key,
        })
    }

    pub fn parameters(&self) -> HashParameters {
        self.parameters
    }

    pub fn salt(&self) -> &[u8] {
        &self.salt
    }

    pub fn key(&self) -> &[u8] {
        &self.key
    }

    /// Render the canonical text form.
    pub fn encode(&self) -> String {
        format!(
            "${}$v={}$m={},t={},p={}${}${}",
            ALGORITHM,
            VERSION,
            self.parameters.memory_cost_kib,
            self.parameters.iterations,
            self.parameters.parallelism,
            URL_SAFE_NO_PAD.encode(&self.salt),
            URL_SAFE_NO_PAD.encode(&self.key),
        )
    }

    /// Parse the canonical text form.
    ///
    /// Salt and key lengths in the returned parameters come from the decoded
    /// bytes, never from the string.
    ///
    /// # Errors
    /// * `MalformedHash` - Wrong segment count, algorithm tag or cost layout
    /// * `UnsupportedVersion` - Version other than 19
    /// * `InvalidEncoding` - Salt or key is not valid base64
    pub fn decode(encoded: &str) -> Result<Self, PasswordError> {
        let segments: Vec<&str> = encoded.split('$').collect();
        if segments.len() != 6 {
            return Err(PasswordError::MalformedHash(format!(
                "expected 6 '$'-delimited segments, got {}",
                segments.len()
            )));
        }

        if !segments[0].is_empty() {
            return Err(PasswordError::MalformedHash(
                "hash must start with '$'".to_string(),
            ));
        }

        if segments[1] != ALGORITHM {
            return Err(PasswordError::MalformedHash(format!(
                "unknown algorithm tag '{}'",
                segments[1]
            )));
        }

        let version = segments[2]
            .strip_prefix("v=")
            .and_then(parse_decimal::<u32>)
            .ok_or_else(|| PasswordError::MalformedHash("invalid version segment".to_string()))?;
        if version != VERSION {
            return Err(PasswordError::UnsupportedVersion(version));
        }

        let (memory_cost_kib, iterations, parallelism) = parse_costs(segments[3])?;
        let salt = decode_segment(segments[4], "salt")?;
        let key = decode_segment(segments[5], "key")?;

        let parameters = HashParameters {
            memory_cost_kib,
            iterations,
            parallelism,
            salt_length: byte_length(&salt, "salt")?,
            key_length: byte_length(&key, "key")?,
        };

        Ok(Self {
            parameters,
            salt,
            key,
        })
    }
}

impl fmt::Display for EncodedHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.encode())
    }
}

impl FromStr for EncodedHash {
    type Err = PasswordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::decode(s)
    }
}

fn parse_costs(segment: &str) -> Result<(u32, u32, u8), PasswordError> {
    let malformed = || {
        PasswordError::MalformedHash(format!(
            "cost segment '{}' is not m=<int>,t=<int>,p=<int>",
            segment
        ))
    };

    let mut fields = segment.split(',');
    let memory = fields
        .next()
        .and_then(|f| f.strip_prefix("m="))
        .and_then(parse_decimal::<u32>)
        .ok_or_else(malformed)?;
    let iterations = fields
        .next()
        .and_then(|f| f.strip_prefix("t="))
        .and_then(parse_decimal::<u32>)
        .ok_or_else(malformed)?;
    let parallelism = fields
        .next()
        .and_then(|f| f.strip_prefix("p="))
        .and_then(parse_decimal::<u8>)
        .ok_or_else(malformed)?;

    if fields.next().is_some() {
        return Err(malformed());
    }

    Ok((memory, iterations, parallelism))
}

/// Unsigned decimal with no sign or whitespace.
fn parse_decimal<T: FromStr>(s: &str) -> Option<T> {
    if s.is_empty() || !s.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    s.parse().ok()
}

// PHC strings from the argon2 crate use the standard alphabet.
fn decode_segment(segment: &str, name: &str) -> Result<Vec<u8>, PasswordError> {
    URL_SAFE_NO_PAD
        .decode(segment)
        .or_else(|_| STANDARD_NO_PAD.decode(segment))
        .map_err(|e| PasswordError::InvalidEncoding(format!("{}: {}", name, e)))
}

fn byte_length(bytes: &[u8], name: &str) -> Result<u32, PasswordError> {
    u32::try_from(bytes.len())
        .map_err(|_| PasswordError::MalformedHash(format!("{} is too long", name)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_parameters() -> HashParameters {
        HashParameters {
            memory_cost_kib: 65536,
            iterations: 3,
            parallelism: 2,
            salt_length: 16,
            key_length: 32,
        }
    }

    fn sample_hash() -> EncodedHash {
        let salt: Vec<u8> = (0u8..16).collect();
        let key: Vec<u8> = (100u8..132).collect();
        EncodedHash::new(sample_parameters(), salt, key).expect("Failed to build hash")
    }

    #[test]
    fn test_encode_layout() {
        let encoded = sample_hash().encode();

        assert!(encoded.starts_with("$argon2id$v=19$m=65536,t=3,p=2$"));
        let segments: Vec<&str> = encoded.split('$').collect();
        assert_eq!(segments.len(), 6);
        // unpadded
        assert!(!segments[4].contains('='));
        assert!(!segments[5].contains('='));
        assert_eq!(encoded, sample_hash().to_string());
    }

    #[test]
    fn test_decode_inverts_encode() {
        let hash = sample_hash();
        let decoded = EncodedHash::decode(&hash.encode()).expect("Failed to decode hash");

        assert_eq!(decoded, hash);
        assert_eq!(decoded.encode(), hash.encode());
    }

    #[test]
    fn test_decode_derives_lengths_from_bytes() {
        let params = HashParameters {
            memory_cost_kib: 1024,
            iterations: 1,
            parallelism: 1,
            salt_length: 8,
            key_length: 12,
        };
        let hash = EncodedHash::new(params, vec![7; 8], vec![9; 12]).unwrap();

        let decoded: EncodedHash = hash.encode().parse().expect("Failed to parse hash");
        assert_eq!(decoded.parameters().salt_length, 8);
        assert_eq!(decoded.parameters().key_length, 12);
        assert_eq!(decoded.salt(), &[7; 8]);
        assert_eq!(decoded.key(), &[9; 12]);
    }

    #[test]
    fn test_new_rejects_length_mismatch() {
        let result = EncodedHash::new(sample_parameters(), vec![0; 15], vec![0; 32]);
        assert!(matches!(result, Err(PasswordError::InvalidParameters(_))));

        let result = EncodedHash::new(sample_parameters(), vec![0; 16], vec![0; 31]);
        assert!(matches!(result, Err(PasswordError::InvalidParameters(_))));
    }

    #[test]
    fn test_decode_wrong_segment_count() {
        let encoded = sample_hash().encode();
        let truncated = encoded.rsplitn(2, '$').nth(1).unwrap();
        let extended = format!("{}$extra", encoded);

        for input in ["", "plain", "$argon2id$v=19", truncated, extended.as_str()] {
            assert!(
                matches!(
                    EncodedHash::decode(input),
                    Err(PasswordError::MalformedHash(_))
                ),
                "expected MalformedHash for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_decode_unsupported_version() {
        let encoded = sample_hash().encode().replace("$v=19$", "$v=16$");
        assert_eq!(
            EncodedHash::decode(&encoded),
            Err(PasswordError::UnsupportedVersion(16))
        );
    }

    #[test]
    fn test_decode_malformed_version() {
        let encoded = sample_hash().encode().replace("$v=19$", "$version=19$");
        assert!(matches!(
            EncodedHash::decode(&encoded),
            Err(PasswordError::MalformedHash(_))
        ));
    }

    #[test]
    fn test_decode_wrong_algorithm_tag() {
        let encoded = sample_hash().encode().replace("$argon2id$", "$argon2i$");
        assert!(matches!(
            EncodedHash::decode(&encoded),
            Err(PasswordError::MalformedHash(_))
        ));
    }

    #[test]
    fn test_decode_malformed_costs() {
        let base = sample_hash().encode();
        let inputs = [
            base.replace("m=65536,t=3,p=2", "t=3,m=65536,p=2"),
            base.replace("m=65536,t=3,p=2", "m=65536,t=3"),
            base.replace("m=65536,t=3,p=2", "m=65536,t=3,p=2,k=1"),
            base.replace("m=65536,t=3,p=2", "m=abc,t=3,p=2"),
            base.replace("m=65536,t=3,p=2", "m=-1,t=3,p=2"),
            base.replace("m=65536,t=3,p=2", "m=65536,t=3,p=300"),
        ];

        for input in inputs {
            assert!(
                matches!(
                    EncodedHash::decode(&input),
                    Err(PasswordError::MalformedHash(_))
                ),
                "expected MalformedHash for {:?}",
                input
            );
        }
    }

    #[test]
    fn test_decode_invalid_base64() {
        let hash = sample_hash();
        let salt = URL_SAFE_NO_PAD.encode(hash.salt());
        let key = URL_SAFE_NO_PAD.encode(hash.key());

        let bad_salt = hash.encode().replace(&salt, "not*base64!");
        let bad_key = hash.encode().replace(&key, "%%%%");

        assert!(matches!(
            EncodedHash::decode(&bad_salt),
            Err(PasswordError::InvalidEncoding(_))
        ));
        assert!(matches!(
            EncodedHash::decode(&bad_key),
            Err(PasswordError::InvalidEncoding(_))
        ));
    }

    #[test]
    fn test_decode_accepts_standard_alphabet() {
        // 0xfb bytes encode to '+' and '/' in the standard alphabet
        let salt = vec![0xfb; 16];
        let key = vec![0xff; 32];
        let phc = format!(
            "$argon2id$v=19$m=19456,t=2,p=1${}${}",
            STANDARD_NO_PAD.encode(&salt),
            STANDARD_NO_PAD.encode(&key)
        );
        assert!(phc.contains('+') || phc.contains('/'));

        let decoded = EncodedHash::decode(&phc).expect("Failed to decode PHC hash");
        assert_eq!(decoded.salt(), salt.as_slice());
        assert_eq!(decoded.key(), key.as_slice());
        assert_eq!(decoded.parameters().memory_cost_kib, 19456);
    }
}
