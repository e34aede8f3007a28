pub mod argon2;
pub mod compare;
pub mod encoded;
pub mod errors;
pub mod params;

pub use argon2::PasswordHasher;
pub use compare::constant_time_eq;
pub use encoded::EncodedHash;
pub use errors::PasswordError;
pub use params::HashParameters;
