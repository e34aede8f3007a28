pub mod credential;
pub mod memory;
pub mod role;

pub use credential::PostgresCredentialStore;
pub use memory::InMemoryCredentialStore;
pub use memory::InMemoryRoleResolver;
pub use role::PostgresRoleResolver;
