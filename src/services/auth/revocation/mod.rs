pub mod store;
pub mod valkey;

pub use store::{RevocationError, RevocationStore};
pub use valkey::ValkeyRevocationStore;
