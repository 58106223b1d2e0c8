pub mod bearer;
pub mod error;
pub mod exemption;
pub mod factory;
pub mod gate;
pub mod identity;
pub mod revocation;
pub mod verifier;

#[cfg(test)]
pub mod testing;

pub use error::AuthError;
pub use factory::build_auth_gate;
pub use gate::{AuthGate, Verdict};
pub use identity::Identity;
