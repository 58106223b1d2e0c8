/*!
 * Authenticated identity extractor
 *
 * Responsibility:
 * - Give handlers the identity of the current request
 * - axum plumbing lives in core, the type itself in types
 *
 * Public API:
 * - Identity
 * - CurrentIdentity
 */

mod core;
mod types;

pub use self::core::CurrentIdentity;
pub use types::Identity;
