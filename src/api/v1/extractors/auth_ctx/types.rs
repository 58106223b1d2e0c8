/*
 * Responsibility
 * - The authenticated-context type handlers see
 * - The gate middleware verifies and stores it in the request extensions;
 *   handlers only ever receive this type
 */
pub use crate::services::auth::Identity;
