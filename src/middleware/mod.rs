/*
 * Responsibility
 * - Public entry points of the middleware layers (each exposes `apply`)
 */
pub mod auth;
pub mod cors;
pub mod http;
