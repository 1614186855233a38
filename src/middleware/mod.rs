/*
 * Responsibility
 * - Public surface of the middleware layer
 * - auth: per-route bearer verification; cors / http: router-wide layers
 */
pub mod auth;
pub mod cors;
pub mod http;
