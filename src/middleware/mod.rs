/*
 * Responsibility
 * - request pipeline stages (auth, cache)
 * - HTTP-level layers applied to the whole router (http)
 */
pub mod auth;
pub mod cache;
pub mod http;
