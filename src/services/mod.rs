pub mod cache;
pub mod security;
