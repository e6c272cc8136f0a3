pub mod cards;
pub mod credentials;
pub mod operations;
