pub mod cards;
pub mod health;
pub mod operations;
pub mod tokens;
pub mod users;
