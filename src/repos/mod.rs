pub mod card_repo;
pub mod error;
pub mod operation_repo;
pub mod token_repo;
pub mod user_repo;
