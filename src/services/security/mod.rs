pub mod accounts;
pub mod password;
pub mod postgres;
pub mod token_store;
pub mod user_details;

pub use postgres::PgTokenStore;
pub use token_store::{TokenStore, TokenStoreError};
pub use user_details::{ROLE_ADMIN, ROLE_SERVICE, ROLE_USER, UserDetails};
