//! Repositories for database operations
//!
//! Search filters are always bound parameters.

pub mod order;
pub mod product;
pub mod stall;
pub mod user;

pub use order::PgLedger;
pub use product::ProductRepository;
pub use stall::StallRepository;
pub use user::{AccountWrite, UserRepository};
