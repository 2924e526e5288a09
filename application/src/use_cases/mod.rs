//! Use cases
//!
//! Application-level operations that orchestrate domain logic.

pub mod block_users;
pub mod search_users;
pub(crate) mod shared;
