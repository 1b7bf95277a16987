pub mod admin;
pub mod contract;
pub mod draw;
pub mod error;
pub mod guard;
pub mod msg;
pub mod pools;
pub mod query;
pub mod settlement;
pub mod state;
pub mod tickets;
