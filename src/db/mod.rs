mod connection;
mod queries;

pub use connection::{Database, REQUIRED_TABLES};
