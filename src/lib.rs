pub mod config;
pub mod db;
pub mod discovery;
pub mod errors;
pub mod lookup;
pub mod types;
