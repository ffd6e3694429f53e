pub mod config;
pub mod db;
pub mod export;
pub mod grid;
pub mod render;
pub mod server;
pub mod types;
