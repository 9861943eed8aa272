pub mod audit;
pub mod clock;
pub mod config;
pub mod persistence;
pub mod security;
