pub mod build;
pub mod integration;
