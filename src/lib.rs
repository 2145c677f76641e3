pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod detail;
pub mod gallery;
pub mod lifetime;
pub mod output;
pub mod runner;
pub mod utils;

#[cfg(test)]
mod tests;
