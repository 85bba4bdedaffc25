pub mod app;
pub mod cli;
pub mod config;
pub mod engine;
pub mod generator;
pub mod model;
pub mod output;
pub mod resolver;

#[cfg(test)]
mod tests;
