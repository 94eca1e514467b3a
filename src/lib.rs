pub mod app;
pub mod cli;
pub mod config;
pub mod dataset;
pub mod fields;
pub mod matcher;
pub mod output;
pub mod render;
pub mod runner;
pub mod sanitize;
pub mod snippets;
pub mod style;
pub mod template;
pub mod utils;

#[cfg(test)]
mod tests;
