pub mod aggregator;
pub mod api;
pub mod app;
pub mod cli;
pub mod config;
pub mod detail;
pub mod filter;
pub mod logging;
pub mod model;
pub mod output;
pub mod planner;
pub mod runner;
pub mod state;

#[cfg(test)]
mod tests;
