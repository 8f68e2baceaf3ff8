// Core infrastructure modules
pub mod core;

// Statement building
pub mod builder;

// Import, export and presentation
pub mod cli;
pub mod config;
pub mod engine;
pub mod inference;
pub mod output;
pub mod plot;
pub mod results_grid;
