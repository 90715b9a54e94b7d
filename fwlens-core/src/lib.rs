pub mod config;
pub mod model;

// Table-browsing state machine
pub mod browse;
pub mod filter;
pub mod nav;
pub mod sort;

// Per-view wiring over the state machine
pub mod views;

// Data-fetch boundary
pub mod provider;
