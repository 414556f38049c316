//! Care Plan Client
//!
//! Drives the care plan service from an order form: validate the order, generate a care
//! plan from the sanitized data, and persist the result, while keeping aggregate stats
//! fresh. Results are presented through a pluggable [`view::View`].

pub mod cli;
pub mod config;
pub mod error;
pub mod export;
pub mod form;
pub mod gateway;
pub mod logging;
pub mod notify;
pub mod session;
pub mod stats;
pub mod types;
pub mod view;
pub mod workflow;

#[cfg(test)]
mod test_support;
