// Job matching: a single grounded, schema-constrained search for current openings.

pub mod handlers;
pub mod models;
pub mod service;
