// Resume analysis: retried structured generation plus per-user history.

pub mod handlers;
pub mod models;
pub mod service;
pub mod store;
