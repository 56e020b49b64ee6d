// Learning resources: live DISCOVER → STRUCTURE discovery with a static-catalog fallback.

pub mod catalog;
pub mod discovery;
pub mod handlers;
pub mod models;
