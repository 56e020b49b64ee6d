// User-curated course list: plain CRUD, no generation involved.

pub mod handlers;
pub mod models;
pub mod store;
