// Resume uploads: scoped temporary storage, text extraction, optional analysis.

pub mod coordinator;
pub mod handlers;
