pub mod query;
pub mod setup;
pub mod ui;
