pub mod activity;
pub mod document;
pub mod record;
