pub mod catalog;
pub mod filter;
pub mod import;
pub mod log;
pub mod report;
pub mod selector;
