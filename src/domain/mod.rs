pub mod catalog;
pub mod client;
pub mod discount;
pub mod errors;
pub mod merge;
pub mod order;
pub mod ports;
pub mod report;
pub mod role;
