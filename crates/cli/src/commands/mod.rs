pub mod bench;
pub mod fetch;
pub mod scenarios;
