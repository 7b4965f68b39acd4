pub mod error;
pub mod output;
pub mod parser;
pub mod reading;
pub mod stats;
