pub mod config;
pub mod decode;
pub mod fetch;
pub mod output;
