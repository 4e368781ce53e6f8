pub mod collector;
pub mod cpu;
pub mod platform;
pub mod process;
pub mod reader;
pub mod registry;
pub mod snapshot;
pub mod source;
