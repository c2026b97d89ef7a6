pub mod processor;

pub use processor::{BatchMode, Processor};
