pub mod cli;
pub mod config;
pub mod convert;
pub mod demo;
pub mod engine;
pub mod fonts;
pub mod hints;
pub mod probe;
pub mod report;
pub mod util;
