//! CLI command implementations

pub mod ddl;
pub mod demo;
