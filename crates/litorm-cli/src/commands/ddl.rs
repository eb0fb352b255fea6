//! Print the generated DDL
//!
//! Usage: litorm ddl

use crate::person::Person;
use litorm_core::{schema_for, statements};

pub fn execute() -> Result<(), Box<dyn std::error::Error>> {
    let schema = schema_for::<Person>()?;
    println!("{}", statements::create_table(&schema)?);
    Ok(())
}
