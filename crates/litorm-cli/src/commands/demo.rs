//! Demo command
//!
//! Usage: litorm demo --db <PATH> [--count N] [--config FILE]
//!
//! First run fills the `Person` table; every later run ages the people with
//! an even id by one year, so only those rows are updated.

use crate::person::Person;
use chrono::{Local, Months, NaiveDateTime};
use clap::Args;
use litorm_core::{repo, Record};
use litorm_store::db::open_with;
use litorm_store::StoreConfig;
use std::path::PathBuf;

#[derive(Debug, Args)]
pub struct DemoArgs {
    /// Database file (overrides the path from --config)
    #[arg(long)]
    pub db: PathBuf,

    /// Number of people to create when the table is empty
    #[arg(long, default_value_t = 1000)]
    pub count: u32,

    /// TOML store configuration
    #[arg(long)]
    pub config: Option<PathBuf>,
}

/// Execute demo command
pub fn execute(args: DemoArgs) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = match &args.config {
        Some(path) => StoreConfig::load(path)?,
        None => StoreConfig::default(),
    };
    config.path = Some(args.db.clone());

    tracing::debug!(path = %args.db.display(), count = args.count, "demo");
    let store = open_with(&config)?;
    if repo::ensure_table::<Person, _>(&store)? {
        println!("Created table {}", Person::TABLE);
    }

    let mut people: Vec<Person> = repo::load_all(&store)?;
    println!("Loaded {} people", people.len());

    if people.is_empty() {
        let now = Local::now().naive_local();
        for years in 0..args.count {
            people.push(Person::new("John", "Doe", years_before(now, years)?, years as i64));
        }
    } else {
        for person in people.iter_mut().filter(|p| p.id() % 2 == 0) {
            person.date_of_birth = person
                .date_of_birth
                .checked_add_months(Months::new(12))
                .ok_or("date of birth out of range")?;
            person.age += 1;
        }
    }

    let summary = repo::commit_with(&store, &mut people, &config.commit_options())?;
    println!(
        "Committed: {} inserted, {} updated, {} unchanged",
        summary.inserted, summary.updated, summary.unchanged
    );

    Ok(())
}

fn years_before(now: NaiveDateTime, years: u32) -> Result<NaiveDateTime, Box<dyn std::error::Error>> {
    years
        .checked_mul(12)
        .and_then(|months| now.checked_sub_months(Months::new(months)))
        .ok_or_else(|| format!("{} years before {} is out of range", years, now).into())
}
