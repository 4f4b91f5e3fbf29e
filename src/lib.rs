//! Scrapes a department's figures off the Uruguayan departmental election
//! results page and appends them, timestamped, to a CSV file.
//!
//! ```no_run
//! use elecciones_scraper::config::Config;
//! use elecciones_scraper::source::SnapshotSource;
//!
//! let config = Config::default();
//! let record = elecciones_scraper::run::run(&config, &SnapshotSource::new("page.html")).unwrap();
//! println!("{:?}", record.field_names());
//! ```

#![recursion_limit = "1024"]

#[macro_use]
extern crate error_chain;
#[macro_use]
extern crate if_chain;
#[macro_use]
extern crate serde_derive;
#[macro_use]
extern crate tracing;

pub mod error;
pub mod data_structs;
pub mod normalize;
pub mod scrapers;
pub mod recorder;
pub mod source;
pub mod config;
pub mod run;
#[cfg(feature = "browser")]
pub mod browser;
