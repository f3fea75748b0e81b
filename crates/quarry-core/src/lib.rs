//! quarry-core
//!
//! Types, error taxonomy, provider traits, configuration and corpus ingestion
//! shared by the text provider, the query engine and the CLI.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod config;
pub mod error;
pub mod ingest;
pub mod traits;
pub mod types;
