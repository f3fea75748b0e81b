//! quarry-cli
//!
//! Argument shorthand and result rendering for the `quarry` binary.

#![deny(warnings)]
#![deny(dead_code)]
#![deny(unused_variables)]
#![deny(unused_imports)]

pub mod output;
pub mod query_args;
