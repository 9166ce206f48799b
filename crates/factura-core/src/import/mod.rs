//! Invoice import pipeline: vendor matching and field extraction.

pub mod matcher;
mod parser;
pub mod rules;

pub use matcher::{match_partner, MatchMethod, PartnerMatch};
pub use parser::{ImportOptions, SimplePdfParser};
