//! Command-line front end for the asset catalog
//!
//! The `asset-catalog` binary is a thin shell over these modules:
//! [`commands`] runs the work and [`output`] persists the results.

#![warn(missing_docs)]

pub mod commands;
pub mod output;
