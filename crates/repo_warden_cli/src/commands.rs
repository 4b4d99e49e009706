//! Command modules for the repo-warden CLI.
//!
//! Each submodule handles one command category:
//!
//! - `config_cmd`: configuration checking and display
//! - `drivers_cmd`: registered driver listings

pub mod config_cmd;
pub mod drivers_cmd;
