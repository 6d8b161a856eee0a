// SPDX-License-Identifier: MIT OR Apache-2.0

//! lbsearch - Interactive fuzzy search over LaunchBox game catalogs
//!
//! Loads a platform XML catalog into memory, scores entries against the
//! query with a tiered lexical ranking, and renders results live in the
//! terminal while a background worker re-ranks on every edit.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod command;
pub mod config;
pub mod display;
pub mod errors;
pub mod input;
pub mod search;
