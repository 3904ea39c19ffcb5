//! tokensmith - Library for compiling design tokens into CSS
//!
//! This library provides functionality to:
//! - Load JSON / JSON5 token files and deep-merge them into a dictionary
//! - Layer one theme file per theme on top of a shared base
//! - Resolve `{path.to.token}` references, including dark-mode overrides
//! - Render `@font-face` rules, light/dark custom properties and flat variables

pub mod build;
pub mod cli;
pub mod config;
pub mod css;
pub mod dictionary;
pub mod format;
pub mod init;
pub mod reference;
pub mod source;
pub mod theme;
pub mod token;
pub mod transform;
pub mod watch;
