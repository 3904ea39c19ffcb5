//! Build pipeline module for tokensmith
//!
//! Turns a token source directory into CSS files.
//!
//! # Overview
//!
//! The build pipeline consists of:
//! - **Discovery**: Find base, component and theme token files
//! - **Planning**: One file target per output stylesheet
//! - **Rendering**: Merge, layer themes and render every target in memory
//! - **Writing**: Write files whose content changed
//!
//! # Example
//!
//! ```ignore
//! use tokensmith::build::{BuildContext, BuildPipeline};
//! use tokensmith::config::loader::load_config;
//!
//! let config = load_config(None)?;
//! let context = BuildContext::new(config, project_root);
//! let pipeline = BuildPipeline::new(context);
//!
//! let result = pipeline.build()?;
//! println!("{}", result.summary());
//! ```

pub mod context;
pub mod discovery;
pub mod pipeline;
pub mod result;
pub mod target;

pub use context::*;
pub use discovery::*;
pub use pipeline::*;
pub use result::*;
pub use target::*;
