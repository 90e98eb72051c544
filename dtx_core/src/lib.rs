//! `dtx_core` is the core library for the `dtx` design token transformer. It
//! turns the token export of a design tool into the stylesheets and
//! configuration a component library consumes: theme variable sheets,
//! component utility-class stylesheets and a class-merge configuration.
//!
//! ## Processing Pipeline
//!
//! ```text
//! Design tool export (JSON)
//!   → Classification (objects with `$value` become tokens, the rest groups)
//!   → Assemblers (select, omit, pick and re-key into theme namespaces)
//!   → Prepare pass (rewrite alias references, embed mode values)
//!   → Platforms (filter sources, flatten, apply transforms in order)
//!   → Formats (CSS variables, component classes, class-merge JSON)
//! ```
//!
//! ## Modules
//!
//! - [`mapper`]: Recursive token tree mapping used by every pass.
//! - [`references`]: Rewriting of design-tool reference paths into theme
//!   namespaces.
//! - [`modes`]: Folding per-mode values into a single CSS expression.
//! - [`units`]: Pixel to rem conversion.
//! - [`assemble`]: Building the theme and component sources.
//! - [`transforms`] and [`formats`]: The built-in emission backends.
//!
//! ## Key Types
//!
//! - [`Group`], [`Token`]: The classified token tree.
//! - [`DtxConfig`]: Configuration loaded from `dtx.toml`.
//! - [`Registry`]: Named transforms and formats available to platforms.
//! - [`Pipeline`]: Validates the configuration and produces every output.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::path::Path;
//!
//! use dtx_core::DtxConfig;
//! use dtx_core::Pipeline;
//! use dtx_core::Registry;
//! use dtx_core::write_outputs;
//!
//! let root = Path::new(".");
//! let config = DtxConfig::load_or_default(root).unwrap();
//! let pipeline = Pipeline::new(config, Registry::builtin()).unwrap();
//! let result = pipeline.build(root).unwrap();
//!
//! write_outputs(root, &result.outputs).unwrap();
//! ```

pub use assemble::Source;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use references::ReferenceWarning;
pub use registry::*;
pub use tokens::*;

pub mod assemble;
pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
pub mod formats;
pub mod mapper;
pub mod modes;
pub mod references;
mod registry;
mod tokens;
pub mod transforms;
pub mod units;

#[cfg(test)]
mod __fixtures;
