//! Newsletter rendering and output files.
//!
//! # Submodules
//!
//! - [`templates`]: the built-in HTML template catalogue and renderer
//! - [`files`]: writes rendered documents to disk
//!
//! # Output Structure
//!
//! ```text
//! output_dir/
//! ├── newsletter.html     # batch run
//! └── newsletter_ui.html  # generate run
//! ```
//!
//! A `generate` run may also write a copy to any path given by `--save-as`.

pub mod files;
pub mod templates;
