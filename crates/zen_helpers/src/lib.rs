//! # zen_helpers
//!
//! Small bootstrapping helpers for Zenigata applications.
//!
//! - [`stub`]: render stub files into place, substituting literal placeholder
//!   tokens and creating missing directories.
//! - [`container`]: resolve named services from a container, optionally
//!   checking their type.
//!
//! ## Example
//!
//! ```rust,no_run
//! use zen_helpers::{render, Placeholders};
//!
//! let placeholders = Placeholders::new().with("{{name}}", "Zenigata");
//! render("stubs/greeting.txt", "output/generated.txt", &placeholders).unwrap();
//! ```

pub mod container;
pub mod error;
pub mod placeholders;
pub mod stub;

pub use container::{resolve, resolve_as, Container, ExpectedType, Service, ServiceContainer};
pub use error::{ResolveError, ResolveResult, StubError, StubResult};
pub use placeholders::Placeholders;
pub use stub::{
    render, render_bytes, render_dir, render_to_string, unresolved_placeholders, write_rendered,
    RenderDirOptions,
};
