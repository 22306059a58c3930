//! Utility functions shared by the API client and the terminal UI.
//!
//! - **Base URL validation**: keeps the bearer token off plaintext HTTP
//! - **Text processing**: sanitizing API strings, width-aware truncation,
//!   date and runtime formatting
//!
//! # Examples
//!
//! ```
//! use marquee::util::{release_year, truncate_to_width};
//!
//! assert_eq!(release_year(Some("1999-03-31")), Some(1999));
//! assert_eq!(truncate_to_width("The Matrix Reloaded", 13), "The Matrix...");
//! ```

mod text;
mod url_validator;

pub use text::{display_width, format_runtime, release_year, sanitize, truncate_to_width};
pub use url_validator::{validate_base_url, UrlValidationError};
