//! marquee: a terminal front end for browsing a TMDB-style movie and TV
//! catalog.
//!
//! The library half holds everything that does not need a terminal: the
//! API client, the catalog and detail loaders, genre resolution and
//! configuration. The binary wires them into the [`ui`] event loop.

pub mod api;
pub mod app;
pub mod catalog;
pub mod config;
pub mod detail;
pub mod genre;
pub mod ui;
pub mod util;
