//! Shelf application library
//!
//! Application modules and the bootstrap sequence shared by the `shelf-app`
//! server binary and the `shelf` CLI.

pub mod bootstrap;
pub mod modules;

pub use modules::books;
