//! # bookrights CLI
//!
//! Command-line front end for a local book rights registry.
//!
//! ## Subcommands
//!
//! - `register` - Register a book with encrypted pricing tier and distribution window
//! - `info` - Show the public metadata of a book
//! - `total` - Show how many books are registered
//! - `grant` - Allow another identity to decrypt a book's terms
//! - `decrypt` - Decrypt one of a book's terms, if authorized
//! - `identity` - Show (or generate) the identity behind `--key`
//!
//! ## Crate Policy
//!
//! - Argument parsing lives in `main.rs`; handlers live in [`commands`].
//! - Handlers delegate to the registry crates and only format output.

pub mod commands;
pub mod session;
