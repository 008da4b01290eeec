//! rbxbuild compiles a directory of Lua sources and data files into a single
//! Roblox XML model document.
//!
//! The whole compile is one synchronous pass: the tree compiler walks the
//! source directory into an [`build::instance::Instance`] tree, the
//! serializer emits it depth-first with run-scoped referent ids, and the
//! assembler wraps the result in the fixed `<roblox>` envelope. Recoverable
//! problems surface as [`diagnostics::Diagnostic`]s next to the result
//! instead of aborting the run.

pub mod build;
pub mod cli;
pub mod config;
pub mod diagnostics;
pub mod helpers;
pub mod watcher;
