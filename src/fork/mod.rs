// src/fork/mod.rs

//! Local fork node management.

pub mod launcher;

pub use launcher::ForkLauncher;
