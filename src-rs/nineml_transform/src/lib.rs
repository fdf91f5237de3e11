#![cfg_attr(doc, doc = include_str!("../README.md"))]
//! Transformations of NineML dynamics component classes

mod clone;
mod flatten;
mod indices;
mod port;
mod rename;

#[cfg(test)]
mod test;

pub use clone::{Cloner, clone_class};
pub use flatten::flatten;
pub use indices::assign_indices;
pub use port::{ExpandPortDefinition, close_analog_port};
pub use rename::{RenameSymbol, rename_symbol};
