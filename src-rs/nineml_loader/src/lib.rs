#![cfg_attr(doc, doc = include_str!("../README.md"))]
//! Loading and writing NineML dynamics component classes

mod error;
mod handler;
mod load;
mod node;
mod tag;
mod write;


pub use error::LoadError;
pub use handler::HandlerTable;
pub use load::{DynamicsLoader, class_name, load_dynamics};
pub use node::SerialNode;
pub use write::write_dynamics;
