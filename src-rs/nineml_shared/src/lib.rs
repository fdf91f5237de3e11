#![cfg_attr(doc, doc = include_str!("../README.md"))]
//! Shared utilities for the NineML crates

pub mod error;
mod stack;

pub use stack::Stack;
