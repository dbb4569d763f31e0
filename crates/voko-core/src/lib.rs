//! Voko Core Types and Definitions
//!
//! This crate provides the foundational types for the voko dictionary
//! grammar, the markup format of Reta Vortaro. It includes:
//!
//! - **Kinds**: the closed set of grammar element kinds ([`kind::ElementKind`])
//!   together with their content models and declared attributes
//! - **Elements**: the parsed element tree ([`element`] module)
//! - **JSON**: ordered JSON rendering of element trees ([`json`] module)

pub mod element;
pub mod json;
pub mod kind;

pub use element::{Element, Node};
pub use kind::{ContentModel, ElementKind};
