//! umlsketch Core Types and Definitions
//!
//! This crate provides the vocabulary shared by the umlsketch crates:
//!
//! - **Geometry**: points, sizes and boxes in logical canvas units ([`geometry`])
//! - **Identifiers**: interned node identifiers ([`identifier::NodeId`])
//! - **Model**: node kinds, edge styles and diagram types ([`model`])

pub mod geometry;
pub mod identifier;
pub mod model;
