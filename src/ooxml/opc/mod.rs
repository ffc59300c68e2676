/// Open Packaging Conventions (OPC) support.
///
/// This module provides the parts of the OPC specification needed to edit a
/// package in place:
///
/// - ZIP-based physical packaging that preserves member order
/// - Relationship parsing and target resolution
pub mod constants;
pub mod phys_pkg;
pub mod rel;

// Re-export commonly used types
pub use phys_pkg::PhysPkg;
pub use rel::{Relationship, parse_rels_xml, rels_member_for};
