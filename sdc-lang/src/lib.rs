//! Program model consumed by the source printer of the **sdc** decompiler.
//!
//! Everything here is produced by the upstream structuring stage and is only
//! read while printing: expression trees ([`ast`]), the per-method arena of
//! structured control-flow blocks ([`construction`]) and class level metadata
//! ([`decl`]).

pub mod ast;
pub mod construction;
pub mod decl;

pub use log;
