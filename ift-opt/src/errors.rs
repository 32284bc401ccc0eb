//! Error taxonomy for the instrumentation passes (spec.md §7). The variants
//! named there -- unsupported cell, recursive hierarchy, unlowered process,
//! port/parameter mismatch, empty selection -- are already constructors on
//! `ift_utils::Error`; this module just gives the pass-facing name used
//! throughout `ift-opt`, mirroring how the teacher's individual passes reuse
//! `calyx_utils::Error` rather than minting a parallel error type per pass.

pub use ift_utils::{Error as PassError, IftResult};
