//! Shared utilities for the IFT instrumenter: interned identifiers, error
//! types, name generation, and small numeric helpers. Split out from
//! `ift-ir`/`ift-opt` the same way the teacher keeps `calyx-utils` separate
//! from `calyx-ir`/`calyx-opt`.

mod bits;
mod errors;
mod id;
mod namegen;

pub use bits::{bits_needed_for, clog2};
pub use errors::{Error, IftResult};
pub use id::{GSym, GetName, Id};
pub use namegen::NameGenerator;
