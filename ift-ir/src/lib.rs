//! `ift-ir`: the in-memory netlist representation the instrumenter reads and
//! rewrites. Scoped to spec.md §3 ("Data Model") -- wires, cells,
//! connections, and signals, with no control-flow or scheduling
//! constructs, since the instrumenter never needs them.

pub mod attribute;
pub mod builder;
pub mod cell_type;
pub mod common;
pub mod design;
pub mod idlist;
pub mod module;
pub mod signal;
pub mod structure;

pub use attribute::{Attribute, Attributes, BoolAttr, GetAttributes};
pub use builder::Builder;
pub use cell_type::{CellTag, CellType, Parameters, Polarity};
pub use common::{rrc, RRC, WRC};
pub use design::Design;
pub use idlist::IdList;
pub use module::Module;
pub use signal::{BitState, Signal, SignalBit};
pub use structure::{Cell, Wire, WireRole};
