//! `ift-opt`: the instrumentation passes themselves. Given an already
//! elaborated [`ift_ir::Design`] (processes lowered, hierarchy resolved),
//! [`driver::instrument_design`] rewrites every selected module in place so
//! that it also computes, alongside its original data, a sound
//! over-approximation of which output bits each input's taint could have
//! reached (spec.md §1-2).
//!
//! Module layout mirrors `calyx-opt`: a `config` struct for the recognized
//! options, an `errors` re-export, small `taint`/`ext` utility modules used
//! by every handler, a `handlers` library (one file per cell family), a
//! `dispatch` table tying cell tags to handlers, a `module_instrumenter`
//! that runs the five-step per-module procedure (spec.md §4.4), a `topo`
//! module computing the leaves-first visiting order (§4.5), and a `driver`
//! that ties the two together over a whole [`ift_ir::Design`].

pub mod config;
pub mod dispatch;
pub mod driver;
pub mod errors;
pub mod ext;
pub mod handlers;
pub mod module_instrumenter;
pub mod taint;
pub mod topo;

pub use config::Config;
pub use driver::{instrument_design, InstrumentReport};
pub use errors::PassError;
pub use module_instrumenter::instrument_module;
