//! Submodule-reference cells (spec.md §4.3, "Submodule-reference cells").
//! The referenced module must already be instrumented (the driver visits
//! modules leaves-first), so its taint ports already exist; this handler
//! just wires up a parallel connection for each of them.

use crate::config::Config;
use crate::taint::{taint_of, taint_wire_name};
use ift_ir::{Cell, Module, RRC};
use ift_utils::IftResult;

pub fn handle_submodule(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let ports: Vec<_> = cell
        .borrow()
        .ports()
        .map(|(name, signal)| (*name, signal.clone()))
        .collect();

    for (port_name, signal) in ports {
        if cfg.is_excluded(port_name.as_str()) {
            continue;
        }
        for k in 0..cfg.num_labels {
            let t = taint_of(module, &signal, k, cfg)?;
            let taint_port = taint_wire_name(port_name, k);
            cell.borrow_mut().connect(taint_port, t);
        }
    }
    Ok(true)
}
