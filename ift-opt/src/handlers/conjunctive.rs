//! Conjunctive (imprecise fallback) handlers (spec.md §4.3): over-
//! conservative broadcasts, selected via per-cell-family options.

use crate::config::Config;
use crate::ext::{bit_or, broadcast, or_reduce};
use crate::taint::taint_of;
use ift_ir::{Builder, Cell, Module, RRC};
use ift_utils::IftResult;

/// `out_t = OR-reduce(At)`, broadcast across the output width.
pub fn handle_one_input(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (a, y_width, _a_signed) = super::cell_io(cell);
    for k in 0..cfg.num_labels {
        let at = taint_of(module, &a, k, cfg)?;
        let bit0 = {
            let mut bd = Builder::new(module);
            or_reduce(&mut bd, "ift_conj1_t", at)
        };
        let out_t = broadcast(&bit0, y_width);
        let y = cell.borrow().port("Y").clone();
        let y_taint = taint_of(module, &y, k, cfg)?;
        module.connect(y_taint, out_t)?;
    }
    Ok(true)
}

/// `out_t = OR-reduce(At) | OR-reduce(Bt)`, broadcast.
pub fn handle_two_input(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (a, b, y_width) = {
        let c = cell.borrow();
        (c.port("A").clone(), c.port("B").clone(), c.params.y_width)
    };
    for k in 0..cfg.num_labels {
        let at = taint_of(module, &a, k, cfg)?;
        let bt = taint_of(module, &b, k, cfg)?;
        let bit0 = {
            let mut bd = Builder::new(module);
            let at_r = or_reduce(&mut bd, "ift_conj2_t", at);
            let bt_r = or_reduce(&mut bd, "ift_conj2_t", bt);
            bit_or(&mut bd, "ift_conj2_t", at_r, bt_r)
        };
        let out_t = broadcast(&bit0, y_width);
        let y = cell.borrow().port("Y").clone();
        let y_taint = taint_of(module, &y, k, cfg)?;
        module.connect(y_taint, out_t)?;
    }
    Ok(true)
}

/// `out_t = OR-reduce(At) | OR-reduce(Bt) | OR-reduce(St)`, broadcast --
/// used for the select-shaped cells (MUX, PMUX) when their conjunctive
/// override is set.
pub fn handle_three_input(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (a, b, s, y_width) = {
        let c = cell.borrow();
        (
            c.port("A").clone(),
            c.port("B").clone(),
            c.port("S").clone(),
            c.params.y_width,
        )
    };
    for k in 0..cfg.num_labels {
        let at = taint_of(module, &a, k, cfg)?;
        let bt = taint_of(module, &b, k, cfg)?;
        let st = taint_of(module, &s, k, cfg)?;
        let bit0 = {
            let mut bd = Builder::new(module);
            let at_r = or_reduce(&mut bd, "ift_conj3_t", at);
            let bt_r = or_reduce(&mut bd, "ift_conj3_t", bt);
            let st_r = or_reduce(&mut bd, "ift_conj3_t", st);
            let ab = bit_or(&mut bd, "ift_conj3_t", at_r, bt_r);
            bit_or(&mut bd, "ift_conj3_t", ab, st_r)
        };
        let out_t = broadcast(&bit0, y_width);
        let y = cell.borrow().port("Y").clone();
        let y_taint = taint_of(module, &y, k, cfg)?;
        module.connect(y_taint, out_t)?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ift_ir::{CellTag, Module, Signal, WireRole};

    #[test]
    fn two_input_broadcasts_the_or_of_both_operands() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let a = m.add_wire("a", 4, WireRole::Input).unwrap();
        let b = m.add_wire("b", 4, WireRole::Input).unwrap();
        m.add_wire("a_t0", 4, WireRole::Internal).unwrap();
        m.add_wire("b_t0", 4, WireRole::Internal).unwrap();
        let cell = {
            let mut bd = Builder::new(&mut m);
            bd.add_binary("and0", CellTag::And, Signal::whole_wire(&a), Signal::whole_wire(&b), false, false, 4)
        };
        let connections_before = m.connections().len();
        let keep = handle_two_input(&mut m, &cell, &cfg).unwrap();
        assert!(keep);
        assert!(m.connections().len() > connections_before);
    }

    #[test]
    fn three_input_broadcasts_the_or_of_all_three_operands() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let a = m.add_wire("a", 4, WireRole::Input).unwrap();
        let b = m.add_wire("b", 4, WireRole::Input).unwrap();
        let s = m.add_wire("s", 1, WireRole::Input).unwrap();
        m.add_wire("a_t0", 4, WireRole::Internal).unwrap();
        m.add_wire("b_t0", 4, WireRole::Internal).unwrap();
        m.add_wire("s_t0", 1, WireRole::Internal).unwrap();
        let cell = {
            let mut bd = Builder::new(&mut m);
            bd.add_mux("mux0", Signal::whole_wire(&a), Signal::whole_wire(&b), Signal::whole_wire(&s), 4)
        };
        let keep = handle_three_input(&mut m, &cell, &cfg).unwrap();
        assert!(keep);
    }
}
