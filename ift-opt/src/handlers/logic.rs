//! LOGIC-AND, LOGIC-OR (spec.md §4.3): reduce each operand to a single
//! boolean via min/max reductions, then apply the precise two-corner XOR
//! technique used by the magnitude comparisons.

use crate::config::Config;
use crate::ext::{bit_and, bit_not, bit_or, bit_xor, or_reduce, zero_extend};
use crate::handlers::conjunctive;
use crate::taint::taint_of;
use ift_ir::{Builder, Cell, CellTag, Module, RRC, Signal};
use ift_utils::IftResult;

fn bound(b: &mut Builder, prefix: &str, x: Signal, xt: Signal, want_min: bool) -> Signal {
    if want_min {
        let not_t = bit_not(b, prefix, xt);
        bit_and(b, prefix, x, not_t)
    } else {
        bit_or(b, prefix, x, xt)
    }
}

pub fn handle_logic_and_or(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (a, b, y_width, tag) = {
        let c = cell.borrow();
        (c.port("A").clone(), c.port("B").clone(), c.params.y_width, c.prototype.tag())
    };
    let conjunctive_wanted = match tag {
        CellTag::LogicAnd => cfg.conjunctive.logic_and,
        CellTag::LogicOr => cfg.conjunctive.logic_or,
        _ => unreachable!("handle_logic_and_or dispatched for a non-logic cell"),
    };
    if conjunctive_wanted {
        return conjunctive::handle_two_input(module, cell, cfg);
    }
    for k in 0..cfg.num_labels {
        let at = taint_of(module, &a, k, cfg)?;
        let bt = taint_of(module, &b, k, cfg)?;
        let bit0 = {
            let mut bd = Builder::new(module);
            let min_a_full = bound(&mut bd, "ift_logic_t", a.clone(), at.clone(), true);
            let max_a_full = bound(&mut bd, "ift_logic_t", a, at, false);
            let min_b_full = bound(&mut bd, "ift_logic_t", b.clone(), bt.clone(), true);
            let max_b_full = bound(&mut bd, "ift_logic_t", b, bt, false);
            let min_bool_a = or_reduce(&mut bd, "ift_logic_t", min_a_full);
            let max_bool_a = or_reduce(&mut bd, "ift_logic_t", max_a_full);
            let min_bool_b = or_reduce(&mut bd, "ift_logic_t", min_b_full);
            let max_bool_b = or_reduce(&mut bd, "ift_logic_t", max_b_full);
            let corner1 = bd
                .add_binary("ift_logic_lo", tag, min_bool_a, max_bool_b, false, false, 1)
                .borrow()
                .port("Y")
                .clone();
            let corner2 = bd
                .add_binary("ift_logic_hi", tag, max_bool_a, min_bool_b, false, false, 1)
                .borrow()
                .port("Y")
                .clone();
            bit_xor(&mut bd, "ift_logic_t", corner1, corner2)
        };
        let out_t = zero_extend(&bit0, y_width);
        let y = cell.borrow().port("Y").clone();
        let y_taint = taint_of(module, &y, k, cfg)?;
        module.connect(y_taint, out_t)?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ift_ir::WireRole;

    #[test]
    fn logic_and_reduces_to_a_single_boolean_taint() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let a = m.add_wire("a", 4, WireRole::Input).unwrap();
        let b = m.add_wire("b", 4, WireRole::Input).unwrap();
        m.add_wire("a_t0", 4, WireRole::Internal).unwrap();
        m.add_wire("b_t0", 4, WireRole::Internal).unwrap();
        let cell = {
            let mut bd = Builder::new(&mut m);
            bd.add_binary("land0", CellTag::LogicAnd, Signal::whole_wire(&a), Signal::whole_wire(&b), false, false, 1)
        };
        let connections_before = m.connections().len();
        let keep = handle_logic_and_or(&mut m, &cell, &cfg).unwrap();
        assert!(keep);
        assert!(m.connections().len() > connections_before);
    }

    #[test]
    fn logic_or_conjunctive_override_delegates() {
        let mut m = Module::new("m".into());
        let mut cfg = Config::default();
        cfg.conjunctive.logic_or = true;
        let a = m.add_wire("a", 4, WireRole::Input).unwrap();
        let b = m.add_wire("b", 4, WireRole::Input).unwrap();
        m.add_wire("a_t0", 4, WireRole::Internal).unwrap();
        m.add_wire("b_t0", 4, WireRole::Internal).unwrap();
        let cell = {
            let mut bd = Builder::new(&mut m);
            bd.add_binary("lor0", CellTag::LogicOr, Signal::whole_wire(&a), Signal::whole_wire(&b), false, false, 1)
        };
        let keep = handle_logic_and_or(&mut m, &cell, &cfg).unwrap();
        assert!(keep);
    }
}
