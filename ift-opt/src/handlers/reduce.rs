//! LOGIC-NOT / reduce-OR / reduce-bool, REDUCE-AND, REDUCE-XOR (spec.md
//! §4.3). All three produce a single tainted bit; upper output bits are
//! constant 0 (the "upper bits constant 0" convention, spec.md §9).

use crate::config::Config;
use crate::ext::{and_reduce, bit_and, bit_not, bit_or, or_reduce, zero_extend};
use crate::taint::taint_of;
use ift_ir::{Builder, Cell, Module, RRC};
use ift_utils::IftResult;

/// `out_t[0] = OR-reduce(At) & ~OR-reduce(A & ~At)`.
pub fn handle_logic_not_or_reduce_bool(
    module: &mut Module,
    cell: &RRC<Cell>,
    cfg: &Config,
) -> IftResult<bool> {
    let (a, y_width, _a_signed) = super::cell_io(cell);
    for k in 0..cfg.num_labels {
        let at = taint_of(module, &a, k, cfg)?;
        let bit0 = {
            let mut bd = Builder::new(module);
            let at_r = or_reduce(&mut bd, "ift_rdc_t", at.clone());
            let not_at = bit_not(&mut bd, "ift_rdc_t", at);
            let a_and_notat = bit_and(&mut bd, "ift_rdc_t", a, not_at);
            let reduced = or_reduce(&mut bd, "ift_rdc_t", a_and_notat);
            let not_reduced = bit_not(&mut bd, "ift_rdc_t", reduced);
            bit_and(&mut bd, "ift_rdc_t", at_r, not_reduced)
        };
        let out_t = zero_extend(&bit0, y_width);
        let y = cell.borrow().port("Y").clone();
        let y_taint = taint_of(module, &y, k, cfg)?;
        module.connect(y_taint, out_t)?;
    }
    Ok(true)
}

/// `out_t[0] = OR-reduce(At) & AND-reduce(A | At)`.
pub fn handle_reduce_and(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (a, y_width, _a_signed) = super::cell_io(cell);
    for k in 0..cfg.num_labels {
        let at = taint_of(module, &a, k, cfg)?;
        let bit0 = {
            let mut bd = Builder::new(module);
            let at_r = or_reduce(&mut bd, "ift_rand_t", at.clone());
            let a_or_at = bit_or(&mut bd, "ift_rand_t", a, at);
            let and_r = and_reduce(&mut bd, "ift_rand_t", a_or_at);
            bit_and(&mut bd, "ift_rand_t", at_r, and_r)
        };
        let out_t = zero_extend(&bit0, y_width);
        let y = cell.borrow().port("Y").clone();
        let y_taint = taint_of(module, &y, k, cfg)?;
        module.connect(y_taint, out_t)?;
    }
    Ok(true)
}

/// `out_t[0] = OR-reduce(At)`.
pub fn handle_reduce_xor(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (a, y_width, _a_signed) = super::cell_io(cell);
    for k in 0..cfg.num_labels {
        let at = taint_of(module, &a, k, cfg)?;
        let bit0 = {
            let mut bd = Builder::new(module);
            or_reduce(&mut bd, "ift_rxor_t", at)
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
    use ift_ir::{CellTag, Signal, WireRole};

    fn wired_unary(m: &mut Module, tag: CellTag) -> RRC<Cell> {
        let a = m.add_wire("a", 4, WireRole::Input).unwrap();
        m.add_wire("a_t0", 4, WireRole::Internal).unwrap();
        let mut bd = Builder::new(m);
        bd.add_unary("u0", tag, Signal::whole_wire(&a), false, 1)
    }

    #[test]
    fn logic_not_collapses_to_a_single_taint_bit() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let cell = wired_unary(&mut m, CellTag::LogicNot);
        let connections_before = m.connections().len();
        let keep = handle_logic_not_or_reduce_bool(&mut m, &cell, &cfg).unwrap();
        assert!(keep);
        assert!(m.connections().len() > connections_before);
    }

    #[test]
    fn reduce_and_requires_every_bit_set_or_tainted() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let cell = wired_unary(&mut m, CellTag::ReduceAnd);
        let keep = handle_reduce_and(&mut m, &cell, &cfg).unwrap();
        assert!(keep);
    }

    #[test]
    fn reduce_xor_is_the_or_reduce_of_the_input_taint() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let cell = wired_unary(&mut m, CellTag::ReduceXor);
        let keep = handle_reduce_xor(&mut m, &cell, &cfg).unwrap();
        assert!(keep);
    }
}
