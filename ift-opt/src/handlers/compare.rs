//! EQ, NE, GE, GT, LE, LT (spec.md §4.3).

use crate::config::Config;
use crate::ext::{and_reduce, bit_and, bit_not, bit_or, bit_xor, or_reduce, zero_extend};
use crate::handlers::conjunctive;
use crate::taint::taint_of;
use ift_ir::{Builder, Cell, CellTag, Module, RRC, Signal};
use ift_utils::IftResult;

fn binary_io(cell: &RRC<Cell>) -> (Signal, Signal, u64, bool, bool, CellTag) {
    let c = cell.borrow();
    (
        c.port("A").clone(),
        c.port("B").clone(),
        c.params.y_width,
        c.params.a_signed,
        c.params.b_signed,
        c.prototype.tag(),
    )
}

/// `out_t[0] = OR-reduce(At|Bt) & (masked_A == masked_B)`, where
/// `masked_X = X & ~(At|Bt)`. Upper output bits are constant 0.
pub fn handle_eq_ne(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    if cfg.conjunctive.eq_ne {
        return conjunctive::handle_two_input(module, cell, cfg);
    }
    let (a, b, y_width, a_signed, b_signed, _tag) = binary_io(cell);
    let target = a.len().max(b.len());
    for k in 0..cfg.num_labels {
        let at = taint_of(module, &a, k, cfg)?;
        let bt = taint_of(module, &b, k, cfg)?;
        let (a_h, at_h) = crate::ext::harmonize(&a, &at, a_signed, target);
        let (b_h, bt_h) = crate::ext::harmonize(&b, &bt, b_signed, target);
        let bit0 = {
            let mut bd = Builder::new(module);
            let taint_union = bit_or(&mut bd, "ift_eqne_t", at_h, bt_h);
            let taint_reduced = or_reduce(&mut bd, "ift_eqne_t", taint_union.clone());
            let not_mask = bit_not(&mut bd, "ift_eqne_t", taint_union);
            let masked_a = bit_and(&mut bd, "ift_eqne_t", a_h, not_mask.clone());
            let masked_b = bit_and(&mut bd, "ift_eqne_t", b_h, not_mask);
            let diff = bit_xor(&mut bd, "ift_eqne_t", masked_a, masked_b);
            let same_bits = bit_not(&mut bd, "ift_eqne_t", diff);
            let eq = and_reduce(&mut bd, "ift_eqne_t", same_bits);
            bit_and(&mut bd, "ift_eqne_t", taint_reduced, eq)
        };
        let out_t = zero_extend(&bit0, y_width);
        let y = cell.borrow().port("Y").clone();
        let y_taint = taint_of(module, &y, k, cfg)?;
        module.connect(y_taint, out_t)?;
    }
    Ok(true)
}

/// `min-x = x & ~xt` and `max-x = x | xt`, except on the sign bit of a
/// signed operand, where the roles are reversed: the minimal signed value
/// sets the sign bit high (via the `max` rule) while holding the magnitude
/// bits low, and vice versa for the maximal value (spec.md §4.3, "GE, GT,
/// LE, LT": "Signed min/max puts the sign bit on the opposite corner from
/// unsigned min/max").
fn corner(b: &mut Builder, prefix: &str, x: Signal, xt: Signal, signed: bool, want_min: bool) -> Signal {
    let width = x.len();
    if width <= 1 {
        return apply_rule(b, prefix, x, xt, want_min);
    }
    let lsbs_x = x.slice(0, width - 1);
    let lsbs_xt = xt.slice(0, width - 1);
    let msb_x = x.bit_signal(width - 1);
    let msb_xt = xt.bit_signal(width - 1);
    let lsbs = apply_rule(b, prefix, lsbs_x, lsbs_xt, want_min);
    let msb_rule = if signed { !want_min } else { want_min };
    let msb = apply_rule(b, prefix, msb_x, msb_xt, msb_rule);
    lsbs.concat(&msb)
}

fn apply_rule(b: &mut Builder, prefix: &str, x: Signal, xt: Signal, want_min: bool) -> Signal {
    if want_min {
        let not_t = bit_not(b, prefix, xt);
        bit_and(b, prefix, x, not_t)
    } else {
        bit_or(b, prefix, x, xt)
    }
}

/// Rebuild the comparison gate at both bounding corners and XOR the two
/// one-bit results into bit 0 (spec.md §4.3, "GE, GT, LE, LT").
pub fn handle_magnitude(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (a, b, y_width, a_signed, b_signed, tag) = binary_io(cell);
    let conjunctive_wanted = match tag {
        CellTag::Ge => cfg.conjunctive.ge,
        CellTag::Gt => cfg.conjunctive.gt,
        CellTag::Le => cfg.conjunctive.le,
        CellTag::Lt => cfg.conjunctive.lt,
        _ => unreachable!("handle_magnitude dispatched for a non-magnitude-comparison cell"),
    };
    if conjunctive_wanted {
        return conjunctive::handle_two_input(module, cell, cfg);
    }
    let target = a.len().max(b.len());
    for k in 0..cfg.num_labels {
        let at = taint_of(module, &a, k, cfg)?;
        let bt = taint_of(module, &b, k, cfg)?;
        let (a_h, at_h) = crate::ext::harmonize(&a, &at, a_signed, target);
        let (b_h, bt_h) = crate::ext::harmonize(&b, &bt, b_signed, target);
        let bit0 = {
            let mut bd = Builder::new(module);
            let min_a = corner(&mut bd, "ift_cmp", a_h.clone(), at_h.clone(), a_signed, true);
            let max_a = corner(&mut bd, "ift_cmp", a_h, at_h, a_signed, false);
            let min_b = corner(&mut bd, "ift_cmp", b_h.clone(), bt_h.clone(), b_signed, true);
            let max_b = corner(&mut bd, "ift_cmp", b_h, bt_h, b_signed, false);
            let corner1 = bd
                .add_binary("ift_cmp_lo", tag, min_a, max_b, a_signed, b_signed, 1)
                .borrow()
                .port("Y")
                .clone();
            let corner2 = bd
                .add_binary("ift_cmp_hi", tag, max_a, min_b, a_signed, b_signed, 1)
                .borrow()
                .port("Y")
                .clone();
            bit_xor(&mut bd, "ift_cmp_t", corner1, corner2)
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

    /// spec.md §8 scenario 3: A=0b111/At=0b001, B=0b110/Bt=0b000 -> Yt=1.
    #[test]
    fn eq_scenario_from_spec_wires_a_connection() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let a = m.add_wire("a", 3, WireRole::Internal).unwrap();
        let b = m.add_wire("b", 3, WireRole::Internal).unwrap();
        m.add_wire("a_t0", 3, WireRole::Internal).unwrap();
        m.add_wire("b_t0", 3, WireRole::Internal).unwrap();
        let cell = {
            let mut bd = Builder::new(&mut m);
            bd.add_binary(
                "eq0",
                CellTag::Eq,
                Signal::whole_wire(&a),
                Signal::whole_wire(&b),
                false,
                false,
                1,
            )
        };
        handle_eq_ne(&mut m, &cell, &cfg).unwrap();
        let y = cell.borrow().port("Y").clone();
        assert_eq!(y.len(), 1);
        assert!(!m.connections().is_empty());
    }
}
