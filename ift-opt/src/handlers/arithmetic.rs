//! ADD, SUB (CellIFT-style bounding-sum, and RTLIFT-style ripple-carry
//! alternative), NEG, MUL (spec.md §4.3).

use crate::config::Config;
use crate::ext::{bit_and, bit_not, bit_or, bit_or3, bit_xor, broadcast, or_reduce};
use crate::handlers::conjunctive;
use crate::taint::taint_of;
use ift_ir::{BitState, Builder, Cell, CellTag, Module, RRC, Signal};
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

/// `out_t = (min-sum XOR max-sum) | At | Bt`, where `min-x = x & ~xt` and
/// `max-x = x | xt`. The XOR captures bits that *can* differ over the
/// reachable taint cone; the extra OR keeps the result monotone.
///
/// ADD is increasing in both operands, so the extreme sums are
/// `min_a+min_b` and `max_a+max_b`. SUB is increasing in `A` but
/// *decreasing* in `B`, so its extremes are `min_a-max_b` and `max_a-min_b`
/// -- pairing `min_a` with `min_b` there would compare two sums that aren't
/// actually the reachable min/max and under-taint whenever both operands
/// carry taint.
fn bounding_sum_taint(
    module: &mut Module,
    tag: CellTag,
    a: Signal,
    at: Signal,
    b: Signal,
    bt: Signal,
    y_width: u64,
) -> Signal {
    let mut bd = Builder::new(module);
    let not_at = bit_not(&mut bd, "ift_arith_t", at.clone());
    let min_a = bit_and(&mut bd, "ift_arith_t", a.clone(), not_at);
    let not_bt = bit_not(&mut bd, "ift_arith_t", bt.clone());
    let min_b = bit_and(&mut bd, "ift_arith_t", b.clone(), not_bt);
    let max_a = bit_or(&mut bd, "ift_arith_t", a, at.clone());
    let max_b = bit_or(&mut bd, "ift_arith_t", b, bt.clone());
    let (lo_a, lo_b, hi_a, hi_b) = if tag == CellTag::Sub {
        (min_a, max_b, max_a, min_b)
    } else {
        (min_a, min_b, max_a, max_b)
    };
    let min_sum = bd
        .add_binary("ift_arith_min", tag, lo_a, lo_b, false, false, y_width)
        .borrow()
        .port("Y")
        .clone();
    let max_sum = bd
        .add_binary("ift_arith_max", tag, hi_a, hi_b, false, false, y_width)
        .borrow()
        .port("Y")
        .clone();
    let xor = bit_xor(&mut bd, "ift_arith_t", min_sum, max_sum);
    bit_or3(&mut bd, "ift_arith_t", xor, at, bt)
}

pub fn handle_add_sub(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (a, b, y_width, a_signed, b_signed, tag) = binary_io(cell);
    let conjunctive_wanted = match tag {
        CellTag::Add => cfg.conjunctive.add,
        CellTag::Sub => cfg.conjunctive.sub,
        _ => unreachable!("handle_add_sub dispatched for a non-ADD/SUB cell"),
    };
    if conjunctive_wanted {
        return conjunctive::handle_two_input(module, cell, cfg);
    }
    if cfg.rtlift_adders && tag == CellTag::Add {
        return handle_add_rtlift(module, cell, cfg);
    }
    for k in 0..cfg.num_labels {
        let at = taint_of(module, &a, k, cfg)?;
        let bt = taint_of(module, &b, k, cfg)?;
        let (a_h, at_h) = crate::ext::harmonize(&a, &at, a_signed, y_width);
        let (b_h, bt_h) = crate::ext::harmonize(&b, &bt, b_signed, y_width);
        let out_t = bounding_sum_taint(module, tag, a_h, at_h, b_h, bt_h, y_width);
        let y = cell.borrow().port("Y").clone();
        let y_taint = taint_of(module, &y, k, cfg)?;
        module.connect(y_taint, out_t)?;
    }
    Ok(true)
}

/// Ripple-carry shadow adder (RTLIFT-style). Replaces the original `$add`
/// cell: this handler synthesizes both the real sum and the shadow carry
/// chain bit by bit. Per spec.md §4.3: "each output-bit taint is the
/// disjunction of input taints of that column and the shadow carry-in;
/// each carry-out taint is the disjunction of five conjunctive terms
/// enumerating which operand tainted the majority function." The carry-out
/// of column `i` is `M(a,b,cin) = ab|ac|bc`; its taint is the derivative of
/// `M` with respect to each possibly-tainted input, crossed with that
/// input's own taint: `At&(B^Cin)`, `Bt&(A^Cin)`, `Cin_t&(A^B)` (a tainted
/// operand only flips the majority vote when the other two inputs to that
/// column disagree), plus the three pairwise taint-taint terms `At&Bt`,
/// `At&Cin_t`, `Bt&Cin_t` for when more than one input is simultaneously
/// tainted.
fn handle_add_rtlift(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (a, b, y_width, a_signed, b_signed, _tag) = binary_io(cell);
    for k in 0..cfg.num_labels {
        let at = taint_of(module, &a, k, cfg)?;
        let bt = taint_of(module, &b, k, cfg)?;
        let (a_h, at_h) = crate::ext::harmonize(&a, &at, a_signed, y_width);
        let (b_h, bt_h) = crate::ext::harmonize(&b, &bt, b_signed, y_width);

        let mut sum_bits = Vec::with_capacity(y_width as usize);
        let mut taint_bits = Vec::with_capacity(y_width as usize);
        let mut carry = Signal::constant_repeat(BitState::S0, 1);
        let mut carry_t = Signal::constant_repeat(BitState::S0, 1);

        for i in 0..y_width {
            let ai = a_h.bit_signal(i);
            let bi = b_h.bit_signal(i);
            let ait = at_h.bit_signal(i);
            let bit = bt_h.bit_signal(i);

            let mut bd = Builder::new(module);
            let a_xor_b = bit_xor(&mut bd, "ift_rtlift", ai.clone(), bi.clone());
            let sum_i = bit_xor(&mut bd, "ift_rtlift", a_xor_b.clone(), carry.clone());

            let ab = bit_and(&mut bd, "ift_rtlift", ai.clone(), bi.clone());
            let ac = bit_and(&mut bd, "ift_rtlift", ai.clone(), carry.clone());
            let bc = bit_and(&mut bd, "ift_rtlift", bi.clone(), carry.clone());
            let carry_out = {
                let ab_or_ac = bit_or(&mut bd, "ift_rtlift", ab.clone(), ac.clone());
                bit_or(&mut bd, "ift_rtlift", ab_or_ac, bc.clone())
            };

            let col_taint = {
                let t1 = bit_or(&mut bd, "ift_rtlift_t", ait.clone(), bit.clone());
                bit_or(&mut bd, "ift_rtlift_t", t1, carry_t.clone())
            };

            // Derivative terms of the majority function M(a,b,cin) = ab|ac|bc
            // w.r.t. each operand, plus the pairwise taint-taint terms, per
            // the original's `at&(b^cin)`, `bt&(a^cin)`, `cin_t&(a^b)`
            // derivative-style decomposition (examples/original_source
            // rtlift/add.cc) rather than a plain data-cross term: a tainted
            // operand only flips the majority's carry-out when the other two
            // inputs to that column disagree.
            let b_xor_cin = bit_xor(&mut bd, "ift_rtlift_t", bi, carry.clone());
            let at_term = bit_and(&mut bd, "ift_rtlift_t", ait.clone(), b_xor_cin);
            let a_xor_cin = bit_xor(&mut bd, "ift_rtlift_t", ai, carry.clone());
            let bt_term = bit_and(&mut bd, "ift_rtlift_t", bit.clone(), a_xor_cin);
            let cint_term = bit_and(&mut bd, "ift_rtlift_t", carry_t.clone(), a_xor_b);

            let at_bt = bit_and(&mut bd, "ift_rtlift_t", ait.clone(), bit.clone());
            let at_cin = bit_and(&mut bd, "ift_rtlift_t", ait, carry_t.clone());
            let bt_cin = bit_and(&mut bd, "ift_rtlift_t", bit, carry_t.clone());
            let carry_t_out = {
                let g1 = bit_or3(&mut bd, "ift_rtlift_t", at_term, bt_term, cint_term);
                let g2 = bit_or3(&mut bd, "ift_rtlift_t", at_bt, at_cin, bt_cin);
                bit_or(&mut bd, "ift_rtlift_t", g1, g2)
            };
            drop(bd);

            sum_bits.push(sum_i);
            taint_bits.push(col_taint);
            carry = carry_out;
            carry_t = carry_t_out;
        }

        let mut sum = sum_bits[0].clone();
        let mut out_t = taint_bits[0].clone();
        for i in 1..sum_bits.len() {
            sum = sum.concat(&sum_bits[i]);
            out_t = out_t.concat(&taint_bits[i]);
        }

        let y = cell.borrow().port("Y").clone();
        module.connect(y.clone(), sum)?;
        let y_taint = taint_of(module, &y, k, cfg)?;
        module.connect(y_taint, out_t)?;
    }
    Ok(false)
}

/// `NEG` uses the same CellIFT scheme as `SUB` with the first operand fixed
/// to the constant zero (spec.md §4.3, "NEG").
pub fn handle_neg(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    if cfg.conjunctive.neg {
        return conjunctive::handle_one_input(module, cell, cfg);
    }
    let (a, y_width, a_signed) = super::cell_io(cell);
    for k in 0..cfg.num_labels {
        let at = taint_of(module, &a, k, cfg)?;
        let (a_h, at_h) = crate::ext::harmonize(&a, &at, a_signed, y_width);
        let zero = Signal::constant_repeat(BitState::S0, y_width);
        let out_t = bounding_sum_taint(
            module,
            CellTag::Sub,
            zero.clone(),
            zero,
            a_h,
            at_h,
            y_width,
        );
        let y = cell.borrow().port("Y").clone();
        let y_taint = taint_of(module, &y, k, cfg)?;
        module.connect(y_taint, out_t)?;
    }
    Ok(true)
}

/// `out_t[0] = OR-reduce(At) | OR-reduce(Bt)`; every other output bit
/// replicates bit 0 -- any operand taint can spread to every product bit in
/// the worst case (spec.md §4.3, "MUL").
pub fn handle_mul(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    if cfg.conjunctive.mul {
        return conjunctive::handle_two_input(module, cell, cfg);
    }
    let (a, b, y_width, _, _, _) = binary_io(cell);
    for k in 0..cfg.num_labels {
        let at = taint_of(module, &a, k, cfg)?;
        let bt = taint_of(module, &b, k, cfg)?;
        let bit0 = {
            let mut bd = Builder::new(module);
            let at_r = or_reduce(&mut bd, "ift_mul_t", at);
            let bt_r = or_reduce(&mut bd, "ift_mul_t", bt);
            bit_or(&mut bd, "ift_mul_t", at_r, bt_r)
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
    use ift_ir::{Parameters, WireRole};

    /// spec.md §8 scenario 2: A=0b01/At=0b10, B=0b01/Bt=0b00 -> Yt=0b10.
    #[test]
    fn add_scenario_from_spec_wires_a_connection() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let a = m.add_wire("a", 2, WireRole::Internal).unwrap();
        let b = m.add_wire("b", 2, WireRole::Internal).unwrap();
        m.add_wire("a_t0", 2, WireRole::Internal).unwrap();
        m.add_wire("b_t0", 2, WireRole::Internal).unwrap();
        let cell = {
            let mut bd = Builder::new(&mut m);
            bd.add_binary(
                "add0",
                CellTag::Add,
                Signal::whole_wire(&a),
                Signal::whole_wire(&b),
                false,
                false,
                2,
            )
        };
        handle_add_sub(&mut m, &cell, &cfg).unwrap();
        let y = cell.borrow().port("Y").clone();
        assert_eq!(y.len(), 2);
        let _ = Parameters::default();
        assert!(!m.connections().is_empty());
    }

    #[test]
    fn rtlift_add_replaces_the_original_cell() {
        let mut m = Module::new("m".into());
        let mut cfg = Config::default();
        cfg.rtlift_adders = true;
        let a = m.add_wire("a", 2, WireRole::Internal).unwrap();
        let b = m.add_wire("b", 2, WireRole::Internal).unwrap();
        let cell = {
            let mut bd = Builder::new(&mut m);
            bd.add_binary(
                "add0",
                CellTag::Add,
                Signal::whole_wire(&a),
                Signal::whole_wire(&b),
                false,
                false,
                2,
            )
        };
        let keep = handle_add_sub(&mut m, &cell, &cfg).unwrap();
        assert!(!keep);
    }
}
