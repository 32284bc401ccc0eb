//! PMUX: one-hot priority multiplexer (spec.md §4.3). Three variants are
//! selectable via `Config`:
//! - small-cell / large-cell (one-hot assumed): differ only in how the
//!   pairwise cross-slice terms are folded together -- this `Signal`/
//!   `Builder` abstraction has no true wide-fan-in gate, so "large-cell"
//!   here groups terms three at a time (`bit_or3`) instead of two at a time,
//!   which is the closest honest analogue of "wide fans instead of
//!   pairwise reduction" available in this IR (documented in DESIGN.md).
//! - precise, no-one-hot-assumption: walks select bits in priority order.

use crate::config::Config;
use crate::ext::{bit_and, bit_and3, bit_not, bit_or, bit_or3, bit_xor, broadcast};
use crate::handlers::conjunctive;
use crate::taint::taint_of;
use ift_ir::{BitState, Builder, Cell, CellTag, Module, RRC, Signal};
use ift_utils::{Error, IftResult};

struct PmuxIo {
    a: Signal,
    b: Signal,
    s: Signal,
    y_width: u64,
    s_width: u64,
}

fn io(cell: &RRC<Cell>) -> PmuxIo {
    let c = cell.borrow();
    PmuxIo {
        a: c.port("A").clone(),
        b: c.port("B").clone(),
        s: c.port("S").clone(),
        y_width: c.params.y_width,
        s_width: c.params.s_width.unwrap_or(0),
    }
}

pub fn handle_pmux(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    if cfg.conjunctive.pmux {
        return conjunctive::handle_three_input(module, cell, cfg);
    }
    let pio = io(cell);
    if pio.s.len() != pio.s_width {
        return Err(Error::port_parameter_mismatch(
            module.name(),
            cell.borrow().name(),
            format!(
                "S port width {} disagrees with S_WIDTH parameter {}",
                pio.s.len(),
                pio.s_width
            ),
        ));
    }
    for k in 0..cfg.num_labels {
        let at = taint_of(module, &pio.a, k, cfg)?;
        let bt = taint_of(module, &pio.b, k, cfg)?;
        let st = taint_of(module, &pio.s, k, cfg)?;
        let out_t = if cfg.pmux_precise_no_onehot {
            precise_no_onehot(module, &pio, &at, &bt, &st)
        } else {
            one_hot_variant(module, &pio, &at, &bt, &st, cfg.pmux_large_cells)
        };
        let y = cell.borrow().port("Y").clone();
        let y_taint = taint_of(module, &y, k, cfg)?;
        module.connect(y_taint, out_t)?;
    }
    Ok(true)
}

fn slice_b(pio: &PmuxIo, i: u64) -> Signal {
    pio.b.slice(i * pio.y_width, (i + 1) * pio.y_width)
}

fn slice_bt(bt: &Signal, y_width: u64, i: u64) -> Signal {
    bt.slice(i * y_width, (i + 1) * y_width)
}

fn one_hot_variant(
    module: &mut Module,
    pio: &PmuxIo,
    at: &Signal,
    bt: &Signal,
    st: &Signal,
    large_cells: bool,
) -> Signal {
    let mut bd = Builder::new(module);
    let y_width = pio.y_width;

    let mut none_selected = Signal::constant_value(1, 1);
    for i in 0..pio.s_width {
        let si = pio.s.bit_signal(i);
        let sti = st.bit_signal(i);
        let not_si = bit_not(&mut bd, "ift_pmux_t", si);
        let not_sti = bit_not(&mut bd, "ift_pmux_t", sti);
        let none_i = bit_and(&mut bd, "ift_pmux_t", not_si, not_sti);
        none_selected = bit_and(&mut bd, "ift_pmux_t", none_selected, none_i);
    }
    let sel_taint_any = crate::ext::or_reduce(&mut bd, "ift_pmux_t", st.clone());

    let mut gated_terms = Vec::with_capacity(pio.s_width as usize);
    let mut term_ii = Signal::constant_repeat(BitState::S0, y_width);
    for i in 0..pio.s_width {
        let si = pio.s.bit_signal(i);
        let sti = st.bit_signal(i);
        let si_or_sti = broadcast(&bit_or(&mut bd, "ift_pmux_t", si, sti), y_width);
        let gated = bit_and(&mut bd, "ift_pmux_t", si_or_sti.clone(), slice_bt(bt, y_width, i));
        gated_terms.push(gated);

        for kk in (i + 1)..pio.s_width {
            let sk = pio.s.bit_signal(kk);
            let stk = st.bit_signal(kk);
            let sk_or_stk = broadcast(&bit_or(&mut bd, "ift_pmux_t", sk, stk), y_width);
            let both = bit_and(&mut bd, "ift_pmux_t", si_or_sti.clone(), sk_or_stk);
            let disagree = bit_xor(&mut bd, "ift_pmux_t", slice_b(pio, i), slice_b(pio, kk));
            let pen = bit_and(&mut bd, "ift_pmux_t", both, disagree);
            term_ii = bit_or(&mut bd, "ift_pmux_t", term_ii, pen);
        }
    }
    let term_i = if large_cells {
        fold_or3(&mut bd, gated_terms, y_width)
    } else {
        fold_or(&mut bd, gated_terms, y_width)
    };

    let none_b = broadcast(&none_selected, y_width);
    let selt_any_b = broadcast(&sel_taint_any, y_width);
    let mut a_vs_b = Signal::constant_repeat(BitState::S0, y_width);
    for i in 0..pio.s_width {
        let axorbi = bit_xor(&mut bd, "ift_pmux_t", pio.a.clone(), slice_b(pio, i));
        a_vs_b = bit_or(&mut bd, "ift_pmux_t", a_vs_b, axorbi);
    }
    let term_iii = bit_and3(&mut bd, "ift_pmux_t", none_b.clone(), selt_any_b, a_vs_b);
    let term_iv = bit_and(&mut bd, "ift_pmux_t", none_b, at.clone());

    let acc = bit_or3(&mut bd, "ift_pmux_t", term_i, term_ii, term_iii);
    bit_or(&mut bd, "ift_pmux_t", acc, term_iv)
}

/// Small-cell fold: pairwise `bit_or` reduction.
fn fold_or(bd: &mut Builder, terms: Vec<Signal>, y_width: u64) -> Signal {
    let mut acc = Signal::constant_repeat(BitState::S0, y_width);
    for term in terms {
        acc = bit_or(bd, "ift_pmux_t", acc, term);
    }
    acc
}

/// Large-cell fold: groups terms three at a time via `bit_or3` instead of
/// pairwise, the closest honest analogue this IR's binary-only `Builder`
/// has to a wide-fan-in OR gate (see DESIGN.md).
fn fold_or3(bd: &mut Builder, terms: Vec<Signal>, y_width: u64) -> Signal {
    let zero = Signal::constant_repeat(BitState::S0, y_width);
    let chunk_results: Vec<Signal> = terms
        .chunks(3)
        .map(|chunk| match chunk {
            [x, y, z] => bit_or3(bd, "ift_pmux_t", x.clone(), y.clone(), z.clone()),
            [x, y] => bit_or(bd, "ift_pmux_t", x.clone(), y.clone()),
            [x] => x.clone(),
            _ => zero.clone(),
        })
        .collect();
    fold_or(bd, chunk_results, y_width)
}

/// Walk select bits in priority order: bit `i` is the effective selector iff
/// every lower bit is zero-or-tainted and bit `i` itself is (possibly) set.
fn precise_no_onehot(module: &mut Module, pio: &PmuxIo, at: &Signal, bt: &Signal, st: &Signal) -> Signal {
    let mut bd = Builder::new(module);
    let y_width = pio.y_width;

    let mut lower_ok = Signal::constant_value(1, 1);
    let mut candidates = Vec::with_capacity(pio.s_width as usize);
    for i in 0..pio.s_width {
        let si = pio.s.bit_signal(i);
        let sti = st.bit_signal(i);
        let si_or_sti = bit_or(&mut bd, "ift_pmux_pr_t", si.clone(), sti.clone());
        let candidate_i = bit_and(&mut bd, "ift_pmux_pr_t", lower_ok.clone(), si_or_sti);
        candidates.push(candidate_i);
        let not_si = bit_not(&mut bd, "ift_pmux_pr_t", si);
        let not_si_or_sti = bit_or(&mut bd, "ift_pmux_pr_t", not_si, sti);
        lower_ok = bit_and(&mut bd, "ift_pmux_pr_t", lower_ok, not_si_or_sti);
    }
    let none_candidate = lower_ok;

    let mut acc = Signal::constant_repeat(BitState::S0, y_width);
    for i in 0..pio.s_width {
        let cand_b = broadcast(&candidates[i as usize], y_width);
        let explicit = bit_and(&mut bd, "ift_pmux_pr_t", cand_b.clone(), slice_bt(bt, y_width, i));
        acc = bit_or(&mut bd, "ift_pmux_pr_t", acc, explicit);
        for kk in (i + 1)..pio.s_width {
            let disagree = bit_xor(&mut bd, "ift_pmux_pr_t", slice_b(pio, i), slice_b(pio, kk));
            let both_cand = bit_and(&mut bd, "ift_pmux_pr_t", cand_b.clone(), broadcast(&candidates[kk as usize], y_width));
            let pen = bit_and(&mut bd, "ift_pmux_pr_t", both_cand, disagree);
            acc = bit_or(&mut bd, "ift_pmux_pr_t", acc, pen);
        }
    }

    let none_b = broadcast(&none_candidate, y_width);
    let a_fallback = bit_and(&mut bd, "ift_pmux_pr_t", none_b.clone(), at.clone());
    acc = bit_or(&mut bd, "ift_pmux_pr_t", acc, a_fallback);
    for i in 0..pio.s_width {
        let cand_b = broadcast(&candidates[i as usize], y_width);
        let axorbi = bit_xor(&mut bd, "ift_pmux_pr_t", pio.a.clone(), slice_b(pio, i));
        let pen = bit_and3(&mut bd, "ift_pmux_pr_t", none_b.clone(), cand_b, axorbi);
        acc = bit_or(&mut bd, "ift_pmux_pr_t", acc, pen);
    }
    acc
}

#[cfg(test)]
mod tests {
    use super::*;
    use ift_ir::WireRole;

    fn wired_pmux(m: &mut Module) -> RRC<Cell> {
        let a = m.add_wire("a", 4, WireRole::Input).unwrap();
        let b = m.add_wire("b", 8, WireRole::Input).unwrap();
        let s = m.add_wire("s", 2, WireRole::Input).unwrap();
        m.add_wire("a_t0", 4, WireRole::Internal).unwrap();
        m.add_wire("b_t0", 8, WireRole::Internal).unwrap();
        m.add_wire("s_t0", 2, WireRole::Internal).unwrap();
        let mut bd = Builder::new(m);
        bd.add_pmux("pmux0", Signal::whole_wire(&a), Signal::whole_wire(&b), Signal::whole_wire(&s), 4)
    }

    #[test]
    fn one_hot_small_cell_variant_by_default() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let cell = wired_pmux(&mut m);
        let connections_before = m.connections().len();
        let keep = handle_pmux(&mut m, &cell, &cfg).unwrap();
        assert!(keep);
        assert!(m.connections().len() > connections_before);
    }

    #[test]
    fn large_cell_variant_groups_terms_three_at_a_time() {
        let mut m = Module::new("m".into());
        let mut cfg = Config::default();
        cfg.pmux_large_cells = true;
        let cell = wired_pmux(&mut m);
        let keep = handle_pmux(&mut m, &cell, &cfg).unwrap();
        assert!(keep);
    }

    /// `pmux_large_cells` must not pad every iteration of the per-bit fold
    /// with an extra OR'd-with-zero gate -- it only regroups the same OR
    /// reduction into threes, so for an equal number of select bits it
    /// should synthesize exactly as many `Or` cells as the small-cell fold,
    /// never more.
    #[test]
    fn large_cell_fold_does_not_synthesize_extra_gates() {
        let small_count = {
            let mut m = Module::new("m".into());
            let cell = wired_pmux(&mut m);
            handle_pmux(&mut m, &cell, &Config::default()).unwrap();
            m.cells().filter(|c| c.borrow().prototype.tag() == CellTag::Or).count()
        };
        let large_count = {
            let mut m = Module::new("m".into());
            let cell = wired_pmux(&mut m);
            let mut cfg = Config::default();
            cfg.pmux_large_cells = true;
            handle_pmux(&mut m, &cell, &cfg).unwrap();
            m.cells().filter(|c| c.borrow().prototype.tag() == CellTag::Or).count()
        };
        assert_eq!(small_count, large_count);
    }

    #[test]
    fn precise_no_onehot_variant() {
        let mut m = Module::new("m".into());
        let mut cfg = Config::default();
        cfg.pmux_precise_no_onehot = true;
        let cell = wired_pmux(&mut m);
        let keep = handle_pmux(&mut m, &cell, &cfg).unwrap();
        assert!(keep);
    }

    #[test]
    fn s_width_mismatch_is_rejected() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let a = m.add_wire("a", 4, WireRole::Input).unwrap();
        let b = m.add_wire("b", 8, WireRole::Input).unwrap();
        let s = m.add_wire("s", 2, WireRole::Input).unwrap();
        let mut cell = ift_ir::Cell::new(
            "pmux1".into(),
            ift_ir::CellType::Primitive(ift_ir::CellTag::Pmux),
            {
                let mut p = ift_ir::Parameters::with_y_width(4);
                p.a_width = Some(4);
                p.b_width = Some(8);
                p.s_width = Some(3);
                p
            },
        );
        cell.connect("A", Signal::whole_wire(&a));
        cell.connect("B", Signal::whole_wire(&b));
        cell.connect("S", Signal::whole_wire(&s));
        cell.connect("Y", Signal::empty());
        let cell = ift_ir::rrc(cell);
        let err = handle_pmux(&mut m, &cell, &cfg).unwrap_err();
        assert!(err.message().contains("S_WIDTH"));
    }
}
