//! BMUX (spec.md §4.3): array-like select. `S` is `s_width` bits, `A` is
//! `y_width * 2^s_width` bits, sliced into `2^s_width` candidate branches.
//! Enumerates every candidate index `v` -- bounded by `2^s_width`, the same
//! caveat as the PMUX/shift precise handlers' corner enumeration.

use crate::config::Config;
use crate::ext::{bit_and, bit_not, bit_or, bit_xor, broadcast, or_reduce};
use crate::taint::taint_of;
use ift_ir::{BitState, Builder, Cell, CellTag, Module, RRC, Signal};
use ift_utils::{Error, IftResult};

pub fn handle_bmux(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (a, s, y_width, s_width) = {
        let c = cell.borrow();
        (c.port("A").clone(), c.port("S").clone(), c.params.y_width, c.params.s_width.unwrap_or(0))
    };
    if s.len() != s_width {
        return Err(Error::port_parameter_mismatch(
            module.name(),
            cell.borrow().name(),
            "S port width disagrees with S_WIDTH",
        ));
    }
    let branches = 1u64 << s_width;

    for k in 0..cfg.num_labels {
        let at = taint_of(module, &a, k, cfg)?;
        let st = taint_of(module, &s, k, cfg)?;
        let out_t = {
            let mut bd = Builder::new(module);
            let not_st = bit_not(&mut bd, "ift_bmux_t", st.clone());
            let masked_s = bit_and(&mut bd, "ift_bmux_t", s.clone(), not_st.clone());
            let any_s_tainted = or_reduce(&mut bd, "ift_bmux_t", st.clone());

            let mut reachable = Vec::with_capacity(branches as usize);
            for v in 0..branches {
                let v_const = Signal::constant_value(v, s_width);
                let eq_true = bd
                    .add_binary("ift_bmux_eq", CellTag::Eq, s.clone(), v_const.clone(), false, false, 1)
                    .borrow()
                    .port("Y")
                    .clone();
                let v_masked = bit_and(&mut bd, "ift_bmux_t", v_const, not_st.clone());
                let eq_masked = bd
                    .add_binary("ift_bmux_eqm", CellTag::Eq, masked_s.clone(), v_masked, false, false, 1)
                    .borrow()
                    .port("Y")
                    .clone();
                let eq_tainted = bit_and(&mut bd, "ift_bmux_t", eq_masked, any_s_tainted.clone());
                let indicator = bit_or(&mut bd, "ift_bmux_t", eq_true, eq_tainted);
                reachable.push(indicator);
            }

            let mut acc = Signal::constant_repeat(BitState::S0, y_width);
            for v in 0..branches {
                let slice_a = at.slice(v * y_width, (v + 1) * y_width);
                let ind_b = broadcast(&reachable[v as usize], y_width);
                let explicit = bit_and(&mut bd, "ift_bmux_t", ind_b, slice_a);
                acc = bit_or(&mut bd, "ift_bmux_t", acc, explicit);
                let slice_data = a.slice(v * y_width, (v + 1) * y_width);
                for w in (v + 1)..branches {
                    let both = bit_and(&mut bd, "ift_bmux_t", reachable[v as usize].clone(), reachable[w as usize].clone());
                    let both_b = broadcast(&both, y_width);
                    let other_data = a.slice(w * y_width, (w + 1) * y_width);
                    let disagree = bit_xor(&mut bd, "ift_bmux_t", slice_data.clone(), other_data);
                    let implicit = bit_and(&mut bd, "ift_bmux_t", both_b, disagree);
                    acc = bit_or(&mut bd, "ift_bmux_t", acc, implicit);
                }
            }
            acc
        };
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
    fn bmux_taints_every_reachable_branch() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let a = m.add_wire("a", 8, WireRole::Input).unwrap();
        let s = m.add_wire("s", 2, WireRole::Input).unwrap();
        m.add_wire("a_t0", 8, WireRole::Internal).unwrap();
        m.add_wire("s_t0", 2, WireRole::Internal).unwrap();
        let cell = {
            let mut bd = Builder::new(&mut m);
            bd.add_bmux("bmux0", Signal::whole_wire(&a), Signal::whole_wire(&s), 2)
        };
        let connections_before = m.connections().len();
        let keep = handle_bmux(&mut m, &cell, &cfg).unwrap();
        assert!(keep);
        assert!(m.connections().len() > connections_before);
    }

    #[test]
    fn s_width_mismatch_is_rejected() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let a = m.add_wire("a", 8, WireRole::Input).unwrap();
        let s = m.add_wire("s", 2, WireRole::Input).unwrap();
        let mut cell = ift_ir::Cell::new(
            "bmux1".into(),
            ift_ir::CellType::Primitive(CellTag::Bmux),
            {
                let mut p = ift_ir::Parameters::with_y_width(2);
                p.a_width = Some(8);
                p.s_width = Some(3);
                p
            },
        );
        cell.connect("A", Signal::whole_wire(&a));
        cell.connect("S", Signal::whole_wire(&s));
        cell.connect("Y", Signal::empty());
        let cell = ift_ir::rrc(cell);
        let err = handle_bmux(&mut m, &cell, &cfg).unwrap_err();
        assert!(err.message().contains("S_WIDTH"));
    }
}
