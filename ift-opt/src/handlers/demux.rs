//! DEMUX (spec.md §4.3): dual of BMUX. A single `A` drives one of
//! `2^s_width` output slices, selected by `S`.

use crate::config::Config;
use crate::ext::{bit_and, bit_not, bit_or, broadcast, or_reduce};
use crate::taint::taint_of;
use ift_ir::{Builder, Cell, CellTag, Module, RRC, Signal};
use ift_utils::{Error, IftResult};

pub fn handle_demux(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (a, s, a_width, s_width) = {
        let c = cell.borrow();
        (c.port("A").clone(), c.port("S").clone(), c.params.a_width.unwrap_or(0), c.params.s_width.unwrap_or(0))
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
        let mut per_branch_taint = Vec::with_capacity(branches as usize);
        {
            let mut bd = Builder::new(module);
            let not_st = bit_not(&mut bd, "ift_demux_t", st.clone());
            let masked_s = bit_and(&mut bd, "ift_demux_t", s.clone(), not_st.clone());
            let any_s_tainted = or_reduce(&mut bd, "ift_demux_t", st.clone());

            for v in 0..branches {
                let v_const = Signal::constant_value(v, s_width);
                let eq_true = bd
                    .add_binary("ift_demux_eq", CellTag::Eq, s.clone(), v_const.clone(), false, false, 1)
                    .borrow()
                    .port("Y")
                    .clone();
                let v_masked = bit_and(&mut bd, "ift_demux_t", v_const, not_st.clone());
                let eq_masked = bd
                    .add_binary("ift_demux_eqm", CellTag::Eq, masked_s.clone(), v_masked, false, false, 1)
                    .borrow()
                    .port("Y")
                    .clone();
                let eq_tainted = bit_and(&mut bd, "ift_demux_t", eq_masked, any_s_tainted.clone());

                let implicit = bit_and(&mut bd, "ift_demux_t", broadcast(&eq_tainted, a_width), at.clone());
                let indicator = bit_or(&mut bd, "ift_demux_t", eq_true, eq_tainted);
                let explicit = bit_and(&mut bd, "ift_demux_t", broadcast(&indicator, a_width), at.clone());
                let branch_t = bit_or(&mut bd, "ift_demux_t", implicit, explicit);
                per_branch_taint.push(branch_t);
            }
        }
        let out_t = per_branch_taint
            .into_iter()
            .fold(Signal::empty(), |acc, slice| acc.concat(&slice));
        debug_assert_eq!(out_t.len(), a_width * branches);
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
    fn demux_taints_every_reachable_output_slice() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let a = m.add_wire("a", 4, WireRole::Input).unwrap();
        let s = m.add_wire("s", 2, WireRole::Input).unwrap();
        m.add_wire("a_t0", 4, WireRole::Internal).unwrap();
        m.add_wire("s_t0", 2, WireRole::Internal).unwrap();
        let cell = {
            let mut bd = Builder::new(&mut m);
            bd.add_demux("demux0", Signal::whole_wire(&a), Signal::whole_wire(&s))
        };
        let connections_before = m.connections().len();
        let keep = handle_demux(&mut m, &cell, &cfg).unwrap();
        assert!(keep);
        assert!(m.connections().len() > connections_before);
        let y = cell.borrow().port("Y").clone();
        assert_eq!(y.len(), 16);
    }
}
