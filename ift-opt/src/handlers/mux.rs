//! 2:1 multiplexer (spec.md §4.3): `Y = S ? B : A`.

use crate::config::Config;
use crate::ext::{bit_and, bit_not, bit_or, bit_xor, broadcast};
use crate::handlers::conjunctive;
use crate::taint::taint_of;
use ift_ir::{Builder, Cell, Module, RRC};
use ift_utils::IftResult;

/// Data-flow taint = `(At & (~S|St)) | (Bt & (S|St))`; control-flow taint =
/// `St & (A XOR B)`. Output taint = data-flow | control-flow.
pub fn handle_mux(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    if cfg.conjunctive.mux {
        return conjunctive::handle_three_input(module, cell, cfg);
    }
    let (a, b, s, y_width, a_signed, b_signed) = {
        let c = cell.borrow();
        (
            c.port("A").clone(),
            c.port("B").clone(),
            c.port("S").clone(),
            c.params.y_width,
            c.params.a_signed,
            c.params.b_signed,
        )
    };
    for k in 0..cfg.num_labels {
        let at = taint_of(module, &a, k, cfg)?;
        let bt = taint_of(module, &b, k, cfg)?;
        let st = taint_of(module, &s, k, cfg)?;
        let (a_h, at_h) = crate::ext::harmonize(&a, &at, a_signed, y_width);
        let (b_h, bt_h) = crate::ext::harmonize(&b, &bt, b_signed, y_width);
        let s_b = broadcast(&s, y_width);
        let st_b = broadcast(&st, y_width);
        let out_t = {
            let mut bd = Builder::new(module);
            let not_s = bit_not(&mut bd, "ift_mux_t", s_b.clone());
            let not_s_or_st = bit_or(&mut bd, "ift_mux_t", not_s, st_b.clone());
            let data_a = bit_and(&mut bd, "ift_mux_t", at_h, not_s_or_st);
            let s_or_st = bit_or(&mut bd, "ift_mux_t", s_b, st_b.clone());
            let data_b = bit_and(&mut bd, "ift_mux_t", bt_h, s_or_st);
            let data_flow = bit_or(&mut bd, "ift_mux_t", data_a, data_b);
            let a_xor_b = bit_xor(&mut bd, "ift_mux_t", a_h, b_h);
            let control_flow = bit_and(&mut bd, "ift_mux_t", st_b, a_xor_b);
            bit_or(&mut bd, "ift_mux_t", data_flow, control_flow)
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
    use ift_ir::{Signal, WireRole};

    /// spec.md §8 scenario 6: A=0, B=1, S=0, St=1, At=Bt=0 -> Yt=1.
    #[test]
    fn mux_scenario_from_spec_wires_a_connection() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let a = m.add_wire("a", 1, WireRole::Internal).unwrap();
        let b = m.add_wire("b", 1, WireRole::Internal).unwrap();
        let s = m.add_wire("s", 1, WireRole::Internal).unwrap();
        m.add_wire("a_t0", 1, WireRole::Internal).unwrap();
        m.add_wire("b_t0", 1, WireRole::Internal).unwrap();
        m.add_wire("s_t0", 1, WireRole::Internal).unwrap();
        let cell = {
            let mut bd = Builder::new(&mut m);
            bd.add_mux(
                "mux0",
                Signal::whole_wire(&a),
                Signal::whole_wire(&b),
                Signal::whole_wire(&s),
                1,
            )
        };
        handle_mux(&mut m, &cell, &cfg).unwrap();
        let y = cell.borrow().port("Y").clone();
        assert_eq!(y.len(), 1);
        assert!(!m.connections().is_empty());
    }
}
