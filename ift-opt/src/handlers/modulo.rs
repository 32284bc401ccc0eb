//! MOD (spec.md §4.3): `out_t = is_b_tainted ? all-ones : mod(At, B)`, with
//! the parameters of the shadow `$mod` replicated from the original cell.

use crate::config::Config;
use crate::ext::{bit_or, broadcast, or_reduce};
use ift_ir::{Builder, Cell, CellTag, Module, RRC};
use ift_utils::IftResult;

pub fn handle_mod(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (a, b, y_width, a_signed, b_signed) = {
        let c = cell.borrow();
        (
            c.port("A").clone(),
            c.port("B").clone(),
            c.params.y_width,
            c.params.a_signed,
            c.params.b_signed,
        )
    };
    for k in 0..cfg.num_labels {
        let at = crate::taint::taint_of(module, &a, k, cfg)?;
        let bt = crate::taint::taint_of(module, &b, k, cfg)?;
        let out_t = {
            let mut bd = Builder::new(module);
            let shadow = bd
                .add_binary("ift_mod", CellTag::Mod, at, b, a_signed, b_signed, y_width)
                .borrow()
                .port("Y")
                .clone();
            let any_b_tainted = or_reduce(&mut bd, "ift_mod_t", bt);
            let all_ones = broadcast(&any_b_tainted, y_width);
            bit_or(&mut bd, "ift_mod_t", shadow, all_ones)
        };
        let y = cell.borrow().port("Y").clone();
        let y_taint = crate::taint::taint_of(module, &y, k, cfg)?;
        module.connect(y_taint, out_t)?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ift_ir::{Signal, WireRole};

    #[test]
    fn mod_taints_all_ones_when_divisor_is_tainted() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let a = m.add_wire("a", 4, WireRole::Input).unwrap();
        let b = m.add_wire("b", 4, WireRole::Input).unwrap();
        m.add_wire("a_t0", 4, WireRole::Internal).unwrap();
        m.add_wire("b_t0", 4, WireRole::Internal).unwrap();
        let cell = {
            let mut bd = Builder::new(&mut m);
            bd.add_binary("mod0", CellTag::Mod, Signal::whole_wire(&a), Signal::whole_wire(&b), false, false, 4)
        };
        let connections_before = m.connections().len();
        let keep = handle_mod(&mut m, &cell, &cfg).unwrap();
        assert!(keep);
        assert!(m.connections().len() > connections_before);
    }
}
