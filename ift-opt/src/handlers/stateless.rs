//! NOT, BUF, positive: output taint equals input taint, bit-parallel
//! (spec.md §4.3, "Stateless-cell handlers").

use crate::config::Config;
use crate::taint::taint_of;
use ift_ir::{Cell, RRC, Module};
use ift_utils::IftResult;

pub fn handle_passthrough(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (a, y) = {
        let c = cell.borrow();
        (c.port("A").clone(), c.port("Y").clone())
    };
    for k in 0..cfg.num_labels {
        let at = taint_of(module, &a, k, cfg)?;
        let at = crate::ext::zero_extend(&at, y.len()).truncate(y.len());
        let y_taint = taint_of(module, &y, k, cfg)?;
        module.connect(y_taint, at)?;
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ift_ir::{Builder, CellTag, Parameters, Signal, WireRole};

    #[test]
    fn not_passes_taint_through_unchanged() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let a = m.add_wire("a", 2, WireRole::Input).unwrap();
        let mut b = Builder::new(&mut m);
        let cell = b.add_unary("n", CellTag::Not, Signal::whole_wire(&a), false, 2);
        drop(b);
        handle_passthrough(&mut m, &cell, &cfg).unwrap();
        let y = cell.borrow().port("Y").clone();
        let yt = taint_of(&mut m, &y, 0, &cfg).unwrap();
        let at = taint_of(&mut m, &Signal::whole_wire(&a), 0, &cfg).unwrap();
        // Both taint signals should reference the same underlying bits once
        // the connection is resolved; here we just check widths line up,
        // since the connection itself (not a direct alias) carries the
        // equality at simulation time.
        assert_eq!(yt.len(), at.len());
        let _ = Parameters::default();
    }
}
