//! DLATCH, ADLATCH, DLATCHSR, SR, DFFSR (spec.md §4.3).

use crate::config::Config;
use crate::taint::taint_of;
use ift_ir::{Builder, Cell, Module, RRC};
use ift_utils::IftResult;

pub fn handle_dlatch(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (en, d, width, en_polarity) = {
        let c = cell.borrow();
        (c.port("EN").clone(), c.port("D").clone(), c.params.y_width, c.params.en_polarity)
    };
    for k in 0..cfg.num_labels {
        let dt = taint_of(module, &d, k, cfg)?;
        let shadow = {
            let mut bd = Builder::new(module);
            bd.add_dlatch("ift_dlatch_t", en.clone(), dt, width, en_polarity)
        };
        let q = cell.borrow().port("Q").clone();
        let q_taint = taint_of(module, &q, k, cfg)?;
        let shadow_q = shadow.borrow().port("Q").clone();
        module.connect(q_taint, shadow_q)?;
    }
    Ok(true)
}

pub fn handle_adlatch(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (en, arst, d, width, en_polarity, arst_polarity) = {
        let c = cell.borrow();
        (
            c.port("EN").clone(),
            c.port("ARST").clone(),
            c.port("D").clone(),
            c.params.y_width,
            c.params.en_polarity,
            c.params.arst_polarity,
        )
    };
    for k in 0..cfg.num_labels {
        let dt = taint_of(module, &d, k, cfg)?;
        let shadow = {
            let mut bd = Builder::new(module);
            bd.add_adlatch("ift_adlatch_t", en.clone(), arst.clone(), dt, width, en_polarity, arst_polarity, 0)
        };
        let q = cell.borrow().port("Q").clone();
        let q_taint = taint_of(module, &q, k, cfg)?;
        let shadow_q = shadow.borrow().port("Q").clone();
        module.connect(q_taint, shadow_q)?;
    }
    Ok(true)
}

pub fn handle_dlatchsr(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (set, clr, en, d, width, en_polarity, set_polarity, clr_polarity) = {
        let c = cell.borrow();
        (
            c.port("SET").clone(),
            c.port("CLR").clone(),
            c.port("EN").clone(),
            c.port("D").clone(),
            c.params.y_width,
            c.params.en_polarity,
            c.params.arst_polarity,
            c.params.srst_polarity,
        )
    };
    for k in 0..cfg.num_labels {
        let dt = taint_of(module, &d, k, cfg)?;
        let shadow = {
            let mut bd = Builder::new(module);
            bd.add_dlatchsr(
                "ift_dlatchsr_t",
                set.clone(),
                clr.clone(),
                en.clone(),
                dt,
                width,
                en_polarity,
                set_polarity,
                clr_polarity,
            )
        };
        let q = cell.borrow().port("Q").clone();
        let q_taint = taint_of(module, &q, k, cfg)?;
        let shadow_q = shadow.borrow().port("Q").clone();
        module.connect(q_taint, shadow_q)?;
    }
    Ok(true)
}

/// SR latch: no data input, so the shadow is just another SR cell driven by
/// the same SET/CLR wires with reset/set value 0. It holds its previous
/// taint whenever neither fires (exactly as the original holds its Q) and
/// collapses to a known constant whenever either fires (exactly as the
/// original collapses to its fixed set/reset value).
pub fn handle_sr(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (set, clr, width, set_polarity, clr_polarity) = {
        let c = cell.borrow();
        (
            c.port("SET").clone(),
            c.port("CLR").clone(),
            c.params.y_width,
            c.params.arst_polarity,
            c.params.srst_polarity,
        )
    };
    for k in 0..cfg.num_labels {
        let shadow = {
            let mut bd = Builder::new(module);
            bd.add_sr("ift_sr_t", set.clone(), clr.clone(), width, set_polarity, clr_polarity)
        };
        let q = cell.borrow().port("Q").clone();
        let q_taint = taint_of(module, &q, k, cfg)?;
        let shadow_q = shadow.borrow().port("Q").clone();
        module.connect(q_taint, shadow_q)?;
    }
    Ok(true)
}

pub fn handle_dffsr(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (clk, set, clr, d, width, clk_polarity, set_polarity, clr_polarity) = {
        let c = cell.borrow();
        (
            c.port("CLK").clone(),
            c.port("SET").clone(),
            c.port("CLR").clone(),
            c.port("D").clone(),
            c.params.y_width,
            c.params.clk_polarity,
            c.params.arst_polarity,
            c.params.srst_polarity,
        )
    };
    for k in 0..cfg.num_labels {
        let dt = taint_of(module, &d, k, cfg)?;
        let shadow = {
            let mut bd = Builder::new(module);
            bd.add_dffsr(
                "ift_dffsr_t",
                clk.clone(),
                set.clone(),
                clr.clone(),
                dt,
                width,
                clk_polarity,
                set_polarity,
                clr_polarity,
            )
        };
        let q = cell.borrow().port("Q").clone();
        let q_taint = taint_of(module, &q, k, cfg)?;
        let shadow_q = shadow.borrow().port("Q").clone();
        module.connect(q_taint, shadow_q)?;
    }
    Ok(true)
}
