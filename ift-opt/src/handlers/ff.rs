//! Flip-flop family (spec.md §4.3, "Register and latch handlers"): DFF,
//! DFFE, ADFF/SDFF, ALDFF. `CLK`/`ARST`/`SRST` are always excluded control
//! signals -- their own taint never propagates into the shadow state.

use crate::config::Config;
use crate::ext::{bit_and, bit_not, bit_or, bit_xor, broadcast};
use crate::taint::taint_of;
use ift_ir::{Builder, Cell, Module, RRC};
use ift_utils::IftResult;

pub fn handle_dff(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (clk, d, width, clk_polarity) = {
        let c = cell.borrow();
        (c.port("CLK").clone(), c.port("D").clone(), c.params.y_width, c.params.clk_polarity)
    };
    for k in 0..cfg.num_labels {
        let dt = taint_of(module, &d, k, cfg)?;
        let q_taint_wire = {
            let mut bd = Builder::new(module);
            bd.add_dff("ift_dff_t", clk.clone(), dt, width, clk_polarity)
        };
        let q = cell.borrow().port("Q").clone();
        let q_taint = taint_of(module, &q, k, cfg)?;
        let shadow_q = q_taint_wire.borrow().port("Q").clone();
        module.connect(q_taint, shadow_q)?;
    }
    Ok(true)
}

pub fn handle_dffe(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (clk, en, d, q, width, clk_polarity, en_polarity) = {
        let c = cell.borrow();
        (
            c.port("CLK").clone(),
            c.port("EN").clone(),
            c.port("D").clone(),
            c.port("Q").clone(),
            c.params.y_width,
            c.params.clk_polarity,
            c.params.en_polarity,
        )
    };
    for k in 0..cfg.num_labels {
        let dt = taint_of(module, &d, k, cfg)?;
        let qt = taint_of(module, &q, k, cfg)?;
        let et = taint_of(module, &en, k, cfg)?;
        let d_shadow = {
            let mut bd = Builder::new(module);
            let en_b = broadcast(&en, width);
            let et_b = broadcast(&et, width);
            let e_true = if en_polarity { en_b.clone() } else { bit_not(&mut bd, "ift_dffe_t", en_b.clone()) };
            let e_false = if en_polarity { bit_not(&mut bd, "ift_dffe_t", en_b) } else { en_b };

            let d_xor_q = bit_xor(&mut bd, "ift_dffe_t", d.clone(), q.clone());
            let dt_or_qt = bit_or(&mut bd, "ift_dffe_t", dt.clone(), qt.clone());
            let distinct_or_tainted = bit_or(&mut bd, "ift_dffe_t", d_xor_q, dt_or_qt);

            let term1 = bit_and(&mut bd, "ift_dffe_t", e_true, dt);
            let term2 = bit_and(&mut bd, "ift_dffe_t", e_false, qt);
            let term3 = bit_and(&mut bd, "ift_dffe_t", distinct_or_tainted, et_b);
            bit_or(&mut bd, "ift_dffe_t", bit_or(&mut bd, "ift_dffe_t", term1, term2), term3)
        };
        let shadow = {
            let mut bd = Builder::new(module);
            bd.add_dffe("ift_dffe_q", clk.clone(), en.clone(), d_shadow, width, clk_polarity, en_polarity)
        };
        let q_taint = taint_of(module, &q, k, cfg)?;
        let shadow_q = shadow.borrow().port("Q").clone();
        module.connect(q_taint, shadow_q)?;
    }
    Ok(true)
}

pub fn handle_adff(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (clk, arst, d, width, clk_polarity, arst_polarity) = {
        let c = cell.borrow();
        (
            c.port("CLK").clone(),
            c.port("ARST").clone(),
            c.port("D").clone(),
            c.params.y_width,
            c.params.clk_polarity,
            c.params.arst_polarity,
        )
    };
    for k in 0..cfg.num_labels {
        let dt = taint_of(module, &d, k, cfg)?;
        let shadow = {
            let mut bd = Builder::new(module);
            bd.add_adff("ift_adff_t", clk.clone(), arst.clone(), dt, width, clk_polarity, arst_polarity, 0)
        };
        let q = cell.borrow().port("Q").clone();
        let q_taint = taint_of(module, &q, k, cfg)?;
        let shadow_q = shadow.borrow().port("Q").clone();
        module.connect(q_taint, shadow_q)?;
    }
    Ok(true)
}

pub fn handle_sdff(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (clk, srst, d, width, clk_polarity, srst_polarity) = {
        let c = cell.borrow();
        (
            c.port("CLK").clone(),
            c.port("SRST").clone(),
            c.port("D").clone(),
            c.params.y_width,
            c.params.clk_polarity,
            c.params.srst_polarity,
        )
    };
    for k in 0..cfg.num_labels {
        let dt = taint_of(module, &d, k, cfg)?;
        let shadow = {
            let mut bd = Builder::new(module);
            bd.add_sdff("ift_sdff_t", clk.clone(), srst.clone(), dt, width, clk_polarity, srst_polarity, 0)
        };
        let q = cell.borrow().port("Q").clone();
        let q_taint = taint_of(module, &q, k, cfg)?;
        let shadow_q = shadow.borrow().port("Q").clone();
        module.connect(q_taint, shadow_q)?;
    }
    Ok(true)
}

/// ALDFF: the D input to the shadow register is a MUX between `D_taint` and
/// `AD_taint` governed by `ALOAD`, using the same precise MUX formula as
/// `$mux` (spec.md §4.3).
pub fn handle_aldff(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let (clk, aload, ad, d, width, clk_polarity, aload_polarity) = {
        let c = cell.borrow();
        (
            c.port("CLK").clone(),
            c.port("ALOAD").clone(),
            c.port("AD").clone(),
            c.port("D").clone(),
            c.params.y_width,
            c.params.clk_polarity,
            c.params.aload_polarity,
        )
    };
    for k in 0..cfg.num_labels {
        let dt = taint_of(module, &d, k, cfg)?;
        let adt = taint_of(module, &ad, k, cfg)?;
        let alt = taint_of(module, &aload, k, cfg)?;
        let d_shadow = {
            let mut bd = Builder::new(module);
            let s_b = if aload_polarity {
                broadcast(&aload, width)
            } else {
                bit_not(&mut bd, "ift_aldff_t", broadcast(&aload, width))
            };
            let st_b = broadcast(&alt, width);
            let not_s = bit_not(&mut bd, "ift_aldff_t", s_b.clone());
            let not_s_or_st = bit_or(&mut bd, "ift_aldff_t", not_s, st_b.clone());
            let data_d = bit_and(&mut bd, "ift_aldff_t", dt.clone(), not_s_or_st);
            let s_or_st = bit_or(&mut bd, "ift_aldff_t", s_b, st_b.clone());
            let data_ad = bit_and(&mut bd, "ift_aldff_t", adt.clone(), s_or_st);
            let data_flow = bit_or(&mut bd, "ift_aldff_t", data_d, data_ad);
            let d_xor_ad = bit_xor(&mut bd, "ift_aldff_t", d.clone(), ad.clone());
            let control_flow = bit_and(&mut bd, "ift_aldff_t", st_b, d_xor_ad);
            bit_or(&mut bd, "ift_aldff_t", data_flow, control_flow)
        };
        let shadow = {
            let mut bd = Builder::new(module);
            bd.add_aldff("ift_aldff_q", clk.clone(), aload.clone(), ad.clone(), d_shadow, width, clk_polarity, aload_polarity)
        };
        let q = cell.borrow().port("Q").clone();
        let q_taint = taint_of(module, &q, k, cfg)?;
        let shadow_q = shadow.borrow().port("Q").clone();
        module.connect(q_taint, shadow_q)?;
    }
    Ok(true)
}
