//! Cell-type dispatch (spec.md §9, "Cell-type dispatch"): an exhaustive
//! `match` over `CellTag` instead of the chained string comparisons the
//! original tool used, so the compiler flags any newly added variant that
//! lacks a handler.

use crate::config::Config;
use crate::handlers::*;
use ift_ir::{Cell, CellTag, Module, RRC};
use ift_utils::IftResult;

/// Dispatch `cell` to its family's handler. Returns `keep_original_cell`:
/// `false` means the caller should delete the cell after processing (the
/// handler already replaced it with an equivalent, e.g. the RTLIFT adder).
pub fn dispatch(module: &mut Module, cell: &RRC<Cell>, cfg: &Config) -> IftResult<bool> {
    let tag = cell.borrow().prototype.tag();
    match tag {
        CellTag::Not | CellTag::Buf | CellTag::Pos => stateless::handle_passthrough(module, cell, cfg),

        CellTag::And => bitwise::handle_and(module, cell, cfg),
        CellTag::Or => bitwise::handle_or(module, cell, cfg),
        CellTag::Xor | CellTag::Xnor => bitwise::handle_xor_xnor(module, cell, cfg),

        CellTag::Add | CellTag::Sub => arithmetic::handle_add_sub(module, cell, cfg),
        CellTag::Neg => arithmetic::handle_neg(module, cell, cfg),
        CellTag::Mul => arithmetic::handle_mul(module, cell, cfg),
        CellTag::Mod => modulo::handle_mod(module, cell, cfg),

        CellTag::Eq | CellTag::Ne => compare::handle_eq_ne(module, cell, cfg),
        CellTag::Ge | CellTag::Gt | CellTag::Le | CellTag::Lt => compare::handle_magnitude(module, cell, cfg),

        CellTag::LogicAnd | CellTag::LogicOr => logic::handle_logic_and_or(module, cell, cfg),
        CellTag::LogicNot | CellTag::ReduceBool => reduce::handle_logic_not_or_reduce_bool(module, cell, cfg),
        CellTag::ReduceAnd => reduce::handle_reduce_and(module, cell, cfg),
        CellTag::ReduceOr => conjunctive::handle_one_input(module, cell, cfg),
        CellTag::ReduceXor => reduce::handle_reduce_xor(module, cell, cfg),

        CellTag::Shl | CellTag::Sshl | CellTag::Shr | CellTag::Sshr => {
            shift::handle_shift_family(module, cell, cfg)
        }
        CellTag::Shift | CellTag::Shiftx => shiftx::handle_shiftx(module, cell, cfg),

        CellTag::Mux => mux::handle_mux(module, cell, cfg),
        CellTag::Pmux => pmux::handle_pmux(module, cell, cfg),
        CellTag::Bmux => bmux::handle_bmux(module, cell, cfg),
        CellTag::Demux => demux::handle_demux(module, cell, cfg),

        CellTag::Constant => Ok(true),

        CellTag::Dff => ff::handle_dff(module, cell, cfg),
        CellTag::Dffe => ff::handle_dffe(module, cell, cfg),
        CellTag::Adff => ff::handle_adff(module, cell, cfg),
        CellTag::Sdff => ff::handle_sdff(module, cell, cfg),
        CellTag::Aldff => ff::handle_aldff(module, cell, cfg),
        CellTag::Dlatch => latch::handle_dlatch(module, cell, cfg),
        CellTag::Adlatch => latch::handle_adlatch(module, cell, cfg),
        CellTag::DlatchSr => latch::handle_dlatchsr(module, cell, cfg),
        CellTag::Sr => latch::handle_sr(module, cell, cfg),
        CellTag::Dffsr => latch::handle_dffsr(module, cell, cfg),

        CellTag::Submodule => submodule::handle_submodule(module, cell, cfg),
    }
}
