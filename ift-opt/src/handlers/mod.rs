//! Per-cell-family taint-propagation handlers (spec.md §4.3). Each handler
//! is dispatched from [`crate::dispatch::dispatch`] against a fixed
//! `CellTag -> handler` table (spec.md §9, "Cell-type dispatch").
//!
//! Every handler has the same shape: for each of `Config::num_labels`
//! taint labels, resolve the input taint signals (`crate::taint::taint_of`),
//! harmonize to the working width (`crate::ext::harmonize`), emit shadow
//! logic through a scoped [`ift_ir::Builder`], and connect the result to the
//! cell's output taint wire. The return value is `keep_original_cell`,
//! exactly as specified in §4.3.

pub mod arithmetic;
pub mod bitwise;
pub mod bmux;
pub mod compare;
pub mod conjunctive;
pub mod demux;
pub mod ff;
pub mod latch;
pub mod logic;
pub mod modulo;
pub mod mux;
pub mod pmux;
pub mod reduce;
pub mod shift;
pub mod shiftx;
pub mod stateless;
pub mod submodule;

pub(crate) fn cell_io(
    cell: &ift_ir::RRC<ift_ir::Cell>,
) -> (ift_ir::Signal, u64, bool) {
    let c = cell.borrow();
    (c.port("A").clone(), c.params.y_width, c.params.a_signed)
}
