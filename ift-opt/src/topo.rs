//! Leaves-first visiting order over the module instantiation graph
//! (spec.md §4.5, §9 "Module graph"): a module that instantiates another via
//! a `Submodule` cell must be instrumented only after that submodule has
//! been, so the submodule's taint ports already exist when the parent's
//! `submodule`-cell handler resolves them.
//!
//! Represented as a `petgraph` DAG, exactly as the Design Notes suggest
//! ("use Kahn's algorithm for the topological order ... avoid cycles by
//! rejecting any back-edge"); the teacher already depends on `petgraph` in
//! both `calyx-ir` and `calyx-opt`, so this reuses it rather than
//! hand-rolling graph code.

use ift_ir::Design;
use ift_utils::{Error, Id, IftResult};
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use std::collections::HashMap;

/// Compute a reverse-topological (leaves-first) order over `selected`
/// modules of `design`, using the "cell-type references module" edge
/// relation. Fails if instantiation is cyclic (spec.md §7, "Recursive
/// module hierarchy"). Edges to modules outside `selected` are ignored --
/// only the relative order among selected modules matters.
pub fn leaves_first_order(design: &Design, selected: &[Id]) -> IftResult<Vec<Id>> {
    if selected.is_empty() {
        return Err(Error::empty_selection());
    }

    let mut graph: DiGraph<Id, ()> = DiGraph::new();
    let mut index_of: HashMap<Id, NodeIndex> = HashMap::new();
    for &name in selected {
        let idx = graph.add_node(name);
        index_of.insert(name, idx);
    }

    // Edge parent -> child ("parent instantiates child"); a reverse
    // topological sort of this graph visits children (leaves) first.
    for &name in selected {
        let module = design.find_module(name)?;
        let parent_idx = index_of[&name];
        for child in module.borrow().submodule_references() {
            if let Some(&child_idx) = index_of.get(&child) {
                graph.add_edge(parent_idx, child_idx, ());
            }
        }
    }

    // `toposort` over `parent -> child` edges visits parents before
    // children; reversing gives leaves (no outgoing edges) first.
    let mut order = toposort(&graph, None).map_err(|cycle| {
        let culprit = graph[cycle.node_id()];
        Error::recursive_hierarchy(vec![culprit])
    })?;
    order.reverse();

    Ok(order.into_iter().map(|idx| graph[idx]).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use ift_ir::{Builder, CellType, Module, Parameters, RRC, Signal};

    fn leaf(name: &str) -> RRC<Module> {
        ift_ir::rrc(Module::new(name.into()))
    }

    #[test]
    fn single_module_orders_trivially() {
        let mut d = Design::new("top".into());
        d.add_module(leaf("top"));
        let order = leaves_first_order(&d, &["top".into()]).unwrap();
        assert_eq!(order, vec![Id::from("top")]);
    }

    #[test]
    fn child_precedes_parent() {
        let mut d = Design::new("top".into());
        let child = leaf("child");
        d.add_module(child);

        let mut parent = Module::new("top".into());
        {
            let mut bd = Builder::new(&mut parent);
            let mut cell = ift_ir::Cell::new(
                "inst0".into(),
                CellType::Submodule { module: "child".into() },
                Parameters::default(),
            );
            cell.connect("dummy", Signal::empty());
            bd.module.add_cell(ift_ir::rrc(cell));
        }
        d.add_module(ift_ir::rrc(parent));

        let order = leaves_first_order(&d, &["top".into(), "child".into()]).unwrap();
        let child_pos = order.iter().position(|&m| m == Id::from("child")).unwrap();
        let top_pos = order.iter().position(|&m| m == Id::from("top")).unwrap();
        assert!(child_pos < top_pos, "child must be instrumented before its parent");
    }

    #[test]
    fn cycle_is_rejected() {
        let mut d = Design::new("a".into());
        let mut a = Module::new("a".into());
        {
            let mut bd = Builder::new(&mut a);
            let mut cell = ift_ir::Cell::new(
                "inst_b".into(),
                CellType::Submodule { module: "b".into() },
                Parameters::default(),
            );
            cell.connect("dummy", Signal::empty());
            bd.module.add_cell(ift_ir::rrc(cell));
        }
        let mut b = Module::new("b".into());
        {
            let mut bd = Builder::new(&mut b);
            let mut cell = ift_ir::Cell::new(
                "inst_a".into(),
                CellType::Submodule { module: "a".into() },
                Parameters::default(),
            );
            cell.connect("dummy", Signal::empty());
            bd.module.add_cell(ift_ir::rrc(cell));
        }
        d.add_module(ift_ir::rrc(a));
        d.add_module(ift_ir::rrc(b));

        let err = leaves_first_order(&d, &["a".into(), "b".into()]).unwrap_err();
        assert!(err.message().contains("recursive"));
    }

    #[test]
    fn empty_selection_is_rejected() {
        let d = Design::new("top".into());
        let err = leaves_first_order(&d, &[]).unwrap_err();
        assert!(err.message().contains("no modules"));
    }
}
