//! A module: wires, cells, and wire-to-wire connections, per spec.md §3.

use crate::attribute::{Attributes, GetAttributes};
use crate::common::{rrc, RRC};
use crate::idlist::IdList;
use crate::signal::Signal;
use crate::structure::{Cell, Wire, WireRole};
use ift_utils::{Error, GetName, Id, IftResult, NameGenerator};
use std::collections::HashSet;

/// In-memory representation of one module.
#[derive(Debug)]
pub struct Module {
    name: Id,
    wires: IdList<Wire>,
    cells: IdList<Cell>,
    /// Ordered wire-to-wire connections (both sides always equal length).
    connections: Vec<(Signal, Signal)>,
    pub attributes: Attributes,
    /// Set once `ift_opt::module_instrumenter::instrument_module` has
    /// finished; a second call on an instrumented module is a no-op.
    instrumented: bool,
    /// Ordered port names, refreshed by [`Module::fixup_ports`].
    port_order: Vec<Id>,
    namegen: NameGenerator,
}

impl Module {
    pub fn new(name: Id) -> Self {
        Module {
            name,
            wires: IdList::default(),
            cells: IdList::default(),
            connections: Vec::new(),
            attributes: Attributes::default(),
            instrumented: false,
            port_order: Vec::new(),
            namegen: NameGenerator::default(),
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn is_instrumented(&self) -> bool {
        self.instrumented
    }

    pub fn set_instrumented(&mut self) {
        self.instrumented = true;
    }

    /// Create and register a new wire. Fails if a wire of that name already
    /// exists (spec.md §3 invariant: wire names are unique within a
    /// module).
    pub fn add_wire<S: Into<Id>>(
        &mut self,
        name: S,
        width: u64,
        role: WireRole,
    ) -> IftResult<RRC<Wire>> {
        let name = name.into();
        if self.wires.find(name).is_some() {
            return Err(Error::already_bound(name, "wire"));
        }
        self.namegen.add_names([name].into_iter().collect());
        let wire = rrc(Wire::new(name, width, role));
        self.wires.add(wire.clone());
        if role.is_port() {
            self.fixup_ports();
        }
        Ok(wire)
    }

    /// Look up a wire by name.
    pub fn wire<S: Into<Id>>(&self, name: S) -> Option<RRC<Wire>> {
        self.wires.find(name)
    }

    pub fn wires(&self) -> impl Clone + Iterator<Item = &RRC<Wire>> {
        self.wires.iter()
    }

    /// Register a new cell (used by the builder after constructing its
    /// ports).
    pub fn add_cell(&mut self, cell: RRC<Cell>) {
        self.cells.add(cell);
    }

    pub fn remove_cell<S: Into<Id>>(&mut self, name: S) -> Option<RRC<Cell>> {
        self.cells.remove(name)
    }

    pub fn find_cell<S: Into<Id>>(&self, name: S) -> Option<RRC<Cell>> {
        self.cells.find(name)
    }

    pub fn cells(&self) -> impl Clone + Iterator<Item = &RRC<Cell>> {
        self.cells.iter()
    }

    /// Append a wire-to-wire connection. Both sides must have equal length
    /// (spec.md §3 invariant).
    pub fn connect(&mut self, lhs: Signal, rhs: Signal) -> IftResult<()> {
        if lhs.len() != rhs.len() {
            return Err(Error::malformed_structure(format!(
                "module `{}`: connection width mismatch ({} vs {})",
                self.name,
                lhs.len(),
                rhs.len()
            )));
        }
        self.connections.push((lhs, rhs));
        Ok(())
    }

    pub fn connections(&self) -> &[(Signal, Signal)] {
        &self.connections
    }

    /// Snapshot the current cell list (used before a mutating pass over
    /// cells, so that cells emitted during the scan are not themselves
    /// re-visited in the same pass -- see spec.md §4.4 step 2 and §5
    /// ordering guarantees).
    pub fn snapshot_cells(&self) -> Vec<RRC<Cell>> {
        self.cells.iter().cloned().collect()
    }

    pub fn snapshot_connections(&self) -> Vec<(Signal, Signal)> {
        self.connections.clone()
    }

    /// Recompute the ordered port list from the current wire list. Must be
    /// called after any wire is added or removed with a port role.
    pub fn fixup_ports(&mut self) {
        self.port_order = self
            .wires
            .iter()
            .filter(|w| w.borrow().role.is_port())
            .map(|w| w.borrow().name())
            .collect();
    }

    pub fn ports(&self) -> &[Id] {
        &self.port_order
    }

    pub fn input_ports(&self) -> Vec<RRC<Wire>> {
        self.wires
            .iter()
            .filter(|w| w.borrow().role == WireRole::Input)
            .cloned()
            .collect()
    }

    pub fn output_ports(&self) -> Vec<RRC<Wire>> {
        self.wires
            .iter()
            .filter(|w| w.borrow().role == WireRole::Output)
            .cloned()
            .collect()
    }

    /// Generate a fresh, non-colliding name with the given prefix, scoped to
    /// this module -- used by handlers to name intermediate wires/cells.
    pub fn generate_name<S: Into<Id>>(&mut self, prefix: S) -> Id {
        self.namegen.gen_name(prefix.into())
    }

    /// Every other module this module instantiates via a `Submodule` cell,
    /// deduplicated. Used to build the instantiation graph for topological
    /// ordering (spec.md §4.5).
    pub fn submodule_references(&self) -> HashSet<Id> {
        self.cells
            .iter()
            .filter_map(|c| c.borrow().submodule_name())
            .collect()
    }
}

impl GetName for Module {
    fn name(&self) -> Id {
        self.name
    }
}

impl GetAttributes for Module {
    fn get_attributes(&self) -> &Attributes {
        &self.attributes
    }
    fn get_mut_attributes(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_wire_twice_fails() {
        let mut m = Module::new(Id::from("m"));
        m.add_wire("a", 4, WireRole::Internal).unwrap();
        assert!(m.add_wire("a", 4, WireRole::Internal).is_err());
    }

    #[test]
    fn fixup_ports_keeps_insertion_order() {
        let mut m = Module::new(Id::from("m"));
        m.add_wire("x", 1, WireRole::Input).unwrap();
        m.add_wire("y", 1, WireRole::Internal).unwrap();
        m.add_wire("z", 1, WireRole::Output).unwrap();
        assert_eq!(m.ports(), &[Id::from("x"), Id::from("z")]);
    }

    #[test]
    fn connect_rejects_width_mismatch() {
        let mut m = Module::new(Id::from("m"));
        let a = m.add_wire("a", 4, WireRole::Internal).unwrap();
        let b = m.add_wire("b", 2, WireRole::Internal).unwrap();
        let err = m
            .connect(Signal::whole_wire(&a), Signal::whole_wire(&b))
            .unwrap_err();
        assert!(err.message().contains("width mismatch"));
    }
}
