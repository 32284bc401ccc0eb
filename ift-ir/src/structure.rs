//! Wires and cells: the structural contents of a [`crate::module::Module`].

use crate::attribute::{Attributes, GetAttributes};
use crate::cell_type::{CellType, Parameters};
use crate::signal::Signal;
use ift_utils::{GetName, Id};
use linked_hash_map::LinkedHashMap;

/// The role a wire plays in its owning module's port list.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum WireRole {
    Input,
    Output,
    Internal,
}

impl WireRole {
    pub fn is_port(self) -> bool {
        !matches!(self, WireRole::Internal)
    }
}

/// A named, fixed-width data or taint wire, owned by its containing module.
#[derive(Debug)]
pub struct Wire {
    name: Id,
    pub width: u64,
    pub role: WireRole,
    pub attributes: Attributes,
}

impl Wire {
    pub fn new(name: Id, width: u64, role: WireRole) -> Self {
        Wire {
            name,
            width,
            role,
            attributes: Attributes::default(),
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn base_name(&self) -> &str {
        self.name.as_str()
    }
}

impl GetName for Wire {
    fn name(&self) -> Id {
        self.name
    }
}

impl GetAttributes for Wire {
    fn get_attributes(&self) -> &Attributes {
        &self.attributes
    }
    fn get_mut_attributes(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}

/// An instantiated cell: a primitive operation, a constant, or a reference
/// to another (already-instrumented) module, wired up via a port-name ->
/// [`Signal`] map.
#[derive(Debug)]
pub struct Cell {
    name: Id,
    pub prototype: CellType,
    pub params: Parameters,
    ports: LinkedHashMap<Id, Signal>,
    pub attributes: Attributes,
}

impl Cell {
    pub fn new(name: Id, prototype: CellType, params: Parameters) -> Self {
        Cell {
            name,
            prototype,
            params,
            ports: LinkedHashMap::new(),
            attributes: Attributes::default(),
        }
    }

    pub fn name(&self) -> Id {
        self.name
    }

    pub fn connect<S: Into<Id>>(&mut self, port: S, signal: Signal) {
        self.ports.insert(port.into(), signal);
    }

    pub fn port<S: Into<Id>>(&self, port: S) -> &Signal {
        let port = port.into();
        self.ports
            .get(&port)
            .unwrap_or_else(|| panic!("cell `{}` has no port `{port}`", self.name))
    }

    pub fn find_port<S: Into<Id>>(&self, port: S) -> Option<&Signal> {
        self.ports.get(&port.into())
    }

    pub fn ports(&self) -> impl Iterator<Item = (&Id, &Signal)> {
        self.ports.iter()
    }

    pub fn is_submodule(&self) -> bool {
        matches!(self.prototype, CellType::Submodule { .. })
    }

    pub fn submodule_name(&self) -> Option<Id> {
        match &self.prototype {
            CellType::Submodule { module } => Some(*module),
            _ => None,
        }
    }

    /// Canonical name for the generated cell backing a `(val, width)`
    /// constant, mirroring `Cell::constant_name` in the teacher.
    pub fn constant_name(val: u64, width: u64) -> Id {
        Id::from(format!("_const_{val}_{width}"))
    }
}

impl GetName for Cell {
    fn name(&self) -> Id {
        self.name
    }
}

impl GetAttributes for Cell {
    fn get_attributes(&self) -> &Attributes {
        &self.attributes
    }
    fn get_mut_attributes(&mut self) -> &mut Attributes {
        &mut self.attributes
    }
}
