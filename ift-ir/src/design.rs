//! A design: the collection of modules the instrumenter operates over.

use crate::common::RRC;
use crate::module::Module;
use ift_utils::{Error, Id, IftResult};
use linked_hash_map::LinkedHashMap;

/// A collection of modules keyed by identifier, with a distinguished top
/// module. Modules reference each other by [`Id`]; the design is the
/// registry that resolves those references (spec.md §5, "Shared-resource
/// policy").
#[derive(Debug)]
pub struct Design {
    modules: LinkedHashMap<Id, RRC<Module>>,
    top: Id,
}

impl Design {
    pub fn new(top: Id) -> Self {
        Design {
            modules: LinkedHashMap::new(),
            top,
        }
    }

    pub fn add_module(&mut self, module: RRC<Module>) {
        let name = module.borrow().name();
        self.modules.insert(name, module);
    }

    pub fn module<S: Into<Id>>(&self, name: S) -> Option<RRC<Module>> {
        self.modules.get(&name.into()).cloned()
    }

    pub fn find_module<S: Into<Id>>(&self, name: S) -> IftResult<RRC<Module>> {
        let name = name.into();
        self.module(name).ok_or_else(|| Error::undefined(name, "module"))
    }

    pub fn modules(&self) -> impl Iterator<Item = &RRC<Module>> {
        self.modules.values()
    }

    pub fn module_names(&self) -> impl Iterator<Item = Id> + '_ {
        self.modules.keys().copied()
    }

    pub fn top(&self) -> Id {
        self.top
    }

    pub fn set_top(&mut self, top: Id) {
        self.top = top;
    }

    pub fn len(&self) -> usize {
        self.modules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.modules.is_empty()
    }
}
