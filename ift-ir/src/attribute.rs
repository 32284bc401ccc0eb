//! Attributes attachable to wires, cells, and modules.

use linked_hash_map::LinkedHashMap;

/// The closed set of attributes the instrumenter itself reasons about.
/// Unknown attributes round-trip through `Unknown` so that attributes set by
/// upstream elaboration (out of scope for this crate) are preserved rather
/// than silently dropped.
#[derive(Clone, Copy, Hash, PartialEq, Eq, Debug)]
pub enum BoolAttr {
    /// Marks a cell or wire as emitted by a pass (i.e. not present in the
    /// original, un-instrumented netlist).
    Generated,
    /// Marks a cell as an external (black-box) reference.
    External,
    /// Marks a wire whose base-name is in the exclusion set: its taint is
    /// forced to constant 0 and never materialized.
    Excluded,
    /// Marks a module as still containing a non-cell behavioral construct
    /// (an unlowered process). Set by the elaboration front end this crate
    /// consumes, never by the instrumenter itself; checked and rejected by
    /// `ift_opt::module_instrumenter` (spec.md §4.4 step 6).
    UnloweredProcess,
}

impl std::fmt::Display for BoolAttr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            BoolAttr::Generated => "generated",
            BoolAttr::External => "external",
            BoolAttr::Excluded => "excluded",
            BoolAttr::UnloweredProcess => "unlowered_process",
        };
        write!(f, "{s}")
    }
}

#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub enum Attribute {
    Bool(BoolAttr),
    /// Unknown/opaque attribute, preserved for round-tripping.
    Unknown(Box<String>),
}

impl From<BoolAttr> for Attribute {
    fn from(b: BoolAttr) -> Self {
        Attribute::Bool(b)
    }
}

impl std::fmt::Display for Attribute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Attribute::Bool(b) => write!(f, "{b}"),
            Attribute::Unknown(s) => write!(f, "{s}"),
        }
    }
}

/// Attributes associated with a specific IR node. A thin wrapper over an
/// order-preserving map, mirroring `calyx_frontend::attributes::Attributes`
/// (minus its inline-attribute micro-optimization, which targets a much
/// hotter path than the instrumenter touches).
#[derive(Default, Debug, Clone)]
pub struct Attributes(LinkedHashMap<Attribute, u64>);

/// Implemented by IR nodes that carry an `Attributes` map.
pub trait GetAttributes {
    fn get_attributes(&self) -> &Attributes;
    fn get_mut_attributes(&mut self) -> &mut Attributes;
}

impl Attributes {
    pub fn insert<A: Into<Attribute>>(&mut self, key: A, val: u64) {
        self.0.insert(key.into(), val);
    }

    pub fn get<A: Into<Attribute>>(&self, key: A) -> Option<u64> {
        self.0.get(&key.into()).copied()
    }

    pub fn has<A: Into<Attribute>>(&self, key: A) -> bool {
        self.0.contains_key(&key.into())
    }

    pub fn remove<A: Into<Attribute>>(&mut self, key: A) {
        self.0.remove(&key.into());
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}
