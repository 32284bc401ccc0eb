//! Interned identifiers used throughout the IR and the instrumenter.

/// Global interned symbol backing [`Id`].
pub type GSym = symbol_table::GlobalSymbol;

/// Represents an identifier (wire, cell, module, or parameter name).
///
/// `Id` is `Copy` because the backing string is interned globally; cloning
/// never touches the heap.
#[derive(Clone, Copy, Hash, PartialEq, Eq, PartialOrd, Ord)]
pub struct Id {
    sym: GSym,
}

impl Id {
    pub fn new<S: ToString>(s: S) -> Self {
        Self {
            sym: GSym::from(s.to_string()),
        }
    }

    pub fn as_str(&self) -> &'static str {
        self.sym.as_str()
    }
}

impl Default for Id {
    fn default() -> Self {
        Id::new("")
    }
}

impl std::fmt::Display for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.sym)
    }
}

impl std::fmt::Debug for Id {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Id({})", self.sym)
    }
}

impl AsRef<str> for Id {
    fn as_ref(&self) -> &str {
        self.sym.as_str()
    }
}

impl From<&str> for Id {
    fn from(s: &str) -> Self {
        Id::new(s)
    }
}

impl From<String> for Id {
    fn from(s: String) -> Self {
        Id::new(s)
    }
}

impl From<&Id> for Id {
    fn from(id: &Id) -> Self {
        *id
    }
}

impl PartialEq<str> for Id {
    fn eq(&self, other: &str) -> bool {
        self.sym == GSym::from(other)
    }
}

impl PartialEq<&str> for Id {
    fn eq(&self, other: &&str) -> bool {
        self.sym == GSym::from(*other)
    }
}

impl PartialEq<String> for Id {
    fn eq(&self, other: &String) -> bool {
        self.sym == GSym::from(other.as_str())
    }
}

/// Implemented by every IR node that carries a stable, unique name within its
/// parent collection. Mirrors the teacher's `GetName` trait, used by the
/// generic `IdList<T>` container.
pub trait GetName {
    fn name(&self) -> Id;
}
