//! Errors produced while building or instrumenting a netlist.

use crate::Id;

/// Convenience wrapper for "success or a meaningful instrumenter error".
pub type IftResult<T> = std::result::Result<T, Error>;

/// An error produced by the IR layer or by a pass.
///
/// Kept boxed so that `Result<T, Error>` stays small on the stack, matching
/// the teacher's `calyx_utils::Error` layout.
#[derive(Clone)]
pub struct Error {
    kind: Box<ErrorKind>,
    post_msg: Option<String>,
}

impl std::fmt::Debug for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        if let Some(post) = &self.post_msg {
            write!(f, "\n{post}")?;
        }
        Ok(())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        std::fmt::Debug::fmt(self, f)
    }
}

impl std::error::Error for Error {}

impl Error {
    pub fn with_post_msg(mut self, msg: Option<String>) -> Self {
        self.post_msg = msg;
        self
    }

    fn of(kind: ErrorKind) -> Self {
        Self {
            kind: Box::new(kind),
            post_msg: None,
        }
    }

    pub fn malformed_structure<S: ToString>(msg: S) -> Self {
        Self::of(ErrorKind::MalformedStructure(msg.to_string()))
    }

    pub fn undefined<S: ToString>(name: Id, typ: S) -> Self {
        Self::of(ErrorKind::Undefined(name, typ.to_string()))
    }

    pub fn already_bound<S: ToString>(name: Id, typ: S) -> Self {
        Self::of(ErrorKind::AlreadyBound(name, typ.to_string()))
    }

    pub fn pass_assumption<S: ToString, M: ToString>(pass: S, msg: M) -> Self {
        Self::of(ErrorKind::PassAssumption(pass.to_string(), msg.to_string()))
    }

    pub fn unsupported_cell(module: Id, cell: Id, cell_type: String) -> Self {
        Self::of(ErrorKind::UnsupportedCell {
            module,
            cell,
            cell_type,
        })
    }

    pub fn recursive_hierarchy(cycle: Vec<Id>) -> Self {
        Self::of(ErrorKind::RecursiveHierarchy(cycle))
    }

    pub fn unlowered_process(module: Id) -> Self {
        Self::of(ErrorKind::UnloweredProcess(module))
    }

    pub fn port_parameter_mismatch<S: ToString>(
        module: Id,
        cell: Id,
        msg: S,
    ) -> Self {
        Self::of(ErrorKind::PortParameterMismatch(
            module,
            cell,
            msg.to_string(),
        ))
    }

    pub fn empty_selection() -> Self {
        Self::of(ErrorKind::EmptySelection)
    }

    pub fn misc<S: ToString>(msg: S) -> Self {
        Self::of(ErrorKind::Misc(msg.to_string()))
    }

    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

#[derive(Clone)]
enum ErrorKind {
    /// The cells/wires/connections of a module violate a data-model
    /// invariant (e.g. mismatched connection widths).
    MalformedStructure(String),
    /// A referenced name (wire, cell, module) does not exist.
    Undefined(Id, String),
    /// A name is already bound within its scope.
    AlreadyBound(Id, String),
    /// A pass-local invariant/precondition was violated.
    PassAssumption(String, String),
    /// A primitive cell type has no registered handler.
    UnsupportedCell {
        module: Id,
        cell: Id,
        cell_type: String,
    },
    /// The module instantiation graph contains a cycle.
    RecursiveHierarchy(Vec<Id>),
    /// A module still contains non-cell behavioral constructs.
    UnloweredProcess(Id),
    /// A port's width disagrees with the parameter that should govern it.
    PortParameterMismatch(Id, Id, String),
    /// No modules were selected for instrumentation.
    EmptySelection,
    /// Miscellaneous error message.
    Misc(String),
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use ErrorKind::*;
        match self {
            MalformedStructure(msg) => write!(f, "Malformed structure: {msg}"),
            Undefined(name, typ) => write!(f, "Undefined {typ}: `{name}'"),
            AlreadyBound(name, typ) => {
                write!(f, "`{name}' already bound as {typ}")
            }
            PassAssumption(pass, msg) => {
                write!(f, "Pass `{pass}` assumption violated: {msg}")
            }
            UnsupportedCell {
                module,
                cell,
                cell_type,
            } => write!(
                f,
                "module `{module}`: cell `{cell}` has unsupported type \
                 `{cell_type}`; lower it further (tech-mapping) or register \
                 a custom handler"
            ),
            RecursiveHierarchy(cycle) => write!(
                f,
                "recursive module hierarchy detected: {}",
                cycle
                    .iter()
                    .map(|id| id.to_string())
                    .collect::<Vec<_>>()
                    .join(" -> ")
            ),
            UnloweredProcess(module) => write!(
                f,
                "module `{module}` still contains an unlowered process; \
                 run process lowering before instrumentation"
            ),
            PortParameterMismatch(module, cell, msg) => write!(
                f,
                "module `{module}`, cell `{cell}`: port/parameter mismatch: {msg}"
            ),
            EmptySelection => {
                write!(f, "no modules were selected for instrumentation")
            }
            Misc(msg) => write!(f, "{msg}"),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::misc(format!("IO error: {e}"))
    }
}

impl From<serde_json::Error> for Error {
    fn from(e: serde_json::Error) -> Self {
        Error::misc(format!("serde_json error: {e}"))
    }
}
