//! The closed set of primitive cell types the instrumenter knows how to
//! handle, plus the typed parameter bag every cell carries.
//!
//! Per the specification's Design Notes, this is a tagged-variant
//! representation (not a string tag) so that cell dispatch is a `match`
//! the compiler can check for exhaustiveness, instead of the chained
//! string comparisons the original tool used.

use ift_utils::Id;

/// Clock/enable/reset polarity: `true` means "active high" / "rising edge",
/// `false` means "active low" / "falling edge", matching
/// `CLK_POLARITY`/`EN_POLARITY`/`ARST_POLARITY`/`SRST_POLARITY`/
/// `ALOAD_POLARITY` in spec.md §6.
pub type Polarity = bool;

/// The closed set of primitive cell type tags. `Submodule` is the single
/// catch-all for "named reference to an already-instrumented user module".
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub enum CellTag {
    // --- stateless, single input ---
    Not,
    Buf,
    Pos,
    LogicNot,
    ReduceAnd,
    ReduceOr,
    ReduceXor,
    ReduceBool,
    Neg,
    // --- stateless, two inputs ---
    And,
    Or,
    Xor,
    Xnor,
    Add,
    Sub,
    Mul,
    Mod,
    Eq,
    Ne,
    Ge,
    Gt,
    Le,
    Lt,
    LogicAnd,
    LogicOr,
    Shl,
    Sshl,
    Shr,
    Sshr,
    Shift,
    Shiftx,
    // --- select-shaped ---
    Mux,
    Pmux,
    Bmux,
    Demux,
    // --- constant ---
    Constant,
    // --- stateful ---
    Dff,
    Dffe,
    Adff,
    Sdff,
    Aldff,
    Dlatch,
    Adlatch,
    DlatchSr,
    Sr,
    Dffsr,
    /// Reference to an already-instrumented user-defined module, named by
    /// `Id`.
    Submodule,
}

impl CellTag {
    pub fn is_stateful(self) -> bool {
        matches!(
            self,
            CellTag::Dff
                | CellTag::Dffe
                | CellTag::Adff
                | CellTag::Sdff
                | CellTag::Aldff
                | CellTag::Dlatch
                | CellTag::Adlatch
                | CellTag::DlatchSr
                | CellTag::Sr
                | CellTag::Dffsr
        )
    }

    pub fn name(self) -> &'static str {
        use CellTag::*;
        match self {
            Not => "$not",
            Buf => "$buf",
            Pos => "$pos",
            LogicNot => "$logic_not",
            ReduceAnd => "$reduce_and",
            ReduceOr => "$reduce_or",
            ReduceXor => "$reduce_xor",
            ReduceBool => "$reduce_bool",
            Neg => "$neg",
            And => "$and",
            Or => "$or",
            Xor => "$xor",
            Xnor => "$xnor",
            Add => "$add",
            Sub => "$sub",
            Mul => "$mul",
            Mod => "$mod",
            Eq => "$eq",
            Ne => "$ne",
            Ge => "$ge",
            Gt => "$gt",
            Le => "$le",
            Lt => "$lt",
            LogicAnd => "$logic_and",
            LogicOr => "$logic_or",
            Shl => "$shl",
            Sshl => "$sshl",
            Shr => "$shr",
            Sshr => "$sshr",
            Shift => "$shift",
            Shiftx => "$shiftx",
            Mux => "$mux",
            Pmux => "$pmux",
            Bmux => "$bmux",
            Demux => "$demux",
            Constant => "$constant",
            Dff => "$dff",
            Dffe => "$dffe",
            Adff => "$adff",
            Sdff => "$sdff",
            Aldff => "$aldff",
            Dlatch => "$dlatch",
            Adlatch => "$adlatch",
            DlatchSr => "$dlatchsr",
            Sr => "$sr",
            Dffsr => "$dffsr",
            Submodule => "<submodule>",
        }
    }
}

impl std::fmt::Display for CellTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.name())
    }
}

/// The underlying type of an instantiated cell. Mirrors `calyx_ir::CellType`
/// but closed over the primitive families named in spec.md §6 instead of
/// being parametrized over an arbitrary primitives library.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum CellType {
    Primitive(CellTag),
    /// Reference to an already-instrumented Calyx-style submodule.
    Submodule { module: Id },
    /// A constant-value driver cell (`Cell::constant_name`-style).
    Constant { val: u64, width: u64 },
}

impl CellType {
    pub fn tag(&self) -> CellTag {
        match self {
            CellType::Primitive(tag) => *tag,
            CellType::Submodule { .. } => CellTag::Submodule,
            CellType::Constant { .. } => CellTag::Constant,
        }
    }

    pub fn surface_name(&self) -> String {
        match self {
            CellType::Primitive(tag) => tag.name().to_string(),
            CellType::Submodule { module } => module.to_string(),
            CellType::Constant { val, width } => format!("{val}'d{width}"),
        }
    }
}

/// The typed parameter bag carried by every cell, per spec.md §3 ("Cell")
/// and §6 ("Parameter access"). Not every field is meaningful for every
/// cell type; handlers read only the fields relevant to their family.
#[derive(Clone, Debug, Default)]
pub struct Parameters {
    pub a_width: Option<u64>,
    pub b_width: Option<u64>,
    pub s_width: Option<u64>,
    pub y_width: u64,
    pub a_signed: bool,
    pub b_signed: bool,
    pub clk_polarity: Polarity,
    pub en_polarity: Polarity,
    pub arst_polarity: Polarity,
    pub srst_polarity: Polarity,
    pub aload_polarity: Polarity,
    pub arst_value: Option<u64>,
    pub srst_value: Option<u64>,
}

impl Parameters {
    pub fn with_y_width(y_width: u64) -> Self {
        Parameters {
            y_width,
            ..Default::default()
        }
    }

    pub fn binary(a_width: u64, b_width: u64, y_width: u64) -> Self {
        Parameters {
            a_width: Some(a_width),
            b_width: Some(b_width),
            y_width,
            ..Default::default()
        }
    }

    pub fn signed(mut self, a_signed: bool, b_signed: bool) -> Self {
        self.a_signed = a_signed;
        self.b_signed = b_signed;
        self
    }
}
