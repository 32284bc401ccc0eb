//! Recognized configuration options (spec.md §6, "Configuration surface").
//! Not a CLI parser -- the driver that would populate this from flags is out
//! of scope (spec.md §1) -- just the struct and its defaults.

use std::collections::HashSet;

/// Per-cell-family override to use the coarse conjunctive (imprecise)
/// fallback instead of that family's precise handler.
#[derive(Clone, Debug, Default)]
pub struct ConjunctiveFlags {
    pub add: bool,
    pub sub: bool,
    pub not: bool,
    pub neg: bool,
    pub and: bool,
    pub or: bool,
    pub mul: bool,
    pub pmux: bool,
    pub mux: bool,
    pub eq_ne: bool,
    pub ge: bool,
    pub gt: bool,
    pub le: bool,
    pub lt: bool,
    pub logic_and: bool,
    pub logic_or: bool,
    pub logic_not: bool,
    pub reduce_and: bool,
    pub shl_sshl: bool,
    pub shr: bool,
    pub sshr: bool,
    pub shift_shiftx: bool,
}

impl ConjunctiveFlags {
    /// `true` if every individual flag should be treated as set, because
    /// `conjunctive_gates` (the blanket AND/OR override) is on.
    fn blanket(&self, gates: bool, specific: bool) -> bool {
        gates || specific
    }
}

/// All recognized instrumenter options, collected in one struct (spec.md §6).
#[derive(Clone, Debug)]
pub struct Config {
    /// Number of independent taint labels K (>= 1).
    pub num_labels: u32,
    /// Use the ripple-carry (RTLIFT-style) shadow adder instead of the
    /// CellIFT-style bounding-sum ADD/SUB handler.
    pub rtlift_adders: bool,
    /// Blanket override: apply the coarse two-input OR-reduce form to every
    /// AND/OR cell, regardless of `conjunctive.and`/`conjunctive.or`.
    pub conjunctive_gates: bool,
    /// Per-family conjunctive overrides.
    pub conjunctive: ConjunctiveFlags,
    /// Use the precise SHIFT/SHIFTX handler instead of the imprecise
    /// fallback.
    pub precise_shiftx: bool,
    /// Use the imprecise fallback for $shl/$sshl.
    pub imprecise_shl_sshl: bool,
    /// Use the imprecise fallback for $shr/$sshr.
    pub imprecise_shr_sshr: bool,
    /// Pick the large-cell PMUX variant over the small-cell variant.
    pub pmux_large_cells: bool,
    /// Use the precise, no-one-hot-assumption PMUX handler (spec.md §4.3,
    /// "PMUX (precise, no-one-hot assumption)") instead of either one-hot
    /// variant.
    pub pmux_precise_no_onehot: bool,
    /// Emit a `debug_assert!`-reachable at-most-one-hot precondition check
    /// for the PMUX handlers (spec.md §9, "PMUX variants").
    pub pmux_assert_onehot: bool,
    /// Wire base-names excluded from taint tracking (clocks, resets, ...).
    pub exclude_signals: HashSet<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            num_labels: 1,
            rtlift_adders: false,
            conjunctive_gates: false,
            conjunctive: ConjunctiveFlags::default(),
            precise_shiftx: false,
            imprecise_shl_sshl: false,
            imprecise_shr_sshr: false,
            pmux_large_cells: false,
            pmux_precise_no_onehot: false,
            pmux_assert_onehot: true,
            exclude_signals: HashSet::new(),
        }
    }
}

impl Config {
    pub fn is_excluded(&self, base_name: &str) -> bool {
        self.exclude_signals.contains(base_name)
    }

    pub fn use_conjunctive_and(&self) -> bool {
        self.conjunctive.blanket(self.conjunctive_gates, self.conjunctive.and)
    }

    pub fn use_conjunctive_or(&self) -> bool {
        self.conjunctive.blanket(self.conjunctive_gates, self.conjunctive.or)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_spec() {
        let cfg = Config::default();
        assert_eq!(cfg.num_labels, 1);
        assert!(!cfg.rtlift_adders);
        assert!(!cfg.conjunctive_gates);
        assert!(!cfg.precise_shiftx);
        assert!(!cfg.pmux_large_cells);
        assert!(cfg.exclude_signals.is_empty());
    }

    #[test]
    fn conjunctive_gates_is_a_blanket_override() {
        let mut cfg = Config::default();
        assert!(!cfg.use_conjunctive_and());
        cfg.conjunctive_gates = true;
        assert!(cfg.use_conjunctive_and());
        assert!(cfg.use_conjunctive_or());
    }
}
