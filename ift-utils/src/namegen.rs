use crate::Id;
use std::collections::{HashMap, HashSet};

/// Generates fresh, non-colliding names for a given prefix.
///
/// Used by `Module::generate_name` to hand out names for the anonymous
/// intermediate wires and cells that handlers emit, exactly as the teacher's
/// `Component::generate_name` uses its own `NameGenerator`.
#[derive(Clone, Debug, Default)]
pub struct NameGenerator {
    counts: HashMap<Id, i64>,
    taken: HashSet<Id>,
}

impl NameGenerator {
    /// Build a generator that already knows about `names`, so it will never
    /// hand one of them back out.
    pub fn with_prev_defined_names(names: HashSet<Id>) -> Self {
        NameGenerator {
            taken: names,
            counts: HashMap::default(),
        }
    }

    pub fn add_names(&mut self, names: HashSet<Id>) {
        self.taken.extend(names);
    }

    /// Return a new name starting with `prefix`, e.g. `gen_name("and")` ->
    /// `and0`, `and1`, ...
    pub fn gen_name<S>(&mut self, prefix: S) -> Id
    where
        S: Into<Id>,
    {
        let mut cur_prefix: Id = prefix.into();
        loop {
            let count = self
                .counts
                .entry(cur_prefix)
                .and_modify(|v| *v += 1)
                .or_insert(-1);

            let name = if *count == -1 {
                cur_prefix
            } else {
                Id::from(format!("{cur_prefix}{count}"))
            };

            if !self.taken.contains(&name) {
                self.taken.insert(name);
                return name;
            }
            cur_prefix = name;
        }
    }
}
