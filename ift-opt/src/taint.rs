//! Taint-signal materialization (spec.md §4.1) and port augmentation
//! (§4.2).

use crate::config::Config;
use ift_ir::{BitState, Module, RRC, Signal, SignalBit, Wire, WireRole};
use ift_utils::{Id, IftResult};

/// Canonical taint-wire name for data wire `base` at label `k`: `X_t<k>`.
/// Contractual (spec.md §6, "Wire naming") -- downstream tools identify
/// taint wires by this suffix.
pub fn taint_wire_name(base: Id, label: u32) -> Id {
    Id::from(format!("{base}_t{label}"))
}

/// Resolve (creating lazily if necessary) the taint wire for `data_wire` at
/// `label`. Two calls for the same `(data_wire, label)` return the same
/// wire (spec.md §4.1, "Naming"; §8, "Deterministic naming").
fn taint_wire_for(
    module: &mut Module,
    data_wire: &RRC<Wire>,
    label: u32,
) -> IftResult<RRC<Wire>> {
    let (name, width) = {
        let w = data_wire.borrow();
        (w.name(), w.width)
    };
    let taint_name = taint_wire_name(name, label);
    if let Some(existing) = module.wire(taint_name) {
        return Ok(existing);
    }
    module.add_wire(taint_name, width, WireRole::Internal)
}

/// Taint-bit rule (spec.md §4.1): a constant source bit is untainted; an
/// excluded wire's bits are untainted; otherwise the taint bit is the
/// matching bit of that wire's label-`k` taint wire.
pub fn taint_of(
    module: &mut Module,
    signal: &Signal,
    label: u32,
    cfg: &Config,
) -> IftResult<Signal> {
    let mut bits = Vec::with_capacity(signal.len() as usize);
    for bit in signal.iter() {
        let out = match bit {
            SignalBit::Const(_) => SignalBit::Const(BitState::S0),
            SignalBit::Wire { wire, offset } => {
                let base = wire.borrow().name();
                if cfg.is_excluded(base.as_str()) {
                    SignalBit::Const(BitState::S0)
                } else {
                    let taint_wire = taint_wire_for(module, wire, label)?;
                    SignalBit::wire_bit(taint_wire, *offset)
                }
            }
        };
        bits.push(out);
    }
    Ok(Signal::from_bits(bits))
}

/// Add a parallel taint port, for every label, for every non-excluded
/// input/output port of `module` (spec.md §4.2). Idempotent: re-running on
/// an already-augmented module adds nothing new.
pub fn augment_ports(module: &mut Module, cfg: &Config) -> IftResult<()> {
    let inputs = module.input_ports();
    let outputs = module.output_ports();

    for (ports, role) in [(inputs, WireRole::Input), (outputs, WireRole::Output)] {
        for wire in ports {
            let (name, width) = {
                let w = wire.borrow();
                (w.name(), w.width)
            };
            if cfg.is_excluded(name.as_str()) {
                continue;
            }
            for k in 0..cfg.num_labels {
                let taint_name = taint_wire_name(name, k);
                if module.wire(taint_name).is_none() {
                    module.add_wire(taint_name, width, role)?;
                }
            }
        }
    }
    module.fixup_ports();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taint_of_constant_is_untainted() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let sig = Signal::constant_value(0b10, 2);
        let t = taint_of(&mut m, &sig, 0, &cfg).unwrap();
        assert!(t.iter().all(|b| b.is_constant()));
    }

    #[test]
    fn taint_of_is_idempotent_per_wire_and_label() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        let w = m.add_wire("x", 4, WireRole::Internal).unwrap();
        let sig = Signal::whole_wire(&w);
        let t1 = taint_of(&mut m, &sig, 0, &cfg).unwrap();
        let t2 = taint_of(&mut m, &sig, 0, &cfg).unwrap();
        let SignalBit::Wire { wire: w1, .. } = t1.bit(0) else {
            panic!("expected wire bit")
        };
        let SignalBit::Wire { wire: w2, .. } = t2.bit(0) else {
            panic!("expected wire bit")
        };
        assert_eq!(w1.borrow().name(), w2.borrow().name());
        assert_eq!(w1.borrow().name(), taint_wire_name("x".into(), 0));
    }

    #[test]
    fn taint_of_excluded_wire_is_constant_zero() {
        let mut m = Module::new("m".into());
        let mut cfg = Config::default();
        cfg.exclude_signals.insert("clk".to_string());
        let w = m.add_wire("clk", 1, WireRole::Internal).unwrap();
        let sig = Signal::whole_wire(&w);
        let t = taint_of(&mut m, &sig, 0, &cfg).unwrap();
        assert!(t.bit(0).is_constant());
        assert!(m.wire(taint_wire_name("clk".into(), 0)).is_none());
    }

    #[test]
    fn augment_ports_adds_matching_taint_ports() {
        let mut m = Module::new("m".into());
        let cfg = Config::default();
        m.add_wire("a", 4, WireRole::Input).unwrap();
        m.add_wire("y", 4, WireRole::Output).unwrap();
        augment_ports(&mut m, &cfg).unwrap();
        assert!(m.wire(taint_wire_name("a".into(), 0)).is_some());
        assert!(m.wire(taint_wire_name("y".into(), 0)).is_some());
        assert_eq!(m.ports().len(), 4);
    }
}
