//! Width harmonization and small bitwise combinators shared by every
//! handler. Per spec.md's Design Notes ("Width extension policy"): "every
//! handler must call this helper and never inline the rule, to prevent
//! drift between data and taint extensions."

use ift_ir::{BitState, Builder, CellTag, Signal, SignalBit};

/// Sign-extend (if `signed`) or zero-extend, else truncate, `data` to
/// `target` bits; `taint` is extended by the *same* rule, since extension
/// bits "carry whatever taint the sign bit carries" (spec.md §4.3).
pub fn harmonize(data: &Signal, taint: &Signal, signed: bool, target: u64) -> (Signal, Signal) {
    let len = data.len();
    if len == target {
        return (data.clone(), taint.clone());
    }
    if len > target {
        return (data.truncate(target), taint.truncate(target));
    }
    let pad = target - len;
    let data_ext = if signed {
        extend_with_bit(data, data.msb().clone(), pad)
    } else {
        data.concat(&Signal::constant_repeat(BitState::S0, pad))
    };
    let taint_ext = if signed {
        extend_with_bit(taint, taint.msb().clone(), pad)
    } else {
        taint.concat(&Signal::constant_repeat(BitState::S0, pad))
    };
    (data_ext, taint_ext)
}

fn extend_with_bit(signal: &Signal, bit: SignalBit, pad: u64) -> Signal {
    let ext = Signal::from_bits((0..pad).map(|_| bit.clone()));
    signal.concat(&ext)
}

/// Zero-extend (never sign-extend) `signal` up to `target` bits; used for
/// the always-unsigned upper-bits-constant-0 convention on single-bit
/// outputs (comparisons, reductions).
pub fn zero_extend(signal: &Signal, target: u64) -> Signal {
    if signal.len() >= target {
        return signal.truncate(target);
    }
    signal.concat(&Signal::constant_repeat(BitState::S0, target - signal.len()))
}

/// Broadcast a single-bit signal across `width` bits (used by the
/// conjunctive fallbacks and MUL's "replicate bit 0" rule).
pub fn broadcast(bit: &Signal, width: u64) -> Signal {
    debug_assert_eq!(bit.len(), 1, "broadcast expects a single-bit signal");
    bit.repeat(width)
}

pub fn bit_not(b: &mut Builder, prefix: &str, x: Signal) -> Signal {
    let w = x.len();
    b.add_unary(prefix, CellTag::Not, x, false, w)
        .borrow()
        .port("Y")
        .clone()
}

pub fn bit_and(b: &mut Builder, prefix: &str, x: Signal, y: Signal) -> Signal {
    let w = x.len();
    b.add_binary(prefix, CellTag::And, x, y, false, false, w)
        .borrow()
        .port("Y")
        .clone()
}

pub fn bit_or(b: &mut Builder, prefix: &str, x: Signal, y: Signal) -> Signal {
    let w = x.len();
    b.add_binary(prefix, CellTag::Or, x, y, false, false, w)
        .borrow()
        .port("Y")
        .clone()
}

pub fn bit_xor(b: &mut Builder, prefix: &str, x: Signal, y: Signal) -> Signal {
    let w = x.len();
    b.add_binary(prefix, CellTag::Xor, x, y, false, false, w)
        .borrow()
        .port("Y")
        .clone()
}

/// `x & y & z`, left-folded.
pub fn bit_and3(b: &mut Builder, prefix: &str, x: Signal, y: Signal, z: Signal) -> Signal {
    let xy = bit_and(b, prefix, x, y);
    bit_and(b, prefix, xy, z)
}

/// `x | y | z`, left-folded.
pub fn bit_or3(b: &mut Builder, prefix: &str, x: Signal, y: Signal, z: Signal) -> Signal {
    let xy = bit_or(b, prefix, x, y);
    bit_or(b, prefix, xy, z)
}

pub fn or_reduce(b: &mut Builder, prefix: &str, x: Signal) -> Signal {
    b.add_unary(prefix, CellTag::ReduceOr, x, false, 1)
        .borrow()
        .port("Y")
        .clone()
}

pub fn and_reduce(b: &mut Builder, prefix: &str, x: Signal) -> Signal {
    b.add_unary(prefix, CellTag::ReduceAnd, x, false, 1)
        .borrow()
        .port("Y")
        .clone()
}

#[cfg(test)]
mod tests {
    use super::*;
    use ift_ir::{Module, WireRole};

    #[test]
    fn zero_extend_pads_with_constant_zero() {
        let mut m = Module::new("m".into());
        let a = m.add_wire("a", 2, WireRole::Internal).unwrap();
        let sig = Signal::whole_wire(&a);
        let extended = zero_extend(&sig, 4);
        assert_eq!(extended.len(), 4);
        assert!(extended.bit(2).is_constant());
        assert!(extended.bit(3).is_constant());
    }

    #[test]
    fn harmonize_sign_extends_when_signed() {
        let mut m = Module::new("m".into());
        let a = m.add_wire("a", 2, WireRole::Internal).unwrap();
        let at = m.add_wire("a_t0", 2, WireRole::Internal).unwrap();
        let data = Signal::whole_wire(&a);
        let taint = Signal::whole_wire(&at);
        let (d, t) = harmonize(&data, &taint, true, 4);
        assert_eq!(d.len(), 4);
        assert_eq!(t.len(), 4);
    }

    #[test]
    fn harmonize_truncates_when_longer() {
        let mut m = Module::new("m".into());
        let a = m.add_wire("a", 4, WireRole::Internal).unwrap();
        let at = m.add_wire("a_t0", 4, WireRole::Internal).unwrap();
        let data = Signal::whole_wire(&a);
        let taint = Signal::whole_wire(&at);
        let (d, t) = harmonize(&data, &taint, false, 2);
        assert_eq!(d.len(), 2);
        assert_eq!(t.len(), 2);
    }
}
