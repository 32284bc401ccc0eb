//! Signals: LSB-first vectors of signal bits, each either a constant bit
//! state or a reference to one bit of a wire. Mirrors §3 of the
//! specification ("Signal bit", "Signal").

use crate::common::RRC;
use crate::structure::Wire;
use smallvec::{smallvec, SmallVec};

/// One of the four IEEE-1364-style bit states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BitState {
    S0,
    S1,
    Sx,
    Sz,
}

impl std::fmt::Display for BitState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let c = match self {
            BitState::S0 => '0',
            BitState::S1 => '1',
            BitState::Sx => 'x',
            BitState::Sz => 'z',
        };
        write!(f, "{c}")
    }
}

/// A single bit of a [`Signal`]: either a constant, or bit `offset` of
/// `wire`.
#[derive(Clone, Debug)]
pub enum SignalBit {
    Const(BitState),
    Wire { wire: RRC<Wire>, offset: u64 },
}

impl SignalBit {
    pub fn wire_bit(wire: RRC<Wire>, offset: u64) -> Self {
        debug_assert!(
            offset < wire.borrow().width,
            "bit offset {offset} out of range for wire `{}` of width {}",
            wire.borrow().name(),
            wire.borrow().width
        );
        SignalBit::Wire { wire, offset }
    }

    pub fn is_constant(&self) -> bool {
        matches!(self, SignalBit::Const(_))
    }
}

/// An ordered (least-significant-bit-first) sequence of signal bits.
#[derive(Clone, Debug, Default)]
pub struct Signal(SmallVec<[SignalBit; 4]>);

impl Signal {
    pub fn empty() -> Self {
        Signal(smallvec![])
    }

    pub fn from_bits<I: IntoIterator<Item = SignalBit>>(bits: I) -> Self {
        Signal(bits.into_iter().collect())
    }

    /// A constant signal of `width` bits all equal to `state`.
    pub fn constant_repeat(state: BitState, width: u64) -> Self {
        Signal((0..width).map(|_| SignalBit::Const(state)).collect())
    }

    /// A constant signal encoding the unsigned value `val` in `width` bits.
    pub fn constant_value(val: u64, width: u64) -> Self {
        Signal(
            (0..width)
                .map(|i| {
                    let bit = if width >= 64 && i >= 64 {
                        0
                    } else {
                        (val >> i) & 1
                    };
                    SignalBit::Const(if bit == 1 {
                        BitState::S1
                    } else {
                        BitState::S0
                    })
                })
                .collect(),
        )
    }

    /// The whole-wire signal `wire[0..wire.width)`.
    pub fn whole_wire(wire: &RRC<Wire>) -> Self {
        let width = wire.borrow().width;
        Signal(
            (0..width)
                .map(|i| SignalBit::wire_bit(wire.clone(), i))
                .collect(),
        )
    }

    pub fn len(&self) -> u64 {
        self.0.len() as u64
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn bit(&self, i: u64) -> &SignalBit {
        &self.0[i as usize]
    }

    pub fn iter(&self) -> impl Iterator<Item = &SignalBit> {
        self.0.iter()
    }

    /// Bit-slice `self[lo..hi)`.
    pub fn slice(&self, lo: u64, hi: u64) -> Signal {
        assert!(hi <= self.len() && lo <= hi, "slice out of range");
        Signal(self.0[lo as usize..hi as usize].iter().cloned().collect())
    }

    /// Single-bit slice, convenient for handler code.
    pub fn bit_signal(&self, i: u64) -> Signal {
        self.slice(i, i + 1)
    }

    /// Concatenate `self` (low bits) with `other` (high bits).
    pub fn concat(&self, other: &Signal) -> Signal {
        let mut bits: SmallVec<[SignalBit; 4]> = self.0.clone();
        bits.extend(other.0.iter().cloned());
        Signal(bits)
    }

    /// Repeat this signal `n` times (concatenated, each repetition at
    /// increasing bit position).
    pub fn repeat(&self, n: u64) -> Signal {
        let mut bits: SmallVec<[SignalBit; 4]> = smallvec![];
        for _ in 0..n {
            bits.extend(self.0.iter().cloned());
        }
        Signal(bits)
    }

    pub fn truncate(&self, width: u64) -> Signal {
        self.slice(0, width.min(self.len()))
    }

    pub fn msb(&self) -> &SignalBit {
        self.bit(self.len() - 1)
    }
}

impl FromIterator<SignalBit> for Signal {
    fn from_iter<I: IntoIterator<Item = SignalBit>>(iter: I) -> Self {
        Signal(iter.into_iter().collect())
    }
}
