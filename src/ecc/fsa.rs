//! Finite-state automaton of a convolutional encoder.
//!
//! The encoder memory holds the `k-1` most recent input bits. Feeding one input
//! bit `x` into state `s` forms the window `x ++ s`, emits one output bit per
//! generator polynomial and moves to the state made of the first `k-1` bits of
//! that window, dropping the oldest memory bit.
//!
//! # Examples
//!
//! ```
//! use convcode::ecc::{Fsa, GeneratorSet, State};
//!
//! let generators = GeneratorSet::new(3, ["111", "110"]).unwrap();
//! let fsa = Fsa::build(&generators).unwrap();
//! assert_eq!(fsa.num_states(), 4);
//!
//! let t = fsa.transition(State::zero(2), true).unwrap();
//! assert_eq!(t.next_state.to_string(), "10");
//! ```

use crate::bits::{to_string, Bits, BitsRef};
use crate::ecc::generator::GeneratorSet;
use crate::error::Result;
use std::fmt::{Display, Formatter};

/// Contents of the encoder memory, newest bit first.
///
/// The state is stored as an index in `0..2^memory` whose most significant bit
/// is the newest memory bit, so the all-zero start state has index 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct State {
    index: usize,
    memory: usize,
}

impl State {
    /// The all-zero start state for an encoder with `memory` bits
    pub fn zero(memory: usize) -> Self {
        Self { index: 0, memory }
    }

    /// Builds a state from its index; `None` if the index needs more than `memory` bits.
    pub fn from_index(index: usize, memory: usize) -> Option<Self> {
        if index.checked_shr(memory as u32).unwrap_or(0) == 0 {
            Some(Self { index, memory })
        } else {
            None
        }
    }

    /// Builds a state from its memory bits, newest first.
    pub fn from_bits(bits: &BitsRef) -> Self {
        let index = bits
            .iter()
            .by_vals()
            .fold(0usize, |acc, bit| (acc << 1) | bit as usize);
        Self {
            index,
            memory: bits.len(),
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Number of memory bits (`k-1`)
    pub fn memory(&self) -> usize {
        self.memory
    }

    /// The memory bits, newest first
    pub fn bits(&self) -> Bits {
        (0..self.memory)
            .map(|i| (self.index >> (self.memory - 1 - i)) & 1 == 1)
            .collect()
    }
}

impl Display for State {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", to_string(&self.bits()))
    }
}

/// Result of feeding one input bit into a state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub next_state: State,
    /// One bit per generator polynomial
    pub output: Bits,
}

/// Transition table over all `2^(k-1)` states and both input bits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Fsa {
    memory: usize,
    block_len: usize,
    transitions: Vec<[Transition; 2]>,
}

impl Fsa {
    /// Enumerates every `(state, input)` pair of the encoder described by `generators`.
    pub fn build(generators: &GeneratorSet) -> Result<Self> {
        let memory = generators.constraint_length() - 1;
        let num_states = 1usize << memory;

        let mut transitions = Vec::with_capacity(num_states);
        for index in 0..num_states {
            let state = State { index, memory };
            transitions.push([
                step(generators, state, false)?,
                step(generators, state, true)?,
            ]);
        }

        Ok(Self {
            memory,
            block_len: generators.len(),
            transitions,
        })
    }

    /// Number of states, `2^(k-1)`
    pub fn num_states(&self) -> usize {
        self.transitions.len()
    }

    /// Number of memory bits, `k-1`
    pub fn memory(&self) -> usize {
        self.memory
    }

    /// Output bits per transition, `n`
    pub fn block_len(&self) -> usize {
        self.block_len
    }

    pub fn start_state(&self) -> State {
        State::zero(self.memory)
    }

    /// Looks up the transition for `(state, input)`; `None` if the state belongs to
    /// an encoder with a different memory.
    pub fn transition(&self, state: State, input: bool) -> Option<&Transition> {
        if state.memory != self.memory {
            return None;
        }
        self.transitions
            .get(state.index)
            .map(|pair| &pair[input as usize])
    }

    /// Table lookup by raw state index; the index must be below [`Fsa::num_states`].
    pub(crate) fn transition_at(&self, index: usize, input: bool) -> &Transition {
        &self.transitions[index][input as usize]
    }

    /// Iterates over every state with its transitions for inputs 0 and 1.
    pub fn iter(&self) -> impl Iterator<Item = (State, &[Transition; 2])> {
        let memory = self.memory;
        self.transitions
            .iter()
            .enumerate()
            .map(move |(index, pair)| (State { index, memory }, pair))
    }
}

impl Display for Fsa {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        for (state, [zero, one]) in self.iter() {
            writeln!(
                f,
                "{} -0/{}-> {}  -1/{}-> {}",
                state,
                to_string(&zero.output),
                zero.next_state,
                to_string(&one.output),
                one.next_state
            )?;
        }
        Ok(())
    }
}

fn step(generators: &GeneratorSet, state: State, input: bool) -> Result<Transition> {
    let mut window = Bits::with_capacity(state.memory + 1);
    window.push(input);
    window.extend_from_bitslice(state.bits().as_bitslice());

    let output = generators.output(&window)?;
    let next_state = State::from_bits(&window[..state.memory]);

    Ok(Transition { next_state, output })
}
