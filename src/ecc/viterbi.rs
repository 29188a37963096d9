//! Hard-decision Viterbi decoding over the trellis of a convolutional code.
//!
//! The decoder keeps one survivor path per reachable encoder state. Each received
//! block of `n` bits extends every survivor with both possible input bits, scores
//! the extension by the Hamming distance between the hypothesized and the received
//! block, and keeps only the cheapest candidate entering each state
//! (add-compare-select). After the last block the cheapest survivor over all
//! states wins; the encoder is not assumed to end in the zero state.
//!
//! Ties are broken deterministically: among candidates with equal distance the
//! one whose input history is lexicographically smallest survives. Survivors are
//! kept ranked in history order, so comparing two candidate histories reduces to
//! comparing `(parent rank, input bit)`.
//!
//! Input histories live in an append-only arena of `(parent, bit)` nodes; a step
//! adds at most one node per state and never copies a history.

use crate::bits::{count_differences, Bits, BitsRef, IntoBits};
use crate::ecc::convolutional::ConvolutionalCode;
use crate::ecc::fsa::{Fsa, State};
use crate::error::{Error, Result};
use log::{debug, log_enabled, trace, Level};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Tuning knobs for [`ViterbiDecoder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DecoderConfig {
    /// Survivor count from which path extension runs on the rayon pool.
    /// Only consulted when the `parallel` feature is enabled.
    pub parallel_min_states: usize,
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self {
            parallel_min_states: 64,
        }
    }
}

/// Represents the result of a Viterbi decoding operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ViterbiResult {
    /// Decoded input bits, one per received block
    pub decoded: Bits,
    /// Cumulative Hamming distance of the winning path (lower is better)
    pub final_metric: usize,
    /// Received bits that differ from the re-encoded decoded sequence
    pub corrected_errors: usize,
    /// Encoder state at the end of the winning path
    pub end_state: State,
}

/// A dedicated Viterbi decoder for convolutional codes
#[derive(Debug, Clone)]
pub struct ViterbiDecoder {
    code: ConvolutionalCode,
    config: DecoderConfig,
}

impl ViterbiDecoder {
    /// Creates a new Viterbi decoder for the specified convolutional code
    pub fn new(code: ConvolutionalCode) -> Self {
        Self {
            code,
            config: DecoderConfig::default(),
        }
    }

    pub fn with_config(mut self, config: DecoderConfig) -> Self {
        self.config = config;
        self
    }

    pub fn code(&self) -> &ConvolutionalCode {
        &self.code
    }

    pub fn config(&self) -> &DecoderConfig {
        &self.config
    }

    /// Decodes a received sequence, returning only the decoded bits.
    pub fn decode<B: IntoBits>(&self, received: B) -> Result<Bits> {
        Ok(self.decode_detailed(received)?.decoded)
    }

    /// Decodes a received sequence and reports the metric of the winning path.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidInputLength`] if the received length is not a multiple of the
    /// number of generators; [`Error::InvalidBit`] if the input cannot be normalized.
    pub fn decode_detailed<B: IntoBits>(&self, received: B) -> Result<ViterbiResult> {
        let received = received.into_bits()?;
        let block = self.code.generator_count();

        if received.len() % block != 0 {
            return Err(Error::InvalidInputLength {
                len: received.len(),
                block,
            });
        }

        let mut trellis = Trellis::new(self.code.fsa(), &self.config);
        for chunk in received.chunks_exact(block) {
            trellis.step(chunk);
        }
        let (decoded, final_metric, end_state) = trellis.finish();

        debug!(
            "Viterbi decoded {} blocks with {}: metric {}, end state {}",
            decoded.len(),
            self.code.generators(),
            final_metric,
            end_state
        );

        Ok(ViterbiResult {
            decoded,
            final_metric,
            corrected_errors: final_metric,
            end_state,
        })
    }
}

/// Survivor path: the history handle, the state reached and the accumulated distance.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Path {
    state: usize,
    distance: usize,
    /// Position of this path's history among all survivors, in lexicographic order
    rank: usize,
    /// Last node of the input history in the arena, `None` for the empty history
    history: Option<usize>,
}

#[derive(Debug, Clone, Copy)]
struct Candidate {
    state: usize,
    distance: usize,
    parent_rank: usize,
    parent: Option<usize>,
    bit: bool,
}

impl Candidate {
    /// Ordering key: distance, then input history
    fn key(&self) -> (usize, usize, bool) {
        (self.distance, self.parent_rank, self.bit)
    }
}

#[derive(Debug, Clone, Copy)]
struct HistoryNode {
    parent: Option<usize>,
    bit: bool,
}

/// Decoder meta-state between two trellis steps.
struct Trellis<'a> {
    fsa: &'a Fsa,
    survivors: Vec<Path>,
    arena: Vec<HistoryNode>,
    depth: usize,
    #[cfg_attr(not(feature = "parallel"), allow(dead_code))]
    parallel_min_states: usize,
}

impl<'a> Trellis<'a> {
    fn new(fsa: &'a Fsa, config: &DecoderConfig) -> Self {
        Self {
            fsa,
            survivors: vec![Path {
                state: fsa.start_state().index(),
                distance: 0,
                rank: 0,
                history: None,
            }],
            arena: Vec::new(),
            depth: 0,
            parallel_min_states: config.parallel_min_states,
        }
    }

    /// Consumes one received block: extension followed by survivor selection.
    fn step(&mut self, block: &BitsRef) {
        let candidates = self.extend(block);
        self.prune(candidates);
        self.depth += 1;

        if log_enabled!(Level::Trace) {
            let best = self.survivors.iter().map(|p| p.distance).min();
            trace!(
                "trellis depth {}: {} survivors, best metric {:?}",
                self.depth,
                self.survivors.len(),
                best
            );
        }
    }

    fn spawn(&self, path: &Path, block: &BitsRef) -> [Candidate; 2] {
        [false, true].map(|bit| {
            let transition = self.fsa.transition_at(path.state, bit);
            Candidate {
                state: transition.next_state.index(),
                distance: path.distance + count_differences(&transition.output, block),
                parent_rank: path.rank,
                parent: path.history,
                bit,
            }
        })
    }

    /// Every survivor spawns one candidate per input bit.
    fn extend(&self, block: &BitsRef) -> Vec<Candidate> {
        #[cfg(feature = "parallel")]
        if self.survivors.len() >= self.parallel_min_states {
            return self
                .survivors
                .par_iter()
                .flat_map_iter(|path| self.spawn(path, block))
                .collect();
        }

        self.survivors
            .iter()
            .flat_map(|path| self.spawn(path, block))
            .collect()
    }

    /// Keeps the best candidate per state and re-ranks the survivors in history order.
    fn prune(&mut self, candidates: Vec<Candidate>) {
        let mut best: Vec<Option<Candidate>> = vec![None; self.fsa.num_states()];
        for candidate in candidates {
            let replace = match &best[candidate.state] {
                Some(current) => candidate.key() < current.key(),
                None => true,
            };
            if replace {
                best[candidate.state] = Some(candidate);
            }
        }

        let mut winners: Vec<Candidate> = best.into_iter().flatten().collect();
        winners.sort_unstable_by_key(|c| (c.parent_rank, c.bit));

        let mut survivors = Vec::with_capacity(winners.len());
        for (rank, winner) in winners.into_iter().enumerate() {
            self.arena.push(HistoryNode {
                parent: winner.parent,
                bit: winner.bit,
            });
            survivors.push(Path {
                state: winner.state,
                distance: winner.distance,
                rank,
                history: Some(self.arena.len() - 1),
            });
        }
        self.survivors = survivors;
    }

    /// Walks the arena back from `node` and returns the history in input order.
    fn history(&self, mut node: Option<usize>) -> Bits {
        let mut reversed = Vec::with_capacity(self.depth);
        while let Some(index) = node {
            let entry = self.arena[index];
            reversed.push(entry.bit);
            node = entry.parent;
        }
        reversed.into_iter().rev().collect()
    }

    /// Selects the globally cheapest survivor; ties go to the smallest history.
    fn finish(self) -> (Bits, usize, State) {
        let memory = self.fsa.memory();
        match self.survivors.iter().min_by_key(|p| (p.distance, p.rank)) {
            Some(best) => {
                let end_state = State::from_index(best.state, memory)
                    .unwrap_or_else(|| State::zero(memory));
                (self.history(best.history), best.distance, end_state)
            }
            None => (Bits::new(), 0, State::zero(memory)),
        }
    }
}
