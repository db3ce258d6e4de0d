//! Chunk plans for streaming parity checks.
//!
//! Deterministic plans (fixed sizes, splits around markup bytes) plus seeded
//! fuzz plans so CI failures reproduce from the printed label.

use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ChunkPlan {
    /// Consecutive chunks of `size` bytes; the last may be shorter.
    Fixed(usize),
    /// Split before each listed byte offset.
    Boundaries(Vec<usize>),
}

impl ChunkPlan {
    /// Slice `input` according to the plan. Chunks are never empty and
    /// concatenate back to `input`.
    pub fn split<'a>(&self, input: &'a [u8]) -> Vec<&'a [u8]> {
        match self {
            ChunkPlan::Fixed(size) => input.chunks((*size).max(1)).collect(),
            ChunkPlan::Boundaries(indices) => {
                let mut out = Vec::with_capacity(indices.len() + 1);
                let mut start = 0usize;
                for &idx in indices {
                    if idx <= start || idx >= input.len() {
                        continue;
                    }
                    out.push(&input[start..idx]);
                    start = idx;
                }
                if start < input.len() {
                    out.push(&input[start..]);
                }
                out
            }
        }
    }
}

impl fmt::Display for ChunkPlan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChunkPlan::Fixed(size) => write!(f, "fixed size={size}"),
            ChunkPlan::Boundaries(indices) => write!(f, "boundaries {indices:?}"),
        }
    }
}

#[derive(Clone, Debug)]
pub struct ChunkPlanCase {
    pub label: String,
    pub plan: ChunkPlan,
}

/// Build deterministic and seeded fuzz plans for `input`.
pub fn build_chunk_plans(input: &[u8], fuzz_runs: usize, fuzz_seed: u64) -> Vec<ChunkPlanCase> {
    let mut plans = Vec::new();

    for size in [1usize, 2, 3, 4, 8, 16, 32, 64] {
        let plan = ChunkPlan::Fixed(size);
        plans.push(ChunkPlanCase {
            label: plan.to_string(),
            plan,
        });
    }

    let markup = markup_boundaries(input);
    if !markup.is_empty() {
        plans.push(ChunkPlanCase {
            label: format!("markup-boundaries count={}", markup.len()),
            plan: ChunkPlan::Boundaries(markup),
        });
    }

    let candidates: Vec<usize> = (1..input.len()).collect();
    for i in 0..fuzz_runs {
        let seed = fuzz_seed.wrapping_add(i as u64);
        let mut rng = Lcg::new(seed);
        let plan = if candidates.is_empty() {
            ChunkPlan::Fixed(1)
        } else {
            let max = candidates.len().clamp(1, 32);
            let mut picks = candidates.clone();
            rng.shuffle(&mut picks);
            picks.truncate(1 + rng.gen_range(max));
            picks.sort_unstable();
            ChunkPlan::Boundaries(picks)
        };
        plans.push(ChunkPlanCase {
            label: format!("fuzz boundaries seed=0x{seed:016x}"),
            plan,
        });
    }

    plans
}

/// Offsets on both sides of bytes that change scanner state.
fn markup_boundaries(input: &[u8]) -> Vec<usize> {
    let mut out = Vec::new();
    for (i, &byte) in input.iter().enumerate() {
        if matches!(byte, b'<' | b'>' | b'"' | b'\'' | b'=' | b'-' | b'/' | b'!') {
            if i > 0 {
                out.push(i);
            }
            if i + 1 < input.len() {
                out.push(i + 1);
            }
        }
    }
    out.sort_unstable();
    out.dedup();
    out
}

struct Lcg {
    state: u64,
}

impl Lcg {
    fn new(seed: u64) -> Self {
        Self { state: seed }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self.state.wrapping_mul(6364136223846793005).wrapping_add(1);
        self.state
    }

    fn gen_range(&mut self, upper: usize) -> usize {
        if upper == 0 {
            return 0;
        }
        (self.next_u64() >> 32) as usize % upper
    }

    fn shuffle<T>(&mut self, items: &mut [T]) {
        for i in (1..items.len()).rev() {
            let j = self.gen_range(i + 1);
            items.swap(i, j);
        }
    }
}
