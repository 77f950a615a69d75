use std::collections::VecDeque;

/// Source of uniform integers, injected into the session so draws can be
/// seeded or scripted.
///
/// Label draws reject repeats, so a source stuck on one value only gets a
/// bounded number of retries before the draw falls back to a fixed order.
pub trait RandomSource {
    /// Uniform integer in the closed range `lo..=hi`
    fn uniform(&mut self, lo: u32, hi: u32) -> u32;
}

impl<R: RandomSource + ?Sized> RandomSource for Box<R> {
    fn uniform(&mut self, lo: u32, hi: u32) -> u32 {
        (**self).uniform(lo, hi)
    }
}

/// Small PCG-style generator, seeded from the OS when no seed is given
#[derive(Debug, Clone)]
pub struct SimpleRng {
    state: u64,
}

impl Default for SimpleRng {
    fn default() -> Self {
        Self::new()
    }
}

impl SimpleRng {
    pub fn new() -> Self {
        let mut seed_bytes = [0u8; 8];
        getrandom::getrandom(&mut seed_bytes).unwrap_or_else(|_| {
            // Fallback: use a static counter if getrandom fails
            static COUNTER: std::sync::atomic::AtomicU64 = std::sync::atomic::AtomicU64::new(1);
            let counter = COUNTER.fetch_add(1, std::sync::atomic::Ordering::Relaxed);
            seed_bytes = counter.to_le_bytes();
        });
        Self::with_seed(u64::from_le_bytes(seed_bytes))
    }

    pub fn with_seed(seed: u64) -> Self {
        Self {
            state: seed.wrapping_add(1),
        }
    }

    fn next_u64(&mut self) -> u64 {
        self.state = self
            .state
            .wrapping_mul(6364136223846793005)
            .wrapping_add(1442695040888963407);
        let xorshifted = (((self.state >> 18) ^ self.state) >> 27) as u32;
        let rot = (self.state >> 59) as u32;
        (xorshifted.rotate_right(rot)) as u64
    }
}

impl RandomSource for SimpleRng {
    fn uniform(&mut self, lo: u32, hi: u32) -> u32 {
        if hi <= lo {
            return lo;
        }
        let span = (hi - lo) as u64 + 1;
        lo + (self.next_u64() % span) as u32
    }
}

/// Plays back a fixed list of draws, then continues from a seeded
/// [`SimpleRng`].
///
/// Scripted values outside the requested range are clamped into it.
#[derive(Debug, Clone)]
pub struct ScriptedDraws {
    script: VecDeque<u32>,
    fallback: SimpleRng,
}

impl ScriptedDraws {
    pub fn new(script: impl IntoIterator<Item = u32>) -> Self {
        Self {
            script: script.into_iter().collect(),
            fallback: SimpleRng::with_seed(0),
        }
    }

    pub fn remaining(&self) -> usize {
        self.script.len()
    }
}

impl RandomSource for ScriptedDraws {
    fn uniform(&mut self, lo: u32, hi: u32) -> u32 {
        match self.script.pop_front() {
            Some(v) => v.clamp(lo, hi.max(lo)),
            None => self.fallback.uniform(lo, hi),
        }
    }
}
