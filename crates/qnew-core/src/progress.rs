//! Progress reporting during key generation

use std::fmt;

use tracing::info;

/// Checkpoints reached while generating a key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Phase {
    /// Searching for the primes p and q
    PrimeSearch,
    /// A q was abandoned after every candidate for p failed
    PrimeSearchRestart,
    /// Selecting the subgroup generator g
    Generator,
    /// Drawing x and computing y
    KeyPair,
}

impl Phase {
    /// Human-readable label for this phase.
    pub fn label(&self) -> &'static str {
        match self {
            Phase::PrimeSearch => "p,q",
            Phase::PrimeSearchRestart => "4096 values of p tried",
            Phase::Generator => "h,g",
            Phase::KeyPair => "x,y",
        }
    }
}

impl fmt::Display for Phase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Observer notified at generation checkpoints.
///
/// Implementations only observe; nothing they do feeds back into generation.
pub trait Progress {
    /// Called when generation enters `phase`
    fn report(&self, phase: Phase);
}

/// Silent observer
impl Progress for () {
    fn report(&self, _phase: Phase) {}
}

impl<F> Progress for F
where
    F: Fn(Phase),
{
    fn report(&self, phase: Phase) {
        self(phase)
    }
}

/// Observer that logs each phase through `tracing`
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingProgress;

impl Progress for TracingProgress {
    fn report(&self, phase: Phase) {
        info!(phase = phase.label(), "Key generation progress");
    }
}
