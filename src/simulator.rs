//! Simulated reachability check.
//!
//! Nothing here touches the network. Each check waits a random delay and
//! then reports a random latency or a failure, purely to animate the list.
//! The random source is injectable so callers can seed it.

use crate::config::SimulationConfig;
use crate::session::PingState;

use parking_lot::Mutex;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::ops::Range;
use std::time::Duration;

/// Outcome of one simulated check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PingOutcome {
    /// Simulated latency in milliseconds.
    Success(u32),
    Failed,
}

impl From<PingOutcome> for PingState {
    fn from(outcome: PingOutcome) -> Self {
        match outcome {
            PingOutcome::Success(ms) => PingState::Success(ms),
            PingOutcome::Failed => PingState::Failed,
        }
    }
}

/// A sampled check: how long to wait and what to report afterwards.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SimulatedProbe {
    pub delay: Duration,
    pub outcome: PingOutcome,
}

/// Randomised stand-in for a connectivity probe.
pub struct ReachabilitySimulator<R = StdRng> {
    config: SimulationConfig,
    rng: Mutex<R>,
}

impl ReachabilitySimulator<StdRng> {
    /// Create a simulator seeded from the operating system.
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_rng(config, StdRng::from_os_rng())
    }

    /// Create a simulator with a fixed seed, for reproducible runs.
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> ReachabilitySimulator<R> {
    /// Create a simulator drawing from the given random source.
    pub fn with_rng(config: SimulationConfig, rng: R) -> Self {
        Self {
            config,
            rng: Mutex::new(rng),
        }
    }

    pub fn config(&self) -> &SimulationConfig {
        &self.config
    }

    /// Sample one check without waiting.
    pub fn draw(&self) -> SimulatedProbe {
        let mut rng = self.rng.lock();
        let delay = sample(&mut *rng, &self.config.delay_ms);
        let probability = success_probability(self.config.success_probability);
        let outcome = if rng.random_bool(probability) {
            PingOutcome::Success(sample(&mut *rng, &self.config.latency_ms))
        } else {
            PingOutcome::Failed
        };
        SimulatedProbe {
            delay: Duration::from_millis(delay),
            outcome,
        }
    }

    /// Wait the sampled delay, then report the sampled outcome.
    pub async fn simulate(&self) -> PingOutcome {
        let probe = self.draw();
        tokio::time::sleep(probe.delay).await;
        probe.outcome
    }
}

// Degenerate ranges collapse to their start instead of panicking.
// Non-finite probabilities never succeed.
fn success_probability(p: f64) -> f64 {
    if p.is_finite() {
        p.clamp(0.0, 1.0)
    } else {
        0.0
    }
}

fn sample<R, T>(rng: &mut R, range: &Range<T>) -> T
where
    R: Rng,
    T: rand::distr::uniform::SampleUniform + PartialOrd + Copy,
{
    if range.start < range.end {
        rng.random_range(range.clone())
    } else {
        range.start
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_outcome_distribution() {
        let simulator = ReachabilitySimulator::with_seed(SimulationConfig::default(), 7);
        let trials = 5000;
        let mut successes = 0;

        for _ in 0..trials {
            let probe = simulator.draw();
            let delay = probe.delay.as_millis();
            assert!((500..2500).contains(&delay), "delay {} out of range", delay);
            if let PingOutcome::Success(ms) = probe.outcome {
                assert!((50..450).contains(&ms), "latency {} out of range", ms);
                successes += 1;
            }
        }

        let rate = successes as f64 / trials as f64;
        assert!((rate - 0.7).abs() < 0.05, "success rate {}", rate);
    }

    #[test]
    fn test_same_seed_same_sequence() {
        let a = ReachabilitySimulator::with_seed(SimulationConfig::default(), 42);
        let b = ReachabilitySimulator::with_seed(SimulationConfig::default(), 42);
        for _ in 0..50 {
            assert_eq!(a.draw(), b.draw());
        }
    }

    #[test]
    fn test_certain_failure_and_degenerate_ranges() {
        let config = SimulationConfig {
            delay_ms: 10..10,
            success_probability: 0.0,
            latency_ms: 50..450,
        };
        let simulator = ReachabilitySimulator::with_seed(config, 1);
        let probe = simulator.draw();
        assert_eq!(probe.delay, Duration::from_millis(10));
        assert_eq!(probe.outcome, PingOutcome::Failed);
    }

    #[test]
    fn test_probability_is_clamped() {
        let config = SimulationConfig {
            success_probability: 3.0,
            ..SimulationConfig::default()
        };
        let simulator = ReachabilitySimulator::with_seed(config, 1);
        assert!(matches!(simulator.draw().outcome, PingOutcome::Success(_)));
    }

    #[test]
    fn test_non_finite_probability_always_fails() {
        for p in [f64::NAN, f64::INFINITY, f64::NEG_INFINITY] {
            let config = SimulationConfig {
                success_probability: p,
                ..SimulationConfig::default()
            };
            let simulator = ReachabilitySimulator::with_seed(config, 1);
            for _ in 0..20 {
                assert_eq!(simulator.draw().outcome, PingOutcome::Failed);
            }
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_simulate_waits_for_delay() {
        let config = SimulationConfig {
            delay_ms: 800..801,
            success_probability: 1.0,
            latency_ms: 100..101,
        };
        let simulator = ReachabilitySimulator::with_seed(config, 3);
        let start = tokio::time::Instant::now();
        let outcome = simulator.simulate().await;
        assert_eq!(outcome, PingOutcome::Success(100));
        assert!(start.elapsed() >= Duration::from_millis(800));
    }
}
