//! Scenario runner for batches of independent simulations
//!
//! Each simulation is pure, so a batch is spread across the rayon pool and
//! results come back in input order.

use rayon::prelude::*;

use crate::config::AppConfig;
use crate::error::Result;
use crate::input::ComputeRequest;
use crate::simulation::{MonthlySummary, SimulationInput};

/// Runs many rate-path scenarios against one configuration
///
/// # Example
/// ```ignore
/// let runner = ScenarioRunner::new(AppConfig::from_env());
/// let results = runner.run_requests(&[hold, cut, hike])?;
/// ```
#[derive(Debug, Clone)]
pub struct ScenarioRunner {
    config: AppConfig,
}

impl ScenarioRunner {
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    pub fn run(&self, input: &SimulationInput) -> Vec<MonthlySummary> {
        input.run()
    }

    /// Run already-resolved inputs in parallel
    pub fn run_batch(&self, inputs: &[SimulationInput]) -> Vec<Vec<MonthlySummary>> {
        inputs.par_iter().map(SimulationInput::run).collect()
    }

    /// Resolve every request first, then run them; any bad request fails the batch
    pub fn run_requests(&self, requests: &[ComputeRequest]) -> Result<Vec<Vec<MonthlySummary>>> {
        let inputs = requests
            .iter()
            .map(|r| r.to_input(&self.config))
            .collect::<Result<Vec<_>>>()?;
        Ok(self.run_batch(&inputs))
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }
}

impl Default for ScenarioRunner {
    fn default() -> Self {
        Self::new(AppConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::RateText;
    use crate::simulation::AdjustmentMagnitudes;

    fn flat_input(base: f64) -> SimulationInput {
        SimulationInput {
            base_rate_pct: base,
            events: vec![],
            adjustments: AdjustmentMagnitudes::default(),
            year: 2026,
        }
    }

    #[test]
    fn test_batch_preserves_order() {
        let runner = ScenarioRunner::default();
        let inputs: Vec<_> = [3.0, 4.0, 5.0, 6.0].iter().map(|&b| flat_input(b)).collect();

        let results = runner.run_batch(&inputs);
        assert_eq!(results.len(), 4);
        for (input, result) in inputs.iter().zip(&results) {
            assert_eq!(result, &runner.run(input));
            assert_eq!(result[0].avg_rate, input.base_rate_pct);
        }
    }

    #[test]
    fn test_bad_request_fails_whole_batch() {
        let runner = ScenarioRunner::default();
        let good = ComputeRequest { effr: Some(Some(RateText::from("5%"))), ..Default::default() };
        let bad = ComputeRequest { effr: Some(Some(RateText::from("n/a"))), ..Default::default() };

        assert!(runner.run_requests(&[good.clone()]).is_ok());
        assert!(runner.run_requests(&[good, bad]).is_err());
    }
}
