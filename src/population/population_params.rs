use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::GaError;
use crate::rng::make_even;

/// We can't respawn more than half the population by pairing up survivors, so turnover
/// never goes below this.
pub const MIN_TURNOVER_RATE: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PopulationParams {
    /// How many organisms exist at once. Rounded down to an even number.
    pub population_size: usize,
    /// Fraction of organisms that die and are reborn each generation.
    pub turnover_rate: f64,
    /// Chance that any organism mutates in a generation.
    pub mutation_rate: f64,
    /// Generation cap; `0` runs until the strategy is done.
    pub max_generations: usize,
    /// Log the best organism every this many generations; `0` disables it.
    pub report_interval: usize,
    pub nudge: NudgeParams,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct NudgeParams {
    /// Generations with no change in the top fitness before the population is nudged.
    pub threshold: usize,
    /// Roughly the fraction of organisms nudged per nudge event. Decays after each event.
    pub rate: f64,
    /// Chance of each gene in a nudged organism being shaken.
    pub mutation_rate: f64,
}

impl PopulationParams {
    pub fn new() -> PopulationParams {
        PopulationParams {
            population_size: 20,
            turnover_rate: 0.4,
            mutation_rate: 0.4,
            max_generations: 1000,
            report_interval: 0,
            nudge: NudgeParams::new(),
        }
    }

    pub fn get_test_params() -> PopulationParams {
        PopulationParams {
            population_size: 8,
            turnover_rate: 0.5,
            mutation_rate: 0.0,
            max_generations: 50,
            report_interval: 0,
            nudge: NudgeParams {
                threshold: 3,
                rate: 1.0,
                mutation_rate: 0.5,
            },
        }
    }

    /// Checks the parameters and applies the size and turnover coercions.
    pub(crate) fn normalized(&self) -> Result<PopulationParams, GaError> {
        let mut params = self.clone();

        params.population_size = make_even(self.population_size);
        if params.population_size != self.population_size {
            debug!(
                requested = self.population_size,
                effective = params.population_size,
                "population size rounded down to even"
            );
        }
        if params.population_size == 0 {
            return Err(GaError::invalid(format!(
                "population size {} leaves no room for breeding pairs",
                self.population_size
            )));
        }

        check_rate("turnover_rate", self.turnover_rate)?;
        check_rate("mutation_rate", self.mutation_rate)?;
        check_rate("nudge.rate", self.nudge.rate)?;
        check_rate("nudge.mutation_rate", self.nudge.mutation_rate)?;

        params.turnover_rate = self.turnover_rate.max(MIN_TURNOVER_RATE);
        if params.num_to_drop() == 0 {
            return Err(GaError::invalid(format!(
                "turnover {} of {} organisms breeds no offspring",
                params.turnover_rate, params.population_size
            )));
        }

        Ok(params)
    }

    pub(crate) fn num_to_drop(&self) -> usize {
        make_even((self.turnover_rate * self.population_size as f64) as usize)
    }
}

impl NudgeParams {
    pub fn new() -> NudgeParams {
        NudgeParams {
            threshold: 2,
            rate: 0.2,
            mutation_rate: 0.1,
        }
    }
}

impl Default for PopulationParams {
    fn default() -> Self {
        Self::new()
    }
}

impl Default for NudgeParams {
    fn default() -> Self {
        Self::new()
    }
}

fn check_rate(name: &str, value: f64) -> Result<(), GaError> {
    if !(0.0..=1.0).contains(&value) {
        return Err(GaError::invalid(format!(
            "{name} must be between 0.0 and 1.0, got: {value}"
        )));
    }
    Ok(())
}
