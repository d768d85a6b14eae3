//! A small genetic algorithm over vectors of floats.
//!
//! Supply a [`Strategy`] that knows how to spawn and score organisms for your problem, pick
//! some [`PopulationParams`], and let a [`Population`] evolve until the strategy is satisfied.

pub mod error;
pub mod rng;
pub mod strategy;

/// The evolving population and everything it is made of
pub mod population;

pub use error::GaError;
pub use population::observer::{LogObserver, Observer, Snapshot};
pub use population::organism::Organism;
pub use population::population_params::{NudgeParams, PopulationParams};
pub use population::{Population, RunSummary};
pub use strategy::{Strategy, Synthesize};

use serde::{Deserialize, Serialize};
use tracing::debug;

use std::fs;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GaParams {
    /// Seed for a reproducible run; fresh entropy when absent.
    pub seed: Option<u64>,
    pub population: PopulationParams,
}

pub struct GeneticAlgorithm<S: Strategy> {
    population: Population<S>,
    params: GaParams,
}

impl<S: Strategy> GeneticAlgorithm<S> {
    pub fn new(params: GaParams, strategy: S) -> Result<GeneticAlgorithm<S>, GaError> {
        let population = match params.seed {
            Some(seed) => Population::seeded(strategy, &params.population, seed)?,
            None => Population::new(strategy, &params.population)?,
        };

        Ok(GeneticAlgorithm { population, params })
    }

    pub fn from_parameters(
        parameter_path: &str,
        strategy: S,
    ) -> Result<GeneticAlgorithm<S>, GaError> {
        let params = Self::read_parameter_file(parameter_path)?;
        Self::new(params, strategy)
    }

    pub fn evolve(&mut self) -> Result<RunSummary, GaError> {
        self.population.run()
    }

    pub fn get_champion(&self) -> Option<&Organism> {
        self.population.champion()
    }

    pub fn synthesize_champion(&self) -> Option<S::Output>
    where
        S: Synthesize,
    {
        self.get_champion()
            .map(|champion| self.population.strategy().synthesize(champion))
    }

    pub fn params(&self) -> &GaParams {
        &self.params
    }

    pub fn population(&self) -> &Population<S> {
        &self.population
    }

    pub fn population_mut(&mut self) -> &mut Population<S> {
        &mut self.population
    }

    pub fn number_of_organisms(&self) -> usize {
        self.population.members().len()
    }

    fn read_parameter_file(path_string: &str) -> Result<GaParams, GaError> {
        let yaml_string =
            fs::read_to_string(path_string).map_err(|source| GaError::ReadParameters {
                path: path_string.to_string(),
                source,
            })?;
        debug!(path = path_string, "read parameter file");

        Self::parse_parameter_yaml(&yaml_string)
    }

    pub fn parse_parameter_yaml(fstring: &str) -> Result<GaParams, GaError> {
        let params: GaParams = serde_yml::from_str(fstring)?;

        Ok(params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::strategy::test_strategies::SumOfGenes;
    use rstest::*;

    #[fixture]
    fn pstring() -> &'static str {
        r#"
        seed: 17

        population:
          population_size: 12
          turnover_rate: 0.5
          mutation_rate: 0.3
          max_generations: 2000

          nudge:
            threshold: 4
            rate: 0.25
            mutation_rate: 0.2
        "#
    }

    #[rstest]
    fn test_parse_parameter_string(pstring: &str) {
        let t = GeneticAlgorithm::<SumOfGenes>::parse_parameter_yaml(pstring).unwrap();

        assert_eq!(t.seed, Some(17));
        assert_eq!(t.population.population_size, 12);
        assert_eq!(t.population.nudge.threshold, 4);
        assert_eq!(t.population.nudge.rate, 0.25);
        // omitted fields fall back to the defaults
        assert_eq!(t.population.report_interval, 0);
    }

    #[test]
    fn test_parse_partial_parameters() {
        let yaml = "population:\n  mutation_rate: 0.1\n";
        let t = GeneticAlgorithm::<SumOfGenes>::parse_parameter_yaml(yaml).unwrap();

        assert_eq!(t.seed, None);
        assert_eq!(t.population.mutation_rate, 0.1);
        assert_eq!(t.population.nudge, NudgeParams::new());
    }

    #[test]
    fn test_parse_rejects_garbage() {
        let result = GeneticAlgorithm::<SumOfGenes>::parse_parameter_yaml("population: [1, 2");
        assert!(matches!(result, Err(GaError::ParseParameters(_))));
    }

    #[test]
    fn test_missing_parameter_file() {
        let result = GeneticAlgorithm::from_parameters("no/such/params.yaml", SumOfGenes::new());
        assert!(matches!(result, Err(GaError::ReadParameters { .. })));
    }

    #[rstest]
    fn test_evolve_from_parameters(pstring: &str) {
        let params = GeneticAlgorithm::<SumOfGenes>::parse_parameter_yaml(pstring).unwrap();
        let mut ga = GeneticAlgorithm::new(params, SumOfGenes::new()).unwrap();

        let summary = ga.evolve().unwrap();

        assert_eq!(ga.number_of_organisms(), 12);
        assert!(summary.best_fitness > 49.0);
        assert_eq!(ga.get_champion().unwrap().fitness(), summary.best_fitness);
        assert_eq!(ga.synthesize_champion().unwrap().split(' ').count(), 5);
    }
}
