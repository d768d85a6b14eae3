pub mod observer;
pub mod organism;
pub mod population_params;

use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use tracing::{debug, instrument, trace};

use crate::error::GaError;
use crate::population::observer::{LogObserver, Observer, Snapshot};
use crate::population::organism::Organism;
use crate::population::population_params::PopulationParams;
use crate::strategy::Strategy;

/// Multiplier applied to the nudge rate and nudge amount after every nudge event, so the
/// population can eventually settle.
pub const NUDGE_DECAY: f64 = 0.99;

/// Outcome of a finished run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunSummary {
    pub generation: usize,
    pub best_fitness: f64,
    pub worst_fitness: f64,
}

// counters and decaying values that change while the population evolves
#[derive(Debug, Clone)]
struct RunState {
    generation_number: usize,
    generations_without_change: usize,
    nudge_count: usize,
    nudge_rate: f64,
    max_nudge_amount: f64,
}

impl RunState {
    fn new(nudge_rate: f64, max_nudge_amount: f64) -> RunState {
        RunState {
            generation_number: 0,
            generations_without_change: 0,
            nudge_count: 0,
            nudge_rate,
            max_nudge_amount,
        }
    }

    fn snapshot<'a>(&self, members: &'a [Organism]) -> Snapshot<'a> {
        Snapshot {
            members,
            generation_number: self.generation_number,
            generations_without_change: self.generations_without_change,
            nudge_count: self.nudge_count,
            nudge_rate: self.nudge_rate,
            max_nudge_amount: self.max_nudge_amount,
        }
    }
}

/// A group of organisms that evolves over time against a [`Strategy`].
///
/// Members are kept sorted best-first after every scoring pass. All randomness is drawn
/// from `R`, so a seeded generator gives a reproducible run.
pub struct Population<S, R = StdRng> {
    strategy: S,
    params: PopulationParams,
    members: Vec<Organism>,
    rng: R,
    observer: Box<dyn Observer>,
    notify: Option<Box<dyn FnMut(&Snapshot)>>,
    min_gene_value: f64,
    max_gene_value: f64,
    state: RunState,
}

impl<S: Strategy> Population<S, StdRng> {
    pub fn new(strategy: S, params: &PopulationParams) -> Result<Self, GaError> {
        Self::with_rng(strategy, params, StdRng::from_entropy())
    }

    pub fn seeded(strategy: S, params: &PopulationParams, seed: u64) -> Result<Self, GaError> {
        Self::with_rng(strategy, params, StdRng::seed_from_u64(seed))
    }
}

impl<S: Strategy, R: RngCore> Population<S, R> {
    /// Builds an empty population. Runs the strategy's `setup` and checks the parameters
    /// and declared gene bounds; call [`populate`](Self::populate) or [`run`](Self::run)
    /// afterwards.
    pub fn with_rng(mut strategy: S, params: &PopulationParams, rng: R) -> Result<Self, GaError> {
        let params = params.normalized()?;
        strategy.setup();

        let min_gene_value = strategy.min_gene_value();
        let max_gene_value = strategy.max_gene_value();
        let max_nudge_amount = strategy.max_nudge_amount();

        if !min_gene_value.is_finite() || !max_gene_value.is_finite() {
            return Err(GaError::invalid(format!(
                "gene bounds [{min_gene_value}, {max_gene_value}] must be finite"
            )));
        }
        if min_gene_value > max_gene_value {
            return Err(GaError::invalid(format!(
                "gene bounds [{min_gene_value}, {max_gene_value}] are empty"
            )));
        }
        if !max_nudge_amount.is_finite() || max_nudge_amount < 0.0 {
            return Err(GaError::invalid(format!(
                "max nudge amount must be finite and non-negative, got: {max_nudge_amount}"
            )));
        }
        if strategy.num_genes() == 0 {
            return Err(GaError::invalid("organisms need at least one gene"));
        }

        let state = RunState::new(params.nudge.rate, max_nudge_amount);
        let observer = Box::new(LogObserver::new(params.report_interval));

        Ok(Population {
            strategy,
            params,
            members: Vec::new(),
            rng,
            observer,
            notify: None,
            min_gene_value,
            max_gene_value,
            state,
        })
    }

    /// Replaces the default logging observer.
    pub fn set_observer(&mut self, observer: Box<dyn Observer>) {
        self.observer = observer;
    }

    pub fn with_observer(mut self, observer: impl Observer + 'static) -> Self {
        self.set_observer(Box::new(observer));
        self
    }

    /// Called with the finished population instead of the observer's final report.
    /// Per-generation reporting is left to the observer.
    pub fn set_notify(&mut self, notify: impl FnMut(&Snapshot) + 'static) {
        self.notify = Some(Box::new(notify));
    }

    pub fn with_notify(mut self, notify: impl FnMut(&Snapshot) + 'static) -> Self {
        self.set_notify(notify);
        self
    }

    pub fn members(&self) -> &[Organism] {
        &self.members
    }

    pub fn champion(&self) -> Option<&Organism> {
        self.members.first()
    }

    pub fn strategy(&self) -> &S {
        &self.strategy
    }

    /// The effective parameters, after size and turnover coercion.
    pub fn params(&self) -> &PopulationParams {
        &self.params
    }

    pub fn generation_number(&self) -> usize {
        self.state.generation_number
    }

    pub fn generations_without_change(&self) -> usize {
        self.state.generations_without_change
    }

    pub fn nudge_count(&self) -> usize {
        self.state.nudge_count
    }

    pub fn nudge_rate(&self) -> f64 {
        self.state.nudge_rate
    }

    pub fn max_nudge_amount(&self) -> f64 {
        self.state.max_nudge_amount
    }

    pub fn snapshot(&self) -> Snapshot<'_> {
        self.state.snapshot(&self.members)
    }

    /// Populates and evolves until the strategy is done or the generation cap is passed.
    pub fn run(&mut self) -> Result<RunSummary, GaError> {
        self.state = RunState::new(self.params.nudge.rate, self.strategy.max_nudge_amount());
        self.populate()?;

        let max_generations = self.params.max_generations;
        while (max_generations == 0 || self.state.generation_number <= max_generations)
            && !self.strategy.is_done(&self.snapshot())
        {
            self.state.generation_number += 1;
            self.run_generation()?;
            self.after_each_generation();
        }

        Ok(self.finish())
    }

    /// Creates the initial population and sorts it, ready for its first generation.
    #[instrument(level = "debug", skip(self), fields(population_size = self.params.population_size))]
    pub fn populate(&mut self) -> Result<(), GaError> {
        let num_genes = self.strategy.num_genes();
        let mut members = Vec::with_capacity(self.params.population_size);

        for _ in 0..self.params.population_size {
            let organism = self.strategy.spawn(&mut self.rng);
            if organism.len() != num_genes {
                return Err(GaError::invalid(format!(
                    "spawned an organism of {} genes, expected {num_genes}",
                    organism.len()
                )));
            }
            members.push(organism);
        }

        self.members = members;
        self.sort_population();

        let snapshot = self.state.snapshot(&self.members);
        self.observer.on_populate(&snapshot);
        Ok(())
    }

    /// Drops the worst organisms, breeds replacements from the best survivors, randomly
    /// mutates, and nudges the population if the top fitness has been stuck too long.
    pub fn run_generation(&mut self) -> Result<(), GaError> {
        if self.members.len() != self.params.population_size {
            return Err(GaError::invalid("population has not been populated"));
        }
        let previous_top_fitness = self.members[0].fitness();

        let num_to_drop = self.params.num_to_drop();
        let num_to_keep = self.members.len() - num_to_drop;

        // parents are read in place, so with turnover above one half the later pairs may
        // already be offspring of this generation
        let mut parent_index = 0;
        for i in (num_to_keep..self.members.len() - 1).step_by(2) {
            let (first, second) = self.members[parent_index]
                .crossover(&self.members[parent_index + 1], &mut self.rng)?;
            self.members[i] = first;
            self.members[i + 1] = second;
            parent_index += 2;
        }

        for i in 0..self.members.len() {
            if self.rng.gen::<f64>() < self.params.mutation_rate {
                self.members[i] =
                    self.members[i].mutate(self.min_gene_value, self.max_gene_value, &mut self.rng);
            }
        }

        self.sort_population();

        if self.members[0].fitness() == previous_top_fitness {
            self.state.generations_without_change += 1;
        } else {
            self.state.generations_without_change = 0;
        }

        if self.state.generations_without_change >= self.params.nudge.threshold {
            self.nudge_population();
        }

        trace!(
            generation = self.state.generation_number,
            best_fitness = self.members[0].fitness(),
            generations_without_change = self.state.generations_without_change,
            "generation complete"
        );
        Ok(())
    }

    /// The "natural disaster": shakes a share of the population, then shrinks both the
    /// share and the shake size for next time.
    pub fn nudge_population(&mut self) {
        for i in 0..self.members.len() {
            if self.rng.gen::<f64>() < self.state.nudge_rate {
                self.members[i] = self.members[i].nudge(
                    self.min_gene_value,
                    self.max_gene_value,
                    self.state.max_nudge_amount,
                    self.params.nudge.mutation_rate,
                    &mut self.rng,
                );
            }
        }

        self.state.nudge_rate *= NUDGE_DECAY;
        self.state.max_nudge_amount *= NUDGE_DECAY;
        self.state.nudge_count += 1;
        debug!(
            generation = self.state.generation_number,
            nudge_count = self.state.nudge_count,
            nudge_rate = self.state.nudge_rate,
            max_nudge_amount = self.state.max_nudge_amount,
            "population nudged"
        );

        self.sort_population();
    }

    // scores every organism and sorts best-first, keeping ties in their previous order
    fn sort_population(&mut self) {
        for organism in &mut self.members {
            let fitness = self.strategy.fitness(organism);
            organism.set_fitness(fitness);
        }
        self.members.sort_by(|a, b| b.fitness().total_cmp(&a.fitness()));
    }

    fn after_each_generation(&mut self) {
        let snapshot = self.state.snapshot(&self.members);
        self.observer.after_generation(&snapshot);
    }

    fn finish(&mut self) -> RunSummary {
        let snapshot = self.state.snapshot(&self.members);
        match self.notify.as_mut() {
            Some(notify) => notify(&snapshot),
            None => self.observer.on_finish(&snapshot),
        }

        RunSummary {
            generation: snapshot.generation_number,
            best_fitness: snapshot.best_fitness(),
            worst_fitness: snapshot.worst_fitness(),
        }
    }
}
