use tracing::info;

use crate::population::organism::Organism;

/// A read-only view of a population between generations.
#[derive(Debug, Clone, Copy)]
pub struct Snapshot<'a> {
    pub members: &'a [Organism],
    pub generation_number: usize,
    pub generations_without_change: usize,
    pub nudge_count: usize,
    pub nudge_rate: f64,
    pub max_nudge_amount: f64,
}

impl<'a> Snapshot<'a> {
    pub fn best(&self) -> Option<&'a Organism> {
        self.members.first()
    }

    pub fn worst(&self) -> Option<&'a Organism> {
        self.members.last()
    }

    pub fn best_fitness(&self) -> f64 {
        self.best().map_or(f64::NAN, Organism::fitness)
    }

    pub fn worst_fitness(&self) -> f64 {
        self.worst().map_or(f64::NAN, Organism::fitness)
    }
}

/// Hooks a population calls at fixed points of a run. Observers only look; they never get
/// mutable access to the population.
pub trait Observer {
    fn on_populate(&mut self, _population: &Snapshot) {}

    fn after_generation(&mut self, _population: &Snapshot) {}

    fn on_finish(&mut self, _population: &Snapshot) {}
}

/// The default observer: logs the best organism every `report_interval` generations and a
/// final report when the run ends.
#[derive(Debug, Clone, Default)]
pub struct LogObserver {
    pub report_interval: usize,
}

impl LogObserver {
    pub fn new(report_interval: usize) -> LogObserver {
        LogObserver { report_interval }
    }

    /// True on every `report_interval`-th generation; never when the interval is `0`.
    pub fn should_report(&self, population: &Snapshot) -> bool {
        self.report_interval > 0 && population.generation_number % self.report_interval == 0
    }
}

impl Observer for LogObserver {
    fn after_generation(&mut self, population: &Snapshot) {
        if self.should_report(population) {
            info!(
                generation = population.generation_number,
                best_fitness = population.best_fitness(),
                genes = ?population.best().map(Organism::genes),
                "generation report"
            );
        }
    }

    fn on_finish(&mut self, population: &Snapshot) {
        info!(
            generation = population.generation_number,
            best_fitness = population.best_fitness(),
            worst_fitness = population.worst_fitness(),
            "finished at generation {}",
            population.generation_number
        );
    }
}
