//! The problem-specific side of a run.

use rand::RngCore;

use crate::population::observer::Snapshot;
use crate::population::organism::Organism;

/// A problem definition the population evolves against.
///
/// All domain knowledge lives here; [`Organism`] only knows about vectors of floats. The
/// declared bounds are used by the population for every mutation and nudge, so they should
/// be chosen for the scale of the problem.
pub trait Strategy {
    /// The minimum value any gene can have.
    fn min_gene_value(&self) -> f64;

    /// The maximum value any gene can have.
    fn max_gene_value(&self) -> f64;

    /// Starting size of the perturbation applied when a stagnant population is nudged.
    fn max_nudge_amount(&self) -> f64;

    /// Length of every organism's gene vector.
    fn num_genes(&self) -> usize;

    /// One-time preprocessing before any organism is spawned.
    fn setup(&mut self) {}

    /// Creates a valid first-generation organism.
    fn spawn(&mut self, rng: &mut dyn RngCore) -> Organism;

    /// How good an organism is. Higher is better and only relative values matter, so a
    /// distance metric can simply be negated. Must not return NaN.
    fn fitness(&self, organism: &Organism) -> f64;

    /// Checked once per generation, after the population has been sorted.
    fn is_done(&self, population: &Snapshot) -> bool;
}

/// Maps an organism's genes back into the problem domain. Never consulted while evolving.
pub trait Synthesize {
    type Output;

    fn synthesize(&self, organism: &Organism) -> Self::Output;
}
