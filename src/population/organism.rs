use rand::Rng;
use rand_distr::{Distribution, Uniform};

use crate::error::GaError;
use crate::rng::{clamp, rand2, rand2f};

/// One candidate solution: a fixed-length vector of real-valued genes plus the fitness the
/// population last assigned to it.
///
/// Organisms are immutable. Crossover, mutation and nudging all hand back new organisms and
/// leave the originals untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct Organism {
    genes: Vec<f64>,
    raw_fitness: Option<f64>,
}

impl Organism {
    pub fn new(genes: Vec<f64>) -> Organism {
        Organism {
            genes,
            raw_fitness: None,
        }
    }

    /// An organism with `num_genes` genes drawn uniformly from `[min_value, max_value]`.
    pub fn random<R: Rng + ?Sized>(
        num_genes: usize,
        min_value: f64,
        max_value: f64,
        rng: &mut R,
    ) -> Organism {
        let genes = (0..num_genes)
            .map(|_| rand2f(&mut *rng, min_value, max_value))
            .collect();
        Organism::new(genes)
    }

    pub fn genes(&self) -> &[f64] {
        &self.genes
    }

    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    pub fn get_fitness(&self) -> Option<f64> {
        self.raw_fitness
    }

    /// The last assigned fitness, or `0.0` if it was never scored.
    pub fn fitness(&self) -> f64 {
        self.raw_fitness.unwrap_or(0.0)
    }

    pub fn is_fitness_computed(&self) -> bool {
        self.raw_fitness.is_some()
    }

    pub fn set_fitness(&mut self, fitness: f64) {
        self.raw_fitness = Some(fitness);
    }

    /// Splits both parents at one random point in `[0, len - 1]` and swaps the heads.
    ///
    /// The first child is `other`'s head on `self`'s tail, the second is `self`'s head on
    /// `other`'s tail.
    pub fn crossover<R: Rng + ?Sized>(
        &self,
        other: &Organism,
        rng: &mut R,
    ) -> Result<(Organism, Organism), GaError> {
        self.check_partner(other)?;
        let max_crossover_point = self.genes.len() - 1;
        let point = rand2(rng, 0, max_crossover_point);
        self.crossover_at(other, point)
    }

    /// Crossover with a fixed split point.
    pub fn crossover_at(
        &self,
        other: &Organism,
        point: usize,
    ) -> Result<(Organism, Organism), GaError> {
        self.check_partner(other)?;
        if point >= self.genes.len() {
            return Err(GaError::invalid(format!(
                "crossover point {point} outside organisms of {} genes",
                self.genes.len()
            )));
        }

        let first: Vec<f64> = other.genes[..point]
            .iter()
            .chain(&self.genes[point..])
            .copied()
            .collect();
        let second: Vec<f64> = self.genes[..point]
            .iter()
            .chain(&other.genes[point..])
            .copied()
            .collect();

        Ok((Organism::new(first), Organism::new(second)))
    }

    /// Replaces one randomly chosen gene with a uniform value in `[min_value, max_value]`.
    pub fn mutate<R: Rng + ?Sized>(&self, min_value: f64, max_value: f64, rng: &mut R) -> Organism {
        let mut genes = self.genes.clone();
        if !genes.is_empty() {
            let index = rng.gen_range(0..genes.len());
            genes[index] = rand2f(rng, min_value, max_value);
        }
        Organism::new(genes)
    }

    /// Shakes every gene, with chance `nudge_rate`, by up to `max_nudge` in either direction.
    /// Results are clamped to `[min_value, max_value]`.
    pub fn nudge<R: Rng + ?Sized>(
        &self,
        min_value: f64,
        max_value: f64,
        max_nudge: f64,
        nudge_rate: f64,
        rng: &mut R,
    ) -> Organism {
        let max_nudge = max_nudge.abs();
        let shake: Uniform<f64> = Uniform::new_inclusive(-max_nudge, max_nudge);

        let genes = self
            .genes
            .iter()
            .map(|gene| {
                if rng.gen::<f64>() < nudge_rate {
                    clamp(*gene + shake.sample(&mut *rng), min_value, max_value)
                } else {
                    *gene
                }
            })
            .collect();

        Organism::new(genes)
    }

    fn check_partner(&self, other: &Organism) -> Result<(), GaError> {
        if self.genes.len() != other.genes.len() {
            return Err(GaError::invalid(format!(
                "cannot cross organisms of {} and {} genes",
                self.genes.len(),
                other.genes.len()
            )));
        }
        if self.genes.is_empty() {
            return Err(GaError::invalid("cannot cross organisms without genes"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::*;

    #[fixture]
    fn rng() -> StdRng {
        StdRng::seed_from_u64(42)
    }

    #[fixture]
    fn ones() -> Organism {
        Organism::new(vec![1., 2., 3., 4.])
    }

    #[fixture]
    fn tens() -> Organism {
        Organism::new(vec![10., 20., 30., 40.])
    }

    #[rstest]
    fn test_crossover_at_forced_point(ones: Organism, tens: Organism) {
        let (first, second) = ones.crossover_at(&tens, 2).unwrap();
        assert_eq!(first.genes(), &[10., 20., 3., 4.]);
        assert_eq!(second.genes(), &[1., 2., 30., 40.]);

        // parents are untouched
        assert_eq!(ones.genes(), &[1., 2., 3., 4.]);
        assert_eq!(tens.genes(), &[10., 20., 30., 40.]);
    }

    #[rstest]
    fn test_crossover_splits_once(ones: Organism, tens: Organism, mut rng: StdRng) {
        for _ in 0..200 {
            let (first, second) = ones.crossover(&tens, &mut rng).unwrap();
            assert_eq!(first.len(), 4);
            assert_eq!(second.len(), 4);

            // some split point in [0, 3] must explain both children
            let explained = (0..4).any(|k| {
                let expected = ones.crossover_at(&tens, k).unwrap();
                expected.0 == first && expected.1 == second
            });
            assert!(explained);
        }
    }

    #[rstest]
    fn test_crossover_rejects_mismatched_lengths(ones: Organism, mut rng: StdRng) {
        let short = Organism::new(vec![5., 6.]);
        let result = ones.crossover(&short, &mut rng);
        assert!(matches!(result, Err(GaError::InvalidConfiguration(_))));
    }

    #[rstest]
    fn test_crossover_at_rejects_out_of_range(ones: Organism, tens: Organism) {
        assert!(ones.crossover_at(&tens, 4).is_err());
    }

    #[rstest]
    fn test_mutate_changes_at_most_one_gene(tens: Organism, mut rng: StdRng) {
        for _ in 0..200 {
            let mutated = tens.mutate(0., 10., &mut rng);
            let changed = mutated
                .genes()
                .iter()
                .zip(tens.genes())
                .filter(|(a, b)| a.to_bits() != b.to_bits())
                .count();
            assert!(changed <= 1);
            assert!(!mutated.is_fitness_computed());
        }
    }

    #[rstest]
    fn test_nudge_stays_in_bounds(tens: Organism, mut rng: StdRng) {
        for _ in 0..200 {
            let nudged = tens.nudge(5., 35., 50., 1.0, &mut rng);
            assert!(nudged.genes().iter().all(|g| (5.0..=35.0).contains(g)));
        }
    }

    #[rstest]
    fn test_nudge_with_zero_rate_is_identity(tens: Organism, mut rng: StdRng) {
        let nudged = tens.nudge(0., 100., 5., 0.0, &mut rng);
        assert_eq!(nudged.genes(), tens.genes());
    }

    #[rstest]
    fn test_random_spawn(mut rng: StdRng) {
        let org = Organism::random(5, 0., 10., &mut rng);
        assert_eq!(org.len(), 5);
        assert!(org.genes().iter().all(|g| (0.0..=10.0).contains(g)));
    }

    #[test]
    fn test_fitness_flag() {
        let mut org = Organism::new(vec![1.0]);
        assert_eq!(org.get_fitness(), None);
        assert_eq!(org.fitness(), 0.0);
        org.set_fitness(3.5);
        assert!(org.is_fitness_computed());
        assert_eq!(org.fitness(), 3.5);
    }
}
