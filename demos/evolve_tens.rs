use floatga::{GeneticAlgorithm, Organism, Snapshot, Strategy, Synthesize};

use rand::RngCore;
use tracing_subscriber::EnvFilter;

// Evolves an array of random floats into an array of perfect 10's.
struct Tens {
    num_genes: usize,
}

impl Strategy for Tens {
    fn min_gene_value(&self) -> f64 {
        0.0
    }

    fn max_gene_value(&self) -> f64 {
        10.0
    }

    fn max_nudge_amount(&self) -> f64 {
        5.0
    }

    fn num_genes(&self) -> usize {
        self.num_genes
    }

    fn spawn(&mut self, rng: &mut dyn RngCore) -> Organism {
        Organism::random(self.num_genes, 0.0, 10.0, rng)
    }

    // perfect organisms score 10 per gene
    fn fitness(&self, organism: &Organism) -> f64 {
        organism.genes().iter().sum()
    }

    fn is_done(&self, population: &Snapshot) -> bool {
        population.best_fitness() > 10.0 * self.num_genes as f64 - 1.0
    }
}

impl Synthesize for Tens {
    type Output = Vec<String>;

    fn synthesize(&self, organism: &Organism) -> Vec<String> {
        organism.genes().iter().map(|g| format!("{g:.3}")).collect()
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let mut ga = GeneticAlgorithm::from_parameters(
        "demos/parameters/evolve_tens.yaml",
        Tens { num_genes: 10 },
    )?;

    println!("Number of organisms at init: {}", ga.params().population.population_size);
    let summary = ga.evolve()?;
    println!(
        "Finished at generation {} with fitness {:.3} (worst {:.3})",
        summary.generation, summary.best_fitness, summary.worst_fitness
    );

    if let Some(genes) = ga.synthesize_champion() {
        println!("champion: {}", genes.join(", "));
    }

    Ok(())
}
