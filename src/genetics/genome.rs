//! Typed collection of genes making up one organism's heritable traits.

use super::gene::Gene;
use rand::Rng;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// The trait kinds a genome can carry, in their canonical order
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum GeneKind {
    /// Number of mutation events applied to an offspring's genome
    MutationRate,
    /// Fraction of energy capacity to keep after paying for reproduction
    ReproduceBehaviour,
    /// Fraction of energy capacity to keep after paying for growth
    GrowBehaviour,
    /// Age past which the organism dies
    AgeCap,
    SizeCap,
    StartingSize,
    SeedRange,
}

impl GeneKind {
    /// Every kind, in canonical order
    pub const ALL: [GeneKind; 7] = [
        GeneKind::MutationRate,
        GeneKind::ReproduceBehaviour,
        GeneKind::GrowBehaviour,
        GeneKind::AgeCap,
        GeneKind::SizeCap,
        GeneKind::StartingSize,
        GeneKind::SeedRange,
    ];

    /// Human-readable name, used as chart legend by front ends
    pub fn label(&self) -> &'static str {
        match self {
            GeneKind::MutationRate => "Mutations in Offspring",
            GeneKind::ReproduceBehaviour => "Reproductive Conservatism",
            GeneKind::GrowBehaviour => "Growth Conservatism",
            GeneKind::AgeCap => "Max Lifespan",
            GeneKind::SizeCap => "Max Size",
            GeneKind::StartingSize => "Offspring Size",
            GeneKind::SeedRange => "Seeding Distance",
        }
    }
}

impl std::fmt::Display for GeneKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Ordered mapping from gene kind to gene.
///
/// `Clone` is a deep copy: genes are owned values, so a cloned genome never
/// shares state with its source.
#[derive(Clone, Debug, Default)]
pub struct Genome {
    genes: BTreeMap<GeneKind, Gene>,
}

impl Genome {
    /// Create an empty genome
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a gene. An existing gene of the same kind is replaced.
    pub fn add_gene(&mut self, kind: GeneKind, gene: Gene) {
        self.genes.insert(kind, gene);
    }

    /// Builder-style variant of [`Genome::add_gene`]
    pub fn with_gene(mut self, kind: GeneKind, gene: Gene) -> Self {
        self.add_gene(kind, gene);
        self
    }

    /// Get the gene of the given kind.
    ///
    /// # Panics
    ///
    /// Panics if the kind was never added. Organism constructors add every
    /// kind their behaviour reads, so this only fires on a construction bug.
    pub fn get(&self, kind: GeneKind) -> &Gene {
        self.genes
            .get(&kind)
            .unwrap_or_else(|| panic!("genome has no {:?} gene", kind))
    }

    /// Get the gene of the given kind, if present
    pub fn try_get(&self, kind: GeneKind) -> Option<&Gene> {
        self.genes.get(&kind)
    }

    /// Current value of the gene of the given kind. Panics like [`Genome::get`].
    #[inline]
    pub fn get_value(&self, kind: GeneKind) -> f32 {
        self.get(kind).value()
    }

    pub fn contains(&self, kind: GeneKind) -> bool {
        self.genes.contains_key(&kind)
    }

    /// Number of genes carried
    pub fn len(&self) -> usize {
        self.genes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.genes.is_empty()
    }

    /// Iterate genes in canonical kind order
    pub fn iter(&self) -> impl Iterator<Item = (GeneKind, &Gene)> {
        self.genes.iter().map(|(&kind, gene)| (kind, gene))
    }

    /// Normalised value of every carried gene, in canonical kind order
    pub fn magnitudes(&self) -> Vec<f32> {
        self.genes.values().map(Gene::magnitude).collect()
    }

    /// Apply `mutation_rate` mutation events, returning how many were applied.
    ///
    /// Each event picks one gene uniformly from the whole genome (the
    /// mutation-rate gene included) with replacement. The count is read
    /// before any event runs.
    pub fn mutate<R: Rng + ?Sized>(&mut self, rng: &mut R) -> usize {
        if self.genes.is_empty() {
            return 0;
        }
        let events = self.get_value(GeneKind::MutationRate).max(0.0) as usize;
        let n_genes = self.genes.len();

        for _ in 0..events {
            let pick = rng.gen_range(0..n_genes);
            if let Some(gene) = self.genes.values_mut().nth(pick) {
                gene.mutate(rng);
            }
        }

        events
    }
}

impl std::fmt::Display for Genome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "(")?;
        for (i, (kind, gene)) in self.iter().enumerate() {
            if i > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{:?}: {}", kind, gene)?;
        }
        write!(f, ")")
    }
}
