//! Best individuals seen over a whole run.

use crate::genetic::{Individual, cmp_fitness};

/// Keeps the `capacity` best evaluated individuals ever offered.
///
/// Entries are sorted best first. An individual whose genes equal an existing
/// entry is not inserted twice, so elites carried over between generations do
/// not crowd out other candidates.
///
/// ```
/// use latentga_training::{genetic::Individual, hall_of_fame::HallOfFame};
///
/// let mut hof = HallOfFame::new(2);
/// hof.update(&[
///     Individual::with_fitness(vec![0.1], 0.3),
///     Individual::with_fitness(vec![0.2], 0.9),
///     Individual::with_fitness(vec![0.3], 0.6),
/// ]);
/// assert_eq!(hof.best().unwrap().fitness(), Some(0.9));
/// assert_eq!(hof.entries().len(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct HallOfFame {
    capacity: usize,
    entries: Vec<Individual>,
}

impl HallOfFame {
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Vec::with_capacity(capacity),
        }
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Offers individuals to the hall of fame.
    ///
    /// Unevaluated individuals and NaN fitness values are ignored.
    pub fn update<'a, I>(&mut self, individuals: I)
    where
        I: IntoIterator<Item = &'a Individual>,
    {
        for ind in individuals {
            if !ind.fitness().is_some_and(|f| !f.is_nan()) {
                continue;
            }
            if self.entries.len() == self.capacity
                && self
                    .entries
                    .last()
                    .is_none_or(|worst| cmp_fitness(ind, worst).is_le())
            {
                continue;
            }
            if self.entries.iter().any(|e| e.genes() == ind.genes()) {
                continue;
            }
            // insert after entries that are at least as fit
            let pos = self
                .entries
                .partition_point(|e| cmp_fitness(e, ind).is_ge());
            self.entries.insert(pos, ind.clone());
            self.entries.truncate(self.capacity);
        }
    }

    #[must_use]
    pub fn best(&self) -> Option<&Individual> {
        self.entries.first()
    }

    /// Entries, best first.
    #[must_use]
    pub fn entries(&self) -> &[Individual] {
        &self.entries
    }
}
