//! Gene vector operators.
//!
//! - **Initialization**: [`random`] draws genes uniformly from `[0, 1)`
//! - **Crossover**: [`two_point_crossover`] exchanges a contiguous segment
//! - **Mutation**: [`gaussian_mutation`] adds normal noise gene by gene

use rand::Rng;
use rand_distr::Normal;

/// Creates a gene vector by applying a function to each index.
///
/// ```
/// use latentga_training::genes;
///
/// let genes = genes::from_fn(|i| i as f32 * 0.5, 3);
/// assert_eq!(genes, vec![0.0, 0.5, 1.0]);
/// ```
pub fn from_fn<F>(f: F, len: usize) -> Vec<f32>
where
    F: FnMut(usize) -> f32,
{
    (0..len).map(f).collect()
}

/// Generates a gene vector with each gene uniform in `[0, 1)`.
pub fn random<R>(rng: &mut R, len: usize) -> Vec<f32>
where
    R: Rng + ?Sized,
{
    from_fn(|_| rng.random::<f32>(), len)
}

/// Two-point crossover, in place.
///
/// Draws two distinct cut points `p1 < p2` in `1..=n` and swaps
/// `a[p1..p2]` with `b[p1..p2]`. The first gene is never exchanged.
/// Vectors shorter than two genes are left unchanged.
///
/// # Panics
///
/// Panics if the vectors have different lengths.
pub fn two_point_crossover<R>(a: &mut [f32], b: &mut [f32], rng: &mut R)
where
    R: Rng + ?Sized,
{
    assert_eq!(a.len(), b.len(), "parents must have the same length");
    let size = a.len();
    if size < 2 {
        return;
    }
    let mut p1 = rng.random_range(1..=size);
    let mut p2 = rng.random_range(1..size);
    if p2 >= p1 {
        p2 += 1;
    } else {
        std::mem::swap(&mut p1, &mut p2);
    }
    a[p1..p2].swap_with_slice(&mut b[p1..p2]);
}

/// Gaussian mutation, in place.
///
/// Each gene independently, with probability `indpb`, gets noise drawn from
/// `N(mu, sigma)` added to it. Returns whether any gene changed.
///
/// # Panics
///
/// Panics if `sigma` is negative or not finite, or `indpb` is outside `[0, 1]`.
pub fn gaussian_mutation<R>(genes: &mut [f32], mu: f32, sigma: f32, indpb: f64, rng: &mut R) -> bool
where
    R: Rng + ?Sized,
{
    let normal = Normal::new(mu, sigma).expect("sigma must be finite and non-negative");
    let mut mutated = false;
    for g in genes {
        if rng.random_bool(indpb) {
            *g += rng.sample(normal);
            mutated = true;
        }
    }
    mutated
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng as _;
    use rand_pcg::Pcg32;

    use super::*;

    #[test]
    fn test_random_is_in_unit_interval() {
        let mut rng = Pcg32::seed_from_u64(0);
        let genes = random(&mut rng, 1000);
        assert_eq!(genes.len(), 1000);
        assert!(genes.iter().all(|g| (0.0..1.0).contains(g)));
    }

    #[test]
    fn test_two_point_crossover_swaps_one_segment() {
        let mut rng = Pcg32::seed_from_u64(3);
        for _ in 0..200 {
            let mut a = vec![0.0; 10];
            let mut b = vec![1.0; 10];
            two_point_crossover(&mut a, &mut b, &mut rng);

            // first gene never moves; exchanged genes form one contiguous run
            assert_eq!(a[0], 0.0);
            assert_eq!(b[0], 1.0);
            let swapped = a.iter().filter(|&&g| g == 1.0).count();
            assert!(swapped >= 1);
            let start = a.iter().position(|&g| g == 1.0).unwrap();
            assert!(a[start..start + swapped].iter().all(|&g| g == 1.0));
            for (x, y) in a.iter().zip(&b) {
                assert_eq!(x + y, 1.0);
            }
        }
    }

    #[test]
    fn test_two_point_crossover_short_vectors_unchanged() {
        let mut rng = Pcg32::seed_from_u64(0);
        let mut a = vec![0.0];
        let mut b = vec![1.0];
        two_point_crossover(&mut a, &mut b, &mut rng);
        assert_eq!((a, b), (vec![0.0], vec![1.0]));
    }

    #[test]
    fn test_gaussian_mutation_probability_bounds() {
        let mut rng = Pcg32::seed_from_u64(5);
        let mut genes = vec![0.5; 50];
        assert!(!gaussian_mutation(&mut genes, 0.0, 1.0, 0.0, &mut rng));
        assert!(genes.iter().all(|&g| g == 0.5));

        assert!(gaussian_mutation(&mut genes, 0.0, 1.0, 1.0, &mut rng));
        assert!(genes.iter().all(|&g| g != 0.5));
    }

    #[test]
    fn test_gaussian_mutation_shifts_by_mu() {
        let mut rng = Pcg32::seed_from_u64(9);
        let mut genes = vec![0.0; 100];
        gaussian_mutation(&mut genes, 10.0, 0.0, 1.0, &mut rng);
        assert!(genes.iter().all(|&g| g == 10.0));
    }
}
