//! Small sampling helpers shared by the genetic operators.

use rand::Rng;

/// Uniform real between `a` and `b`, in whichever order they are given.
///
/// Unlike `gen_range` this never panics on an empty range: `rand2f(x, x)` is just `x`.
pub fn rand2f<R: Rng + ?Sized>(rng: &mut R, a: f64, b: f64) -> f64 {
    rng.gen::<f64>() * (a - b).abs() + a.min(b)
}

/// Uniform integer in `[a, b]` inclusive, in whichever order they are given.
pub fn rand2<R: Rng + ?Sized>(rng: &mut R, a: usize, b: usize) -> usize {
    rng.gen_range(a.min(b)..=a.max(b))
}

pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    value.max(min).min(max)
}

/// Rounds down to the nearest even number.
pub fn make_even(n: usize) -> usize {
    (n / 2) * 2
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use rstest::*;

    #[fixture]
    fn rng() -> StdRng {
        StdRng::seed_from_u64(7)
    }

    #[rstest]
    #[case(7, 6)]
    #[case(6, 6)]
    #[case(1, 0)]
    #[case(0, 0)]
    fn test_make_even(#[case] n: usize, #[case] expected: usize) {
        assert_eq!(make_even(n), expected);
    }

    #[rstest]
    fn test_rand2f_stays_in_range(mut rng: StdRng) {
        for _ in 0..1000 {
            let x = rand2f(&mut rng, 10.0, -2.5);
            assert!((-2.5..=10.0).contains(&x));
        }
        assert_eq!(rand2f(&mut rng, 3.0, 3.0), 3.0);
    }

    #[rstest]
    fn test_rand2_hits_both_ends(mut rng: StdRng) {
        let draws: Vec<usize> = (0..500).map(|_| rand2(&mut rng, 3, 0)).collect();
        assert!(draws.iter().all(|d| *d <= 3));
        assert!(draws.contains(&0));
        assert!(draws.contains(&3));
    }

    #[test]
    fn test_clamp() {
        assert_eq!(clamp(11.0, 0.0, 10.0), 10.0);
        assert_eq!(clamp(-1.0, 0.0, 10.0), 0.0);
        assert_eq!(clamp(4.2, 0.0, 10.0), 4.2);
    }
}
