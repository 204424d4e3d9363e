use num::bigint::BigInt;
use num::rational::BigRational;
use num::traits::{One, ToPrimitive, Zero};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum HypergeometricError {
    #[error("Invalid parameters: population N={population}, successes K={successes}, draws n={draws}")]
    InvalidParams {
        population: u64,
        successes: u64,
        draws: u64,
    },
}

/// Parameters for a hypergeometric distribution.
///
/// Models drawing `draws` items without replacement from a population of
/// `population`, where `successes` of them are marked. X is the number of
/// marked items drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HypergeometricParams {
    /// Total population size N.
    pub population: u64,
    /// Number of success states K in the population.
    pub successes: u64,
    /// Number of draws n.
    pub draws: u64,
}

impl HypergeometricParams {
    /// Construct validated hypergeometric parameters.
    ///
    /// # Returns
    /// Validated parameters or [`HypergeometricError::InvalidParams`] when
    /// either `successes` or `draws` exceeds `population`.
    pub fn new(population: u64, successes: u64, draws: u64) -> Result<Self, HypergeometricError> {
        if successes > population || draws > population {
            return Err(HypergeometricError::InvalidParams {
                population,
                successes,
                draws,
            });
        }
        Ok(Self {
            population,
            successes,
            draws,
        })
    }

    /// Number of items in the population that are not successes.
    pub fn failures(&self) -> u64 {
        self.population - self.successes
    }

    /// Lower bound on the support of X.
    pub fn min_val(&self) -> u64 {
        (self.draws + self.successes).saturating_sub(self.population)
    }

    /// Upper bound on the support of X.
    pub fn max_val(&self) -> u64 {
        std::cmp::min(self.successes, self.draws)
    }
}

/// Exact binomial coefficient C(n, k) using BigInt.
pub fn binomial(n: u64, k: u64) -> BigInt {
    if k > n {
        return BigInt::zero();
    }
    let k = std::cmp::min(k, n - k);
    if k == 0 {
        return BigInt::one();
    }
    let mut result = BigInt::one();
    for i in 0..k {
        result *= BigInt::from(n - i);
        result /= BigInt::from(i + 1);
    }
    result
}

/// Exact PMF: P(X = x) = C(K, x) * C(N-K, n-x) / C(N, n).
pub fn pmf(params: &HypergeometricParams, x: u64) -> BigRational {
    if x > params.successes || x > params.draws {
        return BigRational::zero();
    }
    if params.draws - x > params.failures() {
        return BigRational::zero();
    }

    let numerator = binomial(params.successes, x) * binomial(params.failures(), params.draws - x);
    let denominator = binomial(params.population, params.draws);

    if denominator.is_zero() {
        return BigRational::zero();
    }

    BigRational::new(numerator, denominator)
}

/// Exact CDF: P(X <= x) = sum of PMF(i) for i = min_val..=x.
pub fn cdf(params: &HypergeometricParams, x: u64) -> BigRational {
    let upper = std::cmp::min(x, params.max_val());
    let mut result = BigRational::zero();
    for i in params.min_val()..=upper {
        result += pmf(params, i);
    }
    result
}

/// One factor of the zero-success product: the chance that draw number
/// `draw` (1-based) misses, given that the previous draws all missed.
///
/// Returns `(N-K-draw+1) / (N-draw+1)`, which is zero once the failures are
/// exhausted.
pub fn miss_factor(population: u64, successes: u64, draw: u64) -> BigRational {
    let failures = population - successes;
    if draw == 0 || draw > failures {
        return BigRational::zero();
    }
    BigRational::new(
        BigInt::from(failures - draw + 1),
        BigInt::from(population - draw + 1),
    )
}

/// Probability of drawing no successes, `P(X = 0) = CDF(0; N, n, K)`.
///
/// Computed as the product `prod_{i<n} (N-K-i)/(N-i)`, which equals
/// `C(N-K, n) / C(N, n)` without building either coefficient.
pub fn miss_probability(params: &HypergeometricParams) -> BigRational {
    if params.draws > params.failures() {
        return BigRational::zero();
    }
    let mut result = BigRational::one();
    for draw in 1..=params.draws {
        result *= miss_factor(params.population, params.successes, draw);
    }
    result
}

/// Probability of drawing at least one success, `1 - P(X = 0)`.
pub fn hit_probability(params: &HypergeometricParams) -> BigRational {
    BigRational::one() - miss_probability(params)
}

/// Lossy conversion of an exact probability to `f64` for reporting.
///
/// Values too small for `f64` flush to zero.
pub fn to_f64(r: &BigRational) -> f64 {
    if r.is_zero() {
        return 0.0;
    }
    r.to_f64().unwrap_or(0.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ratio(n: i64, d: i64) -> BigRational {
        BigRational::new(BigInt::from(n), BigInt::from(d))
    }

    #[test]
    fn test_binomial_basic() {
        assert_eq!(binomial(0, 0), BigInt::one());
        assert_eq!(binomial(5, 0), BigInt::one());
        assert_eq!(binomial(5, 5), BigInt::one());
        assert_eq!(binomial(5, 2), BigInt::from(10));
        assert_eq!(binomial(10, 3), BigInt::from(120));
        assert_eq!(binomial(3, 5), BigInt::zero()); // k > n
    }

    #[test]
    fn test_binomial_large() {
        let expected: BigInt = "100891344545564193334812497256".parse().unwrap();
        assert_eq!(binomial(100, 50), expected);
    }

    #[test]
    fn test_pmf_sums_to_one() {
        let params = HypergeometricParams::new(20, 7, 5).unwrap();
        let mut total = BigRational::zero();
        for x in params.min_val()..=params.max_val() {
            total += pmf(&params, x);
        }
        assert_eq!(total, BigRational::one(), "PMF should sum to 1");
    }

    #[test]
    fn test_pmf_known_values() {
        // N=10, K=3, n=4: P(X=0) = C(7,4)/C(10,4) = 35/210 = 1/6
        let params = HypergeometricParams::new(10, 3, 4).unwrap();
        assert_eq!(pmf(&params, 0), ratio(1, 6));
    }

    #[test]
    fn test_cdf_reaches_one_at_max() {
        let params = HypergeometricParams::new(20, 7, 5).unwrap();
        assert_eq!(cdf(&params, params.max_val()), BigRational::one());
        assert_eq!(cdf(&params, 100), BigRational::one());
        assert!(cdf(&params, 0) < BigRational::one());
    }

    #[test]
    fn test_miss_probability_small_population() {
        // N=4, K=2: one draw misses half the time.
        let p = HypergeometricParams::new(4, 2, 1).unwrap();
        assert_eq!(miss_probability(&p), ratio(1, 2));
        // Two draws: C(2,2)/C(4,2) = 1/6.
        let p = HypergeometricParams::new(4, 2, 2).unwrap();
        assert_eq!(miss_probability(&p), ratio(1, 6));
        // Three draws cannot all miss.
        let p = HypergeometricParams::new(4, 2, 3).unwrap();
        assert_eq!(miss_probability(&p), BigRational::zero());
        assert_eq!(hit_probability(&p), BigRational::one());
    }

    #[test]
    fn test_miss_probability_single_success() {
        // N=4, K=1, n=3: 1 - C(3,3)/C(4,3) = 3/4
        let p = HypergeometricParams::new(4, 1, 3).unwrap();
        assert_eq!(hit_probability(&p), ratio(3, 4));
    }

    #[test]
    fn test_miss_probability_zero_draws() {
        let p = HypergeometricParams::new(10, 3, 0).unwrap();
        assert_eq!(miss_probability(&p), BigRational::one());
    }

    #[test]
    fn test_miss_factor_bounds() {
        assert_eq!(miss_factor(4, 2, 1), ratio(2, 4));
        assert_eq!(miss_factor(4, 2, 2), ratio(1, 3));
        assert_eq!(miss_factor(4, 2, 3), BigRational::zero());
        assert_eq!(miss_factor(4, 2, 0), BigRational::zero());
    }

    #[test]
    fn test_to_f64_handles_tiny_and_huge_terms() {
        assert_eq!(to_f64(&BigRational::zero()), 0.0);
        assert_eq!(to_f64(&ratio(1, 4)), 0.25);
        // Both terms far beyond f64 range; the ratio itself is ordinary.
        let big = binomial(3000, 1500);
        let r = BigRational::new(big.clone(), big * BigInt::from(2));
        assert!((to_f64(&r) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_params() {
        assert!(HypergeometricParams::new(10, 20, 5).is_err()); // K > N
        assert!(HypergeometricParams::new(10, 5, 20).is_err()); // n > N
    }

    #[test]
    fn degenerate_single_node_success() {
        let params = HypergeometricParams::new(1, 1, 1).unwrap();
        assert_eq!(params.min_val(), 1);
        assert_eq!(params.max_val(), 1);
        assert_eq!(pmf(&params, 1), BigRational::one());
        assert_eq!(miss_probability(&params), BigRational::zero());
    }

    #[test]
    fn degenerate_no_successes() {
        let params = HypergeometricParams::new(10, 0, 10).unwrap();
        assert_eq!(miss_probability(&params), BigRational::one());
        assert_eq!(hit_probability(&params), BigRational::zero());
    }

    // ---------------------------------------------------------------
    // Proptest: property-based / randomized tests
    // ---------------------------------------------------------------

    use proptest::prelude::*;
    use proptest::test_runner::{Config as ProptestConfig, FileFailurePersistence, RngAlgorithm};

    fn prob_proptest_config() -> ProptestConfig {
        ProptestConfig {
            cases: 64,
            source_file: Some(file!()),
            failure_persistence: Some(Box::new(FileFailurePersistence::WithSource(
                "proptest-regressions",
            ))),
            rng_algorithm: RngAlgorithm::ChaCha,
            ..ProptestConfig::default()
        }
    }

    /// Valid (N, K, n) triples, small enough for exact arithmetic.
    fn valid_params_strategy() -> impl Strategy<Value = (u64, u64, u64)> {
        (1u64..=120).prop_flat_map(|n| (Just(n), 0..=n, 0..=n))
    }

    proptest! {
        #![proptest_config(prob_proptest_config())]

        /// The product form agrees with CDF(0) built from binomials.
        #[test]
        fn miss_probability_matches_cdf_at_zero((n, k, s) in valid_params_strategy()) {
            let params = HypergeometricParams::new(n, k, s).unwrap();
            let product = miss_probability(&params);
            let from_cdf = cdf(&params, 0);
            prop_assert!(
                product == from_cdf,
                "P(X=0) mismatch for N={n}, K={k}, n={s}: product={product}, cdf={from_cdf}"
            );
        }

        /// More draws never make a miss more likely.
        #[test]
        fn miss_probability_non_increasing_in_draws((n, k, _s) in valid_params_strategy()) {
            let mut prev = BigRational::one();
            for draws in 0..=n {
                let params = HypergeometricParams::new(n, k, draws).unwrap();
                let current = miss_probability(&params);
                prop_assert!(
                    current <= prev,
                    "P(X=0) rose at draws={draws} for N={n}, K={k}"
                );
                prev = current;
            }
        }

        /// CDF values are probabilities and are non-decreasing in x.
        #[test]
        fn cdf_is_monotone_probability((n, k, s) in valid_params_strategy()) {
            let params = HypergeometricParams::new(n, k, s).unwrap();
            let mut prev = BigRational::zero();
            for x in 0..=params.max_val() {
                let c = cdf(&params, x);
                prop_assert!(c >= prev);
                prop_assert!(c <= BigRational::one());
                prev = c;
            }
            prop_assert!(prev == BigRational::one());
        }

        /// Binomial coefficient Pascal's rule: C(n, k) = C(n-1, k-1) + C(n-1, k).
        #[test]
        fn binomial_pascals_rule(n in 1u64..200, k in 1u64..200) {
            prop_assume!(k <= n);
            let lhs = binomial(n, k);
            let rhs = binomial(n - 1, k - 1) + binomial(n - 1, k);
            prop_assert!(lhs == rhs, "C({n},{k}) = {lhs} should equal {rhs}");
        }
    }
}
