//! Synthetic panel generation.
//!
//! Each county draws base values once, then every metric follows a bounded
//! random walk: a persistent per-county drift plus per-period noise, with
//! the combined step capped by [`StepBounds`] and the result clamped to the
//! metric's band. Clamping never lengthens a step, so the cap holds for
//! every consecutive pair of periods.
//!
//! Randomness comes only from the `rng` argument. The same seed, county
//! list, and time range always produce the same table.

use county_atlas_geography_models::CountyGeometry;
use county_atlas_statistics_models::{Metric, StatRecord, TimeRange};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng as _};

use crate::{StatisticsTable, StatsError};

/// Largest change allowed between consecutive periods.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StepBounds {
    /// Relative population change (0.01 = 1%).
    pub population: f64,
    /// Relative GDP change.
    pub gdp: f64,
    /// Absolute unemployment change in percentage points.
    pub unemployment_points: f64,
    /// Relative median income change.
    pub income: f64,
}

impl Default for StepBounds {
    fn default() -> Self {
        Self {
            population: 0.01,
            gdp: 0.02,
            unemployment_points: 0.4,
            income: 0.015,
        }
    }
}

/// Ranges the per-county base values are drawn from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GeneratorParams {
    /// Population base, drawn log-uniformly.
    pub population: (f64, f64),
    /// GDP per capita in USD; base GDP is population times this.
    pub gdp_per_capita: (f64, f64),
    /// Unemployment base in percent.
    pub unemployment: (f64, f64),
    /// Median income base in USD.
    pub median_income: (f64, f64),
    /// Per-period step caps.
    pub steps: StepBounds,
}

impl Default for GeneratorParams {
    fn default() -> Self {
        Self {
            population: (25_000.0, 2_500_000.0),
            gdp_per_capita: (35_000.0, 95_000.0),
            unemployment: (2.5, 9.0),
            median_income: (38_000.0, 110_000.0),
            steps: StepBounds::default(),
        }
    }
}

impl GeneratorParams {
    fn validate(&self) -> Result<(), StatsError> {
        let ranges = [
            ("population", self.population, Metric::Population),
            ("unemployment", self.unemployment, Metric::UnemploymentRate),
            ("median_income", self.median_income, Metric::MedianIncome),
        ];
        for (name, (lo, hi), metric) in ranges {
            let band = metric.band();
            if !(lo < hi && band.contains(lo) && band.contains(hi)) {
                return Err(StatsError::InvalidParams {
                    message: format!("{name} range [{lo}, {hi}] must be ascending and within {metric}'s band"),
                });
            }
        }

        let (lo, hi) = self.gdp_per_capita;
        if !(lo > 0.0 && lo < hi) {
            return Err(StatsError::InvalidParams {
                message: format!("gdp_per_capita range [{lo}, {hi}] must be positive and ascending"),
            });
        }

        let steps = [
            self.steps.population,
            self.steps.gdp,
            self.steps.unemployment_points,
            self.steps.income,
        ];
        if steps.iter().any(|s| !(s.is_finite() && *s > 0.0 && *s < 1.0)) {
            return Err(StatsError::InvalidParams {
                message: "step bounds must be in (0, 1)".to_string(),
            });
        }

        Ok(())
    }
}

/// Produces synthetic county statistics panels.
#[derive(Debug, Clone, Default)]
pub struct StatisticsGenerator {
    params: GeneratorParams,
}

impl StatisticsGenerator {
    /// Creates a generator with custom parameters.
    ///
    /// # Errors
    ///
    /// Returns [`StatsError::InvalidParams`] if a range is empty, outside
    /// its metric band, or a step bound is not in (0, 1).
    pub fn new(params: GeneratorParams) -> Result<Self, StatsError> {
        params.validate()?;
        Ok(Self { params })
    }

    /// The parameters in use.
    #[must_use]
    pub const fn params(&self) -> &GeneratorParams {
        &self.params
    }

    /// Generates one row per (county, period) using a fresh `StdRng`
    /// seeded with `seed`.
    ///
    /// # Errors
    ///
    /// See [`Self::generate`].
    pub fn generate_seeded(
        &self,
        counties: &[CountyGeometry],
        range: &TimeRange,
        seed: u64,
    ) -> Result<StatisticsTable, StatsError> {
        let mut rng = StdRng::seed_from_u64(seed);
        self.generate(counties, range, &mut rng)
    }

    /// Generates one row per (county, period) drawing from `rng`.
    ///
    /// # Errors
    ///
    /// * [`StatsError::NoCounties`] if `counties` is empty.
    /// * [`StatsError::EmptyRange`] if `range` has no periods.
    pub fn generate<R: Rng>(
        &self,
        counties: &[CountyGeometry],
        range: &TimeRange,
        rng: &mut R,
    ) -> Result<StatisticsTable, StatsError> {
        if counties.is_empty() {
            return Err(StatsError::NoCounties);
        }
        let periods = range.periods();
        if periods.is_empty() {
            return Err(StatsError::EmptyRange);
        }

        log::info!(
            "Generating {} months of statistics for {} counties",
            periods.len(),
            counties.len()
        );

        let mut records = Vec::with_capacity(counties.len() * periods.len());
        for county in counties {
            let mut walk = CountyWalk::start(&self.params, rng);
            for (t, date) in periods.iter().enumerate() {
                if t > 0 {
                    walk.step(&self.params, rng);
                }
                records.push(walk.record(county, *date));
            }
        }

        StatisticsTable::from_records(records)
    }
}

/// Random-walk state for one county.
struct CountyWalk {
    population: f64,
    gdp: f64,
    unemployment: f64,
    income: f64,
    population_drift: f64,
    gdp_drift: f64,
    income_drift: f64,
    unemployment_anchor: f64,
}

impl CountyWalk {
    fn start<R: Rng>(params: &GeneratorParams, rng: &mut R) -> Self {
        let (pop_lo, pop_hi) = params.population;
        let log_population: f64 = rng.random_range(pop_lo.ln()..pop_hi.ln());
        let population = log_population.exp();
        let gdp = population * rng.random_range(params.gdp_per_capita.0..params.gdp_per_capita.1)
            / 1_000_000.0;
        let unemployment = rng.random_range(params.unemployment.0..params.unemployment.1);
        let income = rng.random_range(params.median_income.0..params.median_income.1);

        let steps = params.steps;
        Self {
            population,
            gdp,
            unemployment,
            income,
            population_drift: rng.random_range(-0.3_f64..0.6) * steps.population,
            gdp_drift: rng.random_range(-0.3_f64..0.6) * steps.gdp,
            income_drift: rng.random_range(-0.2_f64..0.5) * steps.income,
            unemployment_anchor: unemployment,
        }
    }

    fn step<R: Rng>(&mut self, params: &GeneratorParams, rng: &mut R) {
        let steps = params.steps;

        self.population = Metric::Population.band().clamp(
            self.population * (1.0 + relative_step(rng, self.population_drift, steps.population)),
        );
        self.gdp = Metric::GdpMillions
            .band()
            .clamp(self.gdp * (1.0 + relative_step(rng, self.gdp_drift, steps.gdp)));
        self.income = Metric::MedianIncome
            .band()
            .clamp(self.income * (1.0 + relative_step(rng, self.income_drift, steps.income)));

        // Mean-reverting toward the county's base rate.
        let pull = 0.2 * (self.unemployment_anchor - self.unemployment);
        let noise = rng.random_range(-0.75_f64..=0.75) * steps.unemployment_points;
        let delta = (pull + noise).clamp(-steps.unemployment_points, steps.unemployment_points);
        self.unemployment = Metric::UnemploymentRate
            .band()
            .clamp(self.unemployment + delta);
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn record(&self, county: &CountyGeometry, date: chrono::NaiveDate) -> StatRecord {
        StatRecord {
            county: county.name.clone(),
            state: county.state.clone(),
            date,
            population: self.population.round() as u64,
            gdp_millions: (self.gdp * 100.0).round() / 100.0,
            unemployment_rate: (self.unemployment * 10.0).round() / 10.0,
            median_income: self.income.round(),
            county_type: county.county_type,
        }
    }
}

/// Drift plus symmetric noise, capped at `bound` either way.
fn relative_step<R: Rng>(rng: &mut R, drift: f64, bound: f64) -> f64 {
    let noise = rng.random_range(-0.6_f64..=0.6) * bound;
    (drift + noise).clamp(-bound, bound)
}
