//! Synthetic price generator.
//!
//! Every asset follows a geometric Brownian motion. The normal draws are
//! built from one market factor and one idiosyncratic term,
//! `z_i = √ρ·m + √(1-ρ)·e_i`, so any pair of assets has shock correlation
//! `ρ`. Paths are fully determined by the seed.

use crate::config::SyntheticConfig;
use crate::error::LabError;
use finrisk_core::types::{PriceSeries, PriceTable};
use rand::rngs::StdRng;
use rand::SeedableRng;
use rand_distr::{Distribution, Normal};

/// Random walk (geometric Brownian motion) model.
///
/// dS = μ·S·dt + σ·S·dW
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomWalkModel {
    /// Annual drift rate (μ)
    pub drift: f64,
    /// Annual volatility (σ)
    pub volatility: f64,
}

impl RandomWalkModel {
    /// Create a new random walk model.
    pub fn new(drift: f64, volatility: f64) -> Self {
        Self { drift, volatility }
    }

    /// Advance `price` by one step of `dt` years given a standard normal draw.
    pub fn evolve(&self, price: f64, dt: f64, draw: f64) -> f64 {
        // S(t+dt) = S(t)·exp((μ - σ²/2)·dt + σ·√dt·Z)
        let drift_term = (self.drift - 0.5 * self.volatility * self.volatility) * dt;
        let diffusion_term = self.volatility * dt.sqrt() * draw;
        (price * (drift_term + diffusion_term).exp()).max(f64::MIN_POSITIVE)
    }
}

/// Seeded generator of aligned synthetic price tables.
#[derive(Debug, Clone)]
pub struct SyntheticMarket {
    config: SyntheticConfig,
    model: RandomWalkModel,
    dt: f64,
}

impl SyntheticMarket {
    /// Create a generator stepping `1 / periods_per_year` years per price.
    pub fn new(config: SyntheticConfig, periods_per_year: f64) -> Self {
        let model = RandomWalkModel::new(config.drift, config.volatility);
        Self {
            config,
            model,
            dt: 1.0 / periods_per_year,
        }
    }

    /// Generator parameters.
    pub fn config(&self) -> &SyntheticConfig {
        &self.config
    }

    /// Generate one daily-indexed price series per asset.
    pub fn generate(&self, assets: &[String]) -> Result<PriceTable, LabError> {
        if assets.is_empty() {
            return Err(LabError::data_load("synthetic universe is empty"));
        }
        let normal = Normal::new(0.0, 1.0).map_err(|e| LabError::data_load(e.to_string()))?;
        let mut rng = StdRng::seed_from_u64(self.config.seed);

        let rho = self.config.correlation;
        let (factor_loading, idio_loading) = (rho.sqrt(), (1.0 - rho).sqrt());

        let periods = self.config.periods;
        let mut paths: Vec<Vec<f64>> = assets
            .iter()
            .map(|_| {
                let mut path = Vec::with_capacity(periods);
                path.push(self.config.initial_price);
                path
            })
            .collect();

        for _ in 1..periods {
            let market: f64 = normal.sample(&mut rng);
            for path in paths.iter_mut() {
                let idio: f64 = normal.sample(&mut rng);
                let draw = factor_loading * market + idio_loading * idio;
                let last = path[path.len() - 1];
                path.push(self.model.evolve(last, self.dt, draw));
            }
        }

        let series = assets
            .iter()
            .zip(paths)
            .map(|(asset, path)| {
                PriceSeries::with_daily_index(asset.as_str(), self.config.start_date, path)
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PriceTable::new(series)?)
    }
}
