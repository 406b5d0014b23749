use chrono::{Datelike, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use cartwise_core::stats;
use cartwise_core::{DomainError, DomainResult, Engine, ProductId, ProductScoped, ValueObject};

/// Tuning knobs for the forecast engine.
///
/// All of it is injected configuration so tenants can override the tables
/// without touching engine code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForecastConfig {
    /// Forecast horizon in days; the result covers this window.
    pub horizon_days: u32,
    /// Service-level z-score for safety stock (1.65 ≈ 95%).
    pub service_level_z: f64,
    /// Moving-average window over the most recent reporting periods.
    pub moving_average_window: usize,
    /// Demand uplift applied while a holiday window is active.
    pub holiday_uplift: f64,
    /// Per-calendar-month demand weights, January first.
    pub seasonal_weights: [f64; 12],
}

impl Default for ForecastConfig {
    fn default() -> Self {
        Self {
            horizon_days: 30,
            service_level_z: 1.65,
            moving_average_window: 7,
            holiday_uplift: 1.2,
            // Retail demand curve: quiet mid-summer, peak season into December.
            seasonal_weights: [
                0.9, 0.85, 0.95, 1.0, 1.05, 0.9, 0.8, 0.85, 1.0, 1.1, 1.2, 1.3,
            ],
        }
    }
}

/// Contextual demand signals outside the sales history.
///
/// Absent fields contribute a neutral 1.0 to the adjustment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct ExternalFactors {
    /// Weather favorability score in \[0, 1\].
    #[serde(default)]
    pub weather: Option<f64>,
    /// Whether a holiday window is active.
    #[serde(default)]
    pub holidays: bool,
    /// Labels of ongoing local events (informational; not weighted).
    #[serde(default)]
    pub events: Vec<String>,
    /// Macro-economic indicator in \[0, 1\].
    #[serde(default)]
    pub economic_indicators: Option<f64>,
}

/// Per-product forecasting input, one value per invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastInput {
    pub product_id: ProductId,
    /// Units sold per reporting period, most-recent-last. Must be
    /// non-empty; values must be finite and non-negative.
    pub historical_sales: Vec<f64>,
    /// Caller-supplied seasonal context. The seasonal step derives its own
    /// weight from the calendar month and does not read this; it is kept so
    /// callers can round-trip their context through batch runs.
    #[serde(default)]
    pub seasonal_factors: Vec<f64>,
    #[serde(default)]
    pub external_factors: Option<ExternalFactors>,
    /// Units on hand.
    pub current_inventory: u32,
    /// Days between reorder and replenishment; must be positive.
    pub lead_time_days: u32,
}

impl ValueObject for ForecastInput {}

impl ProductScoped for ForecastInput {
    fn product_id(&self) -> ProductId {
        self.product_id
    }
}

/// Stock-out risk classification for the forecast window.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

/// Demand projection for one product over the configured horizon.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ForecastResult {
    pub product_id: ProductId,
    /// Expected units demanded over the horizon.
    pub predicted_demand: u32,
    /// Confidence in \[0, 1\].
    pub confidence_score: f64,
    /// Units to order now to cover the horizon.
    pub recommended_order_quantity: u32,
    /// Inventory level at which replenishment should be triggered.
    pub reorder_point: u32,
    /// Horizon label, e.g. `"30_DAYS"`.
    pub forecast_period: String,
    pub risk_level: RiskLevel,
}

impl ValueObject for ForecastResult {}

impl ProductScoped for ForecastResult {
    fn product_id(&self) -> ProductId {
        self.product_id
    }
}

/// Deterministic demand forecaster.
///
/// Model:
/// - Base level: moving average over the most recent periods.
/// - Seasonal step: per-calendar-month weight from the config table.
/// - External step: multiplicative holiday/weather/economy factors.
/// - Trend step: first-half vs second-half growth of the series.
/// - Confidence: inverse coefficient of variation, clamped.
/// - Safety stock at the configured service level, scaled by lead time.
#[derive(Debug, Clone)]
pub struct ForecastEngine {
    config: ForecastConfig,
    /// Calendar anchor for the seasonal step. Fixed at construction so a
    /// given engine instance is reproducible; override for tests/replays.
    reference_date: NaiveDate,
}

impl ForecastEngine {
    pub fn new(config: ForecastConfig) -> Self {
        Self {
            config,
            reference_date: Utc::now().date_naive(),
        }
    }

    /// Pin the calendar date the seasonal step reads.
    pub fn with_reference_date(mut self, date: NaiveDate) -> Self {
        self.reference_date = date;
        self
    }

    pub fn config(&self) -> &ForecastConfig {
        &self.config
    }

    /// Project demand for one product over the configured horizon.
    pub fn forecast(&self, input: &ForecastInput) -> DomainResult<ForecastResult> {
        self.validate(input)?;

        let sales = &input.historical_sales;
        let base = moving_average(sales, self.config.moving_average_window);
        let seasonal = self.config.seasonal_weights[self.reference_date.month0() as usize];
        let external = external_factor(input.external_factors.as_ref(), self.config.holiday_uplift);
        let trend = trend_multiplier(sales);

        let predicted = base * seasonal * external * trend;
        let confidence = confidence_score(sales);

        let lead_ratio = f64::from(input.lead_time_days) / f64::from(self.config.horizon_days);
        let safety_stock =
            self.config.service_level_z * stats::stddev_population(sales) * lead_ratio.sqrt();
        let reorder_point = predicted * lead_ratio + safety_stock;

        // Integer units at the boundary; fractions live only inside the model.
        let predicted_units = predicted.round() as u32;

        Ok(ForecastResult {
            product_id: input.product_id,
            predicted_demand: predicted_units,
            confidence_score: confidence,
            recommended_order_quantity: predicted_units.saturating_sub(input.current_inventory),
            reorder_point: reorder_point.round() as u32,
            forecast_period: format!("{}_DAYS", self.config.horizon_days),
            risk_level: risk_level(predicted_units, input.current_inventory, confidence),
        })
    }

    fn validate(&self, input: &ForecastInput) -> DomainResult<()> {
        if input.historical_sales.is_empty() {
            return Err(DomainError::invalid_input("historical_sales cannot be empty"));
        }
        if input
            .historical_sales
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(DomainError::invalid_input(
                "historical_sales values must be finite and non-negative",
            ));
        }
        if input.lead_time_days == 0 {
            return Err(DomainError::invalid_input("lead_time_days must be positive"));
        }
        if let Some(factors) = &input.external_factors {
            if let Some(weather) = factors.weather {
                if !(0.0..=1.0).contains(&weather) {
                    return Err(DomainError::invalid_input(
                        "weather score must lie within [0, 1]",
                    ));
                }
            }
            if let Some(economy) = factors.economic_indicators {
                if !(0.0..=1.0).contains(&economy) {
                    return Err(DomainError::invalid_input(
                        "economic indicator must lie within [0, 1]",
                    ));
                }
            }
        }
        Ok(())
    }
}

impl Default for ForecastEngine {
    fn default() -> Self {
        Self::new(ForecastConfig::default())
    }
}

impl Engine for ForecastEngine {
    type Input = ForecastInput;
    type Output = ForecastResult;

    fn name(&self) -> &'static str {
        "demand_forecast"
    }

    fn evaluate(&self, input: &Self::Input) -> DomainResult<Self::Output> {
        self.forecast(input)
    }
}

/// Mean of the last `window` periods (full series if shorter).
fn moving_average(sales: &[f64], window: usize) -> f64 {
    let start = sales.len().saturating_sub(window.max(1));
    stats::mean(&sales[start..])
}

fn external_factor(factors: Option<&ExternalFactors>, holiday_uplift: f64) -> f64 {
    let Some(factors) = factors else {
        return 1.0;
    };
    let mut multiplier = 1.0;
    if factors.holidays {
        multiplier *= holiday_uplift;
    }
    if let Some(weather) = factors.weather {
        // [0, 1] score scaled into [0.8, 1.2].
        multiplier *= 0.8 + weather * 0.4;
    }
    if let Some(economy) = factors.economic_indicators {
        // [0, 1] indicator scaled into [0.9, 1.1].
        multiplier *= 0.9 + economy * 0.2;
    }
    multiplier
}

/// First-half vs second-half growth, applied as a multiplier.
///
/// Series shorter than 2 points carry no trend signal; a zero first-half
/// mean has no well-defined growth rate. Both contribute no adjustment.
fn trend_multiplier(sales: &[f64]) -> f64 {
    if sales.len() < 2 {
        return 1.0;
    }
    let mid = sales.len() / 2;
    let first = stats::mean(&sales[..mid]);
    let second = stats::mean(&sales[mid..]);
    if first <= f64::EPSILON {
        return 1.0;
    }
    1.0 + (second - first) / first
}

fn confidence_score(sales: &[f64]) -> f64 {
    match stats::coefficient_of_variation(sales) {
        Some(cv) => (1.0 - cv).clamp(0.1, 0.95),
        // Too short to measure spread: neutral confidence.
        None if sales.len() < 2 => 0.5,
        // All-zero history: least possible signal.
        None => 0.1,
    }
}

fn risk_level(predicted: u32, inventory: u32, confidence: f64) -> RiskLevel {
    // Zero demand means the cover ratio is undefined; treat as high risk.
    if predicted == 0 {
        return RiskLevel::High;
    }
    let ratio = f64::from(inventory) / f64::from(predicted);
    if ratio > 1.5 && confidence > 0.8 {
        RiskLevel::Low
    } else if ratio > 0.8 && confidence > 0.6 {
        RiskLevel::Medium
    } else {
        RiskLevel::High
    }
}
