use serde::{Deserialize, Serialize};

use cartwise_core::stats;
use cartwise_core::{DomainError, DomainResult, Engine, ProductId, ProductScoped, ValueObject};

/// Tuning knobs for the pricing engine.
///
/// Injected at construction; per-tenant overrides happen here, not in code.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PricingConfig {
    /// Minimum acceptable margin over cost.
    pub min_margin: f64,
    /// Sales-tax rate applied on top of cost + margin for the price floor.
    pub vat_rate: f64,
    /// Cap on |recommended − current| as a fraction of the current price.
    pub max_change_fraction: f64,
    /// Single-transaction ceiling for mobile wallet payments; prices above
    /// it are flagged in the reasoning trail.
    pub mobile_payment_ceiling: f64,
    /// Assumed price elasticity of demand (negative: price up, demand down).
    pub demand_elasticity: f64,
}

impl Default for PricingConfig {
    fn default() -> Self {
        Self {
            min_margin: 0.15,
            vat_rate: 0.15,
            max_change_fraction: 0.20,
            mobile_payment_ceiling: 25_000.0,
            demand_elasticity: -1.2,
        }
    }
}

/// Merchandising stance constraining how price tracks competitors.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MarketPosition {
    Premium,
    Competitive,
    Budget,
}

/// Per-product pricing input, one value per invocation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingInput {
    pub product_id: ProductId,
    /// Current list price; must be positive.
    pub current_price: f64,
    /// Unit cost; must be positive.
    pub cost_price: f64,
    /// Observed competitor prices; may be empty, entries must be positive.
    #[serde(default)]
    pub competitor_prices: Vec<f64>,
    /// Demand strength in \[0, 1\].
    pub demand_score: f64,
    /// Units on hand.
    pub inventory_level: u32,
    /// Units sold per day.
    pub sales_velocity: f64,
    /// Caller-supplied seasonal multiplier; must be positive.
    pub seasonal_factor: f64,
    pub market_position: MarketPosition,
}

impl ValueObject for PricingInput {}

impl ProductScoped for PricingInput {
    fn product_id(&self) -> ProductId {
        self.product_id
    }
}

/// Identifier of a pricing rule that fired.
///
/// Stable identifiers let audit tooling and tests match on the rule rather
/// than on message text.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PricingRule {
    CostFloor,
    PremiumUplift,
    CompetitiveAlign,
    BudgetUndercut,
    HighDemand,
    LowDemand,
    FastMover,
    Overstock,
    LowStock,
    Seasonal,
    PsychologicalRounding,
    MobileCeiling,
    ChangeCap,
}

/// One audit-trail entry: which rule fired and what it did to the price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceAdjustment {
    pub rule: PricingRule,
    pub detail: String,
}

impl PriceAdjustment {
    fn new(rule: PricingRule, detail: impl Into<String>) -> Self {
        Self {
            rule,
            detail: detail.into(),
        }
    }
}

impl core::fmt::Display for PriceAdjustment {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(&self.detail)
    }
}

/// Projected business impact of the recommended change, as fractions
/// rounded to two decimals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExpectedImpact {
    pub demand_change: f64,
    pub revenue_change: f64,
    pub margin_change: f64,
}

/// Price recommendation for one product.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PricingRecommendation {
    pub product_id: ProductId,
    pub current_price: f64,
    pub recommended_price: f64,
    /// Signed amount, recommended − current.
    pub price_change: f64,
    pub price_change_percentage: f64,
    /// Rules that fired, in application order.
    pub reasoning: Vec<PriceAdjustment>,
    /// Confidence in \[0, 1\], capped at 0.95.
    pub confidence: f64,
    pub expected_impact: ExpectedImpact,
}

impl ValueObject for PricingRecommendation {}

impl ProductScoped for PricingRecommendation {
    fn product_id(&self) -> ProductId {
        self.product_id
    }
}

/// Deterministic price recommender.
///
/// The pipeline runs cost floor, competitor alignment, demand/inventory
/// multipliers, the caller's seasonal factor, shopper-friendly rounding,
/// the change cap and denomination rounding in that order, then projects
/// the impact through a fixed elasticity. The cost floor is re-asserted at
/// the end and wins over the change cap.
#[derive(Debug, Clone)]
pub struct PricingEngine {
    config: PricingConfig,
}

impl PricingEngine {
    pub fn new(config: PricingConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PricingConfig {
        &self.config
    }

    /// Recommend a revised price for one product.
    pub fn recommend(&self, input: &PricingInput) -> DomainResult<PricingRecommendation> {
        self.validate(input)?;

        let cfg = &self.config;
        let mut reasoning: Vec<PriceAdjustment> = Vec::new();
        let mut price = input.current_price;

        // 1. Cost floor: cost + minimum margin + sales tax.
        let floor = cost_floor(input.cost_price, cfg);
        if price < floor {
            reasoning.push(PriceAdjustment::new(
                PricingRule::CostFloor,
                format!(
                    "raised {price:.2} to the cost floor {floor:.2} ({:.0}% margin + {:.0}% VAT over cost)",
                    cfg.min_margin * 100.0,
                    cfg.vat_rate * 100.0
                ),
            ));
            price = floor;
        }

        // 2. Competitor alignment, one branch per market position.
        if !input.competitor_prices.is_empty() {
            let mean = stats::mean(&input.competitor_prices);
            let min = input
                .competitor_prices
                .iter()
                .copied()
                .fold(f64::INFINITY, f64::min);
            match input.market_position {
                MarketPosition::Premium if price < mean * 1.1 => {
                    price *= 1.05;
                    reasoning.push(PriceAdjustment::new(
                        PricingRule::PremiumUplift,
                        format!("+5% to hold a premium over the {mean:.2} competitor average"),
                    ));
                }
                MarketPosition::Competitive if price > mean * 1.05 => {
                    price *= 0.97;
                    reasoning.push(PriceAdjustment::new(
                        PricingRule::CompetitiveAlign,
                        format!("-3% back toward the {mean:.2} competitor average"),
                    ));
                }
                MarketPosition::Competitive if price < mean * 0.95 => {
                    price *= 1.03;
                    reasoning.push(PriceAdjustment::new(
                        PricingRule::CompetitiveAlign,
                        format!("+3% up toward the {mean:.2} competitor average"),
                    ));
                }
                MarketPosition::Budget if price > min * 1.05 => {
                    price *= 0.95;
                    reasoning.push(PriceAdjustment::new(
                        PricingRule::BudgetUndercut,
                        format!("-5% to undercut the {min:.2} competitor minimum"),
                    ));
                }
                _ => {}
            }
        }

        // 3. Demand, velocity and stock multipliers; independent of each other.
        if input.demand_score > 0.8 {
            price *= 1.05;
            reasoning.push(PriceAdjustment::new(
                PricingRule::HighDemand,
                format!("+5% on strong demand (score {:.2})", input.demand_score),
            ));
        } else if input.demand_score < 0.3 {
            price *= 0.95;
            reasoning.push(PriceAdjustment::new(
                PricingRule::LowDemand,
                format!("-5% on weak demand (score {:.2})", input.demand_score),
            ));
        }
        if input.sales_velocity > 10.0 {
            price *= 1.03;
            reasoning.push(PriceAdjustment::new(
                PricingRule::FastMover,
                format!("+3% on fast movement ({:.1} units/day)", input.sales_velocity),
            ));
        }
        if input.inventory_level > 100 {
            price *= 0.97;
            reasoning.push(PriceAdjustment::new(
                PricingRule::Overstock,
                format!("-3% to move excess stock ({} units)", input.inventory_level),
            ));
        } else if input.inventory_level < 10 {
            price *= 1.02;
            reasoning.push(PriceAdjustment::new(
                PricingRule::LowStock,
                format!("+2% on scarce stock ({} units)", input.inventory_level),
            ));
        }

        // 4. Caller-supplied seasonal factor.
        price *= input.seasonal_factor;
        if input.seasonal_factor != 1.0 {
            reasoning.push(PriceAdjustment::new(
                PricingRule::Seasonal,
                format!("seasonal factor: {:+.1}%", (input.seasonal_factor - 1.0) * 100.0),
            ));
        }

        // 5. Shopper-friendly endings, then the mobile wallet ceiling flag.
        if price >= 10.0 {
            let rounded = psychological_round(price);
            if (rounded - price).abs() > f64::EPSILON {
                reasoning.push(PriceAdjustment::new(
                    PricingRule::PsychologicalRounding,
                    format!("shifted {price:.2} to the shopper-friendly {rounded:.2}"),
                ));
                price = rounded;
            }
        }
        if price > cfg.mobile_payment_ceiling {
            reasoning.push(PriceAdjustment::new(
                PricingRule::MobileCeiling,
                format!(
                    "{price:.2} exceeds the {:.0} mobile wallet single-transaction ceiling",
                    cfg.mobile_payment_ceiling
                ),
            ));
        }

        // 6. Clamp the total move.
        let max_change = input.current_price * cfg.max_change_fraction;
        let change = price - input.current_price;
        if change.abs() > max_change {
            price = input.current_price + max_change.copysign(change);
            reasoning.push(PriceAdjustment::new(
                PricingRule::ChangeCap,
                format!(
                    "change clamped to ±{:.0}% of the current price",
                    cfg.max_change_fraction * 100.0
                ),
            ));
        }

        // 7. Denomination rounding, finer for small prices.
        price = denomination_round(price);

        // The floor wins over the cap and over rounding.
        if price < floor {
            if !reasoning.iter().any(|r| r.rule == PricingRule::CostFloor) {
                reasoning.push(PriceAdjustment::new(
                    PricingRule::CostFloor,
                    format!("held at the cost floor {floor:.2} after adjustments"),
                ));
            }
            price = floor;
        }

        let price_change = price - input.current_price;
        let price_change_percentage = price_change / input.current_price * 100.0;

        // 8. Impact projection through the configured elasticity.
        let demand_change = cfg.demand_elasticity * price_change_percentage / 100.0;
        let revenue_change =
            (1.0 + price_change_percentage / 100.0) * (1.0 + demand_change) - 1.0;
        let margin_change =
            margin(price, input.cost_price) - margin(input.current_price, input.cost_price);

        // 9. Confidence from signal coverage and fired rules.
        let confidence = confidence_score(input, &reasoning);

        Ok(PricingRecommendation {
            product_id: input.product_id,
            current_price: input.current_price,
            recommended_price: price,
            price_change,
            price_change_percentage,
            reasoning,
            confidence,
            expected_impact: ExpectedImpact {
                demand_change: round2(demand_change),
                revenue_change: round2(revenue_change),
                margin_change: round2(margin_change),
            },
        })
    }

    fn validate(&self, input: &PricingInput) -> DomainResult<()> {
        if !(input.current_price.is_finite() && input.current_price > 0.0) {
            return Err(DomainError::invalid_input("current_price must be positive"));
        }
        if !(input.cost_price.is_finite() && input.cost_price > 0.0) {
            return Err(DomainError::invalid_input("cost_price must be positive"));
        }
        if input
            .competitor_prices
            .iter()
            .any(|p| !p.is_finite() || *p <= 0.0)
        {
            return Err(DomainError::invalid_input(
                "competitor_prices entries must be positive",
            ));
        }
        if !(input.demand_score.is_finite() && (0.0..=1.0).contains(&input.demand_score)) {
            return Err(DomainError::invalid_input(
                "demand_score must lie within [0, 1]",
            ));
        }
        if !(input.sales_velocity.is_finite() && input.sales_velocity >= 0.0) {
            return Err(DomainError::invalid_input(
                "sales_velocity must be non-negative",
            ));
        }
        if !(input.seasonal_factor.is_finite() && input.seasonal_factor > 0.0) {
            return Err(DomainError::invalid_input(
                "seasonal_factor must be positive",
            ));
        }
        Ok(())
    }
}

impl Default for PricingEngine {
    fn default() -> Self {
        Self::new(PricingConfig::default())
    }
}

impl Engine for PricingEngine {
    type Input = PricingInput;
    type Output = PricingRecommendation;

    fn name(&self) -> &'static str {
        "price_optimization"
    }

    fn evaluate(&self, input: &Self::Input) -> DomainResult<Self::Output> {
        self.recommend(input)
    }
}

fn cost_floor(cost: f64, cfg: &PricingConfig) -> f64 {
    cost * (1.0 + cfg.min_margin) * (1.0 + cfg.vat_rate)
}

fn margin(price: f64, cost: f64) -> f64 {
    (price - cost) / price
}

fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

/// Shift toward a 0 or 5 trailing digit: remainders mod 10 in the low
/// third round down to 0, the middle third to 5, the high third up to the
/// next 0.
fn psychological_round(price: f64) -> f64 {
    let remainder = price.rem_euclid(10.0);
    if remainder < 10.0 / 3.0 {
        price - remainder
    } else if remainder < 20.0 / 3.0 {
        price - remainder + 5.0
    } else {
        price - remainder + 10.0
    }
}

/// Denomination rounding: finer granularity for small prices, coarser for
/// large ones.
fn denomination_round(price: f64) -> f64 {
    let step = if price < 10.0 {
        0.5
    } else if price < 100.0 {
        1.0
    } else if price < 1_000.0 {
        5.0
    } else {
        10.0
    };
    (price / step).round() * step
}

fn confidence_score(input: &PricingInput, reasoning: &[PriceAdjustment]) -> f64 {
    let mut confidence: f64 = 0.5;
    if input.competitor_prices.len() > 3 {
        confidence += 0.2;
    } else if !input.competitor_prices.is_empty() {
        confidence += 0.1;
    }
    if input.demand_score > 0.8 || input.demand_score < 0.3 {
        confidence += 0.15;
    }
    if input.sales_velocity > 0.0 {
        confidence += 0.1;
    }
    confidence += (reasoning.len() as f64 * 0.03).min(0.15);
    confidence.min(0.95)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn neutral_input() -> PricingInput {
        PricingInput {
            product_id: ProductId::new(),
            current_price: 100.0,
            cost_price: 50.0,
            competitor_prices: Vec::new(),
            demand_score: 0.5,
            inventory_level: 50,
            sales_velocity: 0.0,
            seasonal_factor: 1.0,
            market_position: MarketPosition::Competitive,
        }
    }

    fn fired(recommendation: &PricingRecommendation, rule: PricingRule) -> bool {
        recommendation.reasoning.iter().any(|r| r.rule == rule)
    }

    #[test]
    fn neutral_input_keeps_the_price() {
        let rec = PricingEngine::default().recommend(&neutral_input()).unwrap();
        assert_eq!(rec.recommended_price, 100.0);
        assert_eq!(rec.price_change, 0.0);
        assert!(rec.reasoning.is_empty());
    }

    #[test]
    fn price_below_cost_floor_is_raised() {
        let input = PricingInput {
            current_price: 60.0,
            cost_price: 55.0,
            ..neutral_input()
        };
        let rec = PricingEngine::default().recommend(&input).unwrap();
        let floor = 55.0 * 1.15 * 1.15;
        assert!(rec.recommended_price >= floor - 1e-9);
        assert!(fired(&rec, PricingRule::CostFloor));
    }

    #[test]
    fn cost_floor_wins_over_the_change_cap() {
        // Selling below cost: the floor forces a jump far beyond ±20%.
        let input = PricingInput {
            current_price: 100.0,
            cost_price: 150.0,
            ..neutral_input()
        };
        let rec = PricingEngine::default().recommend(&input).unwrap();
        let floor = 150.0 * 1.15 * 1.15;
        assert!((rec.recommended_price - floor).abs() < 1e-9);
        assert!(rec.price_change > 100.0 * 0.20);
    }

    #[test]
    fn competitive_position_respects_floor_and_cap() {
        // Floor sits above the current price; competitor pull drags it back
        // down; the floor holds.
        let input = PricingInput {
            current_price: 150.0,
            cost_price: 120.0,
            competitor_prices: vec![145.0, 155.0, 148.0, 152.0],
            sales_velocity: 5.0,
            ..neutral_input()
        };
        let rec = PricingEngine::default().recommend(&input).unwrap();
        let floor = 120.0 * 1.15 * 1.15;
        assert!(rec.recommended_price >= floor - 1e-9);
        assert!(rec.price_change.abs() <= 150.0 * 0.20 + 1e-9);
        assert!(fired(&rec, PricingRule::CostFloor));
        assert!(fired(&rec, PricingRule::CompetitiveAlign));
    }

    #[test]
    fn budget_position_undercuts_the_cheapest_competitor() {
        let input = PricingInput {
            current_price: 200.0,
            cost_price: 100.0,
            competitor_prices: vec![150.0, 160.0, 170.0],
            market_position: MarketPosition::Budget,
            ..neutral_input()
        };
        let rec = PricingEngine::default().recommend(&input).unwrap();
        assert!(fired(&rec, PricingRule::BudgetUndercut));
        assert_eq!(rec.recommended_price, 190.0); // 200 × 0.95
    }

    #[test]
    fn premium_position_holds_a_premium_over_the_average() {
        let input = PricingInput {
            current_price: 100.0,
            competitor_prices: vec![100.0, 102.0, 98.0],
            market_position: MarketPosition::Premium,
            ..neutral_input()
        };
        let rec = PricingEngine::default().recommend(&input).unwrap();
        assert!(fired(&rec, PricingRule::PremiumUplift));
        assert_eq!(rec.recommended_price, 105.0);
    }

    #[test]
    fn competitive_position_lifts_an_underpriced_product() {
        let input = PricingInput {
            current_price: 85.0,
            competitor_prices: vec![98.0, 100.0, 102.0],
            ..neutral_input()
        };
        let rec = PricingEngine::default().recommend(&input).unwrap();
        assert!(fired(&rec, PricingRule::CompetitiveAlign));
        assert!(rec.recommended_price > 85.0);
    }

    #[test]
    fn demand_and_stock_signals_fire_independently() {
        let input = PricingInput {
            demand_score: 0.9,
            sales_velocity: 12.0,
            inventory_level: 5,
            ..neutral_input()
        };
        let rec = PricingEngine::default().recommend(&input).unwrap();
        assert!(fired(&rec, PricingRule::HighDemand));
        assert!(fired(&rec, PricingRule::FastMover));
        assert!(fired(&rec, PricingRule::LowStock));
        // 100 × 1.05 × 1.03 × 1.02 = 110.313, psych-rounded to 110.
        assert_eq!(rec.recommended_price, 110.0);
    }

    #[test]
    fn weak_demand_and_overstock_push_the_price_down() {
        let input = PricingInput {
            demand_score: 0.2,
            inventory_level: 150,
            ..neutral_input()
        };
        let rec = PricingEngine::default().recommend(&input).unwrap();
        assert!(fired(&rec, PricingRule::LowDemand));
        assert!(fired(&rec, PricingRule::Overstock));
        assert!(rec.recommended_price < 100.0);
    }

    #[test]
    fn seasonal_surge_is_capped_at_twenty_percent() {
        let input = PricingInput {
            seasonal_factor: 1.5,
            ..neutral_input()
        };
        let rec = PricingEngine::default().recommend(&input).unwrap();
        assert!(fired(&rec, PricingRule::Seasonal));
        assert!(fired(&rec, PricingRule::ChangeCap));
        assert_eq!(rec.recommended_price, 120.0);
    }

    #[test]
    fn off_season_markdown_is_capped_too() {
        let input = PricingInput {
            seasonal_factor: 0.5,
            cost_price: 40.0,
            ..neutral_input()
        };
        let rec = PricingEngine::default().recommend(&input).unwrap();
        assert_eq!(rec.recommended_price, 80.0);
        assert!(fired(&rec, PricingRule::ChangeCap));
    }

    #[test]
    fn large_prices_are_flagged_against_the_wallet_ceiling() {
        let input = PricingInput {
            current_price: 30_000.0,
            cost_price: 20_000.0,
            ..neutral_input()
        };
        let rec = PricingEngine::default().recommend(&input).unwrap();
        assert!(fired(&rec, PricingRule::MobileCeiling));
        assert_eq!(rec.recommended_price, 30_000.0);
    }

    #[test]
    fn impact_projection_uses_the_elasticity_constant() {
        let input = PricingInput {
            seasonal_factor: 1.5,
            ..neutral_input()
        };
        let rec = PricingEngine::default().recommend(&input).unwrap();
        // Capped at +20%: demand −1.2 × 0.20, revenue 1.2 × 0.76 − 1,
        // margin (120−50)/120 − (100−50)/100, all rounded to 2 decimals.
        assert_eq!(rec.expected_impact.demand_change, -0.24);
        assert_eq!(rec.expected_impact.revenue_change, -0.09);
        assert_eq!(rec.expected_impact.margin_change, 0.08);
    }

    #[test]
    fn confidence_grows_with_signal_coverage() {
        let sparse = PricingEngine::default().recommend(&neutral_input()).unwrap();
        assert_eq!(sparse.confidence, 0.5);

        let rich = PricingInput {
            competitor_prices: vec![95.0, 100.0, 105.0, 98.0],
            demand_score: 0.9,
            sales_velocity: 12.0,
            ..neutral_input()
        };
        let rec = PricingEngine::default().recommend(&rich).unwrap();
        assert!(rec.confidence > sparse.confidence);
        assert!(rec.confidence <= 0.95);
    }

    #[test]
    fn reasoning_preserves_application_order() {
        let input = PricingInput {
            current_price: 60.0,
            cost_price: 55.0,
            demand_score: 0.9,
            ..neutral_input()
        };
        let rec = PricingEngine::default().recommend(&input).unwrap();
        let rules: Vec<PricingRule> = rec.reasoning.iter().map(|r| r.rule).collect();
        let floor_pos = rules.iter().position(|r| *r == PricingRule::CostFloor).unwrap();
        let demand_pos = rules.iter().position(|r| *r == PricingRule::HighDemand).unwrap();
        assert!(floor_pos < demand_pos);
    }

    #[test]
    fn empty_competitor_list_is_valid() {
        let rec = PricingEngine::default().recommend(&neutral_input()).unwrap();
        assert!(!fired(&rec, PricingRule::CompetitiveAlign));
    }

    #[test]
    fn non_positive_prices_are_rejected() {
        let engine = PricingEngine::default();
        for (current, cost) in [(0.0, 50.0), (-10.0, 50.0), (100.0, 0.0), (100.0, -5.0)] {
            let input = PricingInput {
                current_price: current,
                cost_price: cost,
                ..neutral_input()
            };
            match engine.recommend(&input).unwrap_err() {
                DomainError::InvalidInput(_) => {}
                other => panic!("expected InvalidInput, got {other:?}"),
            }
        }
    }

    #[test]
    fn out_of_range_scores_are_rejected() {
        let engine = PricingEngine::default();
        assert!(engine
            .recommend(&PricingInput { demand_score: 1.5, ..neutral_input() })
            .is_err());
        assert!(engine
            .recommend(&PricingInput { sales_velocity: -1.0, ..neutral_input() })
            .is_err());
        assert!(engine
            .recommend(&PricingInput { seasonal_factor: 0.0, ..neutral_input() })
            .is_err());
        assert!(engine
            .recommend(&PricingInput {
                competitor_prices: vec![100.0, 0.0],
                ..neutral_input()
            })
            .is_err());
    }

    #[test]
    fn repeat_calls_are_bitwise_identical() {
        let engine = PricingEngine::default();
        let input = PricingInput {
            competitor_prices: vec![95.0, 105.0],
            demand_score: 0.85,
            sales_velocity: 11.0,
            seasonal_factor: 1.1,
            ..neutral_input()
        };
        assert_eq!(engine.recommend(&input).unwrap(), engine.recommend(&input).unwrap());
    }

    #[test]
    fn rules_serialize_as_snake_case() {
        assert_eq!(
            serde_json::to_string(&PricingRule::CostFloor).unwrap(),
            "\"cost_floor\""
        );
        assert_eq!(
            serde_json::to_string(&PricingRule::BudgetUndercut).unwrap(),
            "\"budget_undercut\""
        );
    }

    mod proptest_tests {
        use super::*;
        use proptest::prelude::*;

        fn valid_input() -> impl Strategy<Value = PricingInput> {
            (
                1.0f64..5_000.0,
                0.5f64..3_000.0,
                proptest::collection::vec(1.0f64..5_000.0, 0..6),
                0.0f64..=1.0,
                0u32..500,
                0.0f64..50.0,
                0.7f64..1.4,
                prop_oneof![
                    Just(MarketPosition::Premium),
                    Just(MarketPosition::Competitive),
                    Just(MarketPosition::Budget),
                ],
            )
                .prop_map(
                    |(current, cost, competitors, demand, stock, velocity, seasonal, position)| {
                        PricingInput {
                            product_id: ProductId::new(),
                            current_price: current,
                            cost_price: cost,
                            competitor_prices: competitors,
                            demand_score: demand,
                            inventory_level: stock,
                            sales_velocity: velocity,
                            seasonal_factor: seasonal,
                            market_position: position,
                        }
                    },
                )
        }

        proptest! {
            /// Property: the recommended price never dips below the cost
            /// floor, whatever the adjustments did.
            #[test]
            fn floor_invariant_holds(input in valid_input()) {
                let rec = PricingEngine::default().recommend(&input).unwrap();
                let floor = input.cost_price * 1.15 * 1.15;
                prop_assert!(rec.recommended_price >= floor - 1e-9);
            }

            /// Property: unless the floor forced the move, the total change
            /// stays inside the cap (modulo final denomination granularity).
            #[test]
            fn change_cap_holds_unless_floored(input in valid_input()) {
                let rec = PricingEngine::default().recommend(&input).unwrap();
                let floor = input.cost_price * 1.15 * 1.15;
                if (rec.recommended_price - floor).abs() > 1e-6 {
                    // Largest denomination step is 10, so rounding can add
                    // at most 5 beyond the cap.
                    prop_assert!(
                        rec.price_change.abs() <= input.current_price * 0.20 + 5.0 + 1e-6
                    );
                }
            }

            /// Property: confidence stays inside [0.5, 0.95].
            #[test]
            fn confidence_is_bounded(input in valid_input()) {
                let rec = PricingEngine::default().recommend(&input).unwrap();
                prop_assert!((0.5..=0.95).contains(&rec.confidence));
            }

            /// Property: identical input, identical recommendation.
            #[test]
            fn recommendation_is_deterministic(input in valid_input()) {
                let engine = PricingEngine::default();
                prop_assert_eq!(
                    engine.recommend(&input).unwrap(),
                    engine.recommend(&input).unwrap()
                );
            }
        }
    }
}
