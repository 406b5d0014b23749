use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};

use chrono::NaiveDate;

use cartwise_batch::{BatchOrchestrator, InMemorySink, TenantScope};
use cartwise_core::{ProductId, TenantId};
use cartwise_forecast::{ForecastConfig, ForecastEngine, ForecastInput};
use cartwise_pricing::{MarketPosition, PricingEngine, PricingInput};

fn forecast_input(seed: u32) -> ForecastInput {
    let sales: Vec<f64> = (0..30)
        .map(|i| 40.0 + f64::from((seed + i) % 17))
        .collect();
    ForecastInput {
        product_id: ProductId::new(),
        historical_sales: sales,
        seasonal_factors: Vec::new(),
        external_factors: None,
        current_inventory: seed % 200,
        lead_time_days: 7,
    }
}

fn pricing_input(seed: u32) -> PricingInput {
    let current = 80.0 + f64::from(seed % 400);
    PricingInput {
        product_id: ProductId::new(),
        current_price: current,
        cost_price: current * 0.6,
        competitor_prices: vec![current * 0.95, current * 1.02, current * 1.08],
        demand_score: f64::from(seed % 10) / 10.0,
        inventory_level: seed % 300,
        sales_velocity: f64::from(seed % 20),
        seasonal_factor: 1.0,
        market_position: MarketPosition::Competitive,
    }
}

fn bench_single_calls(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
    let forecast = ForecastEngine::new(ForecastConfig::default()).with_reference_date(date);
    let pricing = PricingEngine::default();
    let forecast_in = forecast_input(7);
    let pricing_in = pricing_input(7);

    c.bench_function("forecast_single_product", |b| {
        b.iter(|| forecast.forecast(black_box(&forecast_in)).unwrap())
    });
    c.bench_function("pricing_single_product", |b| {
        b.iter(|| pricing.recommend(black_box(&pricing_in)).unwrap())
    });
}

fn bench_batch_fanout(c: &mut Criterion) {
    let date = NaiveDate::from_ymd_opt(2025, 4, 15).unwrap();
    let engine = ForecastEngine::new(ForecastConfig::default()).with_reference_date(date);
    let tenant = TenantId::new();

    let mut group = c.benchmark_group("forecast_batch");
    for size in [10usize, 100, 500] {
        let inputs: Vec<ForecastInput> = (0..size as u32).map(forecast_input).collect();
        group.throughput(Throughput::Elements(size as u64));
        group.bench_with_input(BenchmarkId::from_parameter(size), &inputs, |b, inputs| {
            let orchestrator = BatchOrchestrator::new(TenantScope::Any).with_workers(4);
            b.iter(|| {
                let sink = InMemorySink::new();
                orchestrator
                    .run(&engine, tenant, inputs.clone(), &sink)
                    .unwrap()
            })
        });
    }
    group.finish();
}

criterion_group!(benches, bench_single_calls, bench_batch_fanout);
criterion_main!(benches);
