//! Giller demo: quote a few requests on the sample network, then settle them

use anyhow::Context;
use chrono::Utc;
use delivery_engine::{completed_payment, sample, Config, DeliveryPipeline};
use settlement::{
    BankAccount, InMemorySettlementStore, LoggingNotifier, SettlementProcessor,
    SimulatedPayoutGateway,
};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use transit_core::{
    CarrierDirectory, CarrierTier, DeliveryRequest, Package, PackageSize, StationId,
    UrgencyLevel, UserId,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    tracing::info!("Starting Giller demo");

    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(&path).with_context(|| format!("loading {}", path))?,
        None => Config::from_env().context("reading GILLER_* overrides")?,
    };

    let graph = Arc::new(sample::seoul_network());
    let pipeline = DeliveryPipeline::new(graph.clone(), &config)?;

    let processor = SettlementProcessor::new(
        config.settlement.clone(),
        Arc::new(InMemorySettlementStore::new()),
        Arc::new(SimulatedPayoutGateway::new(20, 0.8)),
        Arc::new(LoggingNotifier),
    )?;

    let requests = [
        ("seoul", "gangnam", UrgencyLevel::Normal),
        ("seoul", "gangnam", UrgencyLevel::VeryUrgent),
        ("seoul", "euljiro", UrgencyLevel::Urgent),
        ("jonggak", "sadang", UrgencyLevel::Normal),
    ];

    for (from, to, urgency) in requests {
        let request = DeliveryRequest::between(
            UserId::new("gler-demo"),
            StationId::new(from),
            StationId::new(to),
            Package {
                size: PackageSize::Small,
                weight_kg: 1.2,
            },
            urgency,
        );

        let quote = pipeline.quote(&request)?;
        let Some(offer) = quote.best() else {
            println!("{} → {}: no carrier available", from, to);
            continue;
        };

        println!(
            "{} → {} ({:?}): {} via {} min, fare {} won (carrier earns {})",
            from,
            to,
            urgency,
            offer.matched.carrier_id,
            offer.matched.route.total_minutes(),
            offer.pricing.total_fare,
            offer.pricing.carrier_earnings,
        );

        let grade = graph
            .carrier(&offer.matched.carrier_id)
            .map(|profile| profile.tier)
            .unwrap_or(CarrierTier::Regular);
        let account = BankAccount::new("088", "110000000000", offer.matched.carrier_id.as_str());

        // Fares under the minimum commission cannot be settled
        match processor
            .create_settlement(completed_payment(&request, offer, grade, account, Utc::now()))
            .await
        {
            Ok(settlement) => println!(
                "  settlement {}: fee {}, tax {}, net {}",
                settlement.id,
                settlement.amounts.platform_fee,
                settlement.amounts.tax,
                settlement.amounts.net_amount
            ),
            Err(e) => println!("  not settled: {}", e),
        }
    }

    let report = processor.process_pending_batch().await?;
    println!(
        "Batch: {} completed, {} failed",
        report.completed.len(),
        report.failed.len()
    );

    if !report.failed.is_empty() {
        let retried = processor
            .retry_failed_batch(&CancellationToken::new())
            .await?;
        println!(
            "Retry: {} completed, {} failed",
            retried.completed.len(),
            retried.failed.len()
        );
    }

    tracing::info!("Demo finished");
    Ok(())
}
