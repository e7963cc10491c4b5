use std::sync::Arc;
use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{Consumer, StreamConsumer};
use rdkafka::message::Message;
use tracing::{error, info};

use lilac_core::events::{AccountCreatedEvent, OwnerOnboardedEvent};
use lilac_onboard::{OnboardOutcome, OnboardingWorkflow};
use lilac_store::EventProducer;

/// Bounded deadline for one onboarding invocation; a hung store or mail
/// call fails the event and leaves the account in its last persisted state.
const ONBOARD_TIMEOUT: Duration = Duration::from_secs(120);

/// Consumes account-created events and runs onboarding for each one.
pub async fn start_onboarding_worker(
    brokers: String,
    group_id: String,
    topic: String,
    onboarding: Arc<OnboardingWorkflow>,
    events: Arc<EventProducer>,
) {
    let consumer: StreamConsumer = ClientConfig::new()
        .set("bootstrap.servers", &brokers)
        .set("group.id", &group_id)
        .set("enable.auto.commit", "true")
        .set("auto.offset.reset", "earliest")
        .create()
        .expect("Consumer creation failed");

    consumer
        .subscribe(&[topic.as_str()])
        .expect("Can't subscribe");

    info!("Onboarding worker started, listening for new accounts...");

    loop {
        match consumer.recv().await {
            Err(e) => error!("Kafka error: {}", e),
            Ok(m) => {
                if let Some(payload) = m.payload_view::<str>() {
                    match payload {
                        Ok(raw) => handle_event(raw, &onboarding, &events).await,
                        Err(e) => error!("Error reading payload: {}", e),
                    }
                }
            }
        }
    }
}

async fn handle_event(raw: &str, onboarding: &OnboardingWorkflow, events: &EventProducer) {
    let event: AccountCreatedEvent = match serde_json::from_str(raw) {
        Ok(event) => event,
        Err(e) => {
            error!("Malformed account event: {}", e);
            return;
        }
    };

    match tokio::time::timeout(ONBOARD_TIMEOUT, onboarding.handle_account_created(&event)).await {
        Err(_) => error!(
            "Onboarding timed out for account {} after {:?}",
            event.account_id, ONBOARD_TIMEOUT
        ),
        Ok(Err(e)) => error!("Onboarding failed for account {}: {}", event.account_id, e),
        Ok(Ok(OnboardOutcome::SkippedRole { .. })) => {}
        Ok(Ok(OnboardOutcome::AlreadyProvisioned { slug })) => {
            info!(
                "Account {} was already provisioned with slug \"{}\"",
                event.account_id, slug
            );
        }
        Ok(Ok(OnboardOutcome::Provisioned { slug, booking_url })) => {
            let onboarded = OwnerOnboardedEvent {
                account_id: event.account_id.clone(),
                slug,
                booking_url,
            };
            // Best-effort: downstream consumers can also rebuild from the store.
            if let Err(e) = events.publish_owner_onboarded(&onboarded).await {
                error!(
                    "Failed to publish owners.onboarded for {}: {}",
                    event.account_id, e
                );
            }
        }
    }
}
