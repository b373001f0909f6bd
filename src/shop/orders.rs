use crate::app::App;
use crate::hooks::HookHandler;
use crate::records::RecordEvent;

// ============================================================================
// Order Processing Hook
// ============================================================================
//
// Fires before an "orders" record is committed. Logs the order being
// processed and whether a payment would be initiated, then always hands the
// event back to the persistence pipeline. Payment itself is only simulated:
// the presence of a Stripe key decides which log line is emitted, exactly
// one per order, and no network call is made.
//
// ============================================================================

/// Which side of the payment branch an order takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaymentAction {
    /// A Stripe key is configured; payment initiation is logged.
    Initiate,
    /// No Stripe key; a skip warning is logged instead.
    Skip,
}

pub fn payment_action(stripe_key: &str) -> PaymentAction {
    if stripe_key.is_empty() {
        PaymentAction::Skip
    } else {
        PaymentAction::Initiate
    }
}

pub fn register(app: &mut App) {
    let stripe_key = app.config().stripe_key.clone();

    app.on_record_create("orders").bind(HookHandler {
        id: "order-processing",
        priority: 0,
        func: Box::new(move |event: &mut RecordEvent| {
            // A full implementation would price the items and sum the total
            // here before the save.
            tracing::info!(order_id = %event.record.id, "Processing new order");

            match payment_action(&stripe_key) {
                PaymentAction::Initiate => {
                    tracing::info!("Initiating Stripe payment...");
                }
                PaymentAction::Skip => {
                    tracing::warn!("Stripe key not configured, skipping payment");
                }
            }

            event.next();
            Ok(())
        }),
    });
}
