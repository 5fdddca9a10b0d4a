use async_trait::async_trait;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::errors::ServiceError;

#[derive(Debug, Clone)]
pub struct EventSender {
    sender: mpsc::Sender<Event>,
}

impl EventSender {
    /// Creates a new EventSender
    pub fn new(sender: mpsc::Sender<Event>) -> Self {
        Self { sender }
    }

    /// Sends an event asynchronously
    pub async fn send(&self, event: Event) -> Result<(), ServiceError> {
        self.sender
            .send(event)
            .await
            .map_err(|e| ServiceError::EventError(format!("Failed to send event: {}", e)))
    }

    /// Sends an event, logging instead of failing when the channel is closed.
    pub async fn send_or_log(&self, event: Event) {
        if let Err(e) = self.send(event).await {
            warn!("{}", e);
        }
    }
}

/// Domain events raised by document lifecycle operations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Event {
    // Production plan events
    ProductionPlanCreated(Uuid),
    ProductionPlanSubmitted(Uuid),
    ProductionPlanCancelled(Uuid),
    ProductionPlanStatusChanged {
        plan_id: Uuid,
        old_status: String,
        new_status: String,
    },
    SubAssembliesPlanned {
        plan_id: Uuid,
        rows: usize,
        orphaned_references: usize,
    },
    MaterialRequestCreated {
        material_request_id: Uuid,
        plan_id: Option<Uuid>,
        request_type: String,
    },

    // Work order events
    WorkOrderCreated {
        work_order_id: Uuid,
        item_code: String,
        quantity: Decimal,
    },
    WorkOrderSubmitted(Uuid),
    WorkOrderCancelled(Uuid),
    ProductionRecorded {
        work_order_id: Uuid,
        quantity: Decimal,
    },

    // Payroll events
    PayrollEntrySubmitted(Uuid),
    PayrollEntryQueued(Uuid),
    PayrollEntryFailed {
        payroll_entry_id: Uuid,
        failed_employees: usize,
    },
    SalarySlipsCreated {
        payroll_entry_id: Uuid,
        count: usize,
    },
    SalarySlipsSubmitted {
        payroll_entry_id: Uuid,
        count: usize,
    },
    PayrollPaymentRecorded {
        payroll_entry_id: Uuid,
        entries: usize,
    },
    PayrollEntryCancelled(Uuid),

    // Stock reposting events
    RepostQueued(Uuid),
    RepostSkipped {
        repost_id: Uuid,
        superseded_by: Uuid,
    },
    RepostCompleted(Uuid),
    RepostFailed {
        repost_id: Uuid,
        error: String,
    },
}

// Define a trait for handling events. Handlers implementing this trait will process events asynchronously.
#[async_trait]
pub trait EventHandler: Send + Sync {
    async fn handle_event(&self, event: Event) -> Result<(), String>;
}

/// Logs every event it receives.
pub struct LoggingEventHandler;

#[async_trait]
impl EventHandler for LoggingEventHandler {
    async fn handle_event(&self, event: Event) -> Result<(), String> {
        match &event {
            Event::PayrollEntryFailed {
                payroll_entry_id,
                failed_employees,
            } => warn!(
                "Payroll entry {} failed for {} employee(s)",
                payroll_entry_id, failed_employees
            ),
            Event::RepostFailed { repost_id, error } => {
                warn!("Repost {} failed: {}", repost_id, error)
            }
            Event::SubAssembliesPlanned {
                plan_id,
                orphaned_references,
                ..
            } if *orphaned_references > 0 => warn!(
                "Production plan {} dropped {} unresolved sub-assembly reference(s)",
                plan_id, orphaned_references
            ),
            other => info!("Event: {:?}", other),
        }
        Ok(())
    }
}

// Function to process incoming events and distribute them to registered event handlers.
pub async fn process_events(mut rx: mpsc::Receiver<Event>, handlers: Vec<Box<dyn EventHandler>>) {
    info!("Starting event processing loop");

    while let Some(event) = rx.recv().await {
        for handler in &handlers {
            if let Err(e) = handler.handle_event(event.clone()).await {
                error!("Event handler failed for {:?}: {}", event, e);
            }
        }
    }

    info!("Event channel closed; event processing loop stopped");
}
