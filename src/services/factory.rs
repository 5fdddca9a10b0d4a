use std::sync::Arc;

use sea_orm::DatabaseConnection;

use crate::{
    config::AppConfig,
    events::EventSender,
    jobs::JobQueue,
    services::{
        payroll_entry::PayrollEntryService, production_plan::ProductionPlanService,
        repost_item_valuation::RepostItemValuationService, work_orders::WorkOrderService,
    },
};

/// Factory for creating service instances with shared dependencies
pub struct ServiceFactory {
    db: Arc<DatabaseConnection>,
    event_sender: EventSender,
    job_queue: Arc<dyn JobQueue>,
    config: Arc<AppConfig>,
}

impl ServiceFactory {
    pub fn new(
        db: Arc<DatabaseConnection>,
        event_sender: EventSender,
        job_queue: Arc<dyn JobQueue>,
        config: Arc<AppConfig>,
    ) -> Self {
        Self {
            db,
            event_sender,
            job_queue,
            config,
        }
    }

    pub fn production_plan_service(&self) -> ProductionPlanService {
        ProductionPlanService::new(self.db.clone(), Some(self.event_sender.clone()))
    }

    pub fn work_order_service(&self) -> WorkOrderService {
        WorkOrderService::new(
            self.db.clone(),
            Some(self.event_sender.clone()),
            self.config
                .manufacturing
                .overproduction_percentage_for_work_order,
        )
    }

    pub fn payroll_entry_service(&self) -> PayrollEntryService {
        PayrollEntryService::new(
            self.db.clone(),
            Some(self.event_sender.clone()),
            Some(self.job_queue.clone()),
            self.config.payroll.run_options(),
        )
    }

    pub fn repost_item_valuation_service(&self) -> RepostItemValuationService {
        RepostItemValuationService::new(self.db.clone(), Some(self.event_sender.clone()))
    }

    pub fn job_queue(&self) -> &Arc<dyn JobQueue> {
        &self.job_queue
    }

    pub fn config(&self) -> &Arc<AppConfig> {
        &self.config
    }
}

/// Service container holding all service instances
#[derive(Clone)]
pub struct ServiceContainer {
    pub production_plans: Arc<ProductionPlanService>,
    pub work_orders: Arc<WorkOrderService>,
    pub payroll_entries: Arc<PayrollEntryService>,
    pub reposting: Arc<RepostItemValuationService>,
}

impl ServiceContainer {
    pub fn new(factory: &ServiceFactory) -> Self {
        Self {
            production_plans: Arc::new(factory.production_plan_service()),
            work_orders: Arc::new(factory.work_order_service()),
            payroll_entries: Arc::new(factory.payroll_entry_service()),
            reposting: Arc::new(factory.repost_item_valuation_service()),
        }
    }
}
