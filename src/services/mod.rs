// Manufacturing
pub mod production_plan;
pub mod work_orders;

// Payroll
pub mod payroll_entry;

// Stock
pub mod repost_item_valuation;

// Deferred work
pub mod background;

// Service factory for dependency injection
pub mod factory;
