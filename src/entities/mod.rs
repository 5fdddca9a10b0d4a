//! sea-orm entities, one module per document table.

// Master data
pub mod bin;
pub mod bom;
pub mod bom_item;
pub mod employee;
pub mod item;
pub mod salary_component;
pub mod salary_component_account;
pub mod salary_structure_assignment;
pub mod salary_structure_component;
pub mod stock_settings;
pub mod warehouse;

// Selling
pub mod sales_order;
pub mod sales_order_item;

// Manufacturing
pub mod material_request;
pub mod material_request_item;
pub mod material_request_plan_item;
pub mod production_plan;
pub mod production_plan_item;
pub mod production_plan_item_reference;
pub mod production_plan_sub_assembly_item;
pub mod work_order;

// Payroll
pub mod payroll_employee_detail;
pub mod payroll_entry;
pub mod payroll_payment_entry;
pub mod salary_slip;
pub mod salary_slip_detail;

// Stock
pub mod repost_item_valuation;
