use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::bom_tree::{BomCatalog, BomPath, ExplosionDepth};
use super::sub_assembly::FinishedGoodDemand;
use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
pub enum MaterialRequestType {
    #[sea_orm(string_value = "Purchase")]
    Purchase,
    #[sea_orm(string_value = "Customer Provided")]
    CustomerProvided,
}

/// Plan-level switches that shape the material explosion.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MaterialPlanOptions {
    pub ignore_existing_ordered_qty: bool,
    pub include_non_stock_items: bool,
    pub include_subcontracted_items: bool,
    pub for_warehouse: Option<String>,
}

/// A raw material one finished good needs, before netting against stock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawMaterialNeed {
    pub item_code: String,
    pub warehouse: String,
    pub qty: Decimal,
    pub sales_order: Option<Uuid>,
}

/// Stock position of one item in one warehouse (summed over leaves for groups).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct StockPosition {
    pub actual_qty: Decimal,
    pub projected_qty: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaterialRequestLine {
    pub item_code: String,
    pub warehouse: String,
    pub quantity: Decimal,
    pub required_bom_qty: Decimal,
    pub actual_qty: Decimal,
    pub projected_qty: Decimal,
    pub min_order_qty: Decimal,
    pub material_request_type: MaterialRequestType,
    pub sales_order: Option<Uuid>,
}

/// Walks a finished good's BOM down to what has to be bought or supplied.
///
/// Components with their own BOM are followed only for multi-level demand,
/// and subcontracted ones only when `include_subcontracted_items` is set;
/// otherwise the component itself is the requirement.
pub fn explode_raw_materials(
    catalog: &BomCatalog,
    demand: &FinishedGoodDemand,
    options: &MaterialPlanOptions,
) -> Result<Vec<RawMaterialNeed>, ServiceError> {
    let mut needs = Vec::new();
    let path = BomPath::root(&demand.bom_no);
    walk(
        catalog,
        demand,
        options,
        &demand.bom_no,
        demand.planned_qty,
        &path,
        &mut needs,
    )?;
    Ok(needs)
}

fn walk(
    catalog: &BomCatalog,
    demand: &FinishedGoodDemand,
    options: &MaterialPlanOptions,
    bom_no: &str,
    qty: Decimal,
    path: &BomPath,
    needs: &mut Vec<RawMaterialNeed>,
) -> Result<(), ServiceError> {
    let bom = catalog.require_bom(bom_no)?;

    for line in &bom.lines {
        let line_qty = bom.line_qty(line, qty)?;
        let item = catalog.item(&line.item_code);
        let subcontracted = item.map(|i| i.is_sub_contracted_item).unwrap_or(false);

        if let Some(child_bom) = line.bom_no.as_deref() {
            let explode = demand.depth == ExplosionDepth::MultiLevel
                && (!subcontracted || options.include_subcontracted_items);
            if explode {
                let next = path.descend(child_bom)?;
                walk(catalog, demand, options, child_bom, line_qty, &next, needs)?;
                continue;
            }
        }

        let is_stock_item = item.map(|i| i.is_stock_item).unwrap_or(true);
        if !is_stock_item && !options.include_non_stock_items {
            continue;
        }

        let warehouse = options
            .for_warehouse
            .clone()
            .or_else(|| line.source_warehouse.clone())
            .or_else(|| item.and_then(|i| i.default_warehouse.clone()))
            .unwrap_or_else(|| demand.warehouse.clone());

        needs.push(RawMaterialNeed {
            item_code: line.item_code.clone(),
            warehouse,
            qty: line_qty,
            sales_order: demand.sales_order,
        });
    }

    Ok(())
}

/// Quantity to request once stock on hand and on order is counted.
pub fn required_qty(
    total_qty: Decimal,
    projected_qty: Decimal,
    min_order_qty: Decimal,
    ignore_existing_ordered_qty: bool,
) -> Decimal {
    let mut required = if ignore_existing_ordered_qty || projected_qty < Decimal::ZERO {
        total_qty
    } else if total_qty > projected_qty {
        total_qty - projected_qty
    } else {
        Decimal::ZERO
    };

    if required > Decimal::ZERO && required < min_order_qty {
        required = min_order_qty;
    }

    required
}

/// Sums needs per (item, warehouse) and nets them against stock.
///
/// Lines keep the order in which their item first appeared; lines with
/// nothing left to request are dropped.
pub fn net_requirements(
    needs: &[RawMaterialNeed],
    catalog: &BomCatalog,
    stock: &HashMap<(String, String), StockPosition>,
    options: &MaterialPlanOptions,
) -> Vec<MaterialRequestLine> {
    let mut order: Vec<(String, String)> = Vec::new();
    let mut totals: HashMap<(String, String), (Decimal, Option<Uuid>, bool)> = HashMap::new();

    for need in needs {
        let key = (need.item_code.clone(), need.warehouse.clone());
        match totals.get_mut(&key) {
            Some((qty, sales_order, mixed)) => {
                *qty += need.qty;
                if *sales_order != need.sales_order {
                    *mixed = true;
                }
            }
            None => {
                order.push(key.clone());
                totals.insert(key, (need.qty, need.sales_order, false));
            }
        }
    }

    let mut lines = Vec::new();
    for key in order {
        let Some((total, sales_order, mixed)) = totals.remove(&key) else {
            continue;
        };
        let position = stock.get(&key).copied().unwrap_or_default();
        let item = catalog.item(&key.0);
        let min_order_qty = item.map(|i| i.min_order_qty).unwrap_or(Decimal::ZERO);

        let quantity = required_qty(
            total,
            position.projected_qty,
            min_order_qty,
            options.ignore_existing_ordered_qty,
        );
        if quantity <= Decimal::ZERO {
            continue;
        }

        let material_request_type = if item.map(|i| i.is_customer_provided_item).unwrap_or(false) {
            MaterialRequestType::CustomerProvided
        } else {
            MaterialRequestType::Purchase
        };

        lines.push(MaterialRequestLine {
            item_code: key.0,
            warehouse: key.1,
            quantity,
            required_bom_qty: total,
            actual_qty: position.actual_qty,
            projected_qty: position.projected_qty,
            min_order_qty,
            material_request_type,
            sales_order: if mixed { None } else { sales_order },
        });
    }

    lines
}
