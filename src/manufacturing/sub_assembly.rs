use chrono::NaiveDate;
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::bom_tree::{BomCatalog, BomPath, ExplosionDepth};
use super::references::{ParentLinked, RowRef};
use crate::errors::ServiceError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, DeriveActiveEnum, Serialize, Deserialize)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(16))")]
pub enum ManufacturingType {
    #[sea_orm(string_value = "In House")]
    InHouse,
    #[sea_orm(string_value = "Subcontract")]
    Subcontract,
}

/// A finished-good row of a plan, as input to the explosion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FinishedGoodDemand {
    pub row: RowRef,
    pub item_code: String,
    pub bom_no: String,
    pub warehouse: String,
    pub planned_qty: Decimal,
    pub depth: ExplosionDepth,
    pub schedule_date: Option<NaiveDate>,
    pub sales_order: Option<Uuid>,
}

/// One manufacturing step below a finished good.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubAssemblyRow {
    pub parent_row: Option<RowRef>,
    pub parent_item_code: String,
    pub production_item: String,
    pub bom_no: String,
    pub bom_level: u32,
    pub indent: u32,
    pub qty: Decimal,
    pub fg_warehouse: String,
    pub type_of_manufacturing: ManufacturingType,
    pub schedule_date: Option<NaiveDate>,
}

impl SubAssemblyRow {
    fn merge_key(&self) -> (&str, &str, &str) {
        (&self.production_item, &self.bom_no, &self.fg_warehouse)
    }
}

impl ParentLinked for SubAssemblyRow {
    fn parent_ref(&self) -> Option<RowRef> {
        self.parent_row
    }

    fn set_parent_ref(&mut self, parent: Option<RowRef>) {
        self.parent_row = parent;
    }
}

/// Lists the sub-assemblies below one finished good, in the order the BOM
/// tree is walked (depth first).
pub fn explode_sub_assemblies(
    catalog: &BomCatalog,
    demand: &FinishedGoodDemand,
) -> Result<Vec<SubAssemblyRow>, ServiceError> {
    let mut rows = Vec::new();
    let path = BomPath::root(&demand.bom_no);
    walk(
        catalog,
        demand,
        &demand.bom_no,
        demand.planned_qty,
        0,
        &path,
        &mut rows,
    )?;
    Ok(rows)
}

fn walk(
    catalog: &BomCatalog,
    demand: &FinishedGoodDemand,
    bom_no: &str,
    qty: Decimal,
    indent: u32,
    path: &BomPath,
    rows: &mut Vec<SubAssemblyRow>,
) -> Result<(), ServiceError> {
    let bom = catalog.require_bom(bom_no)?;

    for line in &bom.lines {
        let Some(child_bom) = line.bom_no.as_deref() else {
            continue;
        };

        let child_qty = bom.line_qty(line, qty)?;
        let subcontracted = catalog
            .item(&line.item_code)
            .map(|item| item.is_sub_contracted_item)
            .unwrap_or(false);

        rows.push(SubAssemblyRow {
            parent_row: Some(demand.row),
            parent_item_code: bom.item.clone(),
            production_item: line.item_code.clone(),
            bom_no: child_bom.to_string(),
            bom_level: indent,
            indent,
            qty: child_qty,
            fg_warehouse: demand.warehouse.clone(),
            type_of_manufacturing: if subcontracted {
                ManufacturingType::Subcontract
            } else {
                ManufacturingType::InHouse
            },
            schedule_date: demand.schedule_date,
        });

        if demand.depth == ExplosionDepth::MultiLevel {
            let next = path.descend(child_bom)?;
            walk(catalog, demand, child_bom, child_qty, indent + 1, &next, rows)?;
        }
    }

    Ok(())
}

/// Deepest sub-assemblies first. Rows on the same level keep their order.
pub fn sort_by_level(rows: &mut [SubAssemblyRow]) {
    rows.sort_by(|a, b| b.bom_level.cmp(&a.bom_level));
}

/// Folds rows sharing item, BOM and warehouse into the first of them.
pub fn merge_sub_assemblies(rows: Vec<SubAssemblyRow>) -> Vec<SubAssemblyRow> {
    let mut merged: Vec<SubAssemblyRow> = Vec::with_capacity(rows.len());

    for row in rows {
        match merged.iter_mut().find(|m| m.merge_key() == row.merge_key()) {
            Some(existing) => existing.qty += row.qty,
            None => merged.push(row),
        }
    }

    merged
}

/// Sub-assembly rows for a whole plan.
pub fn plan_sub_assemblies(
    catalog: &BomCatalog,
    demands: &[FinishedGoodDemand],
    combine_sub_items: bool,
) -> Result<Vec<SubAssemblyRow>, ServiceError> {
    let mut rows = Vec::new();
    for demand in demands {
        rows.extend(explode_sub_assemblies(catalog, demand)?);
    }

    sort_by_level(&mut rows);

    if combine_sub_items {
        rows = merge_sub_assemblies(rows);
    }

    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::manufacturing::bom_tree::{BomLine, BomNode, ItemInfo};
    use crate::manufacturing::references::ProvisionalKey;
    use proptest::prelude::*;
    use rust_decimal_macros::dec;

    fn line(item: &str, bom: Option<&str>, qty: Decimal) -> BomLine {
        BomLine {
            item_code: item.into(),
            bom_no: bom.map(Into::into),
            stock_qty: qty,
            source_warehouse: None,
        }
    }

    /// CAR -> (BODY -> (FRAME -> STEEL), WHEEL x4 -> RUBBER)
    fn car_catalog() -> BomCatalog {
        let mut catalog = BomCatalog::new();
        catalog.insert_bom(BomNode {
            name: "BOM-CAR".into(),
            item: "CAR".into(),
            quantity: dec!(1),
            lines: vec![
                line("BODY", Some("BOM-BODY"), dec!(1)),
                line("WHEEL", Some("BOM-WHEEL"), dec!(4)),
                line("PAINT", None, dec!(2)),
            ],
        });
        catalog.insert_bom(BomNode {
            name: "BOM-BODY".into(),
            item: "BODY".into(),
            quantity: dec!(1),
            lines: vec![line("FRAME", Some("BOM-FRAME"), dec!(1))],
        });
        catalog.insert_bom(BomNode {
            name: "BOM-FRAME".into(),
            item: "FRAME".into(),
            quantity: dec!(1),
            lines: vec![line("STEEL", None, dec!(10))],
        });
        catalog.insert_bom(BomNode {
            name: "BOM-WHEEL".into(),
            item: "WHEEL".into(),
            quantity: dec!(2),
            lines: vec![line("RUBBER", None, dec!(1))],
        });
        catalog.insert_item(ItemInfo {
            is_sub_contracted_item: true,
            ..ItemInfo::stock_item("WHEEL")
        });
        catalog
    }

    fn demand(depth: ExplosionDepth, warehouse: &str, qty: Decimal) -> FinishedGoodDemand {
        FinishedGoodDemand {
            row: RowRef::Provisional(ProvisionalKey(1)),
            item_code: "CAR".into(),
            bom_no: "BOM-CAR".into(),
            warehouse: warehouse.into(),
            planned_qty: qty,
            depth,
            schedule_date: None,
            sales_order: None,
        }
    }

    /// L0 -> L1 -> ... -> L{levels}, each needing 1000 of the level below.
    fn thousandfold_chain(levels: usize) -> BomCatalog {
        let mut catalog = BomCatalog::new();
        for level in 0..levels {
            let child = format!("L{}", level + 1);
            let child_bom = (level + 1 < levels).then(|| format!("BOM-L{}", level + 1));
            catalog.insert_bom(BomNode {
                name: format!("BOM-L{}", level),
                item: format!("L{}", level),
                quantity: dec!(1),
                lines: vec![BomLine {
                    item_code: child,
                    bom_no: child_bom,
                    stock_qty: dec!(1000),
                    source_warehouse: None,
                }],
            });
        }
        catalog
    }

    fn chain_demand() -> FinishedGoodDemand {
        FinishedGoodDemand {
            row: RowRef::Provisional(ProvisionalKey(0)),
            item_code: "L0".into(),
            bom_no: "BOM-L0".into(),
            warehouse: "Finished".into(),
            planned_qty: dec!(1),
            depth: ExplosionDepth::MultiLevel,
            schedule_date: None,
            sales_order: None,
        }
    }

    #[test]
    fn runaway_quantities_are_a_validation_error() {
        let catalog = thousandfold_chain(12);
        assert!(matches!(
            plan_sub_assemblies(&catalog, &[chain_demand()], false),
            Err(ServiceError::ValidationError(_))
        ));

        let shallow = thousandfold_chain(3);
        let rows = plan_sub_assemblies(&shallow, &[chain_demand()], false).unwrap();
        assert_eq!(rows[0].qty, dec!(1000000));
    }

    #[test]
    fn multi_level_explosion_walks_every_level() {
        let catalog = car_catalog();
        let rows =
            explode_sub_assemblies(&catalog, &demand(ExplosionDepth::MultiLevel, "FG", dec!(2)))
                .unwrap();

        let summary: Vec<_> = rows
            .iter()
            .map(|r| (r.production_item.as_str(), r.bom_level, r.qty))
            .collect();
        assert_eq!(
            summary,
            vec![("BODY", 0, dec!(2)), ("FRAME", 1, dec!(2)), ("WHEEL", 0, dec!(8))]
        );
        assert_eq!(rows[1].parent_item_code, "BODY");
        assert_eq!(rows[2].type_of_manufacturing, ManufacturingType::Subcontract);
        assert_eq!(rows[0].type_of_manufacturing, ManufacturingType::InHouse);
    }

    #[test]
    fn single_level_explosion_stops_at_direct_children() {
        let catalog = car_catalog();
        let rows =
            explode_sub_assemblies(&catalog, &demand(ExplosionDepth::SingleLevel, "FG", dec!(1)))
                .unwrap();
        let items: Vec<_> = rows.iter().map(|r| r.production_item.as_str()).collect();
        assert_eq!(items, vec!["BODY", "WHEEL"]);
    }

    #[test]
    fn plan_rows_come_deepest_first() {
        let catalog = car_catalog();
        let rows = plan_sub_assemblies(
            &catalog,
            &[demand(ExplosionDepth::MultiLevel, "FG", dec!(1))],
            false,
        )
        .unwrap();
        let items: Vec<_> = rows.iter().map(|r| r.production_item.as_str()).collect();
        assert_eq!(items, vec!["FRAME", "BODY", "WHEEL"]);
    }

    #[test]
    fn combining_merges_only_matching_warehouses() {
        let catalog = car_catalog();
        let demands = vec![
            demand(ExplosionDepth::SingleLevel, "FG", dec!(1)),
            demand(ExplosionDepth::SingleLevel, "FG", dec!(2)),
            demand(ExplosionDepth::SingleLevel, "FG-2", dec!(1)),
        ];

        let rows = plan_sub_assemblies(&catalog, &demands, true).unwrap();
        let summary: Vec<_> = rows
            .iter()
            .map(|r| (r.production_item.as_str(), r.fg_warehouse.as_str(), r.qty))
            .collect();
        assert_eq!(
            summary,
            vec![
                ("BODY", "FG", dec!(3)),
                ("WHEEL", "FG", dec!(12)),
                ("BODY", "FG-2", dec!(1)),
                ("WHEEL", "FG-2", dec!(4)),
            ]
        );
    }

    #[test]
    fn recursive_bom_is_rejected() {
        let mut catalog = BomCatalog::new();
        catalog.insert_bom(BomNode {
            name: "BOM-A".into(),
            item: "A".into(),
            quantity: dec!(1),
            lines: vec![line("B", Some("BOM-B"), dec!(1))],
        });
        catalog.insert_bom(BomNode {
            name: "BOM-B".into(),
            item: "B".into(),
            quantity: dec!(1),
            lines: vec![line("A", Some("BOM-A"), dec!(1))],
        });
        let mut d = demand(ExplosionDepth::MultiLevel, "FG", dec!(1));
        d.bom_no = "BOM-A".into();

        assert!(matches!(
            explode_sub_assemblies(&catalog, &d),
            Err(ServiceError::ValidationError(_))
        ));
    }

    fn row(item: &str, level: u32, warehouse: &str, qty: i64) -> SubAssemblyRow {
        SubAssemblyRow {
            parent_row: None,
            parent_item_code: "FG".into(),
            production_item: item.into(),
            bom_no: format!("BOM-{}", item),
            bom_level: level,
            indent: level,
            qty: Decimal::from(qty),
            fg_warehouse: warehouse.into(),
            type_of_manufacturing: ManufacturingType::InHouse,
            schedule_date: None,
        }
    }

    proptest! {
        #[test]
        fn sorted_levels_never_increase(levels in prop::collection::vec(0u32..6, 0..50)) {
            let mut rows: Vec<_> = levels
                .iter()
                .enumerate()
                .map(|(i, level)| row(&format!("I{}", i), *level, "FG", 1))
                .collect();
            sort_by_level(&mut rows);

            for pair in rows.windows(2) {
                prop_assert!(pair[0].bom_level >= pair[1].bom_level);
                if pair[0].bom_level == pair[1].bom_level {
                    let a: usize = pair[0].production_item[1..].parse().unwrap();
                    let b: usize = pair[1].production_item[1..].parse().unwrap();
                    prop_assert!(a < b);
                }
            }
        }

        #[test]
        fn merge_preserves_quantity_per_key(
            specs in prop::collection::vec((0usize..4, 0usize..2, 1i64..20), 0..40)
        ) {
            let items = ["A", "B", "C", "D"];
            let warehouses = ["FG", "FG-2"];
            let rows: Vec<_> = specs
                .iter()
                .map(|(i, w, q)| row(items[*i], 0, warehouses[*w], *q))
                .collect();

            let merged = merge_sub_assemblies(rows.clone());

            for m in &merged {
                let expected: Decimal = rows
                    .iter()
                    .filter(|r| r.merge_key() == m.merge_key())
                    .map(|r| r.qty)
                    .sum();
                prop_assert_eq!(m.qty, expected);
            }
            let mut keys: Vec<_> = merged.iter().map(|m| m.merge_key()).collect();
            let total = keys.len();
            keys.sort();
            keys.dedup();
            prop_assert_eq!(keys.len(), total);
        }
    }
}
