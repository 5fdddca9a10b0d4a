use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::errors::ServiceError;

/// Deepest nesting an explosion will follow before giving up.
pub const MAX_BOM_DEPTH: usize = 20;

/// Item master attributes that drive planning decisions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemInfo {
    pub item_code: String,
    pub variant_of: Option<String>,
    pub default_bom: Option<String>,
    pub default_warehouse: Option<String>,
    pub is_stock_item: bool,
    pub is_sub_contracted_item: bool,
    pub is_customer_provided_item: bool,
    pub min_order_qty: Decimal,
}

#[cfg(test)]
impl ItemInfo {
    pub fn stock_item(item_code: impl Into<String>) -> Self {
        Self {
            item_code: item_code.into(),
            variant_of: None,
            default_bom: None,
            default_warehouse: None,
            is_stock_item: true,
            is_sub_contracted_item: false,
            is_customer_provided_item: false,
            min_order_qty: Decimal::ZERO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomLine {
    pub item_code: String,
    /// Set when the component is itself manufactured from a BOM
    pub bom_no: Option<String>,
    pub stock_qty: Decimal,
    pub source_warehouse: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BomNode {
    pub name: String,
    pub item: String,
    /// Quantity of `item` one run of this BOM produces
    pub quantity: Decimal,
    pub lines: Vec<BomLine>,
}

impl BomNode {
    /// Quantity of `line` needed to produce `parent_qty` of this BOM's item.
    ///
    /// Fails instead of overflowing when a deep chain multiplies past the
    /// decimal range.
    pub fn line_qty(&self, line: &BomLine, parent_qty: Decimal) -> Result<Decimal, ServiceError> {
        if self.quantity.is_zero() {
            return Ok(Decimal::ZERO);
        }
        line.stock_qty
            .checked_div(self.quantity)
            .and_then(|per_unit| per_unit.checked_mul(parent_qty))
            .ok_or_else(|| {
                ServiceError::ValidationError(format!(
                    "Quantity of {} in BOM {} is out of range for {} units",
                    line.item_code, self.name, parent_qty
                ))
            })
    }
}

/// In-memory snapshot of the BOMs and items an explosion touches.
#[derive(Debug, Clone, Default)]
pub struct BomCatalog {
    boms: HashMap<String, BomNode>,
    items: HashMap<String, ItemInfo>,
}

impl BomCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_bom(&mut self, bom: BomNode) {
        self.boms.insert(bom.name.clone(), bom);
    }

    pub fn insert_item(&mut self, item: ItemInfo) {
        self.items.insert(item.item_code.clone(), item);
    }

    pub fn bom(&self, name: &str) -> Option<&BomNode> {
        self.boms.get(name)
    }

    pub fn item(&self, item_code: &str) -> Option<&ItemInfo> {
        self.items.get(item_code)
    }

    pub fn require_bom(&self, name: &str) -> Result<&BomNode, ServiceError> {
        self.bom(name)
            .ok_or_else(|| ServiceError::not_found("BOM", name))
    }

    /// The item's own default BOM, or its template's when a variant has none.
    pub fn default_bom_for(&self, item_code: &str) -> Option<&str> {
        let item = self.item(item_code)?;
        if let Some(bom) = item.default_bom.as_deref() {
            return Some(bom);
        }
        item.variant_of
            .as_deref()
            .and_then(|template| self.item(template))
            .and_then(|template| template.default_bom.as_deref())
    }
}

/// How far below the finished good an explosion descends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ExplosionDepth {
    SingleLevel,
    MultiLevel,
}

impl ExplosionDepth {
    pub fn from_multi_level_flag(use_multi_level_bom: bool) -> Self {
        if use_multi_level_bom {
            ExplosionDepth::MultiLevel
        } else {
            ExplosionDepth::SingleLevel
        }
    }
}

/// Chain of BOMs from the finished good down to the node being expanded.
#[derive(Debug, Clone, Default)]
pub struct BomPath {
    boms: Vec<String>,
}

impl BomPath {
    pub fn root(bom_no: &str) -> Self {
        Self {
            boms: vec![bom_no.to_string()],
        }
    }

    pub fn depth(&self) -> usize {
        self.boms.len()
    }

    /// Extends the path, rejecting a BOM that already appears on it.
    pub fn descend(&self, bom_no: &str) -> Result<BomPath, ServiceError> {
        if self.boms.iter().any(|b| b == bom_no) {
            return Err(ServiceError::ValidationError(format!(
                "BOM recursion: {} -> {}",
                self.boms.join(" -> "),
                bom_no
            )));
        }
        if self.boms.len() >= MAX_BOM_DEPTH {
            return Err(ServiceError::ValidationError(format!(
                "BOM {} is nested deeper than {} levels",
                bom_no, MAX_BOM_DEPTH
            )));
        }

        let mut boms = self.boms.clone();
        boms.push(bom_no.to_string());
        Ok(BomPath { boms })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn variant_falls_back_to_template_bom() {
        let mut catalog = BomCatalog::new();
        catalog.insert_item(ItemInfo {
            default_bom: Some("BOM-SHIRT".into()),
            ..ItemInfo::stock_item("SHIRT")
        });
        catalog.insert_item(ItemInfo {
            variant_of: Some("SHIRT".into()),
            ..ItemInfo::stock_item("SHIRT-RED")
        });
        catalog.insert_item(ItemInfo {
            variant_of: Some("SHIRT".into()),
            default_bom: Some("BOM-SHIRT-BLUE".into()),
            ..ItemInfo::stock_item("SHIRT-BLUE")
        });

        assert_eq!(catalog.default_bom_for("SHIRT-RED"), Some("BOM-SHIRT"));
        assert_eq!(catalog.default_bom_for("SHIRT-BLUE"), Some("BOM-SHIRT-BLUE"));
        assert_eq!(catalog.default_bom_for("UNKNOWN"), None);
    }

    #[test]
    fn line_qty_scales_by_bom_quantity() {
        let bom = BomNode {
            name: "BOM-CAR".into(),
            item: "CAR".into(),
            quantity: dec!(2),
            lines: vec![],
        };
        let line = BomLine {
            item_code: "WHEEL".into(),
            bom_no: None,
            stock_qty: dec!(8),
            source_warehouse: None,
        };
        assert_eq!(bom.line_qty(&line, dec!(3)).unwrap(), dec!(12));
    }

    #[test]
    fn line_qty_reports_overflow() {
        let bom = BomNode {
            name: "BOM-BULK".into(),
            item: "BULK".into(),
            quantity: dec!(1),
            lines: vec![],
        };
        let line = BomLine {
            item_code: "GRAIN".into(),
            bom_no: None,
            stock_qty: dec!(1000),
            source_warehouse: None,
        };
        assert!(matches!(
            bom.line_qty(&line, Decimal::MAX),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn path_rejects_cycles() {
        let path = BomPath::root("A").descend("B").unwrap();
        assert_eq!(path.depth(), 2);
        assert!(matches!(
            path.descend("A"),
            Err(ServiceError::ValidationError(_))
        ));
    }

    #[test]
    fn path_rejects_excessive_depth() {
        let mut path = BomPath::root("L0");
        for level in 1..MAX_BOM_DEPTH {
            path = path.descend(&format!("L{}", level)).unwrap();
        }
        assert!(path.descend("TOO-DEEP").is_err());
    }
}
