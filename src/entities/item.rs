use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::manufacturing::ItemInfo;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub item_code: String,
    pub item_name: String,
    pub stock_uom: String,
    pub is_stock_item: bool,
    pub is_sub_contracted_item: bool,
    pub is_customer_provided_item: bool,
    /// Template this item is a variant of
    pub variant_of: Option<String>,
    pub default_bom: Option<String>,
    pub default_warehouse: Option<String>,
    pub min_order_qty: Decimal,
    pub disabled: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn to_item_info(&self) -> ItemInfo {
        ItemInfo {
            item_code: self.item_code.clone(),
            variant_of: self.variant_of.clone(),
            default_bom: self.default_bom.clone(),
            default_warehouse: self.default_warehouse.clone(),
            is_stock_item: self.is_stock_item,
            is_sub_contracted_item: self.is_sub_contracted_item,
            is_customer_provided_item: self.is_customer_provided_item,
            min_order_qty: self.min_order_qty,
        }
    }
}
