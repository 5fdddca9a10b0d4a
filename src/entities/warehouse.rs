use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use crate::manufacturing::warehouses::WarehouseNode;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "warehouses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub parent_warehouse: Option<String>,
    pub is_group: bool,
    pub company: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for WarehouseNode {
    fn from(model: Model) -> Self {
        WarehouseNode {
            name: model.name,
            parent: model.parent_warehouse,
            is_group: model.is_group,
        }
    }
}
