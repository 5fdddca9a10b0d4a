//! Production planning rules: BOM explosion, sub-assembly aggregation,
//! material netting and plan progress. Nothing here touches the database;
//! `services::production_plan` loads the inputs and persists the results.

pub mod bom_tree;
pub mod material_planning;
pub mod progress;
pub mod references;
pub mod sub_assembly;
pub mod warehouses;

pub use bom_tree::{BomCatalog, BomLine, BomNode, ExplosionDepth, ItemInfo, MAX_BOM_DEPTH};
pub use material_planning::{MaterialPlanOptions, MaterialRequestLine, MaterialRequestType};
pub use progress::ProductionPlanStatus;
pub use references::{IdentityMap, ProvisionalKey, RowRef};
pub use sub_assembly::{FinishedGoodDemand, ManufacturingType, SubAssemblyRow};
pub use warehouses::WarehouseTree;
