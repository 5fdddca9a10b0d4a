use sea_orm_migration::prelude::*;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20240101_000001_create_master_data_tables::Migration),
            Box::new(m20240101_000002_create_selling_tables::Migration),
            Box::new(m20240101_000003_create_production_planning_tables::Migration),
            Box::new(m20240101_000004_create_payroll_tables::Migration),
            Box::new(m20240101_000005_create_repost_item_valuations_table::Migration),
        ]
    }
}

mod m20240101_000001_create_master_data_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000001_create_master_data_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Items::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Items::ItemCode)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Items::ItemName).string().not_null())
                        .col(ColumnDef::new(Items::StockUom).string().not_null())
                        .col(
                            ColumnDef::new(Items::IsStockItem)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Items::IsSubContractedItem)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(Items::IsCustomerProvidedItem)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Items::VariantOf).string().null())
                        .col(ColumnDef::new(Items::DefaultBom).string().null())
                        .col(ColumnDef::new(Items::DefaultWarehouse).string().null())
                        .col(
                            ColumnDef::new(Items::MinOrderQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Items::Disabled)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Boms::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Boms::Name).string().primary_key().not_null())
                        .col(ColumnDef::new(Boms::Item).string().not_null())
                        .col(ColumnDef::new(Boms::Company).string().not_null())
                        .col(ColumnDef::new(Boms::Quantity).decimal().not_null())
                        .col(
                            ColumnDef::new(Boms::IsActive)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(
                            ColumnDef::new(Boms::IsDefault)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Boms::Docstatus).small_integer().not_null())
                        .col(
                            ColumnDef::new(Boms::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_boms_item")
                        .table(Boms::Table)
                        .col(Boms::Item)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(BomItems::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(BomItems::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(BomItems::Bom).string().not_null())
                        .col(ColumnDef::new(BomItems::Idx).integer().not_null())
                        .col(ColumnDef::new(BomItems::ItemCode).string().not_null())
                        .col(ColumnDef::new(BomItems::BomNo).string().null())
                        .col(ColumnDef::new(BomItems::Qty).decimal().not_null())
                        .col(ColumnDef::new(BomItems::StockQty).decimal().not_null())
                        .col(ColumnDef::new(BomItems::SourceWarehouse).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bom_items_bom")
                        .table(BomItems::Table)
                        .col(BomItems::Bom)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Warehouses::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Warehouses::Name)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Warehouses::ParentWarehouse).string().null())
                        .col(
                            ColumnDef::new(Warehouses::IsGroup)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(Warehouses::Company).string().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(Bins::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(Bins::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(Bins::ItemCode).string().not_null())
                        .col(ColumnDef::new(Bins::Warehouse).string().not_null())
                        .col(
                            ColumnDef::new(Bins::ActualQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Bins::ProjectedQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(Bins::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_bins_item_warehouse")
                        .table(Bins::Table)
                        .col(Bins::ItemCode)
                        .col(Bins::Warehouse)
                        .unique()
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(StockSettings::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(StockSettings::Id)
                                .integer()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(StockSettings::StockFrozenUpto).date().null())
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(StockSettings::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Bins::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Warehouses::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(BomItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Boms::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Items::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Items {
        Table,
        ItemCode,
        ItemName,
        StockUom,
        IsStockItem,
        IsSubContractedItem,
        IsCustomerProvidedItem,
        VariantOf,
        DefaultBom,
        DefaultWarehouse,
        MinOrderQty,
        Disabled,
    }

    #[derive(DeriveIden)]
    enum Boms {
        Table,
        Name,
        Item,
        Company,
        Quantity,
        IsActive,
        IsDefault,
        Docstatus,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum BomItems {
        Table,
        Id,
        Bom,
        Idx,
        ItemCode,
        BomNo,
        Qty,
        StockQty,
        SourceWarehouse,
    }

    #[derive(DeriveIden)]
    enum Warehouses {
        Table,
        Name,
        ParentWarehouse,
        IsGroup,
        Company,
    }

    #[derive(DeriveIden)]
    enum Bins {
        Table,
        Id,
        ItemCode,
        Warehouse,
        ActualQty,
        ProjectedQty,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum StockSettings {
        Table,
        Id,
        StockFrozenUpto,
    }
}

mod m20240101_000002_create_selling_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000002_create_selling_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(SalesOrders::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SalesOrders::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SalesOrders::Name).string().not_null())
                        .col(ColumnDef::new(SalesOrders::Company).string().not_null())
                        .col(ColumnDef::new(SalesOrders::Customer).string().not_null())
                        .col(ColumnDef::new(SalesOrders::TransactionDate).date().not_null())
                        .col(ColumnDef::new(SalesOrders::DeliveryDate).date().null())
                        .col(ColumnDef::new(SalesOrders::Status).string().not_null())
                        .col(
                            ColumnDef::new(SalesOrders::Docstatus)
                                .small_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalesOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sales_orders_company_status")
                        .table(SalesOrders::Table)
                        .col(SalesOrders::Company)
                        .col(SalesOrders::Status)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SalesOrderItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SalesOrderItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SalesOrderItems::SalesOrder).uuid().not_null())
                        .col(ColumnDef::new(SalesOrderItems::Idx).integer().not_null())
                        .col(ColumnDef::new(SalesOrderItems::ItemCode).string().not_null())
                        .col(ColumnDef::new(SalesOrderItems::BomNo).string().null())
                        .col(ColumnDef::new(SalesOrderItems::Warehouse).string().not_null())
                        .col(ColumnDef::new(SalesOrderItems::Qty).decimal().not_null())
                        .col(
                            ColumnDef::new(SalesOrderItems::WorkOrderQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(SalesOrderItems::DeliveryDate).date().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_sales_order_items_sales_order")
                        .table(SalesOrderItems::Table)
                        .col(SalesOrderItems::SalesOrder)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(SalesOrderItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SalesOrders::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum SalesOrders {
        Table,
        Id,
        Name,
        Company,
        Customer,
        TransactionDate,
        DeliveryDate,
        Status,
        Docstatus,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum SalesOrderItems {
        Table,
        Id,
        SalesOrder,
        Idx,
        ItemCode,
        BomNo,
        Warehouse,
        Qty,
        WorkOrderQty,
        DeliveryDate,
    }
}

mod m20240101_000003_create_production_planning_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000003_create_production_planning_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(ProductionPlans::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductionPlans::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductionPlans::Company).string().not_null())
                        .col(ColumnDef::new(ProductionPlans::PostingDate).date().not_null())
                        .col(ColumnDef::new(ProductionPlans::FromDate).date().null())
                        .col(ColumnDef::new(ProductionPlans::ToDate).date().null())
                        .col(ColumnDef::new(ProductionPlans::Customer).string().null())
                        .col(ColumnDef::new(ProductionPlans::ItemCode).string().null())
                        .col(
                            ColumnDef::new(ProductionPlans::GetItemsFrom)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlans::CombineItems)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ProductionPlans::CombineSubItems)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ProductionPlans::IgnoreExistingOrderedQty)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ProductionPlans::IncludeNonStockItems)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(ProductionPlans::IncludeSubcontractedItems)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(ProductionPlans::ForWarehouse).string().null())
                        .col(ColumnDef::new(ProductionPlans::Status).string().not_null())
                        .col(
                            ColumnDef::new(ProductionPlans::Docstatus)
                                .small_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlans::TotalPlannedQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductionPlans::TotalProducedQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductionPlans::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlans::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductionPlanItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductionPlanItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanItems::ProductionPlan)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(ProductionPlanItems::Idx).integer().not_null())
                        .col(ColumnDef::new(ProductionPlanItems::ItemCode).string().not_null())
                        .col(ColumnDef::new(ProductionPlanItems::BomNo).string().not_null())
                        .col(ColumnDef::new(ProductionPlanItems::Warehouse).string().not_null())
                        .col(ColumnDef::new(ProductionPlanItems::PlannedQty).decimal().not_null())
                        .col(
                            ColumnDef::new(ProductionPlanItems::OrderedQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanItems::PendingQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanItems::ProducedQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanItems::PlannedStartDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanItems::UseMultiLevelBom)
                                .boolean()
                                .not_null()
                                .default(true),
                        )
                        .col(ColumnDef::new(ProductionPlanItems::SalesOrder).uuid().null())
                        .col(ColumnDef::new(ProductionPlanItems::SalesOrderItem).uuid().null())
                        .col(ColumnDef::new(ProductionPlanItems::MaterialRequest).uuid().null())
                        .col(
                            ColumnDef::new(ProductionPlanItems::MaterialRequestItem)
                                .uuid()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_production_plan_items_plan")
                        .table(ProductionPlanItems::Table)
                        .col(ProductionPlanItems::ProductionPlan)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductionPlanItemReferences::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductionPlanItemReferences::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanItemReferences::ProductionPlan)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanItemReferences::Idx)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanItemReferences::ItemReference)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanItemReferences::SalesOrder)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanItemReferences::SalesOrderItem)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanItemReferences::Qty)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanItemReferences::OrderedQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_production_plan_item_references_item")
                        .table(ProductionPlanItemReferences::Table)
                        .col(ProductionPlanItemReferences::ItemReference)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(ProductionPlanSubAssemblyItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(ProductionPlanSubAssemblyItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanSubAssemblyItems::ProductionPlan)
                                .uuid()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanSubAssemblyItems::Idx)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanSubAssemblyItems::ProductionPlanItem)
                                .uuid()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanSubAssemblyItems::ParentItemCode)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanSubAssemblyItems::ProductionItem)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanSubAssemblyItems::BomNo)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanSubAssemblyItems::BomLevel)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanSubAssemblyItems::Indent)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanSubAssemblyItems::Qty)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanSubAssemblyItems::OrderedQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanSubAssemblyItems::FgWarehouse)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanSubAssemblyItems::TypeOfManufacturing)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(ProductionPlanSubAssemblyItems::ScheduleDate)
                                .date()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_production_plan_sub_assembly_items_plan")
                        .table(ProductionPlanSubAssemblyItems::Table)
                        .col(ProductionPlanSubAssemblyItems::ProductionPlan)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MaterialRequestPlanItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MaterialRequestPlanItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialRequestPlanItems::ProductionPlan)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MaterialRequestPlanItems::Idx).integer().not_null())
                        .col(
                            ColumnDef::new(MaterialRequestPlanItems::ItemCode)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialRequestPlanItems::Warehouse)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialRequestPlanItems::Quantity)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialRequestPlanItems::RequiredBomQty)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialRequestPlanItems::ActualQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MaterialRequestPlanItems::ProjectedQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MaterialRequestPlanItems::MinOrderQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MaterialRequestPlanItems::MaterialRequestType)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MaterialRequestPlanItems::SalesOrder).uuid().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MaterialRequests::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MaterialRequests::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MaterialRequests::Company).string().not_null())
                        .col(
                            ColumnDef::new(MaterialRequests::MaterialRequestType)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialRequests::TransactionDate)
                                .date()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MaterialRequests::ScheduleDate).date().not_null())
                        .col(ColumnDef::new(MaterialRequests::ProductionPlan).uuid().null())
                        .col(
                            ColumnDef::new(MaterialRequests::Docstatus)
                                .small_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialRequests::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(MaterialRequestItems::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(MaterialRequestItems::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialRequestItems::MaterialRequest)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MaterialRequestItems::Idx).integer().not_null())
                        .col(
                            ColumnDef::new(MaterialRequestItems::ItemCode)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(MaterialRequestItems::Warehouse)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MaterialRequestItems::Qty).decimal().not_null())
                        .col(
                            ColumnDef::new(MaterialRequestItems::OrderedQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(MaterialRequestItems::ScheduleDate)
                                .date()
                                .not_null(),
                        )
                        .col(ColumnDef::new(MaterialRequestItems::BomNo).string().null())
                        .col(ColumnDef::new(MaterialRequestItems::SalesOrder).uuid().null())
                        .col(ColumnDef::new(MaterialRequestItems::ProductionPlan).uuid().null())
                        .col(
                            ColumnDef::new(MaterialRequestItems::MaterialRequestPlanItem)
                                .uuid()
                                .null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_material_request_items_request")
                        .table(MaterialRequestItems::Table)
                        .col(MaterialRequestItems::MaterialRequest)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(WorkOrders::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(WorkOrders::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(WorkOrders::Company).string().not_null())
                        .col(ColumnDef::new(WorkOrders::ProductionItem).string().not_null())
                        .col(ColumnDef::new(WorkOrders::BomNo).string().not_null())
                        .col(ColumnDef::new(WorkOrders::Qty).decimal().not_null())
                        .col(
                            ColumnDef::new(WorkOrders::ProducedQty)
                                .decimal()
                                .not_null()
                                .default(0),
                        )
                        .col(ColumnDef::new(WorkOrders::FgWarehouse).string().not_null())
                        .col(ColumnDef::new(WorkOrders::PlannedStartDate).date().not_null())
                        .col(ColumnDef::new(WorkOrders::ProductionPlan).uuid().null())
                        .col(ColumnDef::new(WorkOrders::ProductionPlanItem).uuid().null())
                        .col(
                            ColumnDef::new(WorkOrders::ProductionPlanSubAssemblyItem)
                                .uuid()
                                .null(),
                        )
                        .col(ColumnDef::new(WorkOrders::SalesOrder).uuid().null())
                        .col(ColumnDef::new(WorkOrders::Status).string().not_null())
                        .col(ColumnDef::new(WorkOrders::Docstatus).small_integer().not_null())
                        .col(
                            ColumnDef::new(WorkOrders::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(WorkOrders::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_work_orders_production_plan_item")
                        .table(WorkOrders::Table)
                        .col(WorkOrders::ProductionPlanItem)
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_work_orders_production_plan")
                        .table(WorkOrders::Table)
                        .col(WorkOrders::ProductionPlan)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(WorkOrders::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MaterialRequestItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MaterialRequests::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(MaterialRequestPlanItems::Table).to_owned())
                .await?;
            manager
                .drop_table(
                    Table::drop()
                        .table(ProductionPlanSubAssemblyItems::Table)
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(
                    Table::drop()
                        .table(ProductionPlanItemReferences::Table)
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(Table::drop().table(ProductionPlanItems::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(ProductionPlans::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum ProductionPlans {
        Table,
        Id,
        Company,
        PostingDate,
        FromDate,
        ToDate,
        Customer,
        ItemCode,
        GetItemsFrom,
        CombineItems,
        CombineSubItems,
        IgnoreExistingOrderedQty,
        IncludeNonStockItems,
        IncludeSubcontractedItems,
        ForWarehouse,
        Status,
        Docstatus,
        TotalPlannedQty,
        TotalProducedQty,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum ProductionPlanItems {
        Table,
        Id,
        ProductionPlan,
        Idx,
        ItemCode,
        BomNo,
        Warehouse,
        PlannedQty,
        OrderedQty,
        PendingQty,
        ProducedQty,
        PlannedStartDate,
        UseMultiLevelBom,
        SalesOrder,
        SalesOrderItem,
        MaterialRequest,
        MaterialRequestItem,
    }

    #[derive(DeriveIden)]
    enum ProductionPlanItemReferences {
        Table,
        Id,
        ProductionPlan,
        Idx,
        ItemReference,
        SalesOrder,
        SalesOrderItem,
        Qty,
        OrderedQty,
    }

    #[derive(DeriveIden)]
    enum ProductionPlanSubAssemblyItems {
        Table,
        Id,
        ProductionPlan,
        Idx,
        ProductionPlanItem,
        ParentItemCode,
        ProductionItem,
        BomNo,
        BomLevel,
        Indent,
        Qty,
        OrderedQty,
        FgWarehouse,
        TypeOfManufacturing,
        ScheduleDate,
    }

    #[derive(DeriveIden)]
    enum MaterialRequestPlanItems {
        Table,
        Id,
        ProductionPlan,
        Idx,
        ItemCode,
        Warehouse,
        Quantity,
        RequiredBomQty,
        ActualQty,
        ProjectedQty,
        MinOrderQty,
        MaterialRequestType,
        SalesOrder,
    }

    #[derive(DeriveIden)]
    enum MaterialRequests {
        Table,
        Id,
        Company,
        MaterialRequestType,
        TransactionDate,
        ScheduleDate,
        ProductionPlan,
        Docstatus,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum MaterialRequestItems {
        Table,
        Id,
        MaterialRequest,
        Idx,
        ItemCode,
        Warehouse,
        Qty,
        OrderedQty,
        ScheduleDate,
        BomNo,
        SalesOrder,
        ProductionPlan,
        MaterialRequestPlanItem,
    }

    #[derive(DeriveIden)]
    enum WorkOrders {
        Table,
        Id,
        Company,
        ProductionItem,
        BomNo,
        Qty,
        ProducedQty,
        FgWarehouse,
        PlannedStartDate,
        ProductionPlan,
        ProductionPlanItem,
        ProductionPlanSubAssemblyItem,
        SalesOrder,
        Status,
        Docstatus,
        CreatedAt,
        UpdatedAt,
    }
}

mod m20240101_000004_create_payroll_tables {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000004_create_payroll_tables"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(Employees::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(Employees::Name)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(Employees::EmployeeName).string().not_null())
                        .col(ColumnDef::new(Employees::Company).string().not_null())
                        .col(ColumnDef::new(Employees::Branch).string().null())
                        .col(ColumnDef::new(Employees::Department).string().null())
                        .col(ColumnDef::new(Employees::Status).string().not_null())
                        .col(ColumnDef::new(Employees::DateOfJoining).date().not_null())
                        .col(ColumnDef::new(Employees::RelievingDate).date().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SalaryComponents::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SalaryComponents::Name)
                                .string()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalaryComponents::ComponentType)
                                .string()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SalaryComponentAccounts::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SalaryComponentAccounts::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalaryComponentAccounts::SalaryComponent)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalaryComponentAccounts::Company)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalaryComponentAccounts::Account)
                                .string()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SalaryStructureAssignments::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SalaryStructureAssignments::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalaryStructureAssignments::Employee)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalaryStructureAssignments::SalaryStructure)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalaryStructureAssignments::Company)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalaryStructureAssignments::FromDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalaryStructureAssignments::Currency)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalaryStructureAssignments::PayrollPayableAccount)
                                .string()
                                .null(),
                        )
                        .col(
                            ColumnDef::new(SalaryStructureAssignments::Docstatus)
                                .small_integer()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_salary_structure_assignments_employee")
                        .table(SalaryStructureAssignments::Table)
                        .col(SalaryStructureAssignments::Employee)
                        .col(SalaryStructureAssignments::FromDate)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SalaryStructureComponents::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SalaryStructureComponents::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalaryStructureComponents::SalaryStructure)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalaryStructureComponents::Idx)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalaryStructureComponents::SalaryComponent)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalaryStructureComponents::Amount)
                                .decimal()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PayrollEntries::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PayrollEntries::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PayrollEntries::Company).string().not_null())
                        .col(ColumnDef::new(PayrollEntries::PostingDate).date().not_null())
                        .col(ColumnDef::new(PayrollEntries::StartDate).date().not_null())
                        .col(ColumnDef::new(PayrollEntries::EndDate).date().not_null())
                        .col(
                            ColumnDef::new(PayrollEntries::PayrollFrequency)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PayrollEntries::Branch).string().null())
                        .col(ColumnDef::new(PayrollEntries::Department).string().null())
                        .col(
                            ColumnDef::new(PayrollEntries::PayrollPayableAccount)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PayrollEntries::PaymentAccount).string().null())
                        .col(ColumnDef::new(PayrollEntries::Currency).string().not_null())
                        .col(
                            ColumnDef::new(PayrollEntries::ExchangeRate)
                                .decimal()
                                .not_null()
                                .default(1),
                        )
                        .col(ColumnDef::new(PayrollEntries::CostCenter).string().null())
                        .col(ColumnDef::new(PayrollEntries::Status).string().not_null())
                        .col(
                            ColumnDef::new(PayrollEntries::Docstatus)
                                .small_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollEntries::NumberOfEmployees)
                                .integer()
                                .not_null()
                                .default(0),
                        )
                        .col(
                            ColumnDef::new(PayrollEntries::SalarySlipsCreated)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(
                            ColumnDef::new(PayrollEntries::SalarySlipsSubmitted)
                                .boolean()
                                .not_null()
                                .default(false),
                        )
                        .col(ColumnDef::new(PayrollEntries::ErrorMessage).text().null())
                        .col(
                            ColumnDef::new(PayrollEntries::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollEntries::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PayrollEmployeeDetails::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PayrollEmployeeDetails::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollEmployeeDetails::PayrollEntry)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PayrollEmployeeDetails::Idx).integer().not_null())
                        .col(
                            ColumnDef::new(PayrollEmployeeDetails::Employee)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollEmployeeDetails::EmployeeName)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PayrollEmployeeDetails::Department).string().null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SalarySlips::Table)
                        .if_not_exists()
                        .col(ColumnDef::new(SalarySlips::Id).uuid().primary_key().not_null())
                        .col(ColumnDef::new(SalarySlips::PayrollEntry).uuid().null())
                        .col(ColumnDef::new(SalarySlips::Employee).string().not_null())
                        .col(ColumnDef::new(SalarySlips::EmployeeName).string().not_null())
                        .col(ColumnDef::new(SalarySlips::Company).string().not_null())
                        .col(ColumnDef::new(SalarySlips::PostingDate).date().not_null())
                        .col(ColumnDef::new(SalarySlips::StartDate).date().not_null())
                        .col(ColumnDef::new(SalarySlips::EndDate).date().not_null())
                        .col(ColumnDef::new(SalarySlips::SalaryStructure).string().not_null())
                        .col(ColumnDef::new(SalarySlips::Currency).string().not_null())
                        .col(ColumnDef::new(SalarySlips::ExchangeRate).decimal().not_null())
                        .col(
                            ColumnDef::new(SalarySlips::PayrollPayableAccount)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SalarySlips::GrossPay).decimal().not_null())
                        .col(ColumnDef::new(SalarySlips::TotalDeduction).decimal().not_null())
                        .col(ColumnDef::new(SalarySlips::NetPay).decimal().not_null())
                        .col(ColumnDef::new(SalarySlips::BaseGrossPay).decimal().not_null())
                        .col(
                            ColumnDef::new(SalarySlips::BaseTotalDeduction)
                                .decimal()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SalarySlips::BaseNetPay).decimal().not_null())
                        .col(ColumnDef::new(SalarySlips::Docstatus).small_integer().not_null())
                        .col(
                            ColumnDef::new(SalarySlips::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_salary_slips_payroll_entry")
                        .table(SalarySlips::Table)
                        .col(SalarySlips::PayrollEntry)
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(SalarySlipDetails::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(SalarySlipDetails::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SalarySlipDetails::SalarySlip).uuid().not_null())
                        .col(ColumnDef::new(SalarySlipDetails::Idx).integer().not_null())
                        .col(
                            ColumnDef::new(SalarySlipDetails::SalaryComponent)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(SalarySlipDetails::ComponentType)
                                .string()
                                .not_null(),
                        )
                        .col(ColumnDef::new(SalarySlipDetails::Amount).decimal().not_null())
                        .to_owned(),
                )
                .await?;

            manager
                .create_table(
                    Table::create()
                        .table(PayrollPaymentEntries::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(PayrollPaymentEntries::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollPaymentEntries::PayrollEntry)
                                .uuid()
                                .not_null(),
                        )
                        .col(ColumnDef::new(PayrollPaymentEntries::Company).string().not_null())
                        .col(
                            ColumnDef::new(PayrollPaymentEntries::PostingDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollPaymentEntries::PayableAccount)
                                .string()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollPaymentEntries::PaymentAccount)
                                .string()
                                .null(),
                        )
                        .col(ColumnDef::new(PayrollPaymentEntries::Currency).string().not_null())
                        .col(ColumnDef::new(PayrollPaymentEntries::Amount).decimal().not_null())
                        .col(
                            ColumnDef::new(PayrollPaymentEntries::BaseAmount)
                                .decimal()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollPaymentEntries::SlipCount)
                                .integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollPaymentEntries::Docstatus)
                                .small_integer()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(PayrollPaymentEntries::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(PayrollPaymentEntries::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SalarySlipDetails::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SalarySlips::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PayrollEmployeeDetails::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(PayrollEntries::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SalaryStructureComponents::Table).to_owned())
                .await?;
            manager
                .drop_table(
                    Table::drop()
                        .table(SalaryStructureAssignments::Table)
                        .to_owned(),
                )
                .await?;
            manager
                .drop_table(Table::drop().table(SalaryComponentAccounts::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(SalaryComponents::Table).to_owned())
                .await?;
            manager
                .drop_table(Table::drop().table(Employees::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum Employees {
        Table,
        Name,
        EmployeeName,
        Company,
        Branch,
        Department,
        Status,
        DateOfJoining,
        RelievingDate,
    }

    #[derive(DeriveIden)]
    enum SalaryComponents {
        Table,
        Name,
        ComponentType,
    }

    #[derive(DeriveIden)]
    enum SalaryComponentAccounts {
        Table,
        Id,
        SalaryComponent,
        Company,
        Account,
    }

    #[derive(DeriveIden)]
    enum SalaryStructureAssignments {
        Table,
        Id,
        Employee,
        SalaryStructure,
        Company,
        FromDate,
        Currency,
        PayrollPayableAccount,
        Docstatus,
    }

    #[derive(DeriveIden)]
    enum SalaryStructureComponents {
        Table,
        Id,
        SalaryStructure,
        Idx,
        SalaryComponent,
        Amount,
    }

    #[derive(DeriveIden)]
    enum PayrollEntries {
        Table,
        Id,
        Company,
        PostingDate,
        StartDate,
        EndDate,
        PayrollFrequency,
        Branch,
        Department,
        PayrollPayableAccount,
        PaymentAccount,
        Currency,
        ExchangeRate,
        CostCenter,
        Status,
        Docstatus,
        NumberOfEmployees,
        SalarySlipsCreated,
        SalarySlipsSubmitted,
        ErrorMessage,
        CreatedAt,
        UpdatedAt,
    }

    #[derive(DeriveIden)]
    enum PayrollEmployeeDetails {
        Table,
        Id,
        PayrollEntry,
        Idx,
        Employee,
        EmployeeName,
        Department,
    }

    #[derive(DeriveIden)]
    enum SalarySlips {
        Table,
        Id,
        PayrollEntry,
        Employee,
        EmployeeName,
        Company,
        PostingDate,
        StartDate,
        EndDate,
        SalaryStructure,
        Currency,
        ExchangeRate,
        PayrollPayableAccount,
        GrossPay,
        TotalDeduction,
        NetPay,
        BaseGrossPay,
        BaseTotalDeduction,
        BaseNetPay,
        Docstatus,
        CreatedAt,
    }

    #[derive(DeriveIden)]
    enum SalarySlipDetails {
        Table,
        Id,
        SalarySlip,
        Idx,
        SalaryComponent,
        ComponentType,
        Amount,
    }

    #[derive(DeriveIden)]
    enum PayrollPaymentEntries {
        Table,
        Id,
        PayrollEntry,
        Company,
        PostingDate,
        PayableAccount,
        PaymentAccount,
        Currency,
        Amount,
        BaseAmount,
        SlipCount,
        Docstatus,
        CreatedAt,
    }
}

mod m20240101_000005_create_repost_item_valuations_table {

    use sea_orm_migration::prelude::*;

    pub struct Migration;

    impl MigrationName for Migration {
        fn name(&self) -> &str {
            "m20240101_000005_create_repost_item_valuations_table"
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Migration {
        async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .create_table(
                    Table::create()
                        .table(RepostItemValuations::Table)
                        .if_not_exists()
                        .col(
                            ColumnDef::new(RepostItemValuations::Id)
                                .uuid()
                                .primary_key()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RepostItemValuations::BasedOn).string().not_null())
                        .col(ColumnDef::new(RepostItemValuations::ItemCode).string().null())
                        .col(ColumnDef::new(RepostItemValuations::Warehouse).string().null())
                        .col(ColumnDef::new(RepostItemValuations::VoucherType).string().null())
                        .col(ColumnDef::new(RepostItemValuations::VoucherNo).string().null())
                        .col(
                            ColumnDef::new(RepostItemValuations::PostingDate)
                                .date()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RepostItemValuations::PostingTime)
                                .time()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RepostItemValuations::Company).string().not_null())
                        .col(ColumnDef::new(RepostItemValuations::Status).string().not_null())
                        .col(
                            ColumnDef::new(RepostItemValuations::Docstatus)
                                .small_integer()
                                .not_null(),
                        )
                        .col(ColumnDef::new(RepostItemValuations::ErrorLog).text().null())
                        .col(
                            ColumnDef::new(RepostItemValuations::CreatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .col(
                            ColumnDef::new(RepostItemValuations::UpdatedAt)
                                .timestamp_with_time_zone()
                                .not_null(),
                        )
                        .to_owned(),
                )
                .await?;

            manager
                .create_index(
                    Index::create()
                        .if_not_exists()
                        .name("idx_repost_item_valuations_item_warehouse_status")
                        .table(RepostItemValuations::Table)
                        .col(RepostItemValuations::ItemCode)
                        .col(RepostItemValuations::Warehouse)
                        .col(RepostItemValuations::Status)
                        .to_owned(),
                )
                .await
        }

        async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
            manager
                .drop_table(Table::drop().table(RepostItemValuations::Table).to_owned())
                .await
        }
    }

    #[derive(DeriveIden)]
    enum RepostItemValuations {
        Table,
        Id,
        BasedOn,
        ItemCode,
        Warehouse,
        VoucherType,
        VoucherNo,
        PostingDate,
        PostingTime,
        Company,
        Status,
        Docstatus,
        ErrorLog,
        CreatedAt,
        UpdatedAt,
    }
}
