use sea_orm_migration::prelude::*;

#[derive(DeriveIden)]
enum Payments {
    Table,
    Id,
    Plan,
    Status,
    Amount,
    PaymentDate,
    UserName,
    PaymentMethod,
    TransactionId,
    CreatedAt,
}

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510190002_create_payments"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Payments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Payments::Id)
                            .string_len(36)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Payments::Plan)
                            .enumeration(
                                Alias::new("payment_plan"),
                                vec![Alias::new("code"), Alias::new("live"), Alias::new("mock")],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::Status).string().not_null())
                    .col(ColumnDef::new(Payments::Amount).double().not_null())
                    .col(
                        ColumnDef::new(Payments::PaymentDate)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Payments::UserName).string().null())
                    .col(ColumnDef::new(Payments::PaymentMethod).string().null())
                    .col(ColumnDef::new(Payments::TransactionId).string().null())
                    .col(
                        ColumnDef::new(Payments::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null(),
                    )
                    .to_owned(),
            )
            .await?;

        // NULLs are distinct in a unique index, so claims without a transaction id never collide.
        manager
            .create_index(
                Index::create()
                    .name("idx_payments_transaction_user")
                    .table(Payments::Table)
                    .col(Payments::TransactionId)
                    .col(Payments::UserName)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_transaction_id")
                    .table(Payments::Table)
                    .col(Payments::TransactionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_payments_duplicate_window")
                    .table(Payments::Table)
                    .col(Payments::Plan)
                    .col(Payments::Amount)
                    .col(Payments::CreatedAt)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Payments::Table).to_owned())
            .await
    }
}
