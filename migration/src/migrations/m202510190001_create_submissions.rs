use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m202510190001_create_submissions"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Alias::new("submissions"))
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Alias::new("id"))
                            .string_len(64)
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(Alias::new("plan_type"))
                            .enumeration(
                                Alias::new("plan_type"),
                                vec![Alias::new("code"), Alias::new("live")],
                            )
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("full_name")).text().not_null())
                    .col(ColumnDef::new(Alias::new("email")).text().not_null())
                    .col(ColumnDef::new(Alias::new("submitted_at")).text().not_null())
                    .col(
                        ColumnDef::new(Alias::new("status"))
                            .enumeration(
                                Alias::new("submission_status"),
                                vec![
                                    Alias::new("pending"),
                                    Alias::new("in-progress"),
                                    Alias::new("completed"),
                                    Alias::new("rejected"),
                                    Alias::new("cancelled"),
                                ],
                            )
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(Alias::new("price")).double().null())
                    .col(ColumnDef::new(Alias::new("details")).json_binary().not_null())
                    .col(ColumnDef::new(Alias::new("resume")).json_binary().null())
                    .col(
                        ColumnDef::new(Alias::new("uploaded_files"))
                            .json_binary()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Alias::new("pdf")).json_binary().null())
                    .col(ColumnDef::new(Alias::new("payment_id")).string().null())
                    .col(
                        ColumnDef::new(Alias::new("payment_date"))
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(ColumnDef::new(Alias::new("payer_name")).text().null())
                    .col(
                        ColumnDef::new(Alias::new("created_at"))
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .col(
                        ColumnDef::new(Alias::new("updated_at"))
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::cust("CURRENT_TIMESTAMP")),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_submissions_created_at")
                    .table(Alias::new("submissions"))
                    .col(Alias::new("created_at"))
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(Alias::new("submissions")).to_owned())
            .await
    }
}
