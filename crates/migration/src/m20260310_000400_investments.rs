//! Investments with their append-only trade history.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Username,
}

#[derive(Iden)]
enum Investments {
    Table,
    Id,
    UserId,
    FamilyId,
    Kind,
    Symbol,
    Name,
    Quantity,
    PurchasePriceCents,
    PurchaseDate,
    CurrentPriceCents,
    LastUpdated,
    Notes,
}

#[derive(Iden)]
enum InvestmentHistory {
    Table,
    Id,
    InvestmentId,
    Date,
    PriceCents,
    Action,
    Quantity,
    AmountCents,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Investments::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(Investments::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(Investments::UserId).string().not_null())
                    .col(ColumnDef::new(Investments::FamilyId).string().not_null())
                    .col(ColumnDef::new(Investments::Kind).string().not_null())
                    .col(ColumnDef::new(Investments::Symbol).string().not_null())
                    .col(ColumnDef::new(Investments::Name).string().not_null())
                    .col(ColumnDef::new(Investments::Quantity).double().not_null())
                    .col(
                        ColumnDef::new(Investments::PurchasePriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Investments::PurchaseDate).date().not_null())
                    .col(
                        ColumnDef::new(Investments::CurrentPriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(Investments::LastUpdated)
                            .timestamp()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Investments::Notes).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-investments-user_id")
                            .from(Investments::Table, Investments::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-investments-user_id-symbol")
                    .table(Investments::Table)
                    .col(Investments::UserId)
                    .col(Investments::Symbol)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(InvestmentHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(InvestmentHistory::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(InvestmentHistory::InvestmentId)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InvestmentHistory::Date).date().not_null())
                    .col(
                        ColumnDef::new(InvestmentHistory::PriceCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(InvestmentHistory::Action).string().not_null())
                    .col(
                        ColumnDef::new(InvestmentHistory::Quantity)
                            .double()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(InvestmentHistory::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-investment_history-investment_id")
                            .from(InvestmentHistory::Table, InvestmentHistory::InvestmentId)
                            .to(Investments::Table, Investments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-investment_history-investment_id")
                    .table(InvestmentHistory::Table)
                    .col(InvestmentHistory::InvestmentId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(InvestmentHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Investments::Table).to_owned())
            .await
    }
}
