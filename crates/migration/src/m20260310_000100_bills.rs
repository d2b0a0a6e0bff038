//! Bills with their payment history and reminder child tables.

use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[derive(Iden)]
enum Users {
    Table,
    Username,
}

#[derive(Iden)]
enum Bills {
    Table,
    Id,
    UserId,
    FamilyId,
    Name,
    AmountCents,
    DueDate,
    Category,
    IsRecurring,
    Frequency,
    Status,
    PaymentMethod,
    Notes,
}

#[derive(Iden)]
enum BillHistory {
    Table,
    Id,
    BillId,
    Date,
    AmountCents,
    Status,
    PaymentMethod,
    Notes,
}

#[derive(Iden)]
enum BillReminders {
    Table,
    Id,
    BillId,
    Channel,
    DaysBeforeDue,
    Sent,
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(Bills::Table)
                    .if_not_exists()
                    .col(ColumnDef::new(Bills::Id).string().not_null().primary_key())
                    .col(ColumnDef::new(Bills::UserId).string().not_null())
                    .col(ColumnDef::new(Bills::FamilyId).string().not_null())
                    .col(ColumnDef::new(Bills::Name).string().not_null())
                    .col(ColumnDef::new(Bills::AmountCents).big_integer().not_null())
                    .col(ColumnDef::new(Bills::DueDate).date().not_null())
                    .col(ColumnDef::new(Bills::Category).string().not_null())
                    .col(ColumnDef::new(Bills::IsRecurring).boolean().not_null())
                    .col(ColumnDef::new(Bills::Frequency).string())
                    .col(ColumnDef::new(Bills::Status).string().not_null())
                    .col(ColumnDef::new(Bills::PaymentMethod).string())
                    .col(ColumnDef::new(Bills::Notes).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bills-user_id")
                            .from(Bills::Table, Bills::UserId)
                            .to(Users::Table, Users::Username),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bills-user_id-due_date")
                    .table(Bills::Table)
                    .col(Bills::UserId)
                    .col(Bills::DueDate)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BillHistory::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BillHistory::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BillHistory::BillId).string().not_null())
                    .col(ColumnDef::new(BillHistory::Date).timestamp().not_null())
                    .col(
                        ColumnDef::new(BillHistory::AmountCents)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BillHistory::Status).string().not_null())
                    .col(
                        ColumnDef::new(BillHistory::PaymentMethod)
                            .string()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BillHistory::Notes).string())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bill_history-bill_id")
                            .from(BillHistory::Table, BillHistory::BillId)
                            .to(Bills::Table, Bills::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bill_history-bill_id")
                    .table(BillHistory::Table)
                    .col(BillHistory::BillId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(BillReminders::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(BillReminders::Id)
                            .string()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(BillReminders::BillId).string().not_null())
                    .col(ColumnDef::new(BillReminders::Channel).string().not_null())
                    .col(
                        ColumnDef::new(BillReminders::DaysBeforeDue)
                            .integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(BillReminders::Sent).boolean().not_null())
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk-bill_reminders-bill_id")
                            .from(BillReminders::Table, BillReminders::BillId)
                            .to(Bills::Table, Bills::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx-bill_reminders-bill_id")
                    .table(BillReminders::Table)
                    .col(BillReminders::BillId)
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(BillReminders::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(BillHistory::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Bills::Table).to_owned())
            .await
    }
}
