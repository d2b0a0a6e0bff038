pub use sea_orm_migration::prelude::*;

mod m20260310_000000_users;
mod m20260310_000100_bills;
mod m20260310_000200_budgets;
mod m20260310_000300_transactions;
mod m20260310_000400_investments;
mod m20260310_000500_bank_accounts;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20260310_000000_users::Migration),
            Box::new(m20260310_000100_bills::Migration),
            Box::new(m20260310_000200_budgets::Migration),
            Box::new(m20260310_000300_transactions::Migration),
            Box::new(m20260310_000400_investments::Migration),
            Box::new(m20260310_000500_bank_accounts::Migration),
        ]
    }
}
