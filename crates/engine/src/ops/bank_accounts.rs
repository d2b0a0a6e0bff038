//! Bank account operations.

use chrono::{DateTime, Utc};
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{BankAccount, BankAccountDraft, BankAccountUpdate, ResultEngine, bank_accounts};

use super::{Engine, with_tx};

impl Engine {
    pub async fn list_bank_accounts(&self, user_id: &str) -> ResultEngine<Vec<BankAccount>> {
        let models = bank_accounts::Entity::find()
            .filter(bank_accounts::Column::UserId.eq(user_id))
            .order_by_asc(bank_accounts::Column::BankName)
            .all(&self.database)
            .await?;
        models.into_iter().map(BankAccount::try_from).collect()
    }

    pub async fn create_bank_account(
        &self,
        user_id: &str,
        family_id: &str,
        draft: BankAccountDraft,
        now: DateTime<Utc>,
    ) -> ResultEngine<Uuid> {
        let account = BankAccount::new(user_id, family_id, draft, now)?;
        bank_accounts::ActiveModel::from(&account)
            .insert(&self.database)
            .await?;
        Ok(account.id)
    }

    /// Applies a change set; any change bumps `last_sync`.
    pub async fn update_bank_account(
        &self,
        account_id: Uuid,
        user_id: &str,
        update: BankAccountUpdate,
        now: DateTime<Utc>,
    ) -> ResultEngine<BankAccount> {
        with_tx!(self, |db_tx| {
            let model = self
                .require_bank_account_owned(&db_tx, account_id, user_id)
                .await?;
            let mut account = BankAccount::try_from(model)?;

            if let Some(bank_name) = update.bank_name {
                account.bank_name = bank_name;
            }
            if let Some(balance_cents) = update.balance_cents {
                account.balance_cents = balance_cents;
            }
            if let Some(is_active) = update.is_active {
                account.is_active = is_active;
            }
            account.last_sync = now;

            bank_accounts::ActiveModel::from(&account)
                .update(&db_tx)
                .await?;
            Ok(account)
        })
    }

    pub async fn delete_bank_account(&self, account_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_bank_account_owned(&db_tx, account_id, user_id)
                .await?;
            bank_accounts::Entity::delete_by_id(account_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }
}
