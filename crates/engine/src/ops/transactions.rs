//! Transaction operations.
//!
//! Rows are append-only: there is no update or delete, so every aggregate in
//! the engine can be recomputed from the ledger at any time.

use chrono::NaiveDate;
use sea_orm::{QueryFilter, QueryOrder, prelude::*};
use uuid::Uuid;

use crate::{ResultEngine, Transaction, TransactionDraft, transactions};

use super::Engine;

/// Optional narrowing for [`Engine::list_transactions`].
#[derive(Clone, Debug, Default)]
pub struct TransactionListFilter {
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    pub category: Option<String>,
}

impl Engine {
    pub async fn create_transaction(
        &self,
        user_id: &str,
        family_id: &str,
        draft: TransactionDraft,
    ) -> ResultEngine<Uuid> {
        let transaction = Transaction::new(user_id, family_id, draft)?;
        transactions::ActiveModel::from(&transaction)
            .insert(&self.database)
            .await?;
        Ok(transaction.id)
    }

    /// The family's ledger, newest first.
    pub async fn list_transactions(
        &self,
        family_id: &str,
        filter: TransactionListFilter,
    ) -> ResultEngine<Vec<Transaction>> {
        let mut query = transactions::Entity::find()
            .filter(transactions::Column::FamilyId.eq(family_id));
        if let Some(from) = filter.from {
            query = query.filter(transactions::Column::Date.gte(from));
        }
        if let Some(to) = filter.to {
            query = query.filter(transactions::Column::Date.lte(to));
        }
        if let Some(category) = filter.category {
            query = query.filter(transactions::Column::Category.eq(category));
        }

        let models = query
            .order_by_desc(transactions::Column::Date)
            .all(&self.database)
            .await?;
        models.into_iter().map(Transaction::try_from).collect()
    }
}
