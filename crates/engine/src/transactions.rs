//! Transaction primitives.
//!
//! A `Transaction` is an immutable, signed ledger row: once recorded it is
//! never updated or deleted, so aggregation can always be recomputed from it.

use chrono::NaiveDate;
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionKind {
    Income,
    Expense,
}

impl TransactionKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl TryFrom<&str> for TransactionKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            other => Err(EngineError::Validation(format!(
                "invalid transaction kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    pub user_id: String,
    pub family_id: String,
    /// Signed: expenses are stored with the sign the caller recorded.
    pub amount_cents: i64,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub is_shared: bool,
}

#[derive(Clone, Debug)]
pub struct TransactionDraft {
    pub amount_cents: i64,
    pub kind: TransactionKind,
    pub category: String,
    pub description: String,
    pub date: NaiveDate,
    pub is_shared: bool,
}

impl Transaction {
    pub fn new(user_id: &str, family_id: &str, draft: TransactionDraft) -> ResultEngine<Self> {
        if draft.amount_cents == 0 {
            return Err(EngineError::Validation(
                "amount_cents must not be 0".to_string(),
            ));
        }
        let category = draft.category.trim().to_string();
        if category.is_empty() {
            return Err(EngineError::Validation(
                "category must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            family_id: family_id.to_string(),
            amount_cents: draft.amount_cents,
            kind: draft.kind,
            category,
            description: draft.description,
            date: draft.date,
            is_shared: draft.is_shared,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub family_id: String,
    pub amount_cents: i64,
    pub kind: String,
    pub category: String,
    pub description: String,
    pub date: Date,
    pub is_shared: bool,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Transaction> for ActiveModel {
    fn from(tx: &Transaction) -> Self {
        Self {
            id: ActiveValue::Set(tx.id.to_string()),
            user_id: ActiveValue::Set(tx.user_id.clone()),
            family_id: ActiveValue::Set(tx.family_id.clone()),
            amount_cents: ActiveValue::Set(tx.amount_cents),
            kind: ActiveValue::Set(tx.kind.as_str().to_string()),
            category: ActiveValue::Set(tx.category.clone()),
            description: ActiveValue::Set(tx.description.clone()),
            date: ActiveValue::Set(tx.date),
            is_shared: ActiveValue::Set(tx.is_shared),
        }
    }
}

impl TryFrom<Model> for Transaction {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("transaction".to_string()))?,
            user_id: model.user_id,
            family_id: model.family_id,
            amount_cents: model.amount_cents,
            kind: TransactionKind::try_from(model.kind.as_str())?,
            category: model.category,
            description: model.description,
            date: model.date,
            is_shared: model.is_shared,
        })
    }
}
