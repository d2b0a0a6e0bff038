//! Bank account primitives.

use chrono::{DateTime, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountKind {
    Checking,
    Savings,
    Credit,
    Investment,
    Loan,
}

impl AccountKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Checking => "checking",
            Self::Savings => "savings",
            Self::Credit => "credit",
            Self::Investment => "investment",
            Self::Loan => "loan",
        }
    }
}

impl TryFrom<&str> for AccountKind {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "checking" => Ok(Self::Checking),
            "savings" => Ok(Self::Savings),
            "credit" => Ok(Self::Credit),
            "investment" => Ok(Self::Investment),
            "loan" => Ok(Self::Loan),
            other => Err(EngineError::Validation(format!(
                "invalid account kind: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BankAccount {
    pub id: Uuid,
    pub user_id: String,
    pub family_id: String,
    pub bank_name: String,
    pub kind: AccountKind,
    pub account_number: String,
    pub balance_cents: i64,
    pub currency: String,
    pub is_active: bool,
    pub last_sync: DateTime<Utc>,
}

#[derive(Clone, Debug)]
pub struct BankAccountDraft {
    pub bank_name: String,
    pub kind: AccountKind,
    pub account_number: String,
    pub balance_cents: i64,
    pub currency: Option<String>,
}

/// Partial update; absent fields keep their current value.
#[derive(Clone, Debug, Default)]
pub struct BankAccountUpdate {
    pub bank_name: Option<String>,
    pub balance_cents: Option<i64>,
    pub is_active: Option<bool>,
}

impl BankAccount {
    pub fn new(
        user_id: &str,
        family_id: &str,
        draft: BankAccountDraft,
        now: DateTime<Utc>,
    ) -> ResultEngine<Self> {
        let bank_name = draft.bank_name.trim().to_string();
        if bank_name.is_empty() {
            return Err(EngineError::Validation(
                "bank name must not be empty".to_string(),
            ));
        }
        if draft.account_number.trim().is_empty() {
            return Err(EngineError::Validation(
                "account number must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            family_id: family_id.to_string(),
            bank_name,
            kind: draft.kind,
            account_number: draft.account_number,
            balance_cents: draft.balance_cents,
            currency: draft.currency.unwrap_or_else(|| "USD".to_string()),
            is_active: true,
            last_sync: now,
        })
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bank_accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub family_id: String,
    pub bank_name: String,
    pub kind: String,
    pub account_number: String,
    pub balance_cents: i64,
    pub currency: String,
    pub is_active: bool,
    pub last_sync: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

impl From<&BankAccount> for ActiveModel {
    fn from(account: &BankAccount) -> Self {
        Self {
            id: ActiveValue::Set(account.id.to_string()),
            user_id: ActiveValue::Set(account.user_id.clone()),
            family_id: ActiveValue::Set(account.family_id.clone()),
            bank_name: ActiveValue::Set(account.bank_name.clone()),
            kind: ActiveValue::Set(account.kind.as_str().to_string()),
            account_number: ActiveValue::Set(account.account_number.clone()),
            balance_cents: ActiveValue::Set(account.balance_cents),
            currency: ActiveValue::Set(account.currency.clone()),
            is_active: ActiveValue::Set(account.is_active),
            last_sync: ActiveValue::Set(account.last_sync),
        }
    }
}

impl TryFrom<Model> for BankAccount {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("bank account".to_string()))?,
            user_id: model.user_id,
            family_id: model.family_id,
            bank_name: model.bank_name,
            kind: AccountKind::try_from(model.kind.as_str())?,
            account_number: model.account_number,
            balance_cents: model.balance_cents,
            currency: model.currency,
            is_active: model.is_active,
            last_sync: model.last_sync,
        })
    }
}
