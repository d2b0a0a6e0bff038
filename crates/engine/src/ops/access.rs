//! Ownership checks.
//!
//! Every record is exclusively owned by its user/family pair; a mutation from
//! anyone else is `Unauthorized` and leaves the record untouched. Lookups go
//! through the ambient DB transaction so the check and the write observe the
//! same state.

use sea_orm::{DatabaseTransaction, prelude::*};
use uuid::Uuid;

use crate::{EngineError, ResultEngine, bank_accounts, bills, budgets, investments};

use super::Engine;

/// Generates a `require_*_owned` lookup for a user-owned entity.
macro_rules! impl_require_owned {
    ($require_fn:ident, $module:ident, $label:literal) => {
        pub(super) async fn $require_fn(
            &self,
            db: &DatabaseTransaction,
            id: Uuid,
            user_id: &str,
        ) -> ResultEngine<$module::Model> {
            let model = $module::Entity::find_by_id(id.to_string())
                .one(db)
                .await?
                .ok_or_else(|| EngineError::NotFound($label.to_string()))?;
            if model.user_id != user_id {
                return Err(EngineError::Unauthorized(concat!(
                    $label,
                    " belongs to another user"
                )
                .to_string()));
            }
            Ok(model)
        }
    };
}

impl Engine {
    impl_require_owned!(require_bill_owned, bills, "bill");
    impl_require_owned!(require_investment_owned, investments, "investment");
    impl_require_owned!(require_bank_account_owned, bank_accounts, "bank account");

    /// Budgets are family-scoped rather than user-scoped.
    pub(super) async fn require_budget_in_family(
        &self,
        db: &DatabaseTransaction,
        id: Uuid,
        family_id: &str,
    ) -> ResultEngine<budgets::Model> {
        let model = budgets::Entity::find_by_id(id.to_string())
            .one(db)
            .await?
            .ok_or_else(|| EngineError::NotFound("budget".to_string()))?;
        if model.family_id != family_id {
            return Err(EngineError::Unauthorized(
                "budget belongs to another family".to_string(),
            ));
        }
        Ok(model)
    }
}
