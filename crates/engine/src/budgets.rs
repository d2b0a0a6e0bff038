//! Budget primitives and the monthly aggregation rules.
//!
//! A `Budget` fixes per-category limits for one `(family, year, month)`.
//! Actual spending is never stored on the budget; [`summarize`] recomputes it
//! on demand from the month's transactions, so the cached-`spent` drift of
//! ad-hoc recomputation cannot happen.

use chrono::{Days, Months, NaiveDate};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

use crate::{EngineError, ResultEngine, budget_categories, transactions::Transaction};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Budget {
    pub id: Uuid,
    pub family_id: String,
    pub year: i32,
    pub month: u32,
    pub total_cents: i64,
    pub categories: Vec<BudgetCategory>,
}

/// A category limit inside a budget. `position` keeps the user's ordering.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetCategory {
    pub id: Uuid,
    pub name: String,
    pub limit_cents: i64,
    pub position: i32,
}

#[derive(Clone, Debug)]
pub struct BudgetDraft {
    pub year: i32,
    pub month: u32,
    pub total_cents: i64,
    pub categories: Vec<CategoryDraft>,
}

#[derive(Clone, Debug)]
pub struct CategoryDraft {
    pub name: String,
    pub limit_cents: i64,
}

/// Partial update; absent fields keep their current value. A new category
/// list replaces the old one wholesale.
#[derive(Clone, Debug, Default)]
pub struct BudgetUpdate {
    pub total_cents: Option<i64>,
    pub categories: Option<Vec<CategoryDraft>>,
}

impl Budget {
    pub fn new(family_id: &str, draft: BudgetDraft) -> ResultEngine<Self> {
        check_month(draft.month)?;
        Ok(Self {
            id: Uuid::new_v4(),
            family_id: family_id.to_string(),
            year: draft.year,
            month: draft.month,
            total_cents: draft.total_cents,
            categories: build_categories(draft.categories)?,
        })
    }
}

pub(crate) fn check_month(month: u32) -> ResultEngine<()> {
    if !(1..=12).contains(&month) {
        return Err(EngineError::Validation(format!(
            "month must be within 1..=12, got {month}"
        )));
    }
    Ok(())
}

pub(crate) fn build_categories(drafts: Vec<CategoryDraft>) -> ResultEngine<Vec<BudgetCategory>> {
    let mut categories = Vec::with_capacity(drafts.len());
    for (position, draft) in drafts.into_iter().enumerate() {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(EngineError::Validation(
                "category name must not be empty".to_string(),
            ));
        }
        categories.push(BudgetCategory {
            id: Uuid::new_v4(),
            name,
            limit_cents: draft.limit_cents,
            position: position as i32,
        });
    }
    Ok(categories)
}

/// First and last day of a month, both inclusive.
pub fn month_bounds(year: i32, month: u32) -> ResultEngine<(NaiveDate, NaiveDate)> {
    check_month(month)?;
    let first = NaiveDate::from_ymd_opt(year, month, 1)
        .ok_or_else(|| EngineError::Validation(format!("invalid month {year}-{month}")))?;
    let last = first
        .checked_add_months(Months::new(1))
        .and_then(|d| d.checked_sub_days(Days::new(1)))
        .ok_or_else(|| EngineError::Validation(format!("invalid month {year}-{month}")))?;
    Ok((first, last))
}

/// Signed sum of transaction amounts per category label.
///
/// No filtering by kind: income and expense rows both contribute with their
/// signed amount as stored.
pub fn spending_by_category(transactions: &[Transaction]) -> HashMap<String, i64> {
    let mut spending: HashMap<String, i64> = HashMap::new();
    for tx in transactions {
        *spending.entry(tx.category.clone()).or_insert(0) += tx.amount_cents;
    }
    spending
}

/// A budget category joined with the month's actual spending.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct CategorySpend {
    pub name: String,
    pub limit_cents: i64,
    pub spent_cents: i64,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BudgetSummary {
    pub budget_id: Uuid,
    pub year: i32,
    pub month: u32,
    pub total_cents: i64,
    pub categories: Vec<CategorySpend>,
    /// Sum over *all* transaction categories, including those without a
    /// matching budget category.
    pub total_spent_cents: i64,
}

/// Joins a budget with the month's transactions.
///
/// Budget categories with no matching transactions get `spent = 0`;
/// transaction categories with no budget category are dropped from the
/// per-category view but still count towards `total_spent_cents`.
pub fn summarize(budget: &Budget, transactions: &[Transaction]) -> BudgetSummary {
    let spending = spending_by_category(transactions);

    let categories = budget
        .categories
        .iter()
        .map(|category| CategorySpend {
            name: category.name.clone(),
            limit_cents: category.limit_cents,
            spent_cents: spending.get(&category.name).copied().unwrap_or(0),
        })
        .collect();

    BudgetSummary {
        budget_id: budget.id,
        year: budget.year,
        month: budget.month,
        total_cents: budget.total_cents,
        categories,
        total_spent_cents: spending.values().sum(),
    }
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "budgets")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub family_id: String,
    pub year: i32,
    pub month: i32,
    pub total_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::budget_categories::Entity")]
    Categories,
}

impl Related<super::budget_categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Budget> for ActiveModel {
    fn from(budget: &Budget) -> Self {
        Self {
            id: ActiveValue::Set(budget.id.to_string()),
            family_id: ActiveValue::Set(budget.family_id.clone()),
            year: ActiveValue::Set(budget.year),
            month: ActiveValue::Set(budget.month as i32),
            total_cents: ActiveValue::Set(budget.total_cents),
        }
    }
}

impl TryFrom<(Model, Vec<budget_categories::Model>)> for Budget {
    type Error = EngineError;

    fn try_from(
        (model, category_models): (Model, Vec<budget_categories::Model>),
    ) -> ResultEngine<Self> {
        let mut categories = Vec::with_capacity(category_models.len());
        for category_model in category_models {
            categories.push(BudgetCategory::try_from(category_model)?);
        }
        categories.sort_by_key(|c| c.position);

        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("budget".to_string()))?,
            family_id: model.family_id,
            year: model.year,
            month: model.month as u32,
            total_cents: model.total_cents,
            categories,
        })
    }
}
