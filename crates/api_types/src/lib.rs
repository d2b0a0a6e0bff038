//! Wire types shared between the HTTP server and its clients.
//!
//! All monetary values are integer cents. Enums serialize as snake_case
//! strings.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Standard response body for create endpoints.
#[derive(Debug, Serialize, Deserialize)]
pub struct Created {
    pub id: Uuid,
}

pub mod bill {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum BillStatus {
        Pending,
        Paid,
        Overdue,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum Frequency {
        Weekly,
        Monthly,
        Quarterly,
        Yearly,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum PaymentMethod {
        BankTransfer,
        CreditCard,
        DebitCard,
        Cash,
        Other,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum ReminderChannel {
        Email,
        Push,
        Sms,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReminderNew {
        pub channel: ReminderChannel,
        pub days_before_due: i32,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BillNew {
        pub name: String,
        pub amount_cents: i64,
        pub due_date: NaiveDate,
        pub category: String,
        pub is_recurring: bool,
        pub frequency: Option<Frequency>,
        pub status: Option<BillStatus>,
        pub payment_method: Option<PaymentMethod>,
        pub notes: Option<String>,
        #[serde(default)]
        pub reminders: Vec<ReminderNew>,
    }

    /// Partial update; absent fields keep their current value. Setting
    /// `status` to `paid` triggers the payment transition server-side.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BillPatch {
        pub name: Option<String>,
        pub amount_cents: Option<i64>,
        pub due_date: Option<NaiveDate>,
        pub category: Option<String>,
        pub is_recurring: Option<bool>,
        pub frequency: Option<Frequency>,
        pub status: Option<BillStatus>,
        pub payment_method: Option<PaymentMethod>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BillView {
        pub id: Uuid,
        pub name: String,
        pub amount_cents: i64,
        pub due_date: NaiveDate,
        pub category: String,
        pub is_recurring: bool,
        pub frequency: Option<Frequency>,
        pub status: BillStatus,
        pub payment_method: Option<PaymentMethod>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ReminderView {
        pub id: Uuid,
        pub channel: ReminderChannel,
        pub days_before_due: i32,
        pub sent: bool,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct HistoryView {
        pub id: Uuid,
        pub date: DateTime<Utc>,
        pub amount_cents: i64,
        pub status: BillStatus,
        pub payment_method: PaymentMethod,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BillDetail {
        #[serde(flatten)]
        pub bill: BillView,
        pub reminders: Vec<ReminderView>,
        pub history: Vec<HistoryView>,
    }

    /// Response of a bill update: the bill after the change, plus the id of
    /// the recurring successor when the update paid the bill off.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct BillUpdated {
        #[serde(flatten)]
        pub bill: BillView,
        pub successor_id: Option<Uuid>,
    }
}

pub mod budget {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryNew {
        pub name: String,
        pub limit_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetNew {
        pub year: i32,
        pub month: u32,
        pub total_cents: i64,
        pub categories: Vec<CategoryNew>,
    }

    /// A new category list replaces the old one wholesale.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BudgetPatch {
        pub total_cents: Option<i64>,
        pub categories: Option<Vec<CategoryNew>>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategoryView {
        pub id: Uuid,
        pub name: String,
        pub limit_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetView {
        pub id: Uuid,
        pub year: i32,
        pub month: u32,
        pub total_cents: i64,
        pub categories: Vec<CategoryView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct CategorySpendView {
        pub name: String,
        pub limit_cents: i64,
        pub spent_cents: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSummaryView {
        pub budget_id: Uuid,
        pub year: i32,
        pub month: u32,
        pub total_cents: i64,
        pub categories: Vec<CategorySpendView>,
        pub total_spent_cents: i64,
    }
}

pub mod transaction {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TransactionKind {
        Income,
        Expense,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionNew {
        pub amount_cents: i64,
        pub kind: TransactionKind,
        pub category: String,
        pub description: Option<String>,
        pub date: NaiveDate,
        #[serde(default)]
        pub is_shared: bool,
    }

    /// Query string of `GET /transactions`.
    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct TransactionListQuery {
        pub from: Option<NaiveDate>,
        pub to: Option<NaiveDate>,
        pub category: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TransactionView {
        pub id: Uuid,
        pub amount_cents: i64,
        pub kind: TransactionKind,
        pub category: String,
        pub description: String,
        pub date: NaiveDate,
        pub is_shared: bool,
    }
}

pub mod investment {
    use super::*;
    use std::collections::HashMap;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum InvestmentKind {
        Stocks,
        Bonds,
        MutualFunds,
        Etfs,
        Crypto,
        RealEstate,
        Other,
    }

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum TradeAction {
        Buy,
        Sell,
        Dividend,
        Split,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct InvestmentNew {
        pub kind: InvestmentKind,
        pub symbol: String,
        pub name: String,
        pub quantity: f64,
        pub purchase_price_cents: i64,
        pub purchase_date: NaiveDate,
        pub current_price_cents: Option<i64>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct InvestmentPatch {
        pub name: Option<String>,
        pub quantity: Option<f64>,
        pub current_price_cents: Option<i64>,
        pub notes: Option<String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PositionView {
        pub id: Uuid,
        pub kind: InvestmentKind,
        pub symbol: String,
        pub name: String,
        pub quantity: f64,
        pub purchase_price_cents: i64,
        pub current_price_cents: i64,
        pub current_value_cents: i64,
        pub total_return_cents: i64,
        pub return_percentage: Option<f64>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TradeView {
        pub id: Uuid,
        pub date: NaiveDate,
        pub price_cents: i64,
        pub action: TradeAction,
        pub quantity: f64,
        pub amount_cents: i64,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct KindTotalsView {
        pub value_cents: i64,
        pub return_cents: i64,
        pub count: usize,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct PortfolioView {
        pub total_value_cents: i64,
        pub total_cost_cents: i64,
        pub total_return_cents: i64,
        pub total_return_percentage: Option<f64>,
        pub by_kind: HashMap<InvestmentKind, KindTotalsView>,
        pub top_performers: Vec<PositionView>,
        pub worst_performers: Vec<PositionView>,
    }
}

pub mod bank_account {
    use super::*;

    #[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "snake_case")]
    pub enum AccountKind {
        Checking,
        Savings,
        Credit,
        Investment,
        Loan,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BankAccountNew {
        pub bank_name: String,
        pub kind: AccountKind,
        pub account_number: String,
        pub balance_cents: i64,
        pub currency: Option<String>,
    }

    #[derive(Debug, Default, Serialize, Deserialize)]
    pub struct BankAccountPatch {
        pub bank_name: Option<String>,
        pub balance_cents: Option<i64>,
        pub is_active: Option<bool>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BankAccountView {
        pub id: Uuid,
        pub bank_name: String,
        pub kind: AccountKind,
        pub account_number: String,
        pub balance_cents: i64,
        pub currency: String,
        pub is_active: bool,
        pub last_sync: DateTime<Utc>,
    }
}
