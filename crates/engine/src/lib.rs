pub use bank_accounts::{AccountKind, BankAccount, BankAccountDraft, BankAccountUpdate};
pub use bills::{
    Bill, BillDraft, BillStatus, BillUpdate, Frequency, HistoryEntry, PaymentMethod, Reminder,
    ReminderChannel, ReminderDraft, Transition, apply_status_transition,
};
pub use budgets::{
    Budget, BudgetCategory, BudgetDraft, BudgetSummary, BudgetUpdate, CategoryDraft, CategorySpend,
    month_bounds, spending_by_category, summarize,
};
pub use error::EngineError;
pub use investments::{
    HistoryAction, Investment, InvestmentDraft, InvestmentKind, InvestmentUpdate, KindTotals,
    PortfolioSummary, PositionView, TradeEntry, summarize_portfolio,
};
pub use mail::{Mailer, SmtpMailer, SmtpSettings};
pub use ops::{Engine, EngineBuilder, TransactionListFilter};
pub use quotes::{HttpQuotes, PriceQuotes};
pub use transactions::{Transaction, TransactionDraft, TransactionKind};

pub mod bank_accounts;
pub mod bill_history;
pub mod bill_reminders;
pub mod bills;
pub mod budget_categories;
pub mod budgets;
mod error;
pub mod investment_history;
pub mod investments;
mod mail;
mod ops;
mod quotes;
pub mod transactions;
pub mod users;

pub type ResultEngine<T> = Result<T, EngineError>;
