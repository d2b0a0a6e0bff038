//! Bill primitives and the status-transition rules.
//!
//! A `Bill` is a dated obligation. Paying it appends exactly one row to its
//! payment history and, for recurring bills, spawns a successor instance one
//! period later. The transition itself is a pure function
//! ([`apply_status_transition`]) so the rollover rules stay testable without
//! a database; the ops layer persists the outcome in one DB transaction.

use chrono::{DateTime, Days, Months, NaiveDate, Utc};
use sea_orm::{ActiveValue, entity::prelude::*};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{EngineError, ResultEngine};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillStatus {
    Pending,
    Paid,
    Overdue,
}

impl BillStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Paid => "paid",
            Self::Overdue => "overdue",
        }
    }
}

impl TryFrom<&str> for BillStatus {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "pending" => Ok(Self::Pending),
            "paid" => Ok(Self::Paid),
            "overdue" => Ok(Self::Overdue),
            other => Err(EngineError::Validation(format!(
                "invalid bill status: {other}"
            ))),
        }
    }
}

/// How often a recurring bill comes due.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Frequency {
    Weekly,
    Monthly,
    Quarterly,
    Yearly,
}

impl Frequency {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Weekly => "weekly",
            Self::Monthly => "monthly",
            Self::Quarterly => "quarterly",
            Self::Yearly => "yearly",
        }
    }

    /// Advances a due date by one period.
    ///
    /// Month-based periods clamp the day-of-month to the last valid day of
    /// the target month (Jan 31 + 1 month = Feb 28/29). Saturates at the
    /// calendar edge.
    pub fn advance(self, date: NaiveDate) -> NaiveDate {
        let next = match self {
            Self::Weekly => date.checked_add_days(Days::new(7)),
            Self::Monthly => date.checked_add_months(Months::new(1)),
            Self::Quarterly => date.checked_add_months(Months::new(3)),
            Self::Yearly => date.checked_add_months(Months::new(12)),
        };
        next.unwrap_or(NaiveDate::MAX)
    }
}

impl TryFrom<&str> for Frequency {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "weekly" => Ok(Self::Weekly),
            "monthly" => Ok(Self::Monthly),
            "quarterly" => Ok(Self::Quarterly),
            "yearly" => Ok(Self::Yearly),
            other => Err(EngineError::Validation(format!(
                "invalid frequency: {other}"
            ))),
        }
    }
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

impl PaymentMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::BankTransfer => "bank_transfer",
            Self::CreditCard => "credit_card",
            Self::DebitCard => "debit_card",
            Self::Cash => "cash",
            Self::Other => "other",
        }
    }
}

impl TryFrom<&str> for PaymentMethod {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "bank_transfer" => Ok(Self::BankTransfer),
            "credit_card" => Ok(Self::CreditCard),
            "debit_card" => Ok(Self::DebitCard),
            "cash" => Ok(Self::Cash),
            "other" => Ok(Self::Other),
            other => Err(EngineError::Validation(format!(
                "invalid payment method: {other}"
            ))),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Bill {
    pub id: Uuid,
    pub user_id: String,
    pub family_id: String,
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

impl Bill {
    pub fn new(user_id: &str, family_id: &str, draft: BillDraft) -> ResultEngine<Self> {
        let name = draft.name.trim().to_string();
        if name.is_empty() {
            return Err(EngineError::Validation(
                "bill name must not be empty".to_string(),
            ));
        }
        if draft.amount_cents < 0 {
            return Err(EngineError::Validation(
                "amount_cents must be >= 0".to_string(),
            ));
        }
        let bill = Self {
            id: Uuid::new_v4(),
            user_id: user_id.to_string(),
            family_id: family_id.to_string(),
            name,
            amount_cents: draft.amount_cents,
            due_date: draft.due_date,
            category: draft.category,
            is_recurring: draft.is_recurring,
            frequency: draft.frequency,
            status: draft.status.unwrap_or(BillStatus::Pending),
            payment_method: draft.payment_method,
            notes: draft.notes,
        };
        bill.check_frequency_invariant()?;
        Ok(bill)
    }

    /// `frequency` must be present if and only if the bill recurs.
    fn check_frequency_invariant(&self) -> ResultEngine<()> {
        match (self.is_recurring, self.frequency) {
            (true, None) => Err(EngineError::Validation(
                "recurring bill requires a frequency".to_string(),
            )),
            (false, Some(_)) => Err(EngineError::Validation(
                "frequency is only valid on recurring bills".to_string(),
            )),
            _ => Ok(()),
        }
    }
}

/// A planned or past reminder attached to a bill.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Reminder {
    pub id: Uuid,
    pub bill_id: Uuid,
    pub channel: ReminderChannel,
    pub days_before_due: i32,
    pub sent: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReminderChannel {
    Email,
    Push,
    Sms,
}

impl ReminderChannel {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Email => "email",
            Self::Push => "push",
            Self::Sms => "sms",
        }
    }
}

impl TryFrom<&str> for ReminderChannel {
    type Error = EngineError;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "email" => Ok(Self::Email),
            "push" => Ok(Self::Push),
            "sms" => Ok(Self::Sms),
            other => Err(EngineError::Validation(format!(
                "invalid reminder channel: {other}"
            ))),
        }
    }
}

/// One row of a bill's append-only payment history.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub id: Uuid,
    pub bill_id: Uuid,
    pub date: DateTime<Utc>,
    pub amount_cents: i64,
    pub status: BillStatus,
    pub payment_method: PaymentMethod,
    pub notes: Option<String>,
}

/// Fields accepted when creating a bill.
#[derive(Clone, Debug)]
pub struct BillDraft {
    pub name: String,
    pub amount_cents: i64,
    pub due_date: NaiveDate,
    pub category: String,
    pub is_recurring: bool,
    pub frequency: Option<Frequency>,
    pub status: Option<BillStatus>,
    pub payment_method: Option<PaymentMethod>,
    pub notes: Option<String>,
    pub reminders: Vec<ReminderDraft>,
}

#[derive(Clone, Debug)]
pub struct ReminderDraft {
    pub channel: ReminderChannel,
    pub days_before_due: i32,
}

/// Partial update; absent fields keep their current value.
#[derive(Clone, Debug, Default)]
pub struct BillUpdate {
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

/// Outcome of [`apply_status_transition`]; the caller persists all parts
/// atomically.
#[derive(Clone, Debug)]
pub struct Transition {
    /// The bill with the requested changes merged in.
    pub bill: Bill,
    /// History row to append, present only on a transition into `paid`.
    pub payment: Option<HistoryEntry>,
    /// Successor instance spawned for recurring bills, with its reminders.
    pub successor: Option<(Bill, Vec<Reminder>)>,
}

/// Applies a requested change set to a bill.
///
/// On a transition into `paid` from any non-paid state this appends one
/// payment-history row, and for recurring bills spawns a successor copied
/// from the bill as it was before the merge: new identity, due date advanced
/// by one period of its frequency, status `pending`, empty history, and all
/// reminders reset to unsent. Requesting `paid` on an already-paid bill is a
/// no-op for history and successor. All other requested fields merge
/// last-write-wins.
pub fn apply_status_transition(
    bill: &Bill,
    reminders: &[Reminder],
    update: &BillUpdate,
    now: DateTime<Utc>,
) -> ResultEngine<Transition> {
    let paid_edge = update.status == Some(BillStatus::Paid) && bill.status != BillStatus::Paid;

    let mut payment = None;
    let mut successor = None;

    if paid_edge {
        payment = Some(HistoryEntry {
            id: Uuid::new_v4(),
            bill_id: bill.id,
            date: now,
            amount_cents: bill.amount_cents,
            status: BillStatus::Paid,
            payment_method: update.payment_method.unwrap_or(PaymentMethod::Other),
            notes: update.notes.clone(),
        });

        if bill.is_recurring {
            let frequency = bill.frequency.ok_or_else(|| {
                EngineError::Validation("recurring bill is missing a frequency".to_string())
            })?;
            let next = Bill {
                id: Uuid::new_v4(),
                due_date: frequency.advance(bill.due_date),
                status: BillStatus::Pending,
                ..bill.clone()
            };
            let next_reminders = reminders
                .iter()
                .map(|r| Reminder {
                    id: Uuid::new_v4(),
                    bill_id: next.id,
                    channel: r.channel,
                    days_before_due: r.days_before_due,
                    sent: false,
                })
                .collect();
            successor = Some((next, next_reminders));
        }
    }

    let mut updated = bill.clone();
    if let Some(name) = &update.name {
        updated.name = name.clone();
    }
    if let Some(amount) = update.amount_cents {
        updated.amount_cents = amount;
    }
    if let Some(due_date) = update.due_date {
        updated.due_date = due_date;
    }
    if let Some(category) = &update.category {
        updated.category = category.clone();
    }
    if let Some(is_recurring) = update.is_recurring {
        updated.is_recurring = is_recurring;
    }
    if let Some(frequency) = update.frequency {
        updated.frequency = Some(frequency);
    }
    if let Some(status) = update.status {
        updated.status = status;
    }
    if let Some(payment_method) = update.payment_method {
        updated.payment_method = Some(payment_method);
    }
    if let Some(notes) = &update.notes {
        updated.notes = Some(notes.clone());
    }
    if !updated.is_recurring {
        updated.frequency = None;
    }
    updated.check_frequency_invariant()?;

    Ok(Transition {
        bill: updated,
        payment,
        successor,
    })
}

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bills")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub user_id: String,
    pub family_id: String,
    pub name: String,
    pub amount_cents: i64,
    pub due_date: Date,
    pub category: String,
    pub is_recurring: bool,
    pub frequency: Option<String>,
    pub status: String,
    pub payment_method: Option<String>,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::bill_history::Entity")]
    History,
    #[sea_orm(has_many = "super::bill_reminders::Entity")]
    Reminders,
}

impl Related<super::bill_history::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::History.def()
    }
}

impl Related<super::bill_reminders::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reminders.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&Bill> for ActiveModel {
    fn from(bill: &Bill) -> Self {
        Self {
            id: ActiveValue::Set(bill.id.to_string()),
            user_id: ActiveValue::Set(bill.user_id.clone()),
            family_id: ActiveValue::Set(bill.family_id.clone()),
            name: ActiveValue::Set(bill.name.clone()),
            amount_cents: ActiveValue::Set(bill.amount_cents),
            due_date: ActiveValue::Set(bill.due_date),
            category: ActiveValue::Set(bill.category.clone()),
            is_recurring: ActiveValue::Set(bill.is_recurring),
            frequency: ActiveValue::Set(bill.frequency.map(|f| f.as_str().to_string())),
            status: ActiveValue::Set(bill.status.as_str().to_string()),
            payment_method: ActiveValue::Set(
                bill.payment_method.map(|m| m.as_str().to_string()),
            ),
            notes: ActiveValue::Set(bill.notes.clone()),
        }
    }
}

impl TryFrom<Model> for Bill {
    type Error = EngineError;

    fn try_from(model: Model) -> Result<Self, Self::Error> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("bill".to_string()))?,
            user_id: model.user_id,
            family_id: model.family_id,
            name: model.name,
            amount_cents: model.amount_cents,
            due_date: model.due_date,
            category: model.category,
            is_recurring: model.is_recurring,
            frequency: model
                .frequency
                .as_deref()
                .map(Frequency::try_from)
                .transpose()?,
            status: BillStatus::try_from(model.status.as_str())?,
            payment_method: model
                .payment_method
                .as_deref()
                .map(PaymentMethod::try_from)
                .transpose()?,
            notes: model.notes,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_bill(is_recurring: bool, frequency: Option<Frequency>) -> Bill {
        Bill {
            id: Uuid::new_v4(),
            user_id: "alice".to_string(),
            family_id: "fam".to_string(),
            name: "Rent".to_string(),
            amount_cents: 120_000,
            due_date: date(2026, 1, 31),
            category: "Housing".to_string(),
            is_recurring,
            frequency,
            status: BillStatus::Pending,
            payment_method: None,
            notes: None,
        }
    }

    #[test]
    fn monthly_advance_clamps_to_end_of_february() {
        assert_eq!(
            Frequency::Monthly.advance(date(2026, 1, 31)),
            date(2026, 2, 28)
        );
        // 2028 is a leap year.
        assert_eq!(
            Frequency::Monthly.advance(date(2028, 1, 31)),
            date(2028, 2, 29)
        );
    }

    #[test]
    fn quarterly_and_yearly_advance() {
        assert_eq!(
            Frequency::Quarterly.advance(date(2026, 11, 30)),
            date(2027, 2, 28)
        );
        assert_eq!(
            Frequency::Yearly.advance(date(2028, 2, 29)),
            date(2029, 2, 28)
        );
    }

    #[test]
    fn weekly_advance_crosses_month_boundary() {
        assert_eq!(
            Frequency::Weekly.advance(date(2026, 1, 28)),
            date(2026, 2, 4)
        );
    }

    #[test]
    fn paying_a_non_recurring_bill_appends_history_only() {
        let bill = sample_bill(false, None);
        let update = BillUpdate {
            status: Some(BillStatus::Paid),
            payment_method: Some(PaymentMethod::Cash),
            ..Default::default()
        };

        let transition = apply_status_transition(&bill, &[], &update, Utc::now()).unwrap();

        let payment = transition.payment.unwrap();
        assert_eq!(payment.amount_cents, 120_000);
        assert_eq!(payment.payment_method, PaymentMethod::Cash);
        assert!(transition.successor.is_none());
        assert_eq!(transition.bill.status, BillStatus::Paid);
    }

    #[test]
    fn payment_method_defaults_to_other() {
        let bill = sample_bill(false, None);
        let update = BillUpdate {
            status: Some(BillStatus::Paid),
            ..Default::default()
        };

        let transition = apply_status_transition(&bill, &[], &update, Utc::now()).unwrap();
        assert_eq!(
            transition.payment.unwrap().payment_method,
            PaymentMethod::Other
        );
    }

    #[test]
    fn paying_a_recurring_bill_spawns_a_successor() {
        let bill = sample_bill(true, Some(Frequency::Monthly));
        let reminders = vec![Reminder {
            id: Uuid::new_v4(),
            bill_id: bill.id,
            channel: ReminderChannel::Email,
            days_before_due: 3,
            sent: true,
        }];
        let update = BillUpdate {
            status: Some(BillStatus::Paid),
            ..Default::default()
        };

        let transition = apply_status_transition(&bill, &reminders, &update, Utc::now()).unwrap();

        let (next, next_reminders) = transition.successor.unwrap();
        assert_ne!(next.id, bill.id);
        assert_eq!(next.due_date, date(2026, 2, 28));
        assert_eq!(next.status, BillStatus::Pending);
        assert_eq!(next.name, bill.name);
        assert_eq!(next_reminders.len(), 1);
        assert!(!next_reminders[0].sent);
        assert_eq!(next_reminders[0].bill_id, next.id);
    }

    #[test]
    fn paying_an_already_paid_bill_is_idempotent() {
        let mut bill = sample_bill(true, Some(Frequency::Monthly));
        bill.status = BillStatus::Paid;
        let update = BillUpdate {
            status: Some(BillStatus::Paid),
            ..Default::default()
        };

        let transition = apply_status_transition(&bill, &[], &update, Utc::now()).unwrap();
        assert!(transition.payment.is_none());
        assert!(transition.successor.is_none());
    }

    #[test]
    fn merge_is_last_write_wins_per_field() {
        let bill = sample_bill(false, None);
        let update = BillUpdate {
            name: Some("Rent 2".to_string()),
            amount_cents: Some(130_000),
            ..Default::default()
        };

        let transition = apply_status_transition(&bill, &[], &update, Utc::now()).unwrap();
        assert_eq!(transition.bill.name, "Rent 2");
        assert_eq!(transition.bill.amount_cents, 130_000);
        assert_eq!(transition.bill.status, BillStatus::Pending);
        assert!(transition.payment.is_none());
    }

    #[test]
    fn recurring_without_frequency_is_rejected() {
        let draft = BillDraft {
            name: "Gym".to_string(),
            amount_cents: 3_000,
            due_date: date(2026, 3, 1),
            category: "Health".to_string(),
            is_recurring: true,
            frequency: None,
            status: None,
            payment_method: None,
            notes: None,
            reminders: Vec::new(),
        };
        assert!(matches!(
            Bill::new("alice", "fam", draft),
            Err(EngineError::Validation(_))
        ));
    }
}
