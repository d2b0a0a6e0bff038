//! Bill operations.
//!
//! The status-transition rules themselves live in [`crate::bills`]; this
//! module loads the record, runs them, and persists every produced part
//! (updated bill, history row, successor and its reminders) inside one DB
//! transaction, so a failed write leaves nothing half-applied.

use chrono::{DateTime, Days, NaiveDate, Utc};
use sea_orm::{QueryFilter, QueryOrder, TransactionTrait, prelude::*};
use uuid::Uuid;

use crate::{
    Bill, BillDraft, BillUpdate, EngineError, HistoryEntry, Reminder, ResultEngine,
    bill_history, bill_reminders, bills, users,
};

use super::{Engine, with_tx};

impl Engine {
    /// Lists a user's bills, soonest due first.
    pub async fn list_bills(&self, user_id: &str) -> ResultEngine<Vec<Bill>> {
        let models = bills::Entity::find()
            .filter(bills::Column::UserId.eq(user_id))
            .order_by_asc(bills::Column::DueDate)
            .all(&self.database)
            .await?;

        models.into_iter().map(Bill::try_from).collect()
    }

    /// Pending bills due within the next 30 days, soonest first.
    pub async fn upcoming_bills(&self, user_id: &str, today: NaiveDate) -> ResultEngine<Vec<Bill>> {
        let horizon = today
            .checked_add_days(Days::new(30))
            .unwrap_or(NaiveDate::MAX);
        let models = bills::Entity::find()
            .filter(bills::Column::UserId.eq(user_id))
            .filter(bills::Column::Status.eq(crate::BillStatus::Pending.as_str()))
            .filter(bills::Column::DueDate.gte(today))
            .filter(bills::Column::DueDate.lte(horizon))
            .order_by_asc(bills::Column::DueDate)
            .all(&self.database)
            .await?;

        models.into_iter().map(Bill::try_from).collect()
    }

    /// One bill with its reminders and payment history (oldest first).
    pub async fn bill_detail(
        &self,
        bill_id: Uuid,
        user_id: &str,
    ) -> ResultEngine<(Bill, Vec<Reminder>, Vec<HistoryEntry>)> {
        with_tx!(self, |db_tx| {
            let model = self.require_bill_owned(&db_tx, bill_id, user_id).await?;
            let reminders = self.load_reminders(&db_tx, bill_id).await?;

            let history_models = bill_history::Entity::find()
                .filter(bill_history::Column::BillId.eq(bill_id.to_string()))
                .order_by_asc(bill_history::Column::Date)
                .all(&db_tx)
                .await?;
            let history = history_models
                .into_iter()
                .map(HistoryEntry::try_from)
                .collect::<ResultEngine<Vec<_>>>()?;

            Ok((Bill::try_from(model)?, reminders, history))
        })
    }

    pub async fn create_bill(
        &self,
        user_id: &str,
        family_id: &str,
        draft: BillDraft,
    ) -> ResultEngine<Uuid> {
        let reminder_drafts = draft.reminders.clone();
        let bill = Bill::new(user_id, family_id, draft)?;
        let bill_id = bill.id;

        with_tx!(self, |db_tx| {
            bills::ActiveModel::from(&bill).insert(&db_tx).await?;
            for reminder_draft in reminder_drafts {
                let reminder = Reminder {
                    id: Uuid::new_v4(),
                    bill_id,
                    channel: reminder_draft.channel,
                    days_before_due: reminder_draft.days_before_due,
                    sent: false,
                };
                bill_reminders::ActiveModel::from(&reminder)
                    .insert(&db_tx)
                    .await?;
            }
            Ok(bill_id)
        })
    }

    /// Applies a change set to a bill, running the paid-transition rules.
    ///
    /// Returns the updated bill and, when the transition spawned a recurring
    /// successor, its id. Both records and the history row are persisted in
    /// the same DB transaction.
    pub async fn update_bill(
        &self,
        bill_id: Uuid,
        user_id: &str,
        update: BillUpdate,
        now: DateTime<Utc>,
    ) -> ResultEngine<(Bill, Option<Uuid>)> {
        with_tx!(self, |db_tx| {
            let model = self.require_bill_owned(&db_tx, bill_id, user_id).await?;
            let bill = Bill::try_from(model)?;
            let reminders = self.load_reminders(&db_tx, bill_id).await?;

            let transition = crate::apply_status_transition(&bill, &reminders, &update, now)?;

            bills::ActiveModel::from(&transition.bill)
                .update(&db_tx)
                .await?;
            if let Some(payment) = &transition.payment {
                bill_history::ActiveModel::from(payment)
                    .insert(&db_tx)
                    .await?;
            }

            let mut successor_id = None;
            if let Some((successor, successor_reminders)) = &transition.successor {
                bills::ActiveModel::from(successor).insert(&db_tx).await?;
                for reminder in successor_reminders {
                    bill_reminders::ActiveModel::from(reminder)
                        .insert(&db_tx)
                        .await?;
                }
                successor_id = Some(successor.id);
            }

            Ok((transition.bill, successor_id))
        })
    }

    pub async fn delete_bill(&self, bill_id: Uuid, user_id: &str) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            self.require_bill_owned(&db_tx, bill_id, user_id).await?;

            bill_history::Entity::delete_many()
                .filter(bill_history::Column::BillId.eq(bill_id.to_string()))
                .exec(&db_tx)
                .await?;
            bill_reminders::Entity::delete_many()
                .filter(bill_reminders::Column::BillId.eq(bill_id.to_string()))
                .exec(&db_tx)
                .await?;
            bills::Entity::delete_by_id(bill_id.to_string())
                .exec(&db_tx)
                .await?;
            Ok(())
        })
    }

    /// Sends a reminder mail for a bill to its owner's address.
    pub async fn remind_bill(&self, bill_id: Uuid, user_id: &str) -> ResultEngine<()> {
        let mailer = self
            .mailer
            .as_ref()
            .ok_or_else(|| EngineError::Unavailable("mail is not configured".to_string()))?
            .clone();

        let (bill, email) = with_tx!(self, |db_tx| {
            let model = self.require_bill_owned(&db_tx, bill_id, user_id).await?;
            let user = users::Entity::find_by_id(user_id.to_string())
                .one(&db_tx)
                .await?
                .ok_or_else(|| EngineError::NotFound("user".to_string()))?;
            Ok::<_, EngineError>((Bill::try_from(model)?, user.email))
        })?;

        let subject = format!("Bill Reminder: {}", bill.name);
        let html = format!(
            "<h2>Bill Payment Reminder</h2>\
             <p>This is a reminder for your upcoming bill:</p>\
             <ul>\
             <li><strong>Bill:</strong> {}</li>\
             <li><strong>Amount:</strong> ${}</li>\
             <li><strong>Due Date:</strong> {}</li>\
             </ul>\
             <p>Please ensure timely payment to avoid any late fees.</p>",
            bill.name,
            format_cents(bill.amount_cents),
            bill.due_date,
        );
        mailer.send(&email, &subject, &html).await
    }

    async fn load_reminders(
        &self,
        db_tx: &sea_orm::DatabaseTransaction,
        bill_id: Uuid,
    ) -> ResultEngine<Vec<Reminder>> {
        let models = bill_reminders::Entity::find()
            .filter(bill_reminders::Column::BillId.eq(bill_id.to_string()))
            .all(db_tx)
            .await?;
        models.into_iter().map(Reminder::try_from).collect()
    }
}

fn format_cents(cents: i64) -> String {
    format!("{}.{:02}", cents / 100, (cents % 100).abs())
}
