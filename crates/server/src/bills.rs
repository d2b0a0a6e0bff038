//! Bill API endpoints

use api_types::Created;
use api_types::bill::{
    BillDetail, BillNew, BillPatch, BillStatus, BillUpdated, BillView, Frequency, HistoryView,
    PaymentMethod, ReminderChannel, ReminderView,
};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use chrono::Utc;
use uuid::Uuid;

use crate::{ServerError, server::ServerState};
use engine::users;

fn status_to_engine(status: BillStatus) -> engine::BillStatus {
    match status {
        BillStatus::Pending => engine::BillStatus::Pending,
        BillStatus::Paid => engine::BillStatus::Paid,
        BillStatus::Overdue => engine::BillStatus::Overdue,
    }
}

fn status_from_engine(status: engine::BillStatus) -> BillStatus {
    match status {
        engine::BillStatus::Pending => BillStatus::Pending,
        engine::BillStatus::Paid => BillStatus::Paid,
        engine::BillStatus::Overdue => BillStatus::Overdue,
    }
}

fn frequency_to_engine(frequency: Frequency) -> engine::Frequency {
    match frequency {
        Frequency::Weekly => engine::Frequency::Weekly,
        Frequency::Monthly => engine::Frequency::Monthly,
        Frequency::Quarterly => engine::Frequency::Quarterly,
        Frequency::Yearly => engine::Frequency::Yearly,
    }
}

fn frequency_from_engine(frequency: engine::Frequency) -> Frequency {
    match frequency {
        engine::Frequency::Weekly => Frequency::Weekly,
        engine::Frequency::Monthly => Frequency::Monthly,
        engine::Frequency::Quarterly => Frequency::Quarterly,
        engine::Frequency::Yearly => Frequency::Yearly,
    }
}

fn method_to_engine(method: PaymentMethod) -> engine::PaymentMethod {
    match method {
        PaymentMethod::BankTransfer => engine::PaymentMethod::BankTransfer,
        PaymentMethod::CreditCard => engine::PaymentMethod::CreditCard,
        PaymentMethod::DebitCard => engine::PaymentMethod::DebitCard,
        PaymentMethod::Cash => engine::PaymentMethod::Cash,
        PaymentMethod::Other => engine::PaymentMethod::Other,
    }
}

fn method_from_engine(method: engine::PaymentMethod) -> PaymentMethod {
    match method {
        engine::PaymentMethod::BankTransfer => PaymentMethod::BankTransfer,
        engine::PaymentMethod::CreditCard => PaymentMethod::CreditCard,
        engine::PaymentMethod::DebitCard => PaymentMethod::DebitCard,
        engine::PaymentMethod::Cash => PaymentMethod::Cash,
        engine::PaymentMethod::Other => PaymentMethod::Other,
    }
}

fn channel_to_engine(channel: ReminderChannel) -> engine::ReminderChannel {
    match channel {
        ReminderChannel::Email => engine::ReminderChannel::Email,
        ReminderChannel::Push => engine::ReminderChannel::Push,
        ReminderChannel::Sms => engine::ReminderChannel::Sms,
    }
}

fn channel_from_engine(channel: engine::ReminderChannel) -> ReminderChannel {
    match channel {
        engine::ReminderChannel::Email => ReminderChannel::Email,
        engine::ReminderChannel::Push => ReminderChannel::Push,
        engine::ReminderChannel::Sms => ReminderChannel::Sms,
    }
}

fn view(bill: &engine::Bill) -> BillView {
    BillView {
        id: bill.id,
        name: bill.name.clone(),
        amount_cents: bill.amount_cents,
        due_date: bill.due_date,
        category: bill.category.clone(),
        is_recurring: bill.is_recurring,
        frequency: bill.frequency.map(frequency_from_engine),
        status: status_from_engine(bill.status),
        payment_method: bill.payment_method.map(method_from_engine),
        notes: bill.notes.clone(),
    }
}

pub async fn list(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BillView>>, ServerError> {
    let bills = state.engine.list_bills(&user.username).await?;
    Ok(Json(bills.iter().map(view).collect()))
}

pub async fn upcoming(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
) -> Result<Json<Vec<BillView>>, ServerError> {
    let bills = state
        .engine
        .upcoming_bills(&user.username, Utc::now().date_naive())
        .await?;
    Ok(Json(bills.iter().map(view).collect()))
}

pub async fn detail(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<BillDetail>, ServerError> {
    let (bill, reminders, history) = state.engine.bill_detail(id, &user.username).await?;
    Ok(Json(BillDetail {
        bill: view(&bill),
        reminders: reminders
            .into_iter()
            .map(|r| ReminderView {
                id: r.id,
                channel: channel_from_engine(r.channel),
                days_before_due: r.days_before_due,
                sent: r.sent,
            })
            .collect(),
        history: history
            .into_iter()
            .map(|h| HistoryView {
                id: h.id,
                date: h.date,
                amount_cents: h.amount_cents,
                status: status_from_engine(h.status),
                payment_method: method_from_engine(h.payment_method),
                notes: h.notes,
            })
            .collect(),
    }))
}

pub async fn create(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Json(payload): Json<BillNew>,
) -> Result<(StatusCode, Json<Created>), ServerError> {
    let draft = engine::BillDraft {
        name: payload.name,
        amount_cents: payload.amount_cents,
        due_date: payload.due_date,
        category: payload.category,
        is_recurring: payload.is_recurring,
        frequency: payload.frequency.map(frequency_to_engine),
        status: payload.status.map(status_to_engine),
        payment_method: payload.payment_method.map(method_to_engine),
        notes: payload.notes,
        reminders: payload
            .reminders
            .into_iter()
            .map(|r| engine::ReminderDraft {
                channel: channel_to_engine(r.channel),
                days_before_due: r.days_before_due,
            })
            .collect(),
    };

    let id = state
        .engine
        .create_bill(&user.username, &user.family_id, draft)
        .await?;
    Ok((StatusCode::CREATED, Json(Created { id })))
}

pub async fn update(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
    Json(payload): Json<BillPatch>,
) -> Result<Json<BillUpdated>, ServerError> {
    let update = engine::BillUpdate {
        name: payload.name,
        amount_cents: payload.amount_cents,
        due_date: payload.due_date,
        category: payload.category,
        is_recurring: payload.is_recurring,
        frequency: payload.frequency.map(frequency_to_engine),
        status: payload.status.map(status_to_engine),
        payment_method: payload.payment_method.map(method_to_engine),
        notes: payload.notes,
    };

    let (bill, successor_id) = state
        .engine
        .update_bill(id, &user.username, update, Utc::now())
        .await?;
    Ok(Json(BillUpdated {
        bill: view(&bill),
        successor_id,
    }))
}

pub async fn delete(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.delete_bill(id, &user.username).await?;
    Ok(StatusCode::NO_CONTENT)
}

pub async fn remind(
    Extension(user): Extension<users::Model>,
    State(state): State<ServerState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, ServerError> {
    state.engine.remind_bill(id, &user.username).await?;
    Ok(StatusCode::ACCEPTED)
}
