//! Payment history rows for bills.
//!
//! Append-only: rows are inserted when a bill transitions into `paid` and are
//! never updated or removed afterwards (deleting the bill drops them).

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    bills::{BillStatus, HistoryEntry, PaymentMethod},
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bill_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub bill_id: String,
    pub date: DateTimeUtc,
    pub amount_cents: i64,
    pub status: String,
    pub payment_method: String,
    pub notes: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::bills::Entity",
        from = "Column::BillId",
        to = "super::bills::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Bill,
}

impl Related<super::bills::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Bill.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&HistoryEntry> for ActiveModel {
    fn from(entry: &HistoryEntry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            bill_id: ActiveValue::Set(entry.bill_id.to_string()),
            date: ActiveValue::Set(entry.date),
            amount_cents: ActiveValue::Set(entry.amount_cents),
            status: ActiveValue::Set(entry.status.as_str().to_string()),
            payment_method: ActiveValue::Set(entry.payment_method.as_str().to_string()),
            notes: ActiveValue::Set(entry.notes.clone()),
        }
    }
}

impl TryFrom<Model> for HistoryEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("bill history entry".to_string()))?,
            bill_id: Uuid::parse_str(&model.bill_id)
                .map_err(|_| EngineError::NotFound("bill".to_string()))?,
            date: model.date,
            amount_cents: model.amount_cents,
            status: BillStatus::try_from(model.status.as_str())?,
            payment_method: PaymentMethod::try_from(model.payment_method.as_str())?,
            notes: model.notes,
        })
    }
}
