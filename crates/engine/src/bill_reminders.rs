//! Reminder rows for bills.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    bills::{Reminder, ReminderChannel},
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "bill_reminders")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub bill_id: String,
    pub channel: String,
    pub days_before_due: i32,
    pub sent: bool,
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

impl From<&Reminder> for ActiveModel {
    fn from(reminder: &Reminder) -> Self {
        Self {
            id: ActiveValue::Set(reminder.id.to_string()),
            bill_id: ActiveValue::Set(reminder.bill_id.to_string()),
            channel: ActiveValue::Set(reminder.channel.as_str().to_string()),
            days_before_due: ActiveValue::Set(reminder.days_before_due),
            sent: ActiveValue::Set(reminder.sent),
        }
    }
}

impl TryFrom<Model> for Reminder {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("reminder".to_string()))?,
            bill_id: Uuid::parse_str(&model.bill_id)
                .map_err(|_| EngineError::NotFound("bill".to_string()))?,
            channel: ReminderChannel::try_from(model.channel.as_str())?,
            days_before_due: model.days_before_due,
            sent: model.sent,
        })
    }
}
