//! Trade history rows for investments. Append-only.

use sea_orm::{ActiveValue, entity::prelude::*};
use uuid::Uuid;

use crate::{
    EngineError, ResultEngine,
    investments::{HistoryAction, TradeEntry},
};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "investment_history")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub investment_id: String,
    pub date: Date,
    pub price_cents: i64,
    pub action: String,
    pub quantity: f64,
    pub amount_cents: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::investments::Entity",
        from = "Column::InvestmentId",
        to = "super::investments::Column::Id",
        on_update = "NoAction",
        on_delete = "Cascade"
    )]
    Investment,
}

impl Related<super::investments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Investment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<&TradeEntry> for ActiveModel {
    fn from(entry: &TradeEntry) -> Self {
        Self {
            id: ActiveValue::Set(entry.id.to_string()),
            investment_id: ActiveValue::Set(entry.investment_id.to_string()),
            date: ActiveValue::Set(entry.date),
            price_cents: ActiveValue::Set(entry.price_cents),
            action: ActiveValue::Set(entry.action.as_str().to_string()),
            quantity: ActiveValue::Set(entry.quantity),
            amount_cents: ActiveValue::Set(entry.amount_cents),
        }
    }
}

impl TryFrom<Model> for TradeEntry {
    type Error = EngineError;

    fn try_from(model: Model) -> ResultEngine<Self> {
        Ok(Self {
            id: Uuid::parse_str(&model.id)
                .map_err(|_| EngineError::NotFound("trade entry".to_string()))?,
            investment_id: Uuid::parse_str(&model.investment_id)
                .map_err(|_| EngineError::NotFound("investment".to_string()))?,
            date: model.date,
            price_cents: model.price_cents,
            action: HistoryAction::try_from(model.action.as_str())?,
            quantity: model.quantity,
            amount_cents: model.amount_cents,
        })
    }
}
