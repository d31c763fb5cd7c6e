use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

pub use super::item::ItemStatus as MovementStatus;

/// Kinds of stock movements the engine can apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MovementType {
    In,
    Out,
    Transferred,
}

impl MovementType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementType::In => "in",
            MovementType::Out => "out",
            MovementType::Transferred => "transferred",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "in" => Some(MovementType::In),
            "out" => Some(MovementType::Out),
            "transferred" => Some(MovementType::Transferred),
            _ => None,
        }
    }
}

/// Ledger entry for one applied movement. Immutable once written except for
/// the status field, which allows post-hoc correction.
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[schema(as = StockMovement)]
#[sea_orm(table_name = "stock_movements")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_id: Uuid,
    pub movement_type: String, // Storing as string in DB, converted via MovementType
    pub quantity: i32,
    pub from_location: Option<String>,
    pub to_location: Option<String>,
    pub from_project: Option<String>,
    pub to_project: Option<String>,
    pub status: String,
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl Model {
    pub fn movement_type(&self) -> Option<MovementType> {
        MovementType::from_str(&self.movement_type)
    }

    pub fn status(&self) -> Option<MovementStatus> {
        MovementStatus::from_str(&self.status)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::item::Entity",
        from = "Column::ItemId",
        to = "super::item::Column::Id"
    )]
    Item,
}

impl Related<super::item::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Item.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn movement_type_parses_case_insensitively() {
        assert_eq!(MovementType::from_str("In"), Some(MovementType::In));
        assert_eq!(MovementType::from_str("OUT"), Some(MovementType::Out));
        assert_eq!(
            MovementType::from_str("transferred"),
            Some(MovementType::Transferred)
        );
        assert_eq!(MovementType::from_str("misplaced"), None);
    }
}
