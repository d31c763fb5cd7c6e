use chrono::{DateTime, Utc};
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lifecycle status for items and stock movements.
///
/// Movements share the item vocabulary: a movement recorded as `damaged`
/// marks the item it touches as damaged.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ItemStatus {
    #[default]
    Active,
    Inactive,
    Damaged,
}

impl ItemStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ItemStatus::Active => "active",
            ItemStatus::Inactive => "inactive",
            ItemStatus::Damaged => "damaged",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "active" => Some(ItemStatus::Active),
            "inactive" => Some(ItemStatus::Inactive),
            "damaged" => Some(ItemStatus::Damaged),
            _ => None,
        }
    }
}

/// Fixed set of places stock can be held at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum StorageLocation {
    Stores,
    Office,
    Container,
    DataOffice,
    FieldWork,
}

impl StorageLocation {
    pub fn as_str(&self) -> &'static str {
        match self {
            StorageLocation::Stores => "stores",
            StorageLocation::Office => "office",
            StorageLocation::Container => "container",
            StorageLocation::DataOffice => "data office",
            StorageLocation::FieldWork => "field work",
        }
    }

    /// Case-insensitive parse that tolerates `-`/`_`/space separators, so
    /// "Field Work", "field_work", and "FIELD-WORK" all resolve.
    pub fn from_str(s: &str) -> Option<Self> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .collect::<String>()
            .to_ascii_lowercase();
        match key.as_str() {
            "stores" => Some(StorageLocation::Stores),
            "office" => Some(StorageLocation::Office),
            "container" => Some(StorageLocation::Container),
            "dataoffice" => Some(StorageLocation::DataOffice),
            "fieldwork" => Some(StorageLocation::FieldWork),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize, utoipa::ToSchema)]
#[schema(as = Item)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub model: Option<String>,
    #[sea_orm(unique)]
    pub serial_number: String,
    pub project_category: Option<String>,
    pub description: Option<String>,
    pub supplier: Option<String>,
    pub quantity: i32,
    pub storage_location: String, // Storing as string in DB, converted via StorageLocation
    pub status: String,           // Storing as string in DB, converted via ItemStatus
    pub notes: Option<String>,
    pub date_added: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn status(&self) -> Option<ItemStatus> {
        ItemStatus::from_str(&self.status)
    }

    pub fn location(&self) -> Option<StorageLocation> {
        StorageLocation::from_str(&self.storage_location)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::stock_movement::Entity")]
    StockMovement,
}

impl Related<super::stock_movement::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::StockMovement.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn location_parsing_tolerates_separators_and_case() {
        assert_eq!(
            StorageLocation::from_str("Field Work"),
            Some(StorageLocation::FieldWork)
        );
        assert_eq!(
            StorageLocation::from_str("field_work"),
            Some(StorageLocation::FieldWork)
        );
        assert_eq!(
            StorageLocation::from_str("DATA-OFFICE"),
            Some(StorageLocation::DataOffice)
        );
        assert_eq!(StorageLocation::from_str("warehouse 9"), None);
    }

    #[test]
    fn location_round_trips_through_its_string_form() {
        for loc in [
            StorageLocation::Stores,
            StorageLocation::Office,
            StorageLocation::Container,
            StorageLocation::DataOffice,
            StorageLocation::FieldWork,
        ] {
            assert_eq!(StorageLocation::from_str(loc.as_str()), Some(loc));
        }
    }

    #[test]
    fn status_defaults_to_active() {
        assert_eq!(ItemStatus::default(), ItemStatus::Active);
        assert_eq!(ItemStatus::from_str("Damaged"), Some(ItemStatus::Damaged));
        assert_eq!(ItemStatus::from_str("broken"), None);
    }
}
