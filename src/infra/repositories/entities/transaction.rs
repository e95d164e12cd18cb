//! Stock transaction database entity for SeaORM.
//!
//! Rows are append-only: no update or delete path exists anywhere in the
//! application.

use sea_orm::entity::prelude::*;

use crate::domain::{StockTransaction, TransactionType};

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "transactions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub kind: String,
    pub quantity: i32,
    pub product_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product::Entity",
        from = "Column::ProductId",
        to = "super::product::Column::Id"
    )]
    Product,
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
}

impl Related<super::product::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
    }
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

/// Convert database model to domain entity
impl From<Model> for StockTransaction {
    fn from(model: Model) -> Self {
        StockTransaction {
            id: model.id,
            kind: TransactionType::from(model.kind.as_str()),
            quantity: model.quantity,
            product_id: model.product_id,
            user_id: model.user_id,
            created_at: model.created_at,
        }
    }
}
