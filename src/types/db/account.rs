use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "accounts")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub username: String,
    // Upper-cased copies used for case-insensitive lookups
    #[sea_orm(unique)]
    pub normalized_username: String,
    pub email: String,
    pub normalized_email: String,
    pub password_hash: String,
    pub email_confirmed: bool,
    pub two_factor_enabled: bool,
    pub lockout_enabled: bool,
    pub access_failed_count: i32,
    /// Unix timestamp until which sign-in is refused
    pub lockout_end: Option<i64>,
    pub created_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
