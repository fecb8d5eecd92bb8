//! `SeaORM` Entity for node_info table

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "node_info")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub name: String,
    pub ip: String,
    pub usercount: i64,
    pub heartbeat: i64,
    pub score: i64,
    pub selfcheck: bool,
    pub throughput: i64,
    pub cpu: f64,
    pub uptime: String,
    pub total_throughput: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
