use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "users")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub passport_serie: String,
    pub passport_number: String,
    pub surname: String,
    pub name: String,
    pub patronymic: Option<String>,
    pub address: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::work_interval::Entity")]
    WorkIntervals,
}

impl Related<super::work_interval::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::WorkIntervals.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
