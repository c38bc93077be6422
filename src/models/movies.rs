use serde::{Serialize, Deserialize};
use sea_orm::entity::prelude::*;

// Seuls rating et review sont modifiables après création (voir routes/movies.rs)
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "movies")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub title: String,
    pub release_date: i32, // Année de sortie
    pub rating: f64,
    pub review: String,
    pub overview: String,
    pub img_url: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
