use sea_orm::entity::prelude::*;
use sea_orm::sea_query::{Expr, Func, LikeExpr};
use sea_orm::ActiveValue::{NotSet, Set, Unchanged};
use sea_orm::{Condition, DatabaseConnection, DbErr, QueryFilter, QueryOrder};
use serde::{Deserialize, Serialize};

use crate::errors::ModelError;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "account")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}

/// An account as seen by the service and the HTTP API.
///
/// `id` is `None` until the record has been saved once; the store assigns it
/// and it never changes afterwards.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub id: Option<i64>,
    pub first_name: String,
    pub last_name: String,
    pub address: String,
}

impl Account {
    pub fn new(first_name: impl Into<String>, last_name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            id: None,
            first_name: first_name.into(),
            last_name: last_name.into(),
            address: address.into(),
        }
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    /// Case-insensitive substring match on first or last name.
    pub fn name_contains(&self, term: &str) -> bool {
        let needle = term.to_lowercase();
        self.first_name.to_lowercase().contains(&needle) || self.last_name.to_lowercase().contains(&needle)
    }
}

impl From<Model> for Account {
    fn from(m: Model) -> Self {
        Self {
            id: Some(m.id),
            first_name: m.first_name,
            last_name: m.last_name,
            address: m.address,
        }
    }
}

/// Request body for create and update. Every field is optional on the wire so
/// that missing values surface as validation errors instead of parse errors.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AccountPayload {
    pub id: Option<i64>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub address: Option<String>,
}

fn require(field: &str, value: Option<String>, violations: &mut Vec<String>) -> String {
    match value {
        None => {
            violations.push(format!("{field} must not be null"));
            String::new()
        }
        Some(v) if v.trim().is_empty() => {
            violations.push(format!("{field} must not be blank"));
            v
        }
        Some(v) => v,
    }
}

impl AccountPayload {
    /// Check required fields and turn the payload into an [`Account`].
    /// All violations are reported together, in field order.
    pub fn validate(self) -> Result<Account, ModelError> {
        let mut violations = Vec::new();
        let first_name = require("firstName", self.first_name, &mut violations);
        let last_name = require("lastName", self.last_name, &mut violations);
        let address = require("address", self.address, &mut violations);
        if !violations.is_empty() {
            return Err(ModelError::Validation(violations.join("; ")));
        }
        Ok(Account { id: self.id, first_name, last_name, address })
    }
}

fn escape_like(term: &str) -> String {
    let mut out = String::with_capacity(term.len());
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

pub async fn list(db: &DatabaseConnection) -> Result<Vec<Model>, ModelError> {
    Ok(Entity::find().order_by_asc(Column::Id).all(db).await?)
}

pub async fn find(db: &DatabaseConnection, id: i64) -> Result<Option<Model>, ModelError> {
    Ok(Entity::find_by_id(id).one(db).await?)
}

pub async fn search_by_name(db: &DatabaseConnection, term: &str) -> Result<Vec<Model>, ModelError> {
    let pattern = format!("%{}%", escape_like(&term.to_lowercase()));
    let contains = |col: Column| {
        Expr::expr(Func::lower(Expr::col(col))).like(LikeExpr::new(pattern.clone()).escape('\\'))
    };
    let found = Entity::find()
        .filter(Condition::any().add(contains(Column::FirstName)).add(contains(Column::LastName)))
        .order_by_asc(Column::Id)
        .all(db)
        .await?;
    Ok(found)
}

pub async fn insert(db: &DatabaseConnection, account: &Account) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: NotSet,
        first_name: Set(account.first_name.clone()),
        last_name: Set(account.last_name.clone()),
        address: Set(account.address.clone()),
    };
    Ok(am.insert(db).await?)
}

pub async fn update(db: &DatabaseConnection, id: i64, account: &Account) -> Result<Model, ModelError> {
    let am = ActiveModel {
        id: Unchanged(id),
        first_name: Set(account.first_name.clone()),
        last_name: Set(account.last_name.clone()),
        address: Set(account.address.clone()),
    };
    match am.update(db).await {
        Ok(m) => Ok(m),
        Err(DbErr::RecordNotUpdated) => Err(ModelError::NotFound),
        Err(e) => Err(e.into()),
    }
}

/// Returns whether a row was removed.
pub async fn delete(db: &DatabaseConnection, id: i64) -> Result<bool, ModelError> {
    let res = Entity::delete_by_id(id).exec(db).await?;
    Ok(res.rows_affected > 0)
}
