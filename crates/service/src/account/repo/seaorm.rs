use sea_orm::DatabaseConnection;

use crate::account::repository::AccountRepository;
use crate::account::Account;
use crate::errors::ServiceError;
use models::errors::ModelError;

/// SeaORM-backed repository implementation.
pub struct SeaOrmAccountRepository {
    pub db: DatabaseConnection,
}

impl SeaOrmAccountRepository {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn db_err(e: ModelError) -> ServiceError {
    ServiceError::Db(e.to_string())
}

#[async_trait::async_trait]
impl AccountRepository for SeaOrmAccountRepository {
    async fn find_all(&self) -> Result<Vec<Account>, ServiceError> {
        let rows = models::account::list(&self.db).await.map_err(db_err)?;
        Ok(rows.into_iter().map(Account::from).collect())
    }

    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, ServiceError> {
        let row = models::account::find(&self.db, id).await.map_err(db_err)?;
        Ok(row.map(Account::from))
    }

    async fn find_by_name_containing(&self, term: &str) -> Result<Vec<Account>, ServiceError> {
        let rows = models::account::search_by_name(&self.db, term).await.map_err(db_err)?;
        Ok(rows.into_iter().map(Account::from).collect())
    }

    async fn save(&self, account: Account) -> Result<Account, ServiceError> {
        let saved = match account.id {
            None => models::account::insert(&self.db, &account).await.map_err(db_err)?,
            Some(id) => match models::account::update(&self.db, id, &account).await {
                Ok(m) => m,
                Err(ModelError::NotFound) => return Err(ServiceError::account_not_found(id)),
                Err(e) => return Err(db_err(e)),
            },
        };
        Ok(saved.into())
    }

    async fn delete(&self, account: &Account) -> Result<(), ServiceError> {
        let id = account
            .id
            .ok_or_else(|| ServiceError::Validation("cannot delete an unsaved account".into()))?;
        models::account::delete(&self.db, id).await.map_err(db_err)?;
        Ok(())
    }
}
