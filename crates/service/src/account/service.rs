use std::sync::Arc;

use tracing::{info, instrument};

use super::repository::AccountRepository;
use super::Account;
use crate::errors::ServiceError;

/// Account business service independent of web framework.
///
/// Holds no state of its own; every call goes to the repository.
pub struct AccountService<R: AccountRepository + ?Sized = dyn AccountRepository> {
    repo: Arc<R>,
}

impl<R: AccountRepository + ?Sized> AccountService<R> {
    pub fn new(repo: Arc<R>) -> Self { Self { repo } }

    pub async fn get_all(&self) -> Result<Vec<Account>, ServiceError> {
        self.repo.find_all().await
    }

    /// Absence is `Ok(None)`, not an error.
    pub async fn get_by_id(&self, id: i64) -> Result<Option<Account>, ServiceError> {
        self.repo.find_by_id(id).await
    }

    /// Persist a new account. Any id on the input is dropped; the repository assigns one.
    ///
    /// # Examples
    /// ```
    /// use std::sync::Arc;
    /// use service::account::{Account, AccountService, repository::memory::InMemoryAccountRepository};
    /// let svc = AccountService::new(Arc::new(InMemoryAccountRepository::new()));
    /// let created = tokio_test::block_on(svc.create(Account::new("John", "Doe", "123 Main St"))).unwrap();
    /// assert!(created.id.is_some());
    /// ```
    #[instrument(skip(self, account))]
    pub async fn create(&self, mut account: Account) -> Result<Account, ServiceError> {
        account.id = None;
        let created = self.repo.save(account).await?;
        info!(id = ?created.id, "account_created");
        Ok(created)
    }

    /// Overwrite first name, last name and address of the stored record.
    /// All three fields are replaced, the id never is.
    #[instrument(skip(self, patch))]
    pub async fn update(&self, id: i64, patch: Account) -> Result<Account, ServiceError> {
        let mut account = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::account_not_found(id))?;
        account.first_name = patch.first_name;
        account.last_name = patch.last_name;
        account.address = patch.address;
        let saved = self.repo.save(account).await?;
        info!(id, "account_updated");
        Ok(saved)
    }

    #[instrument(skip(self))]
    pub async fn delete(&self, id: i64) -> Result<(), ServiceError> {
        let account = self
            .repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::account_not_found(id))?;
        self.repo.delete(&account).await?;
        info!(id, "account_deleted");
        Ok(())
    }

    /// An empty result is a normal outcome here; callers decide what it means.
    pub async fn search_by_name(&self, term: &str) -> Result<Vec<Account>, ServiceError> {
        self.repo.find_by_name_containing(term).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::account::repository::memory::InMemoryAccountRepository;

    fn svc() -> AccountService<InMemoryAccountRepository> {
        AccountService::new(Arc::new(InMemoryAccountRepository::new()))
    }

    fn john() -> Account {
        Account::new("John", "Doe", "123 Main St")
    }

    #[tokio::test]
    async fn created_account_is_readable_by_id() -> Result<(), anyhow::Error> {
        let svc = svc();
        let created = svc.create(john()).await?;
        let id = created.id.expect("id assigned");
        assert_eq!(svc.get_by_id(id).await?, Some(created));
        Ok(())
    }

    #[tokio::test]
    async fn create_ignores_caller_supplied_id() -> Result<(), anyhow::Error> {
        let svc = svc();
        let first = svc.create(john()).await?;
        let mut sneaky = Account::new("Jane", "Smith", "456 Elm St");
        sneaky.id = first.id;
        let second = svc.create(sneaky).await?;
        assert_ne!(second.id, first.id);
        assert_eq!(svc.get_by_id(first.id.unwrap()).await?, Some(first));
        Ok(())
    }

    #[tokio::test]
    async fn get_all_keeps_creation_order() -> Result<(), anyhow::Error> {
        let svc = svc();
        svc.create(john()).await?;
        svc.create(Account::new("Jane", "Smith", "456 Elm St")).await?;
        let names: Vec<_> = svc.get_all().await?.into_iter().map(|a| a.first_name).collect();
        assert_eq!(names, vec!["John", "Jane"]);
        Ok(())
    }

    #[tokio::test]
    async fn update_overwrites_all_fields_and_keeps_id() -> Result<(), anyhow::Error> {
        let svc = svc();
        let id = svc.create(john()).await?.id.unwrap();

        let mut patch = Account::new("Jane", "Smith", "");
        patch.id = Some(999);
        let updated = svc.update(id, patch).await?;

        assert_eq!(updated.id, Some(id));
        assert_eq!(updated.first_name, "Jane");
        assert_eq!(updated.last_name, "Smith");
        assert_eq!(updated.address, "");
        assert_eq!(svc.get_by_id(id).await?, Some(updated));
        Ok(())
    }

    #[tokio::test]
    async fn update_missing_account_is_not_found() {
        let err = svc().update(7, john()).await.unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
        assert_eq!(err.to_string(), "Account not found with id 7");
    }

    #[tokio::test]
    async fn delete_removes_and_second_delete_fails() -> Result<(), anyhow::Error> {
        let svc = svc();
        let id = svc.create(john()).await?.id.unwrap();

        svc.delete(id).await?;
        assert!(svc.get_by_id(id).await?.is_none());
        assert!(matches!(svc.delete(id).await, Err(ServiceError::NotFound(_))));
        assert!(matches!(svc.update(id, john()).await, Err(ServiceError::NotFound(_))));
        Ok(())
    }

    #[tokio::test]
    async fn search_by_name_returns_empty_without_error() -> Result<(), anyhow::Error> {
        let svc = svc();
        svc.create(john()).await?;
        svc.create(Account::new("John", "Smith", "456 Elm St")).await?;
        assert_eq!(svc.search_by_name("john").await?.len(), 2);
        assert!(svc.search_by_name("NonExistentName").await?.is_empty());
        Ok(())
    }
}
