use async_trait::async_trait;

use super::Account;
use crate::errors::ServiceError;

/// Persistence seam for accounts.
///
/// Implementations own id assignment: `save` inserts when `id` is `None` and
/// overwrites the stored record otherwise. Ids are never reused.
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// All accounts in insertion order.
    async fn find_all(&self) -> Result<Vec<Account>, ServiceError>;
    async fn find_by_id(&self, id: i64) -> Result<Option<Account>, ServiceError>;
    /// Accounts whose first or last name contains `term`, ignoring case.
    async fn find_by_name_containing(&self, term: &str) -> Result<Vec<Account>, ServiceError>;
    async fn save(&self, account: Account) -> Result<Account, ServiceError>;
    async fn delete(&self, account: &Account) -> Result<(), ServiceError>;
}

/// In-memory repository used by default and in tests.
pub mod memory {
    use super::*;
    use std::collections::BTreeMap;
    use std::sync::atomic::{AtomicI64, Ordering};
    use tokio::sync::RwLock;

    pub struct InMemoryAccountRepository {
        accounts: RwLock<BTreeMap<i64, Account>>,
        next_id: AtomicI64,
    }

    impl Default for InMemoryAccountRepository {
        fn default() -> Self {
            Self { accounts: RwLock::new(BTreeMap::new()), next_id: AtomicI64::new(1) }
        }
    }

    impl InMemoryAccountRepository {
        pub fn new() -> Self {
            Self::default()
        }
    }

    #[async_trait]
    impl AccountRepository for InMemoryAccountRepository {
        async fn find_all(&self) -> Result<Vec<Account>, ServiceError> {
            let accounts = self.accounts.read().await;
            Ok(accounts.values().cloned().collect())
        }

        async fn find_by_id(&self, id: i64) -> Result<Option<Account>, ServiceError> {
            let accounts = self.accounts.read().await;
            Ok(accounts.get(&id).cloned())
        }

        async fn find_by_name_containing(&self, term: &str) -> Result<Vec<Account>, ServiceError> {
            let accounts = self.accounts.read().await;
            Ok(accounts.values().filter(|a| a.name_contains(term)).cloned().collect())
        }

        async fn save(&self, mut account: Account) -> Result<Account, ServiceError> {
            let mut accounts = self.accounts.write().await;
            let id = match account.id {
                Some(id) if !accounts.contains_key(&id) => return Err(ServiceError::account_not_found(id)),
                Some(id) => id,
                // BTreeMap keys double as insertion order since ids only grow
                None => {
                    let id = self.next_id.fetch_add(1, Ordering::SeqCst);
                    account.id = Some(id);
                    id
                }
            };
            accounts.insert(id, account.clone());
            Ok(account)
        }

        async fn delete(&self, account: &Account) -> Result<(), ServiceError> {
            let id = account
                .id
                .ok_or_else(|| ServiceError::Validation("cannot delete an unsaved account".into()))?;
            self.accounts.write().await.remove(&id);
            Ok(())
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[tokio::test]
        async fn ids_are_assigned_in_order_and_not_reused() -> Result<(), anyhow::Error> {
            let repo = InMemoryAccountRepository::new();
            let a = repo.save(Account::new("John", "Doe", "123 Main St")).await?;
            let b = repo.save(Account::new("Jane", "Smith", "456 Elm St")).await?;
            assert_eq!(a.id, Some(1));
            assert_eq!(b.id, Some(2));

            repo.delete(&b).await?;
            let c = repo.save(Account::new("Jim", "Beam", "789 Oak St")).await?;
            assert_eq!(c.id, Some(3));

            let names: Vec<_> = repo.find_all().await?.into_iter().map(|a| a.first_name).collect();
            assert_eq!(names, vec!["John", "Jim"]);
            Ok(())
        }

        #[tokio::test]
        async fn save_with_unknown_id_is_rejected() {
            let repo = InMemoryAccountRepository::new();
            let mut ghost = Account::new("Ghost", "User", "Nowhere");
            ghost.id = Some(42);
            let err = repo.save(ghost).await.unwrap_err();
            assert!(matches!(err, ServiceError::NotFound(_)));
            assert!(repo.find_all().await.unwrap().is_empty());
        }

        #[tokio::test]
        async fn name_search_matches_first_or_last_name() -> Result<(), anyhow::Error> {
            let repo = InMemoryAccountRepository::new();
            repo.save(Account::new("John", "Doe", "123 Main St")).await?;
            repo.save(Account::new("Jane", "Johnson", "456 Elm St")).await?;
            repo.save(Account::new("Mary", "Smith", "789 Oak St")).await?;

            let found = repo.find_by_name_containing("JOHN").await?;
            assert_eq!(found.len(), 2);
            assert!(repo.find_by_name_containing("zzz").await?.is_empty());
            Ok(())
        }
    }
}
