/*
 * Responsibility
 * - users の保存先 (UserRepo trait) と in-memory 実装
 * - username は一意。重複 insert は RepoError::Conflict
 * - password_hash 以外に平文の資格情報は持たない
 */
use std::collections::{BTreeSet, HashMap};
use std::{future::Future, pin::Pin};

use tokio::sync::RwLock;

use crate::repos::error::RepoError;

type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserRow {
    pub username: String,
    pub password_hash: String,
    pub nickname: String,
    pub activated: bool,
    pub authorities: BTreeSet<String>,
}

/// Storage seam for user credentials.
///
/// Implementations must be safe to share across request tasks.
pub trait UserRepo: Send + Sync {
    fn find_by_username<'a>(
        &'a self,
        username: &'a str,
    ) -> BoxFuture<'a, Result<Option<UserRow>, RepoError>>;

    // Insert a new user. Fails with `RepoError::Conflict` if the username is taken.
    fn insert(&self, user: UserRow) -> BoxFuture<'_, Result<UserRow, RepoError>>;
}

#[derive(Debug, Default)]
pub struct InMemoryUserRepo {
    users: RwLock<HashMap<String, UserRow>>,
}

impl InMemoryUserRepo {
    pub fn new() -> Self {
        Self::default()
    }
}

impl UserRepo for InMemoryUserRepo {
    fn find_by_username<'a>(
        &'a self,
        username: &'a str,
    ) -> BoxFuture<'a, Result<Option<UserRow>, RepoError>> {
        Box::pin(async move { Ok(self.users.read().await.get(username).cloned()) })
    }

    fn insert(&self, user: UserRow) -> BoxFuture<'_, Result<UserRow, RepoError>> {
        Box::pin(async move {
            let mut users = self.users.write().await;
            if users.contains_key(&user.username) {
                return Err(RepoError::Conflict);
            }
            users.insert(user.username.clone(), user.clone());
            Ok(user)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(username: &str) -> UserRow {
        UserRow {
            username: username.to_string(),
            password_hash: "$2b$04$hash".to_string(),
            nickname: "nick".to_string(),
            activated: true,
            authorities: BTreeSet::from(["ROLE_USER".to_string()]),
        }
    }

    #[tokio::test]
    async fn insert_then_find() {
        let repo = InMemoryUserRepo::new();
        repo.insert(row("alice")).await.unwrap();

        let found = repo.find_by_username("alice").await.unwrap();
        assert_eq!(found, Some(row("alice")));
        assert_eq!(repo.find_by_username("bob").await.unwrap(), None);
    }

    #[tokio::test]
    async fn duplicate_username_conflicts() {
        let repo = InMemoryUserRepo::new();
        repo.insert(row("alice")).await.unwrap();

        let err = repo.insert(row("alice")).await.unwrap_err();
        assert!(matches!(err, RepoError::Conflict));
    }
}
