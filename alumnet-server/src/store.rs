//! JSON documents in sled trees, one tree per collection.

use std::marker::PhantomData;

use alumnet_common::resources::{Event, Job, Location, Post};
use serde::{de::DeserializeOwned, Serialize};
use sled::{
    transaction::{abort, ConflictableTransactionResult, TransactionalTree},
    Db, Tree,
};

use crate::error::{AppError, Result};

/// A record stored under its own id.
pub trait Document: Serialize + DeserializeOwned {
    fn key(&self) -> &str;
}

impl Document for Post {
    fn key(&self) -> &str {
        &self.id.0
    }
}
impl Document for Job {
    fn key(&self) -> &str {
        &self.id.0
    }
}
impl Document for Event {
    fn key(&self) -> &str {
        &self.id.0
    }
}
impl Document for Location {
    fn key(&self) -> &str {
        &self.id.0
    }
}

pub struct Collection<T> {
    tree: Tree,
    _document: PhantomData<fn() -> T>,
}

impl<T> Clone for Collection<T> {
    fn clone(&self) -> Self {
        Self {
            tree: self.tree.clone(),
            _document: PhantomData,
        }
    }
}

impl<T: Document> Collection<T> {
    pub fn open(db: &Db, name: &str) -> Result<Self> {
        Ok(Self {
            tree: db.open_tree(name)?,
            _document: PhantomData,
        })
    }

    pub fn tree(&self) -> &Tree {
        &self.tree
    }

    pub fn get(&self, id: &str) -> Result<Option<T>> {
        self.tree.get(id)?.map(|bytes| decode(&bytes)).transpose()
    }

    pub fn insert(&self, document: &T) -> Result<()> {
        self.tree.insert(document.key(), encode(document)?)?;
        Ok(())
    }

    pub fn remove(&self, id: &str) -> Result<bool> {
        Ok(self.tree.remove(id)?.is_some())
    }

    pub fn all(&self) -> Result<Vec<T>> {
        self.tree.iter().values().map(|bytes| decode(&bytes?)).collect()
    }
}

pub fn encode<T: Serialize>(document: &T) -> Result<Vec<u8>> {
    Ok(serde_json::to_vec(document)?)
}

pub fn decode<T: DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    Ok(serde_json::from_slice(bytes)?)
}

/// Transactional read; a record that fails to decode aborts the transaction.
pub fn tx_get<T: DeserializeOwned>(
    tree: &TransactionalTree,
    key: &str,
) -> ConflictableTransactionResult<Option<T>, AppError> {
    match tree.get(key)? {
        Some(bytes) => match decode(&bytes) {
            Ok(document) => Ok(Some(document)),
            Err(err) => abort(err),
        },
        None => Ok(None),
    }
}

pub fn tx_put<T: Serialize>(
    tree: &TransactionalTree,
    key: &str,
    document: &T,
) -> ConflictableTransactionResult<(), AppError> {
    match encode(document) {
        Ok(bytes) => {
            tree.insert(key, bytes)?;
            Ok(())
        }
        Err(err) => abort(err),
    }
}

#[cfg(test)]
mod tests {
    use alumnet_common::{
        resources::{Job, JobId},
        UserId,
    };
    use chrono::Utc;

    use super::*;

    fn job(id: &str) -> Job {
        let now = Utc::now();
        Job {
            id: JobId(id.to_string()),
            user: UserId("owner".to_string()),
            title: "Engineer".to_string(),
            description: "Builds things".to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn insert_get_remove() -> Result<()> {
        let db = sled::Config::new().temporary(true).open()?;
        let jobs: Collection<Job> = Collection::open(&db, "jobs")?;

        jobs.insert(&job("a"))?;
        jobs.insert(&job("b"))?;
        assert_eq!(jobs.get("a")?.map(|j| j.company), Some("Acme".to_string()));
        assert_eq!(jobs.all()?.len(), 2);

        assert!(jobs.remove("a")?);
        assert!(!jobs.remove("a")?);
        assert!(jobs.get("a")?.is_none());
        Ok(())
    }

    #[test]
    fn corrupt_record_is_reported() -> Result<()> {
        let db = sled::Config::new().temporary(true).open()?;
        let jobs: Collection<Job> = Collection::open(&db, "jobs")?;
        jobs.tree().insert("broken", b"not json".to_vec())?;

        assert!(matches!(jobs.get("broken"), Err(AppError::Corrupt(_))));
        Ok(())
    }
}
