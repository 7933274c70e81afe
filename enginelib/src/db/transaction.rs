use std::rc::Rc;

use super::storage::Storage;
use crate::Result;

/// A nested transaction scope backed by a SQLite savepoint.
///
/// Savepoint names are allocated from a monotonic counter on the owning
/// storage handle, so scopes nest freely. [`commit`](Self::commit)
/// releases the savepoint; dropping the scope without committing rolls
/// back to it. Rolling back an outer scope rolls back all inner scopes,
/// committed or not.
pub struct TransactionScope {
    storage: Rc<Storage>,
    savepoint: i64,
    committed: bool,
}

impl TransactionScope {
    pub(crate) fn begin(storage: Rc<Storage>) -> Result<Self> {
        let savepoint = storage.next_savepoint();
        storage
            .conn
            .execute_batch(&format!("SAVEPOINT s{savepoint}"))?;
        Ok(TransactionScope {
            storage,
            savepoint,
            committed: false,
        })
    }

    /// Releases the savepoint, making the scope's writes part of the
    /// enclosing transaction (or durable, when there is none). Consumes
    /// the scope, so it cannot be committed twice.
    pub fn commit(mut self) -> Result<()> {
        self.storage
            .conn
            .execute_batch(&format!("RELEASE s{}", self.savepoint))?;
        self.committed = true;
        Ok(())
    }
}

impl Drop for TransactionScope {
    fn drop(&mut self) {
        if self.committed {
            return;
        }
        // The rollback may fail if SQLite already rolled back
        // automatically, e.g. after an error response. No harm is caused,
        // so the error is swallowed.
        if let Err(e) = self
            .storage
            .conn
            .execute_batch(&format!("ROLLBACK TO s{}", self.savepoint))
        {
            log::warn!("rollback to savepoint s{} failed: {e}", self.savepoint);
        }
    }
}
