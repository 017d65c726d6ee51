//! Load strategy dispatch
//!
//! Maps a declared [`LoadStrategy`] onto the backend's operation contract:
//!
//! ```text
//! CleanInsert: delete_all(), then insert(d) per dataset in order
//! Insert:      insert(d) per dataset in order
//! DeleteAll:   delete_all() once; dataset contents ignored
//! Refresh:     insert_not_present(d) per dataset in order
//! ```
//!
//! Dataset order is resolution order: globally resolved locations first,
//! then appended selective overrides.

use seedbed_core::{DatabaseOperation, LoadStrategy, SeedbedError, SeedbedResult};
use tracing::debug;

/// Executes a load strategy against one backend
pub struct LoadStrategyExecutor;

impl LoadStrategyExecutor {
    /// Apply `strategy` with the given dataset contents
    ///
    /// # Errors
    ///
    /// `Refresh` with zero datasets is a [`SeedbedError::NoDatasetProvided`]
    /// configuration error; backend failures propagate as-is, aborting the
    /// remaining datasets.
    pub fn execute<Op>(
        strategy: LoadStrategy,
        datasets: &[Vec<u8>],
        op: &Op,
    ) -> SeedbedResult<()>
    where
        Op: DatabaseOperation + ?Sized,
    {
        debug!(%strategy, datasets = datasets.len(), "applying load strategy");
        match strategy {
            LoadStrategy::CleanInsert => {
                op.delete_all()?;
                for dataset in datasets {
                    op.insert(dataset)?;
                }
            }
            LoadStrategy::Insert => {
                for dataset in datasets {
                    op.insert(dataset)?;
                }
            }
            LoadStrategy::DeleteAll => {
                op.delete_all()?;
            }
            LoadStrategy::Refresh => {
                if datasets.is_empty() {
                    return Err(SeedbedError::NoDatasetProvided { strategy });
                }
                for dataset in datasets {
                    op.insert_not_present(dataset)?;
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    /// Records the exact call sequence so ordering can be asserted.
    #[derive(Default)]
    struct ScriptedOperation {
        calls: Mutex<Vec<String>>,
    }

    impl ScriptedOperation {
        fn calls(&self) -> Vec<String> {
            self.calls.lock().clone()
        }
    }

    impl DatabaseOperation for ScriptedOperation {
        type Connection = ();

        fn insert(&self, dataset: &[u8]) -> SeedbedResult<()> {
            self.calls
                .lock()
                .push(format!("insert:{}", String::from_utf8_lossy(dataset)));
            Ok(())
        }

        fn delete_all(&self) -> SeedbedResult<()> {
            self.calls.lock().push("delete_all".to_string());
            Ok(())
        }

        fn insert_not_present(&self, dataset: &[u8]) -> SeedbedResult<()> {
            self.calls
                .lock()
                .push(format!("insert_not_present:{}", String::from_utf8_lossy(dataset)));
            Ok(())
        }

        fn database_is(
            &self,
            _expected: &[u8],
            _ignored_properties: &[String],
        ) -> SeedbedResult<()> {
            Ok(())
        }

        fn connection(&self) -> &Self::Connection {
            &()
        }
    }

    fn datasets(contents: &[&str]) -> Vec<Vec<u8>> {
        contents.iter().map(|c| c.as_bytes().to_vec()).collect()
    }

    #[test]
    fn test_clean_insert_deletes_once_then_inserts_in_order() {
        let op = ScriptedOperation::default();
        LoadStrategyExecutor::execute(LoadStrategy::CleanInsert, &datasets(&["a", "b"]), &op)
            .unwrap();
        assert_eq!(op.calls(), vec!["delete_all", "insert:a", "insert:b"]);
    }

    #[test]
    fn test_insert_keeps_existing_state() {
        let op = ScriptedOperation::default();
        LoadStrategyExecutor::execute(LoadStrategy::Insert, &datasets(&["a", "b"]), &op).unwrap();
        assert_eq!(op.calls(), vec!["insert:a", "insert:b"]);
    }

    #[test]
    fn test_delete_all_ignores_dataset_contents() {
        let op = ScriptedOperation::default();
        LoadStrategyExecutor::execute(LoadStrategy::DeleteAll, &datasets(&["a", "b"]), &op)
            .unwrap();
        assert_eq!(op.calls(), vec!["delete_all"]);
    }

    #[test]
    fn test_refresh_uses_conditional_inserts() {
        let op = ScriptedOperation::default();
        LoadStrategyExecutor::execute(LoadStrategy::Refresh, &datasets(&["a"]), &op).unwrap();
        assert_eq!(op.calls(), vec!["insert_not_present:a"]);
    }

    #[test]
    fn test_refresh_without_datasets_fails() {
        let op = ScriptedOperation::default();
        let err =
            LoadStrategyExecutor::execute(LoadStrategy::Refresh, &[], &op).unwrap_err();
        assert!(matches!(
            err,
            SeedbedError::NoDatasetProvided {
                strategy: LoadStrategy::Refresh
            }
        ));
        assert!(op.calls().is_empty());
    }

    #[test]
    fn test_clean_insert_without_datasets_only_deletes() {
        let op = ScriptedOperation::default();
        LoadStrategyExecutor::execute(LoadStrategy::CleanInsert, &[], &op).unwrap();
        assert_eq!(op.calls(), vec!["delete_all"]);
    }

    #[test]
    fn test_backend_failure_aborts_remaining_datasets() {
        struct FailingSecondInsert {
            inserts: Mutex<usize>,
        }

        impl DatabaseOperation for FailingSecondInsert {
            type Connection = ();

            fn insert(&self, _dataset: &[u8]) -> SeedbedResult<()> {
                let mut inserts = self.inserts.lock();
                *inserts += 1;
                if *inserts == 2 {
                    Err(SeedbedError::backend("write rejected"))
                } else {
                    Ok(())
                }
            }
            fn delete_all(&self) -> SeedbedResult<()> {
                Ok(())
            }
            fn insert_not_present(&self, _dataset: &[u8]) -> SeedbedResult<()> {
                Ok(())
            }
            fn database_is(&self, _: &[u8], _: &[String]) -> SeedbedResult<()> {
                Ok(())
            }
            fn connection(&self) -> &Self::Connection {
                &()
            }
        }

        let op = FailingSecondInsert {
            inserts: Mutex::new(0),
        };
        let err = LoadStrategyExecutor::execute(
            LoadStrategy::Insert,
            &datasets(&["a", "b", "c"]),
            &op,
        )
        .unwrap_err();
        assert!(matches!(err, SeedbedError::Backend(_)));
        assert_eq!(*op.inserts.lock(), 2);
    }
}
