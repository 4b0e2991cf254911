use std::io;

use seeder_logging::{seeder_debug, seeder_warn};

use crate::{label_matches, CollectionStore, StoreError, TypeClassifier};

/// Removes stored items whose content is not of the target type.
pub struct Validator<'a> {
    store: &'a CollectionStore,
    classifier: &'a dyn TypeClassifier,
    target: &'a str,
}

impl<'a> Validator<'a> {
    pub fn new(
        store: &'a CollectionStore,
        classifier: &'a dyn TypeClassifier,
        target: &'a str,
    ) -> Self {
        Self {
            store,
            classifier,
            target,
        }
    }

    /// One pass over a snapshot of the store. Returns the number of items deleted.
    ///
    /// Items that cannot be classified or deleted are left in place.
    pub fn sweep(&self) -> Result<usize, StoreError> {
        let mut removed = 0;
        for name in self.store.items()? {
            let label = match self.classifier.classify(&self.store.path_of(&name)) {
                Ok(label) => label,
                Err(err) => {
                    seeder_warn!("cannot classify {}: {}", name, err);
                    continue;
                }
            };
            if label
                .as_deref()
                .is_some_and(|label| label_matches(label, self.target))
            {
                continue;
            }
            match self.store.remove(&name) {
                Ok(()) => {
                    seeder_debug!("removed {} (type {:?})", name, label);
                    removed += 1;
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => seeder_warn!("cannot remove {}: {}", name, err),
            }
        }
        Ok(removed)
    }
}
