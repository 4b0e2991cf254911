use std::collections::HashSet;
use std::io::{self, Read};

use seeder_logging::{seeder_debug, seeder_warn};
use sha2::{Digest, Sha256};

use crate::{CollectionStore, StoreError};

pub type Fingerprint = [u8; 32];

/// SHA-256 of everything `reader` yields.
pub fn fingerprint(mut reader: impl Read) -> io::Result<Fingerprint> {
    let mut hasher = Sha256::new();
    io::copy(&mut reader, &mut hasher)?;
    Ok(hasher.finalize().into())
}

/// Removes exact duplicates, keeping the first item per fingerprint in
/// enumeration order.
pub struct Deduplicator<'a> {
    store: &'a CollectionStore,
}

impl<'a> Deduplicator<'a> {
    pub fn new(store: &'a CollectionStore) -> Self {
        Self { store }
    }

    /// One pass over a snapshot of the store. Returns the number of items deleted.
    pub fn sweep(&self) -> Result<usize, StoreError> {
        let mut seen: HashSet<Fingerprint> = HashSet::new();
        let mut removed = 0;
        for name in self.store.items()? {
            let digest = match self.store.open_item(&name).and_then(fingerprint) {
                Ok(digest) => digest,
                Err(err) => {
                    seeder_warn!("cannot fingerprint {}: {}", name, err);
                    continue;
                }
            };
            if seen.insert(digest) {
                continue;
            }
            match self.store.remove(&name) {
                Ok(()) => {
                    seeder_debug!("removed duplicate {}", name);
                    removed += 1;
                }
                Err(err) if err.kind() == io::ErrorKind::NotFound => {}
                Err(err) => seeder_warn!("cannot remove {}: {}", name, err),
            }
        }
        Ok(removed)
    }
}
