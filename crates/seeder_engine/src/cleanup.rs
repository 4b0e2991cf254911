use seeder_core::CleanupCounts;
use seeder_logging::{seeder_error, seeder_info};

use crate::{CollectionStore, Deduplicator, TypeClassifier, Validator};

/// Runs the validator sweep and then the deduplicator sweep.
///
/// Type checking goes first so fingerprints are only computed for items that
/// stay. A sweep that cannot enumerate the store counts as removing nothing.
/// The caller must guarantee nothing writes to the store meanwhile.
pub fn sanitize_collection(
    store: &CollectionStore,
    classifier: &dyn TypeClassifier,
    target: &str,
) -> CleanupCounts {
    let removed_by_type = Validator::new(store, classifier, target)
        .sweep()
        .unwrap_or_else(|err| {
            seeder_error!("type sweep failed: {}", err);
            0
        });
    let removed_as_duplicate = Deduplicator::new(store).sweep().unwrap_or_else(|err| {
        seeder_error!("duplicate sweep failed: {}", err);
        0
    });
    let remaining = store.len().unwrap_or_else(|err| {
        seeder_error!("cannot count remaining items: {}", err);
        0
    });

    seeder_info!(
        "cleanup done: {} wrong type, {} duplicates, {} remaining",
        removed_by_type,
        removed_as_duplicate,
        remaining
    );
    CleanupCounts {
        removed_by_type,
        removed_as_duplicate,
        remaining,
    }
}
