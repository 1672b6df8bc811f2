use std::collections::{HashMap, VecDeque};

use anyhow::Result;
use tracing::{debug, info};

use crate::canonical::{Canonicalizer, Probe, ResolveRedirect};
use crate::vault::model::{DeletedItem, UriEntry, VaultExport, VaultItem};
use crate::vault::store::Checkpoint;

pub mod identity;

pub use identity::identity_key;

/// Result of a dedup run.
#[derive(Debug)]
pub struct DedupOutcome {
    /// The surviving export, normalized URIs in place
    pub export: VaultExport,

    /// Deleted duplicates, in deletion order
    pub deleted: Vec<DeletedItem>,

    /// Number of items visited
    pub processed: usize,
}

enum Visited {
    Kept(VaultItem),
    Deleted(DeletedItem),
}

/// Drives the per-item normalize-then-dedup loop.
///
/// Owns the running duplicates map as instance state, so independent
/// engines never observe each other. Items are visited exactly once in
/// original order; the kept and deleted sequences are built separately
/// instead of removing from the live list mid-iteration.
#[derive(Debug)]
pub struct DedupEngine<P: Probe, R: ResolveRedirect> {
    canonicalizer: Canonicalizer<P, R>,
    duplicates: HashMap<String, String>,
}

impl<P: Probe, R: ResolveRedirect> DedupEngine<P, R> {
    /// Creates an engine over the given canonicalizer
    pub fn new(canonicalizer: Canonicalizer<P, R>) -> Self {
        Self {
            canonicalizer,
            duplicates: HashMap::new(),
        }
    }

    /// Processes every item once, in original order.
    ///
    /// Items without a usable login pass through untouched. The first
    /// item per identity key survives; later ones move to the deleted
    /// sequence with a reason naming the survivor. When a checkpoint is
    /// supplied, the running kept-plus-pending snapshot and the deleted
    /// sequence are written after each item; checkpoint failure aborts
    /// the run.
    ///
    /// # Arguments
    /// * `export` - The loaded vault export
    /// * `checkpoint` - Optional per-item persistence hook
    ///
    /// # Returns
    /// * `Result<DedupOutcome>` - Surviving export, deleted records, and
    ///   the visit count
    pub async fn run(
        &mut self,
        export: VaultExport,
        checkpoint: Option<&dyn Checkpoint>,
    ) -> Result<DedupOutcome> {
        let VaultExport { items, extra } = export;
        let total = items.len();
        let mut pending: VecDeque<VaultItem> = items.into();
        let mut kept: Vec<VaultItem> = Vec::with_capacity(total);
        let mut deleted: Vec<DeletedItem> = Vec::new();
        let mut processed = 0usize;

        while let Some(item) = pending.pop_front() {
            processed += 1;
            info!("Processing item ({}/{}): {}", processed, total, item.name);

            match self.visit(item).await {
                Visited::Kept(item) => kept.push(item),
                Visited::Deleted(record) => {
                    info!("Removing item: {} ({})", record.item.name, record.reason);
                    deleted.push(record);
                }
            }

            if let Some(checkpoint) = checkpoint {
                let snapshot = VaultExport {
                    items: kept.iter().chain(pending.iter()).cloned().collect(),
                    extra: extra.clone(),
                };
                checkpoint.save(&snapshot, &deleted)?;
            }
        }

        info!(
            "Processed {} items, deleted {} duplicates",
            processed,
            deleted.len()
        );

        Ok(DedupOutcome {
            export: VaultExport { items: kept, extra },
            deleted,
            processed,
        })
    }

    async fn visit(&mut self, mut item: VaultItem) -> Visited {
        let Some(login) = item.login.as_ref() else {
            debug!("Skipping item as it does not have a login record");
            return Visited::Kept(item);
        };
        let (Some(username), Some(password), Some(uris)) = (
            login.username.clone(),
            login.password.clone(),
            login.uris.clone(),
        ) else {
            debug!("Skipping item as it has missing login data");
            return Visited::Kept(item);
        };

        let mut corrected: Vec<UriEntry> = Vec::new();
        let mut tokens: Vec<String> = Vec::new();
        for entry in &uris {
            // Null entries are dropped silently, never propagated.
            let Some(raw) = entry.uri.as_deref() else {
                continue;
            };
            if let Some(canonical) = self.canonicalizer.get_valid_url(raw).await {
                tokens.push(canonical.host_token);
                corrected.push(UriEntry::new(canonical.url));
            }
        }

        // "No valid URL could be derived" is exempt from deletion: the
        // item keeps its original uris field and contributes no key.
        if corrected.is_empty() {
            info!("Item {} has no valid URIs, but will not be deleted", item.name);
            return Visited::Kept(item);
        }

        let key = identity_key(&username, &password, &tokens);
        if let Some(first_seen) = self.duplicates.get(&key) {
            // The deletion snapshot keeps the pre-normalization fields.
            return Visited::Deleted(DeletedItem {
                reason: format!("Duplicate of {}", first_seen),
                item,
            });
        }

        self.duplicates.insert(key, item.name.clone());
        if let Some(login) = item.login.as_mut() {
            login.uris = Some(corrected);
        }
        Visited::Kept(item)
    }
}
