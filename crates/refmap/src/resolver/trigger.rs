//! Trigger resolution.
//!
//! Trigger keys are textual: description, expression and recovery
//! expression exactly as authored in the document. The store holds
//! expressions in resolved form referencing item identifiers, so every
//! candidate row is canonicalized through the injected expression
//! transform and admitted only on an exact three-field match. The
//! select is batched by description with a fixed discovery-flag
//! filter; two triggers sharing a description never collide unless
//! their canonical expressions match too.

use super::Referencer;
use crate::{
    error::ResolveError,
    id::RefId,
    key::TriggerKey,
    kind::RefKind,
    obs::sink::{self, MetricsEvent},
    store::{DiscoveryFlag, ExpressionResolver, ReferenceStore, TriggerFilter},
};
use log::debug;

impl<S: ReferenceStore, X: ExpressionResolver> Referencer<S, X> {
    /// Queue trigger keys for the next batched select.
    pub fn add_triggers<I, T>(&mut self, keys: I)
    where
        I: IntoIterator<Item = T>,
        T: Into<TriggerKey>,
    {
        self.triggers.add(keys.into_iter().map(Into::into));
    }

    /// Associate a textual trigger key with a known identifier.
    pub fn add_trigger_ref(&mut self, key: impl Into<TriggerKey>, id: RefId) {
        sink::record(MetricsEvent::Seed {
            kind: RefKind::Trigger,
        });
        self.triggers.seed(key.into(), id);
    }

    /// Resolve a textual trigger key; `Ok(None)` is resolved-as-not-found.
    pub fn resolve_trigger(&mut self, key: &TriggerKey) -> Result<Option<RefId>, ResolveError> {
        if let Some(id) = self.triggers.seeded(key) {
            return Ok(Some(id));
        }

        if self.triggers.needs_select() {
            self.select_triggers()?;
        }

        Ok(self.triggers.lookup(key))
    }

    /// Discard resolved trigger references so the next resolve re-reads
    /// the store.
    pub fn invalidate_triggers(&mut self) {
        sink::record(MetricsEvent::Invalidate {
            kind: RefKind::Trigger,
        });
        self.triggers.invalidate();
    }

    fn select_triggers(&mut self) -> Result<(), ResolveError> {
        let pending = self.triggers.take_pending();
        if pending.is_empty() {
            self.triggers.mark_loaded();
            return Ok(());
        }

        let filter = TriggerFilter {
            descriptions: pending.iter().map(|key| key.description.clone()).collect(),
            flags: DiscoveryFlag::IMPORTABLE.to_vec(),
        };

        debug!(
            "selecting triggers for {} description(s)",
            filter.descriptions.len()
        );

        let rows = match self.store.select_triggers(&filter) {
            Ok(rows) => rows,
            Err(err) => {
                self.triggers.restore_pending(pending);
                return Err(ResolveError::new(RefKind::Trigger, err));
            }
        };

        sink::record(MetricsEvent::Select {
            kind: RefKind::Trigger,
            rows: rows.len() as u64,
        });

        // Canonicalize stored expressions; admit only exact matches
        // against a pending key.
        let mut resolved = Vec::new();
        for row in rows {
            let key = TriggerKey {
                description: row.description,
                expression: self.expressions.canonical_expression(&row.expression),
                recovery_expression: self
                    .expressions
                    .canonical_expression(&row.recovery_expression),
            };

            if pending.contains(&key) {
                resolved.push((key, row.id));
            }
        }

        self.triggers.load(resolved);
        self.triggers.mark_loaded();

        Ok(())
    }
}
