/// Lazy revision resolver.
///
/// # Architecture
///
/// - `TrackingGuard`: saves the document's track-changes flag, turns tracking
///   off, and puts the saved value back when dropped
/// - `Resolver`: iterator that resolves one revision per step and yields the
///   running count of processed revisions
///
/// The resolver always addresses the live revision list through a cursor.
/// Accepting or rejecting a revision removes it, so the cursor stays put and
/// the next revision slides under it; revisions left in place move the
/// cursor forward.
///
/// # Example
///
/// ```rust
/// use markrev::revision::{resolve, MemoryDocument, ResolutionPolicy, WdRevisionType};
///
/// let mut doc = MemoryDocument::new()
///     .with_revision(WdRevisionType::Insert, "Alice", "new words")
///     .with_revision(WdRevisionType::Delete, "Bob", "old words");
///
/// let policy = ResolutionPolicy::default();
/// let progress: Vec<usize> = resolve(&mut doc, &policy)?.collect::<Result<_, _>>()?;
/// assert_eq!(progress, vec![1, 2]);
/// assert!(doc.pending().is_empty());
/// # Ok::<(), markrev::Error>(())
/// ```
use super::diagnostic::{Diagnostic, DiagnosticSink, StderrSink};
use super::policy::{Action, ResolutionPolicy, plan};
use super::session::DocumentSession;
use crate::common::error::Result;
use std::iter::FusedIterator;

/// Scoped ownership of a session's track-changes flag.
///
/// Creating the guard reads the flag and disables tracking, so accepting or
/// rejecting revisions is not itself recorded as a new revision. Dropping the
/// guard restores the saved value on every exit path, including early drops
/// and unwinding.
///
/// Restoring during a panic needs unwinding; release builds of this crate set
/// `panic = "abort"`, where a panic ends the process without running `Drop`.
pub struct TrackingGuard<'a, S: DocumentSession + ?Sized> {
    session: &'a mut S,
    saved: bool,
    restored: bool,
}

impl<'a, S: DocumentSession + ?Sized> TrackingGuard<'a, S> {
    /// Save the current flag and turn tracking off.
    pub fn acquire(session: &'a mut S) -> Result<Self> {
        let saved = session.track_revisions()?;
        let guard = Self {
            session,
            saved,
            restored: false,
        };
        // On failure the guard is dropped here and puts the flag back
        guard.session.set_track_revisions(false)?;
        tracing::debug!(saved, "track revisions disabled");
        Ok(guard)
    }

    /// The value the flag had when the guard was acquired.
    #[inline]
    pub fn saved(&self) -> bool {
        self.saved
    }

    /// The guarded session.
    #[inline]
    pub fn session(&self) -> &S {
        self.session
    }

    /// The guarded session, mutably.
    #[inline]
    pub fn session_mut(&mut self) -> &mut S {
        self.session
    }

    /// Restore the saved flag now, reporting any failure.
    ///
    /// Only the first call touches the session.
    pub fn restore(&mut self) -> Result<()> {
        if self.restored {
            return Ok(());
        }
        self.restored = true;
        self.session.set_track_revisions(self.saved)?;
        tracing::debug!(saved = self.saved, "track revisions restored");
        Ok(())
    }
}

impl<S: DocumentSession + ?Sized> Drop for TrackingGuard<'_, S> {
    fn drop(&mut self) {
        if let Err(e) = self.restore() {
            tracing::warn!(error = %e, "failed to restore track revisions");
        }
    }
}

/// Start resolving `session`'s revisions under `policy`, reporting
/// diagnostics on standard error.
///
/// Tracking is disabled before this returns; iterate the resolver to do the
/// work. Each item is the 1-based count of revisions processed so far.
pub fn resolve<'a, S>(
    session: &'a mut S,
    policy: &ResolutionPolicy,
) -> Result<Resolver<'a, S, StderrSink>>
where
    S: DocumentSession + ?Sized,
{
    Resolver::with_sink(session, policy, StderrSink)
}

/// Iterator resolving one revision per step.
///
/// Host failures come out as an `Err` item, after which the iterator is
/// exhausted.
pub struct Resolver<'a, S: DocumentSession + ?Sized, D: DiagnosticSink = StderrSink> {
    guard: TrackingGuard<'a, S>,
    policy: ResolutionPolicy,
    sink: D,
    /// 1-based live index of the next revision
    cursor: usize,
    processed: usize,
    total: usize,
    /// Records removed together with an earlier one, not yet counted
    consumed: usize,
    done: bool,
}

impl<'a, S, D> Resolver<'a, S, D>
where
    S: DocumentSession + ?Sized,
    D: DiagnosticSink,
{
    /// Start resolving with a custom diagnostic sink.
    pub fn with_sink(session: &'a mut S, policy: &ResolutionPolicy, sink: D) -> Result<Self> {
        let total = session.revision_count()?;
        let guard = TrackingGuard::acquire(session)?;
        Ok(Self {
            guard,
            policy: policy.clone(),
            sink,
            cursor: 1,
            processed: 0,
            total,
            consumed: 0,
            done: false,
        })
    }

    /// Number of revisions pending when resolution started.
    #[inline]
    pub fn total(&self) -> usize {
        self.total
    }

    /// Number of revisions processed so far.
    #[inline]
    pub fn processed(&self) -> usize {
        self.processed
    }

    /// The diagnostic sink.
    #[inline]
    pub fn sink(&self) -> &D {
        &self.sink
    }

    /// Stop resolving and restore the track-changes flag, reporting a
    /// restore failure instead of only logging it.
    ///
    /// Returns the diagnostic sink.
    pub fn finish(mut self) -> Result<D>
    where
        D: Default,
    {
        self.done = true;
        self.guard.restore()?;
        Ok(std::mem::take(&mut self.sink))
    }

    /// Resolve everything that is left and return the number of revisions
    /// processed.
    pub fn run(mut self) -> Result<usize> {
        for step in self.by_ref() {
            step?;
        }
        Ok(self.processed)
    }

    fn step(&mut self) -> Result<Option<usize>> {
        if self.processed >= self.total {
            return Ok(None);
        }

        // Records that left the list with an earlier resolution, such as the
        // changes inside a deleted table row, still count as processed
        if self.consumed > 0 {
            self.consumed -= 1;
            return Ok(Some(self.count_consumed()));
        }

        let session = self.guard.session_mut();
        let count = session.revision_count()?;
        if self.cursor > count {
            return Ok(Some(self.count_consumed()));
        }

        let cursor = self.cursor;
        let record = session.revision(cursor)?;
        let action = plan(record.kind(), record.author(), &self.policy);
        let position = self.processed + 1;

        match action {
            Action::Skip => {},
            Action::Accept => {
                session.accept(cursor)?;
            },
            Action::ColorAndAccept(color) => {
                session.set_font_color(cursor, color)?;
                session.accept(cursor)?;
            },
            Action::StrikeAndReject(color) => {
                session.set_font_color(cursor, color)?;
                session.set_strikethrough(cursor, true)?;
                session.reject(cursor)?;
            },
            Action::Unhandled(kind) => {
                self.sink.report(Diagnostic::Unhandled { position, kind });
            },
            Action::Unexpected(raw) => {
                self.sink.report(Diagnostic::Unexpected { position, raw });
            },
        }
        tracing::debug!(position, cursor, kind = %record.kind(), author = record.author(), ?action, "revision processed");

        // A resolved revision leaves the list and the next one takes its place
        let advance = if action.mutates() {
            let remaining = session.revision_count()?;
            self.consumed += count.saturating_sub(remaining).saturating_sub(1);
            remaining >= count
        } else {
            true
        };
        if advance {
            self.cursor += 1;
        }

        self.processed = position;
        Ok(Some(position))
    }
}

impl<S, D> Resolver<'_, S, D>
where
    S: DocumentSession + ?Sized,
    D: DiagnosticSink,
{
    fn count_consumed(&mut self) -> usize {
        self.processed += 1;
        tracing::debug!(position = self.processed, "revision removed with an earlier one");
        self.processed
    }
}

impl<S, D> Iterator for Resolver<'_, S, D>
where
    S: DocumentSession + ?Sized,
    D: DiagnosticSink,
{
    type Item = Result<usize>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        match self.step() {
            Ok(Some(position)) => Some(Ok(position)),
            Ok(None) => {
                self.done = true;
                self.guard.restore().err().map(Err)
            },
            Err(e) => {
                self.done = true;
                Some(Err(e))
            },
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        if self.done {
            (0, Some(0))
        } else {
            // One extra slot for a restore failure at the end
            (0, Some(self.total - self.processed + 1))
        }
    }
}

impl<S, D> FusedIterator for Resolver<'_, S, D>
where
    S: DocumentSession + ?Sized,
    D: DiagnosticSink,
{
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::error::Error;
    use crate::revision::color::WdColorIndex;
    use crate::revision::kind::{RevisionKind, WdRevisionType};
    use crate::revision::memory::{MemoryDocument, Resolution};
    use crate::revision::session::RevisionRecord;
    use proptest::prelude::*;

    fn scenario_document() -> MemoryDocument {
        MemoryDocument::new()
            .with_track_revisions(true)
            .with_revision(WdRevisionType::Insert, "Bob", "one")
            .with_revision(WdRevisionType::Delete, "Bob", "two")
            .with_revision(WdRevisionType::Insert, "Bob", "three")
            .with_revision(WdRevisionType::Style, "Bob", "")
            .with_revision(WdRevisionType::Delete, "Bob", "four")
            .with_revision(WdRevisionType::Insert, "Bob", "five")
    }

    fn run_collecting(
        doc: &mut MemoryDocument,
        policy: &ResolutionPolicy,
    ) -> (Vec<usize>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let progress = Resolver::with_sink(doc, policy, &mut diagnostics)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();
        (progress, diagnostics)
    }

    #[test]
    fn test_mixed_document_accepting_deletions() {
        let mut doc = scenario_document();
        let (progress, diagnostics) = run_collecting(&mut doc, &ResolutionPolicy::default());

        assert_eq!(progress, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(doc.resolved().len(), 5);
        assert!(
            doc.resolved()
                .iter()
                .all(|r| r.resolution() == Some(Resolution::Accepted))
        );
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].to_string(), "Unhandled revision: Style");
        assert_eq!(diagnostics[0].position(), 4);

        // Only the style change is left pending
        assert_eq!(doc.pending().len(), 1);
        assert_eq!(
            doc.pending()[0].kind(),
            RevisionKind::Known(WdRevisionType::Style)
        );
        assert!(doc.track_revisions().unwrap());
    }

    #[test]
    fn test_insertions_are_colored_before_acceptance() {
        let mut doc = scenario_document();
        run_collecting(&mut doc, &ResolutionPolicy::default());

        for resolved in doc.resolved() {
            match resolved.kind() {
                RevisionKind::Known(WdRevisionType::Insert) => {
                    assert_eq!(resolved.color(), Some(WdColorIndex::Blue));
                    assert!(!resolved.strikethrough());
                },
                _ => assert_eq!(resolved.color(), None),
            }
        }
    }

    #[test]
    fn test_mixed_document_striking_deletions() {
        let mut doc = scenario_document();
        let policy = ResolutionPolicy::new().with_strike_deletions(true);
        let (progress, diagnostics) = run_collecting(&mut doc, &policy);

        assert_eq!(progress, vec![1, 2, 3, 4, 5, 6]);
        assert_eq!(diagnostics.len(), 1);

        let struck: Vec<_> = doc
            .resolved()
            .into_iter()
            .filter(|r| r.resolution() == Some(Resolution::Rejected))
            .collect();
        assert_eq!(struck.len(), 2);
        for r in struck {
            assert_eq!(r.kind(), RevisionKind::Known(WdRevisionType::Delete));
            assert!(r.strikethrough());
            assert_eq!(r.color(), Some(WdColorIndex::Blue));
        }
        assert_eq!(doc.retained_text(), "onetwothreefourfive");
    }

    #[test]
    fn test_other_author_is_left_alone() {
        let mut doc = scenario_document();
        let policy = ResolutionPolicy::new().with_target_author("Alice");
        let (progress, diagnostics) = run_collecting(&mut doc, &policy);

        assert_eq!(progress, vec![1, 2, 3, 4, 5, 6]);
        assert!(diagnostics.is_empty());
        assert_eq!(doc.mutation_calls(), 0);
        assert_eq!(doc.pending().len(), 6);
    }

    #[test]
    fn test_unhandled_kinds_are_reported_once_each() {
        let mut doc = MemoryDocument::new()
            .with_revision(WdRevisionType::NoRevision, "Bob", "")
            .with_revision(WdRevisionType::CellMerge, "Bob", "")
            .with_revision(WdRevisionType::MovedTo, "Bob", "moved")
            .with_raw_revision(1234, "Bob", "");
        let (progress, diagnostics) = run_collecting(&mut doc, &ResolutionPolicy::default());

        assert_eq!(progress, vec![1, 2, 3, 4]);
        assert_eq!(doc.mutation_calls(), 0);
        let lines: Vec<String> = diagnostics.iter().map(ToString::to_string).collect();
        assert_eq!(
            lines,
            vec![
                "Unhandled revision: No Revision",
                "Unhandled revision: Cell Merge",
                "Unhandled revision: Moved To",
                "Unexpected revision type: 1234",
            ]
        );
    }

    #[test]
    fn test_second_run_is_empty() {
        let mut doc = MemoryDocument::new()
            .with_revision(WdRevisionType::Insert, "Bob", "a")
            .with_revision(WdRevisionType::Delete, "Bob", "b");
        run_collecting(&mut doc, &ResolutionPolicy::default());

        let (progress, diagnostics) = run_collecting(&mut doc, &ResolutionPolicy::default());
        assert!(progress.is_empty());
        assert!(diagnostics.is_empty());
    }

    #[test]
    fn test_tracking_disabled_during_traversal() {
        let mut doc = scenario_document();
        {
            let mut resolver = resolve(&mut doc, &ResolutionPolicy::default()).unwrap();
            assert_eq!(resolver.total(), 6);
            assert!(!resolver.guard.session().track_revisions().unwrap());
            assert_eq!(resolver.next().unwrap().unwrap(), 1);
        }
        assert!(doc.track_revisions().unwrap());
    }

    #[test]
    fn test_early_drop_restores_tracking() {
        let mut doc = scenario_document();
        {
            let resolver = resolve(&mut doc, &ResolutionPolicy::default()).unwrap();
            let first_two: Vec<_> = resolver.take(2).collect();
            assert_eq!(first_two.len(), 2);
        }
        assert!(doc.track_revisions().unwrap());
        assert_eq!(doc.resolved().len(), 2);
        assert_eq!(doc.pending().len(), 4);
    }

    #[test]
    fn test_finish_restores_and_returns_sink() {
        let mut doc = MemoryDocument::new()
            .with_track_revisions(true)
            .with_revision(WdRevisionType::Style, "Bob", "");
        let mut resolver =
            Resolver::with_sink(&mut doc, &ResolutionPolicy::default(), Vec::new()).unwrap();
        assert_eq!(resolver.next().unwrap().unwrap(), 1);

        let diagnostics = resolver.finish().unwrap();
        assert_eq!(diagnostics.len(), 1);
        assert!(doc.track_revisions().unwrap());
    }

    #[test]
    fn test_run_returns_processed_count() {
        let mut doc = scenario_document();
        let processed = Resolver::with_sink(&mut doc, &ResolutionPolicy::default(), Vec::new())
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(processed, 6);
    }

    /// Session whose accept calls fail after a number of successes.
    struct FlakyHost {
        inner: MemoryDocument,
        accepts_left: usize,
    }

    impl DocumentSession for FlakyHost {
        fn revision_count(&self) -> Result<usize> {
            self.inner.revision_count()
        }

        fn revision(&self, index: usize) -> Result<RevisionRecord> {
            self.inner.revision(index)
        }

        fn accept(&mut self, index: usize) -> Result<()> {
            if self.accepts_left == 0 {
                return Err(Error::session("host disconnected"));
            }
            self.accepts_left -= 1;
            self.inner.accept(index)
        }

        fn reject(&mut self, index: usize) -> Result<()> {
            self.inner.reject(index)
        }

        fn set_font_color(&mut self, index: usize, color: WdColorIndex) -> Result<()> {
            self.inner.set_font_color(index, color)
        }

        fn set_strikethrough(&mut self, index: usize, enabled: bool) -> Result<()> {
            self.inner.set_strikethrough(index, enabled)
        }

        fn track_revisions(&self) -> Result<bool> {
            self.inner.track_revisions()
        }

        fn set_track_revisions(&mut self, enabled: bool) -> Result<()> {
            self.inner.set_track_revisions(enabled)
        }
    }

    #[test]
    fn test_host_failure_propagates_and_restores_tracking() {
        let mut host = FlakyHost {
            inner: scenario_document(),
            accepts_left: 1,
        };
        let mut resolver = resolve(&mut host, &ResolutionPolicy::default()).unwrap();

        assert_eq!(resolver.next().unwrap().unwrap(), 1);
        let err = resolver.next().unwrap().unwrap_err();
        assert!(matches!(err, Error::Session(_)));
        assert!(resolver.next().is_none());
        drop(resolver);

        assert!(host.track_revisions().unwrap());
        assert_eq!(host.inner.resolved().len(), 1);
    }

    #[test]
    fn test_works_through_trait_object() {
        let mut doc = scenario_document();
        let session: &mut dyn DocumentSession = &mut doc;
        let processed = Resolver::with_sink(session, &ResolutionPolicy::default(), Vec::new())
            .unwrap()
            .run()
            .unwrap();
        assert_eq!(processed, 6);
    }

    /// Session where accepting a deletion also resolves the revision right
    /// after it, the way a deleted table row takes its cell changes along.
    struct RowHost {
        inner: MemoryDocument,
        panic_on_accept: bool,
    }

    impl DocumentSession for RowHost {
        fn revision_count(&self) -> Result<usize> {
            self.inner.revision_count()
        }

        fn revision(&self, index: usize) -> Result<RevisionRecord> {
            self.inner.revision(index)
        }

        fn accept(&mut self, index: usize) -> Result<()> {
            if self.panic_on_accept {
                panic!("host crashed");
            }
            let grouped = self.inner.revision(index)?.kind() == RevisionKind::Known(WdRevisionType::Delete);
            self.inner.accept(index)?;
            if grouped && index <= self.inner.revision_count()? {
                self.inner.accept(index)?;
            }
            Ok(())
        }

        fn reject(&mut self, index: usize) -> Result<()> {
            self.inner.reject(index)
        }

        fn set_font_color(&mut self, index: usize, color: WdColorIndex) -> Result<()> {
            self.inner.set_font_color(index, color)
        }

        fn set_strikethrough(&mut self, index: usize, enabled: bool) -> Result<()> {
            self.inner.set_strikethrough(index, enabled)
        }

        fn track_revisions(&self) -> Result<bool> {
            self.inner.track_revisions()
        }

        fn set_track_revisions(&mut self, enabled: bool) -> Result<()> {
            self.inner.set_track_revisions(enabled)
        }
    }

    #[test]
    fn test_records_removed_together_still_counted() {
        let mut host = RowHost {
            inner: MemoryDocument::new()
                .with_revision(WdRevisionType::Delete, "Bob", "row")
                .with_revision(WdRevisionType::Delete, "Bob", "cell")
                .with_revision(WdRevisionType::Style, "Bob", "")
                .with_revision(WdRevisionType::Delete, "Bob", "last row"),
            panic_on_accept: false,
        };
        let mut diagnostics = Vec::new();
        let progress = Resolver::with_sink(&mut host, &ResolutionPolicy::default(), &mut diagnostics)
            .unwrap()
            .collect::<Result<Vec<_>>>()
            .unwrap();

        assert_eq!(progress, vec![1, 2, 3, 4]);
        // The style change met third keeps its position
        assert_eq!(diagnostics.len(), 1);
        assert_eq!(diagnostics[0].position(), 3);
        assert_eq!(host.inner.pending().len(), 1);
    }

    #[test]
    fn test_panicking_host_restores_tracking() {
        let mut host = RowHost {
            inner: scenario_document(),
            panic_on_accept: true,
        };
        let outcome = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
            resolve(&mut host, &ResolutionPolicy::default())
                .and_then(|resolver| resolver.run())
        }));

        assert!(outcome.is_err());
        assert!(host.track_revisions().unwrap());
    }

    fn arb_document() -> impl Strategy<Value = (MemoryDocument, bool)> {
        let entry = (0i32..25, prop::bool::ANY);
        (prop::collection::vec(entry, 0..40), prop::bool::ANY).prop_map(|(entries, tracking)| {
            let doc = entries.into_iter().fold(
                MemoryDocument::new().with_track_revisions(tracking),
                |doc, (raw, by_alice)| {
                    let author = if by_alice { "Alice" } else { "Bob" };
                    doc.with_raw_revision(raw, author, "x")
                },
            );
            (doc, tracking)
        })
    }

    proptest! {
        #[test]
        fn prop_progress_counts_every_record((mut doc, tracking) in arb_document(), strike in prop::bool::ANY, only_alice in prop::bool::ANY) {
            let mut policy = ResolutionPolicy::new().with_strike_deletions(strike);
            if only_alice {
                policy = policy.with_target_author("Alice");
            }
            let initial: Vec<RevisionRecord> = doc.revisions().unwrap();
            let expected_resolved = initial
                .iter()
                .filter(|r| plan(r.kind(), r.author(), &policy).mutates())
                .count();
            let expected_diagnostics = initial
                .iter()
                .filter(|r| matches!(
                    plan(r.kind(), r.author(), &policy),
                    Action::Unhandled(_) | Action::Unexpected(_)
                ))
                .count();

            let (progress, diagnostics) = run_collecting(&mut doc, &policy);

            prop_assert_eq!(progress, (1..=initial.len()).collect::<Vec<_>>());
            prop_assert_eq!(doc.resolved().len(), expected_resolved);
            prop_assert_eq!(diagnostics.len(), expected_diagnostics);
            prop_assert_eq!(doc.pending().len(), initial.len() - expected_resolved);
            prop_assert_eq!(doc.track_revisions().unwrap(), tracking);
        }

        #[test]
        fn prop_tracking_restored_after_partial_run((mut doc, tracking) in arb_document(), steps in 0usize..10) {
            {
                let resolver = Resolver::with_sink(&mut doc, &ResolutionPolicy::default(), Vec::new()).unwrap();
                for step in resolver.take(steps) {
                    prop_assert!(step.is_ok());
                }
            }
            prop_assert_eq!(doc.track_revisions().unwrap(), tracking);
        }
    }
}
