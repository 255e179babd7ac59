//! Visibility observation
//!
//! Watches regions and reports a boolean "sufficiently visible" signal per region.
//! A region counts as visible once its visible fraction reaches its threshold.
//!
//! Two backends implement [`VisibilityObserver`]:
//!
//! - [`IntersectionObserver`]: the host's native intersection mechanism pushes
//!   measured fractions in via [`IntersectionObserver::deliver`]
//! - [`PollingObserver`]: samples a [`Measure`] implementation on every
//!   [`PollingObserver::poll`] (for platforms without intersection callbacks)
//!
//! Both share the same region table, so fire-once / repeatable semantics are
//! identical regardless of backend.
//!
//! # Lifetime
//!
//! `observe` returns a [`Subscription`]. Dropping it removes the region and its
//! callback, so a destroyed section can never be called back. Dropping a
//! subscription after its observer is gone is a no-op.
//!
//! ```ignore
//! let sub = observer.observe(VisibilityRegion::new(0.3, false)?, |visible| {
//!     tracing::info!(visible, "hero section");
//! });
//! // ... section unmounts
//! drop(sub);
//! ```

use std::sync::mpsc::Sender;
use std::sync::{Arc, OnceLock, Weak};

use parking_lot::Mutex;
use slotmap::{new_key_type, SlotMap};

use crate::error::{RevealError, RevealResult};
use crate::events::VisibilityChange;
use crate::geometry::Rect;

new_key_type! {
    /// Handle to an observed region
    pub struct RegionId;
}

/// Observation parameters and last reported state for one region
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct VisibilityRegion {
    threshold: f32,
    repeatable: bool,
    currently_visible: bool,
    fired: bool,
}

impl VisibilityRegion {
    /// Create a region that counts as visible once `threshold` of it is in view.
    ///
    /// `threshold` must lie in (0, 1].
    pub fn new(threshold: f32, repeatable: bool) -> RevealResult<Self> {
        if !(threshold > 0.0 && threshold <= 1.0) {
            return Err(RevealError::InvalidThreshold(threshold));
        }
        Ok(Self {
            threshold,
            repeatable,
            currently_visible: false,
            fired: false,
        })
    }

    /// Fire once, then stay silent
    pub fn once(threshold: f32) -> RevealResult<Self> {
        Self::new(threshold, false)
    }

    /// Report every entry and exit
    pub fn repeatable(threshold: f32) -> RevealResult<Self> {
        Self::new(threshold, true)
    }

    pub fn threshold(&self) -> f32 {
        self.threshold
    }

    pub fn is_repeatable(&self) -> bool {
        self.repeatable
    }

    pub fn is_currently_visible(&self) -> bool {
        self.currently_visible
    }

    /// Feed a new measurement and return the transition to report, if any.
    ///
    /// `None` means the region could not be measured and is treated as fully
    /// out of view.
    pub fn update(&mut self, fraction: Option<f32>) -> Option<bool> {
        let fraction = fraction.filter(|f| f.is_finite()).unwrap_or(0.0);
        let now_visible = fraction >= self.threshold;

        if now_visible == self.currently_visible {
            return None;
        }
        self.currently_visible = now_visible;

        if self.repeatable {
            return Some(now_visible);
        }

        // Fire-once: keep tracking, suppress everything after the first entry
        if now_visible && !self.fired {
            self.fired = true;
            Some(true)
        } else {
            None
        }
    }
}

/// Fraction of `region` that lies inside `viewport`, in [0, 1]
///
/// Zero-area regions report 0.
pub fn visible_fraction(region: Rect, viewport: Rect) -> f32 {
    let area = region.area();
    if area <= 0.0 {
        return 0.0;
    }
    region
        .intersection(&viewport)
        .map(|hit| (hit.area() / area).clamp(0.0, 1.0))
        .unwrap_or(0.0)
}

type Callback = Box<dyn FnMut(bool) + Send>;

struct Entry {
    region: VisibilityRegion,
    callback: Arc<Mutex<Callback>>,
}

type Table = Mutex<SlotMap<RegionId, Entry>>;

/// Region table shared by both observer backends
struct RegionTable {
    entries: Arc<Table>,
}

impl RegionTable {
    fn new() -> Self {
        Self {
            entries: Arc::new(Mutex::new(SlotMap::with_key())),
        }
    }

    fn insert(&self, region: VisibilityRegion, callback: Callback) -> Subscription {
        let id = self.entries.lock().insert(Entry {
            region,
            callback: Arc::new(Mutex::new(callback)),
        });
        tracing::trace!(
            ?id,
            threshold = region.threshold(),
            repeatable = region.is_repeatable(),
            "observing region"
        );
        Subscription {
            region: id,
            table: Arc::downgrade(&self.entries),
        }
    }

    fn ids(&self) -> Vec<RegionId> {
        self.entries.lock().keys().collect()
    }

    fn contains(&self, id: RegionId) -> bool {
        self.entries.lock().contains_key(id)
    }

    fn region(&self, id: RegionId) -> Option<VisibilityRegion> {
        self.entries.lock().get(id).map(|entry| entry.region)
    }

    fn len(&self) -> usize {
        self.entries.lock().len()
    }

    /// Apply measurements in order and invoke callbacks for every transition.
    ///
    /// Callbacks run after the table lock is released so they may unsubscribe.
    fn apply<I>(&self, measurements: I) -> usize
    where
        I: IntoIterator<Item = (RegionId, Option<f32>)>,
    {
        let fired: Vec<(RegionId, bool, Arc<Mutex<Callback>>)> = {
            let mut entries = self.entries.lock();
            measurements
                .into_iter()
                .filter_map(|(id, fraction)| {
                    let Some(entry) = entries.get_mut(id) else {
                        tracing::trace!(?id, "measurement for unknown region ignored");
                        return None;
                    };
                    entry
                        .region
                        .update(fraction)
                        .map(|visible| (id, visible, Arc::clone(&entry.callback)))
                })
                .collect()
        };

        let mut delivered = 0;
        for (id, visible, callback) in fired {
            // Skip regions unsubscribed by an earlier callback in this batch
            if !self.contains(id) {
                continue;
            }
            tracing::trace!(?id, visible, "visibility changed");
            let mut on_change = callback.lock();
            (on_change.as_mut())(visible);
            delivered += 1;
        }
        delivered
    }
}

/// Scoped registration of one region
///
/// Dropping the subscription stops observation and releases the callback.
#[derive(Debug)]
#[must_use = "dropping a Subscription immediately stops observation"]
pub struct Subscription {
    region: RegionId,
    table: Weak<Table>,
}

impl Subscription {
    /// The id assigned to the observed region
    pub fn region(&self) -> RegionId {
        self.region
    }

    /// Whether the owning observer is still alive and tracking this region
    pub fn is_active(&self) -> bool {
        self.table
            .upgrade()
            .map(|table| table.lock().contains_key(self.region))
            .unwrap_or(false)
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(table) = self.table.upgrade() {
            if table.lock().remove(self.region).is_some() {
                tracing::trace!(id = ?self.region, "region unsubscribed");
            }
        }
    }
}

/// Capability to observe region visibility
///
/// Implemented by [`IntersectionObserver`] and [`PollingObserver`].
pub trait VisibilityObserver {
    /// Start observing `region`, calling `on_change` on every reported transition
    fn observe<F>(&mut self, region: VisibilityRegion, on_change: F) -> Subscription
    where
        F: FnMut(bool) + Send + 'static;

    /// Observe `region` and forward every transition as a [`VisibilityChange`]
    ///
    /// Messages sent after the receiver is gone are dropped silently.
    fn observe_changes(
        &mut self,
        region: VisibilityRegion,
        sink: Sender<VisibilityChange>,
    ) -> Subscription {
        let id = Arc::new(OnceLock::new());
        let assigned = Arc::clone(&id);
        let subscription = self.observe(region, move |visible| {
            if let Some(region) = assigned.get() {
                let _ = sink.send(VisibilityChange::new(*region, visible));
            }
        });
        let _ = id.set(subscription.region());
        subscription
    }

    /// Stop observing. Equivalent to dropping the subscription.
    fn unsubscribe(&mut self, subscription: Subscription) {
        drop(subscription);
    }

    /// Last known state of an observed region
    fn region(&self, id: RegionId) -> Option<VisibilityRegion>;

    /// Number of regions currently observed
    fn observed_count(&self) -> usize;
}

// =============================================================================
// Native intersection backend
// =============================================================================

/// Observer fed by the host's intersection-detection mechanism
pub struct IntersectionObserver {
    table: RegionTable,
}

impl IntersectionObserver {
    pub fn new() -> Self {
        Self {
            table: RegionTable::new(),
        }
    }

    /// Deliver one intersection record
    ///
    /// `None` means the region is detached from layout and cannot be measured.
    /// Records for unknown or unsubscribed regions are ignored.
    pub fn deliver(&self, region: RegionId, fraction: Option<f32>) {
        self.table.apply([(region, fraction)]);
    }

    /// Deliver records in detection order, returning how many transitions fired
    pub fn deliver_batch<I>(&self, records: I) -> usize
    where
        I: IntoIterator<Item = (RegionId, Option<f32>)>,
    {
        self.table.apply(records)
    }
}

impl Default for IntersectionObserver {
    fn default() -> Self {
        Self::new()
    }
}

impl VisibilityObserver for IntersectionObserver {
    fn observe<F>(&mut self, region: VisibilityRegion, on_change: F) -> Subscription
    where
        F: FnMut(bool) + Send + 'static,
    {
        self.table.insert(region, Box::new(on_change))
    }

    fn region(&self, id: RegionId) -> Option<VisibilityRegion> {
        self.table.region(id)
    }

    fn observed_count(&self) -> usize {
        self.table.len()
    }
}

// =============================================================================
// Manual polling backend
// =============================================================================

/// Source of visible fractions for the polling backend
pub trait Measure {
    /// Visible fraction of `region` in [0, 1]
    ///
    /// Return [`RevealError::ObservationUnavailable`] when the region is not laid out.
    fn visible_fraction(&self, region: RegionId) -> RevealResult<f32>;
}

/// Observer that samples a [`Measure`] each time the host calls [`poll`](Self::poll)
pub struct PollingObserver<M: Measure> {
    table: RegionTable,
    measure: M,
}

impl<M: Measure> PollingObserver<M> {
    pub fn new(measure: M) -> Self {
        Self {
            table: RegionTable::new(),
            measure,
        }
    }

    pub fn measure(&self) -> &M {
        &self.measure
    }

    pub fn measure_mut(&mut self) -> &mut M {
        &mut self.measure
    }

    /// Sample every observed region once, returning how many transitions fired
    pub fn poll(&self) -> usize {
        let measurements: Vec<(RegionId, Option<f32>)> = self
            .table
            .ids()
            .into_iter()
            .map(|id| match self.measure.visible_fraction(id) {
                Ok(fraction) => (id, Some(fraction)),
                Err(err) => {
                    tracing::trace!(?id, %err, "treating unmeasurable region as hidden");
                    (id, None)
                }
            })
            .collect();
        self.table.apply(measurements)
    }
}

impl<M: Measure> VisibilityObserver for PollingObserver<M> {
    fn observe<F>(&mut self, region: VisibilityRegion, on_change: F) -> Subscription
    where
        F: FnMut(bool) + Send + 'static,
    {
        self.table.insert(region, Box::new(on_change))
    }

    fn region(&self, id: RegionId) -> Option<VisibilityRegion> {
        self.table.region(id)
    }

    fn observed_count(&self) -> usize {
        self.table.len()
    }
}

/// [`Measure`] backed by layout rects and a viewport
///
/// Regions without recorded bounds are unmeasurable.
#[derive(Debug, Default)]
pub struct RectMeasure {
    viewport: Rect,
    bounds: slotmap::SecondaryMap<RegionId, Rect>,
}

impl RectMeasure {
    pub fn new(viewport: Rect) -> Self {
        Self {
            viewport,
            bounds: slotmap::SecondaryMap::new(),
        }
    }

    pub fn viewport(&self) -> Rect {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Rect) {
        self.viewport = viewport;
    }

    /// Scroll the viewport vertically to `y`
    pub fn scroll_to(&mut self, y: f32) {
        self.viewport.origin.y = y;
    }

    pub fn set_bounds(&mut self, region: RegionId, bounds: Rect) {
        self.bounds.insert(region, bounds);
    }

    pub fn bounds(&self, region: RegionId) -> Option<Rect> {
        self.bounds.get(region).copied()
    }

    /// Forget a region's bounds (element detached from layout)
    pub fn detach(&mut self, region: RegionId) {
        self.bounds.remove(region);
    }
}

impl Measure for RectMeasure {
    fn visible_fraction(&self, region: RegionId) -> RevealResult<f32> {
        self.bounds
            .get(region)
            .map(|bounds| visible_fraction(*bounds, self.viewport))
            .ok_or(RevealError::ObservationUnavailable { region })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<bool>>>, impl FnMut(bool) + Send + 'static) {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        (seen, move |visible| sink.lock().push(visible))
    }

    #[test]
    fn test_threshold_must_be_in_unit_interval() {
        assert!(VisibilityRegion::new(0.0, true).is_err());
        assert!(VisibilityRegion::new(-0.1, true).is_err());
        assert!(VisibilityRegion::new(1.01, true).is_err());
        assert!(VisibilityRegion::new(f32::NAN, true).is_err());
        assert!(VisibilityRegion::new(1.0, true).is_ok());
        assert!(VisibilityRegion::new(0.3, false).is_ok());
    }

    #[test]
    fn test_repeatable_replay_sequence() {
        let mut observer = IntersectionObserver::new();
        let (seen, on_change) = recorder();
        let sub = observer.observe(VisibilityRegion::repeatable(0.3).unwrap(), on_change);

        for fraction in [0.0, 0.5, 0.1, 0.4] {
            observer.deliver(sub.region(), Some(fraction));
        }

        assert_eq!(*seen.lock(), vec![true, false, true]);
    }

    #[test]
    fn test_observe_changes_forwards_messages() {
        let mut observer = IntersectionObserver::new();
        let (tx, rx) = std::sync::mpsc::channel();
        let first = observer.observe_changes(VisibilityRegion::repeatable(0.3).unwrap(), tx.clone());
        let second = observer.observe_changes(VisibilityRegion::once(0.5).unwrap(), tx);

        observer.deliver_batch([
            (second.region(), Some(0.6)),
            (first.region(), Some(0.4)),
            (first.region(), Some(0.0)),
        ]);

        let received: Vec<VisibilityChange> = rx.try_iter().collect();
        assert_eq!(
            received,
            vec![
                VisibilityChange::new(second.region(), true),
                VisibilityChange::new(first.region(), true),
                VisibilityChange::new(first.region(), false),
            ]
        );
    }

    #[test]
    fn test_fire_once_across_fluctuations() {
        let mut observer = IntersectionObserver::new();
        let (seen, on_change) = recorder();
        let sub = observer.observe(VisibilityRegion::once(0.3).unwrap(), on_change);

        for fraction in [0.1, 0.9, 0.0, 0.8, 0.2, 1.0, 0.0, 0.5] {
            observer.deliver(sub.region(), Some(fraction));
        }

        assert_eq!(*seen.lock(), vec![true]);
        // Still tracked internally
        let region = observer.region(sub.region()).unwrap();
        assert!(region.is_currently_visible());
    }

    #[test]
    fn test_exact_threshold_counts_as_visible() {
        let mut region = VisibilityRegion::repeatable(0.3).unwrap();
        assert_eq!(region.update(Some(0.3)), Some(true));
        assert_eq!(region.update(Some(0.3)), None);
        assert_eq!(region.update(Some(0.29)), Some(false));
    }

    #[test]
    fn test_unmeasurable_reads_as_hidden() {
        let mut region = VisibilityRegion::repeatable(0.5).unwrap();
        assert_eq!(region.update(None), None);
        assert_eq!(region.update(Some(0.7)), Some(true));
        assert_eq!(region.update(None), Some(false));
        assert_eq!(region.update(Some(f32::NAN)), None);
    }

    #[test]
    fn test_dropped_subscription_stops_callbacks() {
        let mut observer = IntersectionObserver::new();
        let (seen, on_change) = recorder();
        let sub = observer.observe(VisibilityRegion::repeatable(0.3).unwrap(), on_change);
        let id = sub.region();

        observer.deliver(id, Some(0.5));
        assert!(sub.is_active());
        observer.unsubscribe(sub);
        observer.deliver(id, Some(0.0));
        observer.deliver(id, Some(0.9));

        assert_eq!(*seen.lock(), vec![true]);
        assert_eq!(observer.observed_count(), 0);
    }

    #[test]
    fn test_subscription_outlives_observer() {
        let mut observer = IntersectionObserver::new();
        let sub = observer.observe(VisibilityRegion::once(0.3).unwrap(), |_| {});
        drop(observer);
        assert!(!sub.is_active());
        drop(sub);
    }

    #[test]
    fn test_batch_preserves_detection_order() {
        let mut observer = IntersectionObserver::new();
        let log = Arc::new(Mutex::new(Vec::new()));

        let a_log = Arc::clone(&log);
        let a = observer.observe(VisibilityRegion::repeatable(0.5).unwrap(), move |v| {
            a_log.lock().push(("a", v))
        });
        let b_log = Arc::clone(&log);
        let b = observer.observe(VisibilityRegion::repeatable(0.5).unwrap(), move |v| {
            b_log.lock().push(("b", v))
        });

        let fired = observer.deliver_batch([
            (b.region(), Some(1.0)),
            (a.region(), Some(1.0)),
            (b.region(), Some(0.0)),
        ]);

        assert_eq!(fired, 3);
        assert_eq!(*log.lock(), vec![("b", true), ("a", true), ("b", false)]);
    }

    #[test]
    fn test_visible_fraction_of_partially_scrolled_region() {
        let viewport = Rect::new(0.0, 0.0, 1000.0, 800.0);
        let region = Rect::new(0.0, 600.0, 1000.0, 400.0);
        assert!((visible_fraction(region, viewport) - 0.5).abs() < 1e-6);

        let below = Rect::new(0.0, 900.0, 1000.0, 400.0);
        assert_eq!(visible_fraction(below, viewport), 0.0);

        let empty = Rect::new(0.0, 100.0, 0.0, 0.0);
        assert_eq!(visible_fraction(empty, viewport), 0.0);
    }

    #[test]
    fn test_polling_backend_follows_scroll() {
        let mut observer = PollingObserver::new(RectMeasure::new(Rect::new(0.0, 0.0, 1000.0, 800.0)));
        let (seen, on_change) = recorder();
        let sub = observer.observe(VisibilityRegion::repeatable(0.3).unwrap(), on_change);
        observer
            .measure_mut()
            .set_bounds(sub.region(), Rect::new(0.0, 1000.0, 1000.0, 500.0));

        observer.poll(); // fully below the fold
        observer.measure_mut().scroll_to(500.0); // 300 of 500 visible
        observer.poll();
        observer.measure_mut().scroll_to(2000.0); // scrolled past
        observer.poll();

        assert_eq!(*seen.lock(), vec![true, false]);
    }

    #[test]
    fn test_polling_detached_region_is_hidden_not_fatal() {
        let mut observer = PollingObserver::new(RectMeasure::new(Rect::new(0.0, 0.0, 1000.0, 800.0)));
        let (seen, on_change) = recorder();
        let sub = observer.observe(VisibilityRegion::repeatable(0.3).unwrap(), on_change);

        // Never laid out
        assert_eq!(observer.poll(), 0);

        observer
            .measure_mut()
            .set_bounds(sub.region(), Rect::new(0.0, 0.0, 100.0, 100.0));
        observer.poll();
        observer.measure_mut().detach(sub.region());
        observer.poll();

        assert_eq!(*seen.lock(), vec![true, false]);
        assert!(matches!(
            observer.measure().visible_fraction(sub.region()),
            Err(RevealError::ObservationUnavailable { .. })
        ));
    }

    #[test]
    fn test_callback_may_unsubscribe_itself() {
        let mut observer = IntersectionObserver::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let slot_in_cb = Arc::clone(&slot);
        let calls = Arc::new(Mutex::new(0));
        let calls_in_cb = Arc::clone(&calls);

        let sub = observer.observe(VisibilityRegion::repeatable(0.3).unwrap(), move |_| {
            *calls_in_cb.lock() += 1;
            slot_in_cb.lock().take();
        });
        let id = sub.region();
        *slot.lock() = Some(sub);

        let delivered = observer.deliver_batch([(id, Some(1.0)), (id, Some(0.0))]);
        assert_eq!(delivered, 1);
        assert_eq!(*calls.lock(), 1);
        assert_eq!(observer.observed_count(), 0);
    }
}
