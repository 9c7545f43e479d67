use crate::channel::{NotificationChannel, Subscription};
use crate::history::{HistoryItem, HistoryList};
use crate::slot::PersistentSlot;
use std::cell::{Cell, Ref, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};
use tracing::{debug, warn};

struct StoreInner {
    slot: Box<dyn PersistentSlot>,
    channel: NotificationChannel,
    /// Last list that could not be persisted. Served instead of the slot until a
    /// write or removal succeeds again.
    unsaved: RefCell<Option<HistoryList>>,
}

/// Bounded, de-duplicated history of submitted weather requests.
///
/// The only writer of its slot. Cloning yields another handle to the same store,
/// so unrelated panels can each hold one.
#[derive(Clone)]
pub struct HistoryStore {
    inner: Rc<StoreInner>,
}

impl HistoryStore {
    /// Creates a store with its own notification channel.
    pub fn new(slot: impl PersistentSlot + 'static) -> Self {
        Self::with_channel(slot, NotificationChannel::new())
    }

    pub fn with_channel(slot: impl PersistentSlot + 'static, channel: NotificationChannel) -> Self {
        Self {
            inner: Rc::new(StoreInner {
                slot: Box::new(slot),
                channel,
                unsaved: RefCell::new(None),
            }),
        }
    }

    /// Current history, newest first.
    pub fn get_all(&self) -> HistoryList {
        if let Some(list) = self.inner.unsaved.borrow().as_ref() {
            return list.clone();
        }
        self.inner.slot.read()
    }

    /// Remembers a successful submission and notifies every subscriber.
    ///
    /// Recording an id that is already present replaces that entry and moves it to
    /// the front. Persistence failures are logged, never returned.
    pub fn record(&self, item: HistoryItem) {
        debug!(id = %item.id, location = %item.location, "recording history entry");

        let mut list = self.get_all();
        list.record(item);
        self.persist(list);

        self.inner.channel.announce();
    }

    /// Forgets every entry and notifies every subscriber.
    pub fn clear(&self) {
        debug!("clearing history");

        match self.inner.slot.remove() {
            Ok(()) => {
                self.inner.unsaved.replace(None);
            }
            Err(e) => {
                warn!("Failed to remove stored history: {}", e);
                self.inner.unsaved.replace(Some(HistoryList::new()));
            }
        }

        self.inner.channel.announce();
    }

    fn persist(&self, list: HistoryList) {
        match self.inner.slot.write(&list) {
            Ok(()) => {
                self.inner.unsaved.replace(None);
            }
            Err(e) => {
                warn!("Failed to persist history, keeping it for this session only: {}", e);
                self.inner.unsaved.replace(Some(list));
            }
        }
    }

    /// Calls `handler` after every change until the subscription ends.
    pub fn subscribe(&self, handler: impl FnMut() + 'static) -> Subscription {
        self.inner.channel.subscribe(handler)
    }

    /// Takes a snapshot and keeps it refreshed until the view is unmounted.
    pub fn mount(&self) -> HistoryView {
        HistoryView::mount(self)
    }

    pub fn channel(&self) -> &NotificationChannel {
        &self.inner.channel
    }

    /// True when the latest change only exists in memory.
    pub fn is_volatile(&self) -> bool {
        self.inner.unsaved.borrow().is_some()
    }

    fn downgrade(&self) -> Weak<StoreInner> {
        Rc::downgrade(&self.inner)
    }
}

impl fmt::Debug for HistoryStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HistoryStore")
            .field("channel", &self.inner.channel)
            .field("volatile", &self.is_volatile())
            .finish()
    }
}

#[derive(Debug, Default)]
struct ViewState {
    list: RefCell<HistoryList>,
    generation: Cell<u64>,
}

/// A consumer's read-only copy of the history, refreshed on every change.
///
/// Dropping the view (or calling [`unmount`](Self::unmount)) ends the subscription.
#[derive(Debug)]
pub struct HistoryView {
    state: Rc<ViewState>,
    subscription: Subscription,
}

impl HistoryView {
    fn mount(store: &HistoryStore) -> Self {
        let state = Rc::new(ViewState {
            list: RefCell::new(store.get_all()),
            generation: Cell::new(0),
        });

        let weak_store = store.downgrade();
        let view_state = Rc::downgrade(&state);
        let subscription = store.subscribe(move || {
            let (Some(inner), Some(view_state)) = (weak_store.upgrade(), view_state.upgrade())
            else {
                return;
            };
            let store = HistoryStore { inner };
            view_state.list.replace(store.get_all());
            view_state.generation.set(view_state.generation.get() + 1);
        });

        Self { state, subscription }
    }

    /// Borrow of the latest snapshot.
    pub fn snapshot(&self) -> Ref<'_, HistoryList> {
        self.state.list.borrow()
    }

    /// Number of refreshes since mounting.
    pub fn generation(&self) -> u64 {
        self.state.generation.get()
    }

    pub fn is_subscribed(&self) -> bool {
        self.subscription.is_active()
    }

    pub fn unmount(mut self) {
        self.subscription.unsubscribe();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::slot::MemorySlot;
    use chrono::NaiveDate;

    fn item(id: &str, location: &str) -> HistoryItem {
        HistoryItem::new(id, location, NaiveDate::from_ymd_opt(2024, 5, 1).unwrap(), None).unwrap()
    }

    fn store_with_slot() -> (HistoryStore, Rc<MemorySlot>) {
        let slot = Rc::new(MemorySlot::new());
        (HistoryStore::new(slot.clone()), slot)
    }

    #[test]
    fn test_record_persists_to_slot() {
        let (store, slot) = store_with_slot();
        store.record(item("a1", "Paris"));

        let persisted = HistoryList::from_json(&slot.raw().unwrap()).unwrap();
        assert_eq!(persisted.first().unwrap().id, "a1");
        assert!(!store.is_volatile());
    }

    #[test]
    fn test_get_all_reads_external_changes() {
        let (store, slot) = store_with_slot();
        store.record(item("a1", "Paris"));

        slot.set_raw(None);

        assert!(store.get_all().is_empty());
    }

    #[test]
    fn test_failed_write_kept_for_session() {
        let (store, slot) = store_with_slot();
        store.record(item("a1", "Paris"));
        slot.set_unavailable(true);

        store.record(item("b2", "Oslo"));

        assert!(store.is_volatile());
        assert_eq!(store.get_all().len(), 2);
        assert_eq!(HistoryList::from_json(&slot.raw().unwrap()).unwrap().len(), 1);

        slot.set_unavailable(false);
        store.record(item("c3", "Rome"));

        assert!(!store.is_volatile());
        assert_eq!(HistoryList::from_json(&slot.raw().unwrap()).unwrap().len(), 3);
    }

    #[test]
    fn test_failed_clear_still_empties_view() {
        let (store, slot) = store_with_slot();
        store.record(item("a1", "Paris"));
        slot.set_unavailable(true);

        store.clear();

        assert!(store.get_all().is_empty());
        assert!(store.is_volatile());
    }

    #[test]
    fn test_view_refreshes_on_record() {
        let (store, _slot) = store_with_slot();
        let view = store.mount();
        assert!(view.snapshot().is_empty());

        store.record(item("a1", "Paris"));

        assert_eq!(view.generation(), 1);
        assert_eq!(view.snapshot().first().unwrap().id, "a1");
    }

    #[test]
    fn test_view_takes_initial_snapshot() {
        let (store, _slot) = store_with_slot();
        store.record(item("a1", "Paris"));

        let view = store.mount();

        assert_eq!(view.generation(), 0);
        assert_eq!(view.snapshot().len(), 1);
    }

    #[test]
    fn test_views_on_cloned_stores_stay_in_sync() {
        let (store, _slot) = store_with_slot();
        let writer = store.clone();
        let first = store.mount();
        let second = store.mount();

        writer.record(item("a1", "Paris"));
        writer.clear();

        assert_eq!(first.generation(), 2);
        assert_eq!(second.generation(), 2);
        assert!(first.snapshot().is_empty());
        assert!(second.snapshot().is_empty());
    }

    #[test]
    fn test_unmount_releases_subscription() {
        let (store, _slot) = store_with_slot();
        let view = store.mount();
        assert!(view.is_subscribed());
        assert_eq!(store.channel().listener_count(), 1);

        view.unmount();

        assert_eq!(store.channel().listener_count(), 0);
    }

    #[test]
    fn test_remount_starts_fresh_cycle() {
        let (store, _slot) = store_with_slot();
        drop(store.mount());
        store.record(item("a1", "Paris"));

        let view = store.mount();
        store.record(item("b2", "Oslo"));

        assert_eq!(view.generation(), 1);
        assert_eq!(view.snapshot().len(), 2);
    }
}
