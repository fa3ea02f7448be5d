//! GTK-free orchestration of one viewing session.
//!
//! `ViewerSession` owns the focus index, the transition state machine and
//! the page cache; the GTK controller layers geometry and widgets on top.
//! The data source is queried fresh for every operation, so all methods
//! take the current item list instead of caching it.

use std::num::NonZeroUsize;
use std::rc::Rc;

use tracing::{debug, warn};

use crate::models::{ViewerImage, ViewerItem};

use super::cache::{BindPage, PageCache};
use super::navigation;
use super::state::{TransitionState, TransitionTracker};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageDirection {
    Backward,
    Forward,
}

/// The result of a successful page turn.
pub struct PageTurn<P> {
    pub page: P,
    pub new_index: usize,
    /// Page evicted from the cache to make room, owned by the caller now.
    pub evicted: Option<P>,
}

pub struct ViewerSession<P> {
    focused: usize,
    tracker: TransitionTracker,
    cache: PageCache<P>,
}

impl<P: BindPage + Clone> ViewerSession<P> {
    pub fn new(initial_index: usize, page_capacity: NonZeroUsize) -> Self {
        Self {
            focused: initial_index,
            tracker: TransitionTracker::new(),
            cache: PageCache::new(page_capacity),
        }
    }

    pub fn focused_index(&self) -> usize {
        self.focused
    }

    pub fn state(&self) -> TransitionState {
        self.tracker.state()
    }

    pub fn current_item(&self, items: &[Rc<dyn ViewerItem>]) -> Option<Rc<dyn ViewerItem>> {
        items.get(self.focused).cloned()
    }

    /// Checks the item-side present preconditions and enters `Presenting`.
    ///
    /// Returns the focused item and its image for the transition driver.
    /// `None` means the present was abandoned; the state is unchanged.
    pub fn begin_present(
        &mut self,
        items: &[Rc<dyn ViewerItem>],
    ) -> Option<(Rc<dyn ViewerItem>, ViewerImage)> {
        if items.is_empty() {
            debug!("present abandoned: data source returned no items");
            return None;
        }
        let Some(item) = items.get(self.focused).cloned() else {
            warn!(
                index = self.focused,
                len = items.len(),
                "present rejected: focused index out of range"
            );
            return None;
        };
        let Some(image) = item.image() else {
            debug!(id = item.id(), "present abandoned: image not decoded yet");
            return None;
        };
        if let Err(err) = self.tracker.begin_present() {
            debug!(%err, "present rejected");
            return None;
        }
        Some((item, image))
    }

    /// Completes the present phase and installs the focused item's page.
    ///
    /// Paging content is only built here, after the zoom animation has
    /// finished, so the pager never fights the in-flight transition.
    pub fn finish_present<F>(
        &mut self,
        items: &[Rc<dyn ViewerItem>],
        build: F,
    ) -> Option<(P, Option<P>)>
    where
        F: FnOnce() -> P,
    {
        if let Err(err) = self.tracker.finish_present() {
            debug!(%err, "finish-present rejected");
            return None;
        }
        let item = items.get(self.focused).cloned()?;
        Some(self.cache.get_or_create(&item, build))
    }

    /// Pages to the neighbor in `direction`, if one exists.
    ///
    /// The new focus index is recomputed from the neighbor's identity, not
    /// assumed from arithmetic, so a reshuffled data source stays coherent.
    pub fn page<F>(
        &mut self,
        direction: PageDirection,
        items: &[Rc<dyn ViewerItem>],
        build: F,
    ) -> Option<PageTurn<P>>
    where
        F: FnOnce() -> P,
    {
        if self.tracker.state() != TransitionState::Presented {
            debug!(state = ?self.tracker.state(), "paging ignored outside presented state");
            return None;
        }
        let current = items.get(self.focused)?;
        let current_id = current.id().to_owned();
        let neighbor = match direction {
            PageDirection::Backward => navigation::previous_item(&current_id, items),
            PageDirection::Forward => navigation::next_item(&current_id, items),
        }?;

        let (page, evicted) = self.cache.get_or_create(&neighbor, build);
        let new_index = navigation::position_of(neighbor.id(), items)?;
        self.focused = new_index;
        Some(PageTurn {
            page,
            new_index,
            evicted,
        })
    }

    /// Rebinds the focused item's page, applying any freshly arrived image.
    pub fn rebind_current<F>(
        &mut self,
        items: &[Rc<dyn ViewerItem>],
        build: F,
    ) -> Option<(P, Option<P>)>
    where
        F: FnOnce() -> P,
    {
        if self.tracker.state() != TransitionState::Presented {
            return None;
        }
        let item = items.get(self.focused)?.clone();
        Some(self.cache.get_or_create(&item, build))
    }

    /// Checks the item-side dismiss preconditions and enters `Dismissing`.
    pub fn begin_dismiss(
        &mut self,
        items: &[Rc<dyn ViewerItem>],
    ) -> Option<(Rc<dyn ViewerItem>, ViewerImage)> {
        let Some(item) = items.get(self.focused).cloned() else {
            debug!(index = self.focused, "dismiss abandoned: focused item missing");
            return None;
        };
        let Some(image) = item.image() else {
            debug!(id = item.id(), "dismiss abandoned: image not available");
            return None;
        };
        if let Err(err) = self.tracker.begin_dismiss() {
            debug!(%err, "dismiss rejected");
            return None;
        }
        Some((item, image))
    }

    /// Completes the dismiss phase. The session is terminal afterwards.
    pub fn finish_dismiss(&mut self) -> bool {
        match self.tracker.finish_dismiss() {
            Ok(()) => true,
            Err(err) => {
                debug!(%err, "finish-dismiss rejected");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{as_items, FakeItem};
    use std::cell::RefCell;

    #[derive(Clone, Default)]
    struct TestPage {
        bound_id: Rc<RefCell<Option<String>>>,
    }

    impl BindPage for TestPage {
        fn bind(&self, item: &Rc<dyn ViewerItem>) {
            *self.bound_id.borrow_mut() = Some(item.id().to_owned());
        }
    }

    fn capacity() -> NonZeroUsize {
        NonZeroUsize::new(5).unwrap()
    }

    fn present(session: &mut ViewerSession<TestPage>, items: &[Rc<dyn ViewerItem>]) {
        assert!(session.begin_present(items).is_some());
        assert!(session.finish_present(items, TestPage::default).is_some());
        assert_eq!(session.state(), TransitionState::Presented);
    }

    /// Scenario A: [P1, P2, P3] focused on P2; page forward once, then hit
    /// the end of the sequence.
    #[test]
    fn paging_forward_stops_at_the_last_item() {
        let items = as_items(&[
            FakeItem::with_image("p1"),
            FakeItem::with_image("p2"),
            FakeItem::with_image("p3"),
        ]);
        let mut session: ViewerSession<TestPage> = ViewerSession::new(1, capacity());

        present(&mut session, &items);
        assert_eq!(session.current_item(&items).unwrap().id(), "p2");

        let turn = session
            .page(PageDirection::Forward, &items, TestPage::default)
            .expect("p3 is the next item");
        assert_eq!(turn.new_index, 2);
        assert_eq!(session.focused_index(), 2);
        assert_eq!(turn.page.bound_id.borrow().as_deref(), Some("p3"));

        // P3 is last: no page turn, no notification.
        assert!(session
            .page(PageDirection::Forward, &items, TestPage::default)
            .is_none());
        assert_eq!(session.focused_index(), 2);
    }

    /// Scenario B: single item, dismissed once; later dismisses are no-ops.
    #[test]
    fn dismiss_is_terminal() {
        let items = as_items(&[FakeItem::with_image("p1")]);
        let mut session: ViewerSession<TestPage> = ViewerSession::new(0, capacity());

        present(&mut session, &items);
        assert!(session.begin_dismiss(&items).is_some());
        assert!(session.finish_dismiss());
        assert_eq!(session.state(), TransitionState::Dismissed);

        assert!(session.begin_dismiss(&items).is_none());
        assert!(!session.finish_dismiss());
        assert!(session.begin_present(&items).is_none());
    }

    /// Scenario C: focused image not decoded yet; nothing happens.
    #[test]
    fn present_without_an_image_is_abandoned() {
        let items = as_items(&[FakeItem::bare("p1")]);
        let mut session: ViewerSession<TestPage> = ViewerSession::new(0, capacity());

        assert!(session.begin_present(&items).is_none());
        assert_eq!(session.state(), TransitionState::Idle);
    }

    #[test]
    fn empty_item_list_abandons_present() {
        let mut session: ViewerSession<TestPage> = ViewerSession::new(0, capacity());
        assert!(session.begin_present(&[]).is_none());
        assert_eq!(session.state(), TransitionState::Idle);
    }

    #[test]
    fn out_of_range_initial_index_is_a_rejected_no_op() {
        let items = as_items(&[FakeItem::with_image("p1")]);
        let mut session: ViewerSession<TestPage> = ViewerSession::new(7, capacity());
        assert!(session.begin_present(&items).is_none());
        assert_eq!(session.state(), TransitionState::Idle);
    }

    #[test]
    fn paging_is_ignored_while_the_present_animation_runs() {
        let items = as_items(&[FakeItem::with_image("p1"), FakeItem::with_image("p2")]);
        let mut session: ViewerSession<TestPage> = ViewerSession::new(0, capacity());

        assert!(session.begin_present(&items).is_some());
        assert!(session
            .page(PageDirection::Forward, &items, TestPage::default)
            .is_none());
        assert_eq!(session.focused_index(), 0);
    }

    #[test]
    fn dismiss_during_present_animation_is_rejected() {
        let items = as_items(&[FakeItem::with_image("p1")]);
        let mut session: ViewerSession<TestPage> = ViewerSession::new(0, capacity());

        assert!(session.begin_present(&items).is_some());
        assert!(session.begin_dismiss(&items).is_none());
        assert_eq!(session.state(), TransitionState::Presenting);
    }

    #[test]
    fn revisiting_an_item_reuses_its_page() {
        let items = as_items(&[FakeItem::with_image("p1"), FakeItem::with_image("p2")]);
        let mut session: ViewerSession<TestPage> = ViewerSession::new(0, capacity());
        present(&mut session, &items);

        let forward = session
            .page(PageDirection::Forward, &items, TestPage::default)
            .unwrap();
        let back = session
            .page(PageDirection::Backward, &items, TestPage::default)
            .unwrap();
        let forward_again = session
            .page(PageDirection::Forward, &items, TestPage::default)
            .unwrap();

        assert_eq!(back.new_index, 0);
        assert!(Rc::ptr_eq(
            &forward.page.bound_id,
            &forward_again.page.bound_id
        ));
    }

    #[test]
    fn rebind_applies_a_late_image_to_the_existing_page() {
        let photo = FakeItem::with_image("p1");
        let neighbor = FakeItem::bare("p2");
        let items = as_items(&[photo, neighbor.clone()]);
        let mut session: ViewerSession<TestPage> = ViewerSession::new(0, capacity());
        present(&mut session, &items);

        // p2 has no image yet, but paging to it is still allowed.
        let turn = session
            .page(PageDirection::Forward, &items, TestPage::default)
            .unwrap();
        assert_eq!(turn.new_index, 1);

        neighbor.set_image(crate::test_support::test_image(8, 8));
        let (page, _) = session
            .rebind_current(&items, TestPage::default)
            .expect("presented session rebinds");
        assert!(Rc::ptr_eq(&page.bound_id, &turn.page.bound_id));
    }

    #[test]
    fn shrunken_data_source_stops_paging() {
        let items = as_items(&[
            FakeItem::with_image("p1"),
            FakeItem::with_image("p2"),
            FakeItem::with_image("p3"),
        ]);
        let mut session: ViewerSession<TestPage> = ViewerSession::new(2, capacity());
        present(&mut session, &items);

        // The data source now returns fewer items than the focused index.
        let shrunk = as_items(&[FakeItem::with_image("p1")]);
        assert!(session
            .page(PageDirection::Backward, &shrunk, TestPage::default)
            .is_none());
        assert_eq!(session.focused_index(), 2);
    }
}
