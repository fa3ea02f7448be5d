//! Full-screen viewer overlay.
//!
//! `ViewerController` glues the GTK-free `ViewerSession` to widgets: a
//! transition layer for the zoom in/out animations and a `Stack` pager that
//! holds one `ItemPage` per visited item. The hosting window supplies the
//! item list, cell frames and cell visibility through injected closures, so
//! the controller never reaches into the grid directly.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use gtk4::gdk::Key;
use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{
    glib, EventControllerKey, GestureSwipe, Overlay, Stack, StackTransitionType,
};
use tracing::debug;

use crate::config;
use crate::models::ViewerItem;

use super::geometry::{centered_frame, ContentMode, Rectf};
use super::page::ItemPage;
use super::session::{PageDirection, ViewerSession};
use super::transition::TransitionLayer;

/// Horizontal swipe velocity needed to turn a page.
const SWIPE_VELOCITY: f64 = 300.0;

type ItemsProvider = Rc<dyn Fn() -> Vec<Rc<dyn ViewerItem>>>;
type CellFrameProvider = Rc<dyn Fn(usize) -> Option<Rectf>>;
type CellVisibilitySetter = Rc<dyn Fn(usize, bool)>;

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct ViewerControllerInner {
        pub root: RefCell<Option<Overlay>>,
        pub pager: RefCell<Option<Stack>>,
        pub layer: RefCell<Option<Rc<TransitionLayer>>>,
        pub session: RefCell<Option<ViewerSession<ItemPage>>>,
        // Index of the cell the viewer zoomed out of.
        pub origin_cell: Cell<usize>,
        pub items_provider: RefCell<Option<ItemsProvider>>,
        pub cell_frame_provider: RefCell<Option<CellFrameProvider>>,
        pub cell_visibility: RefCell<Option<CellVisibilitySetter>>,
        pub on_index_changed: RefCell<Option<Rc<dyn Fn(usize)>>>,
        pub on_dismissed: RefCell<Option<Rc<dyn Fn()>>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for ViewerControllerInner {
        const NAME: &'static str = "PictorViewerController";
        type Type = super::ViewerController;
        type ParentType = glib::Object;
    }

    impl ObjectImpl for ViewerControllerInner {}
}

glib::wrapper! {
    pub struct ViewerController(ObjectSubclass<imp::ViewerControllerInner>);
}

impl ViewerController {
    pub fn new() -> Self {
        let obj: Self = glib::Object::builder().build();
        obj.setup_widgets();
        obj.setup_input();
        obj
    }

    fn setup_widgets(&self) {
        let imp = self.imp();

        let layer = TransitionLayer::new();

        let pager = Stack::new();
        pager.add_css_class("viewer-pager");
        pager.set_hexpand(true);
        pager.set_vexpand(true);
        pager.set_visible(false);
        pager.set_transition_duration(200);

        let root = Overlay::new();
        root.set_hexpand(true);
        root.set_vexpand(true);
        root.set_focusable(true);
        // Inert until a session presents; the grid keeps receiving input.
        root.set_can_target(false);
        root.set_child(Some(&layer.widget()));
        root.add_overlay(&pager);

        *imp.layer.borrow_mut() = Some(layer);
        *imp.pager.borrow_mut() = Some(pager);
        *imp.root.borrow_mut() = Some(root);
    }

    fn setup_input(&self) {
        let pager = self.pager();

        let swipe = GestureSwipe::new();
        let weak = self.downgrade();
        swipe.connect_swipe(move |_, vx, vy| {
            let Some(viewer) = weak.upgrade() else { return };
            if vx.abs() < SWIPE_VELOCITY || vx.abs() < vy.abs() {
                return;
            }
            if vx < 0.0 {
                viewer.page(PageDirection::Forward);
            } else {
                viewer.page(PageDirection::Backward);
            }
        });
        pager.add_controller(swipe);

        let keys = EventControllerKey::new();
        let weak = self.downgrade();
        keys.connect_key_pressed(move |_, key, _, _| {
            let Some(viewer) = weak.upgrade() else {
                return glib::Propagation::Proceed;
            };
            if !viewer.is_active() {
                return glib::Propagation::Proceed;
            }
            match key {
                Key::Left => {
                    viewer.page(PageDirection::Backward);
                    glib::Propagation::Stop
                }
                Key::Right => {
                    viewer.page(PageDirection::Forward);
                    glib::Propagation::Stop
                }
                Key::Escape => {
                    viewer.request_dismiss();
                    glib::Propagation::Stop
                }
                _ => glib::Propagation::Proceed,
            }
        });
        self.root().add_controller(keys);
    }

    pub fn widget(&self) -> Overlay {
        self.root()
    }

    pub fn set_items_provider<F>(&self, f: F)
    where
        F: Fn() -> Vec<Rc<dyn ViewerItem>> + 'static,
    {
        *self.imp().items_provider.borrow_mut() = Some(Rc::new(f));
    }

    pub fn set_cell_frame_provider<F>(&self, f: F)
    where
        F: Fn(usize) -> Option<Rectf> + 'static,
    {
        *self.imp().cell_frame_provider.borrow_mut() = Some(Rc::new(f));
    }

    pub fn set_cell_visibility<F>(&self, f: F)
    where
        F: Fn(usize, bool) + 'static,
    {
        *self.imp().cell_visibility.borrow_mut() = Some(Rc::new(f));
    }

    /// Called with the new focus index after every page turn.
    pub fn connect_index_changed<F: Fn(usize) + 'static>(&self, f: F) {
        *self.imp().on_index_changed.borrow_mut() = Some(Rc::new(f));
    }

    /// Called after the dismiss transition has fully completed.
    pub fn connect_dismissed<F: Fn() + 'static>(&self, f: F) {
        *self.imp().on_dismissed.borrow_mut() = Some(Rc::new(f));
    }

    pub fn is_active(&self) -> bool {
        self.imp().session.borrow().is_some()
    }

    pub fn focused_index(&self) -> Option<usize> {
        self.imp()
            .session
            .borrow()
            .as_ref()
            .map(|s| s.focused_index())
    }

    /// Opens the viewer on the item at `origin_index`.
    ///
    /// Missing preconditions (no allocation yet, origin cell scrolled out of
    /// view, image not decoded) abandon the present without any UI change.
    pub fn present(&self, origin_index: usize) {
        let imp = self.imp();
        if imp.session.borrow().is_some() {
            debug!("present ignored: a session is already active");
            return;
        }

        let layer = self.layer();
        let bounds = layer.bounds();
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            debug!("present abandoned: overlay not allocated");
            return;
        }
        let Some(cell_frame) = self.cell_frame(origin_index) else {
            debug!(index = origin_index, "present abandoned: origin cell not visible");
            return;
        };

        let items = self.items();
        let mut session = ViewerSession::new(origin_index, *config::PAGE_CACHE_CAPACITY);
        let Some((_, image)) = session.begin_present(&items) else {
            return;
        };

        *imp.session.borrow_mut() = Some(session);
        imp.origin_cell.set(origin_index);
        self.set_cell_visible(origin_index, false);

        let root = self.root();
        root.set_can_target(true);
        root.grab_focus();

        let to = centered_frame(
            image.width as f64,
            image.height as f64,
            bounds,
            ContentMode::AspectFit,
        );
        let weak = self.downgrade();
        layer.run_present(&image.texture, cell_frame, to, move || {
            if let Some(viewer) = weak.upgrade() {
                viewer.finish_present();
            }
        });
    }

    fn finish_present(&self) {
        let items = self.items();
        let installed = {
            let mut session = self.imp().session.borrow_mut();
            session
                .as_mut()
                .and_then(|s| s.finish_present(&items, ItemPage::new))
        };
        let Some((page, evicted)) = installed else {
            return;
        };
        self.install_page(&page, evicted, StackTransitionType::None);
        self.pager().set_visible(true);
    }

    /// Turns the pager one item in `direction`, if a neighbor exists.
    pub fn page(&self, direction: PageDirection) {
        let items = self.items();
        let turn = {
            let mut session = self.imp().session.borrow_mut();
            session
                .as_mut()
                .and_then(|s| s.page(direction, &items, ItemPage::new))
        };
        let Some(turn) = turn else { return };

        let transition = match direction {
            PageDirection::Forward => StackTransitionType::SlideLeft,
            PageDirection::Backward => StackTransitionType::SlideRight,
        };
        self.install_page(&turn.page, turn.evicted, transition);

        let cb = self.imp().on_index_changed.borrow().clone();
        if let Some(cb) = cb {
            cb(turn.new_index);
        }
    }

    /// Re-applies the focused item's image to its page, for decodes that
    /// finish while the item is already on screen.
    pub fn refresh_focused(&self) {
        let items = self.items();
        let rebound = {
            let mut session = self.imp().session.borrow_mut();
            session
                .as_mut()
                .and_then(|s| s.rebind_current(&items, ItemPage::new))
        };
        if let Some((page, evicted)) = rebound {
            self.install_page(&page, evicted, StackTransitionType::None);
        }
    }

    /// Starts the dismiss transition back to the focused item's cell.
    pub fn request_dismiss(&self) {
        let layer = self.layer();
        let bounds = layer.bounds();
        if bounds.width <= 0.0 || bounds.height <= 0.0 {
            debug!("dismiss abandoned: overlay not allocated");
            return;
        }
        if !layer.has_presented_visual() {
            debug!("dismiss abandoned: no presented visual");
            return;
        }

        let focused = match self.focused_index() {
            Some(index) => index,
            None => return,
        };
        let Some(cell_frame) = self.cell_frame(focused) else {
            debug!(index = focused, "dismiss abandoned: focused cell not visible");
            return;
        };

        let items = self.items();
        let begun = {
            let mut session = self.imp().session.borrow_mut();
            session.as_mut().and_then(|s| s.begin_dismiss(&items))
        };
        let Some((_, image)) = begun else { return };

        // The visual may still show the origin item; the focus can have
        // moved since presenting.
        layer.rebind_visual(&image.texture);
        self.set_cell_visible(focused, false);
        self.pager().set_visible(false);

        let from = centered_frame(
            image.width as f64,
            image.height as f64,
            bounds,
            ContentMode::AspectFit,
        );
        let weak = self.downgrade();
        layer.run_dismiss(from, cell_frame, move || {
            if let Some(viewer) = weak.upgrade() {
                viewer.finish_dismiss();
            }
        });
    }

    fn finish_dismiss(&self) {
        let imp = self.imp();
        let focused = {
            let mut session = imp.session.borrow_mut();
            let Some(active) = session.as_mut() else { return };
            if !active.finish_dismiss() {
                return;
            }
            let focused = active.focused_index();
            *session = None;
            focused
        };

        self.set_cell_visible(imp.origin_cell.get(), true);
        self.set_cell_visible(focused, true);

        let pager = self.pager();
        while let Some(child) = pager.first_child() {
            pager.remove(&child);
        }
        self.root().set_can_target(false);

        let cb = imp.on_dismissed.borrow().clone();
        if let Some(cb) = cb {
            cb();
        }
    }

    /// Puts `page` into the pager (adding it on first visit), makes it the
    /// visible child and drops any page the cache evicted.
    fn install_page(&self, page: &ItemPage, evicted: Option<ItemPage>, kind: StackTransitionType) {
        let pager = self.pager();
        let Some(id) = page.item_id() else { return };

        if pager.child_by_name(&id).is_none() {
            pager.add_named(&page.widget(), Some(&id));
            let weak = self.downgrade();
            page.connect_tap(move || {
                if let Some(viewer) = weak.upgrade() {
                    viewer.request_dismiss();
                }
            });
        }
        if let Some(old) = evicted {
            let widget = old.widget();
            if widget.parent().as_ref() == Some(pager.upcast_ref()) {
                pager.remove(&widget);
            }
        }

        pager.set_transition_type(kind);
        pager.set_visible_child_name(&id);
    }

    fn root(&self) -> Overlay {
        self.imp()
            .root
            .borrow()
            .clone()
            .expect("root built in new()")
    }

    fn pager(&self) -> Stack {
        self.imp()
            .pager
            .borrow()
            .clone()
            .expect("pager built in new()")
    }

    fn layer(&self) -> Rc<TransitionLayer> {
        self.imp()
            .layer
            .borrow()
            .clone()
            .expect("layer built in new()")
    }

    fn items(&self) -> Vec<Rc<dyn ViewerItem>> {
        match self.imp().items_provider.borrow().as_ref() {
            Some(provider) => provider(),
            None => Vec::new(),
        }
    }

    fn cell_frame(&self, index: usize) -> Option<Rectf> {
        self.imp()
            .cell_frame_provider
            .borrow()
            .as_ref()
            .and_then(|provider| provider(index))
    }

    fn set_cell_visible(&self, index: usize, visible: bool) {
        if let Some(setter) = self.imp().cell_visibility.borrow().as_ref() {
            setter(index, visible);
        }
    }
}

impl Default for ViewerController {
    fn default() -> Self {
        Self::new()
    }
}
