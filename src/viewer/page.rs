//! A single item's page inside the viewer's pager.

use std::cell::RefCell;
use std::rc::Rc;

use gtk4::prelude::*;
use gtk4::subclass::prelude::*;
use gtk4::{glib, ContentFit, GestureClick, Overflow, Picture};
use tracing::trace;

use crate::models::ViewerItem;

use super::cache::BindPage;

mod imp {
    use super::*;

    #[derive(Default)]
    pub struct ItemPageInner {
        pub picture: RefCell<Option<Picture>>,
        pub item_id: RefCell<Option<String>>,
        pub on_tap: RefCell<Option<Rc<dyn Fn()>>>,
    }

    #[glib::object_subclass]
    impl ObjectSubclass for ItemPageInner {
        const NAME: &'static str = "PictorItemPage";
        type Type = super::ItemPage;
        type ParentType = glib::Object;
    }

    impl ObjectImpl for ItemPageInner {}
}

glib::wrapper! {
    pub struct ItemPage(ObjectSubclass<imp::ItemPageInner>);
}

impl ItemPage {
    pub fn new() -> Self {
        let obj: Self = glib::Object::builder().build();

        let picture = Picture::new();
        picture.set_content_fit(ContentFit::Contain);
        picture.set_overflow(Overflow::Hidden);
        picture.set_hexpand(true);
        picture.set_vexpand(true);
        picture.add_css_class("viewer-page");

        // Single tap dismisses the viewer; the controller decides.
        let click = GestureClick::new();
        click.set_button(1);
        let page_weak = obj.downgrade();
        click.connect_released(move |_, n_press, _, _| {
            if n_press != 1 {
                return;
            }
            if let Some(page) = page_weak.upgrade() {
                page.emit_tap();
            }
        });
        picture.add_controller(click);

        *obj.imp().picture.borrow_mut() = Some(picture);
        obj
    }

    pub fn widget(&self) -> Picture {
        self.imp()
            .picture
            .borrow()
            .clone()
            .expect("page widget built in new()")
    }

    pub fn item_id(&self) -> Option<String> {
        self.imp().item_id.borrow().clone()
    }

    pub fn connect_tap<F: Fn() + 'static>(&self, f: F) {
        *self.imp().on_tap.borrow_mut() = Some(Rc::new(f));
    }

    fn emit_tap(&self) {
        let cb = self.imp().on_tap.borrow().clone();
        if let Some(cb) = cb {
            cb();
        }
    }
}

impl Default for ItemPage {
    fn default() -> Self {
        Self::new()
    }
}

impl BindPage for ItemPage {
    fn bind(&self, item: &Rc<dyn ViewerItem>) {
        let imp = self.imp();
        *imp.item_id.borrow_mut() = Some(item.id().to_owned());

        let picture = imp.picture.borrow();
        let Some(picture) = picture.as_ref() else {
            return;
        };
        match item.image() {
            Some(image) => picture.set_paintable(Some(&image.texture)),
            None => {
                trace!(id = item.id(), "page bound without an image");
                picture.set_paintable(gdk4::Paintable::NONE);
            }
        }
    }
}
