//! Shared fixtures for unit tests.

use std::cell::RefCell;
use std::rc::Rc;

use gdk4::{MemoryFormat, MemoryTexture};
use gtk4::prelude::*;

use crate::models::{ViewerImage, ViewerItem};

/// A solid-color in-memory image of the given intrinsic size.
pub fn test_image(width: u32, height: u32) -> ViewerImage {
    let data = vec![0x40u8; (width * height * 4) as usize];
    let bytes = glib::Bytes::from_owned(data);
    let texture = MemoryTexture::new(
        width as i32,
        height as i32,
        MemoryFormat::R8g8b8a8,
        &bytes,
        (width * 4) as usize,
    );
    ViewerImage {
        texture: texture.upcast(),
        width,
        height,
    }
}

/// A viewer item with a fixed identity and a settable image.
pub struct FakeItem {
    id: String,
    image: RefCell<Option<ViewerImage>>,
}

impl FakeItem {
    /// An item whose image has not been decoded yet.
    pub fn bare(id: &str) -> Rc<Self> {
        Rc::new(Self {
            id: id.to_owned(),
            image: RefCell::new(None),
        })
    }

    /// An item with a small decoded image.
    pub fn with_image(id: &str) -> Rc<Self> {
        let item = Self::bare(id);
        item.set_image(test_image(40, 30));
        item
    }

    pub fn set_image(&self, image: ViewerImage) {
        *self.image.borrow_mut() = Some(image);
    }
}

impl ViewerItem for FakeItem {
    fn id(&self) -> &str {
        &self.id
    }

    fn image(&self) -> Option<ViewerImage> {
        self.image.borrow().clone()
    }
}

pub fn as_items(list: &[Rc<FakeItem>]) -> Vec<Rc<dyn ViewerItem>> {
    list.iter()
        .map(|item| item.clone() as Rc<dyn ViewerItem>)
        .collect()
}
