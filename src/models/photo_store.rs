//! The session's ordered photo list, backing the viewer's data source.

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tracing::debug;

use super::viewer_item::{Photo, ViewerImage, ViewerItem};

pub struct PhotoStore {
    photos: RefCell<Vec<Rc<Photo>>>,
}

impl PhotoStore {
    pub fn new() -> Self {
        Self {
            photos: RefCell::new(Vec::new()),
        }
    }

    /// Replaces the session's photo list, in the given order.
    pub fn set_photos(&self, paths: Vec<PathBuf>) {
        debug!(count = paths.len(), "photo session loaded");
        *self.photos.borrow_mut() = paths.into_iter().map(|p| Rc::new(Photo::new(p))).collect();
    }

    pub fn len(&self) -> usize {
        self.photos.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.photos.borrow().is_empty()
    }

    pub fn photo_at(&self, index: usize) -> Option<Rc<Photo>> {
        self.photos.borrow().get(index).cloned()
    }

    pub fn paths(&self) -> Vec<PathBuf> {
        self.photos
            .borrow()
            .iter()
            .map(|p| p.path().to_path_buf())
            .collect()
    }

    /// The full ordered item list, rebuilt fresh on every call.
    pub fn items(&self) -> Vec<Rc<dyn ViewerItem>> {
        self.photos
            .borrow()
            .iter()
            .map(|p| p.clone() as Rc<dyn ViewerItem>)
            .collect()
    }

    /// Applies a finished decode to the photo with the matching path.
    ///
    /// Returns the photo's index so callers can refresh its cell or page.
    pub fn apply_image(&self, path: &Path, image: ViewerImage) -> Option<usize> {
        let photos = self.photos.borrow();
        let index = photos.iter().position(|p| p.path() == path)?;
        photos[index].set_image(image);
        Some(index)
    }
}

impl Default for PhotoStore {
    fn default() -> Self {
        Self::new()
    }
}
