//! The viewer's item contract and the photo-backed implementation.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use gdk4::Texture;

/// A decoded raster image ready for display.
///
/// `width`/`height` are the intrinsic pixel size of the original photo; the
/// texture itself may be a capped-resolution decode with the same aspect.
#[derive(Clone)]
pub struct ViewerImage {
    pub texture: Texture,
    pub width: u32,
    pub height: u32,
}

/// One unit of displayable media with a stable identity.
///
/// Identity is immutable for the lifetime of the item; two items are the
/// same logical item iff their identities are equal. The image is optional
/// and may arrive after the item was first handed to the viewer.
pub trait ViewerItem {
    fn id(&self) -> &str;
    fn image(&self) -> Option<ViewerImage>;
}

/// A photo on disk. Identity is the path string; the image is populated by
/// the background decode queue once it finishes.
pub struct Photo {
    id: String,
    path: PathBuf,
    // Written only from the main loop; the viewer rebinds pages on lookup,
    // so a decode landing between lookups is picked up on the next one.
    image: RefCell<Option<ViewerImage>>,
}

impl Photo {
    pub fn new(path: PathBuf) -> Self {
        Self {
            id: path.to_string_lossy().into_owned(),
            path,
            image: RefCell::new(None),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn set_image(&self, image: ViewerImage) {
        *self.image.borrow_mut() = Some(image);
    }

    pub fn has_image(&self) -> bool {
        self.image.borrow().is_some()
    }
}

impl ViewerItem for Photo {
    fn id(&self) -> &str {
        &self.id
    }

    fn image(&self) -> Option<ViewerImage> {
        self.image.borrow().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::test_image;

    #[test]
    fn identity_is_the_path_string() {
        let photo = Photo::new(PathBuf::from("/pics/a.jpg"));
        assert_eq!(photo.id(), "/pics/a.jpg");
        assert_eq!(photo.path(), Path::new("/pics/a.jpg"));
    }

    #[test]
    fn image_arrival_does_not_change_identity() {
        let photo = Photo::new(PathBuf::from("/pics/a.jpg"));
        assert!(photo.image().is_none());

        photo.set_image(test_image(40, 30));
        assert!(photo.has_image());
        assert_eq!(photo.id(), "/pics/a.jpg");

        let image = photo.image().unwrap();
        assert_eq!((image.width, image.height), (40, 30));
    }
}
