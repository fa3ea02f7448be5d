mod photo_store;
mod viewer_item;

pub use photo_store::PhotoStore;
pub use viewer_item::{Photo, ViewerImage, ViewerItem};
