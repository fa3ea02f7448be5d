pub mod cache;
pub mod controller;
pub mod geometry;
pub mod navigation;
pub mod page;
pub mod session;
pub mod state;
pub mod transition;

pub use controller::ViewerController;
