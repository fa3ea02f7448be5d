pub mod grid;
pub mod window;

pub use window::MainWindow;
