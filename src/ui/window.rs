// Main window: photo grid with the full-screen viewer layered on top.

use gdk4::Display;
use gtk4::prelude::*;
use gtk4::{
    Application, ApplicationWindow, CssProvider, Overlay, Settings,
    STYLE_PROVIDER_PRIORITY_APPLICATION,
};
use std::cell::{Cell, RefCell};
use std::path::Path;
use std::rc::{Rc, Weak};
use tracing::{error, info};

use super::grid::PhotoGrid;
use crate::decode_queue::{texture_from_rgba, DecodeQueue, DecodedPhoto};
use crate::models::{PhotoStore, ViewerImage};
use crate::scanner;
use crate::viewer::ViewerController;

const FALLBACK_CSS: &str = r#"
window {
    background-color: #111111;
}

.photo-cell {
    background-color: #1d1d1d;
}

.viewer-dim {
    background-color: black;
}

.viewer-pager {
    background-color: black;
}
"#;

fn load_css() {
    let provider = CssProvider::new();
    provider.load_from_string(FALLBACK_CSS);
    if let Some(display) = Display::default() {
        gtk4::style_context_add_provider_for_display(
            &display,
            &provider,
            STYLE_PROVIDER_PRIORITY_APPLICATION,
        );
    }
}

pub struct MainWindow {
    self_weak: RefCell<Weak<MainWindow>>,
    window: ApplicationWindow,
    grid: Rc<PhotoGrid>,
    viewer: ViewerController,
    store: Rc<PhotoStore>,
    decode_queue: RefCell<Option<DecodeQueue>>,
    // A photo that was activated before its decode finished.
    pending_present: Cell<Option<usize>>,
}

impl MainWindow {
    pub fn new(app: &Application, initial_path: Option<&Path>) -> Rc<Self> {
        load_css();
        if let Some(settings) = Settings::default() {
            settings.set_gtk_application_prefer_dark_theme(true);
        }

        let window = ApplicationWindow::builder()
            .application(app)
            .title("pictor")
            .default_width(1200)
            .default_height(800)
            .build();

        let grid = PhotoGrid::new();
        let viewer = ViewerController::new();

        let overlay = Overlay::new();
        overlay.set_child(Some(&grid.widget()));
        overlay.add_overlay(&viewer.widget());
        window.set_child(Some(&overlay));

        let this = Rc::new(Self {
            self_weak: RefCell::new(Weak::new()),
            window,
            grid,
            viewer,
            store: Rc::new(PhotoStore::new()),
            decode_queue: RefCell::new(None),
            pending_present: Cell::new(None),
        });
        *this.self_weak.borrow_mut() = Rc::downgrade(&this);

        this.wire_viewer(&overlay);
        this.wire_grid();
        this.start_decode_queue();

        match scanner::resolve_scan_dir(initial_path) {
            Ok(dir) => this.load_directory(&dir),
            Err(err) => error!(%err, "no directory to scan"),
        }

        this
    }

    pub fn present(&self) {
        self.window.present();
    }

    fn wire_viewer(&self, overlay: &Overlay) {
        let store = self.store.clone();
        self.viewer.set_items_provider(move || store.items());

        let grid = self.grid.clone();
        let overlay = overlay.clone();
        self.viewer
            .set_cell_frame_provider(move |index| grid.cell_frame(index, &overlay));

        let grid = self.grid.clone();
        self.viewer
            .set_cell_visibility(move |index, visible| grid.set_cell_visible(index, visible));

        // Keep the dismiss target on screen while paging.
        let grid = self.grid.clone();
        self.viewer
            .connect_index_changed(move |index| grid.scroll_to(index));

        let weak = self.self_weak.borrow().clone();
        self.viewer.connect_dismissed(move || {
            if let Some(window) = weak.upgrade() {
                window.grid.widget().grab_focus();
            }
        });
    }

    fn wire_grid(&self) {
        let weak = self.self_weak.borrow().clone();
        self.grid.connect_photo_activated(move |index| {
            if let Some(window) = weak.upgrade() {
                window.open_photo(index);
            }
        });
    }

    fn start_decode_queue(&self) {
        let weak = self.self_weak.borrow().clone();
        let queue = DecodeQueue::new(move |decoded| {
            if let Some(window) = weak.upgrade() {
                window.handle_decoded(decoded);
            }
        });
        *self.decode_queue.borrow_mut() = Some(queue);
    }

    fn load_directory(&self, dir: &Path) {
        let paths = match scanner::scan_photos(dir) {
            Ok(paths) => paths,
            Err(err) => {
                error!(%err, "directory scan failed");
                return;
            }
        };
        info!(dir = ?dir, count = paths.len(), "loading photos");

        self.grid.set_photos(paths.len());
        self.store.set_photos(paths);
        if let Some(queue) = self.decode_queue.borrow().as_ref() {
            for path in self.store.paths() {
                queue.request(&path);
            }
        }
    }

    fn open_photo(&self, index: usize) {
        let Some(photo) = self.store.photo_at(index) else {
            return;
        };
        if photo.has_image() {
            self.viewer.present(index);
            return;
        }
        // Not decoded yet: present as soon as the decode lands.
        self.pending_present.set(Some(index));
        if let Some(queue) = self.decode_queue.borrow().as_ref() {
            queue.request(photo.path());
        }
    }

    fn handle_decoded(&self, decoded: DecodedPhoto) {
        let Some(texture) = texture_from_rgba(&decoded.rgba, decoded.width, decoded.height) else {
            return;
        };
        let image = ViewerImage {
            texture: texture.clone(),
            width: decoded.orig_width,
            height: decoded.orig_height,
        };
        let Some(index) = self.store.apply_image(&decoded.path, image) else {
            return;
        };
        self.grid.set_thumbnail(index, &texture);

        if self.viewer.focused_index() == Some(index) {
            self.viewer.refresh_focused();
        }
        if self.pending_present.get() == Some(index) {
            self.pending_present.set(None);
            self.viewer.present(index);
        }
    }
}
