//! The photo grid the viewer zooms out of.

use std::cell::RefCell;
use std::rc::Rc;

use gdk4::Texture;
use gtk4::graphene;
use gtk4::prelude::*;
use gtk4::{ContentFit, FlowBox, Picture, PolicyType, ScrolledWindow, SelectionMode, Widget};

use crate::viewer::geometry::Rectf;

const CELL_SIZE: i32 = 168;
const CELL_SPACING: u32 = 4;

pub struct PhotoGrid {
    scroller: ScrolledWindow,
    flow: FlowBox,
    on_activated: RefCell<Option<Rc<dyn Fn(usize)>>>,
}

impl PhotoGrid {
    pub fn new() -> Rc<Self> {
        let flow = FlowBox::new();
        flow.set_selection_mode(SelectionMode::None);
        flow.set_activate_on_single_click(true);
        flow.set_homogeneous(true);
        flow.set_column_spacing(CELL_SPACING);
        flow.set_row_spacing(CELL_SPACING);
        flow.set_valign(gtk4::Align::Start);

        let scroller = ScrolledWindow::builder()
            .hscrollbar_policy(PolicyType::Never)
            .vscrollbar_policy(PolicyType::Automatic)
            .hexpand(true)
            .vexpand(true)
            .child(&flow)
            .build();

        let grid = Rc::new(Self {
            scroller,
            flow,
            on_activated: RefCell::new(None),
        });

        let weak = Rc::downgrade(&grid);
        grid.flow.connect_child_activated(move |_, child| {
            let Some(grid) = weak.upgrade() else { return };
            let index = child.index();
            if index < 0 {
                return;
            }
            let cb = grid.on_activated.borrow().clone();
            if let Some(cb) = cb {
                cb(index as usize);
            }
        });

        grid
    }

    pub fn widget(&self) -> ScrolledWindow {
        self.scroller.clone()
    }

    pub fn connect_photo_activated<F: Fn(usize) + 'static>(&self, f: F) {
        *self.on_activated.borrow_mut() = Some(Rc::new(f));
    }

    /// Rebuilds the grid with `count` placeholder cells. Thumbnails arrive
    /// later via `set_thumbnail` as decodes complete.
    pub fn set_photos(&self, count: usize) {
        while let Some(child) = self.flow.first_child() {
            self.flow.remove(&child);
        }
        for _ in 0..count {
            let cell = Picture::new();
            cell.set_content_fit(ContentFit::Cover);
            cell.set_size_request(CELL_SIZE, CELL_SIZE);
            cell.add_css_class("photo-cell");
            self.flow.append(&cell);
        }
    }

    pub fn set_thumbnail(&self, index: usize, texture: &Texture) {
        if let Some(cell) = self.cell_picture(index) {
            cell.set_paintable(Some(texture));
        }
    }

    /// The cell's frame in `relative_to` coordinates, or `None` when the
    /// cell is missing or scrolled out of the visible viewport.
    pub fn cell_frame(&self, index: usize, relative_to: &impl IsA<Widget>) -> Option<Rectf> {
        let child = self.flow.child_at_index(index as i32)?;

        let in_scroller = child.compute_bounds(&self.scroller)?;
        let viewport = graphene::Rect::new(
            0.0,
            0.0,
            self.scroller.width() as f32,
            self.scroller.height() as f32,
        );
        in_scroller.intersection(&viewport)?;

        let bounds = child.compute_bounds(relative_to.upcast_ref())?;
        Some(Rectf::new(
            bounds.x() as f64,
            bounds.y() as f64,
            bounds.width() as f64,
            bounds.height() as f64,
        ))
    }

    /// Hides or restores a cell while the viewer animates over it.
    pub fn set_cell_visible(&self, index: usize, visible: bool) {
        if let Some(child) = self.flow.child_at_index(index as i32) {
            child.set_opacity(if visible { 1.0 } else { 0.0 });
        }
    }

    /// Scrolls so the cell at `index` is within the viewport, roughly
    /// centered. Keeps the dismiss target on screen after paging.
    pub fn scroll_to(&self, index: usize) {
        let Some(child) = self.flow.child_at_index(index as i32) else {
            return;
        };
        let Some(bounds) = child.compute_bounds(&self.flow) else {
            return;
        };
        let vadj = self.scroller.vadjustment();
        let target = bounds.y() as f64 - (vadj.page_size() - bounds.height() as f64) / 2.0;
        vadj.set_value(target.clamp(vadj.lower(), (vadj.upper() - vadj.page_size()).max(0.0)));
    }

    fn cell_picture(&self, index: usize) -> Option<Picture> {
        self.flow
            .child_at_index(index as i32)?
            .child()
            .and_downcast::<Picture>()
    }
}
