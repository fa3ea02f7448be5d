//! Neighbor resolution over the session's ordered item list.
//!
//! Pure lookups by identity: no wraparound, and an identity missing from
//! the list (an inconsistent data source) resolves to `None` rather than
//! an error, so the viewer simply stops paging.

use std::rc::Rc;

use crate::models::ViewerItem;

/// Position of `id` in `items` by identity equality.
pub fn position_of(id: &str, items: &[Rc<dyn ViewerItem>]) -> Option<usize> {
    items.iter().position(|item| item.id() == id)
}

/// The item preceding `current_id`, if any.
pub fn previous_item(
    current_id: &str,
    items: &[Rc<dyn ViewerItem>],
) -> Option<Rc<dyn ViewerItem>> {
    let position = position_of(current_id, items)?;
    if position > 0 {
        Some(items[position - 1].clone())
    } else {
        None
    }
}

/// The item following `current_id`, if any.
pub fn next_item(current_id: &str, items: &[Rc<dyn ViewerItem>]) -> Option<Rc<dyn ViewerItem>> {
    let position = position_of(current_id, items)?;
    if position + 1 < items.len() {
        Some(items[position + 1].clone())
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::{as_items, FakeItem};

    fn three() -> Vec<Rc<dyn ViewerItem>> {
        as_items(&[FakeItem::bare("p1"), FakeItem::bare("p2"), FakeItem::bare("p3")])
    }

    #[test]
    fn next_and_previous_walk_the_sequence() {
        let items = three();
        assert_eq!(next_item("p1", &items).unwrap().id(), "p2");
        assert_eq!(next_item("p2", &items).unwrap().id(), "p3");
        assert_eq!(previous_item("p3", &items).unwrap().id(), "p2");
        assert_eq!(previous_item("p2", &items).unwrap().id(), "p1");
    }

    #[test]
    fn no_wraparound_at_the_ends() {
        let items = three();
        assert!(previous_item("p1", &items).is_none());
        assert!(next_item("p3", &items).is_none());
    }

    #[test]
    fn absent_identity_is_a_silent_no_op() {
        let items = three();
        assert!(previous_item("missing", &items).is_none());
        assert!(next_item("missing", &items).is_none());
        assert!(position_of("missing", &items).is_none());
    }

    #[test]
    fn next_then_previous_is_the_identity_at_interior_positions() {
        let items = three();
        for id in ["p1", "p2"] {
            let forward = next_item(id, &items).unwrap();
            let back = previous_item(forward.id(), &items).unwrap();
            assert_eq!(back.id(), id);
        }
    }

    #[test]
    fn single_item_list_has_no_neighbors() {
        let items = as_items(&[FakeItem::bare("only")]);
        assert!(previous_item("only", &items).is_none());
        assert!(next_item("only", &items).is_none());
    }
}
