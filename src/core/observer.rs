//! Outside-click observer
//!
//! Dropdowns close when the user clicks anywhere that is not their own toggle
//! or list. Instead of each dropdown listening on a global surface, the host
//! owns a `ClickDispatcher` and hands it to every dropdown, which subscribes on
//! mount and unsubscribes on unmount.

use std::rc::Rc;

/// Identifier of a dropdown within one table
pub type DropdownId = usize;

/// What a pointer click landed on, resolved by hit-testing the last frame
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClickTarget {
    /// The ▼ toggle of a dropdown
    Toggle(DropdownId),
    /// The search box inside an open list
    SearchBox(DropdownId),
    /// A list entry (index 0 is "Clear")
    ListItem(DropdownId, usize),
    /// Inside an open list but not on an entry (border, padding)
    List(DropdownId),
    /// Anything else
    Outside,
}

impl ClickTarget {
    /// Dropdown this click belongs to, if any
    pub fn owner(&self) -> Option<DropdownId> {
        match *self {
            Self::Toggle(id) | Self::SearchBox(id) | Self::ListItem(id, _) | Self::List(id) => {
                Some(id)
            }
            Self::Outside => None,
        }
    }

    /// True when the click is within the toggle or the list of `id`
    pub fn is_inside(&self, id: DropdownId) -> bool {
        self.owner() == Some(id)
    }
}

/// Handler invoked for every dispatched click
pub type ClickHandler = Rc<dyn Fn(&ClickTarget)>;

/// Capability handed to dropdowns so they can listen for clicks outside themselves
pub trait OutsideClickObserver {
    /// Register a handler. Returns false (and keeps the existing handler) if
    /// `id` is already subscribed.
    fn subscribe(&mut self, id: DropdownId, handler: ClickHandler) -> bool;

    /// Remove the handler for `id`. Returns false if nothing was registered.
    fn unsubscribe(&mut self, id: DropdownId) -> bool;
}

/// Host-side observer that fans each click out to the subscribed dropdowns
#[derive(Default)]
pub struct ClickDispatcher {
    listeners: Vec<(DropdownId, ClickHandler)>,
}

impl ClickDispatcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn is_subscribed(&self, id: DropdownId) -> bool {
        self.listeners.iter().any(|(existing, _)| *existing == id)
    }

    /// Invoke every handler with `target`, in subscription order
    pub fn dispatch(&self, target: &ClickTarget) {
        for (_, handler) in &self.listeners {
            handler(target);
        }
    }
}

impl OutsideClickObserver for ClickDispatcher {
    fn subscribe(&mut self, id: DropdownId, handler: ClickHandler) -> bool {
        if self.is_subscribed(id) {
            tracing::debug!(id, "Ignoring duplicate click subscription");
            return false;
        }
        self.listeners.push((id, handler));
        true
    }

    fn unsubscribe(&mut self, id: DropdownId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(existing, _)| *existing != id);
        before != self.listeners.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn test_click_target_ownership() {
        assert!(ClickTarget::Toggle(1).is_inside(1));
        assert!(ClickTarget::ListItem(1, 3).is_inside(1));
        assert!(ClickTarget::SearchBox(1).is_inside(1));
        assert!(!ClickTarget::Toggle(2).is_inside(1));
        assert!(!ClickTarget::Outside.is_inside(1));
    }

    #[test]
    fn test_duplicate_subscription_rejected() {
        let mut dispatcher = ClickDispatcher::new();
        assert!(dispatcher.subscribe(0, Rc::new(|_| {})));
        assert!(!dispatcher.subscribe(0, Rc::new(|_| {})));
        assert_eq!(dispatcher.listener_count(), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut dispatcher = ClickDispatcher::new();
        dispatcher.subscribe(0, Rc::new(|_| {}));
        dispatcher.subscribe(1, Rc::new(|_| {}));
        assert!(dispatcher.unsubscribe(0));
        assert!(!dispatcher.unsubscribe(0));
        assert!(!dispatcher.is_subscribed(0));
        assert!(dispatcher.is_subscribed(1));
    }

    #[test]
    fn test_dispatch_reaches_every_listener() {
        let hits = Rc::new(Cell::new(0));
        let mut dispatcher = ClickDispatcher::new();
        for id in 0..3 {
            let hits = Rc::clone(&hits);
            dispatcher.subscribe(id, Rc::new(move |_| hits.set(hits.get() + 1)));
        }
        dispatcher.dispatch(&ClickTarget::Outside);
        assert_eq!(hits.get(), 3);
    }
}
