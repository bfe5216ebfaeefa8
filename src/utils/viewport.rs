// SPDX-License-Identifier: MIT
// SPDX-FileCopyrightText: 2025 Alexander Minges

//! Observable viewport size with explicit subscribe/unsubscribe.
//!
//! The window shell feeds the tracker once per frame; listeners only hear
//! about real changes. Dropping a [`Subscription`] removes its listener.

use std::cell::RefCell;
use std::rc::{Rc, Weak};

/// Widths at or below this use the stacked single-column layout.
pub const COMPACT_BREAKPOINT: f32 = 768.0;

/// Logical size of the window's content area.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
}

impl ViewportSize {
    pub fn new(width: f32, height: f32) -> Self {
        Self { width, height }
    }

    /// Layout mode implied by this width.
    pub fn layout(&self) -> LayoutMode {
        if self.width <= COMPACT_BREAKPOINT {
            LayoutMode::Compact
        } else {
            LayoutMode::Wide
        }
    }
}

/// Two-mode responsive layout.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LayoutMode {
    /// Preview stacked above the form.
    Compact,
    /// Form and preview side by side.
    #[default]
    Wide,
}

pub type Listener = Box<dyn FnMut(ViewportSize)>;

/// Source of viewport sizes that components can observe.
pub trait ViewportProvider {
    /// Most recently observed size.
    fn current(&self) -> ViewportSize;

    /// Register a listener; it stays registered until the returned guard is dropped.
    fn subscribe(&self, listener: Listener) -> Subscription;
}

#[derive(Default)]
struct Registry {
    size: ViewportSize,
    next_id: u64,
    listeners: Vec<(u64, Listener)>,
    /// Set while listeners are out of the registry being notified.
    notifying: bool,
    /// Subscriptions dropped during notification.
    removed: Vec<u64>,
}

/// Viewport provider fed by the window shell.
#[derive(Clone, Default)]
pub struct ViewportTracker {
    inner: Rc<RefCell<Registry>>,
}

impl ViewportTracker {
    pub fn new(initial: ViewportSize) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Registry {
                size: initial,
                ..Default::default()
            })),
        }
    }

    /// Record a new size, notifying listeners only when it changed.
    pub fn observe(&self, size: ViewportSize) {
        let mut listeners = {
            let mut registry = self.inner.borrow_mut();
            if registry.size == size {
                return;
            }
            registry.size = size;
            registry.notifying = true;
            std::mem::take(&mut registry.listeners)
        };

        for (_, listener) in listeners.iter_mut() {
            listener(size);
        }

        let dropped = {
            let mut registry = self.inner.borrow_mut();
            registry.notifying = false;
            let removed = std::mem::take(&mut registry.removed);
            // Listeners registered while notifying were pushed to the registry meanwhile.
            let added = std::mem::take(&mut registry.listeners);
            let (dropped, kept): (Vec<_>, Vec<_>) = listeners
                .into_iter()
                .chain(added)
                .partition(|(id, _)| removed.contains(id));
            registry.listeners = kept;
            dropped
        };
        // Released outside the borrow so guards captured by listeners can unsubscribe.
        drop(dropped);
    }

    #[cfg(test)]
    fn listener_count(&self) -> usize {
        self.inner.borrow().listeners.len()
    }
}

impl ViewportProvider for ViewportTracker {
    fn current(&self) -> ViewportSize {
        self.inner.borrow().size
    }

    fn subscribe(&self, listener: Listener) -> Subscription {
        let mut registry = self.inner.borrow_mut();
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, listener));
        Subscription {
            id,
            registry: Rc::downgrade(&self.inner),
        }
    }
}

/// Guard tying a listener's lifetime to its owner.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    id: u64,
    registry: Weak<RefCell<Registry>>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(registry) = self.registry.upgrade()
            && let Ok(mut registry) = registry.try_borrow_mut()
        {
            if registry.notifying {
                registry.removed.push(self.id);
            } else {
                registry.listeners.retain(|(id, _)| *id != self.id);
            }
        }
    }
}
