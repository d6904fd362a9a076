//! Cart Store
//!
//! [`CartStore`] owns the authoritative [`CartState`]. Every operation runs the
//! same pipeline: apply the action, replace the state wholesale, persist it,
//! notify, then publish to subscribers. Ignored actions stop after the first
//! step and leave everything untouched.

use std::fmt;

use slotmap::{SlotMap, new_key_type};
use tracing::{debug, warn};

use crate::{
    cart::{CartAction, CartState, Ignored, Transition},
    lines::{NewCartLine, ProductId},
    notifications::{Notification, Notifier},
    persistence::CartPersistence,
    storage::Storage,
};

new_key_type! {
    /// Handle returned by [`CartStore::subscribe`].
    pub struct SubscriptionKey;
}

type Listener = Box<dyn FnMut(&CartState)>;

/// Single source of truth for the cart.
pub struct CartStore<S, N> {
    state: CartState,
    persistence: CartPersistence<S>,
    notifier: N,
    listeners: SlotMap<SubscriptionKey, Listener>,
}

impl<S: fmt::Debug, N: fmt::Debug> fmt::Debug for CartStore<S, N> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CartStore")
            .field("state", &self.state)
            .field("persistence", &self.persistence)
            .field("notifier", &self.notifier)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl<S: Storage, N: Notifier> CartStore<S, N> {
    /// Restore the cart from `persistence` and start tracking it.
    pub fn open(persistence: CartPersistence<S>, notifier: N) -> Self {
        let state = persistence.load();

        debug!(
            lines = state.len(),
            currency = state.currency().iso_alpha_code,
            "cart restored"
        );

        Self {
            state,
            persistence,
            notifier,
            listeners: SlotMap::with_key(),
        }
    }

    /// The current cart.
    pub fn state(&self) -> &CartState {
        &self.state
    }

    /// The persistence adapter the store writes to.
    pub fn persistence(&self) -> &CartPersistence<S> {
        &self.persistence
    }

    /// Add one unit of a product, appending a line if it is not in the cart yet.
    ///
    /// Returns `true` if the cart changed.
    pub fn add_item(&mut self, line: NewCartLine) -> bool {
        let notification = Notification::Added {
            name: line.name.clone(),
        };

        self.dispatch(&CartAction::Add(line), Some(notification))
    }

    /// Remove a product's line. Removing a product that is not in the cart does nothing.
    ///
    /// Returns `true` if the cart changed.
    pub fn remove_item(&mut self, id: &ProductId) -> bool {
        let notification = self.state.line(id).map(|line| Notification::Removed {
            name: line.name().to_string(),
        });

        self.dispatch(&CartAction::Remove(id.clone()), notification)
    }

    /// Replace a line's quantity. Quantities below one are ignored; the line stays.
    ///
    /// Returns `true` if the cart changed.
    pub fn update_quantity(&mut self, id: &ProductId, quantity: i64) -> bool {
        self.dispatch(
            &CartAction::UpdateQuantity {
                id: id.clone(),
                quantity,
            },
            None,
        )
    }

    /// Empty the cart and reset it to the default currency.
    ///
    /// Returns `true` if the cart changed, which is always the case.
    pub fn clear(&mut self) -> bool {
        let currency = self.persistence.default_currency();

        self.dispatch(&CartAction::Clear(currency), Some(Notification::Cleared))
    }

    /// Call `listener` with the new state after every change.
    pub fn subscribe(&mut self, listener: impl FnMut(&CartState) + 'static) -> SubscriptionKey {
        self.listeners.insert(Box::new(listener))
    }

    /// Stop calling a listener. Returns `false` if it was already removed.
    pub fn unsubscribe(&mut self, key: SubscriptionKey) -> bool {
        self.listeners.remove(key).is_some()
    }

    fn dispatch(&mut self, action: &CartAction, notification: Option<Notification>) -> bool {
        match self.state.apply(action) {
            Transition::Changed(next) => {
                self.state = next;

                self.persistence.save(&self.state);

                if let Some(notification) = notification {
                    self.notifier.notify(&notification);
                }

                for listener in self.listeners.values_mut() {
                    listener(&self.state);
                }

                true
            }
            Transition::Ignored(reason) => {
                match &reason {
                    Ignored::QuantityBelowOne(_) | Ignored::NotInCart(_) => {
                        debug!("cart action ignored: {reason}");
                    }
                    _ => warn!("cart action ignored: {reason}"),
                }

                false
            }
        }
    }
}
