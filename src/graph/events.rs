//! Synchronous event bus used for node notifications

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

/// Emitted after `set_property`/`set_properties` with `{id, keys, preProperties, properties}`
pub const NODE_PROPERTIES_CHANGE: &str = "node:properties-change";
/// Emitted when a label record is appended with `{nodeId, labelId}`
pub const LABEL_ADD: &str = "label:add";
/// Emitted when a label record is updated with `{nodeId, labelId}`
pub const LABEL_UPDATE: &str = "label:update";
/// Emitted when a label record is removed or cleared with `{nodeId, labelId}`
pub const LABEL_DELETE: &str = "label:delete";

type Listener = Rc<dyn Fn(&Value)>;

/// Listeners keyed by event name, invoked in registration order.
///
/// Emission snapshots the listener list first, so a listener may register
/// more listeners or emit further events while it runs.
#[derive(Default)]
pub struct EventBus {
    listeners: RefCell<Vec<(String, Listener)>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a listener for `event`
    pub fn on(&self, event: impl Into<String>, listener: impl Fn(&Value) + 'static) {
        self.listeners
            .borrow_mut()
            .push((event.into(), Rc::new(listener)));
    }

    /// Invoke every listener registered for `event`, returning how many ran
    pub fn emit(&self, event: &str, payload: &Value) -> usize {
        let matching: Vec<Listener> = self
            .listeners
            .borrow()
            .iter()
            .filter(|(name, _)| name == event)
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        tracing::debug!(event, listeners = matching.len(), "emit");
        for listener in &matching {
            listener(payload);
        }
        matching.len()
    }

    pub fn listener_count(&self, event: &str) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|(name, _)| name == event)
            .count()
    }
}

impl fmt::Debug for EventBus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listeners.borrow().len())
            .finish()
    }
}
