//! Services a node borrows from its owning graph
//!
//! The graph container itself (node storage, edges, z-order operations) lives
//! outside this crate. [`GraphContext`] is the slice of it every node needs:
//! id generation, the overlap policy, the canonical graph-wide move-rule
//! list, the event bus, the theme and the shape registry. Nodes hold it by
//! `Rc`, so all nodes of a graph observe the same rule list and listeners.

pub mod events;

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use serde_json::Value;

use crate::node::config::NodeConfig;
use crate::node::rules::MoveRule;
use crate::node::shape::{NodeShape, ShapeRegistry};
use crate::theme::Theme;

pub use events::EventBus;

/// How overlapping nodes are ordered
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OverlapMode {
    /// Every node sits at z-index 1; selection decides what is on top
    #[default]
    Default,
    /// Each new node gets a higher z-index than the previous one
    Increase,
}

/// Shared per-graph services consumed by nodes
pub struct GraphContext {
    config: NodeConfig,
    theme: Theme,
    overlap_mode: OverlapMode,
    shapes: ShapeRegistry,
    move_rules: RefCell<Vec<MoveRule>>,
    events: EventBus,
    id_generator: Option<Box<dyn Fn() -> String>>,
    next_id: Cell<u64>,
    next_z_index: Cell<i64>,
}

impl Default for GraphContext {
    fn default() -> Self {
        Self {
            config: NodeConfig::default(),
            theme: Theme::default(),
            overlap_mode: OverlapMode::default(),
            shapes: ShapeRegistry::with_builtins(),
            move_rules: RefCell::new(Vec::new()),
            events: EventBus::new(),
            id_generator: None,
            next_id: Cell::new(0),
            next_z_index: Cell::new(0),
        }
    }
}

impl GraphContext {
    /// Create a context with default config, theme and built-in shapes
    pub fn new() -> Self {
        Self::default()
    }

    /// Finish configuration and hand out the shared handle
    pub fn shared(self) -> Rc<Self> {
        Rc::new(self)
    }

    pub fn with_config(mut self, config: NodeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_overlap_mode(mut self, mode: OverlapMode) -> Self {
        self.overlap_mode = mode;
        self
    }

    /// Register a custom shape under `kind`, replacing any previous one
    pub fn with_shape(mut self, kind: impl Into<String>, shape: Rc<dyn NodeShape>) -> Self {
        self.shapes.register(kind, shape);
        self
    }

    /// Replace the default sequential id generator
    pub fn with_id_generator(mut self, generator: impl Fn() -> String + 'static) -> Self {
        self.id_generator = Some(Box::new(generator));
        self
    }

    pub fn config(&self) -> &NodeConfig {
        &self.config
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    pub fn overlap_mode(&self) -> OverlapMode {
        self.overlap_mode
    }

    pub fn shapes(&self) -> &ShapeRegistry {
        &self.shapes
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Generate a graph-unique id
    pub fn create_id(&self) -> String {
        if let Some(generator) = &self.id_generator {
            return generator();
        }
        let n = self.next_id.get() + 1;
        self.next_id.set(n);
        format!("id-{}", n)
    }

    /// Z-index for a node created without one
    pub fn initial_z_index(&self) -> i64 {
        match self.overlap_mode {
            OverlapMode::Default => 1,
            OverlapMode::Increase => {
                let z = self.next_z_index.get() + 1;
                self.next_z_index.set(z);
                z
            }
        }
    }

    /// Append to the graph-wide move rules; visible to every node immediately
    pub fn add_move_rule(&self, rule: MoveRule) {
        self.move_rules.borrow_mut().push(rule);
    }

    /// Snapshot of the graph-wide move rules
    pub fn move_rules(&self) -> Vec<MoveRule> {
        self.move_rules.borrow().clone()
    }

    pub fn clear_move_rules(&self) {
        self.move_rules.borrow_mut().clear();
    }

    /// Register an event listener
    pub fn on(&self, event: impl Into<String>, listener: impl Fn(&Value) + 'static) {
        self.events.on(event, listener);
    }

    /// Synchronously notify listeners of `event`
    pub fn emit(&self, event: &str, payload: Value) {
        self.events.emit(event, &payload);
    }
}

impl fmt::Debug for GraphContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GraphContext")
            .field("overlap_mode", &self.overlap_mode)
            .field("shapes", &self.shapes)
            .field("move_rules", &self.move_rules.borrow().len())
            .field("events", &self.events)
            .finish()
    }
}
