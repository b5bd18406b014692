//! Connection and movement rules
//!
//! Connection rules decide whether a node may be an edge's source or target.
//! Each chain is resolved once, on the first check, through the node's shape
//! and cached; later edits to the node's rule lists don't affect a chain that
//! has already been resolved.
//!
//! Move rules decide whether a node may be displaced by a delta. Node-local
//! rules run first, then the graph-wide rules shared by every node.

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

use crate::geometry::Anchor;
use crate::node::model::NodeModel;

/// Everything known about an attempted edge attachment
#[derive(Debug, Clone, Copy)]
pub struct ConnectAttempt<'a> {
    pub source: &'a NodeModel,
    pub target: &'a NodeModel,
    pub source_anchor: Option<&'a Anchor>,
    pub target_anchor: Option<&'a Anchor>,
    pub edge_id: Option<&'a str>,
}

type ConnectPredicate = dyn Fn(&NodeModel, &ConnectAttempt<'_>) -> bool;

/// A connection predicate and the message reported when it fails.
///
/// The predicate's first argument is the node that owns the rule.
#[derive(Clone)]
pub struct ConnectRule {
    pub message: String,
    validate: Rc<ConnectPredicate>,
}

impl ConnectRule {
    pub fn new(
        message: impl Into<String>,
        validate: impl Fn(&NodeModel, &ConnectAttempt<'_>) -> bool + 'static,
    ) -> Self {
        Self {
            message: message.into(),
            validate: Rc::new(validate),
        }
    }

    pub fn check(&self, owner: &NodeModel, attempt: &ConnectAttempt<'_>) -> bool {
        (self.validate)(owner, attempt)
    }
}

impl fmt::Debug for ConnectRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ConnectRule")
            .field("message", &self.message)
            .finish_non_exhaustive()
    }
}

/// Outcome of evaluating a connection rule chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectRuleResult {
    pub all_passed: bool,
    pub message: String,
}

impl ConnectRuleResult {
    pub fn passed() -> Self {
        Self {
            all_passed: true,
            message: String::new(),
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            all_passed: false,
            message: message.into(),
        }
    }
}

/// Run rules in order, stopping at the first failure
pub fn evaluate_connect_rules(
    rules: &[ConnectRule],
    owner: &NodeModel,
    attempt: &ConnectAttempt<'_>,
) -> ConnectRuleResult {
    for rule in rules {
        if !rule.check(owner, attempt) {
            tracing::debug!(node = %owner.id(), message = %rule.message, "connect rule failed");
            return ConnectRuleResult::failed(rule.message.clone());
        }
    }
    ConnectRuleResult::passed()
}

/// Answer of a single move rule
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveVerdict {
    /// Allow or veto the whole move
    Allow(bool),
    /// Decide each axis separately
    PerAxis { x: bool, y: bool },
}

impl From<bool> for MoveVerdict {
    fn from(allowed: bool) -> Self {
        MoveVerdict::Allow(allowed)
    }
}

type MovePredicate = dyn Fn(&NodeModel, f64, f64) -> MoveVerdict;

/// A predicate over a proposed `(dx, dy)` displacement of a node
#[derive(Clone)]
pub struct MoveRule(Rc<MovePredicate>);

impl MoveRule {
    pub fn new(rule: impl Fn(&NodeModel, f64, f64) -> MoveVerdict + 'static) -> Self {
        Self(Rc::new(rule))
    }

    pub fn evaluate(&self, node: &NodeModel, dx: f64, dy: f64) -> MoveVerdict {
        (self.0)(node, dx, dy)
    }
}

impl fmt::Debug for MoveRule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("MoveRule(..)")
    }
}

/// Per-axis movement permission
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AxisPermission {
    pub x: bool,
    pub y: bool,
}

impl AxisPermission {
    pub fn both() -> Self {
        Self { x: true, y: true }
    }

    pub fn none() -> Self {
        Self { x: false, y: false }
    }

    pub fn any(&self) -> bool {
        self.x || self.y
    }
}

/// Aggregate rules axis by axis.
///
/// `Allow(false)` or a pair denying both axes vetoes the whole move at once;
/// otherwise pairs AND-accumulate per axis.
pub fn allowed_axes(rules: &[MoveRule], node: &NodeModel, dx: f64, dy: f64) -> AxisPermission {
    let mut allowed = AxisPermission::both();
    for rule in rules {
        match rule.evaluate(node, dx, dy) {
            MoveVerdict::Allow(true) => {}
            MoveVerdict::Allow(false) | MoveVerdict::PerAxis { x: false, y: false } => {
                return AxisPermission::none();
            }
            MoveVerdict::PerAxis { x, y } => {
                allowed.x &= x;
                allowed.y &= y;
            }
        }
    }
    allowed
}

/// Aggregate rules over the whole displacement vector as one boolean.
///
/// A per-axis answer counts as allowing the vector unless it denies both axes.
pub fn allows_whole_move(rules: &[MoveRule], node: &NodeModel, dx: f64, dy: f64) -> bool {
    rules.iter().all(|rule| match rule.evaluate(node, dx, dy) {
        MoveVerdict::Allow(allowed) => allowed,
        MoveVerdict::PerAxis { x, y } => x || y,
    })
}

impl NodeModel {
    /// Node-local source rules (the default input of the shape's rule hook)
    pub fn source_rules(&self) -> &[ConnectRule] {
        &self.source_rules
    }

    /// Node-local target rules (the default input of the shape's rule hook)
    pub fn target_rules(&self) -> &[ConnectRule] {
        &self.target_rules
    }

    /// Add a node-local source rule; no effect once the chain has been checked
    pub fn add_source_rule(&mut self, rule: ConnectRule) {
        self.source_rules.push(rule);
    }

    /// Add a node-local target rule; no effect once the chain has been checked
    pub fn add_target_rule(&mut self, rule: ConnectRule) {
        self.target_rules.push(rule);
    }

    /// May this node be the source of an edge to `target`?
    pub fn is_allowed_connected_as_source(
        &self,
        target: &NodeModel,
        source_anchor: Option<&Anchor>,
        target_anchor: Option<&Anchor>,
        edge_id: Option<&str>,
    ) -> ConnectRuleResult {
        let rules = self
            .resolved_source_rules
            .get_or_init(|| self.shape.source_rules(self));
        let attempt = ConnectAttempt {
            source: self,
            target,
            source_anchor,
            target_anchor,
            edge_id,
        };
        evaluate_connect_rules(rules, self, &attempt)
    }

    /// May this node be the target of an edge from `source`?
    pub fn is_allowed_connected_as_target(
        &self,
        source: &NodeModel,
        source_anchor: Option<&Anchor>,
        target_anchor: Option<&Anchor>,
        edge_id: Option<&str>,
    ) -> ConnectRuleResult {
        let rules = self
            .resolved_target_rules
            .get_or_init(|| self.shape.target_rules(self));
        let attempt = ConnectAttempt {
            source,
            target: self,
            source_anchor,
            target_anchor,
            edge_id,
        };
        evaluate_connect_rules(rules, self, &attempt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphContext;
    use crate::node::data::NodeData;
    use std::cell::Cell;

    fn node(id: &str) -> NodeModel {
        NodeModel::new(
            NodeData::new("rect", 0.0, 0.0).with_id(id),
            GraphContext::new().shared(),
        )
    }

    #[test]
    fn test_empty_chain_passes() {
        let a = node("a");
        let b = node("b");
        assert_eq!(
            a.is_allowed_connected_as_source(&b, None, None, None),
            ConnectRuleResult::passed()
        );
    }

    #[test]
    fn test_rule_sees_owner_and_attempt() {
        let mut b = node("b");
        b.add_target_rule(ConnectRule::new("no self loops", |owner, attempt| {
            owner.id() == attempt.target.id() && attempt.source.id() != owner.id()
        }));
        let a = node("a");
        assert!(b.is_allowed_connected_as_target(&a, None, None, Some("e1")).all_passed);
        assert!(!b.is_allowed_connected_as_target(&b, None, None, None).all_passed);
    }

    #[test]
    fn test_chain_cached_after_first_check() {
        let mut a = node("a");
        let b = node("b");
        assert!(a.is_allowed_connected_as_source(&b, None, None, None).all_passed);

        a.add_source_rule(ConnectRule::new("late", |_, _| false));
        assert!(a.is_allowed_connected_as_source(&b, None, None, None).all_passed);
    }

    #[derive(Debug)]
    struct SelfCheckingShape;

    impl crate::node::shape::NodeShape for SelfCheckingShape {
        fn kind(&self) -> &str {
            "self-checking"
        }

        fn default_size(&self, config: &crate::node::config::NodeConfig) -> (f64, f64) {
            config.default_rect_size
        }

        fn default_anchors(&self, _node: &NodeModel) -> Vec<Anchor> {
            Vec::new()
        }

        fn source_rules(&self, node: &NodeModel) -> Vec<ConnectRule> {
            node.is_allowed_connected_as_source(node, None, None, None);
            Vec::new()
        }
    }

    #[test]
    #[should_panic]
    fn test_reentrant_chain_resolution_panics() {
        let a = NodeModel::with_shape(
            NodeData::new("self-checking", 0.0, 0.0),
            GraphContext::new().shared(),
            Rc::new(SelfCheckingShape),
        );
        let b = node("b");
        a.is_allowed_connected_as_source(&b, None, None, None);
    }

    #[test]
    fn test_allowed_axes_accumulates() {
        let n = node("a");
        let rules = vec![
            MoveRule::new(|_, _, _| MoveVerdict::PerAxis { x: true, y: false }),
            MoveRule::new(|_, _, _| MoveVerdict::Allow(true)),
        ];
        assert_eq!(
            allowed_axes(&rules, &n, 1.0, 1.0),
            AxisPermission { x: true, y: false }
        );
    }

    #[test]
    fn test_both_false_pair_vetoes_and_stops() {
        let n = node("a");
        let calls = Rc::new(Cell::new(0));
        let c = Rc::clone(&calls);
        let rules = vec![
            MoveRule::new(|_, _, _| MoveVerdict::PerAxis { x: false, y: false }),
            MoveRule::new(move |_, _, _| {
                c.set(c.get() + 1);
                MoveVerdict::Allow(true)
            }),
        ];
        assert_eq!(allowed_axes(&rules, &n, 1.0, 1.0), AxisPermission::none());
        assert_eq!(calls.get(), 0);
    }

    #[test]
    fn test_whole_move_treats_pair_as_one_answer() {
        let n = node("a");
        let partial = vec![MoveRule::new(|_, _, _| MoveVerdict::PerAxis { x: false, y: true })];
        assert!(allows_whole_move(&partial, &n, 1.0, 1.0));

        let veto = vec![MoveRule::new(|_, dx, _| (dx < 5.0).into())];
        assert!(allows_whole_move(&veto, &n, 1.0, 0.0));
        assert!(!allows_whole_move(&veto, &n, 10.0, 0.0));
    }
}
