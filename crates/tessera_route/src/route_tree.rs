//! Route trees representing physical wiring solutions.
//!
//! A [`RouteTree`] describes the routing of a single net: a tree rooted at
//! the driver's site pin, passing through wires and pips, branching where
//! the net fans out, and terminating in sink site pins.

use serde::{Deserialize, Serialize};
use tessera_arch::{PipId, SiteId, WireId};

/// A routing resource referenced by one node of a route tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RouteResource {
    /// The driver's site pin (always the tree root).
    SourcePin(SiteId),
    /// A routing wire in the interconnect fabric.
    Wire(WireId),
    /// A programmable interconnect point connecting two wires.
    Pip(PipId),
    /// A sink's site pin (always a leaf).
    SinkPin(SiteId),
}

/// A node in a route tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteNode {
    /// The routing resource at this node.
    pub resource: RouteResource,
    /// Child nodes (branches) in the route tree.
    pub children: Vec<RouteNode>,
}

impl RouteNode {
    /// Creates a leaf node for the given resource.
    pub fn new(resource: RouteResource) -> Self {
        Self {
            resource,
            children: Vec::new(),
        }
    }

    /// Returns the total number of nodes in this subtree (including self).
    pub fn subtree_size(&self) -> usize {
        1 + self
            .children
            .iter()
            .map(|c| c.subtree_size())
            .sum::<usize>()
    }

    /// Returns the depth of this subtree (longest path from self to leaf).
    pub fn depth(&self) -> usize {
        1 + self.children.iter().map(|c| c.depth()).max().unwrap_or(0)
    }

    fn collect_wires(&self, wires: &mut Vec<WireId>) {
        if let RouteResource::Wire(w) = self.resource {
            wires.push(w);
        }
        for child in &self.children {
            child.collect_wires(wires);
        }
    }

    fn collect_pips(&self, pips: &mut Vec<PipId>) {
        if let RouteResource::Pip(p) = self.resource {
            pips.push(p);
        }
        for child in &self.children {
            child.collect_pips(pips);
        }
    }

    fn collect_sinks(&self, sinks: &mut Vec<SiteId>) {
        if let RouteResource::SinkPin(s) = self.resource {
            sinks.push(s);
        }
        for child in &self.children {
            child.collect_sinks(sinks);
        }
    }
}

/// A routing solution for a single net, rooted at the driver's site pin.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouteTree {
    /// The root node (driver side) of the route tree.
    pub root: RouteNode,
}

impl RouteTree {
    /// Creates an empty tree rooted at the driver's site pin.
    pub fn new(source: SiteId) -> Self {
        Self {
            root: RouteNode::new(RouteResource::SourcePin(source)),
        }
    }

    /// Grafts one driver-to-sink path onto the tree, reusing the longest
    /// existing prefix so fanout branches share their common segment.
    ///
    /// `path` holds the resources after the root, in driver-to-sink order.
    pub fn insert_path(&mut self, path: &[RouteResource]) {
        let mut node = &mut self.root;
        for &resource in path {
            let position = node.children.iter().position(|c| c.resource == resource);
            let index = match position {
                Some(index) => index,
                None => {
                    node.children.push(RouteNode::new(resource));
                    node.children.len() - 1
                }
            };
            node = &mut node.children[index];
        }
    }

    /// Returns the total number of routing resources in this tree.
    pub fn resource_count(&self) -> usize {
        self.root.subtree_size()
    }

    /// Returns the depth of the routing tree (longest root-to-leaf path).
    pub fn depth(&self) -> usize {
        self.root.depth()
    }

    /// Returns all wires used in this tree, in tree order.
    pub fn wires_used(&self) -> Vec<WireId> {
        let mut wires = Vec::new();
        self.root.collect_wires(&mut wires);
        wires
    }

    /// Returns all pips used in this tree, in tree order.
    pub fn pips_used(&self) -> Vec<PipId> {
        let mut pips = Vec::new();
        self.root.collect_pips(&mut pips);
        pips
    }

    /// Returns the sink site pins reached by this tree, in tree order.
    pub fn sinks_reached(&self) -> Vec<SiteId> {
        let mut sinks = Vec::new();
        self.root.collect_sinks(&mut sinks);
        sinks
    }
}
