//! Per-node form for building a topology by hand.
//!
//! Committing a node count generates one [`NodeSection`] per node. Each
//! section holds an editable id and a checkbox for every other node. The
//! checkbox values are the *default* ids of the other nodes, so renaming a
//! node in its id field does not rename the checkboxes that point at it.

use crate::descriptor::{NodeSpec, TopologyDescriptor};

const LETTERS: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Default identifier suggested for the node at `index` (0-based).
///
/// `A`..`Z` for the first 26 nodes, then `N27`, `N28`, ...
pub fn default_node_id(index: usize) -> String {
    match LETTERS.get(index) {
        Some(&letter) => char::from(letter).to_string(),
        None => format!("N{}", index + 1),
    }
}

/// A neighbor checkbox.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NeighborOption {
    /// Value submitted when checked
    pub id: String,
    pub checked: bool,
}

/// Form section for one node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeSection {
    /// Identifier field, prefilled with the default id
    pub id: String,
    /// One checkbox per other node
    pub neighbors: Vec<NeighborOption>,
}

impl NodeSection {
    fn generate(index: usize, count: usize) -> Self {
        Self {
            id: default_node_id(index),
            neighbors: (0..count)
                .filter(|&j| j != index)
                .map(|j| NeighborOption {
                    id: default_node_id(j),
                    checked: false,
                })
                .collect(),
        }
    }

    /// Values of the checked neighbor boxes, in display order.
    pub fn checked_neighbors(&self) -> impl Iterator<Item = &str> {
        self.neighbors
            .iter()
            .filter(|opt| opt.checked)
            .map(|opt| opt.id.as_str())
    }
}

/// The build-with-form input surface.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NodeForm {
    count: String,
    sections: Vec<NodeSection>,
}

impl NodeForm {
    /// Create an empty form.
    pub fn new() -> Self {
        Self::default()
    }

    /// Text currently in the node count field.
    pub fn count_text(&self) -> &str {
        &self.count
    }

    /// Edit the node count field without regenerating sections.
    pub fn set_count_text(&mut self, text: impl Into<String>) {
        self.count = text.into();
    }

    /// Regenerate sections from the node count field.
    ///
    /// Previously entered ids and checkboxes are discarded. An invalid count
    /// leaves the form with no sections.
    pub fn commit_count(&mut self) {
        self.sections.clear();
        if let Some(n) = self.declared_count() {
            self.sections = (0..n).map(|i| NodeSection::generate(i, n)).collect();
        }
    }

    /// Set the node count field and regenerate sections.
    pub fn set_count(&mut self, text: impl Into<String>) {
        self.set_count_text(text);
        self.commit_count();
    }

    /// The declared node count, if it is a positive integer.
    pub fn declared_count(&self) -> Option<usize> {
        self.count.trim().parse::<usize>().ok().filter(|&n| n >= 1)
    }

    /// Generated sections.
    pub fn sections(&self) -> &[NodeSection] {
        &self.sections
    }

    /// Mutable access to a section.
    pub fn section_mut(&mut self, index: usize) -> Option<&mut NodeSection> {
        self.sections.get_mut(index)
    }

    /// Remove a section, as if its markup had gone missing.
    pub fn remove_section(&mut self, index: usize) -> Option<NodeSection> {
        (index < self.sections.len()).then(|| self.sections.remove(index))
    }

    /// Set the id field of a section. Returns `false` if there is no such section.
    pub fn set_id(&mut self, index: usize, id: impl Into<String>) -> bool {
        match self.sections.get_mut(index) {
            Some(section) => {
                section.id = id.into();
                true
            }
            None => false,
        }
    }

    /// Check or uncheck the neighbor box with value `neighbor` in a section.
    ///
    /// Returns `false` if the section or the box does not exist.
    pub fn set_neighbor(&mut self, index: usize, neighbor: &str, checked: bool) -> bool {
        let Some(section) = self.sections.get_mut(index) else {
            return false;
        };
        match section.neighbors.iter_mut().find(|opt| opt.id == neighbor) {
            Some(opt) => {
                opt.checked = checked;
                true
            }
            None => false,
        }
    }

    /// Read the sections into a descriptor without validating them.
    ///
    /// Ids are trimmed. Use [`crate::form_descriptor`] for the validated
    /// submission path.
    pub fn to_descriptor(&self) -> TopologyDescriptor {
        TopologyDescriptor::new(
            self.sections
                .iter()
                .map(|s| NodeSpec::new(s.id.trim(), s.checked_neighbors()))
                .collect(),
        )
    }
}
