//! Builder paths from operator input to a configuration source.
//!
//! Every function here validates before anything is sent: a failure is the
//! notice shown to the operator and no request is made.

use crate::descriptor::count_declarations;
use crate::error::{Error, Result};
use crate::form::NodeForm;
use crate::MAX_NODES;

/// Validate the existing-topology selection and return the file name.
pub fn existing_topology(choice: Option<&str>) -> Result<String> {
    match choice.map(str::trim) {
        Some(name) if !name.is_empty() => Ok(name.to_string()),
        _ => Err(Error::NoTopologySelected),
    }
}

/// Validate pasted descriptor text and return it trimmed.
///
/// Only the declaration count is checked; the text is not parsed.
pub fn pasted_descriptor(text: &str) -> Result<String> {
    let raw = text.trim();
    if raw.is_empty() {
        return Err(Error::EmptyDescriptor);
    }
    let count = count_declarations(raw);
    if count > MAX_NODES {
        return Err(Error::PastedTooLarge {
            count,
            limit: MAX_NODES,
        });
    }
    Ok(raw.to_string())
}

/// Validate the form and serialize it to descriptor text.
pub fn form_descriptor(form: &NodeForm) -> Result<String> {
    let expected = form
        .declared_count()
        .ok_or_else(|| Error::InvalidNodeCount(form.count_text().to_string()))?;

    let actual = form.sections().len();
    if actual != expected {
        return Err(Error::SectionMismatch { expected, actual });
    }

    if let Some(position) = form.sections().iter().position(|s| s.id.trim().is_empty()) {
        return Err(Error::EmptyNodeId {
            position: position + 1,
        });
    }

    let topology = form.to_descriptor();
    if topology.len() > MAX_NODES {
        return Err(Error::TooManyNodes {
            count: topology.len(),
            limit: MAX_NODES,
        });
    }

    topology.to_yaml()
}
