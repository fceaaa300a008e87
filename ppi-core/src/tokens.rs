//! Protein token extraction from node labels.
//!
//! A node label such as `"YFL039C YAL001C"` names one or more proteins,
//! separated by whitespace. Each whitespace-delimited piece is a protein
//! token. In [`NameMode::Gene`] every token is mapped through the
//! [`GeneDictionary`]; in [`NameMode::Systematic`] tokens are used as-is.

use std::collections::BTreeSet;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::dictionary::GeneDictionary;
use crate::types::Node;

/// How protein tokens are reported.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NameMode {
    /// Raw systematic identifiers (e.g. `YFL039C`).
    #[default]
    Systematic,
    /// Standard gene names (e.g. `ACT1`).
    Gene,
}

impl FromStr for NameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "systematic" | "sys" => Ok(NameMode::Systematic),
            "gene" => Ok(NameMode::Gene),
            _ => Err(format!("Unknown name mode: '{}'", s)),
        }
    }
}

impl fmt::Display for NameMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            NameMode::Systematic => write!(f, "systematic"),
            NameMode::Gene => write!(f, "gene"),
        }
    }
}

/// Split a label into its distinct protein tokens.
///
/// Repeats within one label collapse, so a node contributes each token once.
pub fn tokenize(label: &str, mode: NameMode, dict: &GeneDictionary) -> BTreeSet<String> {
    label
        .split_whitespace()
        .map(|tok| match mode {
            NameMode::Systematic => tok,
            NameMode::Gene => dict.map_token(tok),
        })
        .filter(|tok| !tok.is_empty())
        .map(str::to_string)
        .collect()
}

/// The label text a node is tokenized from.
///
/// Prefers the enriched label matching `mode` (`label_gene` / `label_sys`),
/// then `label`, `name`, the first attribute, and finally the node id.
pub fn node_label(node: &Node, mode: NameMode) -> String {
    let enriched = match mode {
        NameMode::Gene => "label_gene",
        NameMode::Systematic => "label_sys",
    };

    [enriched, "label", "name"]
        .iter()
        .filter_map(|key| node.attributes.get_string(key))
        .chain(node.attributes.first().map(|(_, v)| v.to_string()))
        .find(|s| !s.trim().is_empty())
        .unwrap_or_else(|| node.id.clone())
}

/// Tokens of a node under `mode`.
pub fn node_tokens(node: &Node, mode: NameMode, dict: &GeneDictionary) -> BTreeSet<String> {
    tokenize(&node_label(node, mode), mode, dict)
}

/// Tokens of a node for protein listings.
///
/// Like [`node_tokens`], except that a node whose `label` attribute is
/// present but blank contributes nothing instead of falling back to its
/// name or id.
pub fn label_tokens(node: &Node, mode: NameMode, dict: &GeneDictionary) -> BTreeSet<String> {
    match node.attributes.get_string("label") {
        Some(label) if label.trim().is_empty() => BTreeSet::new(),
        _ => node_tokens(node, mode, dict),
    }
}
