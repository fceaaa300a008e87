//! Protein aggregation across the files of a network.
//!
//! Every file of a network is a [`Graph`]; the aggregator collects the
//! protein tokens of all nodes, remembers which files and node types each
//! token was seen in, and serves the result as a filtered, paginated list.
//! [`component_membership`] answers the complementary question of which
//! components (per file) contain a given set of proteins.

use std::collections::{BTreeMap, BTreeSet};

use serde::{Deserialize, Serialize};

use crate::components::ComponentAnalysis;
use crate::dictionary::GeneDictionary;
use crate::error::{PpiError, Result};
use crate::tokens::{label_tokens, NameMode};
use crate::types::Graph;

/// Page size bounds for protein listings.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLimits {
    pub default_page_size: usize,
    pub max_page_size: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_page_size: 50,
            max_page_size: 500,
        }
    }
}

/// Filters and paging for [`aggregate_proteins`].
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct ProteinQuery {
    /// 1-indexed page number.
    pub page: usize,
    pub size: usize,
    /// Space-separated exact tokens to keep.
    pub q: Option<String>,
    /// Space-separated tokens; keep only proteins sharing a component with all of them.
    pub selected: Option<String>,
    pub name_mode: NameMode,
}

impl Default for ProteinQuery {
    fn default() -> Self {
        Self {
            page: 1,
            size: PageLimits::default().default_page_size,
            q: None,
            selected: None,
            name_mode: NameMode::default(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ProteinItem {
    pub protein: String,
    pub files: Vec<String>,
    pub types: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct PagedProteins {
    pub items: Vec<ProteinItem>,
    pub total: usize,
    pub page: usize,
    pub size: usize,
}

#[derive(Default)]
struct Occurrence {
    files: BTreeSet<String>,
    types: BTreeSet<String>,
}

fn split_terms(raw: Option<&str>) -> BTreeSet<String> {
    raw.map(|s| s.split_whitespace().map(str::to_string).collect())
        .unwrap_or_default()
}

/// Unique proteins across `files`, filtered and paginated.
///
/// The co-occurrence filter (`selected`) runs before the exact-match filter
/// (`q`). When no component in any file holds all selected tokens, the
/// co-occurrence filter keeps exactly the selected tokens.
pub fn aggregate_proteins(
    files: &[(String, Graph)],
    query: &ProteinQuery,
    dict: &GeneDictionary,
    limits: &PageLimits,
) -> Result<PagedProteins> {
    if query.page == 0 {
        return Err(PpiError::invalid_input("page must be at least 1"));
    }
    if query.size == 0 || query.size > limits.max_page_size {
        return Err(PpiError::invalid_input(format!(
            "page size must be between 1 and {}",
            limits.max_page_size
        )));
    }

    let mode = query.name_mode;
    let mut occurrences: BTreeMap<String, Occurrence> = BTreeMap::new();
    for (filename, graph) in files {
        for node in &graph.nodes {
            let node_type = node
                .attributes
                .get_string("type")
                .filter(|t| !t.trim().is_empty());
            for token in label_tokens(node, mode, dict) {
                let entry = occurrences.entry(token).or_default();
                entry.files.insert(filename.clone());
                if let Some(t) = &node_type {
                    entry.types.insert(t.clone());
                }
            }
        }
        tracing::debug!("Collected proteins from {}", filename);
    }

    let mut proteins: Vec<&String> = occurrences.keys().collect();

    let selected = split_terms(query.selected.as_deref());
    if !selected.is_empty() {
        let allowed = co_occurring_tokens(files, &selected, mode, dict);
        proteins.retain(|p| allowed.contains(*p));
    }

    let terms = split_terms(query.q.as_deref());
    if !terms.is_empty() {
        proteins.retain(|p| terms.contains(*p));
    }

    let total = proteins.len();
    let start = (query.page - 1).saturating_mul(query.size);
    if start >= total && total != 0 {
        return Err(PpiError::invalid_input(format!(
            "page {} out of range ({} proteins)",
            query.page, total
        )));
    }

    let items = proteins
        .into_iter()
        .skip(start)
        .take(query.size)
        .map(|protein| {
            let occ = &occurrences[protein];
            ProteinItem {
                protein: protein.clone(),
                files: occ.files.iter().cloned().collect(),
                types: occ.types.iter().cloned().collect(),
            }
        })
        .collect();

    Ok(PagedProteins {
        items,
        total,
        page: query.page,
        size: query.size,
    })
}

/// Tokens found in any component (of any file) that contains every selected token.
fn co_occurring_tokens(
    files: &[(String, Graph)],
    selected: &BTreeSet<String>,
    mode: NameMode,
    dict: &GeneDictionary,
) -> BTreeSet<String> {
    let mut allowed = BTreeSet::new();
    for (_, graph) in files {
        let analysis = ComponentAnalysis::for_listing(graph, mode, dict);
        for (_, tokens) in analysis.iter_component_tokens() {
            if selected.is_subset(tokens) {
                allowed.extend(tokens.iter().cloned());
            }
        }
    }

    if allowed.is_empty() {
        selected.clone()
    } else {
        allowed
    }
}

/// A component listed by [`component_membership`].
#[derive(Clone, Debug, Serialize)]
pub struct ComponentEntry {
    pub component_id: usize,
    pub size: usize,
    pub edge_count: usize,
    /// Distinct proteins in the component.
    pub protein_count: usize,
    /// Requested proteins present in the component.
    pub proteins: Vec<String>,
}

#[derive(Clone, Debug, Serialize)]
pub struct FileComponents {
    pub filename: String,
    pub components: Vec<ComponentEntry>,
}

/// Per file, the components containing all `requested` tokens.
///
/// With no tokens requested every component is listed. Files are reported
/// even when none of their components match.
pub fn component_membership(
    files: &[(String, Graph)],
    requested: &[String],
    mode: NameMode,
    dict: &GeneDictionary,
) -> Vec<FileComponents> {
    let requested: BTreeSet<&str> = requested
        .iter()
        .map(|s| s.trim())
        .filter(|s| !s.is_empty())
        .collect();

    files
        .iter()
        .map(|(filename, graph)| {
            let analysis = ComponentAnalysis::for_listing(graph, mode, dict);
            let components = analysis
                .iter_component_tokens()
                .filter(|(_, tokens)| requested.iter().all(|r| tokens.contains(*r)))
                .map(|(cid, tokens)| ComponentEntry {
                    component_id: cid,
                    size: analysis.components().size(cid),
                    edge_count: analysis.components().edge_count(cid),
                    protein_count: tokens.len(),
                    proteins: requested.iter().map(|s| s.to_string()).collect(),
                })
                .collect();

            FileComponents {
                filename: filename.clone(),
                components,
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdf::parse_gdf;

    fn file(name: &str, gdf: &str) -> (String, Graph) {
        (name.to_string(), parse_gdf(gdf))
    }

    /// 25 single-node proteins P00..P24.
    fn numbered() -> Vec<(String, Graph)> {
        let mut gdf = String::from("nodedef>name,label\n");
        for i in 0..25 {
            gdf.push_str(&format!("{},'P{:02}'\n", i, i));
        }
        vec![file("numbered.gdf", &gdf)]
    }

    fn network() -> Vec<(String, Graph)> {
        vec![
            file(
                "a.gdf",
                "nodedef>name,label,type\n1,'ACT1 MYO1',reference\n2,'SLA1',prediction\n3,'TFC3',reference\nedgedef>node1,node2\n1,2\n",
            ),
            file(
                "b.gdf",
                "nodedef>name,label,type\n1,'ACT1',\n2,'PAN1',prediction\n3,'ACT1',reference\nedgedef>node1,node2\n1,2\n",
            ),
        ]
    }

    fn query(page: usize, size: usize) -> ProteinQuery {
        ProteinQuery {
            page,
            size,
            ..Default::default()
        }
    }

    fn names(result: &PagedProteins) -> Vec<&str> {
        result.items.iter().map(|i| i.protein.as_str()).collect()
    }

    #[test]
    fn test_second_page_of_25() {
        let result = aggregate_proteins(
            &numbered(),
            &query(2, 10),
            &GeneDictionary::empty(),
            &PageLimits::default(),
        )
        .unwrap();

        assert_eq!(result.total, 25);
        assert_eq!(result.page, 2);
        assert_eq!(result.size, 10);
        let expected: Vec<String> = (10..20).map(|i| format!("P{:02}", i)).collect();
        assert_eq!(names(&result), expected.iter().map(String::as_str).collect::<Vec<_>>());
    }

    #[test]
    fn test_last_partial_page() {
        let result = aggregate_proteins(
            &numbered(),
            &query(3, 10),
            &GeneDictionary::empty(),
            &PageLimits::default(),
        )
        .unwrap();
        assert_eq!(result.items.len(), 5);
    }

    #[test]
    fn test_page_out_of_range() {
        let err = aggregate_proteins(
            &numbered(),
            &query(4, 10),
            &GeneDictionary::empty(),
            &PageLimits::default(),
        )
        .unwrap_err();
        assert!(matches!(err, PpiError::InvalidInput { .. }));
        assert!(err.to_string().contains("out of range"));
    }

    #[test]
    fn test_empty_network_any_page_is_ok() {
        let result =
            aggregate_proteins(&[], &query(3, 10), &GeneDictionary::empty(), &PageLimits::default())
                .unwrap();
        assert_eq!(result.total, 0);
        assert!(result.items.is_empty());
    }

    #[test]
    fn test_invalid_page_parameters() {
        let dict = GeneDictionary::empty();
        let limits = PageLimits::default();
        assert!(aggregate_proteins(&numbered(), &query(0, 10), &dict, &limits).is_err());
        assert!(aggregate_proteins(&numbered(), &query(1, 0), &dict, &limits).is_err());
        assert!(aggregate_proteins(&numbered(), &query(1, 501), &dict, &limits).is_err());
        assert!(aggregate_proteins(&numbered(), &query(1, 500), &dict, &limits).is_ok());
    }

    #[test]
    fn test_files_and_types_collected() {
        let result = aggregate_proteins(
            &network(),
            &query(1, 50),
            &GeneDictionary::empty(),
            &PageLimits::default(),
        )
        .unwrap();

        assert_eq!(names(&result), vec!["ACT1", "MYO1", "PAN1", "SLA1", "TFC3"]);
        let act1 = &result.items[0];
        assert_eq!(act1.files, vec!["a.gdf", "b.gdf"]);
        assert_eq!(act1.types, vec!["reference"]);
        let myo1 = &result.items[1];
        assert_eq!(myo1.files, vec!["a.gdf"]);
    }

    #[test]
    fn test_exact_match_filter() {
        let q = ProteinQuery {
            q: Some("SLA1  NOPE act1".into()),
            ..query(1, 50)
        };
        let result =
            aggregate_proteins(&network(), &q, &GeneDictionary::empty(), &PageLimits::default())
                .unwrap();
        assert_eq!(names(&result), vec!["SLA1"]);
    }

    #[test]
    fn test_co_occurrence_filter() {
        let q = ProteinQuery {
            selected: Some("SLA1".into()),
            ..query(1, 50)
        };
        let result =
            aggregate_proteins(&network(), &q, &GeneDictionary::empty(), &PageLimits::default())
                .unwrap();
        // a.gdf component {1,2} holds ACT1 MYO1 SLA1
        assert_eq!(names(&result), vec!["ACT1", "MYO1", "SLA1"]);

        let q = ProteinQuery {
            selected: Some("ACT1".into()),
            ..query(1, 50)
        };
        let result =
            aggregate_proteins(&network(), &q, &GeneDictionary::empty(), &PageLimits::default())
                .unwrap();
        assert_eq!(names(&result), vec!["ACT1", "MYO1", "PAN1", "SLA1"]);
    }

    #[test]
    fn test_co_occurrence_fallback_returns_selected() {
        // SLA1 and PAN1 never share a component
        let q = ProteinQuery {
            selected: Some("SLA1 PAN1".into()),
            ..query(1, 50)
        };
        let result =
            aggregate_proteins(&network(), &q, &GeneDictionary::empty(), &PageLimits::default())
                .unwrap();
        assert_eq!(names(&result), vec!["PAN1", "SLA1"]);
        assert_eq!(result.total, 2);
    }

    #[test]
    fn test_filters_compose() {
        let q = ProteinQuery {
            selected: Some("SLA1".into()),
            q: Some("MYO1 PAN1".into()),
            ..query(1, 50)
        };
        let result =
            aggregate_proteins(&network(), &q, &GeneDictionary::empty(), &PageLimits::default())
                .unwrap();
        assert_eq!(names(&result), vec!["MYO1"]);
    }

    #[test]
    fn test_gene_mode_aggregation() {
        let dict = GeneDictionary::parse("a\tb\tc\tYFL039C\tACT1\n");
        let files = vec![file("x.gdf", "nodedef>name,label\n1,'YFL039C YBL007C'\n")];
        let q = ProteinQuery {
            name_mode: NameMode::Gene,
            ..query(1, 50)
        };
        let result = aggregate_proteins(&files, &q, &dict, &PageLimits::default()).unwrap();
        assert_eq!(names(&result), vec!["ACT1", "YBL007C"]);
    }

    #[test]
    fn test_blank_label_contributes_no_protein() {
        let files = vec![file(
            "blank.gdf",
            "nodedef>name,label,type\n1,'ACT1',ref\n17,'',ref\n",
        )];
        let result = aggregate_proteins(
            &files,
            &query(1, 50),
            &GeneDictionary::empty(),
            &PageLimits::default(),
        )
        .unwrap();

        assert_eq!(names(&result), vec!["ACT1"]);
        assert_eq!(result.total, 1);
    }

    #[test]
    fn test_missing_label_column_uses_name() {
        let files = vec![file("nolabel.gdf", "nodedef>name,type\nSLA1,ref\n")];
        let result = aggregate_proteins(
            &files,
            &query(1, 50),
            &GeneDictionary::empty(),
            &PageLimits::default(),
        )
        .unwrap();
        assert_eq!(names(&result), vec!["SLA1"]);
    }

    #[test]
    fn test_blank_label_not_counted_in_membership() {
        let files = vec![file(
            "blank.gdf",
            "nodedef>name,label\n1,'ACT1'\n17,''\nedgedef>node1,node2\n1,17\n",
        )];
        let listing =
            component_membership(&files, &[], NameMode::Systematic, &GeneDictionary::empty());
        assert_eq!(listing[0].components.len(), 1);
        assert_eq!(listing[0].components[0].size, 2);
        assert_eq!(listing[0].components[0].protein_count, 1);

        let by_id = component_membership(
            &files,
            &["17".to_string()],
            NameMode::Systematic,
            &GeneDictionary::empty(),
        );
        assert!(by_id[0].components.is_empty());
    }

    #[test]
    fn test_component_membership() {
        let files = network();
        let listing = component_membership(
            &files,
            &["ACT1".to_string()],
            NameMode::Systematic,
            &GeneDictionary::empty(),
        );

        assert_eq!(listing.len(), 2);
        let a = &listing[0];
        assert_eq!(a.filename, "a.gdf");
        assert_eq!(a.components.len(), 1);
        assert_eq!(a.components[0].component_id, 0);
        assert_eq!(a.components[0].size, 2);
        assert_eq!(a.components[0].edge_count, 1);
        assert_eq!(a.components[0].protein_count, 3);
        assert_eq!(a.components[0].proteins, vec!["ACT1"]);

        let b = &listing[1];
        let ids: Vec<usize> = b.components.iter().map(|c| c.component_id).collect();
        assert_eq!(ids, vec![0, 1]);
    }

    #[test]
    fn test_component_membership_requires_all_tokens() {
        let listing = component_membership(
            &network(),
            &["ACT1".to_string(), "TFC3".to_string()],
            NameMode::Systematic,
            &GeneDictionary::empty(),
        );
        assert!(listing.iter().all(|f| f.components.is_empty()));
        assert_eq!(listing.len(), 2);
    }

    #[test]
    fn test_component_membership_without_request_lists_all() {
        let listing =
            component_membership(&network(), &[], NameMode::Systematic, &GeneDictionary::empty());
        assert_eq!(listing[0].components.len(), 2);
        assert!(listing[0].components.iter().all(|c| c.proteins.is_empty()));
    }
}
