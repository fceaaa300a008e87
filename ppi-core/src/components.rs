//! Connected-component analysis.
//!
//! Components are computed with a weighted union-find over the undirected
//! edge relation. Component ids are assigned in first-discovery order while
//! walking the node list, so they are compact (`0..k`) and stable for a given
//! input ordering regardless of which node ended up as a set's root.
//!
//! On top of the partition, [`ComponentAnalysis`] indexes protein tokens per
//! component, which backs the by-node protein report and the co-occurrence
//! filters in [`crate::proteins`].

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::ser::{SerializeMap, Serializer};
use serde::Serialize;

use crate::dictionary::GeneDictionary;
use crate::error::{PpiError, Result};
use crate::tokens::{label_tokens, node_tokens, NameMode};
use crate::types::{Graph, Node};

/// Disjoint-set forest with union by size and path halving.
#[derive(Clone, Debug)]
pub struct UnionFind {
    parent: Vec<usize>,
    size: Vec<usize>,
}

impl UnionFind {
    /// Create `n` singleton sets.
    pub fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            size: vec![1; n],
        }
    }

    /// Representative of `x`'s set.
    pub fn find(&mut self, mut x: usize) -> usize {
        while self.parent[x] != x {
            self.parent[x] = self.parent[self.parent[x]];
            x = self.parent[x];
        }
        x
    }

    /// Merge the sets containing `a` and `b`. Returns false if already joined.
    pub fn union(&mut self, a: usize, b: usize) -> bool {
        let (mut ra, mut rb) = (self.find(a), self.find(b));
        if ra == rb {
            return false;
        }
        if self.size[ra] < self.size[rb] {
            std::mem::swap(&mut ra, &mut rb);
        }
        self.parent[rb] = ra;
        self.size[ra] += self.size[rb];
        true
    }

    /// Size of the set containing `x`.
    pub fn set_size(&mut self, x: usize) -> usize {
        let root = self.find(x);
        self.size[root]
    }

    pub fn len(&self) -> usize {
        self.parent.len()
    }

    pub fn is_empty(&self) -> bool {
        self.parent.is_empty()
    }
}

/// Component assignment for a node list.
#[derive(Clone, Debug, Default)]
pub struct Components {
    /// Component id per input node position (duplicates included).
    node_components: Vec<usize>,
    /// Node id -> component id.
    index: HashMap<String, usize>,
    sizes: Vec<usize>,
    edge_counts: Vec<usize>,
}

impl Components {
    /// Partition `node_ids` by the undirected relation induced by `edges`.
    ///
    /// Edges naming an id outside `node_ids` are ignored. Repeated node ids
    /// share one union-find element but count once per occurrence in `size`.
    pub fn compute<'n, 'e, N, E>(node_ids: N, edges: E) -> Self
    where
        N: IntoIterator<Item = &'n str>,
        E: IntoIterator<Item = (&'e str, &'e str)>,
    {
        let ids: Vec<&str> = node_ids.into_iter().collect();

        let mut dense: HashMap<&str, usize> = HashMap::with_capacity(ids.len());
        for id in &ids {
            let next = dense.len();
            dense.entry(id).or_insert(next);
        }

        let mut uf = UnionFind::new(dense.len());
        let mut resolved_edges = Vec::new();
        for (a, b) in edges {
            if let (Some(&ia), Some(&ib)) = (dense.get(a), dense.get(b)) {
                uf.union(ia, ib);
                resolved_edges.push((ia, ib));
            }
        }

        let mut root_to_component: HashMap<usize, usize> = HashMap::new();
        let mut node_components = Vec::with_capacity(ids.len());
        let mut sizes = Vec::new();
        for id in &ids {
            let root = uf.find(dense[id]);
            let cid = *root_to_component.entry(root).or_insert_with(|| {
                sizes.push(0);
                sizes.len() - 1
            });
            sizes[cid] += 1;
            node_components.push(cid);
        }

        let mut edge_counts = vec![0; sizes.len()];
        for (ia, ib) in resolved_edges {
            let ca = root_to_component[&uf.find(ia)];
            let cb = root_to_component[&uf.find(ib)];
            if ca == cb {
                edge_counts[ca] += 1;
            }
        }

        let index = ids
            .iter()
            .zip(node_components.iter())
            .map(|(id, &cid)| (id.to_string(), cid))
            .collect();

        Components {
            node_components,
            index,
            sizes,
            edge_counts,
        }
    }

    /// Components of a parsed graph.
    pub fn from_graph(graph: &Graph) -> Self {
        Self::compute(graph.node_ids(), graph.edge_pairs())
    }

    /// Number of components.
    pub fn count(&self) -> usize {
        self.sizes.len()
    }

    pub fn component_of(&self, node_id: &str) -> Option<usize> {
        self.index.get(node_id).copied()
    }

    /// Component id per input node position.
    pub fn node_components(&self) -> &[usize] {
        &self.node_components
    }

    /// Node count of a component (0 for unknown ids).
    pub fn size(&self, component_id: usize) -> usize {
        self.sizes.get(component_id).copied().unwrap_or(0)
    }

    /// Edges with both endpoints inside a component.
    pub fn edge_count(&self, component_id: usize) -> usize {
        self.edge_counts.get(component_id).copied().unwrap_or(0)
    }
}

/// Per-component listing entry.
#[derive(Clone, Debug, Serialize)]
pub struct ComponentSummary {
    pub component_id: usize,
    pub size: usize,
    pub edge_count: usize,
    pub protein_count: usize,
}

/// Components of one graph plus the protein tokens found in each.
#[derive(Clone, Debug)]
pub struct ComponentAnalysis {
    components: Components,
    node_tokens: Vec<BTreeSet<String>>,
    component_tokens: Vec<BTreeSet<String>>,
    token_components: HashMap<String, BTreeSet<usize>>,
}

impl ComponentAnalysis {
    /// Index tokens with the full label fallback (`label`, `name`, first
    /// attribute, id), so every node contributes something.
    pub fn new(graph: &Graph, mode: NameMode, dict: &GeneDictionary) -> Self {
        Self::with_tokens(graph, |node| node_tokens(node, mode, dict))
    }

    /// Index tokens for protein listings, where a blank `label` means the
    /// node holds no protein.
    pub fn for_listing(graph: &Graph, mode: NameMode, dict: &GeneDictionary) -> Self {
        Self::with_tokens(graph, |node| label_tokens(node, mode, dict))
    }

    fn with_tokens(graph: &Graph, tokens_of: impl Fn(&Node) -> BTreeSet<String>) -> Self {
        let components = Components::from_graph(graph);
        let node_tokens: Vec<BTreeSet<String>> = graph.nodes.iter().map(tokens_of).collect();

        let mut component_tokens = vec![BTreeSet::new(); components.count()];
        let mut token_components: HashMap<String, BTreeSet<usize>> = HashMap::new();
        for (tokens, &cid) in node_tokens.iter().zip(components.node_components()) {
            for token in tokens {
                component_tokens[cid].insert(token.clone());
                token_components
                    .entry(token.clone())
                    .or_default()
                    .insert(cid);
            }
        }

        Self {
            components,
            node_tokens,
            component_tokens,
            token_components,
        }
    }

    pub fn components(&self) -> &Components {
        &self.components
    }

    /// Distinct tokens per node position.
    pub fn node_tokens(&self) -> &[BTreeSet<String>] {
        &self.node_tokens
    }

    /// All tokens present in a component.
    pub fn component_tokens(&self, component_id: usize) -> Option<&BTreeSet<String>> {
        self.component_tokens.get(component_id)
    }

    /// Iterate `(component_id, tokens)` in id order.
    pub fn iter_component_tokens(&self) -> impl Iterator<Item = (usize, &BTreeSet<String>)> {
        self.component_tokens.iter().enumerate()
    }

    /// How many components other than `exclude` contain `token`.
    pub fn other_components(&self, token: &str, exclude: Option<usize>) -> usize {
        match self.token_components.get(token) {
            Some(set) => {
                let own = exclude.map_or(0, |cid| usize::from(set.contains(&cid)));
                set.len() - own
            }
            None => 0,
        }
    }

    /// Size, edge count and distinct protein count of every component.
    pub fn summaries(&self) -> Vec<ComponentSummary> {
        (0..self.components.count())
            .map(|cid| ComponentSummary {
                component_id: cid,
                size: self.components.size(cid),
                edge_count: self.components.edge_count(cid),
                protein_count: self.component_tokens[cid].len(),
            })
            .collect()
    }
}

/// Key/value pairs serialized as a JSON object in their given order.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct RankedCounts<T>(pub Vec<(String, T)>);

impl<T> RankedCounts<T> {
    pub fn get(&self, key: &str) -> Option<&T> {
        self.0.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }
}

impl<T: Serialize> Serialize for RankedCounts<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

/// Occurrence statistics for one protein token within a component.
#[derive(Clone, Debug, Serialize)]
pub struct ProteinCount {
    pub protein: String,
    /// Nodes in the component whose label contains the token.
    pub count: usize,
    /// Occurrences by node `type`, most frequent first.
    pub type_counts: RankedCounts<usize>,
    /// Fraction of component nodes containing the token.
    pub ratio: f64,
    /// Per-type share of this token's occurrences.
    pub type_ratios: RankedCounts<f64>,
    /// Other components of the same graph containing the token.
    pub other_components: usize,
    /// Other components of the reference graph containing the token.
    pub other_components_in_reference: Option<usize>,
}

/// Protein makeup of the component containing a node.
#[derive(Clone, Debug, Serialize)]
pub struct ByNodeReport {
    pub component_id: usize,
    pub size: usize,
    pub protein_counts: Vec<ProteinCount>,
}

/// Report the protein tokens of the component that contains `node_id`.
///
/// `reference` is an optional second graph (typically the full file the
/// client graph was cut from); when given, each token also reports how many
/// other components of the reference contain it.
pub fn component_proteins_by_node(
    graph: &Graph,
    node_id: &str,
    mode: NameMode,
    dict: &GeneDictionary,
    reference: Option<&Graph>,
) -> Result<ByNodeReport> {
    let analysis = ComponentAnalysis::new(graph, mode, dict);
    let target = analysis
        .components()
        .component_of(node_id)
        .ok_or_else(|| PpiError::not_found("node", node_id))?;
    let size = analysis.components().size(target);

    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    let mut type_counts: HashMap<&str, HashMap<String, usize>> = HashMap::new();
    for ((node, tokens), &cid) in graph
        .nodes
        .iter()
        .zip(analysis.node_tokens())
        .zip(analysis.components().node_components())
    {
        if cid != target {
            continue;
        }
        let node_type = node.node_type();
        for token in tokens {
            *counts.entry(token).or_insert(0) += 1;
            *type_counts
                .entry(token)
                .or_default()
                .entry(node_type.clone())
                .or_insert(0) += 1;
        }
    }

    let reference = reference.map(|g| {
        let ref_analysis = ComponentAnalysis::new(g, mode, dict);
        let ref_target = ref_analysis.components().component_of(node_id);
        (ref_analysis, ref_target)
    });

    let mut protein_counts: Vec<ProteinCount> = counts
        .into_iter()
        .map(|(token, count)| {
            let mut by_type: Vec<(String, usize)> = type_counts
                .remove(token)
                .unwrap_or_default()
                .into_iter()
                .collect();
            by_type.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));

            let type_ratios = by_type
                .iter()
                .map(|(t, c)| (t.clone(), *c as f64 / count as f64))
                .collect();

            ProteinCount {
                protein: token.to_string(),
                count,
                type_counts: RankedCounts(by_type),
                ratio: if size > 0 { count as f64 / size as f64 } else { 0.0 },
                type_ratios: RankedCounts(type_ratios),
                other_components: analysis.other_components(token, Some(target)),
                other_components_in_reference: reference
                    .as_ref()
                    .map(|(ra, rt)| ra.other_components(token, *rt)),
            }
        })
        .collect();
    protein_counts.sort_by(|a, b| b.count.cmp(&a.count).then_with(|| a.protein.cmp(&b.protein)));

    Ok(ByNodeReport {
        component_id: target,
        size,
        protein_counts,
    })
}

/// Extract one component as a standalone graph.
///
/// Nodes keep their full attribute payload; only edges with both endpoints
/// inside the component are kept.
pub fn component_subgraph(graph: &Graph, component_id: usize) -> Result<Graph> {
    let components = Components::from_graph(graph);
    if component_id >= components.count() {
        return Err(PpiError::not_found("component", component_id.to_string()));
    }

    let nodes: Vec<_> = graph
        .nodes
        .iter()
        .zip(components.node_components())
        .filter(|(_, &cid)| cid == component_id)
        .map(|(node, _)| node.clone())
        .collect();
    let member_ids: HashSet<&str> = nodes.iter().map(|n| n.id.as_str()).collect();
    let edges = graph
        .edges
        .iter()
        .filter(|e| member_ids.contains(e.source.as_str()) && member_ids.contains(e.target.as_str()))
        .cloned()
        .collect();

    Ok(Graph::new(nodes, edges))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gdf::parse_gdf;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::collections::VecDeque;

    fn ids(n: usize) -> Vec<String> {
        (0..n).map(|i| format!("n{}", i)).collect()
    }

    #[test]
    fn test_union_find_basics() {
        let mut uf = UnionFind::new(5);
        assert!(uf.union(0, 1));
        assert!(uf.union(3, 4));
        assert!(!uf.union(1, 0));
        assert!(uf.union(1, 4));
        assert_eq!(uf.find(0), uf.find(3));
        assert_ne!(uf.find(2), uf.find(0));
        assert_eq!(uf.set_size(4), 4);
        assert_eq!(uf.set_size(2), 1);
    }

    #[test]
    fn test_ids_follow_discovery_order() {
        // c-d joined first, but a is listed first and gets id 0
        let nodes = ["a", "b", "c", "d"];
        let edges = [("c", "d"), ("a", "b")];
        let comps = Components::compute(nodes, edges);

        assert_eq!(comps.count(), 2);
        assert_eq!(comps.node_components(), &[0, 0, 1, 1]);
        assert_eq!(comps.size(0), 2);
        assert_eq!(comps.edge_count(1), 1);
    }

    #[test]
    fn test_unknown_endpoints_ignored() {
        let comps = Components::compute(["a", "b"], [("a", "zz"), ("zz", "b")]);
        assert_eq!(comps.count(), 2);
        assert_eq!(comps.edge_count(0), 0);
        assert_eq!(comps.component_of("zz"), None);
    }

    #[test]
    fn test_duplicate_ids_counted_per_row() {
        let comps = Components::compute(["a", "a", "b"], [("a", "b")]);
        assert_eq!(comps.count(), 1);
        assert_eq!(comps.size(0), 3);
    }

    #[test]
    fn test_partition_matches_reachability() {
        let mut rng = StdRng::seed_from_u64(7);
        let node_ids = ids(60);
        let edges: Vec<(usize, usize)> = (0..45)
            .map(|_| (rng.gen_range(0..60), rng.gen_range(0..60)))
            .collect();

        let comps = Components::compute(
            node_ids.iter().map(String::as_str),
            edges
                .iter()
                .map(|&(a, b)| (node_ids[a].as_str(), node_ids[b].as_str())),
        );

        // BFS reachability as ground truth
        let mut adj = vec![Vec::new(); 60];
        for &(a, b) in &edges {
            adj[a].push(b);
            adj[b].push(a);
        }
        for start in 0..60 {
            let mut seen = vec![false; 60];
            let mut queue = VecDeque::from([start]);
            seen[start] = true;
            while let Some(cur) = queue.pop_front() {
                for &next in &adj[cur] {
                    if !seen[next] {
                        seen[next] = true;
                        queue.push_back(next);
                    }
                }
            }
            for other in 0..60 {
                let same = comps.node_components()[start] == comps.node_components()[other];
                assert_eq!(same, seen[other], "nodes {} and {}", start, other);
            }
        }

        // Every id in 0..k is used and sizes sum to node count
        let total: usize = (0..comps.count()).map(|c| comps.size(c)).sum();
        assert_eq!(total, 60);
        assert!((0..comps.count()).all(|c| comps.size(c) > 0));
    }

    #[test]
    fn test_assignment_is_deterministic() {
        let gdf = "nodedef>name\n1\n2\n3\n4\n5\nedgedef>node1,node2\n5,4\n2,3\n";
        let first = Components::from_graph(&parse_gdf(gdf));
        let second = Components::from_graph(&parse_gdf(gdf));
        assert_eq!(first.node_components(), second.node_components());
        assert_eq!(first.node_components(), &[0, 1, 1, 2, 2]);
    }

    #[test]
    fn test_scenario_single_component() {
        let graph =
            parse_gdf("nodedef>name,label,type\n1,'ACT1',ref\n2,'SLA1',ref\nedgedef>node1,node2\n1,2");
        let report = component_proteins_by_node(
            &graph,
            "1",
            NameMode::Systematic,
            &GeneDictionary::empty(),
            None,
        )
        .unwrap();

        assert_eq!(report.component_id, 0);
        assert_eq!(report.size, 2);
        let counts: Vec<(&str, usize)> = report
            .protein_counts
            .iter()
            .map(|p| (p.protein.as_str(), p.count))
            .collect();
        assert_eq!(counts, vec![("ACT1", 1), ("SLA1", 1)]);
    }

    #[test]
    fn test_token_counted_once_per_node() {
        let gdf = "\
nodedef>name,label,type
1,'ACT1 MYO1',reference
2,'ACT1',prediction
3,'SLA1',reference
4,'ACT1 ACT1'
edgedef>node1,node2
1,2
2,3
";
        let graph = parse_gdf(gdf);
        let report =
            component_proteins_by_node(&graph, "3", NameMode::Systematic, &GeneDictionary::empty(), None)
                .unwrap();

        assert_eq!(report.size, 3);
        let act1 = &report.protein_counts[0];
        assert_eq!(act1.protein, "ACT1");
        assert_eq!(act1.count, 2);
        assert!((act1.ratio - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(act1.type_counts.get("reference"), Some(&1));
        assert_eq!(act1.type_counts.get("prediction"), Some(&1));
        assert_eq!(act1.type_ratios.get("reference"), Some(&0.5));
        // Node 4 is its own component and also carries ACT1
        assert_eq!(act1.other_components, 1);
        assert_eq!(act1.other_components_in_reference, None);

        // Single-node component with a repeated token
        let report =
            component_proteins_by_node(&graph, "4", NameMode::Systematic, &GeneDictionary::empty(), None)
                .unwrap();
        assert_eq!(report.protein_counts[0].count, 1);
        assert_eq!(report.protein_counts[0].type_counts.get("unknown"), Some(&1));
    }

    #[test]
    fn test_type_counts_ordered_by_frequency() {
        let gdf = "\
nodedef>name,label,type
1,'A',zeta
2,'A',alpha
3,'A',zeta
edgedef>node1,node2
1,2
2,3
";
        let graph = parse_gdf(gdf);
        let report =
            component_proteins_by_node(&graph, "1", NameMode::Systematic, &GeneDictionary::empty(), None)
                .unwrap();
        let keys: Vec<&str> = report.protein_counts[0]
            .type_counts
            .0
            .iter()
            .map(|(k, _)| k.as_str())
            .collect();
        assert_eq!(keys, vec!["zeta", "alpha"]);

        let json = serde_json::to_string(&report.protein_counts[0].type_counts).unwrap();
        assert_eq!(json, r#"{"zeta":2,"alpha":1}"#);
    }

    #[test]
    fn test_reference_graph_scope() {
        // The client only sent one component; the full file has three
        let client = parse_gdf("nodedef>name,label\n1,'ACT1'\n2,'SLA1'\nedgedef>node1,node2\n1,2\n");
        let full = parse_gdf(
            "nodedef>name,label\n1,'ACT1'\n2,'SLA1'\n3,'ACT1'\n4,'ACT1'\nedgedef>node1,node2\n1,2\n",
        );

        let report = component_proteins_by_node(
            &client,
            "1",
            NameMode::Systematic,
            &GeneDictionary::empty(),
            Some(&full),
        )
        .unwrap();
        let act1 = report
            .protein_counts
            .iter()
            .find(|p| p.protein == "ACT1")
            .unwrap();
        assert_eq!(act1.other_components, 0);
        assert_eq!(act1.other_components_in_reference, Some(2));
    }

    #[test]
    fn test_gene_mode_counts_mapped_names() {
        let dict = GeneDictionary::parse("a\tb\tc\tYFL039C\tACT1\n");
        let graph = parse_gdf("nodedef>name,label\n1,'YFL039C'\n2,'ACT1'\nedgedef>node1,node2\n1,2\n");
        let report = component_proteins_by_node(&graph, "2", NameMode::Gene, &dict, None).unwrap();
        assert_eq!(report.protein_counts.len(), 1);
        assert_eq!(report.protein_counts[0].protein, "ACT1");
        assert_eq!(report.protein_counts[0].count, 2);
    }

    #[test]
    fn test_missing_node_is_not_found() {
        let graph = parse_gdf("nodedef>name\n1\n");
        let err =
            component_proteins_by_node(&graph, "42", NameMode::Systematic, &GeneDictionary::empty(), None)
                .unwrap_err();
        assert!(err.is_not_found());
        assert!(err.to_string().contains("42"));
    }

    #[test]
    fn test_component_subgraph() {
        let graph = parse_gdf(
            "nodedef>name,label\n1,A\n2,B\n3,C\nedgedef>node1,node2,weight\n1,2,0.5\n",
        );
        let sub = component_subgraph(&graph, 0).unwrap();
        assert_eq!(sub.node_count(), 2);
        assert_eq!(sub.edge_count(), 1);
        assert_eq!(sub.edges[0].weight(), 0.5);

        let sub = component_subgraph(&graph, 1).unwrap();
        assert_eq!(sub.node_ids().collect::<Vec<_>>(), vec!["3"]);

        assert!(component_subgraph(&graph, 2).unwrap_err().is_not_found());
    }

    #[test]
    fn test_summaries() {
        let graph = parse_gdf(
            "nodedef>name,label\n1,'A B'\n2,'B'\n3,'C'\nedgedef>node1,node2\n1,2\n2,1\n",
        );
        let analysis = ComponentAnalysis::new(&graph, NameMode::Systematic, &GeneDictionary::empty());
        let summaries = analysis.summaries();
        assert_eq!(summaries.len(), 2);
        assert_eq!(summaries[0].edge_count, 2);
        assert_eq!(summaries[0].protein_count, 2);
        assert_eq!(summaries[1].protein_count, 1);
    }
}
