use std::collections::HashSet;

use super::GraphError;
use super::types::{EdgeDraft, EdgeId, GraphEdge, GraphNode, GraphSnapshot, NodeId};

/// In-memory node and edge sets backing the canvas.
///
/// Ids handed out by the store come from monotonic counters, so nodes created
/// in quick succession never collide and parallel edges between the same
/// pair of nodes keep distinct ids.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphStore {
	nodes: Vec<GraphNode>,
	edges: Vec<GraphEdge>,
	next_node: u64,
	next_edge: u64,
	revision: u64,
}

impl GraphStore {
	/// Adds an unstyled node and returns its freshly generated id.
	pub fn add_node(&mut self, label: impl Into<String>) -> NodeId {
		let id = self.fresh_node_id();
		self.nodes.push(GraphNode::labelled(id.clone(), label));
		self.touch();
		id
	}

	/// Adds a node carrying its own id, rejecting duplicates.
	pub fn insert_node(&mut self, node: GraphNode) -> Result<(), GraphError> {
		if self.contains_node(&node.id) {
			return Err(GraphError::DuplicateNode(node.id));
		}
		self.nodes.push(node);
		self.touch();
		Ok(())
	}

	/// Adds an unstyled edge between two existing nodes.
	pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> Result<EdgeId, GraphError> {
		self.insert_edge(EdgeDraft::plain(from, to))
	}

	/// Adds an edge between two existing nodes, assigning it a new id.
	pub fn insert_edge(&mut self, draft: EdgeDraft) -> Result<EdgeId, GraphError> {
		for endpoint in [&draft.from, &draft.to] {
			if !self.contains_node(endpoint) {
				return Err(GraphError::UnknownEndpoint(endpoint.clone()));
			}
		}
		let id = self.fresh_edge_id();
		self.edges.push(draft.into_edge(id.clone()));
		self.touch();
		Ok(id)
	}

	pub fn clear(&mut self) {
		self.nodes.clear();
		self.edges.clear();
		self.touch();
	}

	pub fn get_all(&self) -> (&[GraphNode], &[GraphEdge]) {
		(&self.nodes, &self.edges)
	}

	pub fn nodes(&self) -> &[GraphNode] {
		&self.nodes
	}

	pub fn edges(&self) -> &[GraphEdge] {
		&self.edges
	}

	pub fn contains_node(&self, id: &NodeId) -> bool {
		self.nodes.iter().any(|n| &n.id == id)
	}

	/// Replaces the whole graph after checking that node ids and edge ids
	/// are unique and that every edge endpoint exists. On error the store is
	/// left untouched.
	pub fn replace_all(&mut self, nodes: Vec<GraphNode>, edges: Vec<GraphEdge>) -> Result<(), GraphError> {
		validate(&nodes, &edges)?;
		self.nodes = nodes;
		self.edges = edges;
		self.touch();
		Ok(())
	}

	/// Bumped on every mutation.
	pub fn revision(&self) -> u64 {
		self.revision
	}

	pub fn snapshot(&self) -> GraphSnapshot {
		GraphSnapshot {
			revision: self.revision,
			nodes: self.nodes.clone(),
			edges: self.edges.clone(),
		}
	}

	fn touch(&mut self) {
		self.revision += 1;
	}

	fn fresh_node_id(&mut self) -> NodeId {
		loop {
			self.next_node += 1;
			let id = NodeId::new(format!("n{}", self.next_node));
			if !self.contains_node(&id) {
				return id;
			}
		}
	}

	fn fresh_edge_id(&mut self) -> EdgeId {
		loop {
			self.next_edge += 1;
			let id = EdgeId::new(format!("e{}", self.next_edge));
			if !self.edges.iter().any(|e| e.id == id) {
				return id;
			}
		}
	}
}

fn validate(nodes: &[GraphNode], edges: &[GraphEdge]) -> Result<(), GraphError> {
	let mut node_ids = HashSet::with_capacity(nodes.len());
	for node in nodes {
		if !node_ids.insert(&node.id) {
			return Err(GraphError::DuplicateNode(node.id.clone()));
		}
	}

	let mut edge_ids = HashSet::with_capacity(edges.len());
	for edge in edges {
		if !edge_ids.insert(&edge.id) {
			return Err(GraphError::DuplicateEdge(edge.id.clone()));
		}
		for endpoint in [&edge.from, &edge.to] {
			if !node_ids.contains(endpoint) {
				return Err(GraphError::DanglingEdge {
					edge: edge.id.clone(),
					node: endpoint.clone(),
				});
			}
		}
	}
	Ok(())
}

#[cfg(test)]
mod tests {
	use super::*;

	fn endpoints_present(store: &GraphStore) -> bool {
		let (nodes, edges) = store.get_all();
		edges
			.iter()
			.all(|e| nodes.iter().any(|n| n.id == e.from) && nodes.iter().any(|n| n.id == e.to))
	}

	#[test]
	fn rapid_node_creation_yields_unique_ids() {
		let mut store = GraphStore::default();
		let ids: HashSet<_> = (0..500).map(|i| store.add_node(format!("n{i}"))).collect();
		assert_eq!(ids.len(), 500);
	}

	#[test]
	fn parallel_edges_keep_distinct_ids() {
		let mut store = GraphStore::default();
		let a = store.add_node("A");
		let b = store.add_node("B");
		let first = store.add_edge(a.clone(), b.clone()).unwrap();
		let second = store.add_edge(a, b).unwrap();
		assert_ne!(first, second);
		assert_eq!(store.edges().len(), 2);
	}

	#[test]
	fn edges_to_missing_nodes_are_rejected() {
		let mut store = GraphStore::default();
		let a = store.add_node("A");
		let err = store.add_edge(a, NodeId::from("ghost")).unwrap_err();
		assert!(matches!(err, GraphError::UnknownEndpoint(node) if node.to_string() == "ghost"));
		assert!(store.edges().is_empty());
		assert!(endpoints_present(&store));
	}

	#[test]
	fn replace_all_rejects_dangling_edges_and_keeps_state() {
		let mut store = GraphStore::default();
		let a = store.add_node("A");
		let before = store.snapshot();

		let nodes = vec![GraphNode::labelled(NodeId::from("x"), "X")];
		let edges = vec![EdgeDraft::plain(NodeId::from("x"), NodeId::from("y")).into_edge(EdgeId::from("e"))];
		assert!(store.replace_all(nodes, edges).is_err());
		assert_eq!(store.snapshot(), before);
		assert!(store.contains_node(&a));
	}

	#[test]
	fn replace_all_rejects_duplicate_ids() {
		let mut store = GraphStore::default();
		let nodes = vec![
			GraphNode::labelled(NodeId::from("x"), "X"),
			GraphNode::labelled(NodeId::from("x"), "X again"),
		];
		assert!(matches!(
			store.replace_all(nodes, Vec::new()),
			Err(GraphError::DuplicateNode(id)) if id.to_string() == "x"
		));
	}

	#[test]
	fn generated_ids_skip_imported_ones() {
		let mut store = GraphStore::default();
		store
			.replace_all(vec![GraphNode::labelled(NodeId::from("n1"), "imported")], Vec::new())
			.unwrap();
		let id = store.add_node("fresh");
		assert_ne!(id.to_string(), "n1");
		assert_eq!(store.nodes().len(), 2);
	}

	#[test]
	fn mutations_bump_the_revision() {
		let mut store = GraphStore::default();
		let start = store.revision();
		store.add_node("A");
		store.clear();
		assert_eq!(store.revision(), start + 2);
	}
}
