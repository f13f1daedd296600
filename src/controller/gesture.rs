use crate::graph::NodeId;

/// Result of a double-click on the canvas.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GestureOutcome {
	/// Double-click on empty canvas.
	Ignored,
	/// First endpoint chosen.
	Selected(NodeId),
	/// Same node double-clicked twice.
	Cleared,
	/// Second endpoint chosen; the caller creates the edge.
	Connect { from: NodeId, to: NodeId },
}

/// Two double-clicks on different nodes connect them.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EdgeGesture {
	pending: Option<NodeId>,
}

impl EdgeGesture {
	pub fn pending(&self) -> Option<&NodeId> {
		self.pending.as_ref()
	}

	pub fn double_click(&mut self, node: Option<NodeId>) -> GestureOutcome {
		let Some(node) = node else {
			return GestureOutcome::Ignored;
		};
		match self.pending.take() {
			None => {
				self.pending = Some(node.clone());
				GestureOutcome::Selected(node)
			}
			Some(from) if from == node => GestureOutcome::Cleared,
			Some(from) => GestureOutcome::Connect { from, to: node },
		}
	}

	pub fn reset(&mut self) {
		self.pending = None;
	}
}
