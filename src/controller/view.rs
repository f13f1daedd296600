use crate::graph::NodeId;

/// Camera and simulation requests for the canvas.
#[derive(Clone, Debug, PartialEq)]
pub enum ViewCommand {
	/// Run the simulation for a fixed number of steps.
	Stabilize,
	/// Animate the camera so every node is visible.
	Fit { duration_ms: f64 },
	/// Animate the camera onto one node.
	Focus { node: NodeId, scale: f64 },
	/// Replace the selection.
	Select(Vec<NodeId>),
}

pub const FIT_DURATION_MS: f64 = 1000.0;
pub const FOCUS_SCALE: f64 = 1.6;

const RETAINED: usize = 16;

/// Sequence-numbered commands. The canvas remembers the last sequence number
/// it applied and picks up anything newer.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ViewQueue {
	next_seq: u64,
	commands: Vec<(u64, ViewCommand)>,
}

impl ViewQueue {
	pub fn push(&mut self, command: ViewCommand) {
		self.next_seq += 1;
		self.commands.push((self.next_seq, command));
		if self.commands.len() > RETAINED {
			let excess = self.commands.len() - RETAINED;
			self.commands.drain(..excess);
		}
	}

	pub fn since(&self, seq: u64) -> impl Iterator<Item = &(u64, ViewCommand)> {
		self.commands.iter().filter(move |(s, _)| *s > seq)
	}
}
