//! The chat-style log of user and bot messages.

use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
	User,
	Bot,
}

impl Role {
	/// CSS class used by the transcript panel.
	pub fn class(self) -> &'static str {
		match self {
			Role::User => "msg user",
			Role::Bot => "msg bot",
		}
	}
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
	pub role: Role,
	pub text: String,
}

/// Append-only message log. Messages are never edited, only cleared in bulk.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Transcript {
	messages: Vec<ChatMessage>,
}

impl Transcript {
	pub fn push(&mut self, role: Role, text: impl Into<String>) {
		self.messages.push(ChatMessage {
			role,
			text: text.into(),
		});
	}

	pub fn user(&mut self, text: impl Into<String>) {
		self.push(Role::User, text);
	}

	pub fn bot(&mut self, text: impl Into<String>) {
		self.push(Role::Bot, text);
	}

	pub fn clear(&mut self) {
		self.messages.clear();
	}

	pub fn messages(&self) -> &[ChatMessage] {
		&self.messages
	}

	pub fn is_empty(&self) -> bool {
		self.messages.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn messages_keep_their_order() {
		let mut t = Transcript::default();
		t.user("hello");
		t.bot("hi");
		let roles: Vec<_> = t.messages().iter().map(|m| m.role).collect();
		assert_eq!(roles, [Role::User, Role::Bot]);
		assert_eq!(t.messages().last().map(|m| m.text.as_str()), Some("hi"));
	}

	#[test]
	fn clearing_twice_equals_clearing_once() {
		let mut once = Transcript::default();
		once.user("a");
		once.bot("b");
		let mut twice = once.clone();

		once.clear();
		twice.clear();
		twice.clear();
		assert_eq!(once, twice);
		assert!(twice.is_empty());
	}

	#[test]
	fn roles_serialize_lowercase() {
		let msg = ChatMessage {
			role: Role::Bot,
			text: "ok".into(),
		};
		assert_eq!(serde_json::to_string(&msg).unwrap(), r#"{"role":"bot","text":"ok"}"#);
	}
}
