//! Navigation history.
//!
//! A linear stack of visited paths with a cursor. Navigating while the
//! cursor is behind the newest entry discards the forward entries, the way a
//! browser does.

/// A visited navigation target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryEntry {
	path: String,
}

impl HistoryEntry {
	/// Creates an entry for `path`.
	pub fn new(path: impl Into<String>) -> Self {
		Self { path: path.into() }
	}

	/// Returns the full navigation target, including any query string.
	pub fn path(&self) -> &str {
		&self.path
	}
}

/// Linear navigation history with a cursor.
#[derive(Debug, Clone, Default)]
pub struct NavigationHistory {
	entries: Vec<HistoryEntry>,
	index: Option<usize>,
	limit: Option<usize>,
}

impl NavigationHistory {
	/// Creates an empty, unbounded history.
	pub fn new() -> Self {
		Self::default()
	}

	/// Creates an empty history that keeps at most `limit` entries.
	///
	/// A limit of zero is treated as one: the current entry is always kept.
	pub fn with_limit(limit: usize) -> Self {
		Self {
			limit: Some(limit.max(1)),
			..Self::default()
		}
	}

	/// Appends `path` after the cursor and moves the cursor onto it.
	///
	/// Entries ahead of the cursor are discarded. When a limit is set the
	/// oldest entries are dropped to stay within it.
	pub fn navigate(&mut self, path: impl Into<String>) {
		if let Some(index) = self.index {
			self.entries.truncate(index + 1);
		}
		self.entries.push(HistoryEntry::new(path));

		if let Some(limit) = self.limit
			&& self.entries.len() > limit
		{
			let excess = self.entries.len() - limit;
			self.entries.drain(..excess);
		}
		self.index = Some(self.entries.len() - 1);
	}

	/// Same as [`navigate`](Self::navigate).
	pub fn push(&mut self, path: impl Into<String>) {
		self.navigate(path);
	}

	/// Overwrites the current entry with `path`.
	///
	/// On an empty history this creates the first entry.
	pub fn replace(&mut self, path: impl Into<String>) {
		match self.index {
			Some(index) => self.entries[index] = HistoryEntry::new(path),
			None => self.navigate(path),
		}
	}

	/// Moves the cursor one entry back. Returns `false` at the oldest entry.
	pub fn back(&mut self) -> bool {
		match self.index {
			Some(index) if index > 0 => {
				self.index = Some(index - 1);
				true
			}
			_ => false,
		}
	}

	/// Moves the cursor one entry forward. Returns `false` at the newest entry.
	pub fn forward(&mut self) -> bool {
		if self.can_go_forward() {
			self.index = self.index.map(|i| i + 1);
			true
		} else {
			false
		}
	}

	/// Returns whether [`back`](Self::back) would move the cursor.
	pub fn can_go_back(&self) -> bool {
		self.index.is_some_and(|i| i > 0)
	}

	/// Returns whether [`forward`](Self::forward) would move the cursor.
	pub fn can_go_forward(&self) -> bool {
		self.index.is_some_and(|i| i + 1 < self.entries.len())
	}

	/// Returns the entry under the cursor.
	pub fn current(&self) -> Option<&HistoryEntry> {
		self.index.and_then(|i| self.entries.get(i))
	}

	/// Returns the path under the cursor.
	pub fn current_path(&self) -> Option<&str> {
		self.current().map(HistoryEntry::path)
	}

	/// Returns the cursor position.
	pub fn index(&self) -> Option<usize> {
		self.index
	}

	/// Returns the configured entry limit.
	pub fn limit(&self) -> Option<usize> {
		self.limit
	}

	/// Returns the number of entries.
	pub fn len(&self) -> usize {
		self.entries.len()
	}

	/// Returns whether nothing has been navigated to yet.
	pub fn is_empty(&self) -> bool {
		self.entries.is_empty()
	}

	/// Returns all entries, oldest first.
	pub fn entries(&self) -> &[HistoryEntry] {
		&self.entries
	}
}
