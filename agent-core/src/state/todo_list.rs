//! Markdown checklist state with `[ ]`/`[x]` semantics.
//!
//! An ordered list of lines matching `- [ ] text` or `- [x] text`. Single-level (no nesting); the
//! whole list is replaced atomically, never edited line-by-line from outside this module.

/// One checklist line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TodoItem {
    pub text: String,
    pub done: bool,
}

/// Markdown checklist: ordered, flat, each line carrying exactly one done/not-done state.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TodoList {
    items: Vec<TodoItem>,
}

impl TodoList {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses markdown of the form `- [ ] text` / `- [x] text`, one item per line. Lines that
    /// don't match the checklist shape are ignored (defensive against stray LLM prose).
    pub fn parse(markdown: &str) -> Self {
        let items = markdown
            .lines()
            .filter_map(|line| {
                let line = line.trim();
                let rest = line.strip_prefix("- [")?;
                let (mark, text) = rest.split_once(']')?;
                let done = match mark {
                    " " => false,
                    "x" | "X" => true,
                    _ => return None,
                };
                Some(TodoItem {
                    text: text.trim().to_string(),
                    done,
                })
            })
            .collect();
        Self { items }
    }

    /// Serialises back to the canonical markdown form.
    pub fn to_markdown(&self) -> String {
        self.items
            .iter()
            .map(|item| {
                format!(
                    "- [{}] {}",
                    if item.done { "x" } else { " " },
                    item.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    /// "no line contains `- [ ]`" — SPEC_FULL.md §3's completion definition.
    pub fn is_complete(&self) -> bool {
        !self.items.is_empty() && self.items.iter().all(|item| item.done)
    }

    pub fn next_open(&self) -> Option<&TodoItem> {
        self.items.iter().find(|item| !item.done)
    }

    /// Marks the first open item done, returning `true` if there was one to mark.
    pub fn mark_next_done(&mut self) -> bool {
        match self.items.iter_mut().find(|item| !item.done) {
            Some(item) => {
                item.done = true;
                true
            }
            None => false,
        }
    }

    pub fn from_plan_steps(steps: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            items: steps
                .into_iter()
                .map(|text| TodoItem {
                    text: text.into(),
                    done: false,
                })
                .collect(),
        }
    }
}
