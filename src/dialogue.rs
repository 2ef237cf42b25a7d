//! Dialogue node tables and the typed-text conversation state machine.
//!
//! A table is loaded per scripted event from a JSON document:
//!
//! ```json
//! { "start": 0,
//!   "nodes": [
//!     { "id": 0, "name": "Clerk", "text": ["Welcome!", "Coffee?"],
//!       "options": [ { "text": "Yes", "next": 1 }, { "text": "Bye", "next": -1 } ],
//!       "sound": "bell" } ] }
//! ```
//!
//! `next == -1` ends the conversation and `next == -2` ends the session.

use serde::Deserialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info, warn};

use crate::error::DialogueError;

/// Lines kept per node.
pub const MAX_LINES: usize = 4;
/// Options kept per node.
pub const MAX_OPTIONS: usize = 4;

/// Where a confirmed option leads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextNode {
    /// Go to the node with this id.
    Node(i64),
    /// End the conversation (`-1`).
    End,
    /// End the session (`-2`).
    Quit,
}

impl From<i64> for NextNode {
    fn from(id: i64) -> Self {
        match id {
            -1 => NextNode::End,
            -2 => NextNode::Quit,
            n => NextNode::Node(n),
        }
    }
}

/// A choice shown once every line is revealed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueOption {
    /// Label shown to the player.
    pub text: String,
    /// Where choosing it leads.
    pub next: NextNode,
}

/// One speaker turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueNode {
    /// Node id, unique within the table.
    pub id: i64,
    /// Speaker name.
    pub name: String,
    /// Text lines, revealed in order.
    pub lines: Vec<String>,
    /// Choices; none means confirm ends the dialogue.
    pub options: Vec<DialogueOption>,
    /// Cue played when the conversation ends here.
    pub exit_sound: Option<String>,
}

#[derive(Deserialize)]
struct JsonOption {
    text: String,
    next: i64,
}

#[derive(Deserialize)]
struct JsonNode {
    id: i64,
    #[serde(default)]
    name: String,
    #[serde(default)]
    text: Vec<String>,
    #[serde(default)]
    options: Vec<JsonOption>,
    #[serde(default)]
    sound: Option<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum JsonDialogue {
    Table {
        #[serde(default)]
        start: Option<i64>,
        nodes: Vec<JsonNode>,
    },
    Bare(Vec<JsonNode>),
}

/// The nodes of one event's conversation. Static once loaded.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DialogueTable {
    /// Event the table was loaded for.
    pub event_id: Option<i64>,
    start: Option<i64>,
    nodes: Vec<DialogueNode>,
}

impl DialogueTable {
    /// Parse either the `{ start, nodes }` form or a bare node array.
    pub fn from_document(event_id: i64, doc: &JsonValue) -> Result<Self, DialogueError> {
        let parsed = JsonDialogue::deserialize(doc)
            .map_err(|source| DialogueError::Malformed { event_id, source })?;
        let (start, raw) = match parsed {
            JsonDialogue::Table { start, nodes } => (start, nodes),
            JsonDialogue::Bare(nodes) => (None, nodes),
        };

        let mut nodes: Vec<DialogueNode> = Vec::with_capacity(raw.len());
        for node in raw {
            if nodes.iter().any(|n| n.id == node.id) {
                return Err(DialogueError::DuplicateNode(node.id));
            }
            if node.text.len() > MAX_LINES || node.options.len() > MAX_OPTIONS {
                warn!(
                    event_id,
                    node = node.id,
                    lines = node.text.len(),
                    options = node.options.len(),
                    "dialogue_node_truncated"
                );
            }
            nodes.push(DialogueNode {
                id: node.id,
                name: node.name,
                lines: node.text.into_iter().take(MAX_LINES).collect(),
                options: node
                    .options
                    .into_iter()
                    .take(MAX_OPTIONS)
                    .map(|o| DialogueOption {
                        text: o.text,
                        next: o.next.into(),
                    })
                    .collect(),
                exit_sound: node.sound,
            });
        }

        Ok(DialogueTable {
            event_id: Some(event_id),
            start: start.or_else(|| nodes.first().map(|n| n.id)),
            nodes,
        })
    }

    /// `true` when there are no nodes.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Id of the first node.
    pub fn start(&self) -> Option<i64> {
        self.start
    }

    /// Node by id.
    pub fn get(&self, id: i64) -> Option<&DialogueNode> {
        self.nodes.iter().find(|n| n.id == id)
    }

    /// Back to the empty table.
    pub fn clear(&mut self) {
        *self = DialogueTable::default();
    }
}

/// Runtime position inside a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueCursor {
    /// Current node.
    pub node: i64,
    /// Node we came from.
    pub previous: Option<i64>,
    /// Line being revealed.
    pub line: usize,
    /// Characters of that line revealed so far.
    pub revealed: usize,
    line_start_ms: u64,
    /// All lines shown; options are selectable.
    pub choosing: bool,
    /// Highlighted option.
    pub selected: usize,
}

impl DialogueCursor {
    fn enter(node: i64, previous: Option<i64>, now_ms: u64) -> Self {
        DialogueCursor {
            node,
            previous,
            line: 0,
            revealed: 0,
            line_start_ms: now_ms,
            choosing: false,
            selected: 0,
        }
    }
}

/// Result of confirming the highlighted option.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DialogueOutcome {
    /// Nothing to confirm yet.
    Ignored,
    /// Moved to another node.
    Advanced(i64),
    /// Conversation over; the caller plays the cue and tears down the event.
    Ended {
        /// Cue of the node the conversation ended on.
        exit_sound: Option<String>,
    },
    /// The whole session should stop.
    Quit,
}

/// Drives one conversation at a time.
#[derive(Debug, Clone)]
pub struct DialogueController {
    reveal_interval_ms: u64,
    cursor: Option<DialogueCursor>,
}

impl DialogueController {
    /// Idle controller revealing one character per `reveal_interval_ms`.
    pub fn new(reveal_interval_ms: u64) -> Self {
        DialogueController {
            reveal_interval_ms: reveal_interval_ms.max(1),
            cursor: None,
        }
    }

    /// A conversation is running.
    pub fn is_active(&self) -> bool {
        self.cursor.is_some()
    }

    /// Position in the running conversation.
    pub fn cursor(&self) -> Option<&DialogueCursor> {
        self.cursor.as_ref()
    }

    /// Enter the table's start node. Returns `false` for an empty table.
    pub fn start(&mut self, table: &DialogueTable, now_ms: u64) -> bool {
        match table.start().filter(|id| table.get(*id).is_some()) {
            Some(id) => {
                info!(event_id = ?table.event_id, node = id, "dialogue_started");
                self.cursor = Some(DialogueCursor::enter(id, None, now_ms));
                true
            }
            None => false,
        }
    }

    /// Reveal characters for the time elapsed, moving across lines as they
    /// complete and presenting options after the last one.
    pub fn update(&mut self, table: &DialogueTable, now_ms: u64) {
        let interval = self.reveal_interval_ms;
        let Some(cursor) = self.cursor.as_mut() else {
            return;
        };
        let Some(node) = table.get(cursor.node) else {
            return;
        };
        while !cursor.choosing {
            let Some(line) = node.lines.get(cursor.line) else {
                cursor.choosing = true;
                break;
            };
            let len = line.chars().count();
            let elapsed = now_ms.saturating_sub(cursor.line_start_ms);
            cursor.revealed = ((elapsed / interval) as usize).min(len);
            if cursor.revealed < len {
                break;
            }
            if cursor.line + 1 < node.lines.len() {
                cursor.line_start_ms += len as u64 * interval;
                cursor.line += 1;
                cursor.revealed = 0;
            } else {
                cursor.choosing = true;
            }
        }
    }

    /// Move the highlight, wrapping around the node's options.
    pub fn navigate(&mut self, table: &DialogueTable, delta: i32) {
        let Some(cursor) = self.cursor.as_mut() else {
            return;
        };
        let count = table.get(cursor.node).map_or(0, |n| n.options.len());
        if !cursor.choosing || count == 0 {
            return;
        }
        let count = count as i32;
        cursor.selected = (cursor.selected as i32 + delta).rem_euclid(count) as usize;
    }

    /// Take the highlighted option. Ignored until every line is revealed.
    pub fn confirm(&mut self, table: &DialogueTable, now_ms: u64) -> DialogueOutcome {
        let Some(cursor) = self.cursor.as_ref() else {
            return DialogueOutcome::Ignored;
        };
        if !cursor.choosing {
            return DialogueOutcome::Ignored;
        }
        let Some(node) = table.get(cursor.node) else {
            return DialogueOutcome::Ignored;
        };
        let next = node
            .options
            .get(cursor.selected)
            .map_or(NextNode::End, |o| o.next);
        let exit_sound = node.exit_sound.clone();
        let current = cursor.node;

        match next {
            NextNode::Node(id) if table.get(id).is_some() => {
                debug!(from = current, to = id, "dialogue_advanced");
                self.cursor = Some(DialogueCursor::enter(id, Some(current), now_ms));
                DialogueOutcome::Advanced(id)
            }
            NextNode::Node(id) => {
                warn!(from = current, to = id, "dialogue_target_missing");
                self.cursor = None;
                DialogueOutcome::Ended { exit_sound }
            }
            NextNode::End => {
                info!(node = current, "dialogue_ended");
                self.cursor = None;
                DialogueOutcome::Ended { exit_sound }
            }
            NextNode::Quit => {
                info!(node = current, "quit_requested");
                self.cursor = None;
                DialogueOutcome::Quit
            }
        }
    }

    /// Lines as currently shown: completed lines plus the partial one.
    pub fn visible_lines<'t>(&self, table: &'t DialogueTable) -> Vec<&'t str> {
        let Some(cursor) = self.cursor.as_ref() else {
            return Vec::new();
        };
        let Some(node) = table.get(cursor.node) else {
            return Vec::new();
        };
        let mut out: Vec<&str> = node.lines.iter().take(cursor.line).map(String::as_str).collect();
        if let Some(line) = node.lines.get(cursor.line) {
            let end = line
                .char_indices()
                .nth(cursor.revealed)
                .map_or(line.len(), |(i, _)| i);
            out.push(&line[..end]);
        }
        out
    }
}
