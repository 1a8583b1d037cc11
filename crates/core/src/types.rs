//! Domain types for the Waymark POD integration layer.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use std::fmt;

// ---------------------------------------------------------------------------
// Access modes
// ---------------------------------------------------------------------------

/// A unit of access capability on a POD resource.
///
/// Fixed WAC vocabulary -- these four modes are exhaustive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Mode {
    Read,
    Write,
    Append,
    Control,
}

impl Mode {
    pub const ALL: [Mode; 4] = [Mode::Read, Mode::Write, Mode::Append, Mode::Control];
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Mode::Read => "Read",
            Mode::Write => "Write",
            Mode::Append => "Append",
            Mode::Control => "Control",
        };
        f.write_str(s)
    }
}

/// Duplicate-free, unordered set of [`Mode`]s.
///
/// `SmallVec<[Mode; 4]>` keeps the set inline: only four modes exist, so
/// the backing store never spills to the heap. Equality is set equality,
/// insertion order does not matter.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(from = "SmallVec<[Mode; 4]>")]
pub struct ModeSet(SmallVec<[Mode; 4]>);

impl ModeSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_modes(modes: &[Mode]) -> Self {
        let mut set = Self::new();
        for &mode in modes {
            set.insert(mode);
        }
        set
    }

    /// Inserts a mode. Duplicates are a no-op.
    pub fn insert(&mut self, mode: Mode) {
        if !self.0.contains(&mode) {
            self.0.push(mode);
        }
    }

    pub fn contains(&self, mode: Mode) -> bool {
        self.0.contains(&mode)
    }

    /// Unions every mode of `other` into `self`.
    pub fn union_with(&mut self, other: &ModeSet) {
        for &mode in other.iter() {
            self.insert(mode);
        }
    }

    /// True iff every mode of `required` is present.
    pub fn is_superset_of(&self, required: &ModeSet) -> bool {
        required.iter().all(|&mode| self.contains(mode))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Mode> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

// Deserialization funnels through `insert`, so wire data with repeated
// modes still ends up duplicate-free.
impl From<SmallVec<[Mode; 4]>> for ModeSet {
    fn from(modes: SmallVec<[Mode; 4]>) -> Self {
        let mut set = ModeSet::new();
        for mode in modes {
            set.insert(mode);
        }
        set
    }
}

impl PartialEq for ModeSet {
    fn eq(&self, other: &Self) -> bool {
        self.len() == other.len() && self.iter().all(|&mode| other.contains(mode))
    }
}

impl Eq for ModeSet {}

// ---------------------------------------------------------------------------
// Permission entries
// ---------------------------------------------------------------------------

/// One ACL permission entry: a set of agents granted a set of modes.
///
/// `agents == None` is the "everyone" sentinel -- the grant applies to all
/// requesters. Agent identifiers are opaque WebID URIs supplied by the
/// caller; this layer never interprets them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PermissionEntry {
    pub agents: Option<Vec<String>>,
    pub modes: ModeSet,
}

impl PermissionEntry {
    /// An entry granting `modes` to everyone.
    pub fn everyone(modes: ModeSet) -> Self {
        Self {
            agents: None,
            modes,
        }
    }

    /// An entry granting `modes` to a single named agent.
    pub fn for_agent(agent: impl Into<String>, modes: ModeSet) -> Self {
        Self {
            agents: Some(vec![agent.into()]),
            modes,
        }
    }

    pub fn is_everyone(&self) -> bool {
        self.agents.is_none()
    }

    pub fn names_agent(&self, agent: &str) -> bool {
        self.agents
            .as_ref()
            .map_or(false, |agents| agents.iter().any(|id| id == agent))
    }
}

/// Selects which entries of a list a query or merge applies to.
///
/// An explicit tagged choice, so call sites match on the grant shape
/// instead of null-checking agent lists.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AgentSelector {
    /// The everyone entry (`agents == None`).
    Everyone,
    /// Entries naming this specific agent.
    Agent(String),
}

impl AgentSelector {
    pub fn agent(id: impl Into<String>) -> Self {
        Self::Agent(id.into())
    }

    pub fn matches(&self, entry: &PermissionEntry) -> bool {
        match self {
            AgentSelector::Everyone => entry.is_everyone(),
            AgentSelector::Agent(id) => entry.names_agent(id),
        }
    }
}

// ---------------------------------------------------------------------------
// Route domain objects
// ---------------------------------------------------------------------------

/// A single latitude/longitude point along a route's itinerary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrackPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Reference (JSON-LD `@id`) to a comment resource attached to a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommentRef {
    pub id: String,
}

/// Reference (JSON-LD `@id`) to a media resource (photo, video).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediaRef {
    pub id: String,
}

/// A route stored on a POD: name, description, itinerary, attachments.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub name: String,
    pub description: String,
    pub itinerary: Vec<TrackPoint>,
    pub media: Vec<MediaRef>,
    pub comments: Vec<CommentRef>,
}
