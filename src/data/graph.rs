use serde::Deserialize;

/// Ordinal proficiency classification. Only used to derive node size and
/// color, never fed into the layout forces.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MasteryLevel {
    NotStarted,
    Introduced,
    Developing,
    Proficient,
    Mastered,
}

impl MasteryLevel {
    pub fn ordinal(self) -> u8 {
        match self {
            Self::NotStarted => 1,
            Self::Introduced => 2,
            Self::Developing => 3,
            Self::Proficient => 4,
            Self::Mastered => 5,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::NotStarted => "Not started",
            Self::Introduced => "Introduced",
            Self::Developing => "Developing",
            Self::Proficient => "Proficient",
            Self::Mastered => "Mastered",
        }
    }

    pub const ALL: [Self; 5] = [
        Self::NotStarted,
        Self::Introduced,
        Self::Developing,
        Self::Proficient,
        Self::Mastered,
    ];
}

#[derive(Clone, Debug)]
pub struct TopicNode {
    pub id: String,
    pub display_name: String,
    pub category: Option<String>,
    pub mastery: MasteryLevel,
    pub review_count: u32,
    pub origin_session_title: String,
}

#[derive(Clone, Debug)]
pub struct TopicEdge {
    pub source: String,
    pub target: String,
    pub strength: f32,
}

/// The dataset supplied by the graph data provider, replaced wholesale on
/// every reload. Connections are pre-filtered so both endpoints exist.
#[derive(Clone, Debug)]
pub struct KnowledgeGraph {
    pub nodes: Vec<TopicNode>,
    pub connections: Vec<TopicEdge>,
    pub categories: Vec<String>,
    pub total_topics: usize,
}

impl KnowledgeGraph {
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    pub fn edge_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn mastered_count(&self) -> usize {
        self.nodes
            .iter()
            .filter(|node| node.mastery == MasteryLevel::Mastered)
            .count()
    }
}
