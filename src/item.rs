use serde::{Deserialize, Serialize};

pub const NUMBER_OF_CATEGORIES: usize = 4;

/// One story row as shown in a category listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Item {
    pub id: u64,
    pub author: String,
    pub title: String,
    pub score: i64,
    pub comments_count: i64,
    pub time_ago: String,
    pub url: String,
    pub domain: String,
}

/// A node in a comment thread. The root node carries the story itself.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct CommentNode {
    pub id: u64,
    pub author: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub body: String,
    pub time_ago: String,
    #[serde(default)]
    pub comments_count: i64,
    #[serde(default)]
    pub score: i64,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub domain: String,
    #[serde(default)]
    pub replies: Vec<CommentNode>,
}

impl CommentNode {
    /// Number of nodes below this one.
    pub fn descendants(&self) -> usize {
        self.replies
            .iter()
            .map(|reply| 1 + reply.descendants())
            .sum()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Hash, Default)]
#[serde(rename_all = "lowercase")]
pub enum Category {
    #[default]
    FrontPage,
    New,
    Ask,
    Show,
}

impl Category {
    pub const ALL: [Category; NUMBER_OF_CATEGORIES] =
        [Category::FrontPage, Category::New, Category::Ask, Category::Show];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % NUMBER_OF_CATEGORIES]
    }

    pub fn next(self) -> Self {
        Self::from_index(self.index() + 1)
    }

    pub fn previous(self) -> Self {
        Self::from_index(self.index() + NUMBER_OF_CATEGORIES - 1)
    }

    pub fn endpoint(&self) -> &'static str {
        match self {
            Category::FrontPage => "topstories",
            Category::New => "newstories",
            Category::Ask => "askstories",
            Category::Show => "showstories",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Category::FrontPage => "top",
            Category::New => "new",
            Category::Ask => "ask",
            Category::Show => "show",
        }
    }
}
