//! Feed categories.
//!
//! The library treats a category code as an opaque path segment; this table
//! is the viewer's own mapping from the sections a user picks to the codes
//! the feed server understands.

/// A news section with a known feed code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Category {
    #[default]
    TopStories,
    JustIn,
    World,
    Australia,
    Business,
    Entertainment,
    Sport,
    TheDrum,
}

impl Category {
    /// Every category, in the order the viewer cycles through them.
    pub const ALL: [Category; 8] = [
        Category::TopStories,
        Category::JustIn,
        Category::World,
        Category::Australia,
        Category::Business,
        Category::Entertainment,
        Category::Sport,
        Category::TheDrum,
    ];

    /// The feed path segment for this category.
    pub fn code(self) -> &'static str {
        match self {
            Category::TopStories => "45910",
            Category::JustIn => "51120",
            Category::World => "52278",
            Category::Australia => "46182",
            Category::Business => "51892",
            Category::Entertainment => "46800",
            Category::Sport => "45924",
            Category::TheDrum => "1054578",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Category::TopStories => "Top Stories",
            Category::JustIn => "Just In",
            Category::World => "World",
            Category::Australia => "Australia",
            Category::Business => "Business",
            Category::Entertainment => "Entertainment",
            Category::Sport => "Sport",
            Category::TheDrum => "The Drum",
        }
    }

    /// Category at position `index` of [`Category::ALL`]; anything out of
    /// range falls back to Top Stories.
    pub fn from_index(index: usize) -> Self {
        Self::ALL.get(index).copied().unwrap_or_default()
    }

    pub fn index(self) -> usize {
        Self::ALL.iter().position(|&c| c == self).unwrap_or(0)
    }

    /// Resolve a command-line value: either an index into
    /// [`Category::ALL`] or a feed code.
    pub fn parse(value: &str) -> Option<Self> {
        if let Some(category) = Self::ALL.iter().copied().find(|c| c.code() == value) {
            return Some(category);
        }
        value
            .parse::<usize>()
            .ok()
            .filter(|&i| i < Self::ALL.len())
            .map(Self::from_index)
    }

    pub fn next(self) -> Self {
        Self::from_index((self.index() + 1) % Self::ALL.len())
    }

    pub fn previous(self) -> Self {
        Self::from_index((self.index() + Self::ALL.len() - 1) % Self::ALL.len())
    }
}
