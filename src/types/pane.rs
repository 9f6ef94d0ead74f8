use serde::{Deserialize, Serialize};

/// Edge a column can be pinned to.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Pin {
    Left,
    Right,
}

/// One of the three visual regions that together present a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Pane {
    Left,
    Center,
    Right,
}

impl Pane {
    /// Render order: the center pane first, pinned panes stacked on top.
    pub const ALL: [Pane; 3] = [Pane::Center, Pane::Left, Pane::Right];

    /// The pane a leaf column lives in.
    pub fn for_pin(pin: Option<Pin>) -> Self {
        match pin {
            Some(Pin::Left) => Pane::Left,
            Some(Pin::Right) => Pane::Right,
            None => Pane::Center,
        }
    }

    /// Class name used on the pane container.
    pub fn as_str(self) -> &'static str {
        match self {
            Pane::Left => "left",
            Pane::Center => "center",
            Pane::Right => "right",
        }
    }

    pub fn is_pinned(self) -> bool {
        self != Pane::Center
    }
}

impl std::fmt::Display for Pane {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A set of panes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct PaneSet {
    left: bool,
    center: bool,
    right: bool,
}

impl PaneSet {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn only(pane: Pane) -> Self {
        let mut set = Self::empty();
        set.insert(pane);
        set
    }

    pub fn insert(&mut self, pane: Pane) {
        match pane {
            Pane::Left => self.left = true,
            Pane::Center => self.center = true,
            Pane::Right => self.right = true,
        }
    }

    pub fn contains(self, pane: Pane) -> bool {
        match pane {
            Pane::Left => self.left,
            Pane::Center => self.center,
            Pane::Right => self.right,
        }
    }

    pub fn union(self, other: Self) -> Self {
        Self {
            left: self.left || other.left,
            center: self.center || other.center,
            right: self.right || other.right,
        }
    }

    pub fn is_empty(self) -> bool {
        !(self.left || self.center || self.right)
    }

    /// Members in render order (see [`Pane::ALL`]).
    pub fn iter(self) -> impl Iterator<Item = Pane> {
        Pane::ALL.into_iter().filter(move |pane| self.contains(*pane))
    }
}

impl FromIterator<Pane> for PaneSet {
    fn from_iter<I: IntoIterator<Item = Pane>>(iter: I) -> Self {
        let mut set = Self::empty();
        for pane in iter {
            set.insert(pane);
        }
        set
    }
}
