use std::fmt::Display;

/// A position in the source text.
///
/// Attached to parse errors to tell the user where to fix their grammar
#[derive(Debug, Default, PartialEq, Clone, Copy, PartialOrd, Eq)]
pub struct FilePos {
    line: usize,
    column: usize,
}

impl FilePos {
    /// Create a new [`FilePos`] struct.
    ///
    /// # Examples
    /// ```
    /// # use lsys::pos::FilePos;
    /// let fp = FilePos::new(10, 20);
    /// ```
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl Display for FilePos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

impl Ord for FilePos {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.line
            .cmp(&other.line)
            .then(self.column.cmp(&other.column))
    }
}

/// Attach [`FilePos`] to any type `T`, mostly errors
///
/// Implements [`Deref`](std::ops::Deref) to access inner value
#[derive(Debug, PartialEq, Clone)]
pub struct Pos<T> {
    pos: FilePos,
    token: T,
}

impl<T> Pos<T> {
    /// Create new [`Pos`] wrapper.
    pub fn new(token: T, pos: FilePos) -> Self {
        Self { pos, token }
    }

    /// Get attached [`FilePos`]
    pub fn get_pos(&self) -> FilePos {
        self.pos
    }

    pub fn into_inner(self) -> T {
        self.token
    }
}

impl<T> std::ops::Deref for Pos<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.token
    }
}

impl<T> std::ops::DerefMut for Pos<T> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.token
    }
}

impl<T: Display> Display for Pos<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} at {}", self.token, self.pos)
    }
}

impl<T: std::error::Error> std::error::Error for Pos<T> {}

pub trait Positionable: Sized {
    fn attach_pos(self, pos: FilePos) -> Pos<Self>;
}

impl<T> Positionable for T {
    fn attach_pos(self, pos: FilePos) -> Pos<Self> {
        Pos::new(self, pos)
    }
}
