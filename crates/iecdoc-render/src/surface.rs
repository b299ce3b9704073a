//! Page surfaces handed to the export driver.

use std::fmt;

/// Page width in CSS pixels (8.5in at 96 dpi)
pub const PAGE_WIDTH: f32 = 816.0;

/// Page height in CSS pixels (11in at 96 dpi)
pub const PAGE_HEIGHT: f32 = 1056.0;

/// Which page of a student's transcript a surface is
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageKind {
    /// Student details, course table, grading scale, signature
    Transcript,
    /// Program level descriptions
    Levels,
}

impl fmt::Display for PageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageKind::Transcript => write!(f, "transcript"),
            PageKind::Levels => write!(f, "levels"),
        }
    }
}

/// One laid-out page, ready for capture
///
/// The markup is a standalone SVG document of `width` × `height` CSS
/// pixels. Surfaces are immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct PageSurface {
    index: usize,
    student: String,
    kind: PageKind,
    width: f32,
    height: f32,
    markup: String,
}

impl PageSurface {
    /// Create a surface from SVG markup
    pub fn new(
        index: usize,
        student: impl Into<String>,
        kind: PageKind,
        width: f32,
        height: f32,
        markup: impl Into<String>,
    ) -> Self {
        Self {
            index,
            student: student.into(),
            kind,
            width,
            height,
            markup: markup.into(),
        }
    }

    /// Position in the export sequence
    pub fn index(&self) -> usize {
        self.index
    }

    /// Grouping key of the student this page belongs to
    pub fn student(&self) -> &str {
        &self.student
    }

    pub fn kind(&self) -> PageKind {
        self.kind
    }

    /// Width in CSS pixels
    pub fn width(&self) -> f32 {
        self.width
    }

    /// Height in CSS pixels
    pub fn height(&self) -> f32 {
        self.height
    }

    /// SVG document
    pub fn markup(&self) -> &str {
        &self.markup
    }
}

impl fmt::Display for PageSurface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} ({} page of '{}')", self.index + 1, self.kind, self.student)
    }
}
