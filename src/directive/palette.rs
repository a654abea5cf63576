//! Colour palette assigned to chart series records.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Built-in colours used when a directive does not carry its own.
pub const DEFAULT_COLORS: [&str; 6] = [
    "#0088FE", "#00C49F", "#FFBB28", "#FF8042", "#8884d8", "#82ca9d",
];

/// An ordered, non-empty sequence of colour tokens.
///
/// Records are coloured by index, wrapping around when the series is longer
/// than the palette.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "Vec<String>", into = "Vec<String>")]
pub struct Palette {
    colors: Vec<String>,
}

/// Returned when a palette would be built from zero colours.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EmptyPaletteError;

impl fmt::Display for EmptyPaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "palette must contain at least one colour")
    }
}

impl std::error::Error for EmptyPaletteError {}

impl Palette {
    /// Build a palette from colour tokens.
    ///
    /// # Errors
    ///
    /// Returns [`EmptyPaletteError`] when `colors` is empty.
    pub fn new<I, S>(colors: I) -> Result<Self, EmptyPaletteError>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let colors: Vec<String> = colors.into_iter().map(Into::into).collect();
        if colors.is_empty() {
            return Err(EmptyPaletteError);
        }
        Ok(Self { colors })
    }

    /// Number of distinct colours.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always `false`; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Colour for the record at `index`, cycling modulo the palette length.
    pub fn color_for(&self, index: usize) -> &str {
        &self.colors[index % self.colors.len()]
    }

    /// Index into the palette used for the record at `index`.
    pub fn slot_for(&self, index: usize) -> usize {
        index % self.colors.len()
    }

    pub fn colors(&self) -> &[String] {
        &self.colors
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            colors: DEFAULT_COLORS.iter().map(|c| c.to_string()).collect(),
        }
    }
}

impl TryFrom<Vec<String>> for Palette {
    type Error = EmptyPaletteError;

    fn try_from(colors: Vec<String>) -> Result<Self, Self::Error> {
        Palette::new(colors)
    }
}

impl From<Palette> for Vec<String> {
    fn from(palette: Palette) -> Self {
        palette.colors
    }
}
