use crate::error::ColorError;
use crate::exclusion::ExclusionSet;
use serde::Serialize;
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    File,
    Directory,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    pub name: String,
    pub kind: EntryKind,
    pub path: PathBuf,
}

impl DirectoryEntry {
    pub fn is_dir(&self) -> bool {
        self.kind == EntryKind::Directory
    }
}

/// Dotted extension (`.png`) as seen by exclusion matching. Names with a
/// single leading dot such as `.gitignore` have no extension.
pub(crate) fn dotted_extension(name: &str) -> Option<&str> {
    name.rfind('.').filter(|&idx| idx > 0).map(|idx| &name[idx..])
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum FileCategory {
    Media,
    Code,
    Markup,
    Data,
    Document,
    Config,
    Script,
    Other,
}

impl FileCategory {
    pub const ALL: [FileCategory; 8] = [
        FileCategory::Media,
        FileCategory::Code,
        FileCategory::Markup,
        FileCategory::Data,
        FileCategory::Document,
        FileCategory::Config,
        FileCategory::Script,
        FileCategory::Other,
    ];

    pub fn label(self) -> &'static str {
        match self {
            FileCategory::Media => "media",
            FileCategory::Code => "code",
            FileCategory::Markup => "markup",
            FileCategory::Data => "data",
            FileCategory::Document => "document",
            FileCategory::Config => "config",
            FileCategory::Script => "script",
            FileCategory::Other => "other",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FileCategory::Media => "images, audio and video",
            FileCategory::Code => "source code",
            FileCategory::Markup => "markup and stylesheets",
            FileCategory::Data => "structured data",
            FileCategory::Document => "documents and text",
            FileCategory::Config => "configuration files",
            FileCategory::Script => "shell and batch scripts",
            FileCategory::Other => "everything else",
        }
    }

    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        Self::ALL.into_iter().find(|category| category.label() == label)
    }

    pub fn default_color(self) -> HexColor {
        match self {
            FileCategory::Media => HexColor::rgb(0xC6, 0x79, 0xDC),
            FileCategory::Code => HexColor::rgb(0x5C, 0xA3, 0xDD),
            FileCategory::Markup => HexColor::rgb(0xF9, 0xD7, 0x7E),
            FileCategory::Data => HexColor::rgb(0x98, 0xC4, 0x79),
            FileCategory::Document => HexColor::rgb(0x7E, 0xF9, 0xDF),
            FileCategory::Config => HexColor::rgb(0xF9, 0x7E, 0x7E),
            FileCategory::Script => HexColor::rgb(0xFF, 0xA7, 0x56),
            FileCategory::Other => HexColor::rgb(0xAB, 0xB2, 0xBF),
        }
    }
}

/// A 24-bit RGB color, written as `#RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(into = "String")]
pub struct HexColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl HexColor {
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

impl FromStr for HexColor {
    type Err = ColorError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(ColorError::Invalid(raw.to_string()));
        }

        let channel = |range: std::ops::Range<usize>| {
            u8::from_str_radix(&digits[range], 16).map_err(|_| ColorError::Invalid(raw.to_string()))
        };
        Ok(Self::rgb(channel(0..2)?, channel(2..4)?, channel(4..6)?))
    }
}

impl From<HexColor> for String {
    fn from(value: HexColor) -> Self {
        value.to_string()
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Category colors: the fixed defaults with an optional partial override.
/// Lookups always resolve, falling back to the default slot.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ColorPalette {
    overrides: BTreeMap<FileCategory, HexColor>,
}

impl ColorPalette {
    pub fn color(&self, category: FileCategory) -> HexColor {
        self.overrides
            .get(&category)
            .copied()
            .unwrap_or_else(|| category.default_color())
    }

    pub fn set(&mut self, category: FileCategory, color: HexColor) {
        if color == category.default_color() {
            self.overrides.remove(&category);
        } else {
            self.overrides.insert(category, color);
        }
    }

    pub fn reset(&mut self, category: FileCategory) -> bool {
        self.overrides.remove(&category).is_some()
    }

    pub fn is_overridden(&self, category: FileCategory) -> bool {
        self.overrides.contains_key(&category)
    }

    /// Parses a `CATEGORY=HEX` command line override.
    pub fn parse_override(raw: &str) -> Result<(FileCategory, HexColor), ColorError> {
        let (label, color) = raw
            .split_once('=')
            .ok_or_else(|| ColorError::MalformedOverride(raw.to_string()))?;
        let category = FileCategory::from_label(label)
            .ok_or_else(|| ColorError::UnknownCategory(label.trim().to_string()))?;
        Ok((category, color.parse()?))
    }
}

pub type InclusionSet = BTreeSet<PathBuf>;

/// Everything a rebuild needs. Owned by the orchestrator and re-supplied on
/// every render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub root: PathBuf,
    pub inclusion: InclusionSet,
    pub exclusion: ExclusionSet,
    pub palette: ColorPalette,
}

impl Session {
    pub fn new(root: PathBuf) -> Self {
        Self {
            root,
            inclusion: InclusionSet::new(),
            exclusion: ExclusionSet::default(),
            palette: ColorPalette::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn hex_color_accepts_optional_hash_and_normalizes_case() {
        let a: HexColor = "#c679dc".parse().expect("parse with hash");
        let b: HexColor = "C679DC".parse().expect("parse without hash");
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "#C679DC");
    }

    #[test]
    fn hex_color_rejects_wrong_length_and_non_hex() {
        assert!("#FFF".parse::<HexColor>().is_err());
        assert!("#GG0000".parse::<HexColor>().is_err());
        assert!("".parse::<HexColor>().is_err());
    }

    #[test]
    fn palette_falls_back_to_defaults_for_missing_overrides() {
        let mut palette = ColorPalette::default();
        palette.set(FileCategory::Code, HexColor::rgb(1, 2, 3));

        assert_eq!(palette.color(FileCategory::Code), HexColor::rgb(1, 2, 3));
        for category in FileCategory::ALL {
            if category != FileCategory::Code {
                assert_eq!(palette.color(category), category.default_color());
            }
        }
    }

    #[test]
    fn setting_default_color_drops_the_override() {
        let mut palette = ColorPalette::default();
        palette.set(FileCategory::Media, HexColor::rgb(0, 0, 0));
        assert!(palette.is_overridden(FileCategory::Media));
        palette.set(FileCategory::Media, FileCategory::Media.default_color());
        assert!(!palette.is_overridden(FileCategory::Media));
    }

    #[test]
    fn parse_override_reads_category_and_color() {
        assert_eq!(
            ColorPalette::parse_override("Script=#010203"),
            Ok((FileCategory::Script, HexColor::rgb(1, 2, 3)))
        );
        assert_eq!(
            ColorPalette::parse_override("nope=#010203"),
            Err(ColorError::UnknownCategory("nope".to_string()))
        );
        assert!(matches!(
            ColorPalette::parse_override("code"),
            Err(ColorError::MalformedOverride(_))
        ));
    }

    #[test]
    fn dotted_extension_skips_leading_dot_names() {
        assert_eq!(dotted_extension("a.png"), Some(".png"));
        assert_eq!(dotted_extension("archive.tar.gz"), Some(".gz"));
        assert_eq!(dotted_extension(".gitignore"), None);
        assert_eq!(dotted_extension("Makefile"), None);
    }
}
