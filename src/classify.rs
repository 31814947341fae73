//! Extension and name based file classification.

use crate::domain::{ColorPalette, FileCategory, HexColor, dotted_extension};

pub fn classify(name: &str) -> FileCategory {
    if name == "LICENSE" || name == "license" {
        return FileCategory::Document;
    }

    let Some(ext) = dotted_extension(name).map(|ext| ext[1..].to_ascii_lowercase()) else {
        return FileCategory::Other;
    };

    match ext.as_str() {
        "jpg" | "png" | "gif" | "svg" | "mp4" | "mp3" => FileCategory::Media,
        "js" | "ts" | "py" | "java" | "c" | "cpp" | "cs" | "rb" | "go" => FileCategory::Code,
        "html" | "css" | "scss" | "less" | "xml" => FileCategory::Markup,
        "json" | "csv" | "sql" | "db" => FileCategory::Data,
        "docx" | "xlsx" | "pptx" | "pdf" | "txt" | "md" => FileCategory::Document,
        "yml" | "yaml" | "ini" | "env" | "config" => FileCategory::Config,
        "sh" | "bat" | "ps1" => FileCategory::Script,
        _ => FileCategory::Other,
    }
}

pub fn color_for(name: &str, palette: &ColorPalette) -> HexColor {
    palette.color(classify(name))
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn license_is_a_document_regardless_of_extension() {
        assert_eq!(classify("LICENSE"), FileCategory::Document);
        assert_eq!(classify("license"), FileCategory::Document);
        assert_eq!(
            color_for("license", &ColorPalette::default()),
            FileCategory::Document.default_color()
        );
    }

    #[test]
    fn only_the_two_license_spellings_are_special() {
        assert_eq!(classify("License"), FileCategory::Other);
        assert_eq!(classify("LICENSE.md"), FileCategory::Document);
        assert_eq!(classify("LICENSE.sh"), FileCategory::Script);
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        assert_eq!(classify("photo.PNG"), FileCategory::Media);
        assert_eq!(classify("Main.Java"), FileCategory::Code);
        assert_eq!(
            color_for("photo.PNG", &ColorPalette::default()),
            FileCategory::Media.default_color()
        );
    }

    #[test]
    fn unknown_or_missing_extensions_are_other() {
        assert_eq!(classify("notes.xyz"), FileCategory::Other);
        assert_eq!(classify("Makefile"), FileCategory::Other);
        assert_eq!(classify(".gitignore"), FileCategory::Other);
        assert_eq!(classify("trailing."), FileCategory::Other);
    }

    #[test]
    fn every_table_group_maps_to_its_category() {
        let cases = [
            ("clip.mp4", FileCategory::Media),
            ("lib.rb", FileCategory::Code),
            ("site.scss", FileCategory::Markup),
            ("rows.csv", FileCategory::Data),
            ("deck.pptx", FileCategory::Document),
            ("app.config", FileCategory::Config),
            ("build.ps1", FileCategory::Script),
        ];
        for (name, expected) in cases {
            assert_eq!(classify(name), expected, "{name}");
        }
    }

    #[test]
    fn color_uses_palette_override() {
        let mut palette = ColorPalette::default();
        palette.set(FileCategory::Code, HexColor::rgb(0x11, 0x22, 0x33));
        assert_eq!(color_for("main.go", &palette), HexColor::rgb(0x11, 0x22, 0x33));
        assert_eq!(
            color_for("main.md", &palette),
            FileCategory::Document.default_color()
        );
    }
}
