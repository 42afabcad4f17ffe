//! Closed, string-valued enums for the layout/tone document schema.
//!
//! Every enum here parses a raw string with a strict mapping and a named
//! default for unknown input (see `from_str_or_default` on each), so the
//! schema assembler can coerce tagger/heuristic output without ever failing
//! on an unrecognized value.

use serde::{Deserialize, Serialize};

macro_rules! closed_enum {
    ($name:ident { $($variant:ident => $s:literal),+ $(,)? }, default = $default:ident) => {
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            /// Strict parse with unknown-value fallback to `$default`.
            pub fn from_str_or_default(s: &str) -> Self {
                match s {
                    $($s => Self::$variant,)+
                    _ => Self::$default,
                }
            }

            pub fn as_str(&self) -> &'static str {
                match self {
                    $(Self::$variant => $s,)+
                }
            }
        }
    };
}

closed_enum!(SourceType {
    Pdf => "pdf",
    Docx => "docx",
    Html => "html",
    Image => "image",
}, default = Pdf);

closed_enum!(BlockType {
    Heading => "heading",
    Paragraph => "paragraph",
    ListItem => "list_item",
    Table => "table",
    Figure => "figure",
    Caption => "caption",
    Header => "header",
    Footer => "footer",
    PageNumber => "page_number",
    CodeBlock => "code_block",
}, default = Paragraph);

closed_enum!(RoleType {
    Title => "title",
    SectionTitle => "section_title",
    SubsectionTitle => "subsection_title",
    Paragraph => "paragraph",
    ListItem => "list_item",
    Table => "table",
    Figure => "figure",
    Caption => "caption",
    Header => "header",
    Footer => "footer",
}, default = Paragraph);

closed_enum!(WeightType {
    Normal => "normal",
    Bold => "bold",
}, default = Normal);

closed_enum!(AlignType {
    Left => "left",
    Center => "center",
    Right => "right",
    Justify => "justify",
}, default = Left);

closed_enum!(RelationType {
    Next => "next",
    Parent => "parent",
    Child => "child",
    CaptionOf => "caption_of",
}, default = Next);

closed_enum!(ToneType {
    Formal => "formal",
    Neutral => "neutral",
    Conversational => "conversational",
    Legal => "legal",
    Compliance => "compliance",
    Academic => "academic",
}, default = Neutral);

closed_enum!(VoiceType {
    Active => "active",
    Passive => "passive",
    Mixed => "mixed",
}, default = Active);

closed_enum!(ModalityType {
    Mandatory => "mandatory",
    Advisory => "advisory",
    Descriptive => "descriptive",
}, default = Descriptive);

closed_enum!(TenseType {
    Present => "present",
    Past => "past",
    Future => "future",
    Mixed => "mixed",
}, default = Present);

closed_enum!(DomainType {
    Legal => "legal",
    Banking => "banking",
    Technical => "technical",
    General => "general",
}, default = General);

closed_enum!(PageUnit {
    Pt => "pt",
    Px => "px",
}, default = Pt);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn block_type_parses_known_values() {
        assert_eq!(BlockType::from_str_or_default("heading"), BlockType::Heading);
        assert_eq!(BlockType::from_str_or_default("code_block"), BlockType::CodeBlock);
    }

    #[test]
    fn block_type_falls_back_to_paragraph_on_unknown() {
        assert_eq!(BlockType::from_str_or_default("bogus"), BlockType::Paragraph);
    }

    #[test]
    fn role_type_round_trips_through_serde() {
        let role = RoleType::SectionTitle;
        let json = serde_json::to_string(&role).unwrap();
        assert_eq!(json, "\"section_title\"");
        let back: RoleType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, RoleType::SectionTitle);
    }

    #[test]
    fn weight_type_default_is_normal() {
        assert_eq!(WeightType::from_str_or_default("unknown"), WeightType::Normal);
    }

    #[test]
    fn relation_type_default_is_next() {
        assert_eq!(RelationType::from_str_or_default("whatever"), RelationType::Next);
    }
}
