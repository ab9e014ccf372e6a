//! Enumerated generation parameters.
//!
//! The upstream API accepts these as short string tags; modeling them as
//! enums moves the allowed-value checks into deserialization.

use serde::{Deserialize, Serialize};

/// Reader age bracket a story is written for.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum AgeGroup {
    /// Ages 3-6
    #[serde(rename = "3-6")]
    #[strum(serialize = "3-6")]
    Preschool,
    /// Ages 7-10
    #[default]
    #[serde(rename = "7-10")]
    #[strum(serialize = "7-10")]
    Middle,
    /// Ages 11-14
    #[serde(rename = "11-14")]
    #[strum(serialize = "11-14")]
    Preteen,
    /// Ages 15 and up
    #[serde(rename = "15+")]
    #[strum(serialize = "15+")]
    Teen,
}

/// Story genre.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Genre {
    /// Adventure stories
    #[default]
    Adventure,
    /// Fantasy stories
    Fantasy,
    /// Science fiction stories
    ScienceFiction,
    /// Mystery stories
    Mystery,
    /// Comedy stories
    Comedy,
    /// Educational stories
    Educational,
}

/// Illustration art style.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum ArtStyle {
    /// Soft watercolor illustration
    #[default]
    Watercolor,
    /// Flat cartoon illustration
    Cartoon,
    /// Pixel art
    PixelArt,
    /// Anime style
    Anime,
    /// Realistic rendering
    Realistic,
    /// Pencil sketch
    Sketch,
}

/// Aspect ratio for generated illustrations.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
pub enum AspectRatio {
    /// 16:9 landscape
    #[default]
    #[serde(rename = "16:9")]
    #[strum(serialize = "16:9")]
    Wide,
    /// 9:16 portrait
    #[serde(rename = "9:16")]
    #[strum(serialize = "9:16")]
    Tall,
    /// 1:1 square
    #[serde(rename = "1:1")]
    #[strum(serialize = "1:1")]
    Square,
    /// 4:3 landscape
    #[serde(rename = "4:3")]
    #[strum(serialize = "4:3")]
    Standard,
    /// 3:4 portrait
    #[serde(rename = "3:4")]
    #[strum(serialize = "3:4")]
    Portrait,
}

/// Narrative role of a character.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum CharacterRole {
    /// Protagonist or other central character
    Main,
    /// Supporting character
    #[default]
    Supporting,
}

/// Document format a story can be exported to.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ExportFormat {
    /// Portable Document Format
    Pdf,
    /// Standalone HTML document
    Html,
    /// JSON backup
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    #[test]
    fn age_group_round_trips_through_serde() {
        let json = serde_json::to_string(&AgeGroup::Teen).unwrap();
        assert_eq!(json, "\"15+\"");
        let back: AgeGroup = serde_json::from_str(&json).unwrap();
        assert_eq!(back, AgeGroup::Teen);
    }

    #[test]
    fn genre_rejects_unknown_values() {
        let result: Result<Genre, _> = serde_json::from_str("\"horror\"");
        assert!(result.is_err());
    }

    #[test]
    fn art_style_displays_as_kebab_case() {
        assert_eq!(ArtStyle::PixelArt.to_string(), "pixel-art");
        assert_eq!(ArtStyle::from_str("pixel-art").unwrap(), ArtStyle::PixelArt);
    }

    #[test]
    fn aspect_ratio_uses_colon_notation() {
        assert_eq!(AspectRatio::Wide.to_string(), "16:9");
    }
}
