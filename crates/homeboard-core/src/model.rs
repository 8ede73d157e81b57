//! # Board Model
//!
//! Row types persisted by the [`storage`](crate::storage) module.
//!
//! Every row lives in its own table keyed by a `u64` drawn from a single
//! monotonic sequence. Relations are plain foreign-key fields; the join and
//! reshape into a nested board happens in [`board`](crate::board).

use crate::{BoardId, IntegrationId, ItemId, LayoutId, SectionId};
use serde::{Deserialize, Serialize};

// =============================================================================
// BOARD
// =============================================================================

/// How the background image scrolls.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundAttachment {
    #[default]
    Fixed,
    Scroll,
}

/// How the background image tiles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundRepeat {
    Repeat,
    RepeatX,
    RepeatY,
    #[default]
    NoRepeat,
}

/// How the background image is scaled.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum BackgroundSize {
    #[default]
    Cover,
    Contain,
}

/// Appearance settings of a board.
///
/// Empty strings mean "not set" for titles, urls, and custom CSS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Customization {
    pub page_title: String,
    pub meta_title: String,
    pub logo_image_url: String,
    pub favicon_image_url: String,
    pub background_image_url: String,
    pub background_image_attachment: BackgroundAttachment,
    pub background_image_repeat: BackgroundRepeat,
    pub background_image_size: BackgroundSize,
    pub primary_color: String,
    pub secondary_color: String,
    /// Item opacity in percent (0..=100).
    pub opacity: u8,
    pub custom_css: String,
}

impl Default for Customization {
    fn default() -> Self {
        Self {
            page_title: String::from("Homeboard"),
            meta_title: String::new(),
            logo_image_url: String::new(),
            favicon_image_url: String::new(),
            background_image_url: String::new(),
            background_image_attachment: BackgroundAttachment::default(),
            background_image_repeat: BackgroundRepeat::default(),
            background_image_size: BackgroundSize::default(),
            primary_color: String::from("#fa5252"),
            secondary_color: String::from("#fd7e14"),
            opacity: 100,
            custom_css: String::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BoardRow {
    pub id: BoardId,
    pub name: String,
    pub customization: Customization,
    pub is_public: bool,
}

// =============================================================================
// LAYOUT / SECTION
// =============================================================================

/// Screen class a layout targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LayoutKind {
    Desktop,
    Tablet,
    Mobile,
}

impl LayoutKind {
    /// All kinds in preference order (used to pick a default layout).
    pub const ALL: [LayoutKind; 3] = [LayoutKind::Desktop, LayoutKind::Tablet, LayoutKind::Mobile];

    /// Column count a fresh layout of this kind starts with.
    #[must_use]
    pub fn default_column_count(self) -> u8 {
        match self {
            Self::Desktop => 12,
            Self::Tablet => 6,
            Self::Mobile => 2,
        }
    }

    /// Layout name used when a board is created.
    #[must_use]
    pub fn default_name(self) -> &'static str {
        match self {
            Self::Desktop => "desktop",
            Self::Tablet => "tablet",
            Self::Mobile => "mobile",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutRow {
    pub id: LayoutId,
    pub board_id: BoardId,
    pub name: String,
    pub kind: LayoutKind,
    pub column_count: u8,
    pub show_left_sidebar: bool,
    pub show_right_sidebar: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SectionKind {
    /// Untitled grid area (a "wrapper" in legacy configs).
    Empty,
    /// Named, collapsible group.
    Category,
    Sidebar,
    Hidden,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SidebarSide {
    Left,
    Right,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionRow {
    pub id: SectionId,
    pub layout_id: LayoutId,
    pub kind: SectionKind,
    pub position: u32,
    /// Title of a category; `None` for other kinds.
    pub name: Option<String>,
    /// Set for sidebars only.
    pub side: Option<SidebarSide>,
}

// =============================================================================
// ITEMS
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    App,
    Widget,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemRow {
    pub id: ItemId,
    pub board_id: BoardId,
    pub kind: ItemKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppRow {
    pub item_id: ItemId,
    pub name: String,
    pub description: String,
    pub icon_url: String,
    /// Link opened when the tile is clicked.
    pub href: String,
    /// Internal address used for status checks.
    pub ping_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WidgetRow {
    pub item_id: ItemId,
    /// Widget type, e.g. `clock` or `weather`.
    pub widget_kind: String,
}

/// One flattened option of an item. See [`crate::options`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OptionRow {
    pub id: u64,
    pub item_id: ItemId,
    pub path: String,
    pub kind: crate::OptionKind,
    pub value: String,
}

/// Placement of an item inside a section of one layout.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutItemRow {
    pub id: u64,
    pub section_id: SectionId,
    pub item_id: ItemId,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

// =============================================================================
// INTEGRATIONS
// =============================================================================

/// External service types an app can be linked to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum IntegrationKind {
    Sonarr,
    Radarr,
    Lidarr,
    Readarr,
    Jellyfin,
    Plex,
    PiHole,
    AdGuardHome,
    Qbittorrent,
    Transmission,
    Sabnzbd,
    Overseerr,
    HomeAssistant,
    Docker,
}

impl IntegrationKind {
    /// Parse the identifier used in JSON payloads and legacy configs.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        serde_json::from_value(serde_json::Value::String(value.to_string())).ok()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum SecretKind {
    ApiKey,
    Username,
    Password,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IntegrationRow {
    pub id: IntegrationId,
    pub name: String,
    pub kind: IntegrationKind,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SecretRow {
    pub id: u64,
    pub integration_id: IntegrationId,
    pub kind: SecretKind,
    pub value: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemIntegrationRow {
    pub id: u64,
    pub item_id: ItemId,
    pub integration_id: IntegrationId,
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn layout_kinds_in_preference_order() {
        let mut kinds = LayoutKind::ALL.to_vec();
        kinds.sort();
        assert_eq!(kinds, LayoutKind::ALL.to_vec());
    }

    #[test]
    fn integration_kind_parses_camel_case() {
        assert_eq!(IntegrationKind::parse("piHole"), Some(IntegrationKind::PiHole));
        assert_eq!(
            IntegrationKind::parse("adGuardHome"),
            Some(IntegrationKind::AdGuardHome)
        );
        assert_eq!(IntegrationKind::parse("nope"), None);
    }

    #[test]
    fn rows_survive_postcard() {
        let row = BoardRow {
            id: BoardId(7),
            name: "home".to_string(),
            customization: Customization::default(),
            is_public: true,
        };
        let bytes = postcard::to_allocvec(&row).unwrap();
        let decoded: BoardRow = postcard::from_bytes(&bytes).unwrap();
        assert_eq!(decoded, row);
    }
}
