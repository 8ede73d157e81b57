//! # View Module
//!
//! Nested, client-facing shapes assembled from rows. These are what the HTTP
//! API and the CLI print; rows never leave the core directly.

use crate::model::{
    AppRow, Customization, IntegrationKind, ItemKind, LayoutKind, LayoutRow, SecretKind,
    SectionKind, SidebarSide,
};
use crate::{BoardId, IntegrationId, ItemId, LayoutId, SectionId};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// One entry of the board list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardSummary {
    pub id: BoardId,
    pub name: String,
    pub page_title: String,
    pub logo_image_url: String,
    pub is_public: bool,
    pub item_count: usize,
    /// Layout names in desktop, tablet, mobile order.
    pub layouts: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSummary {
    pub id: LayoutId,
    pub name: String,
    pub kind: LayoutKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutView {
    pub id: LayoutId,
    pub name: String,
    pub kind: LayoutKind,
    pub column_count: u8,
    pub show_left_sidebar: bool,
    pub show_right_sidebar: bool,
}

impl From<&LayoutRow> for LayoutView {
    fn from(row: &LayoutRow) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
            kind: row.kind,
            column_count: row.column_count,
            show_left_sidebar: row.show_left_sidebar,
            show_right_sidebar: row.show_right_sidebar,
        }
    }
}

impl From<&LayoutRow> for LayoutSummary {
    fn from(row: &LayoutRow) -> Self {
        Self {
            id: row.id,
            name: row.name.clone(),
            kind: row.kind,
        }
    }
}

/// A board with one layout fully resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BoardView {
    pub id: BoardId,
    pub name: String,
    pub is_public: bool,
    pub customization: Customization,
    /// The layout the sections below belong to.
    pub layout: LayoutView,
    /// Every layout of the board, for switching.
    pub layouts: Vec<LayoutSummary>,
    pub sections: Vec<SectionView>,
}

impl BoardView {
    /// All items across sections, in section order.
    pub fn items(&self) -> impl Iterator<Item = &ItemView> {
        self.sections.iter().flat_map(|s| s.items.iter())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SectionView {
    pub id: SectionId,
    pub kind: SectionKind,
    pub position: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub side: Option<SidebarSide>,
    pub items: Vec<ItemView>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ItemView {
    pub id: ItemId,
    pub kind: ItemKind,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub app: Option<AppView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub widget: Option<WidgetView>,
    pub options: Map<String, Value>,
    pub integrations: Vec<IntegrationView>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppView {
    pub name: String,
    pub description: String,
    pub icon_url: String,
    pub href: String,
    pub ping_url: String,
}

impl From<&AppRow> for AppView {
    fn from(row: &AppRow) -> Self {
        Self {
            name: row.name.clone(),
            description: row.description.clone(),
            icon_url: row.icon_url.clone(),
            href: row.href.clone(),
            ping_url: row.ping_url.clone(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WidgetView {
    pub kind: String,
}

/// An integration linked to an item. Secret values are never included,
/// only which kinds are configured.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IntegrationView {
    pub id: IntegrationId,
    pub name: String,
    pub kind: IntegrationKind,
    pub url: String,
    pub secrets: Vec<SecretKind>,
}

/// Result of an appearance update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CustomizationView {
    pub is_public: bool,
    pub customization: Customization,
    pub layouts: Vec<LayoutView>,
}
