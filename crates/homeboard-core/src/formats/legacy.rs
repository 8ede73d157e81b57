//! Legacy JSON board configs.
//!
//! Older installs kept one JSON file per board. Each file holds the board's
//! apps and widgets with a per-screen-size `shape`, the wrappers and
//! categories they sit in, and the appearance settings. [`parse_legacy`]
//! reads such a file and [`LegacyConfig::to_draft`] maps it onto the
//! layout/section/item model.

use crate::board::{
    AppDraft, BoardDraft, IntegrationDraft, ItemContent, ItemDraft, LayoutDraft, PlacementDraft,
    SectionDraft,
};
use crate::error::{CoreError, Result};
use crate::model::{Customization, IntegrationKind, LayoutKind, SecretKind, SectionKind, SidebarSide};
use crate::validation::is_hex_color;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::{BTreeMap, BTreeSet};

/// Newest schema version this importer understands.
pub const SUPPORTED_SCHEMA_VERSION: u32 = 2;

const DEFAULT_WRAPPER_KEY: &str = "wrapper:default";
const LEFT_SIDEBAR_KEY: &str = "sidebar:left";
const RIGHT_SIDEBAR_KEY: &str = "sidebar:right";

// =============================================================================
// FILE SHAPE
// =============================================================================

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyConfig {
    pub schema_version: u32,
    pub config_properties: LegacyProperties,
    pub categories: Vec<LegacyCategory>,
    pub wrappers: Vec<LegacyWrapper>,
    pub apps: Vec<LegacyApp>,
    pub widgets: Vec<LegacyWidget>,
    pub settings: LegacySettings,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyProperties {
    pub name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyCategory {
    pub id: String,
    pub name: String,
    pub position: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyWrapper {
    pub id: String,
    pub position: u32,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyArea {
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: LegacyAreaProperties,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyAreaProperties {
    pub id: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyLocation {
    pub x: u32,
    pub y: u32,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacySize {
    pub width: u32,
    pub height: u32,
}

impl Default for LegacySize {
    fn default() -> Self {
        Self {
            width: 1,
            height: 1,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LegacyShape {
    pub location: LegacyLocation,
    pub size: LegacySize,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyBehaviour {
    pub external_url: String,
    pub is_opening_new_tab: bool,
    pub tooltip_description: String,
}

impl Default for LegacyBehaviour {
    fn default() -> Self {
        Self {
            external_url: String::new(),
            is_opening_new_tab: true,
            tooltip_description: String::new(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyAppearance {
    pub icon_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyIntegrationField {
    pub field: String,
    pub value: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyIntegration {
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub properties: Vec<LegacyIntegrationField>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyApp {
    pub id: String,
    pub name: String,
    pub url: String,
    pub behaviour: LegacyBehaviour,
    pub appearance: LegacyAppearance,
    pub area: LegacyArea,
    /// Keyed by screen size: `lg`, `md`, `sm`.
    pub shape: BTreeMap<String, LegacyShape>,
    pub integration: Option<LegacyIntegration>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyWidget {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub properties: Map<String, Value>,
    pub area: LegacyArea,
    pub shape: BTreeMap<String, LegacyShape>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacySettings {
    pub access: LegacyAccess,
    pub customization: LegacyCustomization,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyAccess {
    pub allow_guests: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyCustomization {
    pub page_title: Option<String>,
    pub meta_title: Option<String>,
    pub logo_image_url: Option<String>,
    pub favicon_url: Option<String>,
    pub background_image_url: Option<String>,
    pub custom_css: Option<String>,
    pub app_opacity: Option<u8>,
    pub colors: LegacyColors,
    pub layout: LegacyLayoutSettings,
    pub gridstack: LegacyGridstack,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyColors {
    pub primary: Option<String>,
    pub secondary: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyLayoutSettings {
    pub enabled_left_sidebar: bool,
    pub enabled_right_sidebar: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct LegacyGridstack {
    pub column_count_small: Option<u8>,
    pub column_count_medium: Option<u8>,
    pub column_count_large: Option<u8>,
}

// =============================================================================
// PARSING
// =============================================================================

/// Parse the bytes of a legacy config file.
pub fn parse_legacy(bytes: &[u8]) -> Result<LegacyConfig> {
    let config: LegacyConfig =
        serde_json::from_slice(bytes).map_err(|e| CoreError::LegacyFormat(e.to_string()))?;
    if config.schema_version > SUPPORTED_SCHEMA_VERSION {
        return Err(CoreError::LegacyFormat(format!(
            "unsupported schema version {} (newest supported is {})",
            config.schema_version, SUPPORTED_SCHEMA_VERSION
        )));
    }
    Ok(config)
}

fn shape_key(kind: LayoutKind) -> &'static str {
    match kind {
        LayoutKind::Desktop => "lg",
        LayoutKind::Tablet => "md",
        LayoutKind::Mobile => "sm",
    }
}

/// Legacy colors were often theme color names; only hex survives.
fn hex_or(value: Option<&String>, fallback: String) -> String {
    match value {
        Some(color) if is_hex_color(color) => color.clone(),
        _ => fallback,
    }
}

// =============================================================================
// CONVERSION
// =============================================================================

/// An app or widget with its resolved section, before placement.
struct PendingItem<'a> {
    content: ItemContent,
    options: Map<String, Value>,
    integration: Option<IntegrationDraft>,
    section: String,
    shape: &'a BTreeMap<String, LegacyShape>,
}

impl LegacyConfig {
    /// Name stored in the file.
    #[must_use]
    pub fn board_name(&self) -> &str {
        &self.config_properties.name
    }

    /// Map this config onto a board draft, optionally under another name.
    pub fn to_draft(&self, name_override: Option<&str>) -> Result<BoardDraft> {
        let name = name_override.unwrap_or(&self.config_properties.name).to_string();
        let main_sections = self.main_sections();
        let known: BTreeSet<&str> = main_sections.iter().map(|s| s.key.as_str()).collect();
        let fallback = main_sections
            .iter()
            .find(|s| s.kind == SectionKind::Empty)
            .map(|s| s.key.clone())
            .unwrap_or_else(|| DEFAULT_WRAPPER_KEY.to_string());

        let mut pending = Vec::with_capacity(self.apps.len() + self.widgets.len());
        for app in &self.apps {
            pending.push(self.pending_app(app, &known, &fallback)?);
        }
        for widget in &self.widgets {
            if widget.kind.is_empty() {
                return Err(CoreError::LegacyFormat(format!(
                    "widget {:?} has no type",
                    widget.id
                )));
            }
            pending.push(PendingItem {
                content: ItemContent::Widget {
                    kind: widget.kind.clone(),
                },
                options: widget.properties.clone(),
                integration: None,
                section: resolve_area(&widget.area, &known, &fallback),
                shape: &widget.shape,
            });
        }

        let settings = &self.settings.customization;
        let wants_left = settings.layout.enabled_left_sidebar
            || pending.iter().any(|p| p.section == LEFT_SIDEBAR_KEY);
        let wants_right = settings.layout.enabled_right_sidebar
            || pending.iter().any(|p| p.section == RIGHT_SIDEBAR_KEY);

        let mut sections = main_sections;
        let mut next_position = sections.len() as u32;
        for (wanted, key, side) in [
            (wants_left, LEFT_SIDEBAR_KEY, SidebarSide::Left),
            (wants_right, RIGHT_SIDEBAR_KEY, SidebarSide::Right),
        ] {
            if wanted {
                sections.push(SectionDraft {
                    key: key.to_string(),
                    kind: SectionKind::Sidebar,
                    position: next_position,
                    name: None,
                    side: Some(side),
                });
                next_position = next_position.saturating_add(1);
            }
        }

        let grid = &settings.gridstack;
        let layouts = LayoutKind::ALL
            .iter()
            .map(|&kind| LayoutDraft {
                kind,
                name: kind.default_name().to_string(),
                column_count: match kind {
                    LayoutKind::Desktop => grid.column_count_large,
                    LayoutKind::Tablet => grid.column_count_medium,
                    LayoutKind::Mobile => grid.column_count_small,
                }
                .unwrap_or_else(|| kind.default_column_count()),
                show_left_sidebar: wants_left,
                show_right_sidebar: wants_right,
                sections: sections.clone(),
            })
            .collect();

        Ok(BoardDraft {
            name,
            is_public: self.settings.access.allow_guests,
            customization: self.customization(),
            layouts,
            items: place_items(pending),
        })
    }

    /// Wrappers and categories in their shared legacy order, renumbered
    /// from zero. A board without wrappers gets one.
    fn main_sections(&self) -> Vec<SectionDraft> {
        let mut ordered: Vec<(u32, SectionDraft)> = self
            .wrappers
            .iter()
            .map(|w| {
                (
                    w.position,
                    SectionDraft {
                        key: format!("wrapper:{}", w.id),
                        kind: SectionKind::Empty,
                        position: 0,
                        name: None,
                        side: None,
                    },
                )
            })
            .chain(self.categories.iter().map(|c| {
                (
                    c.position,
                    SectionDraft {
                        key: format!("category:{}", c.id),
                        kind: SectionKind::Category,
                        position: 0,
                        name: Some(c.name.clone()),
                        side: None,
                    },
                )
            }))
            .collect();
        ordered.sort_by_key(|(position, _)| *position);

        let mut sections: Vec<SectionDraft> = ordered.into_iter().map(|(_, s)| s).collect();
        if !sections.iter().any(|s| s.kind == SectionKind::Empty) {
            sections.insert(
                0,
                SectionDraft {
                    key: DEFAULT_WRAPPER_KEY.to_string(),
                    kind: SectionKind::Empty,
                    position: 0,
                    name: None,
                    side: None,
                },
            );
        }
        for (position, section) in sections.iter_mut().enumerate() {
            section.position = position as u32;
        }
        sections
    }

    fn pending_app<'a>(
        &self,
        app: &'a LegacyApp,
        known: &BTreeSet<&str>,
        fallback: &str,
    ) -> Result<PendingItem<'a>> {
        if app.name.is_empty() {
            return Err(CoreError::LegacyFormat(format!("app {:?} has no name", app.id)));
        }

        let href = if app.behaviour.external_url.is_empty() {
            app.url.clone()
        } else {
            app.behaviour.external_url.clone()
        };
        let mut options = Map::new();
        options.insert(
            "openInNewTab".to_string(),
            Value::Bool(app.behaviour.is_opening_new_tab),
        );

        Ok(PendingItem {
            content: ItemContent::App(AppDraft {
                name: app.name.clone(),
                description: app.behaviour.tooltip_description.clone(),
                icon_url: app.appearance.icon_url.clone(),
                href,
                ping_url: app.url.clone(),
            }),
            options,
            integration: app
                .integration
                .as_ref()
                .and_then(|i| integration_draft(i, &app.name, &app.url)),
            section: resolve_area(&app.area, known, fallback),
            shape: &app.shape,
        })
    }

    fn customization(&self) -> Customization {
        let c = &self.settings.customization;
        let defaults = Customization::default();
        Customization {
            page_title: c.page_title.clone().unwrap_or(defaults.page_title),
            meta_title: c.meta_title.clone().unwrap_or_default(),
            logo_image_url: c.logo_image_url.clone().unwrap_or_default(),
            favicon_image_url: c.favicon_url.clone().unwrap_or_default(),
            background_image_url: c.background_image_url.clone().unwrap_or_default(),
            primary_color: hex_or(c.colors.primary.as_ref(), defaults.primary_color),
            secondary_color: hex_or(c.colors.secondary.as_ref(), defaults.secondary_color),
            opacity: c.app_opacity.unwrap_or(defaults.opacity),
            custom_css: c.custom_css.clone().unwrap_or_default(),
            ..defaults
        }
    }
}

fn resolve_area(area: &LegacyArea, known: &BTreeSet<&str>, fallback: &str) -> String {
    let key = match (area.kind.as_str(), &area.properties) {
        ("wrapper", LegacyAreaProperties { id: Some(id), .. }) => format!("wrapper:{id}"),
        ("category", LegacyAreaProperties { id: Some(id), .. }) => format!("category:{id}"),
        ("sidebar", LegacyAreaProperties { location: Some(side), .. }) => match side.as_str() {
            "left" => return LEFT_SIDEBAR_KEY.to_string(),
            "right" => return RIGHT_SIDEBAR_KEY.to_string(),
            _ => return fallback.to_string(),
        },
        _ => return fallback.to_string(),
    };
    if known.contains(key.as_str()) {
        key
    } else {
        fallback.to_string()
    }
}

fn integration_draft(integration: &LegacyIntegration, name: &str, url: &str) -> Option<IntegrationDraft> {
    let kind = IntegrationKind::parse(integration.kind.as_deref()?)?;
    let secrets = integration
        .properties
        .iter()
        .filter_map(|p| {
            let kind = match p.field.as_str() {
                "apiKey" => SecretKind::ApiKey,
                "username" => SecretKind::Username,
                "password" => SecretKind::Password,
                _ => return None,
            };
            p.value
                .as_ref()
                .filter(|v| !v.is_empty())
                .map(|v| (kind, v.clone()))
        })
        .collect();
    Some(IntegrationDraft {
        name: name.to_string(),
        kind,
        url: url.to_string(),
        secrets,
    })
}

/// Give every item a placement in every layout. Explicit shapes are kept;
/// items without a shape for some layout are stacked as 1x1 tiles below the
/// lowest occupied row of their section.
fn place_items(pending: Vec<PendingItem<'_>>) -> Vec<ItemDraft> {
    let mut bottoms: BTreeMap<(LayoutKind, String), u32> = BTreeMap::new();
    for item in &pending {
        for kind in LayoutKind::ALL {
            if let Some(shape) = item.shape.get(shape_key(kind)) {
                let bottom = bottoms.entry((kind, item.section.clone())).or_insert(0);
                let end = shape
                    .location
                    .y
                    .saturating_add(shape.size.height.max(1));
                *bottom = (*bottom).max(end);
            }
        }
    }

    pending
        .into_iter()
        .map(|item| {
            let placements = LayoutKind::ALL
                .iter()
                .map(|&kind| match item.shape.get(shape_key(kind)) {
                    Some(shape) => PlacementDraft {
                        layout: kind,
                        section: item.section.clone(),
                        x: shape.location.x,
                        y: shape.location.y,
                        width: shape.size.width.max(1),
                        height: shape.size.height.max(1),
                    },
                    None => {
                        let bottom = bottoms.entry((kind, item.section.clone())).or_insert(0);
                        let y = *bottom;
                        *bottom = bottom.saturating_add(1);
                        PlacementDraft {
                            layout: kind,
                            section: item.section.clone(),
                            x: 0,
                            y,
                            width: 1,
                            height: 1,
                        }
                    }
                })
                .collect();

            ItemDraft {
                content: item.content,
                options: item.options,
                integration: item.integration,
                placements,
            }
        })
        .collect()
}

// =============================================================================
// TESTS
// =============================================================================
