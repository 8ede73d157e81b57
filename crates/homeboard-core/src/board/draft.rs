//! Board drafts: a whole board as plain data, before it has ids.
//!
//! Creating an empty board, bootstrapping the example board, and importing
//! a legacy config all build a [`BoardDraft`] and hand it to
//! [`insert_draft`], so there is one code path that writes new boards.

use crate::error::{CoreError, Result};
use crate::model::{
    AppRow, BoardRow, Customization, IntegrationKind, IntegrationRow, ItemIntegrationRow, ItemKind,
    ItemRow, LayoutItemRow, LayoutKind, LayoutRow, OptionRow, SecretKind, SecretRow, SectionKind,
    SectionRow, SidebarSide, WidgetRow,
};
use crate::options::flatten_options;
use crate::storage::{RowSource, WriteTx};
use crate::{BoardId, IntegrationId, ItemId, LayoutId, SectionId};
use serde_json::{Map, Value};
use std::collections::BTreeMap;

#[derive(Debug, Clone, PartialEq)]
pub struct BoardDraft {
    pub name: String,
    pub is_public: bool,
    pub customization: Customization,
    pub layouts: Vec<LayoutDraft>,
    pub items: Vec<ItemDraft>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct LayoutDraft {
    pub kind: LayoutKind,
    pub name: String,
    pub column_count: u8,
    pub show_left_sidebar: bool,
    pub show_right_sidebar: bool,
    pub sections: Vec<SectionDraft>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct SectionDraft {
    /// Draft-local reference used by [`PlacementDraft::section`].
    pub key: String,
    pub kind: SectionKind,
    pub position: u32,
    pub name: Option<String>,
    pub side: Option<SidebarSide>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ItemContent {
    App(AppDraft),
    Widget { kind: String },
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppDraft {
    pub name: String,
    pub description: String,
    pub icon_url: String,
    pub href: String,
    pub ping_url: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct IntegrationDraft {
    pub name: String,
    pub kind: IntegrationKind,
    pub url: String,
    pub secrets: Vec<(SecretKind, String)>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacementDraft {
    pub layout: LayoutKind,
    pub section: String,
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemDraft {
    pub content: ItemContent,
    pub options: Map<String, Value>,
    pub integration: Option<IntegrationDraft>,
    pub placements: Vec<PlacementDraft>,
}

/// Key of the section every fresh layout starts with.
pub const MAIN_SECTION: &str = "main";

impl BoardDraft {
    /// A board with the three default layouts, each holding one empty
    /// section.
    #[must_use]
    pub fn empty(name: &str, is_public: bool) -> Self {
        let layouts = LayoutKind::ALL
            .iter()
            .map(|&kind| LayoutDraft {
                kind,
                name: kind.default_name().to_string(),
                column_count: kind.default_column_count(),
                show_left_sidebar: false,
                show_right_sidebar: false,
                sections: vec![SectionDraft {
                    key: MAIN_SECTION.to_string(),
                    kind: SectionKind::Empty,
                    position: 0,
                    name: None,
                    side: None,
                }],
            })
            .collect();

        Self {
            name: name.to_string(),
            is_public,
            customization: Customization::default(),
            layouts,
            items: Vec::new(),
        }
    }
}

/// Write a whole draft inside `tx`. The name must not be taken.
pub(crate) fn insert_draft(tx: &WriteTx, draft: &BoardDraft) -> Result<BoardId> {
    if tx.board_id_by_name(&draft.name)?.is_some() {
        return Err(CoreError::conflict("board", &draft.name));
    }

    let board_id = BoardId(tx.next_id()?);
    tx.put(&BoardRow {
        id: board_id,
        name: draft.name.clone(),
        customization: draft.customization.clone(),
        is_public: draft.is_public,
    })?;
    tx.bind_name(&draft.name, board_id)?;

    let mut sections: BTreeMap<(LayoutKind, &str), SectionId> = BTreeMap::new();
    for layout in &draft.layouts {
        let layout_id = LayoutId(tx.next_id()?);
        tx.put(&LayoutRow {
            id: layout_id,
            board_id,
            name: layout.name.clone(),
            kind: layout.kind,
            column_count: layout.column_count,
            show_left_sidebar: layout.show_left_sidebar,
            show_right_sidebar: layout.show_right_sidebar,
        })?;

        for section in &layout.sections {
            let section_id = SectionId(tx.next_id()?);
            tx.put(&SectionRow {
                id: section_id,
                layout_id,
                kind: section.kind,
                position: section.position,
                name: section.name.clone(),
                side: section.side,
            })?;
            sections.insert((layout.kind, section.key.as_str()), section_id);
        }
    }

    for item in &draft.items {
        let item_id = insert_item(tx, board_id, item)?;
        for placement in &item.placements {
            let section_id = sections
                .get(&(placement.layout, placement.section.as_str()))
                .copied()
                .ok_or_else(|| CoreError::not_found("section", &placement.section))?;
            place_item(
                tx,
                section_id,
                item_id,
                (placement.x, placement.y),
                (placement.width, placement.height),
            )?;
        }
    }

    Ok(board_id)
}

/// Write an item with its content, options, and integration link. Placement
/// is left to the caller.
pub(crate) fn insert_item(tx: &WriteTx, board_id: BoardId, item: &ItemDraft) -> Result<ItemId> {
    let item_id = ItemId(tx.next_id()?);
    let kind = match &item.content {
        ItemContent::App(app) => {
            tx.put(&AppRow {
                item_id,
                name: app.name.clone(),
                description: app.description.clone(),
                icon_url: app.icon_url.clone(),
                href: app.href.clone(),
                ping_url: app.ping_url.clone(),
            })?;
            ItemKind::App
        }
        ItemContent::Widget { kind } => {
            tx.put(&WidgetRow {
                item_id,
                widget_kind: kind.clone(),
            })?;
            ItemKind::Widget
        }
    };
    tx.put(&ItemRow {
        id: item_id,
        board_id,
        kind,
    })?;

    for entry in flatten_options(&item.options)? {
        tx.put(&OptionRow {
            id: tx.next_id()?,
            item_id,
            path: entry.path,
            kind: entry.kind,
            value: entry.value,
        })?;
    }

    if let Some(integration) = &item.integration {
        let integration_id = insert_integration(tx, integration)?;
        tx.put(&ItemIntegrationRow {
            id: tx.next_id()?,
            item_id,
            integration_id,
        })?;
    }

    Ok(item_id)
}

fn insert_integration(tx: &WriteTx, integration: &IntegrationDraft) -> Result<IntegrationId> {
    let integration_id = IntegrationId(tx.next_id()?);
    tx.put(&IntegrationRow {
        id: integration_id,
        name: integration.name.clone(),
        kind: integration.kind,
        url: integration.url.clone(),
    })?;
    for (kind, value) in &integration.secrets {
        tx.put(&SecretRow {
            id: tx.next_id()?,
            integration_id,
            kind: *kind,
            value: value.clone(),
        })?;
    }
    Ok(integration_id)
}

pub(crate) fn place_item(
    tx: &WriteTx,
    section_id: SectionId,
    item_id: ItemId,
    (x, y): (u32, u32),
    (width, height): (u32, u32),
) -> Result<()> {
    tx.put(&LayoutItemRow {
        id: tx.next_id()?,
        section_id,
        item_id,
        x,
        y,
        width: width.max(1),
        height: height.max(1),
    })
}
