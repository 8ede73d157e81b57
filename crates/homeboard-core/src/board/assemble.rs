//! Join and reshape: turn the rows of one board layout into a [`BoardView`].
//!
//! Every lookup runs against the same transaction so the view is a
//! consistent snapshot. Joins are inner joins: a placement whose item row
//! is gone, or an app item without its app row, is left out.

use crate::error::{CoreError, Result};
use crate::model::{
    AppRow, BoardRow, IntegrationRow, ItemIntegrationRow, ItemKind, ItemRow, LayoutItemRow,
    LayoutRow, OptionRow, SecretKind, SecretRow, SectionRow, WidgetRow,
};
use crate::options::{OptionEntry, map_options};
use crate::storage::RowSource;
use crate::view::{
    AppView, BoardView, IntegrationView, ItemView, LayoutSummary, LayoutView, SectionView,
    WidgetView,
};
use crate::{IntegrationId, ItemId, SectionId};
use std::collections::{BTreeMap, BTreeSet};

/// Layouts of a board in desktop, tablet, mobile order.
pub(crate) fn board_layouts(src: &impl RowSource, board: &BoardRow) -> Result<Vec<LayoutRow>> {
    let mut layouts = src.scan(|l: &LayoutRow| l.board_id == board.id)?;
    layouts.sort_by_key(|l| (l.kind, l.id));
    Ok(layouts)
}

/// Sections of a layout in display order.
pub(crate) fn layout_sections(src: &impl RowSource, layout: &LayoutRow) -> Result<Vec<SectionRow>> {
    let mut sections = src.scan(|s: &SectionRow| s.layout_id == layout.id)?;
    sections.sort_by_key(|s| (s.position, s.id));
    Ok(sections)
}

pub(crate) fn assemble_board(
    src: &impl RowSource,
    board: BoardRow,
    layout_name: Option<&str>,
) -> Result<BoardView> {
    let layouts = board_layouts(src, &board)?;
    let layout = match layout_name {
        Some(name) => layouts
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| CoreError::not_found("layout", name))?,
        None => layouts
            .first()
            .ok_or_else(|| CoreError::not_found("layout", &board.name))?,
    };

    let sections = layout_sections(src, layout)?;
    let section_ids: BTreeSet<SectionId> = sections.iter().map(|s| s.id).collect();

    let mut placements: BTreeMap<SectionId, Vec<LayoutItemRow>> = BTreeMap::new();
    for placement in src.scan(|p: &LayoutItemRow| section_ids.contains(&p.section_id))? {
        placements.entry(placement.section_id).or_default().push(placement);
    }
    let item_ids: BTreeSet<ItemId> = placements.values().flatten().map(|p| p.item_id).collect();

    let items = ItemRows::load(src, &item_ids)?;

    let mut section_views = Vec::with_capacity(sections.len());
    for section in sections {
        let mut placed = placements.remove(&section.id).unwrap_or_default();
        placed.sort_by_key(|p| (p.y, p.x, p.id));

        let mut item_views = Vec::with_capacity(placed.len());
        for placement in &placed {
            if let Some(view) = items.view(placement)? {
                item_views.push(view);
            }
        }

        section_views.push(SectionView {
            id: section.id,
            kind: section.kind,
            position: section.position,
            name: section.name,
            side: section.side,
            items: item_views,
        });
    }

    Ok(BoardView {
        id: board.id,
        name: board.name,
        is_public: board.is_public,
        customization: board.customization,
        layout: LayoutView::from(layout),
        layouts: layouts.iter().map(LayoutSummary::from).collect(),
        sections: section_views,
    })
}

/// Everything hanging off a set of items, fetched with one scan per table.
struct ItemRows {
    items: BTreeMap<ItemId, ItemRow>,
    apps: BTreeMap<ItemId, AppRow>,
    widgets: BTreeMap<ItemId, WidgetRow>,
    options: BTreeMap<ItemId, Vec<OptionEntry>>,
    links: BTreeMap<ItemId, Vec<IntegrationId>>,
    integrations: BTreeMap<IntegrationId, IntegrationView>,
}

impl ItemRows {
    fn load(src: &impl RowSource, item_ids: &BTreeSet<ItemId>) -> Result<Self> {
        let items = src
            .scan(|i: &ItemRow| item_ids.contains(&i.id))?
            .into_iter()
            .map(|i| (i.id, i))
            .collect();
        let apps = src
            .scan(|a: &AppRow| item_ids.contains(&a.item_id))?
            .into_iter()
            .map(|a| (a.item_id, a))
            .collect();
        let widgets = src
            .scan(|w: &WidgetRow| item_ids.contains(&w.item_id))?
            .into_iter()
            .map(|w| (w.item_id, w))
            .collect();

        let mut options: BTreeMap<ItemId, Vec<OptionEntry>> = BTreeMap::new();
        for row in src.scan(|o: &OptionRow| item_ids.contains(&o.item_id))? {
            options.entry(row.item_id).or_default().push(OptionEntry::from(&row));
        }

        let mut links: BTreeMap<ItemId, Vec<IntegrationId>> = BTreeMap::new();
        for link in src.scan(|l: &ItemIntegrationRow| item_ids.contains(&l.item_id))? {
            links.entry(link.item_id).or_default().push(link.integration_id);
        }
        let integration_ids: BTreeSet<IntegrationId> = links.values().flatten().copied().collect();

        let mut secrets: BTreeMap<IntegrationId, BTreeSet<SecretKind>> = BTreeMap::new();
        for secret in src.scan(|s: &SecretRow| integration_ids.contains(&s.integration_id))? {
            secrets.entry(secret.integration_id).or_default().insert(secret.kind);
        }

        let integrations = src
            .scan(|i: &IntegrationRow| integration_ids.contains(&i.id))?
            .into_iter()
            .map(|i| {
                let view = IntegrationView {
                    id: i.id,
                    name: i.name,
                    kind: i.kind,
                    url: i.url,
                    secrets: secrets
                        .remove(&i.id)
                        .map(|kinds| kinds.into_iter().collect())
                        .unwrap_or_default(),
                };
                (i.id, view)
            })
            .collect();

        Ok(Self {
            items,
            apps,
            widgets,
            options,
            links,
            integrations,
        })
    }

    fn view(&self, placement: &LayoutItemRow) -> Result<Option<ItemView>> {
        let Some(item) = self.items.get(&placement.item_id) else {
            return Ok(None);
        };

        let (app, widget) = match item.kind {
            ItemKind::App => match self.apps.get(&item.id) {
                Some(app) => (Some(AppView::from(app)), None),
                None => return Ok(None),
            },
            ItemKind::Widget => match self.widgets.get(&item.id) {
                Some(w) => (
                    None,
                    Some(WidgetView {
                        kind: w.widget_kind.clone(),
                    }),
                ),
                None => return Ok(None),
            },
        };

        let options = match self.options.get(&item.id) {
            Some(entries) => map_options(entries)?,
            None => serde_json::Map::new(),
        };

        let integrations = self
            .links
            .get(&item.id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.integrations.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Some(ItemView {
            id: item.id,
            kind: item.kind,
            x: placement.x,
            y: placement.y,
            width: placement.width,
            height: placement.height,
            app,
            widget,
            options,
            integrations,
        }))
    }
}
