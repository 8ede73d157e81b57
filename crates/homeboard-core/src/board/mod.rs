//! # Board Service
//!
//! Every board operation, each run as a single store transaction.
//!
//! Reads use a snapshot ([`BoardStore::read`]); mutations use one write
//! transaction that is committed only after every row is written, so a
//! failed operation leaves no partial board behind.

mod assemble;
mod draft;

pub use draft::{
    AppDraft, BoardDraft, IntegrationDraft, ItemContent, ItemDraft, LayoutDraft, PlacementDraft,
    SectionDraft,
};

use crate::error::{CoreError, Result};
use crate::example;
use crate::formats::LegacyConfig;
use crate::model::{
    AppRow, BoardRow, Customization, IntegrationKind, ItemIntegrationRow, ItemRow, LayoutItemRow,
    LayoutRow, OptionRow, SecretKind, SectionKind, SectionRow, WidgetRow,
};
use crate::storage::{BoardStore, RowSource, WriteTx};
use crate::validation::{self, MAX_TITLE_LEN, Validator};
use crate::view::{BoardSummary, BoardView, CustomizationView, LayoutView};
use crate::{BoardId, ItemId, LayoutId, SectionId};
use assemble::{assemble_board, board_layouts, layout_sections};
use draft::{insert_draft, insert_item, place_item};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::collections::BTreeSet;

/// Name of the board [`BoardService::ensure_example_board`] creates.
pub const DEFAULT_BOARD_NAME: &str = "default";

// =============================================================================
// INPUTS
// =============================================================================

/// New appearance for a board. Replaces the stored customization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct CustomizationInput {
    pub customization: Customization,
    /// `None` keeps the current visibility.
    pub is_public: Option<bool>,
    pub layouts: Vec<LayoutSettingsInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutSettingsInput {
    pub id: LayoutId,
    pub column_count: u8,
    #[serde(default)]
    pub show_left_sidebar: bool,
    #[serde(default)]
    pub show_right_sidebar: bool,
}

/// An external service to add to a board as an app.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceInput {
    pub name: String,
    /// Address the tile links to.
    pub url: String,
    /// Internal address for status checks; defaults to `url`.
    #[serde(default)]
    pub ping_url: Option<String>,
    #[serde(default)]
    pub icon_url: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub integration: Option<ServiceIntegrationInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceIntegrationInput {
    pub kind: IntegrationKind,
    #[serde(default)]
    pub secrets: Vec<SecretInput>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SecretInput {
    pub kind: SecretKind,
    pub value: String,
}

impl ServiceInput {
    fn to_item(&self) -> ItemDraft {
        let ping_url = self.ping_url.clone().unwrap_or_else(|| self.url.clone());
        let mut options = Map::new();
        options.insert("openInNewTab".to_string(), Value::Bool(true));

        ItemDraft {
            content: ItemContent::App(AppDraft {
                name: self.name.clone(),
                description: self.description.clone(),
                icon_url: self.icon_url.clone(),
                href: self.url.clone(),
                ping_url: ping_url.clone(),
            }),
            options,
            integration: self.integration.as_ref().map(|i| IntegrationDraft {
                name: self.name.clone(),
                kind: i.kind,
                url: ping_url,
                secrets: i.secrets.iter().map(|s| (s.kind, s.value.clone())).collect(),
            }),
            placements: Vec::new(),
        }
    }
}

// =============================================================================
// SERVICE
// =============================================================================

/// Board operations over a [`BoardStore`].
#[derive(Debug)]
pub struct BoardService {
    store: BoardStore,
}

impl BoardService {
    #[must_use]
    pub fn new(store: BoardStore) -> Self {
        Self { store }
    }

    #[must_use]
    pub fn store(&self) -> &BoardStore {
        &self.store
    }

    /// Summaries of all boards, sorted by name.
    pub fn list_boards(&self, include_private: bool) -> Result<Vec<BoardSummary>> {
        let tx = self.store.read()?;
        let mut boards = tx.scan(|b: &BoardRow| include_private || b.is_public)?;
        boards.sort_by(|a, b| a.name.cmp(&b.name));

        let items = tx.all::<ItemRow>()?;
        let mut summaries = Vec::with_capacity(boards.len());
        for board in boards {
            let layouts = board_layouts(&tx, &board)?;
            summaries.push(BoardSummary {
                id: board.id,
                item_count: items.iter().filter(|i| i.board_id == board.id).count(),
                layouts: layouts.into_iter().map(|l| l.name).collect(),
                name: board.name,
                page_title: board.customization.page_title,
                logo_image_url: board.customization.logo_image_url,
                is_public: board.is_public,
            });
        }
        Ok(summaries)
    }

    /// The full board with one layout resolved.
    ///
    /// A private board is reported as not found unless `include_private`
    /// is set, so its existence is not revealed.
    pub fn board_by_name(
        &self,
        name: &str,
        layout: Option<&str>,
        include_private: bool,
    ) -> Result<BoardView> {
        let tx = self.store.read()?;
        let board = load_board(&tx, name)?;
        if !board.is_public && !include_private {
            return Err(CoreError::not_found("board", name));
        }
        assemble_board(&tx, board, layout)
    }

    /// Whether `name` is a valid board name nobody uses yet.
    pub fn check_name_available(&self, name: &str) -> Result<bool> {
        if validation::check_board_name(name).is_err() {
            return Ok(false);
        }
        Ok(self.store.read()?.board_id_by_name(name)?.is_none())
    }

    /// Create an empty board with the default layouts.
    pub fn create_board(&self, name: &str, is_public: bool) -> Result<BoardId> {
        validation::validate_board_name(name)?;
        self.insert(&BoardDraft::empty(name, is_public))
    }

    pub fn rename_board(&self, from: &str, to: &str) -> Result<()> {
        validation::validate_board_name(to)?;
        let tx = self.store.write()?;
        let mut board = load_board(&tx, from)?;
        if from == to {
            return Ok(());
        }
        if tx.board_id_by_name(to)?.is_some() {
            return Err(CoreError::conflict("board", to));
        }

        board.name = to.to_string();
        tx.put(&board)?;
        tx.unbind_name(from)?;
        tx.bind_name(to, board.id)?;
        tx.commit()
    }

    /// Remove a board and everything placed on it.
    ///
    /// Integrations and their secrets are global and stay, even when no
    /// item links to them any more. They are never garbage collected.
    pub fn delete_board(&self, name: &str) -> Result<()> {
        let tx = self.store.write()?;
        let board = load_board(&tx, name)?;

        let layouts: BTreeSet<LayoutId> = tx
            .delete_where(|l: &LayoutRow| l.board_id == board.id)?
            .into_iter()
            .map(|l| l.id)
            .collect();
        let sections: BTreeSet<SectionId> = tx
            .delete_where(|s: &SectionRow| layouts.contains(&s.layout_id))?
            .into_iter()
            .map(|s| s.id)
            .collect();
        tx.delete_where(|p: &LayoutItemRow| sections.contains(&p.section_id))?;

        let items: BTreeSet<ItemId> = tx
            .delete_where(|i: &ItemRow| i.board_id == board.id)?
            .into_iter()
            .map(|i| i.id)
            .collect();
        tx.delete_where(|a: &AppRow| items.contains(&a.item_id))?;
        tx.delete_where(|w: &WidgetRow| items.contains(&w.item_id))?;
        tx.delete_where(|o: &OptionRow| items.contains(&o.item_id))?;
        tx.delete_where(|l: &ItemIntegrationRow| items.contains(&l.item_id))?;

        tx.delete::<BoardRow>(board.id.0)?;
        tx.unbind_name(name)?;
        tx.commit()
    }

    /// Replace a board's appearance and per-layout grid settings.
    pub fn update_customization(
        &self,
        name: &str,
        input: &CustomizationInput,
    ) -> Result<CustomizationView> {
        let mut v = Validator::new();
        v.customization(&input.customization);
        for (index, layout) in input.layouts.iter().enumerate() {
            v.column_count(&format!("layouts[{index}].columnCount"), layout.column_count);
        }
        v.finish()?;

        let tx = self.store.write()?;
        let mut board = load_board(&tx, name)?;

        for settings in &input.layouts {
            let mut layout = tx
                .get::<LayoutRow>(settings.id.0)?
                .filter(|l| l.board_id == board.id)
                .ok_or_else(|| CoreError::not_found("layout", settings.id))?;
            layout.column_count = settings.column_count;
            layout.show_left_sidebar = settings.show_left_sidebar;
            layout.show_right_sidebar = settings.show_right_sidebar;
            tx.put(&layout)?;
        }

        board.customization = input.customization.clone();
        if let Some(is_public) = input.is_public {
            board.is_public = is_public;
        }
        tx.put(&board)?;

        let layouts = board_layouts(&tx, &board)?;
        tx.commit()?;

        Ok(CustomizationView {
            is_public: board.is_public,
            customization: board.customization,
            layouts: layouts.iter().map(LayoutView::from).collect(),
        })
    }

    /// Bootstrap the bundled example board under `name`.
    pub fn create_example_board(&self, name: &str) -> Result<BoardId> {
        self.import_legacy(&example::example_config()?, Some(name))
    }

    /// Create the example board as [`DEFAULT_BOARD_NAME`] when the store
    /// has no boards at all. Returns whether a board was created.
    ///
    /// The emptiness check and the insert share one write transaction, so
    /// concurrent callers create the board exactly once.
    pub fn ensure_example_board(&self) -> Result<bool> {
        let tx = self.store.write()?;
        if !tx.all::<BoardRow>()?.is_empty() {
            return Ok(false);
        }

        let draft = example::example_config()?.to_draft(Some(DEFAULT_BOARD_NAME))?;
        validate_draft(&draft)?;
        insert_draft(&tx, &draft)?;
        tx.commit()?;
        Ok(true)
    }

    /// Import a legacy board config, optionally under another name.
    pub fn import_legacy(&self, config: &LegacyConfig, name: Option<&str>) -> Result<BoardId> {
        let draft = config.to_draft(name)?;
        validate_draft(&draft)?;
        self.insert(&draft)
    }

    /// Add external services to a board as app tiles.
    ///
    /// In every layout the new tiles go into the first empty section (one
    /// is created when the layout has none), row-major across the layout's
    /// columns, starting on the first row below everything already there.
    pub fn add_services(&self, name: &str, services: &[ServiceInput]) -> Result<Vec<ItemId>> {
        validate_services(services)?;

        let tx = self.store.write()?;
        let board = load_board(&tx, name)?;
        if services.is_empty() {
            return Ok(Vec::new());
        }

        let mut item_ids = Vec::with_capacity(services.len());
        for service in services {
            item_ids.push(insert_item(&tx, board.id, &service.to_item())?);
        }

        for layout in board_layouts(&tx, &board)? {
            let section_id = target_section(&tx, &layout)?;
            let start_row = tx
                .scan(|p: &LayoutItemRow| p.section_id == section_id)?
                .iter()
                .map(|p| p.y.saturating_add(p.height))
                .max()
                .unwrap_or(0);
            let columns = u32::from(layout.column_count.max(1));

            for (index, item_id) in item_ids.iter().enumerate() {
                let index = index as u32;
                let cell = (index % columns, start_row.saturating_add(index / columns));
                place_item(&tx, section_id, *item_id, cell, (1, 1))?;
            }
        }

        tx.commit()?;
        Ok(item_ids)
    }

    fn insert(&self, draft: &BoardDraft) -> Result<BoardId> {
        let tx = self.store.write()?;
        let id = insert_draft(&tx, draft)?;
        tx.commit()?;
        Ok(id)
    }
}

fn load_board(src: &impl RowSource, name: &str) -> Result<BoardRow> {
    let id = src
        .board_id_by_name(name)?
        .ok_or_else(|| CoreError::not_found("board", name))?;
    src.get::<BoardRow>(id.0)?
        .ok_or_else(|| CoreError::not_found("board", name))
}

/// First empty section of a layout, created at the end when missing.
fn target_section(tx: &WriteTx, layout: &LayoutRow) -> Result<SectionId> {
    let sections = layout_sections(tx, layout)?;
    if let Some(section) = sections.iter().find(|s| s.kind == SectionKind::Empty) {
        return Ok(section.id);
    }

    let position = sections
        .iter()
        .map(|s| s.position.saturating_add(1))
        .max()
        .unwrap_or(0);
    let id = SectionId(tx.next_id()?);
    tx.put(&SectionRow {
        id,
        layout_id: layout.id,
        kind: SectionKind::Empty,
        position,
        name: None,
        side: None,
    })?;
    Ok(id)
}

fn validate_draft(draft: &BoardDraft) -> Result<()> {
    let mut v = Validator::new();
    v.board_name("name", &draft.name);
    v.customization(&draft.customization);
    for (index, layout) in draft.layouts.iter().enumerate() {
        v.column_count(&format!("layouts[{index}].columnCount"), layout.column_count);
    }
    v.finish()
}

fn validate_services(services: &[ServiceInput]) -> Result<()> {
    let mut v = Validator::new();
    for (index, service) in services.iter().enumerate() {
        let field = |name: &str| format!("services[{index}].{name}");
        if service.name.trim().is_empty() {
            v.push(field("name"), "is required");
        }
        v.max_len(&field("name"), &service.name, MAX_TITLE_LEN);
        v.required_url(&field("url"), &service.url);
        if let Some(ping_url) = &service.ping_url {
            v.optional_url(&field("pingUrl"), ping_url);
        }
        v.optional_url(&field("iconUrl"), &service.icon_url);
    }
    v.finish()
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::{IntegrationRow, ItemKind, SecretRow};
    use crate::view::ItemView;

    fn service() -> BoardService {
        BoardService::new(BoardStore::in_memory().unwrap())
    }

    fn app(name: &str) -> ServiceInput {
        ServiceInput {
            name: name.to_string(),
            url: format!("https://{}.example.com", name.to_lowercase()),
            ping_url: None,
            icon_url: String::new(),
            description: String::new(),
            integration: None,
        }
    }

    fn cells(items: &[&ItemView]) -> Vec<(u32, u32)> {
        items.iter().map(|i| (i.x, i.y)).collect()
    }

    #[test]
    fn create_and_fetch_empty_board() {
        let svc = service();
        svc.create_board("home", true).unwrap();

        let view = svc.board_by_name("home", None, false).unwrap();
        assert_eq!(view.layout.name, "desktop");
        assert_eq!(view.layout.column_count, 12);
        assert_eq!(view.layouts.len(), 3);
        assert_eq!(view.sections.len(), 1);
        assert_eq!(view.sections[0].kind, SectionKind::Empty);
        assert!(view.sections[0].items.is_empty());
    }

    #[test]
    fn duplicate_name_conflicts() {
        let svc = service();
        svc.create_board("home", true).unwrap();
        assert!(matches!(
            svc.create_board("home", false),
            Err(CoreError::Conflict { .. })
        ));
        assert!(!svc.check_name_available("home").unwrap());
        assert!(svc.check_name_available("other").unwrap());
        assert!(!svc.check_name_available("bad name").unwrap());
    }

    #[test]
    fn unknown_board_and_layout_are_not_found() {
        let svc = service();
        assert!(matches!(
            svc.board_by_name("missing", None, true),
            Err(CoreError::NotFound { what: "board", .. })
        ));

        svc.create_board("home", true).unwrap();
        assert!(matches!(
            svc.board_by_name("home", Some("tv"), true),
            Err(CoreError::NotFound { what: "layout", .. })
        ));
        let mobile = svc.board_by_name("home", Some("mobile"), true).unwrap();
        assert_eq!(mobile.layout.column_count, 2);
    }

    #[test]
    fn private_boards_hidden_without_access() {
        let svc = service();
        svc.create_board("public", true).unwrap();
        svc.create_board("private", false).unwrap();

        let names: Vec<_> = svc.list_boards(false).unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["public"]);
        let names: Vec<_> = svc.list_boards(true).unwrap().into_iter().map(|b| b.name).collect();
        assert_eq!(names, vec!["private", "public"]);

        assert!(svc.board_by_name("private", None, false).is_err());
        assert!(svc.board_by_name("private", None, true).is_ok());
    }

    #[test]
    fn add_services_fills_rows_below_existing_items() {
        let svc = service();
        svc.create_board("home", true).unwrap();

        svc.add_services("home", &[app("One"), app("Two"), app("Three")]).unwrap();
        svc.add_services("home", &[app("Four")]).unwrap();

        let mobile = svc.board_by_name("home", Some("mobile"), true).unwrap();
        let items: Vec<_> = mobile.items().collect();
        // two columns on mobile
        assert_eq!(cells(&items), vec![(0, 0), (1, 0), (0, 1), (0, 2)]);

        let desktop = svc.board_by_name("home", None, true).unwrap();
        let items: Vec<_> = desktop.items().collect();
        assert_eq!(cells(&items), vec![(0, 0), (1, 0), (2, 0), (0, 1)]);
        assert_eq!(items[0].kind, ItemKind::App);
        assert_eq!(items[0].options.get("openInNewTab"), Some(&Value::Bool(true)));
        assert_eq!(items[3].app.as_ref().map(|a| a.name.as_str()), Some("Four"));
    }

    #[test]
    fn add_services_links_integration_without_exposing_secrets() {
        let svc = service();
        svc.create_board("home", true).unwrap();

        let mut sonarr = app("Sonarr");
        sonarr.ping_url = Some("http://sonarr:8989".to_string());
        sonarr.integration = Some(ServiceIntegrationInput {
            kind: IntegrationKind::Sonarr,
            secrets: vec![SecretInput {
                kind: SecretKind::ApiKey,
                value: "hunter2".to_string(),
            }],
        });
        svc.add_services("home", &[sonarr]).unwrap();

        let view = svc.board_by_name("home", None, true).unwrap();
        let item = view.items().next().unwrap();
        assert_eq!(item.integrations.len(), 1);
        assert_eq!(item.integrations[0].url, "http://sonarr:8989");
        assert_eq!(item.integrations[0].secrets, vec![SecretKind::ApiKey]);

        let json = serde_json::to_string(&view).unwrap();
        assert!(!json.contains("hunter2"));
    }

    #[test]
    fn add_services_validates_and_requires_board() {
        let svc = service();
        assert!(matches!(
            svc.add_services("missing", &[]),
            Err(CoreError::NotFound { .. })
        ));

        svc.create_board("home", true).unwrap();
        let mut bad = app("x");
        bad.url = "not a url".to_string();
        let Err(CoreError::Validation(errors)) = svc.add_services("home", &[bad]) else {
            unreachable!("expected validation error");
        };
        assert_eq!(errors[0].field, "services[0].url");
        assert!(svc.add_services("home", &[]).unwrap().is_empty());
    }

    #[test]
    fn update_customization_replaces_appearance() {
        let svc = service();
        svc.create_board("home", true).unwrap();
        let view = svc.board_by_name("home", None, true).unwrap();

        let input = CustomizationInput {
            customization: Customization {
                page_title: "My Home".to_string(),
                primary_color: "#228be6".to_string(),
                opacity: 80,
                ..Customization::default()
            },
            is_public: Some(false),
            layouts: vec![LayoutSettingsInput {
                id: view.layout.id,
                column_count: 16,
                show_left_sidebar: true,
                show_right_sidebar: false,
            }],
        };
        let updated = svc.update_customization("home", &input).unwrap();
        assert!(!updated.is_public);
        assert_eq!(updated.customization.page_title, "My Home");

        let view = svc.board_by_name("home", None, true).unwrap();
        assert_eq!(view.customization.opacity, 80);
        assert_eq!(view.layout.column_count, 16);
        assert!(view.layout.show_left_sidebar);
        assert!(svc.board_by_name("home", None, false).is_err());
    }

    #[test]
    fn update_customization_rejects_foreign_layout() {
        let svc = service();
        svc.create_board("a", true).unwrap();
        svc.create_board("b", true).unwrap();
        let other = svc.board_by_name("b", None, true).unwrap();

        let input = CustomizationInput {
            layouts: vec![LayoutSettingsInput {
                id: other.layout.id,
                column_count: 4,
                show_left_sidebar: false,
                show_right_sidebar: false,
            }],
            ..CustomizationInput::default()
        };
        assert!(matches!(
            svc.update_customization("a", &input),
            Err(CoreError::NotFound { what: "layout", .. })
        ));
        // nothing written
        let other = svc.board_by_name("b", None, true).unwrap();
        assert_eq!(other.layout.column_count, 12);
    }

    #[test]
    fn update_customization_validates() {
        let svc = service();
        svc.create_board("home", true).unwrap();
        let input = CustomizationInput {
            customization: Customization {
                secondary_color: "blue".to_string(),
                ..Customization::default()
            },
            ..CustomizationInput::default()
        };
        assert!(matches!(
            svc.update_customization("home", &input),
            Err(CoreError::Validation(_))
        ));
    }

    #[test]
    fn rename_and_delete() {
        let svc = service();
        svc.create_board("old", true).unwrap();
        svc.add_services("old", &[app("One")]).unwrap();

        svc.rename_board("old", "new").unwrap();
        assert!(svc.board_by_name("old", None, true).is_err());
        assert_eq!(svc.board_by_name("new", None, true).unwrap().items().count(), 1);

        svc.create_board("taken", true).unwrap();
        assert!(matches!(
            svc.rename_board("new", "taken"),
            Err(CoreError::Conflict { .. })
        ));

        svc.delete_board("new").unwrap();
        assert!(svc.board_by_name("new", None, true).is_err());
        let tx = svc.store().read().unwrap();
        assert!(tx.all::<ItemRow>().unwrap().is_empty());
        assert!(tx.all::<LayoutItemRow>().unwrap().is_empty());
        assert!(tx.all::<AppRow>().unwrap().is_empty());
        assert_eq!(tx.all::<LayoutRow>().unwrap().len(), 3);
    }

    #[test]
    fn delete_drops_links_but_keeps_integrations() {
        let svc = service();
        svc.create_board("home", true).unwrap();
        svc.create_board("other", true).unwrap();

        let mut sonarr = app("Sonarr");
        sonarr.integration = Some(ServiceIntegrationInput {
            kind: IntegrationKind::Sonarr,
            secrets: vec![SecretInput {
                kind: SecretKind::ApiKey,
                value: "hunter2".to_string(),
            }],
        });
        svc.add_services("home", &[sonarr]).unwrap();
        svc.add_services("other", &[app("Grafana")]).unwrap();

        svc.delete_board("home").unwrap();

        let tx = svc.store().read().unwrap();
        assert!(tx.all::<ItemIntegrationRow>().unwrap().is_empty());
        // only the surviving board's openInNewTab option is left
        let options = tx.all::<OptionRow>().unwrap();
        assert_eq!(options.len(), 1);
        assert_eq!(options[0].path, "openInNewTab");

        let integrations = tx.all::<IntegrationRow>().unwrap();
        assert_eq!(integrations.len(), 1);
        assert_eq!(integrations[0].kind, IntegrationKind::Sonarr);
        let secrets = tx.all::<SecretRow>().unwrap();
        assert_eq!(secrets.len(), 1);
        assert_eq!(secrets[0].integration_id, integrations[0].id);
    }

    #[test]
    fn sections_sorted_by_position_then_id() {
        let svc = service();
        svc.create_board("home", true).unwrap();
        let view = svc.board_by_name("home", None, true).unwrap();
        let main = view.sections[0].id;

        let tx = svc.store().write().unwrap();
        let section = |id: SectionId, position: u32, name: &str| SectionRow {
            id,
            layout_id: view.layout.id,
            kind: SectionKind::Category,
            position,
            name: Some(name.to_string()),
            side: None,
        };
        let later = SectionId(tx.next_id().unwrap());
        tx.put(&section(later, 1, "Later")).unwrap();
        let tied = SectionId(tx.next_id().unwrap());
        tx.put(&section(tied, 0, "Tied")).unwrap();
        tx.commit().unwrap();

        let view = svc.board_by_name("home", None, true).unwrap();
        let order: Vec<_> = view.sections.iter().map(|s| s.id).collect();
        assert_eq!(order, vec![main, tied, later]);
    }

    #[test]
    fn concurrent_bootstrap_creates_one_board() {
        let svc = service();
        let created: Vec<bool> = std::thread::scope(|s| {
            let handles: Vec<_> = (0..4)
                .map(|_| s.spawn(|| svc.ensure_example_board().unwrap()))
                .collect();
            handles.into_iter().map(|h| h.join().unwrap()).collect()
        });

        assert_eq!(created.iter().filter(|c| **c).count(), 1);
        assert_eq!(svc.list_boards(true).unwrap().len(), 1);
    }

    #[test]
    fn example_board_bootstraps_once() {
        let svc = service();
        assert!(svc.ensure_example_board().unwrap());
        assert!(!svc.ensure_example_board().unwrap());

        let view = svc.board_by_name(DEFAULT_BOARD_NAME, None, true).unwrap();
        assert!(view.items().any(|i| i.widget.is_some()));
        assert!(view.items().any(|i| i.app.is_some()));

        assert!(matches!(
            svc.create_example_board(DEFAULT_BOARD_NAME),
            Err(CoreError::Conflict { .. })
        ));
        svc.create_example_board("second").unwrap();
        assert_eq!(svc.list_boards(true).unwrap().len(), 2);
    }

    #[test]
    fn widget_options_come_back_nested() {
        let svc = service();
        svc.create_example_board("demo").unwrap();
        let view = svc.board_by_name("demo", None, true).unwrap();
        let weather = view
            .items()
            .find(|i| i.widget.as_ref().map(|w| w.kind.as_str()) == Some("weather"))
            .unwrap();
        assert_eq!(
            weather.options.get("location").and_then(|l| l.get("name")),
            Some(&Value::String("Paris".to_string()))
        );
    }
}
