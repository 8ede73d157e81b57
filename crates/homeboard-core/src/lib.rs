//! # Homeboard Core
//!
//! The board engine behind the Homeboard dashboard.
//!
//! A board is stored as relational rows (board, layout, section, item, app,
//! widget, option, integration, secret, layout item) in an embedded redb
//! database. This crate owns those rows, the nested option mapping that
//! turns flat `path -> value` rows back into JSON objects, and the
//! [`BoardService`] that reads and mutates whole boards in single
//! transactions.
//!
//! ## Layering
//!
//! ```text
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ board        │──►│ storage      │──►│ redb         │
//! │ (service)    │   │ (BoardStore) │   │ (tables)     │
//! └──────┬───────┘   └──────────────┘   └──────────────┘
//!        │ uses
//!        ▼
//! ┌──────────────┐   ┌──────────────┐   ┌──────────────┐
//! │ options      │   │ validation   │   │ formats      │
//! │ (path maps)  │   │ (inputs)     │   │ (legacy JSON)│
//! └──────────────┘   └──────────────┘   └──────────────┘
//! ```

pub mod board;
pub mod error;
pub mod example;
pub mod formats;
pub mod model;
pub mod options;
pub mod storage;
pub mod validation;
pub mod view;

pub use board::{
    BoardService, CustomizationInput, DEFAULT_BOARD_NAME, LayoutSettingsInput, SecretInput,
    ServiceInput, ServiceIntegrationInput,
};
pub use error::{CoreError, FieldError, Result};
pub use model::*;
pub use options::{OptionEntry, OptionKind, add_at_path, flatten_options, map_options};
pub use storage::{BoardStore, ReadTx, RowSource, WriteTx};
pub use view::*;

use serde::{Deserialize, Serialize};

// =============================================================================
// IDENTIFIERS
// =============================================================================

macro_rules! row_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u64);

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, "{}", self.0)
            }
        }
    };
}

row_id!(
    /// Identifier of a board.
    BoardId
);
row_id!(
    /// Identifier of a layout (one per board and screen class).
    LayoutId
);
row_id!(
    /// Identifier of a section inside a layout.
    SectionId
);
row_id!(
    /// Identifier of an item (app or widget) on a board.
    ItemId
);
row_id!(
    /// Identifier of an external service integration.
    IntegrationId
);
