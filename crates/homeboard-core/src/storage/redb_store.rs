//! # Redb Board Store
//!
//! One table per row type, keyed by `u64` with postcard-encoded values,
//! plus two small side tables:
//!
//! | Table        | Key    | Value | Purpose                       |
//! |--------------|--------|-------|-------------------------------|
//! | `board_names`| `&str` | `u64` | unique board name index       |
//! | `meta`       | `&str` | `u64` | id sequence                   |

use crate::error::Result;
use crate::model::{
    AppRow, BoardRow, IntegrationRow, ItemIntegrationRow, ItemRow, LayoutItemRow, LayoutRow,
    OptionRow, SectionRow, SecretRow, WidgetRow,
};
use crate::BoardId;
use redb::{
    Database, ReadTransaction, ReadableDatabase, ReadableTable, TableDefinition, WriteTransaction,
};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::path::Path;

// =============================================================================
// TABLE DEFINITIONS
// =============================================================================

type RowTable = TableDefinition<'static, u64, &'static [u8]>;

const BOARDS: RowTable = TableDefinition::new("boards");
const LAYOUTS: RowTable = TableDefinition::new("layouts");
const SECTIONS: RowTable = TableDefinition::new("sections");
const ITEMS: RowTable = TableDefinition::new("items");
const APPS: RowTable = TableDefinition::new("apps");
const WIDGETS: RowTable = TableDefinition::new("widgets");
const OPTIONS: RowTable = TableDefinition::new("item_options");
const INTEGRATIONS: RowTable = TableDefinition::new("integrations");
const SECRETS: RowTable = TableDefinition::new("integration_secrets");
const ITEM_INTEGRATIONS: RowTable = TableDefinition::new("item_integrations");
const LAYOUT_ITEMS: RowTable = TableDefinition::new("layout_items");

const ROW_TABLES: [RowTable; 11] = [
    BOARDS,
    LAYOUTS,
    SECTIONS,
    ITEMS,
    APPS,
    WIDGETS,
    OPTIONS,
    INTEGRATIONS,
    SECRETS,
    ITEM_INTEGRATIONS,
    LAYOUT_ITEMS,
];

const BOARD_NAMES: TableDefinition<&str, u64> = TableDefinition::new("board_names");
const META: TableDefinition<&str, u64> = TableDefinition::new("meta");

const NEXT_ID_KEY: &str = "next_id";

// =============================================================================
// ROW TRAIT
// =============================================================================

/// A row type with its own table.
pub trait Row: Serialize + DeserializeOwned {
    const TABLE: RowTable;

    /// Primary key of this row.
    fn key(&self) -> u64;
}

macro_rules! impl_row {
    ($ty:ty, $table:expr, |$row:ident| $key:expr) => {
        impl Row for $ty {
            const TABLE: RowTable = $table;

            fn key(&self) -> u64 {
                let $row = self;
                $key
            }
        }
    };
}

impl_row!(BoardRow, BOARDS, |r| r.id.0);
impl_row!(LayoutRow, LAYOUTS, |r| r.id.0);
impl_row!(SectionRow, SECTIONS, |r| r.id.0);
impl_row!(ItemRow, ITEMS, |r| r.id.0);
impl_row!(AppRow, APPS, |r| r.item_id.0);
impl_row!(WidgetRow, WIDGETS, |r| r.item_id.0);
impl_row!(OptionRow, OPTIONS, |r| r.id);
impl_row!(IntegrationRow, INTEGRATIONS, |r| r.id.0);
impl_row!(SecretRow, SECRETS, |r| r.id);
impl_row!(ItemIntegrationRow, ITEM_INTEGRATIONS, |r| r.id);
impl_row!(LayoutItemRow, LAYOUT_ITEMS, |r| r.id);

fn read_row<R: Row>(table: &impl ReadableTable<u64, &'static [u8]>, id: u64) -> Result<Option<R>> {
    match table.get(id)? {
        Some(guard) => Ok(Some(postcard::from_bytes(guard.value())?)),
        None => Ok(None),
    }
}

fn scan_rows<R: Row>(
    table: &impl ReadableTable<u64, &'static [u8]>,
    mut keep: impl FnMut(&R) -> bool,
) -> Result<Vec<R>> {
    let mut rows = Vec::new();
    for entry in table.iter()? {
        let (_, value) = entry?;
        let row: R = postcard::from_bytes(value.value())?;
        if keep(&row) {
            rows.push(row);
        }
    }
    Ok(rows)
}

fn read_name(table: &impl ReadableTable<&'static str, u64>, name: &str) -> Result<Option<BoardId>> {
    Ok(table.get(name)?.map(|guard| BoardId(guard.value())))
}

// =============================================================================
// ROW SOURCE
// =============================================================================

/// Read access shared by read and write transactions.
pub trait RowSource {
    /// Fetch one row by primary key.
    fn get<R: Row>(&self, id: u64) -> Result<Option<R>>;

    /// All rows of a table matching `keep`, in key order.
    fn scan<R: Row>(&self, keep: impl FnMut(&R) -> bool) -> Result<Vec<R>>;

    /// Resolve a board name through the unique index.
    fn board_id_by_name(&self, name: &str) -> Result<Option<BoardId>>;

    /// All rows of a table, in key order.
    fn all<R: Row>(&self) -> Result<Vec<R>> {
        self.scan(|_: &R| true)
    }
}

// =============================================================================
// STORE
// =============================================================================

/// The board database.
pub struct BoardStore {
    db: Database,
}

impl std::fmt::Debug for BoardStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoardStore").finish_non_exhaustive()
    }
}

impl BoardStore {
    /// Open (or create) a database file.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// A throwaway database held in memory.
    pub fn in_memory() -> Result<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    /// Create every table up front so read transactions never hit a
    /// missing one.
    fn init(db: Database) -> Result<Self> {
        let txn = db.begin_write()?;
        {
            txn.open_table(BOARD_NAMES)?;
            txn.open_table(META)?;
            for table in ROW_TABLES {
                txn.open_table(table)?;
            }
        }
        txn.commit()?;
        Ok(Self { db })
    }

    /// Begin a read-only snapshot.
    pub fn read(&self) -> Result<ReadTx> {
        Ok(ReadTx {
            txn: self.db.begin_read()?,
        })
    }

    /// Begin a write transaction. Dropping it without [`WriteTx::commit`]
    /// discards every change.
    pub fn write(&self) -> Result<WriteTx> {
        Ok(WriteTx {
            txn: self.db.begin_write()?,
        })
    }
}

// =============================================================================
// TRANSACTIONS
// =============================================================================

/// Read-only snapshot of the store.
pub struct ReadTx {
    txn: ReadTransaction,
}

impl RowSource for ReadTx {
    fn get<R: Row>(&self, id: u64) -> Result<Option<R>> {
        let table = self.txn.open_table(R::TABLE)?;
        read_row(&table, id)
    }

    fn scan<R: Row>(&self, keep: impl FnMut(&R) -> bool) -> Result<Vec<R>> {
        let table = self.txn.open_table(R::TABLE)?;
        scan_rows(&table, keep)
    }

    fn board_id_by_name(&self, name: &str) -> Result<Option<BoardId>> {
        let table = self.txn.open_table(BOARD_NAMES)?;
        read_name(&table, name)
    }
}

/// Read-write transaction.
pub struct WriteTx {
    txn: WriteTransaction,
}

impl RowSource for WriteTx {
    fn get<R: Row>(&self, id: u64) -> Result<Option<R>> {
        let table = self.txn.open_table(R::TABLE)?;
        read_row(&table, id)
    }

    fn scan<R: Row>(&self, keep: impl FnMut(&R) -> bool) -> Result<Vec<R>> {
        let table = self.txn.open_table(R::TABLE)?;
        scan_rows(&table, keep)
    }

    fn board_id_by_name(&self, name: &str) -> Result<Option<BoardId>> {
        let table = self.txn.open_table(BOARD_NAMES)?;
        read_name(&table, name)
    }
}

impl WriteTx {
    /// Draw the next id from the shared sequence.
    pub fn next_id(&self) -> Result<u64> {
        let mut table = self.txn.open_table(META)?;
        let current = table.get(NEXT_ID_KEY)?.map(|g| g.value()).unwrap_or(1);
        table.insert(NEXT_ID_KEY, current.saturating_add(1))?;
        Ok(current)
    }

    /// Insert or replace a row.
    pub fn put<R: Row>(&self, row: &R) -> Result<()> {
        let bytes = postcard::to_allocvec(row)?;
        let mut table = self.txn.open_table(R::TABLE)?;
        table.insert(row.key(), bytes.as_slice())?;
        Ok(())
    }

    /// Remove a row by key. Returns whether it existed.
    pub fn delete<R: Row>(&self, id: u64) -> Result<bool> {
        let mut table = self.txn.open_table(R::TABLE)?;
        let removed = table.remove(id)?.is_some();
        Ok(removed)
    }

    /// Remove every row matching `matches` and return them.
    pub fn delete_where<R: Row>(&self, matches: impl FnMut(&R) -> bool) -> Result<Vec<R>> {
        let doomed = self.scan(matches)?;
        let mut table = self.txn.open_table(R::TABLE)?;
        for row in &doomed {
            table.remove(row.key())?;
        }
        Ok(doomed)
    }

    /// Point `name` at a board in the unique name index.
    pub fn bind_name(&self, name: &str, id: BoardId) -> Result<()> {
        let mut table = self.txn.open_table(BOARD_NAMES)?;
        table.insert(name, id.0)?;
        Ok(())
    }

    /// Drop `name` from the index.
    pub fn unbind_name(&self, name: &str) -> Result<()> {
        let mut table = self.txn.open_table(BOARD_NAMES)?;
        table.remove(name)?;
        Ok(())
    }

    /// Make every change visible atomically.
    pub fn commit(self) -> Result<()> {
        self.txn.commit()?;
        Ok(())
    }
}

// =============================================================================
// TESTS
// =============================================================================
