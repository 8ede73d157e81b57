//! # Storage Module
//!
//! Disk-backed board storage using redb.
//!
//! Uses redb embedded database for:
//! - ACID transactions (a board mutation touches many tables at once)
//! - Crash safety (copy-on-write B-trees)
//! - MVCC (concurrent readers, single writer)

mod redb_store;

pub use redb_store::{BoardStore, ReadTx, Row, RowSource, WriteTx};
