//! Key-cached bidirectional navigation over a filtered query.
//!
//! A [`ListCursor`] runs the caller's filter against the key column only and
//! keeps the ordered keys. Moving the cursor re-fetches the full row for the
//! key at the new position through the wrapped [`TableAccessor`], so memory
//! stays bounded by the key list at the cost of one round trip per step.

use tabula_core::value::parse_i64;
use tabula_core::{QueryExecutor, Result};

use crate::accessor::TableAccessor;
use crate::sql;

/// Where a cursor stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CursorPosition {
    /// No list loaded, or no listed row could be fetched.
    #[default]
    Unpositioned,
    /// On the key at this index; its row is in the working row.
    At(usize),
    /// The list is empty.
    Exhausted,
}

#[derive(Debug, Clone, Copy)]
enum Direction {
    Forward,
    Backward,
}

#[derive(Debug)]
pub struct ListCursor<E: QueryExecutor> {
    accessor: TableAccessor<E>,
    keys: Vec<i64>,
    position: CursorPosition,
}

impl<E: QueryExecutor> ListCursor<E> {
    pub fn new(accessor: TableAccessor<E>) -> Self {
        Self {
            accessor,
            keys: Vec::new(),
            position: CursorPosition::Unpositioned,
        }
    }

    /// Run `SELECT <key> FROM <table> <filter>` and cache the keys in order.
    ///
    /// `filter` is appended verbatim and must carry its own `WHERE`/`ORDER BY`
    /// keywords. The first row is loaded straight away and the cursor is left
    /// on it, so a following [`ListCursor::next`] moves to the second row.
    /// Returns the number of keys, 0 when the table has no usable key.
    #[tracing::instrument(level = "debug", skip(self), fields(table = %self.accessor.table()))]
    pub fn get_list(&mut self, filter: &str) -> Result<usize> {
        self.keys.clear();
        self.position = CursorPosition::Unpositioned;

        self.accessor.introspect()?;
        let key_name = match self.accessor.primary_key_name() {
            Ok(name) => name,
            Err(e) if e.is_primary_key() => {
                tracing::warn!(table = %self.accessor.table(), error = %e, "No usable key, list is empty");
                return Ok(0);
            }
            Err(e) => return Err(e),
        };

        let query = sql::select_keys(
            self.accessor.executor(),
            self.accessor.table(),
            &key_name,
            filter,
        );
        tracing::debug!(sql = %query, "Fetching key list");
        let rs = self.accessor.executor().execute_query(&query)?;

        let returned = rs.row_count();
        self.keys = rs
            .filter_map(|record| record.get(0).and_then(parse_i64))
            .collect();
        if self.keys.len() != returned {
            tracing::warn!(
                table = %self.accessor.table(),
                skipped = returned - self.keys.len(),
                "Ignored rows without an integer key"
            );
        }
        tracing::info!(table = %self.accessor.table(), count = self.keys.len(), "Loaded key list");

        if self.keys.is_empty() {
            self.position = CursorPosition::Exhausted;
        } else {
            self.seek(0, Direction::Forward)?;
        }
        Ok(self.keys.len())
    }

    /// Move to the first key whose row still exists and load it.
    pub fn first(&mut self) -> Result<Option<i64>> {
        self.seek(0, Direction::Forward)
    }

    /// Move to the last key whose row still exists and load it.
    pub fn last(&mut self) -> Result<Option<i64>> {
        match self.keys.len() {
            0 => Ok(None),
            n => self.seek(n - 1, Direction::Backward),
        }
    }

    /// Step forward, skipping rows deleted since the list was loaded.
    ///
    /// At the end, returns `None` without moving.
    pub fn next(&mut self) -> Result<Option<i64>> {
        let target = match self.position {
            CursorPosition::Unpositioned => 0,
            CursorPosition::At(i) => i + 1,
            CursorPosition::Exhausted => return Ok(None),
        };
        self.seek(target, Direction::Forward)
    }

    /// Step back, skipping rows deleted since the list was loaded.
    ///
    /// At the start, returns `None` without moving.
    pub fn prev(&mut self) -> Result<Option<i64>> {
        match self.position {
            CursorPosition::At(i) if i > 0 => self.seek(i - 1, Direction::Backward),
            _ => Ok(None),
        }
    }

    /// Load the first live row from `index` on in `direction`.
    ///
    /// The position moves only to a row that was found. When none is left,
    /// the row at the current position is fetched again so the working row
    /// still matches the position; if that row is gone too, the cursor
    /// becomes unpositioned.
    fn seek(&mut self, mut index: usize, direction: Direction) -> Result<Option<i64>> {
        let mut missed = false;
        while let Some(&key) = self.keys.get(index) {
            if let Some(found) = self.accessor.get(key)? {
                self.position = CursorPosition::At(index);
                return Ok(Some(found));
            }
            tracing::warn!(table = %self.accessor.table(), key, "Listed row no longer exists");
            missed = true;
            index = match direction {
                Direction::Forward => index + 1,
                Direction::Backward if index > 0 => index - 1,
                Direction::Backward => break,
            };
        }

        if missed {
            if let Some(key) = self.current_key() {
                if self.accessor.get(key)?.is_none() {
                    self.position = CursorPosition::Unpositioned;
                }
            }
        }
        Ok(None)
    }

    /// Number of keys in the current list.
    pub fn count(&self) -> usize {
        self.keys.len()
    }

    pub fn keys(&self) -> &[i64] {
        &self.keys
    }

    pub fn position(&self) -> CursorPosition {
        self.position
    }

    /// Key at the current position.
    pub fn current_key(&self) -> Option<i64> {
        match self.position {
            CursorPosition::At(i) => self.keys.get(i).copied(),
            _ => None,
        }
    }

    pub fn accessor(&self) -> &TableAccessor<E> {
        &self.accessor
    }

    /// The wrapped accessor, for editing the current row.
    pub fn accessor_mut(&mut self) -> &mut TableAccessor<E> {
        &mut self.accessor
    }

    pub fn into_accessor(self) -> TableAccessor<E> {
        self.accessor
    }
}
