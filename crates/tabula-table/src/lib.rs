//! Table accessor and list cursor for tabula.
//!
//! [`TableAccessor`] binds to one table, introspects its columns and primary
//! key on first use, and reads or writes one working row at a time with
//! per-column dirty tracking and optional column encryption.
//!
//! [`ListCursor`] wraps an accessor and walks the rows matching a filter in
//! both directions, caching only their keys.
//!
//! # Example
//!
//! ```ignore
//! let mut customers = TableAccessor::new(executor, "Customers")?;
//! customers.get(42)?;
//! customers.set_value("City", "Portland")?;
//! customers.upd(true)?; // writes only "City"
//!
//! let mut list = ListCursor::new(customers);
//! list.get_list("where City = 'Seattle' order by ID")?;
//! let mut current = list.first()?;
//! while let Some(id) = current {
//!     println!("{id}: {:?}", list.accessor().get_str("Name", false)?);
//!     current = list.next()?;
//! }
//! ```

pub mod accessor;
pub mod cursor;
pub mod hooks;
pub mod sql;

pub use accessor::{PrimaryKey, TableAccessor, TableSchema};
pub use cursor::{CursorPosition, ListCursor};
pub use hooks::{Hook, HookEvent, HookKind, Hooks};
