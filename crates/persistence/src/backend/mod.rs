// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Database backend-specific code.
//!
//! Connection set-up, migrations, PRAGMA handling and `last_insert_rowid()`
//! live here because Diesel has no portable DSL for them. Everything else
//! lives in `queries/` and `mutations/`.

pub mod sqlite;

use diesel::{Connection, SqliteConnection};

use crate::error::PersistenceError;

/// Raw-SQL helpers the mutation modules call on their connection.
pub trait PersistenceBackend: Connection {
    /// Id of the row just inserted for a parcel, event, challenge,
    /// assignment, attempt, staff member or rider.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError>;

    /// # Errors
    ///
    /// Returns `ForeignKeyEnforcementNotEnabled` if the PRAGMA is off.
    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError>;
}

impl PersistenceBackend for SqliteConnection {
    fn get_last_insert_rowid(&mut self) -> Result<i64, PersistenceError> {
        sqlite::get_last_insert_rowid(self)
    }

    fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        sqlite::verify_foreign_key_enforcement(self)
    }
}
