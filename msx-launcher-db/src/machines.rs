//! Bulk machine reassignment.

use rusqlite::types::Value;
use rusqlite::params_from_iter;

use crate::action::{resolve_database_id, with_transaction};
use crate::backups::backup_database_in;
use crate::databases::database_names;
use crate::error::{storage_failure, PersistenceError};
use crate::store::CatalogStore;

/// Set the machine of games to `to`.
///
/// `from` restricts the change to games currently on that machine and
/// `database` to one database. With `backup_databases`, every affected
/// database is backed up first in the same transaction, so hitting a backup
/// ceiling leaves all games untouched. Returns the number of games updated.
pub fn update_machine(
    store: &CatalogStore,
    to: &str,
    from: Option<&str>,
    database: Option<&str>,
    backup_databases: bool,
) -> Result<usize, PersistenceError> {
    with_transaction(store, |conn| {
        if backup_databases {
            let targets = match database {
                Some(name) => vec![name.to_string()],
                None => database_names(conn)
                    .map_err(storage_failure)?
                    .into_iter()
                    .collect(),
            };
            for name in &targets {
                backup_database_in(conn, name)?;
            }
        }

        let mut sql = String::from("UPDATE game SET machine = ?1");
        let mut values = vec![Value::Text(to.to_string())];
        let mut filters = Vec::new();
        if let Some(from) = from {
            values.push(Value::Text(from.to_string()));
            filters.push(format!("machine = ?{}", values.len()));
        }
        if let Some(name) = database {
            values.push(Value::Integer(resolve_database_id(conn, name)));
            filters.push(format!("database_id = ?{}", values.len()));
        }
        if !filters.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&filters.join(" AND "));
        }

        let updated = conn
            .execute(&sql, params_from_iter(values))
            .map_err(storage_failure)?;
        log::info!("Updated machine of {updated} game(s) to '{to}'");
        Ok(updated)
    })
}
