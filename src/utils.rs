//! Helper functions could be used in api/, front/, ...

use sqlx::{
    SqlitePool,
    sqlite::{SqliteConnectOptions, SqliteJournalMode},
};
use std::str::FromStr;

/// Opens a pool on `db_host`, applying the sqlcipher pragmas when a key is given.
///
/// Read only pools never create the database file.
pub async fn setup_sqlite_db_pool(
    db_host: &str,
    pass_encrypt: Option<&str>,
    read_only: bool,
) -> anyhow::Result<SqlitePool> {
    let options = SqliteConnectOptions::from_str(db_host)?
        .read_only(read_only)
        .create_if_missing(!read_only)
        .pragma("foreign_keys", "ON");

    if let Some(key) = pass_encrypt {
        return Ok(SqlitePool::connect_with(
            options
                .pragma("key", key.to_string())
                .pragma("cipher_page_size", "1024")
                .pragma("kdf_iter", "64000")
                .pragma("cipher_hmac_algorithm", "HMAC_SHA1")
                .pragma("cipher_kdf_algorithm", "PBKDF2_HMAC_SHA1")
                .journal_mode(SqliteJournalMode::Delete),
        )
        .await?);
    }

    Ok(SqlitePool::connect_with(options).await?)
}
