//! Persisted key-value state shared between sale commands
//!
//! Commands read identities from a dotenv-format file at start and write newly
//! created identities back at the end. Process environment variables take
//! precedence over file entries on read, the same way `dotenv` loading does.
//! Writes rewrite only the lines of keys that were set, keep every other line
//! (comments included) line for line, and append new keys at the end. The
//! file is replaced atomically through a temp file in the same directory
//! followed by a rename. Concurrent writers are not supported.

use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
    str::FromStr,
};

use log::debug;
use solana_sdk::{
    pubkey::Pubkey,
    signature::{Keypair, Signer},
};
use tempfile::NamedTempFile;

use crate::error::{SdkError, SdkResult};

/// Environment keys read and written by the sale commands
pub mod keys {
    pub const RPC_URL: &str = "RPC_URL";
    pub const CUSTOM_PROGRAM_ID: &str = "CUSTOM_PROGRAM_ID";
    pub const SELLER_PUBLIC_KEY: &str = "SELLER_PUBLIC_KEY";
    pub const SELLER_PRIVATE_KEY: &str = "SELLER_PRIVATE_KEY";
    pub const BUYER_PUBLIC_KEY: &str = "BUYER_PUBLIC_KEY";
    pub const BUYER_PRIVATE_KEY: &str = "BUYER_PRIVATE_KEY";
    pub const TOKEN_PUBKEY: &str = "TOKEN_PUBKEY";
    pub const SELLER_TOKEN_ACCOUNT_PUBKEY: &str = "SELLER_TOKEN_ACCOUNT_PUBKEY";
    pub const TOKEN_SALE_PROGRAM_ACCOUNT_PUBKEY: &str = "TOKEN_SALE_PROGRAM_ACCOUNT_PUBKEY";
    pub const TEMP_TOKEN_ACCOUNT_PUBKEY: &str = "TEMP_TOKEN_ACCOUNT_PUBKEY";
}

/// Ordered contents of one environment file
#[derive(Debug, Clone)]
pub struct EnvStore {
    path: PathBuf,
    /// Raw file contents split into lines, without terminators
    lines: Vec<String>,
    entries: Vec<(String, String)>,
    /// Keys set since loading, in the order first set
    dirty: Vec<String>,
    read_process_env: bool,
}

impl EnvStore {
    /// Load a file, treating a missing file as empty
    pub fn load(path: impl AsRef<Path>) -> SdkResult<Self> {
        let path = path.as_ref().to_path_buf();
        let mut entries: Vec<(String, String)> = Vec::new();
        let mut lines = Vec::new();

        if path.exists() {
            lines = fs::read_to_string(&path)?
                .lines()
                .map(str::to_string)
                .collect();
            let iter = dotenvy::from_path_iter(&path).map_err(|e| {
                SdkError::config(format!("failed to open {}: {}", path.display(), e))
            })?;
            for item in iter {
                let (key, value) = item.map_err(|e| {
                    SdkError::config(format!("failed to parse {}: {}", path.display(), e))
                })?;
                upsert(&mut entries, key, value);
            }
        }

        debug!("Loaded {} entries from {}", entries.len(), path.display());
        Ok(Self {
            path,
            lines,
            entries,
            dirty: Vec::new(),
            read_process_env: true,
        })
    }

    /// Ignore process environment variables and read only the file
    pub fn file_only(mut self) -> Self {
        self.read_process_env = false;
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, key: &str) -> Option<String> {
        if self.read_process_env {
            if let Ok(value) = std::env::var(key) {
                return Some(value);
            }
        }
        self.entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.clone())
    }

    /// Value for a key that must be present and non-empty
    pub fn require(&self, key: &str) -> SdkResult<String> {
        match self.get(key) {
            Some(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
            _ => Err(SdkError::config(format!(
                "{} is not set in {}",
                key,
                self.path.display()
            ))),
        }
    }

    pub fn pubkey(&self, key: &str) -> SdkResult<Pubkey> {
        let value = self.require(key)?;
        Pubkey::from_str(&value)
            .map_err(|e| SdkError::config(format!("{} is not a valid public key: {}", key, e)))
    }

    /// Keypair from a base58 secret key, checked against its public key entry
    pub fn keypair(&self, public_key: &str, private_key: &str) -> SdkResult<Keypair> {
        let expected = self.pubkey(public_key)?;
        let secret = self.require(private_key)?;
        let keypair = keypair_from_base58(&secret)
            .map_err(|e| SdkError::config(format!("{}: {}", private_key, e)))?;

        if keypair.pubkey() != expected {
            return Err(SdkError::config(format!(
                "{} does not belong to {} ({} != {})",
                private_key,
                public_key,
                keypair.pubkey(),
                expected
            )));
        }
        Ok(keypair)
    }

    /// Set or replace a value in memory
    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        upsert(&mut self.entries, key.to_string(), value.into());
        if !self.dirty.iter().any(|k| k == key) {
            self.dirty.push(key.to_string());
        }
    }

    /// File contents with every set key written in place or appended
    pub fn render(&self) -> String {
        let mut written: Vec<&str> = Vec::new();
        let mut out = String::new();

        for line in &self.lines {
            match line_key(line).and_then(|key| self.dirty.iter().find(|k| *k == key)) {
                Some(key) if !written.contains(&key.as_str()) => {
                    out.push_str(&self.assignment(key));
                    written.push(key);
                }
                // Later duplicates of a rewritten key are dropped
                Some(_) => continue,
                None => out.push_str(line),
            }
            out.push('\n');
        }

        for key in &self.dirty {
            if !written.contains(&key.as_str()) {
                out.push_str(&self.assignment(key));
                out.push('\n');
            }
        }
        out
    }

    fn assignment(&self, key: &str) -> String {
        let value = self
            .entries
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .unwrap_or_default();
        format!("{}={}", key, quote_value(value))
    }

    /// Write the file back atomically
    pub fn persist(&self) -> SdkResult<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        fs::create_dir_all(&dir)?;

        let mut tmp = NamedTempFile::new_in(&dir)?;
        tmp.write_all(self.render().as_bytes())?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| SdkError::Io(e.error))?;

        debug!("Wrote {} changed keys to {}", self.dirty.len(), self.path.display());
        Ok(())
    }
}

fn upsert(entries: &mut Vec<(String, String)>, key: String, value: String) {
    match entries.iter_mut().find(|(k, _)| *k == key) {
        Some(entry) => entry.1 = value,
        None => entries.push((key, value)),
    }
}

/// Key assigned on a dotenv line, if the line is an assignment
fn line_key(line: &str) -> Option<&str> {
    let line = line.trim_start();
    if line.starts_with('#') {
        return None;
    }
    let line = line.strip_prefix("export ").unwrap_or(line);
    let (key, _) = line.split_once('=')?;
    let key = key.trim();
    (!key.is_empty()).then_some(key)
}

/// Render a value so the dotenv parser reads it back unchanged
///
/// Plain values stay bare, values without single quotes or newlines are
/// single-quoted (no escapes or substitution inside), anything else is
/// double-quoted with `\\`, `"`, `$` and newlines escaped.
fn quote_value(value: &str) -> String {
    let bare = |c: char| c.is_ascii_alphanumeric() || "-_./:+,@%".contains(c);
    if value.chars().all(bare) {
        return value.to_string();
    }
    if !value.contains(['\'', '\n', '\r']) {
        return format!("'{}'", value);
    }

    let mut out = String::with_capacity(value.len() + 2);
    out.push('"');
    for c in value.chars() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '$' => out.push_str("\\$"),
            '\n' => out.push_str("\\n"),
            other => out.push(other),
        }
    }
    out.push('"');
    out
}

/// Decode a base58 encoded 64-byte secret key
pub fn keypair_from_base58(secret: &str) -> Result<Keypair, String> {
    let bytes = bs58::decode(secret.trim())
        .into_vec()
        .map_err(|e| format!("invalid base58: {}", e))?;
    Keypair::from_bytes(&bytes).map_err(|e| format!("invalid secret key: {}", e))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn write_env(dir: &Path, contents: &str) -> PathBuf {
        let path = dir.join(".env");
        fs::write(&path, contents).unwrap();
        path
    }

    #[test]
    fn test_missing_file_is_empty() {
        let dir = tempdir().unwrap();
        let store = EnvStore::load(dir.path().join("absent.env")).unwrap().file_only();
        assert!(store.get(keys::TOKEN_PUBKEY).is_none());
        assert!(store.require(keys::TOKEN_PUBKEY).is_err());
    }

    #[test]
    fn test_reads_pubkeys() {
        let dir = tempdir().unwrap();
        let mint = Pubkey::new_unique();
        let path = write_env(dir.path(), &format!("TOKEN_PUBKEY={}\n", mint));

        let store = EnvStore::load(&path).unwrap().file_only();
        assert_eq!(store.pubkey(keys::TOKEN_PUBKEY).unwrap(), mint);
    }

    #[test]
    fn test_invalid_pubkey_is_reported() {
        let dir = tempdir().unwrap();
        let path = write_env(dir.path(), "TOKEN_PUBKEY=not-a-key\n");

        let err = EnvStore::load(&path)
            .unwrap()
            .file_only()
            .pubkey(keys::TOKEN_PUBKEY)
            .unwrap_err();
        assert!(err.to_string().contains("TOKEN_PUBKEY"));
    }

    #[test]
    fn test_keypair_must_match_public_key() {
        let dir = tempdir().unwrap();
        let seller = Keypair::new();
        let other = Keypair::new();
        let path = write_env(
            dir.path(),
            &format!(
                "SELLER_PUBLIC_KEY={}\nSELLER_PRIVATE_KEY={}\nBUYER_PUBLIC_KEY={}\nBUYER_PRIVATE_KEY={}\n",
                seller.pubkey(),
                seller.to_base58_string(),
                other.pubkey(),
                seller.to_base58_string(),
            ),
        );

        let store = EnvStore::load(&path).unwrap().file_only();
        let loaded = store
            .keypair(keys::SELLER_PUBLIC_KEY, keys::SELLER_PRIVATE_KEY)
            .unwrap();
        assert_eq!(loaded.pubkey(), seller.pubkey());

        assert!(store
            .keypair(keys::BUYER_PUBLIC_KEY, keys::BUYER_PRIVATE_KEY)
            .is_err());
    }

    #[test]
    fn test_persist_updates_and_appends() {
        let dir = tempdir().unwrap();
        let path = write_env(dir.path(), "TOKEN_PUBKEY=old\nCUSTOM_PROGRAM_ID=prog\n");

        let mut store = EnvStore::load(&path).unwrap().file_only();
        store.set(keys::TOKEN_PUBKEY, "new");
        store.set(keys::TEMP_TOKEN_ACCOUNT_PUBKEY, "temp");
        store.persist().unwrap();

        let contents = fs::read_to_string(&path).unwrap();
        assert_eq!(
            contents,
            "TOKEN_PUBKEY=new\nCUSTOM_PROGRAM_ID=prog\nTEMP_TOKEN_ACCOUNT_PUBKEY=temp\n"
        );

        let reloaded = EnvStore::load(&path).unwrap().file_only();
        assert_eq!(reloaded.get(keys::TEMP_TOKEN_ACCOUNT_PUBKEY).unwrap(), "temp");
        assert_eq!(reloaded.get(keys::CUSTOM_PROGRAM_ID).unwrap(), "prog");
    }

    #[test]
    fn test_persist_keeps_quoted_values_and_comments() {
        let dir = tempdir().unwrap();
        let original = "# seller wallet\nNOTE=\"a b\"\nHASH=\"x#y\"\nDOLLAR='p$q'\nTOKEN_PUBKEY=old\n";
        let path = write_env(dir.path(), original);

        let mut store = EnvStore::load(&path).unwrap().file_only();
        assert_eq!(store.get("NOTE").unwrap(), "a b");
        store.set(keys::TOKEN_PUBKEY, "new");
        store.set(keys::TEMP_TOKEN_ACCOUNT_PUBKEY, "temp");
        store.persist().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "# seller wallet\nNOTE=\"a b\"\nHASH=\"x#y\"\nDOLLAR='p$q'\nTOKEN_PUBKEY=new\nTEMP_TOKEN_ACCOUNT_PUBKEY=temp\n"
        );

        let reloaded = EnvStore::load(&path).unwrap().file_only();
        assert_eq!(reloaded.get("NOTE").unwrap(), "a b");
        assert_eq!(reloaded.get("HASH").unwrap(), "x#y");
        assert_eq!(reloaded.get("DOLLAR").unwrap(), "p$q");
        assert_eq!(reloaded.get(keys::TOKEN_PUBKEY).unwrap(), "new");
    }

    #[test]
    fn test_set_values_reload_unchanged() {
        let dir = tempdir().unwrap();
        let path = dir.path().join(".env");
        let values = [
            ("SPACED", "a b"),
            ("HASHED", "x#y"),
            ("DOLLAR", "p$q"),
            ("SINGLE", "it's"),
            ("MIXED", "it's \"$HOME\" \\ done"),
            ("MULTI", "line one\nline two"),
            ("URL", "https://api.devnet.solana.com"),
        ];

        let mut store = EnvStore::load(&path).unwrap().file_only();
        for (key, value) in values {
            store.set(key, value);
        }
        store.persist().unwrap();

        let reloaded = EnvStore::load(&path).unwrap().file_only();
        for (key, value) in values {
            assert_eq!(reloaded.get(key).unwrap(), value, "{}", key);
        }
        assert!(fs::read_to_string(&path)
            .unwrap()
            .contains("URL=https://api.devnet.solana.com\n"));
    }

    #[test]
    fn test_line_key() {
        assert_eq!(line_key("KEY=value"), Some("KEY"));
        assert_eq!(line_key("export KEY = value"), Some("KEY"));
        assert_eq!(line_key("# KEY=value"), None);
        assert_eq!(line_key(""), None);
    }

    #[test]
    fn test_persist_creates_new_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("sale.env");

        let mut store = EnvStore::load(&path).unwrap();
        store.set(keys::TOKEN_SALE_PROGRAM_ACCOUNT_PUBKEY, "sale");
        store.persist().unwrap();

        assert_eq!(
            fs::read_to_string(&path).unwrap(),
            "TOKEN_SALE_PROGRAM_ACCOUNT_PUBKEY=sale\n"
        );
    }

    #[test]
    fn test_keypair_from_base58_rejects_garbage() {
        assert!(keypair_from_base58("0OIl").is_err());
        assert!(keypair_from_base58("abc").is_err());
    }
}
