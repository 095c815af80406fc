//! Named JSON records kept in a local directory, one file per record.
//!
//! The store itself is schema-agnostic; [`DeploymentRecord`] is the typed record the deploy and
//! playground scripts share.

use std::{
    fs,
    path::{
        Path,
        PathBuf,
    },
};

use serde::{
    de::DeserializeOwned,
    Deserialize,
    Serialize,
};
use solana_sdk::pubkey::Pubkey;

use crate::error::{
    StoreError,
    StoreResult,
};

pub const DEFAULT_STORE_DIR: &str = "store";

/// The record name the recurring-payments deploy script writes.
pub const RECURRING_PAYMENTS_RECORD: &str = "recurring-payments.json";

/// Holds the program id between the upload and the data account's creation.
pub const PENDING_DEPLOYMENT_RECORD: &str = "recurring-payments.pending.json";

pub struct ConfigStore {
    dir: PathBuf,
}

impl Default for ConfigStore {
    fn default() -> Self {
        Self::new(DEFAULT_STORE_DIR)
    }
}

impl ConfigStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn path_for(&self, name: &str) -> PathBuf {
        self.dir.join(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.path_for(name).is_file()
    }

    /// Reads and parses the record `name`. Fails with [`StoreError::NotFound`] if it was never
    /// saved.
    pub fn load<T: DeserializeOwned>(&self, name: &str) -> StoreResult<T> {
        let path = self.path_for(name);
        let text = fs::read_to_string(&path).map_err(|e| StoreError::io(&path, e))?;
        serde_json::from_str(&text).map_err(|source| StoreError::Json { path, source })
    }

    /// Like [`ConfigStore::load`], but a missing record is `Ok(None)`.
    pub fn load_optional<T: DeserializeOwned>(&self, name: &str) -> StoreResult<Option<T>> {
        match self.load(name) {
            Ok(record) => Ok(Some(record)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    /// Serializes `data` to the record `name`, creating the store directory if needed. The last
    /// write wins; there's no locking between concurrent writers.
    pub fn save<T: Serialize + ?Sized>(&self, name: &str, data: &T) -> StoreResult<()> {
        fs::create_dir_all(&self.dir).map_err(|e| StoreError::io(&self.dir, e))?;

        let path = self.path_for(name);
        let json = serde_json::to_string(data).map_err(|source| StoreError::Json {
            path: path.clone(),
            source,
        })?;

        // Write next to the target and rename over it so readers never see a partial file.
        let staging = self.staging_path(name);
        fs::write(&staging, json).map_err(|e| StoreError::io(&staging, e))?;
        fs::rename(&staging, &path).map_err(|source| {
            let _ = fs::remove_file(&staging);
            // Not `StoreError::io`: a missing file here is never the target.
            StoreError::Io { path, source }
        })
    }

    /// Deletes the record `name`. Removing a record that doesn't exist is not an error.
    pub fn remove(&self, name: &str) -> StoreResult<()> {
        let path = self.path_for(name);
        match fs::remove_file(&path).map_err(|e| StoreError::io(&path, e)) {
            Err(e) if e.is_not_found() => Ok(()),
            res => res,
        }
    }

    fn staging_path(&self, name: &str) -> PathBuf {
        self.dir.join(format!(".{name}.{}.tmp", std::process::id()))
    }
}

/// Where a program was deployed and the data account created alongside it.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentRecord {
    #[serde(with = "base58")]
    pub program_id: Pubkey,
    #[serde(with = "base58")]
    pub account_id: Pubkey,
}

/// A program that was uploaded but has no data account yet.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PendingDeployment {
    #[serde(with = "base58")]
    pub program_id: Pubkey,
}

/// Serializes a [`Pubkey`] as its base58 string instead of a byte array.
mod base58 {
    use std::str::FromStr;

    use serde::{
        de::Error,
        Deserialize,
        Deserializer,
        Serializer,
    };
    use solana_sdk::pubkey::Pubkey;

    pub fn serialize<S: Serializer>(address: &Pubkey, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(address)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Pubkey, D::Error> {
        let s = String::deserialize(deserializer)?;
        Pubkey::from_str(&s).map_err(|e| D::Error::custom(format!("invalid address {s:?}: {e}")))
    }
}
