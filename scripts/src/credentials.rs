//! Loading of the signing account for a run

use std::{
    env,
    path::{Path, PathBuf},
    str::FromStr,
};

use alloy::signers::local::PrivateKeySigner;
use tracing::info;

use crate::{
    constants::{DEFAULT_KEYSTORE_SUBDIR, DEVELOPMENT_PRIVATE_KEY, KEYSTORE_EXTENSION},
    errors::ScriptError,
    utils::prompt_for_input,
};

/// Where the signing account of a run comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum CredentialSource {
    /// The first pre-funded account of a development node
    Ephemeral,
    /// An encrypted keystore stored locally under the given alias
    Keystore {
        /// The alias the keystore file is stored under
        alias: String,
    },
}

impl CredentialSource {
    /// Load the signer for this credential.
    ///
    /// Keystores are decrypted with `password` if given, otherwise the operator
    /// is prompted for the passphrase.
    pub fn load_signer(
        &self,
        keystore_dir: &Path,
        password: Option<&str>,
    ) -> Result<PrivateKeySigner, ScriptError> {
        match self {
            CredentialSource::Ephemeral => PrivateKeySigner::from_str(DEVELOPMENT_PRIVATE_KEY)
                .map_err(|e| ScriptError::Credential(e.to_string())),
            CredentialSource::Keystore { alias } => {
                let path = find_keystore(keystore_dir, alias)?;
                info!("Unlocking account `{}` from {}", alias, path.display());

                let password = match password {
                    Some(password) => password.to_string(),
                    None => prompt_for_input(&format!("Passphrase for account `{alias}`"))?,
                };

                PrivateKeySigner::decrypt_keystore(&path, password)
                    .map_err(|e| ScriptError::Credential(format!("{}: {}", path.display(), e)))
            }
        }
    }
}

/// The default directory holding encrypted keystores
pub fn default_keystore_dir() -> PathBuf {
    env::var_os("HOME")
        .map(PathBuf::from)
        .unwrap_or_default()
        .join(DEFAULT_KEYSTORE_SUBDIR)
}

/// Find the keystore file for an alias, with or without a `.json` extension
fn find_keystore(keystore_dir: &Path, alias: &str) -> Result<PathBuf, ScriptError> {
    let bare = keystore_dir.join(alias);
    let with_ext = keystore_dir.join(format!("{alias}.{KEYSTORE_EXTENSION}"));

    [bare, with_ext]
        .into_iter()
        .find(|path| path.is_file())
        .ok_or_else(|| {
            ScriptError::Credential(format!(
                "no keystore for account `{}` in {}",
                alias,
                keystore_dir.display()
            ))
        })
}
