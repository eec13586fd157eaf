//! Key generation and single-value encryption.

use anyhow::{Context, Result};
use menu_filters::{FieldCipher, FilterConfig};

use crate::output;

pub(crate) fn keygen() -> Result<()> {
    output::plain(FieldCipher::generate_key());
    output::hint("Store it as `encryption-key` in .menu-filters.toml or as ENCRYPTION_KEY.");
    output::warning("Tokens issued under the old key stop decrypting once the key changes.");
    Ok(())
}

pub(crate) fn encrypt(config: &FilterConfig, value: &str) -> Result<()> {
    let cipher = config.cipher()?;
    let token = cipher.encrypt(value).context("encryption failed")?;
    output::plain(token);
    Ok(())
}

pub(crate) fn decrypt(config: &FilterConfig, token: &str) -> Result<()> {
    let cipher = config.cipher()?;
    let plaintext = cipher.decrypt(token).context("could not decrypt token")?;
    output::plain(plaintext);
    Ok(())
}
