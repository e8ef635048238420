use std::sync::Arc;
use log::info;
use crate::config::Config;
use crate::engine::{vault, MemStorage, Mirror, Persistence, VaultStorage};
use crate::{Result, Storage};

/// Opens the durable storage described by `config` and returns a [`Mirror`]
/// over its namespace.
///
/// Data already on disk is loaded before this returns, so a store built on the
/// mirror can rehydrate immediately. When a vault key is configured, every
/// value is encrypted at rest.
///
/// # Examples
///
/// ```no_run
/// use shopfront_store::{config::Config, engine, store::Store};
///
/// fn main() -> anyhow::Result<()> {
///     let mirror = engine::open(&Config::from_env())?;
///     let store = Store::builder().mirror(mirror).build();
///     println!("{} items in cart", store.select(|s| s.cart.item_count()));
///     Ok(())
/// }
/// ```
pub fn open(config: &Config) -> Result<Mirror> {
    let persistence = Arc::new(Persistence::new(&config.data_dir)?);
    let initial_data = persistence.load_all()?;
    info!(
        "Opened storage at {:?} ({} namespaces on disk)",
        persistence.data_dir(),
        initial_data.len()
    );

    let mut storage: Arc<dyn Storage> = Arc::new(MemStorage::new(initial_data, Some(persistence)));
    if let Some(key_hex) = &config.vault_key {
        let key = vault::parse_key(key_hex)?;
        storage = Arc::new(VaultStorage::new(storage, &key)?);
        info!("Vault encryption enabled");
    }

    Ok(Mirror::new(storage, config.namespace.clone()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn config(dir: &std::path::Path, vault_key: Option<String>) -> Config {
        Config {
            data_dir: dir.to_path_buf(),
            namespace: "shop".to_string(),
            vault_key,
        }
    }

    #[test]
    fn test_open_reloads_previous_writes() {
        let dir = tempdir().unwrap();
        open(&config(dir.path(), None)).unwrap().save("darkMode", &true);

        let reopened = open(&config(dir.path(), None)).unwrap();
        assert!(reopened.load("darkMode", false));
    }

    #[test]
    fn test_open_with_vault() {
        let dir = tempdir().unwrap();
        let key = Some("11".repeat(32));
        open(&config(dir.path(), key.clone())).unwrap().save("likedProducts", &vec![3u64]);

        let reopened = open(&config(dir.path(), key)).unwrap();
        assert_eq!(reopened.load("likedProducts", Vec::<u64>::new()), vec![3]);

        // Without the key the sealed value is unreadable and falls back.
        let plain = open(&config(dir.path(), None)).unwrap();
        assert!(plain.load("likedProducts", Vec::<u64>::new()).is_empty());
    }

    #[test]
    fn test_open_with_bad_vault_key() {
        let dir = tempdir().unwrap();
        assert!(open(&config(dir.path(), Some("zz".to_string()))).is_err());
    }
}
