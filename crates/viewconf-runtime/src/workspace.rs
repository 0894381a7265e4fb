use std::path::{Path, PathBuf};
use std::sync::Arc;
use viewconf_index::Database;

use crate::{
    Catalog, CatalogViewResolver, Config, Configurator, CustomViewHook, ImportSummary, Result,
    ViewCache,
};

/// Everything one data directory holds, wired together.
pub struct ViewConf {
    db: Arc<Database>,
    data_dir: PathBuf,
    config: Config,
    cache: Arc<ViewCache>,
    configurator: Arc<Configurator>,
    views: CustomViewHook<CatalogViewResolver>,
}

impl ViewConf {
    /// Opens (creating if needed) the database named by `<data_dir>/config.toml`.
    pub fn open(data_dir: impl Into<PathBuf>) -> Result<Self> {
        let data_dir = data_dir.into();
        let config = Config::load_from(&data_dir.join("config.toml"))?;
        let db = Database::open(&config.database_path(&data_dir))?;
        Ok(Self::assemble(db, data_dir, config))
    }

    /// Workspace over an in-memory database; nothing touches the disk.
    pub fn in_memory(config: Config) -> Result<Self> {
        let db = Database::open_in_memory()?;
        Ok(Self::assemble(db, PathBuf::new(), config))
    }

    fn assemble(db: Database, data_dir: PathBuf, config: Config) -> Self {
        #[allow(clippy::arc_with_non_send_sync)]
        let db = Arc::new(db);
        let cache = Arc::new(if config.cache.enabled {
            ViewCache::new()
        } else {
            ViewCache::disabled()
        });

        let defaults = CatalogViewResolver::new(db.clone());
        let configurator = Arc::new(Configurator::new(
            db.clone(),
            cache.clone(),
            Arc::new(defaults.clone()),
        ));
        let views = CustomViewHook::new(defaults, configurator.clone(), cache.clone());

        Self {
            db,
            data_dir,
            config,
            cache,
            configurator,
            views,
        }
    }

    pub fn database(&self) -> &Database {
        &self.db
    }

    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn cache(&self) -> &ViewCache {
        &self.cache
    }

    pub fn configurator(&self) -> &Configurator {
        &self.configurator
    }

    /// View resolution with customizations applied.
    pub fn views(&self) -> &CustomViewHook<CatalogViewResolver> {
        &self.views
    }

    pub fn import_catalog(&self, catalog: &Catalog) -> Result<ImportSummary> {
        let summary = catalog.import_into(&self.db)?;
        // Default views may have changed under existing customizations
        self.cache.invalidate_all();
        Ok(summary)
    }
}
