// Runtime layer - orchestrates storage (index) and pure view logic (engine)
// into the configurator controller and the view resolution pipeline

mod cache;
mod catalog;
pub mod config;
mod configurator;
mod context;
mod error;
mod hook;
mod resolver;
mod workspace;

pub use cache::{ViewCache, ViewCacheKey};
pub use catalog::{Catalog, CatalogModel, ImportSummary};
pub use config::{CacheConfig, Config, resolve_workspace_path};
pub use configurator::{Configurator, parse_view_id};
pub use context::RequestContext;
pub use error::{Error, Result};
pub use hook::CustomViewHook;
pub use resolver::{CatalogViewResolver, ViewRequest, ViewResolver, ViewResult};
pub use workspace::ViewConf;
