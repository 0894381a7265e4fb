use std::sync::Arc;
use viewconf_engine::collect_fields;
use viewconf_types::{CUSTOMIZATION_MODEL, ViewType};

use crate::{
    Configurator, RequestContext, Result, ViewCache, ViewCacheKey, ViewRequest, ViewResolver,
    ViewResult,
};

/// Substitutes a customized tree arch for the view `inner` resolves.
///
/// Requests that do not resolve to a tree view pass straight through, as do
/// requests with `avoid_custom_view` and views of the customization model.
/// A request without type or view id resolves to a form.
pub struct CustomViewHook<R> {
    inner: R,
    configurator: Arc<Configurator>,
    cache: Arc<ViewCache>,
}

impl<R: ViewResolver> CustomViewHook<R> {
    pub fn new(inner: R, configurator: Arc<Configurator>, cache: Arc<ViewCache>) -> Self {
        Self {
            inner,
            configurator,
            cache,
        }
    }

    fn bypass(ctx: &RequestContext, model: &str) -> bool {
        ctx.avoid_custom_view || model == CUSTOMIZATION_MODEL
    }

    // The type the inner resolver will answer with; `None` for an unknown view
    fn effective_view_type(&self, request: &ViewRequest) -> Result<Option<ViewType>> {
        match (request.view_type, request.view_id) {
            (Some(view_type), _) => Ok(Some(view_type)),
            (None, Some(view_id)) => Ok(self
                .configurator
                .database()
                .get_view(view_id)?
                .map(|view| view.view_type)),
            (None, None) => Ok(Some(ViewType::Form)),
        }
    }
}

impl<R: ViewResolver> ViewResolver for CustomViewHook<R> {
    fn fields_view_get(
        &self,
        ctx: &RequestContext,
        model: &str,
        request: &ViewRequest,
    ) -> Result<ViewResult> {
        if Self::bypass(ctx, model)
            || self.effective_view_type(request)? != Some(ViewType::Tree)
        {
            return self.inner.fields_view_get(ctx, model, request);
        }

        let Some(customization) = self.configurator.lookup(ctx, model, request.view_id)? else {
            return self.inner.fields_view_get(ctx, model, request);
        };
        // Column preferences only apply on a base view
        let key = ViewCacheKey {
            model: model.to_string(),
            customization: customization.id,
            user: customization.view.and(ctx.user),
            level: request.level_for(ViewType::Tree),
        };
        if let Some(cached) = self.cache.get(&key) {
            return Ok(cached);
        }

        let mut result = self.inner.fields_view_get(ctx, model, request)?;
        if result.view_type != ViewType::Tree {
            return Ok(result);
        }

        let arch = self.configurator.generate_arch(ctx, customization.id)?;
        let fields = self
            .configurator
            .database()
            .list_fields(customization.model)?;
        result.fields = collect_fields(&arch, &fields, key.level)?;
        result.arch = arch;

        tracing::debug!(
            model,
            customization = %customization.id,
            "rendered customized view"
        );
        self.cache.put(key, result.clone());
        Ok(result)
    }
}
