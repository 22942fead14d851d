//! Marks configured dependencies (and their subpaths) as external.

use libuild_config::ExternalPredicate;
use rolldown_plugin::{HookResolveIdArgs, HookResolveIdOutput, HookResolveIdReturn, Plugin, PluginContext};
use std::borrow::Cow;
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct ExternalPlugin {
    predicate: Arc<ExternalPredicate>,
}

impl ExternalPlugin {
    pub fn new(patterns: Vec<String>) -> Self {
        Self {
            predicate: Arc::new(ExternalPredicate::new(patterns)),
        }
    }
}

impl Plugin for ExternalPlugin {
    fn name(&self) -> Cow<'static, str> {
        "libuild-external".into()
    }

    fn register_hook_usage(&self) -> rolldown_plugin::HookUsage {
        use rolldown_plugin::HookUsage;
        HookUsage::ResolveId
    }

    fn resolve_id(
        &self,
        _ctx: &PluginContext,
        args: &HookResolveIdArgs<'_>,
    ) -> impl std::future::Future<Output = HookResolveIdReturn> + Send {
        let specifier = args.specifier.to_string();
        let predicate = Arc::clone(&self.predicate);

        async move {
            if predicate.is_external(&specifier) {
                Ok(Some(HookResolveIdOutput {
                    id: specifier.into(),
                    external: Some(true.into()),
                    ..Default::default()
                }))
            } else {
                Ok(None)
            }
        }
    }
}
