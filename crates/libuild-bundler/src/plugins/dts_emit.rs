//! Rolldown plugin that emits TypeScript declaration files.
//!
//! ```text
//! TypeScript source → Rolldown (module graph) → DtsEmitPlugin (oxc isolated declarations)
//!                                                       ↓
//!                                     types/<name>.d.ts + types/<module>.d.ts
//! ```
//!
//! The plugin hooks `generate_bundle`, walks every TypeScript module in the
//! entry chunk and adds one `.d.ts` asset per module. The entry module is
//! written to the descriptor's entry filename; every other module keeps its
//! path relative to the entry's directory so relative imports still resolve.

use anyhow::{Context, Result};
use oxc_allocator::Allocator;
use oxc_codegen::Codegen;
use oxc_isolated_declarations::{IsolatedDeclarations, IsolatedDeclarationsOptions};
use oxc_parser::Parser;
use oxc_span::SourceType as OxcSourceType;
use rolldown_common::{Output, OutputAsset};
use rolldown_plugin::{HookGenerateBundleArgs, HookNoopReturn, Plugin, PluginContext};
use std::borrow::Cow;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Debug, Clone)]
pub struct DtsEmitPlugin {
    entry: PathBuf,
    entry_file_name: String,
    out_subdir: String,
}

impl DtsEmitPlugin {
    /// `entry_file_name` is relative to the output directory, e.g.
    /// `types/widget.d.ts`; sibling declarations land next to it.
    pub fn new(entry: PathBuf, entry_file_name: String) -> Self {
        let out_subdir = Path::new(&entry_file_name)
            .parent()
            .map(|p| p.to_string_lossy().replace('\\', "/"))
            .unwrap_or_default();
        Self {
            entry,
            entry_file_name,
            out_subdir,
        }
    }

    fn file_name_for(&self, module_id: &Path) -> Option<String> {
        if module_id == self.entry {
            return Some(self.entry_file_name.clone());
        }

        let entry_dir = self.entry.parent()?;
        let relative = module_id.strip_prefix(entry_dir).ok()?;
        let stem = relative.with_extension("");
        let stem = stem.to_string_lossy().replace('\\', "/");
        if self.out_subdir.is_empty() {
            Some(format!("{stem}.d.ts"))
        } else {
            Some(format!("{}/{stem}.d.ts", self.out_subdir))
        }
    }
}

impl Plugin for DtsEmitPlugin {
    fn name(&self) -> Cow<'static, str> {
        "libuild-dts-emit".into()
    }

    fn register_hook_usage(&self) -> rolldown_plugin::HookUsage {
        use rolldown_plugin::HookUsage;
        HookUsage::GenerateBundle
    }

    fn generate_bundle(
        &self,
        _ctx: &PluginContext,
        args: &mut HookGenerateBundleArgs<'_>,
    ) -> impl std::future::Future<Output = HookNoopReturn> + Send {
        let plugin = self.clone();

        async move {
            let mut dts_assets = Vec::new();
            let mut seen = HashSet::new();

            for output in args.bundle.iter() {
                let Output::Chunk(chunk) = output else {
                    continue;
                };

                for module_id in &chunk.modules.keys {
                    let module_path = Path::new(module_id.as_ref());
                    if !is_typescript_module(module_path) || !seen.insert(module_id.to_string())
                    {
                        continue;
                    }

                    let Some(filename) = plugin.file_name_for(module_path) else {
                        tracing::warn!(
                            module = %module_path.display(),
                            "module lies outside the entry directory, skipping declarations"
                        );
                        continue;
                    };

                    let source = std::fs::read_to_string(module_path).with_context(|| {
                        format!("failed to read {} for declarations", module_path.display())
                    })?;
                    let dts = generate_dts(&source, module_path)?;

                    dts_assets.push(Output::Asset(Arc::new(OutputAsset {
                        names: vec![],
                        original_file_names: vec![module_id.to_string()],
                        filename: filename.into(),
                        source: dts.into(),
                    })));
                }
            }

            args.bundle.extend(dts_assets);
            Ok(())
        }
    }
}

pub(crate) fn is_typescript_module(path: &Path) -> bool {
    let is_declaration = path
        .file_name()
        .and_then(|name| name.to_str())
        .is_some_and(|name| name.ends_with(".d.ts"));

    !is_declaration
        && path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| matches!(ext, "ts" | "tsx" | "mts" | "cts"))
}

/// Isolated declarations for one TypeScript source file.
pub fn generate_dts(source: &str, file_path: &Path) -> Result<String> {
    let allocator = Allocator::default();

    let source_type = OxcSourceType::from_path(file_path)
        .with_context(|| format!("Invalid TypeScript file: {}", file_path.display()))?;

    let parse_result = Parser::new(&allocator, source, source_type).parse();
    if !parse_result.errors.is_empty() {
        let messages: Vec<String> = parse_result
            .errors
            .iter()
            .map(|e| format!("{e:?}"))
            .collect();
        anyhow::bail!(
            "Failed to parse TypeScript file {}: {}",
            file_path.display(),
            messages.join(", ")
        );
    }

    let options = IsolatedDeclarationsOptions {
        strip_internal: true,
    };
    let dts_result = IsolatedDeclarations::new(&allocator, options).build(&parse_result.program);
    if !dts_result.errors.is_empty() {
        let messages: Vec<String> = dts_result
            .errors
            .iter()
            .map(|e| format!("{e:?}"))
            .collect();
        anyhow::bail!(
            "Errors generating declarations for {}: {}",
            file_path.display(),
            messages.join(", ")
        );
    }

    Ok(Codegen::new().build(&dts_result.program).code)
}
