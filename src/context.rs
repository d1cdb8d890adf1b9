//! Bridge Context
//!
//! [`Context`] ties the bridge together for a host session: the
//! [`Settings`], the shared [`AssetCache`] and the [`RuleEngine`] that
//! produces geometry. Rule file descriptions of files on disk are kept in a
//! [`PackageCache`] until the file changes. Host nodes hold a reference to one context and own
//! their per-node state ([`Encoder`], [`EnumSynchronizer`]s) themselves.
//!
//! ```rust,ignore
//! let context = Context::new(settings, Arc::new(engine));
//! let registry = context.rule_attributes("rules/extrude.cgb")?;
//!
//! let mut encoder = context.encoder();
//! let encoded = context.generate(&mut encoder, &shapes, &mut target, &mut commands)?;
//! ```

use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use crate::assets::{AssetCache, CacheStatus, PackageCache};
use crate::encoder::{EncodedMesh, Encoder};
use crate::errors::{Error, Result};
use crate::host::{CommandExecutor, EnumAttribute, MeshTarget};
use crate::resources::{AttributeMap, Geometry};
use crate::rules::{EnumSynchronizer, EnumUpdate, RuleAttributeRegistry, RuleFileInfo};
use crate::settings::Settings;

/// A shape handed to the rule engine as the start of a derivation.
#[derive(Debug, Clone, Default)]
pub struct InitialShape {
    pub name: String,
    /// Flat `x, y, z` positions.
    pub vertices: Vec<f64>,
    /// Vertex count per face.
    pub face_counts: Vec<u32>,
    pub indices: Vec<u32>,
    pub rule_file: PathBuf,
    pub start_rule: String,
    pub random_seed: i32,
    /// Rule attribute overrides for this shape.
    pub attributes: AttributeMap,
}

/// The procedural rule engine.
pub trait RuleEngine: Send + Sync {
    /// Derives the leaf geometries of `shapes`. Textures referenced by the
    /// resulting materials are staged in `assets`.
    fn generate(&self, shapes: &[InitialShape], assets: &AssetCache) -> Result<Vec<Geometry>>;

    /// Describes the attributes and annotations of a compiled rule file.
    fn rule_file_info(&self, rule_file: &str) -> Result<RuleFileInfo>;

    /// Evaluates the current value of every rule attribute.
    fn evaluate_attributes(&self, shapes: &[InitialShape], inputs: &AttributeMap) -> Result<AttributeMap>;
}

/// Result of [`Context::sync_enums`].
#[derive(Debug, Default)]
pub struct EnumSyncReport {
    /// Host attribute name and outcome of every successful update.
    pub updates: Vec<(String, EnumUpdate)>,
    /// Host attribute name and error of every failed update.
    pub failures: Vec<(String, Error)>,
}

impl EnumSyncReport {
    #[must_use]
    pub fn changed(&self) -> usize {
        self.updates.iter().filter(|(_, u)| u.changed).count()
    }

    #[must_use]
    pub fn is_ok(&self) -> bool {
        self.failures.is_empty()
    }
}

pub struct Context {
    settings: Settings,
    assets: Arc<AssetCache>,
    engine: Arc<dyn RuleEngine>,
    rule_files: PackageCache<RuleFileInfo>,
}

impl Context {
    /// Creates a context with its own asset cache at `settings.cache_root`.
    pub fn new(settings: Settings, engine: Arc<dyn RuleEngine>) -> Self {
        let assets = Arc::new(AssetCache::new(settings.cache_root.clone()));
        Self::with_assets(settings, assets, engine)
    }

    /// Creates a context sharing an existing asset cache.
    pub fn with_assets(settings: Settings, assets: Arc<AssetCache>, engine: Arc<dyn RuleEngine>) -> Self {
        log::info!("Bridge context created, asset cache at {}", assets.root().display());
        Self {
            settings,
            assets,
            engine,
            rule_files: PackageCache::new(),
        }
    }

    #[inline]
    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[inline]
    #[must_use]
    pub fn assets(&self) -> &Arc<AssetCache> {
        &self.assets
    }

    #[inline]
    #[must_use]
    pub fn engine(&self) -> &Arc<dyn RuleEngine> {
        &self.engine
    }

    /// A fresh per-node encoder configured by the context settings.
    #[must_use]
    pub fn encoder(&self) -> Encoder {
        Encoder::new(&self.settings)
    }

    /// Runs the rule engine on `shapes` and encodes the result into `target`.
    pub fn generate<T, C>(
        &self,
        encoder: &mut Encoder,
        shapes: &[InitialShape],
        target: &mut T,
        commands: &mut C,
    ) -> Result<EncodedMesh<T::Mesh>>
    where
        T: MeshTarget,
        C: CommandExecutor + ?Sized,
    {
        let timer = Instant::now();
        let geometries = self.engine.generate(shapes, &self.assets)?;
        log::info!(
            "generate(): {} shapes -> {} geometries in {:.3} s",
            shapes.len(),
            geometries.len(),
            timer.elapsed().as_secs_f32()
        );
        encoder.encode(geometries, target, commands, Some(&self.assets))
    }

    /// Derives the rule attributes declared by `rule_file`.
    ///
    /// When `rule_file` names a file on disk its description is reused until
    /// the file's modification time changes. Other names (package URIs) go to
    /// the engine on every call.
    pub fn rule_attributes(&self, rule_file: &str) -> Result<RuleAttributeRegistry> {
        let path = Path::new(rule_file);
        let info = if path.is_file() {
            let (info, status) = self.rule_files.get(path, |_| self.engine.rule_file_info(rule_file))?;
            if status == CacheStatus::Hit {
                log::trace!("{rule_file}: rule file info reused");
            }
            info
        } else {
            Arc::new(self.engine.rule_file_info(rule_file)?)
        };
        let registry = RuleAttributeRegistry::from_rule_file_info(rule_file, &info);
        log::debug!("{rule_file}: {} rule attributes", registry.len());
        Ok(registry)
    }

    /// Evaluates the rule attributes of `shapes` once and updates every
    /// enum from the result.
    ///
    /// Each item pairs a synchronizer with its host attribute and the
    /// currently selected field index. A failing enum is reported in
    /// [`EnumSyncReport::failures`] and does not stop the others; only a
    /// failed evaluation aborts the call.
    pub fn sync_enums<'a, H, I>(
        &self,
        shapes: &[InitialShape],
        inputs: &AttributeMap,
        registry: &RuleAttributeRegistry,
        enums: I,
    ) -> Result<EnumSyncReport>
    where
        H: EnumAttribute + ?Sized + 'a,
        I: IntoIterator<Item = (&'a mut EnumSynchronizer, &'a mut H, i16)>,
    {
        let values = self.engine.evaluate_attributes(shapes, inputs)?;

        let mut report = EnumSyncReport::default();
        for (synchronizer, host, selected) in enums {
            let name = host.name().to_string();
            match synchronizer.update_options(host, registry, &values, selected) {
                Ok(update) => report.updates.push((name, update)),
                Err(e) => {
                    log::error!("Failed to update enum '{name}': {e}");
                    report.failures.push((name, e));
                }
            }
        }
        Ok(report)
    }
}

impl std::fmt::Debug for Context {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("settings", &self.settings)
            .field("assets", &self.assets)
            .field("rule_files", &self.rule_files.len())
            .finish_non_exhaustive()
    }
}
