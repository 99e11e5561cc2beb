//! Building shadow routers from a configuration document.
//!
//! Two construction paths: [`make_shadow_route`] materializes each target
//! node from its inline definition through a [`RouteNodeProvider`];
//! [`make_shadow_route_with_children`] takes pre-built child nodes, one per
//! shadow target spec, in order.
//!
//! Per-destination problems (missing target, missing or invalid settings,
//! unknown settings name) degrade: the destination keeps a null half, a
//! diagnostic goes to the invalid-config channel, and routing skips it.

use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use crate::config::schema::{SettingsRef, ShadowRouteConfig, ShadowTargetConfig};
use crate::error::ConfigError;
use crate::observability::failure::{self, Category};
use crate::request::Request;
use crate::routing::node::RouteHandle;
use crate::routing::policy::DefaultShadowPolicy;
use crate::routing::settings::ShadowSettings;
use crate::routing::shadow::{ShadowDestination, ShadowRoute};

/// Materializes route nodes referenced inline by a configuration document.
pub trait RouteNodeProvider<R: Request>: Send + Sync {
    fn make(&self, definition: &Value) -> Result<RouteHandle<R>, ConfigError>;
}

/// Named sampling settings shared between the factory, routers, and the
/// external reload actor.
#[derive(Default)]
pub struct SettingsRegistry {
    settings: DashMap<String, Arc<ShadowSettings>>,
}

impl SettingsRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&self, name: impl Into<String>, settings: Arc<ShadowSettings>) {
        self.settings.insert(name.into(), settings);
    }

    pub fn get(&self, name: &str) -> Option<Arc<ShadowSettings>> {
        self.settings.get(name).map(|entry| entry.value().clone())
    }
}

/// Build a shadow router over `normal`, materializing each shadow target
/// node through `provider`.
pub fn make_shadow_route<R: Request>(
    document: &Value,
    normal: RouteHandle<R>,
    provider: &dyn RouteNodeProvider<R>,
    registry: &SettingsRegistry,
) -> Result<RouteHandle<R>, ConfigError> {
    let config: ShadowRouteConfig = serde_json::from_value(document.clone())?;
    let destinations = config
        .shadows
        .iter()
        .map(|target| {
            let node = match &target.target {
                Some(definition) => match provider.make(definition) {
                    Ok(node) => Some(node),
                    Err(err) => {
                        failure::log(
                            Category::InvalidConfig,
                            &format!("shadow target could not be built: {err}"),
                        );
                        None
                    }
                },
                None => {
                    failure::log(Category::InvalidConfig, "shadow target has no destination");
                    None
                }
            };
            build_destination(target, node, registry)
        })
        .collect();
    finish(normal, destinations, &config)
}

/// Build a shadow router over `normal` from pre-built child nodes. The
/// `children` sequence lines up positionally with the document's shadow
/// target specs; a missing child degrades that destination.
pub fn make_shadow_route_with_children<R: Request>(
    document: &Value,
    normal: RouteHandle<R>,
    children: Vec<RouteHandle<R>>,
    registry: &SettingsRegistry,
) -> Result<RouteHandle<R>, ConfigError> {
    let config: ShadowRouteConfig = serde_json::from_value(document.clone())?;
    if children.len() > config.shadows.len() {
        failure::log(
            Category::InvalidConfig,
            "more shadow children than shadow target specs; extras ignored",
        );
    }
    let mut children = children.into_iter();
    let destinations = config
        .shadows
        .iter()
        .map(|target| {
            let node = children.next();
            if node.is_none() {
                failure::log(Category::InvalidConfig, "shadow target has no destination");
            }
            build_destination(target, node, registry)
        })
        .collect();
    finish(normal, destinations, &config)
}

fn build_destination<R: Request>(
    target: &ShadowTargetConfig,
    node: Option<RouteHandle<R>>,
    registry: &SettingsRegistry,
) -> ShadowDestination<R> {
    ShadowDestination {
        node,
        settings: resolve_settings(target.settings.as_ref(), registry),
    }
}

fn resolve_settings(
    reference: Option<&SettingsRef>,
    registry: &SettingsRegistry,
) -> Option<Arc<ShadowSettings>> {
    match reference {
        None => {
            failure::log(
                Category::InvalidConfig,
                "shadow target has no sampling settings",
            );
            None
        }
        Some(SettingsRef::Named(name)) => {
            let settings = registry.get(name);
            if settings.is_none() {
                failure::log(
                    Category::InvalidConfig,
                    &format!("unknown sampling settings '{name}'"),
                );
            }
            settings
        }
        Some(SettingsRef::Inline(config)) => match ShadowSettings::from_config(config) {
            Ok(settings) => Some(settings),
            Err(errors) => {
                for error in &errors {
                    failure::log(
                        Category::InvalidConfig,
                        &format!("invalid sampling settings: {error}"),
                    );
                }
                None
            }
        },
    }
}

fn finish<R: Request>(
    normal: RouteHandle<R>,
    destinations: Vec<ShadowDestination<R>>,
    config: &ShadowRouteConfig,
) -> Result<RouteHandle<R>, ConfigError> {
    if let Some(policy) = config.policy.as_deref() {
        if policy != "default" {
            failure::log(
                Category::InvalidConfig,
                &format!("unknown shadow policy '{policy}', using default"),
            );
        }
    }
    Ok(Arc::new(ShadowRoute::new(
        normal,
        destinations,
        DefaultShadowPolicy,
    )))
}
