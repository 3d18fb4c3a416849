//! Per-call and process-wide dialog configuration
//!
//! A [`DialogConfig`] travels with a single `open` call; a
//! [`ZeroDialogConfig`] is registered once at startup and read at every open.
//! The two merge into a [`ResolvedConfig`] via [`ResolvedConfig::normalize`],
//! after which configuration is immutable for the dialog's lifetime.

use std::time::Duration;

use serde_json::Value;

use crate::dialog::host::{default_host, HostFactory};

/// Opaque data bag passed to mounted content or the host component.
pub type DialogData = Value;

/// Per-open dialog configuration. All fields optional; defaults are merged in
/// by [`ResolvedConfig::normalize`].
#[derive(Clone, Default)]
pub struct DialogConfig {
    /// Close the dialog when a click lands on the backdrop. Default true.
    pub close_on_backdrop_click: Option<bool>,

    /// Host component wrapping the content. Defaults to the configured
    /// process-wide host, then to the built-in [`default_host`].
    pub host_component: Option<HostFactory>,

    /// Data bag injected into the host component.
    pub host_data: Option<DialogData>,

    /// Extra CSS class for the surface node.
    pub dialog_node_class: Option<String>,

    /// Data bag injected into the mounted content.
    pub dialog_data: Option<DialogData>,

    /// Animate reveal and close. Default true, overridable process-wide.
    pub animated: Option<bool>,
}

impl DialogConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn close_on_backdrop_click(mut self, close: bool) -> Self {
        self.close_on_backdrop_click = Some(close);
        self
    }

    pub fn with_host_component(mut self, host: HostFactory) -> Self {
        self.host_component = Some(host);
        self
    }

    pub fn with_host_data(mut self, data: DialogData) -> Self {
        self.host_data = Some(data);
        self
    }

    pub fn with_dialog_node_class(mut self, class: impl Into<String>) -> Self {
        self.dialog_node_class = Some(class.into());
        self
    }

    pub fn with_dialog_data(mut self, data: DialogData) -> Self {
        self.dialog_data = Some(data);
        self
    }

    pub fn animated(mut self, animated: bool) -> Self {
        self.animated = Some(animated);
        self
    }
}

/// Process-wide dialog configuration, registered once at startup and
/// read-only thereafter.
#[derive(Clone)]
pub struct ZeroDialogConfig {
    /// Id of the document element dialogs are appended under. Exactly one
    /// element with this id must exist in the document.
    pub container_node_id: String,

    /// Global animation override. When set it wins over per-call `animated`.
    pub enable_animations: Option<bool>,

    /// Host component used when an open call supplies none.
    pub default_host_component: Option<HostFactory>,

    /// Hardening against transition-end events that never arrive: when set,
    /// an animated close finalizes after this duration at the latest.
    /// Requires a tokio runtime. Off by default.
    pub close_fallback: Option<Duration>,
}

impl ZeroDialogConfig {
    pub fn new(container_node_id: impl Into<String>) -> Self {
        Self {
            container_node_id: container_node_id.into(),
            enable_animations: None,
            default_host_component: None,
            close_fallback: None,
        }
    }

    pub fn enable_animations(mut self, enabled: bool) -> Self {
        self.enable_animations = Some(enabled);
        self
    }

    pub fn with_default_host_component(mut self, host: HostFactory) -> Self {
        self.default_host_component = Some(host);
        self
    }

    pub fn with_close_fallback(mut self, fallback: Duration) -> Self {
        self.close_fallback = Some(fallback);
        self
    }
}

/// Fully-merged configuration for one dialog instance.
///
/// # Invariants
///
/// - `animated == global.enable_animations ?? per_call.animated ?? true`
/// - `close_on_backdrop_click == per_call ?? true`
/// - `host_component == per_call ?? global default ?? built-in default host`
#[derive(Clone)]
pub struct ResolvedConfig {
    pub close_on_backdrop_click: bool,
    pub host_component: HostFactory,
    pub host_data: DialogData,
    pub dialog_node_class: Option<String>,
    pub dialog_data: DialogData,
    pub animated: bool,
}

impl ResolvedConfig {
    /// Merge a per-call config with the process-wide defaults.
    pub fn normalize(global: &ZeroDialogConfig, config: Option<DialogConfig>) -> Self {
        let config = config.unwrap_or_default();
        Self {
            close_on_backdrop_click: config.close_on_backdrop_click.unwrap_or(true),
            host_component: config
                .host_component
                .or_else(|| global.default_host_component.clone())
                .unwrap_or_else(default_host),
            host_data: config.host_data.unwrap_or_else(|| Value::Object(Default::default())),
            dialog_node_class: config.dialog_node_class,
            dialog_data: config
                .dialog_data
                .unwrap_or_else(|| Value::Object(Default::default())),
            animated: global
                .enable_animations
                .or(config.animated)
                .unwrap_or(true),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn global() -> ZeroDialogConfig {
        ZeroDialogConfig::new("dialog-root")
    }

    #[test]
    fn animated_defaults_to_true() {
        let resolved = ResolvedConfig::normalize(&global(), None);
        assert!(resolved.animated);
    }

    #[test]
    fn per_call_animated_respected_without_override() {
        let resolved =
            ResolvedConfig::normalize(&global(), Some(DialogConfig::new().animated(false)));
        assert!(!resolved.animated);
    }

    #[test]
    fn global_animation_override_wins() {
        let global = global().enable_animations(false);
        let resolved =
            ResolvedConfig::normalize(&global, Some(DialogConfig::new().animated(true)));
        assert!(!resolved.animated);

        let global = ZeroDialogConfig::new("dialog-root").enable_animations(true);
        let resolved =
            ResolvedConfig::normalize(&global, Some(DialogConfig::new().animated(false)));
        assert!(resolved.animated);
    }

    #[test]
    fn backdrop_close_defaults_to_true() {
        let resolved = ResolvedConfig::normalize(&global(), None);
        assert!(resolved.close_on_backdrop_click);

        // An explicit false must stick; this is the `??` rule, not `||`.
        let resolved = ResolvedConfig::normalize(
            &global(),
            Some(DialogConfig::new().close_on_backdrop_click(false)),
        );
        assert!(!resolved.close_on_backdrop_click);
    }

    #[test]
    fn data_bags_default_to_empty_objects() {
        let resolved = ResolvedConfig::normalize(&global(), None);
        assert_eq!(resolved.dialog_data, json!({}));
        assert_eq!(resolved.host_data, json!({}));
    }

    #[test]
    fn dialog_data_passes_through_unchanged() {
        let data = json!({"name": "Ada", "nested": {"n": 1}});
        let resolved = ResolvedConfig::normalize(
            &global(),
            Some(DialogConfig::new().with_dialog_data(data.clone())),
        );
        assert_eq!(resolved.dialog_data, data);
    }
}
