//! Bridge configuration file parsing.

use std::fs;
use std::path::Path;

use serde::Deserialize;

use crate::envelope::{EnvelopeCodec, OperationKey};
use crate::error::{BridgeError, Result};
use crate::resolver::receiver::parse_target;

/// What the inbound dispatcher does when an invoked handler fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetErrorPolicy {
    /// Return the failure to the transport boundary.
    Propagate,
    /// Log it through the sink and reply with `null`.
    Recover,
}

impl Default for TargetErrorPolicy {
    fn default() -> Self {
        TargetErrorPolicy::Propagate
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct CodecConfig {
    /// Field name written for the operation on encode.
    pub operation_key: OperationKey,
    /// Whether decode also accepts the other operation key (`method` when
    /// writing `selector`, and the reverse). The configured key is always accepted.
    pub accept_method_alias: bool,
}

impl Default for CodecConfig {
    fn default() -> Self {
        CodecConfig {
            operation_key: OperationKey::Selector,
            accept_method_alias: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DispatchConfig {
    pub target_errors: TargetErrorPolicy,
    /// Warn when a fire-and-forget call returns a value and no callback asked for it.
    pub warn_unclaimed_results: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        DispatchConfig {
            target_errors: TargetErrorPolicy::Propagate,
            warn_unclaimed_results: true,
        }
    }
}

/// Complete bridge configuration.
///
/// Expected format (every key optional):
/// ```toml
/// callback_selector = "callDispatch"
/// builtin_namespace = "bridge"
/// install_console = true
///
/// [codec]
/// operation_key = "selector"
/// accept_method_alias = true
///
/// [dispatch]
/// target_errors = "propagate"
/// warn_unclaimed_results = true
/// ```
#[derive(Debug, Clone, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BridgeConfig {
    /// Root-level selector that runs a stored callback.
    pub callback_selector: String,
    /// Namespace holding `set`, `get` and the scheduler.
    pub builtin_namespace: String,
    pub install_console: bool,
    pub codec: CodecConfig,
    pub dispatch: DispatchConfig,
}

impl BridgeConfig {
    pub fn new() -> Self {
        BridgeConfig {
            callback_selector: "callDispatch".to_string(),
            builtin_namespace: "bridge".to_string(),
            install_console: true,
            codec: CodecConfig::default(),
            dispatch: DispatchConfig::default(),
        }
    }

    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path).map_err(|e| {
            BridgeError::Config(format!("Failed to read config file {}: {}", path.display(), e))
        })?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        let config: BridgeConfig =
            toml::from_str(content).map_err(|e| BridgeError::Config(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        let selector = parse_target(&self.callback_selector)
            .map_err(|e| BridgeError::Config(format!("callback_selector: {}", e)))?;
        if selector.len() != 1 {
            return Err(BridgeError::Config(format!(
                "callback_selector `{}` must be a single identifier",
                self.callback_selector
            )));
        }
        parse_target(&self.builtin_namespace)
            .map_err(|e| BridgeError::Config(format!("builtin_namespace: {}", e)))?;
        Ok(())
    }

    pub fn codec(&self) -> EnvelopeCodec {
        EnvelopeCodec::new(self.codec.operation_key, self.codec.accept_method_alias)
    }

    pub fn with_target_errors(mut self, policy: TargetErrorPolicy) -> Self {
        self.dispatch.target_errors = policy;
        self
    }

    pub fn with_operation_key(mut self, key: OperationKey) -> Self {
        self.codec.operation_key = key;
        self
    }

    pub fn with_method_alias(mut self, accept: bool) -> Self {
        self.codec.accept_method_alias = accept;
        self
    }
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::envelope::Envelope;
    use serde_json::json;

    #[test]
    fn test_parse_empty_config() {
        let config = BridgeConfig::parse("").unwrap();
        assert_eq!(config.callback_selector, "callDispatch");
        assert_eq!(config.builtin_namespace, "bridge");
        assert!(config.install_console);
        assert_eq!(config.codec.operation_key, OperationKey::Selector);
        assert_eq!(config.dispatch.target_errors, TargetErrorPolicy::Propagate);
    }

    #[test]
    fn test_parse_sections() {
        let config = BridgeConfig::parse(
            r#"
            builtin_namespace = "V8D"
            install_console = false

            [codec]
            operation_key = "method"
            accept_method_alias = false

            [dispatch]
            target_errors = "recover"
            "#,
        )
        .unwrap();
        assert_eq!(config.builtin_namespace, "V8D");
        assert!(!config.install_console);
        assert_eq!(config.codec.operation_key, OperationKey::Method);
        assert!(!config.codec.accept_method_alias);
        assert_eq!(config.dispatch.target_errors, TargetErrorPolicy::Recover);
        assert!(config.dispatch.warn_unclaimed_results);
    }

    #[test]
    fn test_method_codec_reads_its_own_output() {
        let config =
            BridgeConfig::parse("[codec]\noperation_key = \"method\"\naccept_method_alias = false\n").unwrap();
        let codec = config.codec();
        let envelope = Envelope::new("a.b", "x", vec![json!(1)]);
        let text = codec.encode(&envelope).unwrap();
        assert_eq!(text, r#"{"receiver":"a.b","method":"x","args":[1]}"#);
        assert_eq!(codec.decode(&text).unwrap(), envelope);
    }

    #[test]
    fn test_reject_unknown_policy() {
        let result = BridgeConfig::parse("[dispatch]\ntarget_errors = \"ignore\"\n");
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }

    #[test]
    fn test_reject_dotted_callback_selector() {
        let result = BridgeConfig::parse("callback_selector = \"a.b\"\n");
        assert!(matches!(result, Err(BridgeError::Config(_))));
    }
}
