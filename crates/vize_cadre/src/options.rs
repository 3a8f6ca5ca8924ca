//! Plugin configuration.
//!
//! Options can be built in code or read from the `cadre` section of
//! `vize.config.json`.

use std::fmt;
use std::path::Path;

use serde::de::{MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};

/// Name of the config file read by [`load_options`].
pub const CONFIG_FILE_NAME: &str = "vize.config.json";

/// Options accepted by the Vue plugin.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VuePluginOptions {
    /// Generate source maps even when the host does not ask for them.
    #[serde(default)]
    pub source_map: bool,

    /// Production mode. When unset, `NODE_ENV == "production"` decides.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_production: Option<bool>,

    /// Template compiler settings.
    #[serde(default)]
    pub template: TemplateOptions,

    /// Style compiler settings.
    #[serde(default)]
    pub style: StyleOptions,

    /// Memoize parsed descriptors by file content.
    #[serde(default)]
    pub cache_descriptors: bool,
}

/// Template compiler settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplateOptions {
    /// Extra compiler options, merged over the plugin's own (user keys win).
    #[serde(default)]
    pub compiler_options: serde_json::Map<String, serde_json::Value>,
}

/// Style compiler settings.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleOptions {
    /// Preprocessor used for `<style>` blocks without a `lang` attribute.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preprocess_lang: Option<String>,
}

impl VuePluginOptions {
    /// Resolve the production flag, consulting `NODE_ENV` when unset.
    pub fn is_production(&self) -> bool {
        self.is_production
            .unwrap_or_else(|| std::env::var("NODE_ENV").is_ok_and(|env| env == "production"))
    }
}

/// A single prefix substitution.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct AliasRule {
    pub find: String,
    pub replacement: String,
}

impl AliasRule {
    pub fn new(find: impl Into<String>, replacement: impl Into<String>) -> Self {
        Self {
            find: find.into(),
            replacement: replacement.into(),
        }
    }
}

/// Ordered alias rules; the first match wins.
///
/// Deserializes from an array of `{ "find", "replacement" }` objects or from an
/// object mapping prefixes to replacements, keeping key order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct AliasRules(Vec<AliasRule>);

impl AliasRules {
    pub fn new(rules: Vec<AliasRule>) -> Self {
        Self(rules)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, AliasRule> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl FromIterator<AliasRule> for AliasRules {
    fn from_iter<I: IntoIterator<Item = AliasRule>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a AliasRules {
    type Item = &'a AliasRule;
    type IntoIter = std::slice::Iter<'a, AliasRule>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<'de> Deserialize<'de> for AliasRules {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct AliasVisitor;

        impl<'de> Visitor<'de> for AliasVisitor {
            type Value = AliasRules;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("an array of alias rules or an object of prefix replacements")
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Self::Value, A::Error> {
                let mut rules = Vec::with_capacity(seq.size_hint().unwrap_or(0));
                while let Some(rule) = seq.next_element::<AliasRule>()? {
                    rules.push(rule);
                }
                Ok(AliasRules(rules))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Self::Value, A::Error> {
                let mut rules = Vec::with_capacity(map.size_hint().unwrap_or(0));
                while let Some((find, replacement)) = map.next_entry::<String, String>()? {
                    rules.push(AliasRule { find, replacement });
                }
                Ok(AliasRules(rules))
            }
        }

        deserializer.deserialize_any(AliasVisitor)
    }
}

#[derive(Debug, Default, Deserialize)]
struct ConfigFile {
    #[serde(default)]
    cadre: VuePluginOptions,
}

/// Load plugin options from `vize.config.json` in the given directory (or CWD if None).
///
/// A missing file yields defaults silently; an unreadable or malformed file
/// yields defaults with a warning.
pub fn load_options(dir: Option<&Path>) -> VuePluginOptions {
    let base = dir
        .map(|d| d.to_path_buf())
        .unwrap_or_else(|| std::env::current_dir().unwrap_or_default());
    let config_path = base.join(CONFIG_FILE_NAME);

    if !config_path.exists() {
        return VuePluginOptions::default();
    }

    match std::fs::read_to_string(&config_path) {
        Ok(content) => match serde_json::from_str::<ConfigFile>(&content) {
            Ok(config) => config.cadre,
            Err(e) => {
                tracing::warn!("failed to parse {}: {}", config_path.display(), e);
                VuePluginOptions::default()
            }
        },
        Err(e) => {
            tracing::warn!("failed to read {}: {}", config_path.display(), e);
            VuePluginOptions::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_alias_rules_from_array() {
        let json = r#"[{ "find": "@", "replacement": "./src" }, { "find": "~", "replacement": "lib" }]"#;
        let rules: AliasRules = serde_json::from_str(json).unwrap();
        assert_eq!(
            rules,
            AliasRules::new(vec![AliasRule::new("@", "./src"), AliasRule::new("~", "lib")])
        );
    }

    #[test]
    fn test_alias_rules_from_object_keep_order() {
        let json = r##"{ "@ui": "/pkg/ui", "@": "/src", "#lib": "lib" }"##;
        let rules: AliasRules = serde_json::from_str(json).unwrap();
        let finds: Vec<_> = rules.iter().map(|r| r.find.as_str()).collect();
        assert_eq!(finds, ["@ui", "@", "#lib"]);
    }

    #[test]
    fn test_options_camel_case() {
        let json = r#"{
            "sourceMap": true,
            "isProduction": false,
            "template": { "compilerOptions": { "whitespace": "preserve" } },
            "style": { "preprocessLang": "scss" }
        }"#;
        let options: VuePluginOptions = serde_json::from_str(json).unwrap();
        assert!(options.source_map);
        assert!(!options.is_production());
        assert_eq!(
            options.template.compiler_options["whitespace"],
            serde_json::json!("preserve")
        );
        assert_eq!(options.style.preprocess_lang.as_deref(), Some("scss"));
        assert!(!options.cache_descriptors);
    }

    #[test]
    fn test_load_options_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let options = load_options(Some(dir.path()));
        assert!(!options.source_map);
        assert!(options.is_production.is_none());
    }

    #[test]
    fn test_load_options_reads_cadre_section() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(CONFIG_FILE_NAME),
            r#"{ "cadre": { "sourceMap": true, "cacheDescriptors": true } }"#,
        )
        .unwrap();
        let options = load_options(Some(dir.path()));
        assert!(options.source_map);
        assert!(options.cache_descriptors);
    }

    #[test]
    fn test_load_options_malformed_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join(CONFIG_FILE_NAME), "{ not json").unwrap();
        let options = load_options(Some(dir.path()));
        assert!(!options.source_map);
    }
}
