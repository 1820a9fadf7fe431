//! Document configuration.
//!
//! Every field is optional. [`DocumentOptions`] deserializes from the JSON a
//! host would keep next to its build output, including the legacy field names
//! (`script`, `style`, `static`, `visualWebsiteOptimizer`, `clippyChatTimeout`).
//!
//! A field holding a value of the wrong shape falls back to its default
//! instead of failing the whole configuration. Flags and timeouts follow
//! JavaScript truthiness, so `1` enables and `"100"` is a timeout of 100.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Deserializer};

use crate::error::{DocumentError, Result};
use crate::markup::{Attributes, Node};
use crate::serialize::is_truthy;
use crate::snippets::DEFAULT_EXPERIMENT_ACCOUNT_ID;

/// Script loaded when none is configured.
pub const DEFAULT_SCRIPT: &str = "index.js";

/// Stylesheet loaded when none is configured.
pub const DEFAULT_STYLE: &str = "index.css";

/// Favicon linked when none is configured.
pub const DEFAULT_FAVICON: &str = "https://www.nib.com.au/favicon.ico";

/// One asset or an ordered list of assets.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AssetList {
    One(String),
    Many(Vec<String>),
}

impl AssetList {
    pub fn into_vec(self) -> Vec<String> {
        match self {
            Self::One(asset) => vec![asset],
            Self::Many(assets) => assets,
        }
    }
}

impl From<&str> for AssetList {
    fn from(asset: &str) -> Self {
        Self::One(asset.to_string())
    }
}

impl From<Vec<&str>> for AssetList {
    fn from(assets: Vec<&str>) -> Self {
        Self::Many(assets.into_iter().map(String::from).collect())
    }
}

/// Experiment account id, numeric or textual, rendered verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum AccountId {
    Numeric(u64),
    Named(String),
}

impl fmt::Display for AccountId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(id) => write!(f, "{id}"),
            Self::Named(id) => f.write_str(id),
        }
    }
}

/// A/B testing configuration: `true`/`false` or `{ "accountId": .. }`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExperimentOption {
    Enabled(bool),
    Account { account_id: Option<AccountId> },
}

impl<'de> Deserialize<'de> for ExperimentOption {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        Ok(match serde_json::Value::deserialize(deserializer)? {
            serde_json::Value::Object(mut fields) => Self::Account {
                account_id: fields
                    .remove("accountId")
                    .and_then(|id| serde_json::from_value(id).ok()),
            },
            other => Self::Enabled(is_truthy(&other)),
        })
    }
}

impl ExperimentOption {
    /// The account to embed, or `None` when experiments are disabled.
    pub fn account_id(&self) -> Option<String> {
        match self {
            Self::Enabled(false) => None,
            Self::Enabled(true) | Self::Account { account_id: None } => {
                Some(DEFAULT_EXPERIMENT_ACCOUNT_ID.to_string())
            }
            Self::Account {
                account_id: Some(AccountId::Named(id)),
            } if id.is_empty() => Some(DEFAULT_EXPERIMENT_ACCOUNT_ID.to_string()),
            Self::Account {
                account_id: Some(AccountId::Numeric(0)),
            } => Some(DEFAULT_EXPERIMENT_ACCOUNT_ID.to_string()),
            Self::Account {
                account_id: Some(id),
            } => Some(id.to_string()),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Analytics {
    pub tag_manager_id: Option<String>,
}

/// Configuration captured once by the document factory.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct DocumentOptions {
    #[serde(deserialize_with = "lenient::or_default")]
    pub title: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub description: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub canonical: Option<String>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub favicon: Option<String>,
    #[serde(alias = "script", deserialize_with = "lenient::or_default")]
    pub scripts: Option<AssetList>,
    #[serde(alias = "style", deserialize_with = "lenient::or_default")]
    pub styles: Option<AssetList>,
    #[serde(alias = "static", deserialize_with = "lenient::truthy")]
    pub static_markup: bool,
    #[serde(deserialize_with = "lenient::or_default")]
    pub analytics: Option<Analytics>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub google_tag_manager_id: Option<String>,
    #[serde(alias = "visualWebsiteOptimizer")]
    pub experiment: Option<ExperimentOption>,
    #[serde(alias = "clippyChatTimeout", deserialize_with = "lenient::timeout")]
    pub support_chat: Option<u64>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub google_fonts: Option<String>,
    #[serde(alias = "revManifestPath", deserialize_with = "lenient::or_default")]
    pub asset_revision_manifest_path: Option<PathBuf>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub html_attributes: Attributes,
    #[serde(deserialize_with = "lenient::or_default")]
    pub head_components: Vec<Node>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub body_attributes: Attributes,
    #[serde(deserialize_with = "lenient::or_default")]
    pub pre_body_components: Vec<Node>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub post_body_components: Vec<Node>,
    #[serde(deserialize_with = "lenient::or_default")]
    pub body: Option<String>,
    #[serde(deserialize_with = "lenient::truthy")]
    pub use_alternate_body: bool,
    pub config: Option<serde_json::Value>,
    #[serde(deserialize_with = "lenient::truthy_unless_null")]
    pub collect_styles: bool,
}

impl Default for DocumentOptions {
    fn default() -> Self {
        Self {
            title: None,
            description: None,
            canonical: None,
            favicon: None,
            scripts: None,
            styles: None,
            static_markup: false,
            analytics: None,
            google_tag_manager_id: None,
            experiment: None,
            support_chat: None,
            google_fonts: None,
            asset_revision_manifest_path: None,
            html_attributes: Attributes::new(),
            head_components: Vec::new(),
            body_attributes: Attributes::new(),
            pre_body_components: Vec::new(),
            post_body_components: Vec::new(),
            body: None,
            use_alternate_body: false,
            config: None,
            collect_styles: true,
        }
    }
}

impl DocumentOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from a JSON configuration.
    ///
    /// Only text that is not a JSON object is an error; mistyped fields
    /// fall back to their defaults.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| DocumentError::Serialization(e.to_string()))
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn canonical(mut self, canonical: impl Into<String>) -> Self {
        self.canonical = Some(canonical.into());
        self
    }

    pub fn favicon(mut self, favicon: impl Into<String>) -> Self {
        self.favicon = Some(favicon.into());
        self
    }

    pub fn scripts(mut self, scripts: impl Into<AssetList>) -> Self {
        self.scripts = Some(scripts.into());
        self
    }

    pub fn styles(mut self, styles: impl Into<AssetList>) -> Self {
        self.styles = Some(styles.into());
        self
    }

    pub fn static_markup(mut self, enabled: bool) -> Self {
        self.static_markup = enabled;
        self
    }

    pub fn tag_manager(mut self, id: impl Into<String>) -> Self {
        self.analytics = Some(Analytics {
            tag_manager_id: Some(id.into()),
        });
        self
    }

    pub fn experiment(mut self, experiment: ExperimentOption) -> Self {
        self.experiment = Some(experiment);
        self
    }

    pub fn support_chat(mut self, timeout: u64) -> Self {
        self.support_chat = Some(timeout);
        self
    }

    pub fn google_fonts(mut self, family: impl Into<String>) -> Self {
        self.google_fonts = Some(family.into());
        self
    }

    pub fn asset_revision_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.asset_revision_manifest_path = Some(path.into());
        self
    }

    pub fn html_attributes(mut self, attributes: Attributes) -> Self {
        self.html_attributes = attributes;
        self
    }

    pub fn body_attributes(mut self, attributes: Attributes) -> Self {
        self.body_attributes = attributes;
        self
    }

    pub fn head_components(mut self, nodes: Vec<Node>) -> Self {
        self.head_components = nodes;
        self
    }

    pub fn pre_body_components(mut self, nodes: Vec<Node>) -> Self {
        self.pre_body_components = nodes;
        self
    }

    pub fn post_body_components(mut self, nodes: Vec<Node>) -> Self {
        self.post_body_components = nodes;
        self
    }

    /// Render the host-provided body instead of the children.
    pub fn alternate_body(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self.use_alternate_body = true;
        self
    }

    pub fn config(mut self, config: serde_json::Value) -> Self {
        self.config = Some(config);
        self
    }

    pub fn collect_styles(mut self, enabled: bool) -> Self {
        self.collect_styles = enabled;
        self
    }

    /// Scripts in load order, defaulting to [`DEFAULT_SCRIPT`].
    pub fn script_list(&self) -> Vec<String> {
        self.scripts
            .clone()
            .map_or_else(|| vec![DEFAULT_SCRIPT.to_string()], AssetList::into_vec)
    }

    /// Stylesheets in load order, defaulting to [`DEFAULT_STYLE`].
    pub fn style_list(&self) -> Vec<String> {
        self.styles
            .clone()
            .map_or_else(|| vec![DEFAULT_STYLE.to_string()], AssetList::into_vec)
    }

    /// Tag manager id, preferring `analytics` over the flat legacy field.
    pub fn tag_manager_id(&self) -> Option<String> {
        self.analytics
            .as_ref()
            .and_then(|analytics| analytics.tag_manager_id.clone())
            .or_else(|| self.google_tag_manager_id.clone())
            .filter(|id| !id.is_empty())
    }

    pub fn experiment_account_id(&self) -> Option<String> {
        self.experiment.as_ref().and_then(ExperimentOption::account_id)
    }

    /// Support-chat timeout; zero disables the widget.
    pub fn support_chat_timeout(&self) -> Option<u64> {
        self.support_chat.filter(|timeout| *timeout > 0)
    }
}

/// Field deserializers that never reject a well-formed JSON value.
mod lenient {
    use serde::de::DeserializeOwned;
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    use crate::serialize::is_truthy;

    /// Values that do not fit `T` fall back to `T::default()`.
    pub fn or_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
    where
        D: Deserializer<'de>,
        T: DeserializeOwned + Default,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(serde_json::from_value(value).unwrap_or_default())
    }

    pub fn truthy<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
        Value::deserialize(deserializer).map(|value| is_truthy(&value))
    }

    /// As [`truthy`], but `null` leaves the flag on.
    pub fn truthy_unless_null<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<bool, D::Error> {
        Value::deserialize(deserializer).map(|value| value.is_null() || is_truthy(&value))
    }

    /// Whole units from a number or numeric string; fractions are truncated.
    pub fn timeout<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<u64>, D::Error> {
        let units = match Value::deserialize(deserializer)? {
            Value::Number(number) => number.as_f64(),
            Value::String(text) => text.trim().parse::<f64>().ok(),
            _ => None,
        };
        Ok(units
            .filter(|units| units.is_finite() && *units >= 0.0)
            .map(|units| units as u64))
    }
}
