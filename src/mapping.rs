//! Filename-prefix to tag mapping.
//!
//! Cameras name their files with a fixed prefix (`GRMN0042.MP4`,
//! `CYQ_0007.MP4`, ...). The mapping turns that prefix into the tag that ends
//! the renamed clip's filename. Rules are tested in the order they appear in
//! the configuration file, first match wins.
//!
//! # Example
//!
//! ```
//! use bcamera::{TagMapping, TagRule};
//!
//! let mapping = TagMapping::new()
//!     .with_rule("GRMN", TagRule::new("-grmn"))
//!     .with_rule("CYQ", TagRule::new("-fly6").anchored_at_end());
//!
//! assert_eq!(mapping.resolve("footage/GRMN0042.MP4").tag, "-grmn");
//! assert!(mapping.resolve("CYQ_0007.MP4").anchor_at_end);
//! assert_eq!(mapping.resolve("abc1234-x.mp4").tag, "-abc1");
//! ```

use std::path::Path;

use serde_json::{Map, Value};

use crate::error::BcameraError;

/// Length cap of the fallback tag taken from an unmapped filename.
const FALLBACK_TAG_LENGTH: usize = 4;

/// What a matching prefix resolves to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagRule {
    /// The string appended to the output filename.
    pub tag: String,
    /// `true` when the camera stamps the end of the recording rather than
    /// the start, so the clip duration has to be subtracted.
    pub anchor_at_end: bool,
}

impl TagRule {
    /// A rule whose timestamp marks the start of the recording.
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            anchor_at_end: false,
        }
    }

    /// Mark the rule's timestamp as the end of the recording.
    #[must_use]
    pub fn anchored_at_end(mut self) -> Self {
        self.anchor_at_end = true;
        self
    }

    /// Build a rule from its JSON form.
    ///
    /// Accepts a plain string, or an object with a `rename` string and an
    /// optional `anchor_at_end` (alias `end`) boolean.
    pub fn from_json(prefix: &str, value: &Value) -> Result<Self, BcameraError> {
        match value {
            Value::String(tag) => Ok(Self::new(tag.as_str())),
            Value::Object(fields) => {
                let tag = fields
                    .get("rename")
                    .and_then(Value::as_str)
                    .ok_or_else(|| {
                        BcameraError::InvalidConfig(format!(
                            "mapping entry {prefix:?} needs a \"rename\" string"
                        ))
                    })?;
                let anchor = fields
                    .get("anchor_at_end")
                    .or_else(|| fields.get("end"))
                    .map(|flag| {
                        flag.as_bool().ok_or_else(|| {
                            BcameraError::InvalidConfig(format!(
                                "mapping entry {prefix:?}: anchor_at_end must be a boolean"
                            ))
                        })
                    })
                    .transpose()?
                    .unwrap_or(false);

                Ok(Self {
                    tag: tag.to_string(),
                    anchor_at_end: anchor,
                })
            }
            _ => Err(BcameraError::InvalidConfig(format!(
                "mapping entry {prefix:?} must be a string or an object"
            ))),
        }
    }

    fn to_json(&self) -> Value {
        if self.anchor_at_end {
            serde_json::json!({ "rename": self.tag, "anchor_at_end": true })
        } else {
            Value::String(self.tag.clone())
        }
    }
}

/// Ordered list of `(prefix, rule)` pairs.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagMapping {
    rules: Vec<(String, TagRule)>,
}

impl TagMapping {
    /// An empty mapping. Every file resolves to its fallback tag.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a rule. Earlier rules take precedence over later ones.
    #[must_use]
    pub fn with_rule(mut self, prefix: impl Into<String>, rule: TagRule) -> Self {
        self.rules.push((prefix.into(), rule));
        self
    }

    /// Build the mapping from the `mapping` object of a config file, in file
    /// order.
    pub fn from_json(value: &Value) -> Result<Self, BcameraError> {
        let object = value.as_object().ok_or_else(|| {
            BcameraError::InvalidConfig("\"mapping\" must be a JSON object".to_string())
        })?;

        let rules = object
            .iter()
            .map(|(prefix, rule)| -> Result<_, BcameraError> {
                Ok((prefix.clone(), TagRule::from_json(prefix, rule)?))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { rules })
    }

    /// JSON form of the mapping, used when echoing the effective config.
    pub fn to_json(&self) -> Value {
        let object: Map<String, Value> = self
            .rules
            .iter()
            .map(|(prefix, rule)| (prefix.clone(), rule.to_json()))
            .collect();
        Value::Object(object)
    }

    /// Number of rules.
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    /// Returns `true` if no rules are registered.
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Resolve the tag for a clip path. Never fails.
    ///
    /// Only the base name is matched. With no matching prefix the tag is `-`
    /// followed by the base name's leading run up to the first `-` or `_`,
    /// capped at four characters.
    pub fn resolve<P: AsRef<Path>>(&self, path: P) -> TagRule {
        let base_name = path
            .as_ref()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();

        if let Some((prefix, rule)) = self
            .rules
            .iter()
            .find(|(prefix, _)| base_name.starts_with(prefix.as_str()))
        {
            log::debug!("{base_name}: matched prefix {prefix:?} -> {:?}", rule.tag);
            return rule.clone();
        }

        let fallback = fallback_tag(&base_name);
        log::debug!("{base_name}: no prefix matched, falling back to {fallback:?}");
        TagRule::new(fallback)
    }
}

fn fallback_tag(base_name: &str) -> String {
    let run: String = base_name
        .chars()
        .take_while(|character| *character != '-' && *character != '_')
        .take(FALLBACK_TAG_LENGTH)
        .collect();
    format!("-{run}")
}
