use rp_error::{Error, Result};
use serde::{Deserialize, Serialize};

/// One field of a collection schema.
///
/// The property name is not stored here: it is the key under which the
/// property sits in [`crate::Descriptor`], and is written out as both `name`
/// and `id` when serialized.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Property {
    kind: String,
    type_label: String,
    required: bool,
    order: u64,
}

impl Property {
    pub fn new(kind: &str, type_label: &str, required: &bool, order: &u64) -> Self {
        Self {
            kind: kind.to_owned(),
            type_label: type_label.to_owned(),
            required: *required,
            order: *order,
        }
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn type_label(&self) -> &str {
        &self.type_label
    }

    pub fn required(&self) -> &bool {
        &self.required
    }

    pub fn order(&self) -> &u64 {
        &self.order
    }

    pub(crate) fn to_json(&self, name: &str) -> PropertyJson {
        PropertyJson {
            name: Some(name.to_owned()),
            kind: self.kind.clone(),
            type_label: Some(self.type_label.clone()),
            required: self.required,
            id: Some(name.to_owned()),
            order: self.order,
        }
    }

    pub(crate) fn from_json(json: PropertyJson) -> Self {
        let type_label = json.type_label.unwrap_or_else(|| json.kind.clone());
        Self {
            kind: json.kind,
            type_label,
            required: json.required,
            order: json.order,
        }
    }
}

/// Stored shape of a property inside the descriptor file.
#[derive(Serialize, Deserialize)]
pub(crate) struct PropertyJson {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "typeLabel", default, skip_serializing_if = "Option::is_none")]
    type_label: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    order: u64,
}

/// A property definition as sent by a client, before it has an order.
///
/// Any `order` a client sends is ignored; the store assigns it.
#[derive(Debug, Clone, Deserialize)]
pub struct PropertySpec {
    #[serde(default)]
    name: Option<String>,
    #[serde(rename = "type")]
    kind: String,
    #[serde(rename = "typeLabel", default)]
    type_label: Option<String>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    id: Option<String>,
}

impl PropertySpec {
    pub fn new(kind: &str, required: &bool) -> Self {
        Self {
            name: None,
            kind: kind.to_owned(),
            type_label: None,
            required: *required,
            id: None,
        }
    }

    pub fn with_type_label(mut self, type_label: &str) -> Self {
        self.type_label = Some(type_label.to_owned());
        self
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    pub fn required(&self) -> &bool {
        &self.required
    }

    /// Checks that the definition is structurally usable under the map key
    /// `name`: a non-empty type, and `name`/`id` (when given) equal to the key.
    pub fn validate(&self, name: &str) -> Result<()> {
        if name.is_empty() {
            return Err(Error::validation("Property name must not be empty"));
        }
        if self.kind.is_empty() {
            return Err(Error::validation(format!(
                "Property {name} must have a type"
            )));
        }
        for (field, value) in [("name", &self.name), ("id", &self.id)] {
            if let Some(value) = value {
                if value != name {
                    return Err(Error::validation(format!(
                        "Property {name} has mismatched {field} '{value}'"
                    )));
                }
            }
        }
        Ok(())
    }

    pub fn into_property(self, order: &u64) -> Property {
        let type_label = self.type_label.unwrap_or_else(|| self.kind.clone());
        Property {
            kind: self.kind,
            type_label,
            required: self.required,
            order: *order,
        }
    }
}
