use indexmap::IndexMap;
use rp_error::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{ser::PrettyFormatter, Map, Serializer, Value};

use crate::{
    collection_id::CollectionId,
    property::{Property, PropertyJson, PropertySpec},
};

/// Local schema record of one collection.
///
/// Invariant: every property has a distinct `order`, and new properties are
/// appended after the current maximum.
#[derive(Debug, Clone, PartialEq)]
pub struct Descriptor {
    kind: String,
    id: Option<String>,
    properties: IndexMap<String, Property>,
    extra: Map<String, Value>,
}

#[derive(Serialize, Deserialize)]
struct DescriptorJson {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    id: Option<String>,
    #[serde(default)]
    properties: IndexMap<String, PropertyJson>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

impl Descriptor {
    /// Builds a fresh descriptor, numbering `properties` from 0 in the order
    /// they are given.
    pub fn new(kind: &str, properties: IndexMap<String, PropertySpec>) -> Result<Self> {
        if kind.is_empty() {
            return Err(Error::validation("Collection type must not be empty"));
        }

        let mut descriptor = Self {
            kind: kind.to_owned(),
            id: None,
            properties: IndexMap::with_capacity(properties.len()),
            extra: Map::new(),
        };
        for (name, spec) in properties {
            spec.validate(&name)?;
            let order = descriptor.properties.len() as u64;
            descriptor
                .properties
                .insert(name, spec.into_property(&order));
        }
        Ok(descriptor)
    }

    pub fn kind(&self) -> &str {
        &self.kind
    }

    /// External-facing collection name, set when the collection is renamed.
    pub fn id(&self) -> &Option<String> {
        &self.id
    }

    pub fn properties(&self) -> &IndexMap<String, Property> {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.get(name)
    }

    pub fn set_id(&mut self, id: &str) {
        self.id = Some(id.to_owned());
    }

    /// `1 + max(order)`, or 0 for a descriptor without properties. A stored
    /// maximum of `u64::MAX` leaves no room and is reported as corrupt.
    pub fn next_order(&self, collection_id: &CollectionId) -> Result<u64> {
        match self.properties.values().map(|property| *property.order()).max() {
            None => Ok(0),
            Some(max) => max.checked_add(1).ok_or_else(|| Error::Corrupt {
                collection: collection_id.to_string(),
                message: format!("Property order {max} cannot be followed"),
            }),
        }
    }

    /// Appends a property, replacing any property of the same name.
    pub fn add_property(
        &mut self,
        collection_id: &CollectionId,
        name: &str,
        spec: PropertySpec,
    ) -> Result<u64> {
        spec.validate(name)?;
        let order = self.next_order(collection_id)?;
        self.properties
            .insert(name.to_owned(), spec.into_property(&order));
        Ok(order)
    }

    /// Renames properties pair by pair, keeping type, label, required flag
    /// and order of each renamed property.
    pub fn rename_properties(
        &mut self,
        collection_id: &CollectionId,
        renames: &IndexMap<String, String>,
    ) -> Result<()> {
        for (old_name, new_name) in renames {
            if new_name.is_empty() {
                return Err(Error::validation(format!(
                    "New name of property {old_name} must not be empty"
                )));
            }
            let property = match self.properties.shift_remove(old_name) {
                Some(property) => property,
                None => {
                    return Err(Error::PropertyNotFound {
                        collection: collection_id.to_string(),
                        property: old_name.to_owned(),
                    })
                }
            };
            self.properties.insert(new_name.to_owned(), property);
        }
        Ok(())
    }

    /// Fails with the first property name in `names` that is missing.
    pub fn ensure_properties<'a, I>(&self, collection_id: &CollectionId, names: I) -> Result<()>
    where
        I: IntoIterator<Item = &'a String>,
    {
        for name in names {
            if !self.properties.contains_key(name) {
                return Err(Error::PropertyNotFound {
                    collection: collection_id.to_string(),
                    property: name.to_owned(),
                });
            }
        }
        Ok(())
    }

    pub fn to_value(&self) -> Value {
        // A map of strings and plain structs always converts.
        serde_json::to_value(self.to_json()).unwrap_or(Value::Null)
    }

    /// Pretty JSON with four-space indentation, the layout the backend writes.
    pub fn to_pretty_json(&self) -> Result<Vec<u8>> {
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        self.to_json()
            .serialize(&mut ser)
            .map_err(|err| Error::Io(err.into()))?;
        Ok(buf)
    }

    pub fn from_slice(collection_id: &CollectionId, bytes: &[u8]) -> Result<Self> {
        match serde_json::from_slice::<DescriptorJson>(bytes) {
            Ok(json) => Ok(Self::from_json(json)),
            Err(err) => Err(Error::Corrupt {
                collection: collection_id.to_string(),
                message: err.to_string(),
            }),
        }
    }

    fn to_json(&self) -> DescriptorJson {
        DescriptorJson {
            kind: self.kind.clone(),
            id: self.id.clone(),
            properties: self
                .properties
                .iter()
                .map(|(name, property)| (name.clone(), property.to_json(name)))
                .collect(),
            extra: self.extra.clone(),
        }
    }

    fn from_json(json: DescriptorJson) -> Self {
        Self {
            kind: json.kind,
            id: json.id,
            properties: json
                .properties
                .into_iter()
                .map(|(name, property)| (name, Property::from_json(property)))
                .collect(),
            extra: json.extra,
        }
    }
}
