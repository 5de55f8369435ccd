//! Labeled views over values and enumeration of their children

use std::collections::HashSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::format::format_value;
use crate::model::{GridValue, Member, ObjectValue, TypeDescriptor, Value};
use crate::policy::SelectionPolicy;

/// Label given to the top-level actual value
pub const ROOT_LABEL: &str = "actual";

fn backing_field_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^<(.*)>k__BackingField").ok())
        .as_ref()
}

fn anonymous_field_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^<(.*)>(i__Field|$)").ok())
        .as_ref()
}

/// How a raw member name was produced
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SynthesizedName {
    /// Written in source as is
    Plain,
    /// Storage generated for the property with this name
    BackingField(String),
    /// Field of an anonymous type, declared under this name
    AnonymousField(String),
}

pub fn recognize_name(raw: &str) -> SynthesizedName {
    let capture = |re: Option<&Regex>| {
        re.and_then(|re| re.captures(raw))
            .and_then(|c| c.get(1))
            .map(|m| m.as_str().to_string())
    };
    if let Some(name) = capture(backing_field_regex()) {
        return SynthesizedName::BackingField(name);
    }
    if let Some(name) = capture(anonymous_field_regex()) {
        return SynthesizedName::AnonymousField(name);
    }
    SynthesizedName::Plain
}

/// A value seen through the member path that reached it.
///
/// Cheap to clone: the value is a shared handle and the policy is borrowed.
#[derive(Debug, Clone)]
pub struct IntrospectedValue<'p> {
    path: String,
    name: String,
    parent_path: String,
    annotation: Option<String>,
    declared_type: TypeDescriptor,
    value: Value,
    policy: &'p SelectionPolicy,
}

impl<'p> IntrospectedValue<'p> {
    pub fn root(label: impl Into<String>, value: Value, policy: &'p SelectionPolicy) -> Self {
        Self {
            path: label.into(),
            name: String::new(),
            parent_path: String::new(),
            annotation: None,
            declared_type: value.type_descriptor(),
            value,
            policy,
        }
    }

    /// Label used in report lines
    pub fn label(&self) -> String {
        match &self.annotation {
            Some(note) => format!("{} ({})", self.path, note),
            None => self.path.clone(),
        }
    }

    /// Label path without annotation; children extend this
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Member name as declared, synthesized names resolved
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Dotted member names from the root, without the root label
    pub fn long_name(&self) -> String {
        if self.parent_path.is_empty() {
            self.name.clone()
        } else {
            format!("{}.{}", self.parent_path, self.name)
        }
    }

    pub fn declared_type(&self) -> &TypeDescriptor {
        &self.declared_type
    }

    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn policy(&self) -> &'p SelectionPolicy {
        self.policy
    }

    fn child(&self, path: String, name: String, value: Value) -> Self {
        Self {
            path,
            parent_path: self.long_name(),
            name,
            annotation: None,
            declared_type: value.type_descriptor(),
            value,
            policy: self.policy,
        }
    }

    /// Sequence item: `path[i]`
    pub fn indexed(&self, index: usize, value: Value) -> Self {
        self.child(
            format!("{}[{}]", self.path, index),
            format!("{}[{}]", self.name, index),
            value,
        )
    }

    /// Associative entry: `path[key]`
    pub fn keyed(&self, key: &Value, value: Value) -> Self {
        let key = format_value(key);
        self.child(
            format!("{}[{}]", self.path, key),
            format!("{}[{}]", self.name, key),
            value,
        )
    }

    /// Grid cell: `path[i]` or `path[i,j,...]`
    pub fn cell(&self, indexes: &[usize], value: Value) -> Self {
        let joined = indexes
            .iter()
            .map(usize::to_string)
            .collect::<Vec<_>>()
            .join(",");
        self.child(
            format!("{}[{}]", self.path, joined),
            format!("{}[{}]", self.name, joined),
            value,
        )
    }

    fn member(&self, member: Member, name: String, annotation: Option<String>) -> Option<Self> {
        let value = member.value?;
        let declared_type = member
            .declared_type
            .unwrap_or_else(|| value.type_descriptor());
        Some(Self {
            path: format!("{}.{}", self.path, name),
            parent_path: self.long_name(),
            name,
            annotation,
            declared_type,
            value,
            policy: self.policy,
        })
    }

    /// Children in declaration or storage order; empty for terminal values.
    pub fn enumerate_children(&self) -> Vec<Self> {
        match &self.value {
            Value::Object(obj) => self.object_members(obj),
            Value::Seq(seq) => seq
                .items()
                .into_iter()
                .enumerate()
                .map(|(i, item)| self.indexed(i, item))
                .collect(),
            Value::Map(map) => map
                .entries()
                .into_iter()
                .map(|(k, v)| self.keyed(&k, v))
                .collect(),
            Value::Grid(grid) => self.grid_cells(grid),
            _ => Vec::new(),
        }
    }

    pub fn grid_cells(&self, grid: &GridValue) -> Vec<Self> {
        grid.items()
            .iter()
            .enumerate()
            .map(|(offset, item)| {
                if grid.rank() == 1 {
                    self.indexed(offset, item.clone())
                } else {
                    self.cell(&grid.unravel(offset), item.clone())
                }
            })
            .collect()
    }

    fn object_members(&self, obj: &ObjectValue) -> Vec<Self> {
        let mut members = obj.members();
        // Own members come first so they shadow inherited ones of the same name.
        members.sort_by_key(|m| m.depth);

        let mut seen = HashSet::new();
        let mut children = Vec::new();
        for member in members {
            if !self.policy.admits(&member) || !seen.insert(member.name.clone()) {
                continue;
            }
            let (name, annotation) = match recognize_name(&member.name) {
                SynthesizedName::Plain => (member.name.clone(), None),
                SynthesizedName::BackingField(property) => {
                    if self.policy.include_properties {
                        continue;
                    }
                    let note = format!("auto-generated field of property '{}'", property);
                    (property, Some(note))
                }
                SynthesizedName::AnonymousField(field) => (field, None),
            };
            let long_name = if self.long_name().is_empty() {
                name.clone()
            } else {
                format!("{}.{}", self.long_name(), name)
            };
            if self.policy.is_name_excluded(&name, &long_name) {
                continue;
            }
            if let Some(child) = self.member(member, name, annotation) {
                children.push(child);
            }
        }
        children
    }
}
