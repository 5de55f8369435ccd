//! The runtime value graph compared by the engine
//!
//! Containers and objects are shared handles with interior mutability so a
//! graph may refer back to itself. A handle's address is its identity.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use serde::{Deserialize, Serialize};

use crate::errors::{DiffError, Result};
use crate::model::number::Number;
use crate::model::type_desc::TypeDescriptor;

/// A value that owns its equality contract and is never descended into
pub trait OpaqueValue: fmt::Debug {
    fn type_descriptor(&self) -> TypeDescriptor;

    /// Own equality against another opaque value
    fn equals(&self, other: &dyn OpaqueValue) -> bool;

    /// Text shown in difference reports
    fn render(&self) -> String;

    fn as_any(&self) -> &dyn Any;
}

/// Wraps any `PartialEq` type so the engine compares it with `==`
#[derive(Debug, Clone)]
pub struct Equatable<T>(pub T);

impl<T: PartialEq + fmt::Debug + 'static> OpaqueValue for Equatable<T> {
    fn type_descriptor(&self) -> TypeDescriptor {
        TypeDescriptor::of::<T>()
    }

    fn equals(&self, other: &dyn OpaqueValue) -> bool {
        other
            .as_any()
            .downcast_ref::<Equatable<T>>()
            .is_some_and(|o| o.0 == self.0)
    }

    fn render(&self) -> String {
        format!("{:?}", self.0)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Scalar {
    Bool(bool),
    Char(char),
    Str(String),
    /// Unit-like enum variant
    Variant { type_name: String, name: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MemberKind {
    Field,
    Property,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Visibility {
    Public,
    NonPublic,
}

/// A named member of a composite value
#[derive(Debug, Clone)]
pub struct Member {
    pub name: String,
    pub kind: MemberKind,
    pub visibility: Visibility,
    /// 0 when declared on the runtime type, n when inherited from the n-th base
    pub depth: usize,
    pub declared_type: Option<TypeDescriptor>,
    /// `None` when the member cannot be read
    pub value: Option<Value>,
}

impl Member {
    pub fn field(name: impl Into<String>, value: Value) -> Self {
        Self {
            name: name.into(),
            kind: MemberKind::Field,
            visibility: Visibility::Public,
            depth: 0,
            declared_type: None,
            value: Some(value),
        }
    }

    pub fn property(name: impl Into<String>, value: Value) -> Self {
        Self {
            kind: MemberKind::Property,
            ..Self::field(name, value)
        }
    }

    pub fn unreadable(name: impl Into<String>) -> Self {
        Self {
            value: None,
            ..Self::field(name, Value::Null)
        }
    }

    pub fn non_public(mut self) -> Self {
        self.visibility = Visibility::NonPublic;
        self
    }

    pub fn inherited(mut self, depth: usize) -> Self {
        self.depth = depth;
        self
    }

    pub fn declared_as(mut self, ty: TypeDescriptor) -> Self {
        self.declared_type = Some(ty);
        self
    }
}

/// Associative container: ordered key/value entries
pub struct MapValue {
    ty: TypeDescriptor,
    entries: RefCell<Vec<(Value, Value)>>,
}

impl MapValue {
    pub fn new(ty: TypeDescriptor) -> Self {
        Self {
            ty,
            entries: RefCell::new(Vec::new()),
        }
    }

    pub fn type_descriptor(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn push_entry(&self, key: Value, value: Value) {
        self.entries.borrow_mut().push((key, value));
    }

    /// Snapshot of the entries in insertion order
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.entries.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Sequence of items. An unordered sequence is a set or a bag: its item
/// order carries no meaning and is never compared.
pub struct SeqValue {
    ty: TypeDescriptor,
    unordered: bool,
    items: RefCell<Vec<Value>>,
}

impl SeqValue {
    pub fn new(ty: TypeDescriptor) -> Self {
        Self {
            ty,
            unordered: false,
            items: RefCell::new(Vec::new()),
        }
    }

    pub fn unordered(ty: TypeDescriptor) -> Self {
        Self {
            unordered: true,
            ..Self::new(ty)
        }
    }

    pub fn type_descriptor(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn is_unordered(&self) -> bool {
        self.unordered
    }

    pub fn push(&self, item: Value) {
        self.items.borrow_mut().push(item);
    }

    pub fn items(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Fixed multi-axis container stored row-major
pub struct GridValue {
    ty: TypeDescriptor,
    shape: Vec<usize>,
    items: Vec<Value>,
}

impl GridValue {
    pub fn type_descriptor(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    pub fn items(&self) -> &[Value] {
        &self.items
    }

    /// Per-axis indexes of a row-major offset, slowest axis first
    pub fn unravel(&self, offset: usize) -> Vec<usize> {
        let mut remainder = offset;
        let mut indexes = vec![0; self.shape.len()];
        for (axis, extent) in self.shape.iter().enumerate().rev() {
            let extent = (*extent).max(1);
            indexes[axis] = remainder % extent;
            remainder /= extent;
        }
        indexes
    }
}

/// Composite value with named members
pub struct ObjectValue {
    ty: TypeDescriptor,
    members: RefCell<Vec<Member>>,
}

impl ObjectValue {
    pub fn new(ty: TypeDescriptor) -> Self {
        Self {
            ty,
            members: RefCell::new(Vec::new()),
        }
    }

    pub fn type_descriptor(&self) -> &TypeDescriptor {
        &self.ty
    }

    pub fn push(&self, member: Member) {
        self.members.borrow_mut().push(member);
    }

    /// Replace the value of the own member `name`, adding a public field if absent.
    pub fn set(&self, name: &str, value: Value) {
        let mut members = self.members.borrow_mut();
        match members.iter_mut().find(|m| m.name == name && m.depth == 0) {
            Some(member) => member.value = Some(value),
            None => members.push(Member::field(name, value)),
        }
    }

    pub fn members(&self) -> Vec<Member> {
        self.members.borrow().clone()
    }
}

// Debug output never recurses so cyclic graphs stay printable.
macro_rules! shallow_debug {
    ($($t:ty => $label:literal),* $(,)?) => {
        $(
            impl fmt::Debug for $t {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    write!(f, concat!($label, "({} @ {:p})"), self.ty, self)
                }
            }
        )*
    };
}

shallow_debug!(MapValue => "Map", SeqValue => "Seq", GridValue => "Grid", ObjectValue => "Object");

/// A node of the value graph
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Scalar(Scalar),
    Number(Number),
    Opaque(Rc<dyn OpaqueValue>),
    Map(Rc<MapValue>),
    Seq(Rc<SeqValue>),
    Grid(Rc<GridValue>),
    Object(Rc<ObjectValue>),
}

impl Value {
    pub fn str(s: impl Into<String>) -> Self {
        Value::Scalar(Scalar::Str(s.into()))
    }

    pub fn bool(b: bool) -> Self {
        Value::Scalar(Scalar::Bool(b))
    }

    pub fn char(c: char) -> Self {
        Value::Scalar(Scalar::Char(c))
    }

    pub fn number(n: impl Into<Number>) -> Self {
        Value::Number(n.into())
    }

    pub fn variant(type_name: impl Into<String>, name: impl Into<String>) -> Self {
        Value::Scalar(Scalar::Variant {
            type_name: type_name.into(),
            name: name.into(),
        })
    }

    pub fn opaque<T: PartialEq + fmt::Debug + 'static>(value: T) -> Self {
        Value::Opaque(Rc::new(Equatable(value)))
    }

    pub fn seq(ty: TypeDescriptor, items: impl IntoIterator<Item = Value>) -> Self {
        let seq = SeqValue::new(ty);
        items.into_iter().for_each(|item| seq.push(item));
        Value::Seq(Rc::new(seq))
    }

    /// Sequence whose item order is irrelevant to comparison
    pub fn unordered_seq(ty: TypeDescriptor, items: impl IntoIterator<Item = Value>) -> Self {
        let seq = SeqValue::unordered(ty);
        items.into_iter().for_each(|item| seq.push(item));
        Value::Seq(Rc::new(seq))
    }

    pub fn map(ty: TypeDescriptor, entries: impl IntoIterator<Item = (Value, Value)>) -> Self {
        let map = MapValue::new(ty);
        entries.into_iter().for_each(|(k, v)| map.push_entry(k, v));
        Value::Map(Rc::new(map))
    }

    /// Build a row-major grid.
    ///
    /// # Errors
    ///
    /// Returns [`DiffError::InvalidShape`] when the item count differs from
    /// the product of the extents.
    pub fn grid(ty: TypeDescriptor, shape: Vec<usize>, items: Vec<Value>) -> Result<Self> {
        let expected: usize = shape.iter().product();
        if shape.is_empty() || expected != items.len() {
            return Err(DiffError::InvalidShape {
                shape,
                item_count: items.len(),
            });
        }
        Ok(Value::Grid(Rc::new(GridValue { ty, shape, items })))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn type_descriptor(&self) -> TypeDescriptor {
        match self {
            Value::Null => TypeDescriptor::named("null"),
            Value::Scalar(Scalar::Bool(_)) => TypeDescriptor::of::<bool>(),
            Value::Scalar(Scalar::Char(_)) => TypeDescriptor::of::<char>(),
            Value::Scalar(Scalar::Str(_)) => TypeDescriptor::of::<String>(),
            Value::Scalar(Scalar::Variant { type_name, .. }) => {
                TypeDescriptor::named(type_name.as_str())
            }
            Value::Number(n) => TypeDescriptor::named(n.kind().name()),
            Value::Opaque(o) => o.type_descriptor(),
            Value::Map(m) => m.type_descriptor().clone(),
            Value::Seq(s) => s.type_descriptor().clone(),
            Value::Grid(g) => g.type_descriptor().clone(),
            Value::Object(o) => o.type_descriptor().clone(),
        }
    }

    /// Address of the shared handle; `None` for plain values
    pub fn identity(&self) -> Option<usize> {
        match self {
            Value::Opaque(o) => Some(Rc::as_ptr(o) as *const () as usize),
            Value::Map(m) => Some(Rc::as_ptr(m) as usize),
            Value::Seq(s) => Some(Rc::as_ptr(s) as usize),
            Value::Grid(g) => Some(Rc::as_ptr(g) as usize),
            Value::Object(o) => Some(Rc::as_ptr(o) as usize),
            _ => None,
        }
    }

    /// The value's own equality: by value for scalars and numbers of the same
    /// kind, by contract for opaque values, by identity for everything else.
    pub fn own_equals(&self, other: &Value) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Scalar(a), Value::Scalar(b)) => a == b,
            (Value::Number(a), Value::Number(b)) => a.same_as(b),
            (Value::Opaque(a), Value::Opaque(b)) => a.equals(b.as_ref()),
            (a, b) => match (a.identity(), b.identity()) {
                (Some(x), Some(y)) => x == y,
                _ => false,
            },
        }
    }

    pub fn as_object(&self) -> Option<&Rc<ObjectValue>> {
        match self {
            Value::Object(o) => Some(o),
            _ => None,
        }
    }

    pub fn as_seq(&self) -> Option<&Rc<SeqValue>> {
        match self {
            Value::Seq(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Rc<MapValue>> {
        match self {
            Value::Map(m) => Some(m),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_rejects_bad_shape() {
        let err = Value::grid(
            TypeDescriptor::named("grid"),
            vec![2, 2],
            vec![Value::number(1)],
        )
        .unwrap_err();
        assert!(matches!(err, DiffError::InvalidShape { item_count: 1, .. }));
    }

    #[test]
    fn test_unravel_is_row_major() {
        let items = (0..6).map(Value::number).collect();
        let grid = Value::grid(TypeDescriptor::named("grid"), vec![2, 3], items).unwrap();
        let Value::Grid(g) = grid else {
            panic!("expected grid")
        };
        assert_eq!(g.unravel(0), vec![0, 0]);
        assert_eq!(g.unravel(4), vec![1, 1]);
        assert_eq!(g.unravel(5), vec![1, 2]);
    }

    #[test]
    fn test_own_equals_containers_by_identity() {
        let a = Value::seq(TypeDescriptor::named("v"), vec![Value::number(1)]);
        let b = Value::seq(TypeDescriptor::named("v"), vec![Value::number(1)]);
        assert!(a.own_equals(&a.clone()));
        assert!(!a.own_equals(&b));
    }

    #[test]
    fn test_equatable_compares_by_partial_eq() {
        let a = Value::opaque(vec![1, 2]);
        let b = Value::opaque(vec![1, 2]);
        let c = Value::opaque("other");
        assert!(a.own_equals(&b));
        assert!(!a.own_equals(&c));
    }

    #[test]
    fn test_set_replaces_own_member() {
        let obj = ObjectValue::new(TypeDescriptor::named("Node"));
        obj.push(Member::field("id", Value::number(1)));
        obj.set("id", Value::number(2));
        obj.set("next", Value::Null);
        let members = obj.members();
        assert_eq!(members.len(), 2);
        assert!(matches!(members[0].value, Some(Value::Number(Number::I32(2)))));
    }
}
