//! Conversion of Rust values into the value graph

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};
use std::rc::Rc;

use crate::format::format_value;
use crate::model::type_desc::TypeDescriptor;
use crate::model::value::{Member, ObjectValue, Value};

/// Types that can present themselves to the comparison engine
///
/// Composite types usually implement this with an [`ObjectBuilder`]:
///
/// ```
/// use fluentdiff_core::model::{Describe, ObjectBuilder, TypeDescriptor, Value};
///
/// struct Point { x: i32, y: i32 }
///
/// impl Describe for Point {
///     fn describe(&self) -> Value {
///         ObjectBuilder::new(TypeDescriptor::of::<Point>())
///             .field("x", self.x)
///             .field("y", self.y)
///             .build()
///     }
/// }
/// ```
pub trait Describe {
    fn describe(&self) -> Value;
}

impl Describe for Value {
    fn describe(&self) -> Value {
        self.clone()
    }
}

impl<T: Describe + ?Sized> Describe for &T {
    fn describe(&self) -> Value {
        (**self).describe()
    }
}

impl<T: Describe + ?Sized> Describe for Box<T> {
    fn describe(&self) -> Value {
        (**self).describe()
    }
}

macro_rules! describe_number {
    ($($t:ty),*) => {
        $(
            impl Describe for $t {
                fn describe(&self) -> Value {
                    Value::number(*self)
                }
            }
        )*
    };
}

describe_number!(i8, u8, i16, u16, i32, u32, i64, u64, f32, f64);

impl Describe for bool {
    fn describe(&self) -> Value {
        Value::bool(*self)
    }
}

impl Describe for char {
    fn describe(&self) -> Value {
        Value::char(*self)
    }
}

impl Describe for str {
    fn describe(&self) -> Value {
        Value::str(self)
    }
}

impl Describe for String {
    fn describe(&self) -> Value {
        Value::str(self.as_str())
    }
}

impl<T: Describe> Describe for Option<T> {
    fn describe(&self) -> Value {
        self.as_ref().map_or(Value::Null, Describe::describe)
    }
}

impl<T: Describe> Describe for [T] {
    fn describe(&self) -> Value {
        Value::seq(TypeDescriptor::of::<[T]>(), self.iter().map(Describe::describe))
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn describe(&self) -> Value {
        Value::seq(TypeDescriptor::of::<[T; N]>(), self.iter().map(Describe::describe))
    }
}

impl<T: Describe> Describe for Vec<T> {
    fn describe(&self) -> Value {
        Value::seq(TypeDescriptor::of::<Vec<T>>(), self.iter().map(Describe::describe))
    }
}

impl<T: Describe> Describe for BTreeSet<T> {
    fn describe(&self) -> Value {
        Value::seq(TypeDescriptor::of::<BTreeSet<T>>(), self.iter().map(Describe::describe))
    }
}

/// Items in the order of their rendered text, for hash containers whose
/// iteration order changes from one instance to the next
fn by_text<T>(items: impl Iterator<Item = T>, key: impl Fn(&T) -> &Value) -> Vec<T> {
    let mut keyed: Vec<(String, T)> = items.map(|item| (format_value(key(&item)), item)).collect();
    keyed.sort_by(|x, y| x.0.cmp(&y.0));
    keyed.into_iter().map(|(_, item)| item).collect()
}

impl<T: Describe, S> Describe for HashSet<T, S> {
    fn describe(&self) -> Value {
        Value::unordered_seq(
            TypeDescriptor::of::<HashSet<T>>(),
            by_text(self.iter().map(Describe::describe), |v| v),
        )
    }
}

impl<K: Describe, V: Describe> Describe for BTreeMap<K, V> {
    fn describe(&self) -> Value {
        Value::map(
            TypeDescriptor::of::<BTreeMap<K, V>>(),
            self.iter().map(|(k, v)| (k.describe(), v.describe())),
        )
    }
}

impl<K: Describe, V: Describe, S> Describe for HashMap<K, V, S> {
    fn describe(&self) -> Value {
        Value::map(
            TypeDescriptor::of::<HashMap<K, V>>(),
            by_text(self.iter().map(|(k, v)| (k.describe(), v.describe())), |(k, _)| k),
        )
    }
}

/// Builder for composite values
#[derive(Debug)]
pub struct ObjectBuilder {
    ty: TypeDescriptor,
    members: Vec<Member>,
}

impl ObjectBuilder {
    pub fn new(ty: TypeDescriptor) -> Self {
        Self {
            ty,
            members: Vec::new(),
        }
    }

    /// Public field declared on the type itself
    pub fn field(self, name: impl Into<String>, value: impl Describe) -> Self {
        self.member(Member::field(name, value.describe()))
    }

    pub fn property(self, name: impl Into<String>, value: impl Describe) -> Self {
        self.member(Member::property(name, value.describe()))
    }

    pub fn member(mut self, member: Member) -> Self {
        self.members.push(member);
        self
    }

    pub fn build_shared(self) -> Rc<ObjectValue> {
        let object = ObjectValue::new(self.ty);
        self.members.into_iter().for_each(|m| object.push(m));
        Rc::new(object)
    }

    pub fn build(self) -> Value {
        Value::Object(self.build_shared())
    }
}
