pub mod describe;
pub mod number;
pub mod type_desc;
pub mod value;

pub use describe::{Describe, ObjectBuilder};
pub use number::{Number, NumericKind};
pub use type_desc::{TypeDescriptor, TypeKey};
pub use value::{
    Equatable, GridValue, MapValue, Member, MemberKind, ObjectValue, OpaqueValue, Scalar,
    SeqValue, Value, Visibility,
};
