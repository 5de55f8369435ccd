//! Walking value graphs: labeled views, child enumeration, member pairing

pub mod introspect;
pub mod matcher;

pub use introspect::{recognize_name, IntrospectedValue, SynthesizedName, ROOT_LABEL};
pub use matcher::{match_members, MemberMatch, VisitedPairs};
