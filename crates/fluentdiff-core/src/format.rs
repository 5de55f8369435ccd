//! Text rendering of values for difference reports

use std::collections::HashSet;

use crate::model::{GridValue, Scalar, Value};

/// Render `value` for a report line: strings quoted, chars in single quotes,
/// containers expanded, revisited handles shown as `...`.
pub fn format_value(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, true, &mut HashSet::new(), &mut out);
    out
}

/// Same as [`format_value`] except that a top-level string is not quoted
pub fn format_raw(value: &Value) -> String {
    let mut out = String::new();
    write_value(value, false, &mut HashSet::new(), &mut out);
    out
}

fn write_value(value: &Value, quote: bool, seen: &mut HashSet<usize>, out: &mut String) {
    if let Some(id) = value.identity() {
        if !seen.insert(id) {
            out.push_str("...");
            return;
        }
    }

    match value {
        Value::Null => out.push_str("null"),
        Value::Scalar(Scalar::Str(s)) if quote => {
            out.push('"');
            out.push_str(s);
            out.push('"');
        }
        Value::Scalar(Scalar::Str(s)) => out.push_str(s),
        Value::Scalar(Scalar::Char(c)) => {
            out.push('\'');
            out.push(*c);
            out.push('\'');
        }
        Value::Scalar(Scalar::Bool(b)) => out.push_str(if *b { "true" } else { "false" }),
        Value::Scalar(Scalar::Variant { name, .. }) => out.push_str(name),
        Value::Number(n) => out.push_str(&n.to_string()),
        Value::Opaque(o) => out.push_str(&o.render()),
        Value::Seq(seq) => write_items(&seq.items(), seen, out),
        Value::Map(map) => {
            out.push('{');
            for (i, (k, v)) in map.entries().iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push('[');
                write_value(k, true, seen, out);
                out.push_str(", ");
                write_value(v, true, seen, out);
                out.push(']');
            }
            out.push('}');
        }
        Value::Grid(grid) => write_grid(grid, 0, 0, seen, out),
        Value::Object(obj) => {
            out.push('{');
            for (i, member) in obj
                .members()
                .iter()
                .filter(|m| m.value.is_some())
                .enumerate()
            {
                if i > 0 {
                    out.push(',');
                }
                out.push(' ');
                out.push_str(&member.name);
                out.push_str(" = ");
                if let Some(v) = &member.value {
                    write_value(v, true, seen, out);
                }
                out.push(' ');
            }
            out.push('}');
        }
    }
}

fn write_items(items: &[Value], seen: &mut HashSet<usize>, out: &mut String) {
    out.push('{');
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push(',');
        }
        write_value(item, true, seen, out);
    }
    out.push('}');
}

// Nested braces per axis, outermost axis first.
fn write_grid(
    grid: &GridValue,
    axis: usize,
    offset: usize,
    seen: &mut HashSet<usize>,
    out: &mut String,
) {
    let shape = grid.shape();
    if axis + 1 == shape.len() {
        let end = offset + shape[axis];
        write_items(&grid.items()[offset..end], seen, out);
        return;
    }
    let stride: usize = shape[axis + 1..].iter().product();
    out.push('{');
    for i in 0..shape[axis] {
        if i > 0 {
            out.push(',');
        }
        write_grid(grid, axis + 1, offset + i * stride, seen, out);
    }
    out.push('}');
}

/// Format a magnitude with two significant digits, switching to scientific
/// notation for very small or large numbers (`0.0001`, `1E-05`, `1.2E+02`).
pub fn format_magnitude(x: f64) -> String {
    if x == 0.0 || !x.is_finite() {
        return x.to_string();
    }
    let sci = format!("{:.1e}", x);
    let (mantissa, exponent) = match sci.split_once('e') {
        Some((m, e)) => (m, e.parse::<i32>().unwrap_or(0)),
        None => return sci,
    };
    let mantissa = mantissa.trim_end_matches('0').trim_end_matches('.');
    if exponent > -5 && exponent < 2 {
        let decimals = (1 - exponent).max(0) as usize;
        let fixed = format!("{:.*}", decimals, x);
        if fixed.contains('.') {
            fixed.trim_end_matches('0').trim_end_matches('.').to_string()
        } else {
            fixed
        }
    } else {
        let sign = if exponent < 0 { '-' } else { '+' };
        format!("{}E{}{:02}", mantissa, sign, exponent.abs())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Describe, ObjectBuilder, TypeDescriptor};
    use std::collections::BTreeMap;

    #[test]
    fn test_scalars() {
        assert_eq!(format_value(&"foo".describe()), "\"foo\"");
        assert_eq!(format_raw(&"foo".describe()), "foo");
        assert_eq!(format_value(&'c'.describe()), "'c'");
        assert_eq!(format_value(&Value::Null), "null");
        assert_eq!(format_value(&1.5f64.describe()), "1.5");
    }

    #[test]
    fn test_containers() {
        assert_eq!(format_value(&vec![1, 2, 3].describe()), "{1,2,3}");
        let mut map = BTreeMap::new();
        map.insert("a", 1);
        assert_eq!(format_value(&map.describe()), "{[\"a\", 1]}");
        let obj = ObjectBuilder::new(TypeDescriptor::named("P"))
            .field("x", 1)
            .field("y", 2)
            .build();
        assert_eq!(format_value(&obj), "{ x = 1 , y = 2 }");
    }

    #[test]
    fn test_grid_nests_per_axis() {
        let items = (1..=4).map(Value::number).collect();
        let grid = Value::grid(TypeDescriptor::named("g"), vec![2, 2], items).unwrap();
        assert_eq!(format_value(&grid), "{{1,2},{3,4}}");
    }

    #[test]
    fn test_cycle_prints_ellipsis() {
        let node = ObjectBuilder::new(TypeDescriptor::named("Node"))
            .field("id", 1)
            .build();
        node.as_object().unwrap().set("next", node.clone());
        assert_eq!(format_value(&node), "{ id = 1 , next = ... }");
    }

    #[test]
    fn test_magnitude_two_significant_digits() {
        assert_eq!(format_magnitude(1.0e-5), "1E-05");
        assert_eq!(format_magnitude(0.00012), "0.00012");
        assert_eq!(format_magnitude(0.5), "0.5");
        assert_eq!(format_magnitude(1.234), "1.2");
        assert_eq!(format_magnitude(123.0), "1.2E+02");
    }
}
