//! Binding processors: one pure function per expression flag.
//!
//! Each processor maps `(identifier, value)` to a SQL fragment and the values
//! bound by that fragment's `?` markers, in order.

use crate::sql::{BindValue, Bindable};

/// SQL fragment plus the values its placeholders bind.
pub type Fragment = (String, Vec<BindValue>);

pub type Processor = fn(&str, &Bindable) -> Fragment;

/// One entry of the processor table. `flag` is the expression with its identifier replaced by `id`.
#[derive(Clone, Copy)]
pub struct ProcessorEntry {
    pub flag: &'static str,
    pub apply: Processor,
    /// False for processors that splice literal text and bind nothing.
    pub binds: bool,
}

pub const PROCESSORS: &[ProcessorEntry] = &[
    ProcessorEntry { flag: "id", apply: direct, binds: true },
    ProcessorEntry { flag: "*id", apply: raw, binds: false },
    ProcessorEntry { flag: "=id", apply: equals, binds: true },
    ProcessorEntry { flag: "!id", apply: not_equals, binds: true },
    ProcessorEntry { flag: ">id", apply: greater, binds: true },
    ProcessorEntry { flag: ">=id", apply: greater_or_equal, binds: true },
    ProcessorEntry { flag: "<id", apply: lesser, binds: true },
    ProcessorEntry { flag: "<=id", apply: lesser_or_equal, binds: true },
    ProcessorEntry { flag: "%id", apply: like_prefix, binds: true },
    ProcessorEntry { flag: "%id%", apply: like_both, binds: true },
    ProcessorEntry { flag: "id%", apply: like_suffix, binds: true },
];

pub fn lookup(flag: &str) -> Option<&'static ProcessorEntry> {
    PROCESSORS.iter().find(|p| p.flag == flag)
}

fn markers(count: usize) -> String {
    vec!["?"; count].join(", ")
}

pub fn direct(_identifier: &str, value: &Bindable) -> Fragment {
    match value {
        Bindable::One(v) => ("?".into(), vec![v.clone()]),
        Bindable::Many(vs) => (markers(vs.len()), vs.clone()),
    }
}

pub fn raw(_identifier: &str, value: &Bindable) -> Fragment {
    let text = value
        .values()
        .iter()
        .map(BindValue::literal)
        .collect::<Vec<_>>()
        .join(", ");
    (text, Vec::new())
}

fn equals_family(identifier: &str, value: &Bindable, negate: bool) -> Fragment {
    match value {
        Bindable::Many(vs) if vs.len() > 1 => {
            let op = if negate { "not in" } else { "in" };
            (format!("{} {} ({})", identifier, op, markers(vs.len())), vs.clone())
        }
        // An empty list binds a single null, mirroring the one-element form.
        Bindable::Many(vs) => equals_condition(identifier, vs.first().cloned().unwrap_or(BindValue::Null), negate),
        Bindable::One(v) => equals_condition(identifier, v.clone(), negate),
    }
}

fn equals_condition(identifier: &str, value: BindValue, negate: bool) -> Fragment {
    let op = if negate { "!=" } else { "=" };
    (format!("{} {} ?", identifier, op), vec![value])
}

pub fn equals(identifier: &str, value: &Bindable) -> Fragment {
    equals_family(identifier, value, false)
}

pub fn not_equals(identifier: &str, value: &Bindable) -> Fragment {
    equals_family(identifier, value, true)
}

/// `field op ?` per value, joined by `or`, parenthesized only for more than one operand.
pub fn compound_condition(field: &str, values: Vec<BindValue>, op: &str) -> Fragment {
    let condition = values
        .iter()
        .map(|_| format!("{} {} ?", field, op))
        .collect::<Vec<_>>()
        .join(" or ");
    if values.len() > 1 {
        (format!("({})", condition), values)
    } else {
        (condition, values)
    }
}

pub fn greater(identifier: &str, value: &Bindable) -> Fragment {
    compound_condition(identifier, value.values().to_vec(), ">")
}

pub fn greater_or_equal(identifier: &str, value: &Bindable) -> Fragment {
    compound_condition(identifier, value.values().to_vec(), ">=")
}

pub fn lesser(identifier: &str, value: &Bindable) -> Fragment {
    compound_condition(identifier, value.values().to_vec(), "<")
}

pub fn lesser_or_equal(identifier: &str, value: &Bindable) -> Fragment {
    compound_condition(identifier, value.values().to_vec(), "<=")
}

fn like(identifier: &str, value: &Bindable, before: bool, after: bool) -> Fragment {
    let patterns = value
        .values()
        .iter()
        .map(|v| {
            let mut pattern = String::new();
            if before {
                pattern.push('%');
            }
            pattern.push_str(&v.literal());
            if after {
                pattern.push('%');
            }
            BindValue::Text(pattern)
        })
        .collect();
    compound_condition(identifier, patterns, "like")
}

pub fn like_prefix(identifier: &str, value: &Bindable) -> Fragment {
    like(identifier, value, true, false)
}

pub fn like_both(identifier: &str, value: &Bindable) -> Fragment {
    like(identifier, value, true, true)
}

pub fn like_suffix(identifier: &str, value: &Bindable) -> Fragment {
    like(identifier, value, false, true)
}
