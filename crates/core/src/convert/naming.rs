// Convention-based converter name derivation

/// Derive a registered converter name from a type identifier.
///
/// Strips a trailing `ValueConverter` (or `Converter`) marker and converts
/// the remainder to lower-camel case, the casing used in binding
/// expressions: `DateFormatValueConverter` -> `dateFormat`,
/// `upper_case_converter` -> `upperCase`.
pub fn derived_name(identifier: &str) -> String {
    let base = strip_marker(short_name(identifier));

    if base.contains('_') {
        snake_to_camel(base)
    } else {
        lower_first(base)
    }
}

/// Reduce a fully qualified type name to its final path segment, without
/// generic parameters
fn short_name(identifier: &str) -> &str {
    let no_generics = identifier.split('<').next().unwrap_or(identifier);
    no_generics.rsplit("::").next().unwrap_or(no_generics)
}

fn strip_marker(name: &str) -> &str {
    for marker in ["ValueConverter", "Converter", "_value_converter", "_converter"] {
        if let Some(stripped) = name.strip_suffix(marker) {
            if !stripped.is_empty() {
                return stripped;
            }
        }
    }
    name
}

fn lower_first(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().collect::<String>() + chars.as_str(),
        None => String::new(),
    }
}

fn snake_to_camel(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut first = true;

    for part in name.split('_').filter(|p| !p.is_empty()) {
        if first {
            out.push_str(&part.to_lowercase());
            first = false;
        } else {
            let mut chars = part.chars();
            if let Some(c) = chars.next() {
                out.extend(c.to_uppercase());
                out.push_str(&chars.as_str().to_lowercase());
            }
        }
    }

    out
}
