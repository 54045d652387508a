//! # Property-Name Transform
//!
//! Converts `snake_case` (and `kebab-case`) field names to `camelCase`
//! property names. The transform is applied at compile time when the
//! ambient `to_camel_case` option is set; the original field name is always
//! preserved alongside the transformed property name in the compiled node.

/// Convert a field name to camelCase.
///
/// Splits on `_` and `-`, keeps the first segment as-is, and capitalizes
/// the first character of every following segment. Names without separators
/// pass through unchanged, so the `'*'` wildcard used for record values and
/// root fields is untouched.
///
/// ```
/// use trellis_core::to_camel_case;
///
/// assert_eq!(to_camel_case("post_id"), "postId");
/// assert_eq!(to_camel_case("available-transport"), "availableTransport");
/// assert_eq!(to_camel_case("*"), "*");
/// ```
pub fn to_camel_case(field_name: &str) -> String {
    if !field_name.contains(['_', '-']) {
        return field_name.to_string();
    }

    let mut out = String::with_capacity(field_name.len());
    let mut capitalize_next = false;
    for (i, ch) in field_name.chars().enumerate() {
        if ch == '_' || ch == '-' {
            // Leading separators are kept verbatim so names like `_id`
            // round-trip; only separators between segments are consumed.
            if i == 0 || out.is_empty() {
                out.push(ch);
            } else {
                capitalize_next = true;
            }
            continue;
        }
        if capitalize_next {
            out.extend(ch.to_uppercase());
            capitalize_next = false;
        } else {
            out.push(ch);
        }
    }
    out
}
