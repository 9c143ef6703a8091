/// Converts a snake_case field name to the camelCase form used on the wire
///
/// Every segment after the first is title-cased, so `new_password_confirmation`
/// becomes `newPasswordConfirmation`. Names without underscores are returned as-is.
pub fn snake_to_camel(name: &str) -> String {
    let mut segments = name.split('_').filter(|s| !s.is_empty());
    let mut out = String::with_capacity(name.len());

    if let Some(first) = segments.next() {
        out.push_str(first);
    }
    for segment in segments {
        let mut chars = segment.chars();
        if let Some(head) = chars.next() {
            out.extend(head.to_uppercase());
            out.push_str(&chars.as_str().to_lowercase());
        }
    }
    out
}
