//! Small string helpers.

/// snake_case a type name: `CompanyProfile` becomes `company_profile`,
/// `XMLDoc` becomes `xml_doc`.
pub(crate) fn snake_case(name: &str) -> String {
    let chars: Vec<char> = name.chars().collect();
    let mut out = String::with_capacity(name.len() + 4);
    for (i, &c) in chars.iter().enumerate() {
        if c.is_uppercase() {
            let boundary = match i.checked_sub(1).map(|p| chars[p]) {
                None | Some('_') => false,
                Some(prev) if prev.is_lowercase() || prev.is_ascii_digit() => true,
                // end of an acronym run: "XMLDoc" -> xml_doc
                Some(_) => chars.get(i + 1).is_some_and(|n| n.is_lowercase()),
            };
            if boundary {
                out.push('_');
            }
            out.extend(c.to_lowercase());
        } else {
            out.push(c);
        }
    }
    out
}
