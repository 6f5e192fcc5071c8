/// Generate an ID from a name: lowercase, replace non-alphanumeric with `-`,
/// collapse consecutive dashes, trim leading/trailing dashes.
///
/// Names with no alphanumeric characters map to `default`.
pub fn slugify(name: &str) -> String {
    let slug: String = name
        .to_lowercase()
        .chars()
        .map(|c| if c.is_alphanumeric() { c } else { '-' })
        .collect();

    let mut result = String::new();
    let mut last_was_dash = false;
    for c in slug.chars() {
        if c == '-' {
            if !last_was_dash && !result.is_empty() {
                result.push('-');
            }
            last_was_dash = true;
        } else {
            result.push(c);
            last_was_dash = false;
        }
    }

    if result.ends_with('-') {
        result.pop();
    }

    if result.is_empty() {
        "default".to_string()
    } else {
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slugify() {
        assert_eq!(slugify("My Project"), "my-project");
        assert_eq!(slugify("Production (Primary)"), "production-primary");
        assert_eq!(slugify("dev-account-01"), "dev-account-01");
        assert_eq!(slugify("  spaces  "), "spaces");
        assert_eq!(slugify("///"), "default");
    }
}
