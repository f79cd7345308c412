//! Naming conventions: type names to snake_case table and key names.

/// Convert an identifier from PascalCase/camelCase to snake_case.
/// e.g. "BlogPost" -> "blog_post", "userId" -> "user_id", "person record" -> "person_record".
pub fn to_snake_case(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 4);
    let mut after_space = false;
    for c in s.chars() {
        if c.is_whitespace() {
            after_space = !out.is_empty();
            continue;
        }
        if (after_space || c.is_uppercase()) && !out.is_empty() && !out.ends_with('_') {
            out.push('_');
        }
        after_space = false;
        out.extend(c.to_lowercase());
    }
    out
}

/// Naive plural: appends `s`, no irregular forms.
pub fn pluralize(s: &str) -> String {
    format!("{}s", s)
}

/// The last path segment of a type name, without generic arguments.
/// e.g. "app::models::BlogPost" -> "BlogPost", "app::Page<app::User>" -> "Page".
pub fn simple_type_name(full: &str) -> &str {
    let base = full.split('<').next().unwrap_or(full);
    base.rsplit("::").next().unwrap_or(base)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snake_case() {
        assert_eq!(to_snake_case("BlogPost"), "blog_post");
        assert_eq!(to_snake_case("address"), "address");
        assert_eq!(to_snake_case("userId"), "user_id");
        assert_eq!(to_snake_case("Person Record"), "person_record");
    }

    #[test]
    fn test_whitespace_starts_a_word() {
        assert_eq!(to_snake_case("person record"), "person_record");
        assert_eq!(to_snake_case("  blog   post "), "blog_post");
    }

    #[test]
    fn test_consecutive_capitals_split() {
        assert_eq!(to_snake_case("HTTPLog"), "h_t_t_p_log");
    }

    #[test]
    fn test_simple_type_name() {
        assert_eq!(simple_type_name("app::models::BlogPost"), "BlogPost");
        assert_eq!(simple_type_name("Branch"), "Branch");
        assert_eq!(simple_type_name("app::Page<app::User>"), "Page");
    }

    #[test]
    fn test_pluralize() {
        assert_eq!(pluralize("address"), "addresss");
        assert_eq!(pluralize("blog_post"), "blog_posts");
    }
}
