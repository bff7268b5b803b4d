//! Maps user-supplied column headers onto the semantic roles the engine
//! understands. Matching is declarative: each role owns an ordered chain of
//! rules, evaluated top to bottom, and each rule scans the headers in their
//! source order so the first plausible column wins deterministically.

/// A single matching rule within a role's chain.
pub enum HeaderRule {
    /// Header equals one of the candidates exactly.
    Exact(&'static [&'static str]),
    /// Header contains any of `any` as a substring, and none of `none`.
    Contains {
        any: &'static [&'static str],
        none: &'static [&'static str],
    },
}

const FULL_NAME_RULES: &[HeaderRule] = &[HeaderRule::Exact(&["full name", "name"])];

// Exact synonyms first; the substring fallback must not swallow columns like
// "firm email", which belong to the email role.
const FIRM_RULES: &[HeaderRule] = &[
    HeaderRule::Exact(&["firm", "company", "firm name", "company name", "business"]),
    HeaderRule::Contains {
        any: &["company", "firm"],
        none: &["email"],
    },
];

const SCHOOL_RULES: &[HeaderRule] = &[HeaderRule::Contains {
    any: &["school", "college", "university", "uni"],
    none: &[],
}];

const EMAIL_RULES: &[HeaderRule] = &[HeaderRule::Contains {
    any: &["email"],
    none: &[],
}];

const PREFIX_RULES: &[HeaderRule] = &[HeaderRule::Exact(&["prefix"])];

impl HeaderRule {
    fn first_match<'a>(&self, headers: &'a [String]) -> Option<&'a str> {
        match self {
            HeaderRule::Exact(candidates) => headers
                .iter()
                .find(|h| candidates.contains(&h.as_str()))
                .map(|h| h.as_str()),
            HeaderRule::Contains { any, none } => headers
                .iter()
                .find(|h| {
                    any.iter().any(|s| h.contains(s)) && !none.iter().any(|s| h.contains(s))
                })
                .map(|h| h.as_str()),
        }
    }
}

fn select_header(rules: &[HeaderRule], headers: &[String]) -> Option<String> {
    rules
        .iter()
        .find_map(|rule| rule.first_match(headers))
        .map(|h| h.to_string())
}

/// The headers chosen for each semantic role, if any.
///
/// Roles are detected independently, so in pathological header sets one
/// column could serve two roles; the substring exclusions make that rare and
/// it is accepted rather than enforced against. An unresolved role simply
/// yields empty derived values downstream.
#[derive(Debug, Clone, Default)]
pub struct HeaderRoles {
    pub full_name: Option<String>,
    pub firm: Option<String>,
    pub school: Option<String>,
    pub email: Option<String>,
    pub prefix: Option<String>,
}

impl HeaderRoles {
    /// Detect roles over an ordered list of lowercase headers.
    pub fn detect(headers: &[String]) -> Self {
        HeaderRoles {
            full_name: select_header(FULL_NAME_RULES, headers),
            firm: select_header(FIRM_RULES, headers),
            school: select_header(SCHOOL_RULES, headers),
            email: select_header(EMAIL_RULES, headers),
            prefix: select_header(PREFIX_RULES, headers),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn firm_email_is_not_picked_as_firm() {
        let roles = HeaderRoles::detect(&headers(&["firm email", "firm name"]));
        assert_eq!(roles.firm.as_deref(), Some("firm name"));
        assert_eq!(roles.email.as_deref(), Some("firm email"));
    }

    #[test]
    fn exact_firm_synonym_beats_substring_fallback() {
        let roles = HeaderRoles::detect(&headers(&["parent company", "business"]));
        assert_eq!(roles.firm.as_deref(), Some("business"));
    }

    #[test]
    fn substring_fallback_applies_when_no_exact_match() {
        let roles = HeaderRoles::detect(&headers(&["law firm", "email"]));
        assert_eq!(roles.firm.as_deref(), Some("law firm"));
    }

    #[test]
    fn full_name_requires_exact_match() {
        let roles = HeaderRoles::detect(&headers(&["full name", "nickname"]));
        assert_eq!(roles.full_name.as_deref(), Some("full name"));

        let roles = HeaderRoles::detect(&headers(&["nickname"]));
        assert_eq!(roles.full_name, None);
    }

    #[test]
    fn first_header_wins_among_school_candidates() {
        let roles = HeaderRoles::detect(&headers(&["university", "law school"]));
        assert_eq!(roles.school.as_deref(), Some("university"));
    }

    #[test]
    fn unmatched_roles_are_none() {
        let roles = HeaderRoles::detect(&headers(&["a", "b", "c"]));
        assert!(roles.full_name.is_none());
        assert!(roles.firm.is_none());
        assert!(roles.school.is_none());
        assert!(roles.email.is_none());
        assert!(roles.prefix.is_none());
    }

    #[test]
    fn prefix_is_exact_only() {
        let roles = HeaderRoles::detect(&headers(&["name prefix"]));
        assert!(roles.prefix.is_none());

        let roles = HeaderRoles::detect(&headers(&["prefix"]));
        assert_eq!(roles.prefix.as_deref(), Some("prefix"));
    }
}
