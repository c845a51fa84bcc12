//! Allowed-domain gate for external identities
//!
//! A pure predicate over the configured allowed domain. No side effects, no
//! failure modes: a malformed address is simply not allowed.

use atrium_core::EmailAddress;

/// Stateless email-domain allow-list
#[derive(Debug, Clone, Default)]
pub struct DomainPolicy {
    /// Configured domain, lowercased; `None` allows every domain
    allowed: Option<String>,
}

impl DomainPolicy {
    /// Build a policy from the configured value; empty or whitespace input
    /// means no restriction.
    pub fn new(allowed_domain: Option<&str>) -> Self {
        let allowed = allowed_domain
            .map(str::trim)
            .filter(|d| !d.is_empty())
            .map(str::to_ascii_lowercase);
        Self { allowed }
    }

    /// Whether any restriction is configured
    pub fn is_restricted(&self) -> bool {
        self.allowed.is_some()
    }

    /// Whether this address may reconcile at all
    pub fn is_allowed(&self, email: &EmailAddress) -> bool {
        match &self.allowed {
            None => true,
            // EmailAddress is already lowercase-normalized.
            Some(domain) => email.domain() == domain,
        }
    }

    /// Raw-string convenience check; malformed addresses are not allowed
    pub fn allows_raw(&self, raw: &str) -> bool {
        match EmailAddress::parse(raw) {
            Ok(email) => self.is_allowed(&email),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn email(raw: &str) -> EmailAddress {
        EmailAddress::parse(raw).unwrap()
    }

    #[test]
    fn unrestricted_allows_everything() {
        let policy = DomainPolicy::new(None);
        assert!(!policy.is_restricted());
        assert!(policy.is_allowed(&email("anyone@anywhere.org")));

        let blank = DomainPolicy::new(Some("   "));
        assert!(!blank.is_restricted());
        assert!(blank.is_allowed(&email("anyone@anywhere.org")));
    }

    #[test]
    fn restricted_matches_domain_case_insensitively() {
        let policy = DomainPolicy::new(Some("Company.com"));
        assert!(policy.is_allowed(&email("user@Company.COM")));
        assert!(policy.is_allowed(&email("user@company.com")));
        assert!(!policy.is_allowed(&email("user@other.com")));
    }

    #[test]
    fn subdomains_do_not_match() {
        let policy = DomainPolicy::new(Some("company.com"));
        assert!(!policy.is_allowed(&email("user@mail.company.com")));
        assert!(!policy.is_allowed(&email("user@company.com.evil.org")));
    }

    #[test]
    fn malformed_raw_input_is_rejected() {
        let policy = DomainPolicy::new(Some("company.com"));
        assert!(!policy.allows_raw("not-an-email"));
        assert!(!policy.allows_raw(""));
        assert!(policy.allows_raw("ok@company.com"));
    }
}
