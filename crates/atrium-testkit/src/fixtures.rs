//! Fixture builders
//!
//! Small constructors with sensible defaults so tests spell out only what
//! they assert on.

use atrium_core::{Account, EmailAddress, Invitation, InvitationId, PersonName, Role};
use chrono::{DateTime, Duration, Utc};

/// An unused invitation issued at `now` by `admin@acme.com`, valid 7 days
pub fn active_invitation(email: &str, role: Role, now: DateTime<Utc>) -> Invitation {
    Invitation {
        id: InvitationId::new(),
        email: EmailAddress::parse(email).unwrap(),
        intended_role: role,
        invited_by: EmailAddress::parse("admin@acme.com").unwrap(),
        invited_at: now,
        expires_at: now + Duration::days(7),
        is_used: false,
        used_at: None,
    }
}

/// An invitation that already expired a day before `now`
pub fn expired_invitation(email: &str, role: Role, now: DateTime<Utc>) -> Invitation {
    Invitation {
        expires_at: now - Duration::days(1),
        invited_at: now - Duration::days(8),
        ..active_invitation(email, role, now)
    }
}

/// An admin-created account that has never signed in
pub fn provisioned_account(
    email: &str,
    display_name: &str,
    role: Role,
    now: DateTime<Utc>,
) -> Account {
    Account::provisioned(
        EmailAddress::parse(email).unwrap(),
        PersonName::from_display_name(display_name),
        role,
        now,
    )
}
