//! User context and role handling.
//!
//! The original dashboard read its user from a process-wide session store;
//! here the context is an explicit value handed to whatever needs it, which
//! keeps role behavior deterministic and testable.

/// Access level of the current user.
///
/// Parsed from free-form sheet/session text, so parsing is deliberately
/// forgiving about case, padding and spacing, and anything unrecognized
/// falls back to the least-privileged level.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Role {
    #[default]
    User,
    Admin,
    SuperAdmin,
}

impl Role {
    /// Parses a raw role string: lowercased, trimmed, inner whitespace
    /// collapsed to underscores ("Super Admin" and "super_admin" are the
    /// same role).
    pub fn parse(raw: &str) -> Self {
        let normalized: String = raw
            .trim()
            .to_lowercase()
            .split_whitespace()
            .collect::<Vec<_>>()
            .join("_");
        match normalized.as_str() {
            "admin" => Self::Admin,
            "superadmin" | "super_admin" => Self::SuperAdmin,
            _ => Self::User,
        }
    }

    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::SuperAdmin => "super_admin",
        }
    }

    /// Admins and super admins both clear this check.
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin | Self::SuperAdmin)
    }

    pub const fn is_super_admin(self) -> bool {
        matches!(self, Self::SuperAdmin)
    }
}

/// Case-insensitive, whitespace-trimmed exact equality - the only kind of
/// name matching this system does. No fuzzy or partial matches.
pub fn names_match(left: &str, right: &str) -> bool {
    left.trim().eq_ignore_ascii_case(right.trim())
}

/// The current user, passed explicitly into every role-aware function.
#[derive(Clone, Debug)]
pub struct Session {
    pub username: String,
    pub role: Role,
}

impl Session {
    pub fn new(username: impl Into<String>, role: Role) -> Self {
        Self { username: username.into(), role }
    }

    /// True when the given name refers to this user.
    pub fn is_named(&self, name: &str) -> bool {
        names_match(&self.username, name)
    }

    /// True when the user may see every record rather than only their own.
    pub fn can_see_all(&self) -> bool {
        self.role.is_admin()
    }

    /// Development-only escalation for exercising admin-gated paths against
    /// a test sheet. Compiled exclusively into debug builds; release builds
    /// contain no way to bypass role checks.
    #[cfg(debug_assertions)]
    pub fn force_super_admin(&mut self) {
        self.role = Role::SuperAdmin;
    }
}
