//! Roles, permissions and the role→permission matrix

use std::fmt;

/// User role
///
/// Stored as a wire string on the user record. Anything that is not an exact
/// match for a known role string resolves to [`Role::NonUser`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Role {
    #[default]
    NonUser,
    User,
    Admin,
}

impl Role {
    pub const ALL: [Role; 3] = [Role::NonUser, Role::User, Role::Admin];

    pub fn as_str(&self) -> &'static str {
        match self {
            Role::NonUser => "",
            Role::User => "user",
            Role::Admin => "admin",
        }
    }

    /// Permissions granted to this role
    pub fn permissions(&self) -> &'static [Permission] {
        permissions_for(*self)
    }

    pub fn can(&self, permission: Permission) -> bool {
        self.permissions().contains(&permission)
    }

    /// True if every permission is granted; true for an empty list
    pub fn can_all(&self, permissions: &[Permission]) -> bool {
        permissions.iter().all(|p| self.can(*p))
    }

    /// True if at least one permission is granted; false for an empty list
    pub fn can_any(&self, permissions: &[Permission]) -> bool {
        permissions.iter().any(|p| self.can(*p))
    }
}

impl From<&str> for Role {
    fn from(s: &str) -> Self {
        match s {
            "user" => Role::User,
            "admin" => Role::Admin,
            _ => Role::NonUser,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Operation on a word or proposal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Permission {
    ViewWord,
    AddWord,
    DeleteWord,
    ModifyWord,
    AddProposal,
    ViewAllProposal,
    ViewSelfProposal,
    ModifyAllProposal,
    ModifySelfProposal,
    DeleteAllProposal,
    DeleteSelfProposal,
}

impl Permission {
    pub const ALL: [Permission; 11] = [
        Permission::ViewWord,
        Permission::AddWord,
        Permission::DeleteWord,
        Permission::ModifyWord,
        Permission::AddProposal,
        Permission::ViewAllProposal,
        Permission::ViewSelfProposal,
        Permission::ModifyAllProposal,
        Permission::ModifySelfProposal,
        Permission::DeleteAllProposal,
        Permission::DeleteSelfProposal,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Permission::ViewWord => "view:word",
            Permission::AddWord => "add:word",
            Permission::DeleteWord => "delete:word",
            Permission::ModifyWord => "modify:word",
            Permission::AddProposal => "add:proposal",
            Permission::ViewAllProposal => "view-all:proposal",
            Permission::ViewSelfProposal => "view-self:proposal",
            Permission::ModifyAllProposal => "modify-all:proposal",
            Permission::ModifySelfProposal => "modify-self:proposal",
            Permission::DeleteAllProposal => "delete-all:proposal",
            Permission::DeleteSelfProposal => "delete-self:proposal",
        }
    }
}

impl fmt::Display for Permission {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ==================== Permission Matrix ====================

const NON_USER_PERMISSIONS: &[Permission] = &[Permission::ViewWord];

const USER_PERMISSIONS: &[Permission] = &[
    Permission::ViewWord,
    Permission::AddProposal,
    Permission::ViewSelfProposal,
    Permission::ModifySelfProposal,
    Permission::DeleteSelfProposal,
];

const ADMIN_PERMISSIONS: &[Permission] = &Permission::ALL;

/// Look up a role's row of the permission matrix
///
/// The matrix lives in static read-only memory.
pub fn permissions_for(role: Role) -> &'static [Permission] {
    match role {
        Role::NonUser => NON_USER_PERMISSIONS,
        Role::User => USER_PERMISSIONS,
        Role::Admin => ADMIN_PERMISSIONS,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_string_round_trip() {
        for role in Role::ALL {
            assert_eq!(Role::from(role.as_str()), role);
        }
        assert_eq!(Role::NonUser.as_str(), "");
        assert_eq!(Role::User.to_string(), "user");
        assert_eq!(Role::Admin.to_string(), "admin");
    }

    #[test]
    fn test_unknown_role_strings_fail_closed() {
        for input in [
            "Admin", "ADMIN", "aDmIn", "User", "USER", "nada", "non user", "guest", "nonUser",
            " admin", "admin ",
        ] {
            assert_eq!(Role::from(input), Role::NonUser, "{input:?}");
        }
    }

    #[test]
    fn test_role_can() {
        let cases = [
            (Role::NonUser, Permission::ViewWord, true),
            (Role::NonUser, Permission::ModifyWord, false),
            (Role::NonUser, Permission::DeleteWord, false),
            (Role::NonUser, Permission::ViewAllProposal, false),
            (Role::User, Permission::ViewSelfProposal, true),
            (Role::User, Permission::ViewAllProposal, false),
            (Role::User, Permission::DeleteWord, false),
            (Role::User, Permission::ModifySelfProposal, true),
            (Role::Admin, Permission::DeleteAllProposal, true),
            (Role::Admin, Permission::DeleteWord, true),
            (Role::Admin, Permission::ModifyWord, true),
            (Role::Admin, Permission::ViewAllProposal, true),
        ];
        for (role, permission, expected) in cases {
            assert_eq!(role.can(permission), expected, "{role:?} {permission:?}");
        }
    }

    #[test]
    fn test_can_all_and_can_any() {
        assert!(Role::NonUser.can_all(&[Permission::ViewWord]));
        assert!(!Role::NonUser.can_any(&[Permission::ModifyWord]));
        assert!(Role::Admin.can_all(&Permission::ALL));
        assert!(!Role::User.can_all(&Permission::ALL));

        assert!(Role::NonUser.can_any(&[Permission::ViewWord, Permission::ModifyWord]));
        assert!(!Role::NonUser.can_any(&[Permission::DeleteWord, Permission::ModifyWord]));
        assert!(Role::User.can_any(&[
            Permission::ViewSelfProposal,
            Permission::ModifyWord,
            Permission::DeleteAllProposal,
        ]));
        assert!(!Role::User.can_all(&[Permission::ViewWord, Permission::AddWord]));
    }

    #[test]
    fn test_empty_lists_are_vacuous() {
        for role in Role::ALL {
            assert!(role.can_all(&[]));
            assert!(!role.can_any(&[]));
        }
    }

    #[test]
    fn test_can_all_and_any_agree_with_can() {
        for role in Role::ALL {
            for a in Permission::ALL {
                for b in Permission::ALL {
                    let pair = [a, b];
                    assert_eq!(role.can_all(&pair), role.can(a) && role.can(b));
                    assert_eq!(role.can_any(&pair), role.can(a) || role.can(b));
                }
            }
        }
    }

    #[test]
    fn test_roles_are_strictly_nested() {
        let non_user = Role::NonUser.permissions();
        let user = Role::User.permissions();
        let admin = Role::Admin.permissions();

        assert!(non_user.iter().all(|p| user.contains(p)));
        assert!(user.iter().all(|p| admin.contains(p)));
        assert!(non_user.len() < user.len());
        assert!(user.len() < admin.len());
        assert_eq!(admin.len(), 11);
    }

    #[test]
    fn test_permission_names_are_unique() {
        let mut names: Vec<_> = Permission::ALL.iter().map(|p| p.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), Permission::ALL.len());
    }
}
