//! Compact membership claim codec.
//!
//! Memberships travel inside the access token as a compact JSON string with
//! single-letter field names. Decoding is fail-soft: a malformed payload
//! yields an empty membership list, because callers treat "no access" as the
//! safe default.

use serde::{Deserialize, Serialize};

/// Role label used for the administrative pseudo-context injected for
/// platform admins acting outside any specific team.
pub const PLATFORM_ADMIN_ROLE: &str = "platform-admin";

/// A team member's role, ranked by privilege.
///
/// The ranking is explicit and named: `Owner` outranks `Admin` outranks
/// `Member`. The legacy numeric encoding is inverted from intuition
/// (`1` = Owner, `3` = Member) and is handled in [`TeamRole::from_str`],
/// never by comparing raw numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TeamRole {
    Owner,
    Admin,
    Member,
}

impl TeamRole {
    /// Privilege rank, higher means more privileged.
    pub fn rank(&self) -> u8 {
        match self {
            Self::Owner => 3,
            Self::Admin => 2,
            Self::Member => 1,
        }
    }

    /// Returns true if this role is at least as privileged as `required`.
    pub fn satisfies(&self, required: TeamRole) -> bool {
        self.rank() >= required.rank()
    }

    /// Convert to string for storage and claims.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Owner => "owner",
            Self::Admin => "admin",
            Self::Member => "member",
        }
    }

    /// Parse from storage or claim string.
    ///
    /// Accepts role names and the legacy numeric encoding where a *lower*
    /// number means a *higher* privilege: `"1"` is Owner, `"3"` is Member.
    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "owner" | "Owner" | "1" => Some(Self::Owner),
            "admin" | "Admin" | "2" => Some(Self::Admin),
            "member" | "Member" | "3" => Some(Self::Member),
            _ => None,
        }
    }
}

impl PartialOrd for TeamRole {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for TeamRole {
    fn cmp(&self, other: &Self) -> std::cmp::Ordering {
        self.rank().cmp(&other.rank())
    }
}

/// Business label for a membership. Carries no access-control weight.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberType {
    Coach,
    Athlete,
    Parent,
}

impl MemberType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Coach => "coach",
            Self::Athlete => "athlete",
            Self::Parent => "parent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "coach" | "Coach" => Some(Self::Coach),
            "athlete" | "Athlete" => Some(Self::Athlete),
            "parent" | "Parent" => Some(Self::Parent),
            _ => None,
        }
    }
}

/// Role carried in a claim: either a concrete team role or the reserved
/// administrative pseudo-role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimRole {
    Team(TeamRole),
    PlatformAdmin,
}

impl ClaimRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Team(role) => role.as_str(),
            Self::PlatformAdmin => PLATFORM_ADMIN_ROLE,
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        if s == PLATFORM_ADMIN_ROLE {
            return Some(Self::PlatformAdmin);
        }
        TeamRole::from_str(s).map(Self::Team)
    }

    /// Returns the concrete team role, if any.
    pub fn team_role(&self) -> Option<TeamRole> {
        match self {
            Self::Team(role) => Some(*role),
            Self::PlatformAdmin => None,
        }
    }
}

/// One entry of the membership list carried in an access token.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MembershipClaim {
    pub team_id: i64,
    /// Missing on legacy records issued before subdomains were added.
    pub team_subdomain: Option<String>,
    pub role: ClaimRole,
    pub member_type: Option<MemberType>,
}

impl MembershipClaim {
    /// The pseudo-membership injected for platform admins acting without a
    /// specific team context.
    pub fn platform_admin() -> Self {
        Self {
            team_id: 0,
            team_subdomain: None,
            role: ClaimRole::PlatformAdmin,
            member_type: None,
        }
    }

    /// Returns true if this claim matches the given team, by id or subdomain.
    pub fn matches_team(&self, team_id: i64, subdomain: &str) -> bool {
        self.team_id == team_id
            || self
                .team_subdomain
                .as_deref()
                .is_some_and(|s| s.eq_ignore_ascii_case(subdomain))
    }
}

/// Wire representation with single-letter keys for compactness.
#[derive(Serialize, Deserialize)]
struct WireEntry {
    t: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    s: Option<String>,
    r: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    m: Option<String>,
}

/// Encodes a membership list into the compact claim string.
pub fn encode_memberships(memberships: &[MembershipClaim]) -> String {
    let wire: Vec<WireEntry> = memberships
        .iter()
        .map(|m| WireEntry {
            t: m.team_id,
            s: m.team_subdomain.clone(),
            r: m.role.as_str().to_owned(),
            m: m.member_type.map(|mt| mt.as_str().to_owned()),
        })
        .collect();

    serde_json::to_string(&wire).unwrap_or_else(|_| "[]".to_owned())
}

/// Decodes the compact claim string into a membership list.
///
/// Fail-soft: an unparseable payload yields an empty list, and
/// individual entries with unrecognized roles are skipped. An unrecognized
/// member type is kept as `None` since the label carries no access weight.
pub fn decode_memberships(encoded: &str) -> Vec<MembershipClaim> {
    let wire: Vec<WireEntry> = match serde_json::from_str(encoded) {
        Ok(entries) => entries,
        Err(_) => return Vec::new(),
    };

    wire.into_iter()
        .filter_map(|entry| {
            let role = ClaimRole::from_str(&entry.r)?;
            Some(MembershipClaim {
                team_id: entry.t,
                team_subdomain: entry.s,
                role,
                member_type: entry.m.as_deref().and_then(MemberType::from_str),
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn claim(team_id: i64, subdomain: &str, role: TeamRole, member_type: MemberType) -> MembershipClaim {
        MembershipClaim {
            team_id,
            team_subdomain: Some(subdomain.to_owned()),
            role: ClaimRole::Team(role),
            member_type: Some(member_type),
        }
    }

    #[test]
    fn test_role_ranking_owner_highest() {
        assert!(TeamRole::Owner > TeamRole::Admin);
        assert!(TeamRole::Admin > TeamRole::Member);
        assert!(TeamRole::Owner.satisfies(TeamRole::Member));
        assert!(TeamRole::Owner.satisfies(TeamRole::Owner));
        assert!(!TeamRole::Member.satisfies(TeamRole::Admin));
    }

    #[test]
    fn test_legacy_numeric_roles_are_inverted() {
        // The source system stored Owner=1, Admin=2, Member=3. A lower
        // number means a higher privilege; this must never be compared
        // numerically.
        assert_eq!(TeamRole::from_str("1"), Some(TeamRole::Owner));
        assert_eq!(TeamRole::from_str("2"), Some(TeamRole::Admin));
        assert_eq!(TeamRole::from_str("3"), Some(TeamRole::Member));
        assert_eq!(TeamRole::from_str("0"), None);
        assert_eq!(TeamRole::from_str("4"), None);
    }

    #[test]
    fn test_roundtrip_empty() {
        let encoded = encode_memberships(&[]);
        assert_eq!(decode_memberships(&encoded), vec![]);
    }

    #[test]
    fn test_roundtrip_multiple_entries() {
        let memberships = vec![
            claim(1, "eagles", TeamRole::Owner, MemberType::Coach),
            claim(2, "hawks", TeamRole::Member, MemberType::Athlete),
            claim(3, "owls", TeamRole::Admin, MemberType::Parent),
        ];

        let decoded = decode_memberships(&encode_memberships(&memberships));
        assert_eq!(decoded, memberships);
    }

    #[test]
    fn test_roundtrip_partial_record() {
        // Legacy entries may lack subdomain and member type.
        let memberships = vec![MembershipClaim {
            team_id: 9,
            team_subdomain: None,
            role: ClaimRole::Team(TeamRole::Member),
            member_type: None,
        }];

        let decoded = decode_memberships(&encode_memberships(&memberships));
        assert_eq!(decoded, memberships);
    }

    #[test]
    fn test_roundtrip_platform_admin_pseudo_context() {
        let memberships = vec![MembershipClaim::platform_admin()];
        let decoded = decode_memberships(&encode_memberships(&memberships));
        assert_eq!(decoded, memberships);
        assert_eq!(decoded[0].role, ClaimRole::PlatformAdmin);
    }

    #[test]
    fn test_decode_garbage_yields_empty() {
        assert_eq!(decode_memberships("not json at all"), vec![]);
        assert_eq!(decode_memberships("{\"t\":1}"), vec![]);
        assert_eq!(decode_memberships(""), vec![]);
    }

    #[test]
    fn test_decode_skips_unknown_role() {
        let encoded = r#"[{"t":1,"s":"eagles","r":"owner"},{"t":2,"r":"superuser"}]"#;
        let decoded = decode_memberships(encoded);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].team_id, 1);
    }

    #[test]
    fn test_decode_numeric_role() {
        let encoded = r#"[{"t":5,"r":"1"}]"#;
        let decoded = decode_memberships(encoded);
        assert_eq!(decoded[0].role, ClaimRole::Team(TeamRole::Owner));
    }

    #[test]
    fn test_decode_unknown_member_type_kept_as_none() {
        let encoded = r#"[{"t":5,"r":"member","m":"mascot"}]"#;
        let decoded = decode_memberships(encoded);
        assert_eq!(decoded.len(), 1);
        assert_eq!(decoded[0].member_type, None);
    }

    #[test]
    fn test_matches_team_by_id_or_subdomain() {
        let m = claim(7, "eagles", TeamRole::Member, MemberType::Athlete);
        assert!(m.matches_team(7, "other"));
        assert!(m.matches_team(0, "eagles"));
        assert!(m.matches_team(0, "EAGLES"));
        assert!(!m.matches_team(8, "hawks"));
    }
}
