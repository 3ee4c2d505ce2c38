/**
 * Topics and Resource-Change Events
 *
 * Topics are the listing endpoints a socket client can subscribe to. The
 * wire string of a topic is the route path of that listing, so a client
 * that renders `GET /api/instance` subscribes to `/api/instance` and
 * re-fetches it on every `UPDATE`.
 *
 * `ResourceKind` names what changed on the server. Each kind maps to a
 * fixed set of topics; this table is the only place that decides which
 * listings go stale after a mutation.
 */
use serde::{Deserialize, Serialize};
use std::fmt;

/// A subscribable listing endpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Topic {
    UserList,
    GroupList,
    InstanceList,
}

impl Topic {
    /// Every topic the server publishes
    pub const ALL: [Topic; 3] = [Topic::UserList, Topic::GroupList, Topic::InstanceList];

    /// Wire identifier (the listing route path)
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::UserList => "/api/user",
            Self::GroupList => "/api/group",
            Self::InstanceList => "/api/instance",
        }
    }

    /// Look up a topic by its wire identifier
    pub fn from_path(path: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|topic| topic.as_str() == path)
    }
}

impl AsRef<str> for Topic {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Display for Topic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Kind of server-side change that invalidates one or more listings
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResourceKind {
    /// A user was created, updated, deleted or had authorities changed
    Users,
    /// A group was created, renamed, deleted or had authorities changed
    Groups,
    /// A user joined or left a group
    GroupMembers,
    /// An instance record was created, updated or deleted
    Instances,
    /// An instance was started or stopped
    InstanceState,
}

impl ResourceKind {
    /// Topics whose listing changes when this kind of resource changes
    pub fn topics(&self) -> &'static [Topic] {
        match self {
            Self::Users => &[Topic::UserList],
            Self::Groups | Self::GroupMembers => &[Topic::GroupList],
            Self::Instances | Self::InstanceState => &[Topic::InstanceList],
        }
    }
}
