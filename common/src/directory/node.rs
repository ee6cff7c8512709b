use std::fmt;

/// The two container shapes a target name can be found under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContainerKind {
    /// `OU=` entries, the primary search.
    OrganizationalUnit,
    /// `CN=` entries, searched only when the alternate type is enabled.
    Container,
}

impl ContainerKind {
    /// Attribute prefix used for this kind inside a distinguished name.
    pub fn rdn_prefix(self) -> &'static str {
        match self {
            ContainerKind::OrganizationalUnit => "OU",
            ContainerKind::Container => "CN",
        }
    }

    pub fn object_class(self) -> &'static str {
        match self {
            ContainerKind::OrganizationalUnit => "organizationalUnit",
            ContainerKind::Container => "container",
        }
    }

    pub fn naming_attribute(self) -> &'static str {
        match self {
            ContainerKind::OrganizationalUnit => "ou",
            ContainerKind::Container => "cn",
        }
    }
}

impl fmt::Display for ContainerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.object_class())
    }
}

/// A directory container discovered by name.
///
/// Only the two attributes the pipeline needs are kept; identity is the
/// distinguished path.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Node {
    pub distinguished_path: String,
    pub name: String,
}

impl Node {
    pub fn new(distinguished_path: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            distinguished_path: distinguished_path.into(),
            name: name.into(),
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.distinguished_path)
    }
}
