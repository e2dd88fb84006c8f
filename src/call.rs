//! What a handler receives.

use std::fmt;
use std::ops::Range;

use serde::Serialize;

use crate::auth::AuthContext;
use crate::request::Request;

/// A resource id taken from the URL, typed per resource.
///
/// Serializes as the bare number or string.
#[derive(Clone, Debug, Eq, Hash, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ResourceId {
    Int(i64),
    Str(String),
}

impl ResourceId {
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Self::Int(id) => Some(*id),
            Self::Str(_) => None,
        }
    }
}

impl fmt::Display for ResourceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(id) => write!(f, "{id}"),
            Self::Str(id) => f.write_str(id),
        }
    }
}

/// Which URL shape the request arrived on.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Target {
    /// `/{version}/{resource}/`
    Collection,
    /// `/{version}/{resource}/{lower};{upper}`, raw 1-based bounds.
    Range { lower: i64, upper: i64 },
    /// `/{version}/{resource}/{id}`
    Item(ResourceId),
}

/// One handler invocation: the authenticated caller, the request and the
/// URL parameters.
#[derive(Debug)]
pub struct Call {
    auth: AuthContext,
    request: Request,
    target: Target,
    paging: Paging,
}

/// List window limits a resource applies to its collection requests.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub(crate) struct Paging {
    pub default_window: i64,
    pub max_window: i64,
}

impl Call {
    pub(crate) fn new(auth: AuthContext, request: Request, target: Target, paging: Paging) -> Self {
        Self { auth, request, target, paging }
    }

    pub fn auth(&self) -> &AuthContext { &self.auth }
    pub fn request(&self) -> &Request { &self.request }
    pub fn target(&self) -> &Target { &self.target }

    /// The id for item requests.
    pub fn id(&self) -> Option<&ResourceId> {
        match &self.target {
            Target::Item(id) => Some(id),
            _ => None,
        }
    }

    /// The 0-based half-open window a list request asks for.
    ///
    /// Range bounds are 1-based in the URL and shifted down by one; a bare
    /// collection request uses `1;default_window`. `None` when the window is
    /// empty, starts below zero or is wider than the resource's maximum, and
    /// for item requests.
    pub fn window(&self) -> Option<Range<i64>> {
        let (lower, upper) = match self.target {
            Target::Collection => (1, self.paging.default_window),
            Target::Range { lower, upper } => (lower, upper),
            Target::Item(_) => return None,
        };
        let (lower, upper) = (lower.checked_sub(1)?, upper.checked_sub(1)?);
        if lower < 0 || lower >= upper {
            return None;
        }
        (upper - lower <= self.paging.max_window).then_some(lower..upper)
    }
}
