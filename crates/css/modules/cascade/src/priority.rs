//! Declaration ordering for the cascade.
//! See: <https://www.w3.org/TR/CSS2/cascade.html#cascading-order>

use core::cmp::Ordering;
use css_selectors::Specificity;

/// Where a declaration came from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Origin {
    UserAgent,
    User,
    Author,
    /// The element's own style attribute.
    Inline,
}

/// Priority tuple used to order declarations in the cascade.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CascadePriority {
    pub origin: Origin,
    pub important: bool,
    /// Specificity of the best matching selector of the rule.
    pub specificity: Specificity,
    /// Index of the rule, increasing with insertion order.
    pub source_order: u32,
    /// Index of the declaration inside its rule.
    pub position: u32,
}

impl CascadePriority {
    #[inline]
    pub const fn new(
        origin: Origin,
        important: bool,
        specificity: Specificity,
        source_order: u32,
        position: u32,
    ) -> Self {
        Self {
            origin,
            important,
            specificity,
            source_order,
            position,
        }
    }
}

impl PartialOrd for CascadePriority {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for CascadePriority {
    /// `Ordering::Greater` when `self` wins over `other`.
    fn cmp(&self, other: &Self) -> Ordering {
        origin_rank(self.origin, self.important)
            .cmp(&origin_rank(other.origin, other.important))
            .then(self.specificity.cmp(&other.specificity))
            .then(self.source_order.cmp(&other.source_order))
            .then(self.position.cmp(&other.position))
    }
}

/// Rank origins with importance folded in; important declarations reverse the
/// origin order so user and user-agent importance beat author importance.
const fn origin_rank(origin: Origin, important: bool) -> u8 {
    match (important, origin) {
        (false, Origin::UserAgent) => 0,
        (false, Origin::User) => 1,
        (false, Origin::Author) => 2,
        (false, Origin::Inline) => 3,
        (true, Origin::Author) => 4,
        (true, Origin::Inline) => 5,
        (true, Origin::User) => 6,
        (true, Origin::UserAgent) => 7,
    }
}
