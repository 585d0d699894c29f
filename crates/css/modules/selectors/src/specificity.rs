//! CSS 2 selector specificity.
//! See: <https://www.w3.org/TR/CSS2/cascade.html#specificity>

use core::iter::Sum;
use core::ops::Add;

/// Specificity packed into one additive integer: ids in bits 16 and up,
/// attributes, classes and pseudo-classes in bits 8 to 15, element names below.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Specificity(pub u32);

impl Specificity {
    /// Universal selector and pseudo-elements.
    pub const ZERO: Self = Self(0);
    /// A named element selector.
    pub const ELEMENT: Self = Self(1);
    /// Attribute, class, lang and pseudo-class conditions.
    pub const ATTRIBUTE: Self = Self(1 << 8);
    /// An id condition.
    pub const ID: Self = Self(1 << 16);

    /// Raw packed value.
    pub const fn value(self) -> u32 {
        self.0
    }
}

impl Add for Specificity {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self(self.0.saturating_add(rhs.0))
    }
}

impl Sum for Specificity {
    fn sum<I: Iterator<Item = Self>>(iter: I) -> Self {
        iter.fold(Self::ZERO, Add::add)
    }
}

#[cfg(test)]
mod tests {
    use super::Specificity;

    #[test]
    fn weights_are_additive() {
        let total: Specificity = [Specificity::ID, Specificity::ATTRIBUTE, Specificity::ELEMENT]
            .into_iter()
            .sum();
        assert_eq!(total.value(), 65_793);
        assert!(Specificity::ID > Specificity::ATTRIBUTE + Specificity::ATTRIBUTE);
    }
}
