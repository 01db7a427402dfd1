use super::id::HumanBone;
use static_assertions::const_assert;

// Every role must fit in one bit of the mask word.
const_assert!(HumanBone::COUNT <= 64);

/// Set of humanoid roles.
/// Uses a bitset where bit i corresponds to the HumanBone with index i.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct BoneMask(u64);

impl BoneMask {
    pub const EMPTY: BoneMask = BoneMask(0);

    /// Mask containing every role
    pub const fn all() -> Self {
        Self((1u64 << HumanBone::COUNT) - 1)
    }

    /// Build a mask from a list of roles
    pub const fn from_bones(bones: &[HumanBone]) -> Self {
        let mut bits = 0u64;
        let mut i = 0;
        while i < bones.len() {
            bits |= 1u64 << bones[i].index();
            i += 1;
        }
        Self(bits)
    }

    /// Check if a role is in the set
    #[inline]
    pub const fn contains(&self, bone: HumanBone) -> bool {
        (self.0 & (1u64 << bone.index())) != 0
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.0 == 0
    }

    #[inline]
    pub const fn len(&self) -> usize {
        self.0.count_ones() as usize
    }

    /// Return a new mask with the role added
    #[inline]
    pub const fn with(self, bone: HumanBone) -> Self {
        Self(self.0 | (1u64 << bone.index()))
    }

    /// Return a new mask with the role removed
    #[inline]
    pub const fn without(self, bone: HumanBone) -> Self {
        Self(self.0 & !(1u64 << bone.index()))
    }

    #[inline]
    pub const fn union(self, other: BoneMask) -> Self {
        Self(self.0 | other.0)
    }

    #[inline]
    pub const fn intersection(self, other: BoneMask) -> Self {
        Self(self.0 & other.0)
    }

    #[inline]
    pub const fn is_subset_of(&self, other: &BoneMask) -> bool {
        self.0 & !other.0 == 0
    }

    /// Roles in the set, in topological order
    pub fn iter(self) -> impl Iterator<Item = HumanBone> {
        HumanBone::ALL
            .into_iter()
            .filter(move |bone| self.contains(*bone))
    }
}

impl FromIterator<HumanBone> for BoneMask {
    fn from_iter<I: IntoIterator<Item = HumanBone>>(iter: I) -> Self {
        iter.into_iter().fold(BoneMask::EMPTY, BoneMask::with)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_with_and_without() {
        let mask = BoneMask::EMPTY
            .with(HumanBone::Hips)
            .with(HumanBone::RightLittleDistal);
        assert!(mask.contains(HumanBone::Hips));
        assert!(mask.contains(HumanBone::RightLittleDistal));
        assert!(!mask.contains(HumanBone::Head));
        assert_eq!(mask.len(), 2);

        let mask = mask.without(HumanBone::Hips);
        assert!(!mask.contains(HumanBone::Hips));
        assert_eq!(mask.len(), 1);
    }

    #[test]
    fn test_all_covers_every_role() {
        let all = BoneMask::all();
        assert_eq!(all.len(), HumanBone::COUNT);
        for bone in HumanBone::ALL {
            assert!(all.contains(bone));
        }
    }

    #[test]
    fn test_subset() {
        let small = BoneMask::from_bones(&[HumanBone::Hips, HumanBone::Spine]);
        let big = small.with(HumanBone::Head);
        assert!(small.is_subset_of(&big));
        assert!(!big.is_subset_of(&small));
        assert!(BoneMask::EMPTY.is_subset_of(&small));
    }

    #[test]
    fn test_iter_is_topological() {
        let mask: BoneMask = [HumanBone::Head, HumanBone::Hips, HumanBone::LeftFoot]
            .into_iter()
            .collect();
        let order: Vec<_> = mask.iter().collect();
        assert_eq!(
            order,
            vec![HumanBone::Hips, HumanBone::Head, HumanBone::LeftFoot]
        );
    }
}
