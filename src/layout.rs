//! Sequential layout with natural alignment.
//!
//! Members are placed in declaration order. Each one starts at the next
//! multiple of its alignment, and the aggregate size is rounded up to the
//! largest member alignment. Nothing is reordered or packed.

use tracing::trace;

/// Size and alignment of one laid-out value, in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct LayoutData {
    pub byte_size: u64,
    pub align: u64,
}

impl LayoutData {
    pub fn new(byte_size: u64, align: u64) -> LayoutData {
        debug_assert!(align.is_power_of_two(), "alignment {align} is not a power of two");
        LayoutData { byte_size, align }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LayoutResult {
    /// One offset per member, in declaration order.
    pub offsets: Vec<u64>,
    pub byte_size: u64,
    pub align: u64,
    /// Distance between consecutive elements of an array of this type.
    pub stride: u64,
}

impl LayoutResult {
    /// Layout of a scalar with no members.
    pub fn atom(data: LayoutData) -> LayoutResult {
        LayoutResult {
            offsets: Vec::new(),
            byte_size: data.byte_size,
            align: data.align,
            stride: stride_of(data.byte_size, data.align),
        }
    }

    pub fn data(&self) -> LayoutData {
        LayoutData {
            byte_size: self.byte_size,
            align: self.align,
        }
    }
}

/// Round `offset` up to the next multiple of `align`.
pub fn align_to(offset: u64, align: u64) -> u64 {
    debug_assert!(align.is_power_of_two());
    (offset + align - 1) & !(align - 1)
}

fn stride_of(byte_size: u64, align: u64) -> u64 {
    align_to(byte_size.max(1), align)
}

pub fn layout_sequential(members: &[LayoutData]) -> LayoutResult {
    let mut offset = 0;
    let mut max_align = 1;
    let mut offsets = Vec::with_capacity(members.len());

    for member in members {
        offset = align_to(offset, member.align);
        offsets.push(offset);

        offset += member.byte_size;
        max_align = max_align.max(member.align);
    }

    let byte_size = align_to(offset, max_align);

    trace!(?offsets, byte_size, align = max_align, "sequential layout");

    LayoutResult {
        offsets,
        byte_size,
        align: max_align,
        stride: stride_of(byte_size, max_align),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data(pairs: &[(u64, u64)]) -> Vec<LayoutData> {
        pairs.iter().map(|&(s, a)| LayoutData::new(s, a)).collect()
    }

    #[test]
    fn int_bool_float_bool_int16() {
        let result = layout_sequential(&data(&[(8, 8), (1, 1), (4, 4), (1, 1), (2, 2)]));

        assert_eq!(result.offsets, vec![0, 8, 12, 16, 18]);
        assert_eq!(result.byte_size, 24);
        assert_eq!(result.align, 8);
        assert_eq!(result.stride, 24);
    }

    #[test]
    fn padding_goes_before_the_member_that_needs_it() {
        let result = layout_sequential(&data(&[(1, 1), (2, 2), (1, 1), (4, 4)]));

        assert_eq!(result.offsets, vec![0, 2, 4, 8]);
        assert_eq!(result.byte_size, 12);
    }

    #[test]
    fn empty_aggregate_has_zero_size_and_unit_alignment() {
        let result = layout_sequential(&[]);

        assert!(result.offsets.is_empty());
        assert_eq!(result.byte_size, 0);
        assert_eq!(result.align, 1);
        assert_eq!(result.stride, 1);
    }

    #[test]
    fn zero_sized_members_share_an_offset() {
        let result = layout_sequential(&data(&[(0, 1), (0, 1), (1, 1)]));

        assert_eq!(result.offsets, vec![0, 0, 0]);
        assert_eq!(result.byte_size, 1);
    }

    #[test]
    fn same_input_gives_same_layout() {
        let members = data(&[(2, 2), (8, 8), (1, 1)]);

        assert_eq!(layout_sequential(&members), layout_sequential(&members));
    }

    #[test]
    fn offsets_respect_alignment_and_do_not_overlap() {
        let members = data(&[(1, 1), (8, 8), (2, 2), (4, 4), (1, 1), (16, 8)]);
        let result = layout_sequential(&members);

        for (i, member) in members.iter().enumerate() {
            assert_eq!(result.offsets[i] % member.align, 0);

            if let Some(next) = result.offsets.get(i + 1) {
                assert!(result.offsets[i] + member.byte_size <= *next);
            }
        }

        assert_eq!(result.byte_size % result.align, 0);
    }

    #[test]
    fn align_to_rounds_up() {
        assert_eq!(align_to(0, 8), 0);
        assert_eq!(align_to(9, 4), 12);
        assert_eq!(align_to(12, 4), 12);
        assert_eq!(align_to(17, 1), 17);
    }
}
