use super::DiffSequence;

/// Lines of a document as interned ids (see
/// [`LineInterner`](crate::matching::LineInterner)).
#[derive(Debug, Clone, Copy)]
pub struct LineSequence<'a> {
    ids: &'a [u32],
}

impl<'a> LineSequence<'a> {
    #[must_use]
    pub const fn new(ids: &'a [u32]) -> Self {
        Self { ids }
    }

    #[must_use]
    pub const fn ids(&self) -> &'a [u32] {
        self.ids
    }
}

impl DiffSequence for LineSequence<'_> {
    fn len(&self) -> usize {
        self.ids.len()
    }

    fn is_same(&self, offset: usize, other: &Self, other_offset: usize) -> bool {
        self.ids[offset] == other.ids[other_offset]
    }
}
