use crate::geometry::Region;
use crate::r#type::CoordNum;

/// Caller-supplied identifier of an indexed entry.
pub type RecordId = i64;

/// An indexed entry: an identifier paired with the region it occupies.
///
/// Each record is owned by exactly one leaf. Identifiers are not required to be unique, but
/// [`RTree::remove`][crate::rtree::RTree::remove] only deletes the first match it finds.
#[derive(Debug, Clone, PartialEq)]
pub struct Record<N: CoordNum> {
    id: RecordId,
    region: Region<N>,
}

impl<N: CoordNum> Record<N> {
    pub fn new(id: RecordId, region: Region<N>) -> Self {
        Self { id, region }
    }

    pub fn id(&self) -> RecordId {
        self.id
    }

    pub fn region(&self) -> &Region<N> {
        &self.region
    }
}
