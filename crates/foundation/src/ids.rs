/// Stable index of a drawn map shape (feature order in the source collection).
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ShapeId(pub u32);

impl ShapeId {
    pub fn new(n: u32) -> Self {
        ShapeId(n)
    }

    pub fn index(self) -> usize {
        self.0 as usize
    }
}
