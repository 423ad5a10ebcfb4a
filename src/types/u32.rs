/// Index type used for vertex and triangle ids
pub type IndexType = u32;
