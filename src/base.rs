pub type ImpactValue = f32;
pub type DocId = u64;
