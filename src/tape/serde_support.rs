use serde::ser::SerializeStruct;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::float::Float;
use crate::op::Op;

use super::Tape;

impl<F: Float + Serialize> Serialize for Tape<F> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut s = serializer.serialize_struct("Tape", 3)?;
        s.serialize_field("ops", &self.ops)?;
        s.serialize_field("indeps", &self.indeps)?;
        s.serialize_field("deps", &self.deps)?;
        s.end()
    }
}

impl<'de, F: Float + Deserialize<'de>> Deserialize<'de> for Tape<F> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        #[derive(Deserialize)]
        struct TapeData<F> {
            ops: Vec<Op<F>>,
            indeps: Vec<u32>,
            deps: Vec<u32>,
        }

        let data = TapeData::<F>::deserialize(deserializer)?;
        // Revalidate the structural invariants and recompute the cached
        // switching count; serialized data is not trusted.
        Tape::try_from_parts(data.ops, data.indeps, data.deps).map_err(serde::de::Error::custom)
    }
}
