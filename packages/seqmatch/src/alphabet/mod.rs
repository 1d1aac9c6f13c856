pub mod codec;
pub mod iupac;

pub use codec::{Alphabet, ByteCodec, LookupTable};
pub use iupac::{CODE_A, CODE_C, CODE_G, CODE_T, ambiguity_mask, codes_compatible, complement_code, is_primary_base};
