use crate::alphabet::iupac::{CODE_A, CODE_C, CODE_G, CODE_T, LETTER_CODES, complement_code};
use crate::utils::error::{SeqError, SeqResult};
use std::sync::LazyLock;

/// A byte-keyed translation table: byte value to translated value, or nothing when the key
/// is not part of the table.
pub type LookupTable = [Option<u8>; 256];

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Alphabet {
  Dna,
  Rna,
}

/// Forward and inverse lookup tables between ASCII nucleotide letters and encoded codes.
///
/// Encoding accepts both letter cases; decoding produces uppercase. The DNA and RNA codecs
/// differ only in the T/U letter. Each codec is built once and shared.
pub struct ByteCodec {
  alphabet: Alphabet,
  encode: LookupTable,
  decode: LookupTable,
}

static DNA_CODEC: LazyLock<ByteCodec> = LazyLock::new(|| ByteCodec::new(Alphabet::Dna));
static RNA_CODEC: LazyLock<ByteCodec> = LazyLock::new(|| ByteCodec::new(Alphabet::Rna));

impl ByteCodec {
  fn new(alphabet: Alphabet) -> Self {
    let mut encode: LookupTable = [None; 256];
    let mut decode: LookupTable = [None; 256];
    for (letter, code) in LETTER_CODES {
      let letter = match (alphabet, letter) {
        (Alphabet::Rna, b'T') => b'U',
        _ => letter,
      };
      encode[letter as usize] = Some(code);
      encode[letter.to_ascii_lowercase() as usize] = Some(code);
      decode[code as usize] = Some(letter);
    }
    Self { alphabet, encode, decode }
  }

  pub fn dna() -> &'static Self {
    &DNA_CODEC
  }

  pub fn rna() -> &'static Self {
    &RNA_CODEC
  }

  pub fn alphabet(&self) -> Alphabet {
    self.alphabet
  }

  #[inline]
  pub fn encode_byte(&self, byte: u8) -> Option<u8> {
    self.encode[byte as usize]
  }

  #[inline]
  pub fn decode_byte(&self, code: u8) -> Option<u8> {
    self.decode[code as usize]
  }

  /// Copies `seq` through the encoding table.
  pub fn encode(&self, seq: &[u8]) -> SeqResult<Vec<u8>> {
    seq
      .iter()
      .enumerate()
      .map(|(offset, &byte)| {
        self
          .encode_byte(byte)
          .ok_or(SeqError::AlphabetError { offset, byte })
      })
      .collect()
  }

  /// Copies encoded `codes` back to ASCII letters.
  pub fn decode(&self, codes: &[u8]) -> SeqResult<Vec<u8>> {
    codes
      .iter()
      .map(|&code| {
        self
          .decode_byte(code)
          .ok_or(SeqError::KeyNotInLookupTable { byte: code })
      })
      .collect()
  }

  /// The encoded codes of the four primary bases, in child-slot order.
  pub fn base_codes(&self) -> [u8; 4] {
    [CODE_A, CODE_C, CODE_G, CODE_T]
  }

  /// Complement table over encoded codes, e.g. for palindrome lookups.
  pub fn complement_table(&self) -> LookupTable {
    let mut table: LookupTable = [None; 256];
    for (_, code) in LETTER_CODES {
      table[code as usize] = Some(complement_code(code));
    }
    table
  }
}

#[cfg(test)]
mod codec_tests {
  use super::*;
  use eyre::Report;
  use pretty_assertions::assert_eq;
  use rstest::rstest;

  #[rstest]
  #[case(b"ACGTN", b"ACGTN")]
  #[case(b"acgtn", b"ACGTN")]
  #[case(b"MRWSYKVHDB", b"MRWSYKVHDB")]
  fn dna_round_trips(#[case] input: &[u8], #[case] expected: &[u8]) -> Result<(), Report> {
    let codec = ByteCodec::dna();
    let encoded = codec.encode(input)?;
    assert_eq!(codec.decode(&encoded)?, expected.to_vec());
    Ok(())
  }

  #[test]
  fn rna_swaps_t_for_u() -> Result<(), Report> {
    let dna = ByteCodec::dna();
    let rna = ByteCodec::rna();
    assert_eq!(rna.encode(b"ACGU")?, dna.encode(b"ACGT")?);
    assert_eq!(rna.decode(&rna.encode(b"acgu")?)?, b"ACGU".to_vec());
    Ok(())
  }

  #[test]
  fn encode_reports_offending_offset() {
    let err = ByteCodec::dna().encode(b"ACXGT").unwrap_err();
    assert_eq!(err, SeqError::AlphabetError { offset: 2, byte: b'X' });
  }

  #[test]
  fn decode_rejects_unknown_codes() {
    let err = ByteCodec::dna().decode(&[0]).unwrap_err();
    assert_eq!(err, SeqError::KeyNotInLookupTable { byte: 0 });
  }

  #[test]
  fn complement_table_round_trips() -> Result<(), Report> {
    let codec = ByteCodec::dna();
    let table = codec.complement_table();
    let encoded = codec.encode(b"ACGTRN")?;
    let complemented: Vec<u8> = encoded.iter().map(|&c| table[c as usize].unwrap()).collect();
    assert_eq!(codec.decode(&complemented)?, b"TGCAYN".to_vec());
    Ok(())
  }
}
