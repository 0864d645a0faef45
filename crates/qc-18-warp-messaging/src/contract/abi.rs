//! # ABI Words
//!
//! Minimal Solidity ABI encoding for the warp contract: 32-byte words,
//! left-padded addresses and integers, dynamic `bytes` as offset, length
//! and right-padded data.

use shared_types::Address;

use super::ContractError;

/// ABI word width.
pub const WORD: usize = 32;

/// Word holding `value` right-aligned.
pub fn word_u64(value: u64) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 8..].copy_from_slice(&value.to_be_bytes());
    word
}

/// Word holding an address right-aligned.
pub fn word_address(address: &Address) -> [u8; WORD] {
    let mut word = [0u8; WORD];
    word[WORD - 20..].copy_from_slice(address);
    word
}

/// Word holding a boolean.
pub fn word_bool(value: bool) -> [u8; WORD] {
    word_u64(u64::from(value))
}

/// Length word followed by `data` padded to a word boundary.
pub fn encode_bytes_tail(data: &[u8]) -> Vec<u8> {
    let padded = data.len().div_ceil(WORD) * WORD;
    let mut out = Vec::with_capacity(WORD + padded);
    out.extend_from_slice(&word_u64(data.len() as u64));
    out.extend_from_slice(data);
    out.resize(WORD + padded, 0);
    out
}

/// Reads ABI words from call data or return data.
pub struct AbiReader<'a> {
    data: &'a [u8],
}

impl<'a> AbiReader<'a> {
    /// Reader over `data`, which excludes any selector.
    pub fn new(data: &'a [u8]) -> Self {
        Self { data }
    }

    /// Word number `index`.
    pub fn word(&self, index: usize) -> Result<[u8; WORD], ContractError> {
        let start = index
            .checked_mul(WORD)
            .ok_or(ContractError::InvalidInput("word index overflow"))?;
        self.word_at(start)
    }

    fn word_at(&self, start: usize) -> Result<[u8; WORD], ContractError> {
        let end = start
            .checked_add(WORD)
            .ok_or(ContractError::InvalidInput("offset overflow"))?;
        let slice = self
            .data
            .get(start..end)
            .ok_or(ContractError::InvalidInput("input too short"))?;
        let mut word = [0u8; WORD];
        word.copy_from_slice(slice);
        Ok(word)
    }

    /// Word `index` as a `bytes32`.
    pub fn bytes32(&self, index: usize) -> Result<[u8; 32], ContractError> {
        self.word(index)
    }

    /// Word `index` as an integer no wider than 64 bits.
    pub fn uint(&self, index: usize) -> Result<u64, ContractError> {
        let word = self.word(index)?;
        if word[..WORD - 8].iter().any(|b| *b != 0) {
            return Err(ContractError::InvalidInput("integer out of range"));
        }
        let mut raw = [0u8; 8];
        raw.copy_from_slice(&word[WORD - 8..]);
        Ok(u64::from_be_bytes(raw))
    }

    /// Word `index` as a `uint32`.
    pub fn uint32(&self, index: usize) -> Result<u32, ContractError> {
        u32::try_from(self.uint(index)?)
            .map_err(|_| ContractError::InvalidInput("uint32 out of range"))
    }

    /// Word `index` as a `bool`.
    pub fn boolean(&self, index: usize) -> Result<bool, ContractError> {
        match self.uint(index)? {
            0 => Ok(false),
            1 => Ok(true),
            _ => Err(ContractError::InvalidInput("invalid bool")),
        }
    }

    /// Word `index` as an address.
    pub fn address(&self, index: usize) -> Result<Address, ContractError> {
        let word = self.word(index)?;
        if word[..WORD - 20].iter().any(|b| *b != 0) {
            return Err(ContractError::InvalidInput("dirty address bits"));
        }
        let mut address = [0u8; 20];
        address.copy_from_slice(&word[WORD - 20..]);
        Ok(address)
    }

    /// Dynamic `bytes` whose offset is stored in word `index`.
    pub fn bytes(&self, index: usize) -> Result<Vec<u8>, ContractError> {
        let offset = usize::try_from(self.uint(index)?)
            .map_err(|_| ContractError::InvalidInput("offset out of range"))?;
        let len_word = self.word_at(offset)?;
        let len = AbiReader::new(&len_word).uint(0)?;
        let len =
            usize::try_from(len).map_err(|_| ContractError::InvalidInput("length out of range"))?;
        let start = offset + WORD;
        let end = start
            .checked_add(len)
            .ok_or(ContractError::InvalidInput("length overflow"))?;
        self.data
            .get(start..end)
            .map(<[u8]>::to_vec)
            .ok_or(ContractError::InvalidInput("bytes out of bounds"))
    }

    /// Reader positioned at the tuple whose offset is stored in word
    /// `index`.
    pub fn tuple(&self, index: usize) -> Result<AbiReader<'a>, ContractError> {
        let offset = usize::try_from(self.uint(index)?)
            .map_err(|_| ContractError::InvalidInput("offset out of range"))?;
        self.data
            .get(offset..)
            .map(AbiReader::new)
            .ok_or(ContractError::InvalidInput("tuple out of bounds"))
    }
}
