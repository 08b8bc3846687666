use std::{fmt, sync::Arc};

use sha2::{Digest, Sha256};

use crate::{CellError, CellResult};

pub const MAX_BITS: usize = 1023;
pub const MAX_REFS: usize = 4;
pub const MAX_DEPTH: u16 = 1024;

const MERKLE_PROOF_TYPE: u8 = 3;
const MERKLE_PROOF_BITS: usize = 8 + 256 + 16;

pub type CellRef = Arc<Cell>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CellKind {
    Ordinary,
    MerkleProof,
}

/// Immutable cell. The representation hash and depth are computed once at
/// construction, so sharing a cell through [`CellRef`] is free.
#[derive(Clone)]
pub struct Cell {
    kind: CellKind,
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<CellRef>,
    hash: [u8; 32],
    depth: u16,
}

impl Cell {
    pub fn new(data: Vec<u8>, bit_len: usize, refs: Vec<CellRef>) -> CellResult<Self> {
        Self::with_kind(CellKind::Ordinary, data, bit_len, refs)
    }

    /// Wraps `child` into a merkle proof that includes the whole subtree.
    pub fn merkle_proof(child: CellRef) -> CellResult<Self> {
        let mut data = Vec::with_capacity(MERKLE_PROOF_BITS / 8);
        data.push(MERKLE_PROOF_TYPE);
        data.extend_from_slice(child.hash());
        data.extend_from_slice(&child.depth().to_be_bytes());

        Self::with_kind(CellKind::MerkleProof, data, MERKLE_PROOF_BITS, vec![child])
    }

    pub(crate) fn with_kind(
        kind: CellKind,
        mut data: Vec<u8>,
        bit_len: usize,
        refs: Vec<CellRef>,
    ) -> CellResult<Self> {
        if bit_len > MAX_BITS {
            return Err(CellError::BitOverflow(bit_len));
        }
        if refs.len() > MAX_REFS {
            return Err(CellError::RefOverflow);
        }
        let byte_len = bit_len.div_ceil(8);
        if data.len() < byte_len {
            return Err(CellError::NotEnoughBits {
                needed: bit_len,
                remaining: data.len() * 8,
            });
        }
        data.truncate(byte_len);
        if bit_len % 8 != 0 {
            // bits past the end must not leak into the hash
            let last = byte_len - 1;
            data[last] &= 0xffu8 << (8 - bit_len % 8);
        }

        if kind == CellKind::MerkleProof {
            Self::check_merkle_proof(&data, bit_len, &refs)?;
        }

        let depth = match refs.iter().map(|r| r.depth).max() {
            Some(child) if child >= MAX_DEPTH => return Err(CellError::DepthOverflow),
            Some(child) => child + 1,
            None => 0,
        };

        let mut cell = Cell {
            kind,
            data,
            bit_len,
            refs,
            hash: [0u8; 32],
            depth,
        };
        cell.hash = cell.representation_hash();
        Ok(cell)
    }

    fn check_merkle_proof(data: &[u8], bit_len: usize, refs: &[CellRef]) -> CellResult<()> {
        if bit_len != MERKLE_PROOF_BITS || refs.len() != 1 || data[0] != MERKLE_PROOF_TYPE {
            return Err(CellError::UnsupportedExotic(data.first().copied().unwrap_or(0)));
        }
        let child = &refs[0];
        if data[1..33] != child.hash[..] || data[33..35] != child.depth.to_be_bytes() {
            return Err(CellError::InvalidBoc("merkle proof does not match its child"));
        }
        Ok(())
    }

    pub fn kind(&self) -> CellKind {
        self.kind
    }

    pub fn is_exotic(&self) -> bool {
        self.kind != CellKind::Ordinary
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn refs(&self) -> &[CellRef] {
        &self.refs
    }

    pub fn reference(&self, index: usize) -> Option<&CellRef> {
        self.refs.get(index)
    }

    pub fn hash(&self) -> &[u8; 32] {
        &self.hash
    }

    pub fn hash_hex(&self) -> String {
        hex::encode(self.hash)
    }

    pub fn depth(&self) -> u16 {
        self.depth
    }

    pub fn into_ref(self) -> CellRef {
        Arc::new(self)
    }

    pub(crate) fn descriptors(&self) -> [u8; 2] {
        let exotic = if self.is_exotic() { 8 } else { 0 };
        let d1 = self.refs.len() as u8 + exotic;
        let d2 = (self.bit_len / 8 + self.bit_len.div_ceil(8)) as u8;
        [d1, d2]
    }

    /// Data bytes with the completion tag appended when the length is not
    /// byte aligned.
    pub(crate) fn padded_data(&self) -> Vec<u8> {
        let mut out = self.data.clone();
        if self.bit_len % 8 != 0 {
            let last = out.len() - 1;
            out[last] |= 0x80 >> (self.bit_len % 8);
        }
        out
    }

    fn representation_hash(&self) -> [u8; 32] {
        let mut hasher = Sha256::new();
        hasher.update(self.descriptors());
        hasher.update(self.padded_data());
        for child in &self.refs {
            hasher.update(child.depth.to_be_bytes());
        }
        for child in &self.refs {
            hasher.update(child.hash);
        }
        hasher.finalize().into()
    }
}

impl PartialEq for Cell {
    fn eq(&self, other: &Self) -> bool {
        self.hash == other.hash
    }
}

impl Eq for Cell {}

impl fmt::Debug for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Cell")
            .field("kind", &self.kind)
            .field("bits", &self.bit_len)
            .field("data", &hex::encode(&self.data))
            .field("refs", &self.refs)
            .finish()
    }
}
