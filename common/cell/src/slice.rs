use num_bigint::{BigInt, BigUint};
use num_traits::{One, Zero};

use crate::{
    builder::length_prefix_bits, CellError, CellRef, CellResult, Dictionary, StdAddress,
};

/// Read cursor over a shared cell. Cloning a slice is cheap and yields an
/// independent cursor.
#[derive(Debug, Clone)]
pub struct CellSlice {
    cell: CellRef,
    bit_pos: usize,
    ref_pos: usize,
}

impl CellSlice {
    pub fn new(cell: CellRef) -> Self {
        CellSlice {
            cell,
            bit_pos: 0,
            ref_pos: 0,
        }
    }

    pub fn cell(&self) -> &CellRef {
        &self.cell
    }

    pub fn remaining_bits(&self) -> usize {
        self.cell.bit_len() - self.bit_pos
    }

    pub fn remaining_refs(&self) -> usize {
        self.cell.refs().len() - self.ref_pos
    }

    fn require_bits(&self, bits: usize) -> CellResult<()> {
        if bits > self.remaining_bits() {
            return Err(CellError::NotEnoughBits {
                needed: bits,
                remaining: self.remaining_bits(),
            });
        }
        Ok(())
    }

    fn take_bit(&mut self) -> bool {
        let pos = self.bit_pos;
        self.bit_pos += 1;
        self.cell.data()[pos / 8] & (0x80 >> (pos % 8)) != 0
    }

    pub fn load_bit(&mut self) -> CellResult<bool> {
        self.require_bits(1)?;
        Ok(self.take_bit())
    }

    pub fn skip_bits(&mut self, bits: usize) -> CellResult<()> {
        self.require_bits(bits)?;
        self.bit_pos += bits;
        Ok(())
    }

    pub fn load_uint(&mut self, bits: usize) -> CellResult<u64> {
        if bits > 64 {
            return Err(CellError::ValueTooWide(64));
        }
        self.require_bits(bits)?;
        let mut value = 0u64;
        for _ in 0..bits {
            value = (value << 1) | u64::from(self.take_bit());
        }
        Ok(value)
    }

    pub fn load_int(&mut self, bits: usize) -> CellResult<i64> {
        if bits > 64 {
            return Err(CellError::ValueTooWide(64));
        }
        let raw = self.load_uint(bits)?;
        if bits == 0 || bits == 64 {
            return Ok(raw as i64);
        }
        let sign = 1u64 << (bits - 1);
        Ok(if raw & sign != 0 {
            (i128::from(raw) - (1i128 << bits)) as i64
        } else {
            raw as i64
        })
    }

    pub fn load_big_uint(&mut self, bits: usize) -> CellResult<BigUint> {
        self.require_bits(bits)?;
        let mut value = BigUint::zero();
        for _ in 0..bits {
            value <<= 1u8;
            if self.take_bit() {
                value += 1u8;
            }
        }
        Ok(value)
    }

    pub fn load_big_int(&mut self, bits: usize) -> CellResult<BigInt> {
        let raw = BigInt::from(self.load_big_uint(bits)?);
        if bits > 0 && raw.bit(bits as u64 - 1) {
            return Ok(raw - (BigInt::one() << bits));
        }
        Ok(raw)
    }

    pub fn load_var_uint(&mut self, max_len: usize) -> CellResult<BigUint> {
        let len = self.load_uint(length_prefix_bits(max_len))? as usize;
        self.load_big_uint(len * 8)
    }

    pub fn load_coins(&mut self) -> CellResult<BigUint> {
        self.load_var_uint(16)
    }

    /// Reads `bits` bits into a left-aligned byte buffer.
    pub fn load_bits(&mut self, bits: usize) -> CellResult<Vec<u8>> {
        self.require_bits(bits)?;
        let mut out = vec![0u8; bits.div_ceil(8)];
        for i in 0..bits {
            if self.take_bit() {
                out[i / 8] |= 0x80 >> (i % 8);
            }
        }
        Ok(out)
    }

    pub fn load_ref(&mut self) -> CellResult<CellRef> {
        let cell = self
            .cell
            .reference(self.ref_pos)
            .cloned()
            .ok_or(CellError::NotEnoughRefs)?;
        self.ref_pos += 1;
        Ok(cell)
    }

    pub fn load_maybe_ref(&mut self) -> CellResult<Option<CellRef>> {
        match self.load_bit()? {
            true => self.load_ref().map(Some),
            false => Ok(None),
        }
    }

    /// `HashmapE key_len`: an optional reference to the dictionary root.
    pub fn load_dict(&mut self, key_len: usize) -> CellResult<Dictionary> {
        Ok(Dictionary::new(self.load_maybe_ref()?, key_len))
    }

    /// `addr_std` without anycast, or `None` for `addr_none`.
    pub fn load_address(&mut self) -> CellResult<Option<StdAddress>> {
        match self.load_uint(2)? {
            0b00 => Ok(None),
            0b10 => {
                if self.load_bit()? {
                    return Err(CellError::InvalidAddress("anycast is not supported"));
                }
                let workchain = self.load_int(8)? as i8;
                let raw = self.load_bits(256)?;
                let mut hash = [0u8; 32];
                hash.copy_from_slice(&raw);
                Ok(Some(StdAddress { workchain, hash }))
            },
            _ => Err(CellError::InvalidAddress("only standard addresses are supported")),
        }
    }
}
