use num_bigint::{BigInt, BigUint, Sign};
use num_traits::{One, Zero};

use crate::{Cell, CellError, CellRef, CellResult, CellSlice, Dictionary, StdAddress, MAX_BITS, MAX_REFS};

/// Append-only cell writer. Every `store_*` checks the 1023 bit / 4 ref
/// limits and returns `&mut Self` so writes chain with `?`.
#[derive(Debug, Clone, Default)]
pub struct CellBuilder {
    data: Vec<u8>,
    bit_len: usize,
    refs: Vec<CellRef>,
}

impl CellBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn bit_len(&self) -> usize {
        self.bit_len
    }

    pub fn refs_len(&self) -> usize {
        self.refs.len()
    }

    fn reserve_bits(&self, bits: usize) -> CellResult<()> {
        if self.bit_len + bits > MAX_BITS {
            return Err(CellError::BitOverflow(self.bit_len + bits));
        }
        Ok(())
    }

    fn push_bit(&mut self, bit: bool) {
        if self.bit_len % 8 == 0 {
            self.data.push(0);
        }
        if bit {
            self.data[self.bit_len / 8] |= 0x80 >> (self.bit_len % 8);
        }
        self.bit_len += 1;
    }

    pub fn store_bit(&mut self, bit: bool) -> CellResult<&mut Self> {
        self.reserve_bits(1)?;
        self.push_bit(bit);
        Ok(self)
    }

    pub fn store_uint(&mut self, value: u64, bits: usize) -> CellResult<&mut Self> {
        if bits > 64 {
            return self.store_big_uint(&BigUint::from(value), bits);
        }
        if bits < 64 && value >> bits != 0 {
            return Err(CellError::ValueTooWide(bits));
        }
        self.reserve_bits(bits)?;
        for i in (0..bits).rev() {
            self.push_bit((value >> i) & 1 == 1);
        }
        Ok(self)
    }

    pub fn store_int(&mut self, value: i64, bits: usize) -> CellResult<&mut Self> {
        self.store_big_int(&BigInt::from(value), bits)
    }

    pub fn store_big_uint(&mut self, value: &BigUint, bits: usize) -> CellResult<&mut Self> {
        if value.bits() > bits as u64 {
            return Err(CellError::ValueTooWide(bits));
        }
        self.reserve_bits(bits)?;
        for i in (0..bits as u64).rev() {
            self.push_bit(value.bit(i));
        }
        Ok(self)
    }

    /// Two's complement encoding in exactly `bits` bits.
    pub fn store_big_int(&mut self, value: &BigInt, bits: usize) -> CellResult<&mut Self> {
        if bits == 0 {
            return match value.is_zero() {
                true => Ok(self),
                false => Err(CellError::ValueTooWide(0)),
            };
        }
        let bound = BigInt::one() << (bits - 1);
        if *value >= bound || *value < -&bound {
            return Err(CellError::ValueTooWide(bits));
        }
        let raw = match value.sign() {
            Sign::Minus => value + (BigInt::one() << bits),
            _ => value.clone(),
        };
        // non-negative after the shift above
        self.store_big_uint(raw.magnitude(), bits)
    }

    /// `VarUInteger max_len`: a byte length prefix followed by the value.
    pub fn store_var_uint(&mut self, value: &BigUint, max_len: usize) -> CellResult<&mut Self> {
        let len = value.bits().div_ceil(8) as usize;
        if len >= max_len {
            return Err(CellError::ValueTooWide((max_len - 1) * 8));
        }
        let prefix = length_prefix_bits(max_len);
        self.reserve_bits(prefix + len * 8)?;
        self.store_uint(len as u64, prefix)?;
        self.store_big_uint(value, len * 8)
    }

    pub fn store_coins(&mut self, value: &BigUint) -> CellResult<&mut Self> {
        self.store_var_uint(value, 16)
    }

    /// Stores the first `bits` bits of `data`.
    pub fn store_bits(&mut self, data: &[u8], bits: usize) -> CellResult<&mut Self> {
        if data.len() * 8 < bits {
            return Err(CellError::NotEnoughBits {
                needed: bits,
                remaining: data.len() * 8,
            });
        }
        self.reserve_bits(bits)?;
        for i in 0..bits {
            self.push_bit(data[i / 8] & (0x80 >> (i % 8)) != 0);
        }
        Ok(self)
    }

    pub fn store_ref(&mut self, cell: CellRef) -> CellResult<&mut Self> {
        if self.refs.len() == MAX_REFS {
            return Err(CellError::RefOverflow);
        }
        self.refs.push(cell);
        Ok(self)
    }

    pub fn store_maybe_ref(&mut self, cell: Option<CellRef>) -> CellResult<&mut Self> {
        match cell {
            Some(cell) => {
                self.reserve_bits(1)?;
                if self.refs.len() == MAX_REFS {
                    return Err(CellError::RefOverflow);
                }
                self.push_bit(true);
                self.refs.push(cell);
            },
            None => {
                self.store_bit(false)?;
            },
        }
        Ok(self)
    }

    pub fn store_dict(&mut self, dict: &Dictionary) -> CellResult<&mut Self> {
        self.store_maybe_ref(dict.root().cloned())
    }

    /// `addr_std` without anycast, or `addr_none` for `None`.
    pub fn store_address(&mut self, address: Option<&StdAddress>) -> CellResult<&mut Self> {
        match address {
            Some(address) => {
                self.reserve_bits(2 + 1 + 8 + 256)?;
                self.store_uint(0b10, 2)?
                    .store_bit(false)?
                    .store_int(i64::from(address.workchain), 8)?
                    .store_bits(&address.hash, 256)
            },
            None => self.store_uint(0, 2),
        }
    }

    /// Appends the bits and references of another builder.
    pub fn store_builder(&mut self, other: &CellBuilder) -> CellResult<&mut Self> {
        if self.refs.len() + other.refs.len() > MAX_REFS {
            return Err(CellError::RefOverflow);
        }
        self.store_bits(&other.data, other.bit_len)?;
        self.refs.extend(other.refs.iter().cloned());
        Ok(self)
    }

    /// Appends what is left unread in `slice`.
    pub fn store_slice(&mut self, slice: &CellSlice) -> CellResult<&mut Self> {
        let mut rest = slice.clone();
        let bits = rest.remaining_bits();
        let data = rest.load_bits(bits)?;
        let mut refs = Vec::with_capacity(rest.remaining_refs());
        while rest.remaining_refs() > 0 {
            refs.push(rest.load_ref()?);
        }
        if self.refs.len() + refs.len() > MAX_REFS {
            return Err(CellError::RefOverflow);
        }
        self.store_bits(&data, bits)?;
        self.refs.extend(refs);
        Ok(self)
    }

    pub fn build(&self) -> CellResult<Cell> {
        Cell::new(self.data.clone(), self.bit_len, self.refs.clone())
    }

    pub fn build_ref(&self) -> CellResult<CellRef> {
        self.build().map(Cell::into_ref)
    }
}

/// Width of the length prefix of `VarUInteger max_len`.
pub(crate) fn length_prefix_bits(max_len: usize) -> usize {
    bit_length(max_len.saturating_sub(1))
}

pub(crate) fn bit_length(value: usize) -> usize {
    (usize::BITS - value.leading_zeros()) as usize
}
