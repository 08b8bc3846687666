use std::collections::{HashMap, HashSet};

use crate::{Cell, CellError, CellKind, CellRef, CellResult, MAX_REFS};

const BOC_GENERIC_MAGIC: [u8; 4] = [0xb5, 0xee, 0x9c, 0x72];
const HAS_CRC32C: u8 = 0x40;

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl<'a> Reader<'a> {
    fn take(&mut self, len: usize) -> CellResult<&'a [u8]> {
        let end = self
            .pos
            .checked_add(len)
            .filter(|end| *end <= self.bytes.len())
            .ok_or(CellError::InvalidBoc("unexpected end of input"))?;
        let out = &self.bytes[self.pos..end];
        self.pos = end;
        Ok(out)
    }

    fn byte(&mut self) -> CellResult<u8> {
        Ok(self.take(1)?[0])
    }

    fn uint(&mut self, len: usize) -> CellResult<usize> {
        if len > std::mem::size_of::<usize>() {
            return Err(CellError::InvalidBoc("integer field too wide"));
        }
        Ok(self
            .take(len)?
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | usize::from(b)))
    }
}

struct RawCell<'a> {
    exotic: bool,
    data: &'a [u8],
    bit_len: usize,
    refs: Vec<usize>,
}

/// Deserializes a bag of cells and returns its first root.
///
/// Index tables are skipped. A CRC32-C trailer, when flagged, must match the
/// bytes it covers.
pub fn from_boc(bytes: &[u8]) -> CellResult<CellRef> {
    let mut reader = Reader { bytes, pos: 0 };
    if reader.take(4)? != BOC_GENERIC_MAGIC.as_slice() {
        return Err(CellError::InvalidBoc("unknown magic"));
    }

    let flags = reader.byte()?;
    if flags & HAS_CRC32C != 0 {
        reader.bytes = checked_body(bytes)?;
    }
    let has_index = flags & 0x80 != 0;
    let ref_size = usize::from(flags & 0x07);
    let offset_size = usize::from(reader.byte()?);
    if ref_size == 0 || offset_size == 0 {
        return Err(CellError::InvalidBoc("zero field width"));
    }

    let cell_count = reader.uint(ref_size)?;
    let root_count = reader.uint(ref_size)?;
    let _absent = reader.uint(ref_size)?;
    let _total_size = reader.uint(offset_size)?;
    if root_count == 0 {
        return Err(CellError::InvalidBoc("no roots"));
    }
    let root = reader.uint(ref_size)?;
    reader.take((root_count - 1) * ref_size)?;
    if has_index {
        reader.take(cell_count * offset_size)?;
    }

    let mut raw = Vec::with_capacity(cell_count.min(bytes.len()));
    for _ in 0..cell_count {
        raw.push(read_raw_cell(&mut reader, ref_size)?);
    }

    // children always follow their parents, so build back to front
    let mut built: Vec<Option<CellRef>> = vec![None; raw.len()];
    for (index, cell) in raw.iter().enumerate().rev() {
        let mut refs = Vec::with_capacity(cell.refs.len());
        for &child in &cell.refs {
            if child <= index {
                return Err(CellError::InvalidBoc("reference points backwards"));
            }
            let child = built
                .get(child)
                .and_then(Option::clone)
                .ok_or(CellError::InvalidBoc("reference out of range"))?;
            refs.push(child);
        }
        let kind = match cell.exotic {
            true => CellKind::MerkleProof,
            false => CellKind::Ordinary,
        };
        if cell.exotic && cell.data.first() != Some(&3) {
            return Err(CellError::UnsupportedExotic(
                cell.data.first().copied().unwrap_or(0),
            ));
        }
        built[index] = Some(Cell::with_kind(kind, cell.data.to_vec(), cell.bit_len, refs)?.into_ref());
    }

    built
        .get(root)
        .and_then(Option::clone)
        .ok_or(CellError::InvalidBoc("root out of range"))
}

/// `bytes` without its little-endian CRC32-C trailer.
fn checked_body(bytes: &[u8]) -> CellResult<&[u8]> {
    let split = bytes
        .len()
        .checked_sub(4)
        .ok_or(CellError::InvalidBoc("unexpected end of input"))?;
    let (body, trailer) = bytes.split_at(split);
    let expected = u32::from_le_bytes([trailer[0], trailer[1], trailer[2], trailer[3]]);
    if crc32c::crc32c(body) != expected {
        return Err(CellError::InvalidBoc("checksum mismatch"));
    }
    Ok(body)
}

pub fn from_boc_hex(hex_str: &str) -> CellResult<CellRef> {
    let bytes = hex::decode(hex_str.trim()).map_err(|_| CellError::InvalidBoc("invalid hex"))?;
    from_boc(&bytes)
}

fn read_raw_cell<'a>(reader: &mut Reader<'a>, ref_size: usize) -> CellResult<RawCell<'a>> {
    let d1 = reader.byte()?;
    let d2 = reader.byte()?;
    let ref_count = usize::from(d1 & 0x07);
    if ref_count > MAX_REFS {
        return Err(CellError::InvalidBoc("too many references"));
    }
    if d1 >> 5 != 0 {
        return Err(CellError::InvalidBoc("cells with a level are not supported"));
    }
    if d1 & 0x10 != 0 {
        return Err(CellError::InvalidBoc("stored hashes are not supported"));
    }

    let byte_len = usize::from(d2).div_ceil(2);
    let data = reader.take(byte_len)?;
    let bit_len = if d2 % 2 == 0 {
        byte_len * 8
    } else {
        let last = data[byte_len - 1];
        if last == 0 {
            return Err(CellError::InvalidBoc("missing completion tag"));
        }
        byte_len * 8 - last.trailing_zeros() as usize - 1
    };

    let mut refs = Vec::with_capacity(ref_count);
    for _ in 0..ref_count {
        refs.push(reader.uint(ref_size)?);
    }

    Ok(RawCell {
        exotic: d1 & 0x08 != 0,
        data,
        bit_len,
        refs,
    })
}

impl Cell {
    /// Serializes the tree rooted at `self` as a bag of cells without index
    /// or checksum. Identical subtrees are stored once.
    pub fn to_boc(&self) -> Vec<u8> {
        let mut order = Vec::new();
        let mut seen = HashSet::new();
        post_order(self, &mut seen, &mut order);
        order.reverse();

        let index: HashMap<[u8; 32], usize> = order
            .iter()
            .enumerate()
            .map(|(i, cell)| (*cell.hash(), i))
            .collect();
        let ref_size = bytes_needed(order.len());

        let mut body = Vec::new();
        for cell in &order {
            body.extend_from_slice(&cell.descriptors());
            body.extend_from_slice(&cell.padded_data());
            for child in cell.refs() {
                let child_index = index.get(child.hash()).copied().unwrap_or_default();
                body.extend_from_slice(&be_bytes(child_index, ref_size));
            }
        }
        let offset_size = bytes_needed(body.len());

        let mut out = Vec::with_capacity(body.len() + 32);
        out.extend_from_slice(&BOC_GENERIC_MAGIC);
        out.push(ref_size as u8);
        out.push(offset_size as u8);
        out.extend_from_slice(&be_bytes(order.len(), ref_size));
        out.extend_from_slice(&be_bytes(1, ref_size));
        out.extend_from_slice(&be_bytes(0, ref_size));
        out.extend_from_slice(&be_bytes(body.len(), offset_size));
        out.extend_from_slice(&be_bytes(0, ref_size));
        out.extend_from_slice(&body);
        out
    }
}

fn post_order<'a>(cell: &'a Cell, seen: &mut HashSet<[u8; 32]>, order: &mut Vec<&'a Cell>) {
    if !seen.insert(*cell.hash()) {
        return;
    }
    for child in cell.refs() {
        post_order(child, seen, order);
    }
    order.push(cell);
}

fn bytes_needed(value: usize) -> usize {
    let bits = (usize::BITS - value.leading_zeros()) as usize;
    bits.div_ceil(8).max(1)
}

fn be_bytes(value: usize, len: usize) -> Vec<u8> {
    let bytes = value.to_be_bytes();
    bytes[bytes.len() - len..].to_vec()
}
