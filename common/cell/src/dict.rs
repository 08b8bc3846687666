use num_bigint::BigUint;

use crate::{builder::bit_length, CellBuilder, CellError, CellRef, CellResult, CellSlice};

/// Fixed key width dictionary stored as a binary prefix tree of cells.
///
/// Every node starts with a label (the common key prefix of its subtree).
/// Leaves carry the value after the label; forks carry two references for
/// the `0` and `1` continuations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dictionary {
    root: Option<CellRef>,
    key_len: usize,
}

impl Dictionary {
    pub fn new(root: Option<CellRef>, key_len: usize) -> Self {
        Dictionary { root, key_len }
    }

    pub fn empty(key_len: usize) -> Self {
        Self::new(None, key_len)
    }

    /// Treats `root` as the top node of a non-empty dictionary.
    pub fn from_root(root: CellRef, key_len: usize) -> Self {
        Self::new(Some(root), key_len)
    }

    pub fn root(&self) -> Option<&CellRef> {
        self.root.as_ref()
    }

    pub fn key_len(&self) -> usize {
        self.key_len
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    fn key_bits(&self, key: &BigUint) -> CellResult<Vec<bool>> {
        if key.bits() > self.key_len as u64 {
            return Err(CellError::KeyTooWide(self.key_len));
        }
        Ok((0..self.key_len as u64).rev().map(|i| key.bit(i)).collect())
    }

    /// Returns the value slice stored under `key`.
    pub fn lookup(&self, key: &BigUint) -> CellResult<Option<CellSlice>> {
        let Some(mut node) = self.root.clone() else {
            return Ok(None);
        };
        let bits = self.key_bits(key)?;
        let mut rest = bits.as_slice();

        loop {
            let mut slice = CellSlice::new(node);
            let label = load_label(&mut slice, rest.len())?;
            if !rest.starts_with(&label) {
                return Ok(None);
            }
            rest = &rest[label.len()..];
            let Some((&branch, tail)) = rest.split_first() else {
                return Ok(Some(slice));
            };
            let left = slice.load_ref()?;
            let right = slice.load_ref()?;
            node = if branch { right } else { left };
            rest = tail;
        }
    }

    /// All entries in ascending key order.
    pub fn load_all(&self) -> CellResult<Vec<(BigUint, CellSlice)>> {
        let mut out = Vec::new();
        if let Some(root) = &self.root {
            let mut prefix = Vec::with_capacity(self.key_len);
            collect(root.clone(), self.key_len, &mut prefix, &mut out)?;
        }
        Ok(out)
    }

    /// Builds a dictionary from `(key, value)` pairs. Later duplicates win.
    pub fn from_entries<I>(key_len: usize, entries: I) -> CellResult<Self>
    where
        I: IntoIterator<Item = (BigUint, CellBuilder)>,
    {
        let empty = Self::empty(key_len);
        let mut sorted = Vec::new();
        for (key, value) in entries {
            sorted.push((empty.key_bits(&key)?, value));
        }
        sorted.sort_by(|a, b| a.0.cmp(&b.0));
        sorted.reverse();
        sorted.dedup_by(|a, b| a.0 == b.0);
        sorted.reverse();

        if sorted.is_empty() {
            return Ok(empty);
        }
        let root = build_node(&sorted, key_len)?;
        Ok(Self::from_root(root, key_len))
    }
}

fn collect(
    node: CellRef,
    remaining: usize,
    prefix: &mut Vec<bool>,
    out: &mut Vec<(BigUint, CellSlice)>,
) -> CellResult<()> {
    let mut slice = CellSlice::new(node);
    let label = load_label(&mut slice, remaining)?;
    let depth = prefix.len();
    prefix.extend_from_slice(&label);
    let remaining = remaining - label.len();

    if remaining == 0 {
        let key = prefix
            .iter()
            .fold(BigUint::default(), |acc, &bit| (acc << 1u8) + u8::from(bit));
        out.push((key, slice));
    } else {
        let left = slice.load_ref()?;
        let right = slice.load_ref()?;
        for (bit, child) in [(false, left), (true, right)] {
            prefix.push(bit);
            collect(child, remaining - 1, prefix, out)?;
            prefix.pop();
        }
    }
    prefix.truncate(depth);
    Ok(())
}

fn build_node(entries: &[(Vec<bool>, CellBuilder)], remaining: usize) -> CellResult<CellRef> {
    let mut builder = CellBuilder::new();
    if let [(key, value)] = entries {
        store_label(&mut builder, key, remaining)?;
        builder.store_builder(value)?;
        return builder.build_ref();
    }

    // entries are sorted, so the first and last keys bound the common prefix
    let first = &entries[0].0;
    let last = &entries[entries.len() - 1].0;
    let common = first.iter().zip(last).take_while(|(a, b)| a == b).count();
    store_label(&mut builder, &first[..common], remaining)?;

    let split = entries.partition_point(|(key, _)| !key[common]);
    let strip = |side: &[(Vec<bool>, CellBuilder)]| -> Vec<(Vec<bool>, CellBuilder)> {
        side.iter()
            .map(|(key, value)| (key[common + 1..].to_vec(), value.clone()))
            .collect()
    };
    let child_len = remaining - common - 1;
    let left = build_node(&strip(&entries[..split]), child_len)?;
    let right = build_node(&strip(&entries[split..]), child_len)?;
    builder.store_ref(left)?.store_ref(right)?;
    builder.build_ref()
}

fn load_label(slice: &mut CellSlice, max_len: usize) -> CellResult<Vec<bool>> {
    let label = if !slice.load_bit()? {
        // hml_short: unary length
        let mut len = 0;
        while slice.load_bit()? {
            len += 1;
        }
        if len > max_len {
            return Err(CellError::InvalidLabel);
        }
        read_bits(slice, len)?
    } else if !slice.load_bit()? {
        // hml_long
        let len = slice.load_uint(bit_length(max_len))? as usize;
        if len > max_len {
            return Err(CellError::InvalidLabel);
        }
        read_bits(slice, len)?
    } else {
        // hml_same
        let bit = slice.load_bit()?;
        let len = slice.load_uint(bit_length(max_len))? as usize;
        if len > max_len {
            return Err(CellError::InvalidLabel);
        }
        vec![bit; len]
    };
    Ok(label)
}

fn read_bits(slice: &mut CellSlice, len: usize) -> CellResult<Vec<bool>> {
    (0..len).map(|_| slice.load_bit()).collect()
}

fn store_label(builder: &mut CellBuilder, label: &[bool], max_len: usize) -> CellResult<()> {
    let len = label.len();
    let width = bit_length(max_len);
    let same = len > 1 && label.iter().all(|&bit| bit == label[0]);

    if len == 0 {
        builder.store_uint(0b00, 2)?;
    } else if same && width < 2 * len - 1 {
        builder
            .store_uint(0b11, 2)?
            .store_bit(label[0])?
            .store_uint(len as u64, width)?;
    } else if width < len {
        builder.store_uint(0b10, 2)?.store_uint(len as u64, width)?;
        for &bit in label {
            builder.store_bit(bit)?;
        }
    } else {
        builder.store_bit(false)?;
        for _ in 0..len {
            builder.store_bit(true)?;
        }
        builder.store_bit(false)?;
        for &bit in label {
            builder.store_bit(bit)?;
        }
    }
    Ok(())
}
