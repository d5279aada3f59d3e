/// Smallest number of bits able to index `n` distinct values.
pub fn ceil_log2(n: usize) -> u32 {
    if n <= 1 {
        0
    } else {
        usize::BITS - (n - 1).leading_zeros()
    }
}

/// A compact paletted array as stored in modern chunk records: a palette
/// of full values plus a bit-packed index array. Indices never span a
/// 64-bit word; each word holds `64 / bits` whole entries.
#[derive(Debug, Clone)]
pub struct PalettedData<T> {
    palette: Vec<T>,
    bits: u32,
    data: Vec<u64>,
    entries: usize,
}

impl<T> PalettedData<T> {
    /// A container where every entry is the same value. Matches the
    /// zero-bit encoding records use for uniform sections.
    pub fn single(value: T, entries: usize) -> Self {
        PalettedData {
            palette: vec![value],
            bits: 0,
            data: Vec::new(),
            entries,
        }
    }

    /// Builds a container from the decoded palette and packed index
    /// array. Recoverable quirks (ignorable data, wrong data length) are
    /// returned as messages alongside the best-effort container; an
    /// empty palette is unrecoverable.
    pub fn from_parts(
        palette: Vec<T>,
        data: Option<Vec<u64>>,
        entries: usize,
        min_bits: u32,
    ) -> Result<(Self, Vec<String>), String> {
        if palette.is_empty() {
            return Err("palette is empty".to_string());
        }

        let mut quirks = Vec::new();

        let bits = if palette.len() <= 1 {
            0
        } else {
            ceil_log2(palette.len()).max(min_bits)
        };

        let mut data = match data {
            Some(data) if bits == 0 => {
                if !data.is_empty() {
                    quirks.push("data array present for single-value palette".to_string());
                }
                Vec::new()
            }
            Some(data) => data,
            None if bits == 0 => Vec::new(),
            None => {
                quirks.push("missing data array, assuming first palette entry".to_string());
                Vec::new()
            }
        };

        if bits > 0 {
            let values_per_long = (64 / bits) as usize;
            let expected = entries.div_ceil(values_per_long);
            if data.len() != expected {
                quirks.push(format!(
                    "data array has {} longs, expected {}",
                    data.len(),
                    expected
                ));
                data.resize(expected, 0);
            }
        }

        Ok((
            PalettedData {
                palette,
                bits,
                data,
                entries,
            },
            quirks,
        ))
    }

    pub fn bits(&self) -> u32 {
        self.bits
    }

    pub fn len(&self) -> usize {
        self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries == 0
    }

    pub fn palette(&self) -> &[T] {
        &self.palette
    }

    /// Entry at the given flat index. An out-of-range palette index in
    /// the packed data resolves to the first palette entry.
    pub fn get(&self, index: usize) -> &T {
        debug_assert!(index < self.entries);

        if self.bits == 0 {
            return &self.palette[0];
        }

        let values_per_long = (64 / self.bits) as usize;
        let word = self.data[index / values_per_long];
        let shift = (index % values_per_long) as u32 * self.bits;
        let mask = (1u64 << self.bits) - 1;
        let palette_index = ((word >> shift) & mask) as usize;

        self.palette.get(palette_index).unwrap_or(&self.palette[0])
    }
}

/// Packs palette indices into the non-spanning word layout. The inverse
/// of `PalettedData::get`; used when synthesizing records.
pub fn pack_values(values: &[u64], bits: u32) -> Vec<u64> {
    if bits == 0 {
        return Vec::new();
    }

    let values_per_long = (64 / bits) as usize;
    let mut longs = vec![0u64; values.len().div_ceil(values_per_long)];
    let mask = (1u64 << bits) - 1;

    for (index, &value) in values.iter().enumerate() {
        let shift = (index % values_per_long) as u32 * bits;
        longs[index / values_per_long] |= (value & mask) << shift;
    }

    longs
}
