use alloy::primitives::{B256, U256};
use clap::ValueEnum;
use serde::Serialize;

use crate::{
    error::Error,
    utils::derive::{to_uint, to_word},
};

/// Where the first declared field of a packed word lives.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum FieldOrder {
    /// The first field occupies the most significant used bits and the last field the lowest
    /// bits. Bits above the sum of all widths are ignored.
    #[default]
    HighFirst,
    /// The first field occupies the lowest bits, which is how solc packs struct members and
    /// consecutive state variables.
    LowFirst,
}

/// The bit widths of the fields packed into one storage word.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackedLayout {
    widths: Vec<usize>,
    order: FieldOrder,
}

impl PackedLayout {
    /// Creates a [`FieldOrder::HighFirst`] layout. Fails if there are no fields, a field is
    /// zero bits wide, or the widths add up to more than 256 bits.
    pub fn new(widths: Vec<usize>) -> Result<Self, Error> {
        if widths.is_empty() {
            return Err(Error::InvalidLayoutError(
                "a packed layout needs at least one field".to_string(),
            ));
        }
        if let Some(position) = widths.iter().position(|w| *w == 0) {
            return Err(Error::InvalidLayoutError(format!("field {position} is zero bits wide")));
        }

        let total = widths.iter().try_fold(0usize, |acc, w| acc.checked_add(*w));
        match total {
            Some(total) if total <= 256 => Ok(Self { widths, order: FieldOrder::HighFirst }),
            _ => Err(Error::InvalidLayoutError(format!(
                "field widths {widths:?} do not fit in a 256-bit word"
            ))),
        }
    }

    /// Sets the field order.
    pub fn with_order(mut self, order: FieldOrder) -> Self {
        self.order = order;
        self
    }

    /// The field widths, in declaration order.
    pub fn widths(&self) -> &[usize] {
        &self.widths
    }

    /// The field order.
    pub fn order(&self) -> FieldOrder {
        self.order
    }

    /// The number of bits used by all fields together.
    pub fn total_bits(&self) -> usize {
        self.widths.iter().sum()
    }

    /// The distance of each field's lowest bit from bit 0, in declaration order.
    fn shifts(&self) -> Vec<usize> {
        let mut consumed = 0;
        match self.order {
            FieldOrder::HighFirst => {
                let total = self.total_bits();
                self.widths
                    .iter()
                    .map(|w| {
                        consumed += w;
                        total - consumed
                    })
                    .collect()
            }
            FieldOrder::LowFirst => self
                .widths
                .iter()
                .map(|w| {
                    let shift = consumed;
                    consumed += w;
                    shift
                })
                .collect(),
        }
    }

    /// Splits `word` into one integer per field.
    pub fn decode(&self, word: B256) -> Vec<U256> {
        let word = to_uint(word);
        self.widths.iter().zip(self.shifts()).map(|(w, shift)| (word >> shift) & mask(*w)).collect()
    }

    /// Packs `values` into a word. Fails if the number of values does not match the number of
    /// fields or a value does not fit its field.
    pub fn encode(&self, values: &[U256]) -> Result<B256, Error> {
        if values.len() != self.widths.len() {
            return Err(Error::InvalidLayoutError(format!(
                "expected {} values, got {}",
                self.widths.len(),
                values.len()
            )));
        }

        let mut word = U256::ZERO;
        for (position, ((value, w), shift)) in
            values.iter().zip(&self.widths).zip(self.shifts()).enumerate()
        {
            if *value > mask(*w) {
                return Err(Error::InvalidLayoutError(format!(
                    "value {value} does not fit in the {w}-bit field {position}"
                )));
            }
            word |= *value << shift;
        }

        Ok(to_word(word))
    }
}

/// The lowest `bits` bits set.
fn mask(bits: usize) -> U256 {
    if bits >= 256 {
        U256::MAX
    } else {
        (U256::from(1) << bits) - U256::from(1)
    }
}
