/// Custom error codes returned by the recurring-payments program as `Custom(code)`.
#[derive(Clone, Copy, Debug, Eq, PartialEq, strum_macros::FromRepr)]
#[cfg_attr(test, derive(strum_macros::EnumIter))]
#[repr(u8)]
pub enum RecurringPaymentsError {
    InvalidInstruction,
    InvalidMaxAmount,
    InvalidSubscriptionTimeframe,
    InvalidProgramAddress,
    IncorrectTokenProgramId,
    ExpectedAccount,
}

impl RecurringPaymentsError {
    /// Decodes a `Custom(code)` instruction error. Codes above `u8::MAX` are never program errors.
    pub fn from_custom_code(code: u32) -> Option<Self> {
        u8::try_from(code).ok().and_then(Self::from_repr)
    }
}

impl From<RecurringPaymentsError> for &'static str {
    fn from(value: RecurringPaymentsError) -> Self {
        match value {
            RecurringPaymentsError::InvalidInstruction => "Invalid instruction",
            RecurringPaymentsError::InvalidMaxAmount => "Invalid max amount",
            RecurringPaymentsError::InvalidSubscriptionTimeframe => {
                "Invalid subscription timeframe"
            }
            RecurringPaymentsError::InvalidProgramAddress => {
                "Invalid program address generated from nonce and key"
            }
            RecurringPaymentsError::IncorrectTokenProgramId => {
                "The provided token program does not match the expected token program"
            }
            RecurringPaymentsError::ExpectedAccount => {
                "Deserialized account is not an SPL Token account"
            }
        }
    }
}

impl core::fmt::Display for RecurringPaymentsError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = (*self).into();
        write!(f, "{self:?}: {msg}")
    }
}

impl std::error::Error for RecurringPaymentsError {}

/// An instruction argument that can't be packed into its fixed-width field.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
#[repr(u8)]
pub enum EncodingError {
    SubscriptionTimeframeOutOfRange,
    MaxAmountOutOfRange,
    InvalidInstructionTag,
    InvalidDataLength,
}

impl From<EncodingError> for &'static str {
    fn from(value: EncodingError) -> Self {
        match value {
            EncodingError::SubscriptionTimeframeOutOfRange => {
                "Subscription timeframe doesn't fit in a u64"
            }
            EncodingError::MaxAmountOutOfRange => "Max amount doesn't fit in a u64",
            EncodingError::InvalidInstructionTag => "Invalid instruction tag",
            EncodingError::InvalidDataLength => "Instruction data has the wrong length",
        }
    }
}

impl core::fmt::Display for EncodingError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let msg: &'static str = (*self).into();
        f.write_str(msg)
    }
}

impl std::error::Error for EncodingError {}

pub type EncodingResult<T> = Result<T, EncodingError>;
