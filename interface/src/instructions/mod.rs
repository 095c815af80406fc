use crate::error::{
    EncodingError,
    EncodingResult,
};

pub mod create_subscription;
pub mod create_subscription_plan;

/// The length of every recurring-payments instruction: a one byte tag followed by two `u64`s.
pub const INSTRUCTION_DATA_LEN: usize = 17;

#[repr(u8)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum_macros::Display)]
#[cfg_attr(test, derive(strum_macros::FromRepr, strum_macros::EnumIter))]
pub enum InstructionTag {
    CreateSubscription,
    CreateSubscriptionPlan,
}

impl TryFrom<u8> for InstructionTag {
    type Error = EncodingError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(Self::CreateSubscription),
            1 => Ok(Self::CreateSubscriptionPlan),
            _ => Err(EncodingError::InvalidInstructionTag),
        }
    }
}

/// Narrows an instruction argument to a `u64`, mapping any failure to `err`.
#[inline(always)]
pub(crate) fn narrow_u64<T: TryInto<u64>>(value: T, err: EncodingError) -> EncodingResult<u64> {
    value.try_into().map_err(|_| err)
}

/// Checks the length and leading tag byte of packed instruction data.
pub(crate) fn check_tagged(data: &[u8], expected: InstructionTag) -> EncodingResult<()> {
    let (&tag, _) = data
        .split_first()
        .ok_or(EncodingError::InvalidDataLength)?;
    if InstructionTag::try_from(tag)? != expected {
        return Err(EncodingError::InvalidInstructionTag);
    }
    if data.len() != INSTRUCTION_DATA_LEN {
        return Err(EncodingError::InvalidDataLength);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use strum::IntoEnumIterator;

    use super::*;

    #[test]
    fn test_instruction_tag_from_u8_exhaustive() {
        for variant in InstructionTag::iter() {
            let variant_u8 = variant as u8;
            assert_eq!(
                InstructionTag::from_repr(variant_u8).unwrap(),
                InstructionTag::try_from(variant_u8).unwrap(),
            );
            assert_eq!(InstructionTag::try_from(variant_u8).unwrap(), variant);
        }
        assert_eq!(
            InstructionTag::try_from(2),
            Err(EncodingError::InvalidInstructionTag)
        );
    }

    #[test]
    fn wire_tags_are_fixed() {
        assert_eq!(InstructionTag::CreateSubscription as u8, 0);
        assert_eq!(InstructionTag::CreateSubscriptionPlan as u8, 1);
    }

    #[test]
    fn narrowing_rejects_wide_values() {
        let err = EncodingError::MaxAmountOutOfRange;
        assert_eq!(narrow_u64(u64::MAX as u128, err), Ok(u64::MAX));
        assert_eq!(narrow_u64(u64::MAX as u128 + 1, err), Err(err));
        assert_eq!(narrow_u64(-1i64, err), Err(err));
    }

    #[test]
    fn check_tagged_rejects_bad_input() {
        let mut data = [0u8; INSTRUCTION_DATA_LEN];
        assert_eq!(check_tagged(&data, InstructionTag::CreateSubscription), Ok(()));
        assert_eq!(
            check_tagged(&data, InstructionTag::CreateSubscriptionPlan),
            Err(EncodingError::InvalidInstructionTag)
        );
        assert_eq!(
            check_tagged(&data[..16], InstructionTag::CreateSubscription),
            Err(EncodingError::InvalidDataLength)
        );
        assert_eq!(
            check_tagged(&[], InstructionTag::CreateSubscription),
            Err(EncodingError::InvalidDataLength)
        );
        data[0] = 9;
        assert_eq!(
            check_tagged(&data, InstructionTag::CreateSubscription),
            Err(EncodingError::InvalidInstructionTag)
        );
    }
}
