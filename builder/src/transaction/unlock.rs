//! Unlock-block assembly.
//!
//! One unlock block per input, same order as the inputs. The first input
//! owned by an address gets a real signature; every later input owned by
//! the same address gets a reference to that first position instead of a
//! second signature.
//!
//! ```text
//! inputs:   A(x)        B(y)        C(x)      D(x)
//! blocks:   Sig(x)      Sig(y)      Ref(0)    Ref(0)
//! ```
//!
//! References always point at a signature block, never at another
//! reference, because positions are only recorded when a signature is
//! emitted.

use std::collections::HashMap;

use tracing::debug;

use super::signer::AddressSigner;
use super::types::{OutputId, UnlockBlock, UtxoInput};
use crate::address::Address;
use crate::error::BuilderError;
use crate::transaction::essence::EncodingError;

/// Builds the unlock blocks for `inputs`, signing `message` once per
/// distinct owning address.
///
/// Aborts on the first signer failure; no partial result is returned.
pub fn assemble_unlock_blocks<S>(
    inputs: &[UtxoInput],
    owners: &HashMap<OutputId, Address>,
    message: &[u8],
    signer: &S,
) -> Result<Vec<UnlockBlock>, BuilderError>
where
    S: AddressSigner + ?Sized,
{
    let mut signature_positions: HashMap<String, u16> = HashMap::new();
    let mut unlock_blocks = Vec::with_capacity(inputs.len());

    for (position, input) in inputs.iter().enumerate() {
        let id = input.id();
        let address = owners
            .get(&id)
            .ok_or(BuilderError::UnknownInputOwner(id))?;
        let identity = address.identity();

        if let Some(&reference) = signature_positions.get(&identity) {
            debug!(position, reference, "input already signed, referencing");
            unlock_blocks.push(UnlockBlock::reference(reference));
            continue;
        }

        let reference = u16::try_from(position).map_err(|_| EncodingError::LengthOverflow {
            field: "unlock blocks",
            len: position,
        })?;
        let signature = signer.sign(address, message)?;
        debug!(position, address = %address, "signed input");

        unlock_blocks.push(UnlockBlock::signature(signature));
        signature_positions.insert(identity, reference);
    }

    Ok(unlock_blocks)
}
