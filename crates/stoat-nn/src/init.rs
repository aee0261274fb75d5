// nn::init — Host-side parameter initialization
//
// Fills a descriptor's host buffer with draws from a standard normal
// distribution, using a generator seeded by the caller. Deterministic:
// the same seed over the same shape and dtype reproduces the buffer
// bit-for-bit within this implementation (no cross-implementation
// parity is promised — the distribution transform is rand_distr's).
//
// Two deliberate failure modes, checked before anything is written:
//
//   - the descriptor's storage must be host-resident (a device-resident
//     parameter has nothing to fill here; the transfer layer uploads
//     host buffers later)
//   - the dtype must be a float; a normal draw over integer storage has
//     no numeric meaning and is refused outright

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use rand_distr::StandardNormal;

use stoat_core::tensor::{HostData, TensorDesc};
use stoat_core::{DType, Error, Result};

/// Fill `desc`'s host storage with independent standard-normal draws,
/// written in linear storage order, exactly `elem_count` of them.
///
/// The distribution is parameterized to the storage width: f32 buffers
/// get f32 draws, f64 buffers get f64 draws.
pub fn normal_seeded(desc: &mut TensorDesc, seed: u64) -> Result<()> {
    if !desc.is_on_host() {
        return Err(Error::NotOnHost {
            name: desc.name().to_string(),
        });
    }

    let mut rng = StdRng::seed_from_u64(seed);
    match desc.host_data_mut()? {
        HostData::F32(buf) => {
            for v in buf.iter_mut() {
                *v = rng.sample::<f32, _>(StandardNormal);
            }
        }
        HostData::F64(buf) => {
            for v in buf.iter_mut() {
                *v = rng.sample::<f64, _>(StandardNormal);
            }
        }
        HostData::I32(_) => {
            return Err(Error::UnsupportedInit { dtype: DType::I32 });
        }
    }
    Ok(())
}
