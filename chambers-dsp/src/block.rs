//! Borrowed audio buffers handed to `Effect::process`

/// One block of audio, processed in place
///
/// `Interleaved` uses the channel count given to `prepare()`
/// (L,R,L,R,... for stereo). `Planar` carries one slice per channel;
/// `right == None` means mono.
pub enum AudioBlock<'a> {
    Interleaved(&'a mut [f32]),
    Planar {
        left: &'a mut [f32],
        right: Option<&'a mut [f32]>,
    },
}

impl<'a> AudioBlock<'a> {
    /// Stereo planar block
    pub fn stereo(left: &'a mut [f32], right: &'a mut [f32]) -> Self {
        AudioBlock::Planar {
            left,
            right: Some(right),
        }
    }

    /// Mono planar block
    pub fn mono(samples: &'a mut [f32]) -> Self {
        AudioBlock::Planar {
            left: samples,
            right: None,
        }
    }
}
