//! Streaming decode of binary splat records.

use crate::math::{IDENTITY_ROTATION, normalize_rotation, sigmoid};
use crate::ply::{DecodeError, RecordLayout, SplatPlyHeader};
use crate::types::{Bounds, SplatAttributes};
use glam::{Vec3, Vec4};
use serde::{Deserialize, Serialize};
use std::io::{self, BufRead, BufReader, Read, Seek, SeekFrom};
use tracing::{debug, info};

/// Inputs at or above this size are rejected.
pub const MAX_INPUT_LEN: u64 = 2 * 1024 * 1024 * 1024;

/// What to do with a stored rotation of zero length.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ZeroRotationPolicy {
    /// Substitute the identity rotation.
    #[default]
    Identity,
    /// Fail the decode with [`DecodeError::DegenerateRotation`].
    Reject,
}

/// Reject inputs too large to be addressed as a single record array.
pub fn check_input_len(input_len: u64) -> Result<(), DecodeError> {
    if input_len >= MAX_INPUT_LEN {
        return Err(DecodeError::FileTooLarge { size: input_len });
    }
    Ok(())
}

/// Single-pass decoder for binary Gaussian splat PLY files.
///
/// A decode scans the header, validates the layout and then reads one fixed
/// size record per vertex. Any failure aborts the whole run.
///
/// ```ignore
/// let file = std::fs::File::open("scene.ply")?;
/// let attributes = SplatPlyDecoder::new()
///     .with_progress(|p| println!("{:.0}%", p * 100.0))
///     .decode(file)?;
/// ```
pub struct SplatPlyDecoder<'a> {
    zero_rotation: ZeroRotationPolicy,
    progress: Option<Box<dyn FnMut(f32) + 'a>>,
}

impl<'a> SplatPlyDecoder<'a> {
    pub fn new() -> Self {
        Self {
            zero_rotation: ZeroRotationPolicy::default(),
            progress: None,
        }
    }

    /// Set the policy for zero-length rotations.
    pub fn with_zero_rotation(mut self, policy: ZeroRotationPolicy) -> Self {
        self.zero_rotation = policy;
        self
    }

    /// Report the decoded fraction (0-1] after every record.
    pub fn with_progress(mut self, progress: impl FnMut(f32) + 'a) -> Self {
        self.progress = Some(Box::new(progress));
        self
    }

    /// Decode a seekable stream. The total stream length is used for the
    /// input size check.
    pub fn decode<R: Read + Seek>(
        &mut self,
        mut reader: R,
    ) -> Result<SplatAttributes, DecodeError> {
        let input_len = stream_len(&mut reader)?;
        self.decode_sized(BufReader::new(reader), input_len)
    }

    /// Decode a buffered stream whose total size is already known.
    #[tracing::instrument(skip_all, fields(input_len = input_len))]
    pub fn decode_sized<R: BufRead>(
        &mut self,
        mut reader: R,
        input_len: u64,
    ) -> Result<SplatAttributes, DecodeError> {
        let header = SplatPlyHeader::read(&mut reader)?;
        let layout = header.layout()?;
        check_input_len(input_len)?;
        layout.check_extents()?;

        debug!(
            "Record layout: {} properties, {} SH bands",
            layout.property_count, layout.sh_bands
        );

        let attributes = self.decode_records(&mut reader, &header, &layout, input_len)?;

        info!(
            "Decoded {} splats with {} SH bands",
            attributes.splat_count(),
            attributes.sh_bands
        );
        Ok(attributes)
    }

    fn decode_records<R: Read>(
        &mut self,
        reader: &mut R,
        header: &SplatPlyHeader,
        layout: &RecordLayout,
        input_len: u64,
    ) -> Result<SplatAttributes, DecodeError> {
        let vertex_count = header.vertex_count;
        let record_len = header.record_len();
        let sh_per_point = layout.sh_coeffs_per_point;

        // Reserve no more than the remaining input can actually hold.
        let body_len = input_len.saturating_sub(header.header_len);
        let capacity = (vertex_count as u64).min(body_len / record_len.max(1) as u64) as usize;

        let mut positions = Vec::with_capacity(capacity);
        let mut colors = Vec::with_capacity(capacity);
        let mut sh_coefficients = Vec::with_capacity(capacity * sh_per_point);
        let mut scales = Vec::with_capacity(capacity);
        let mut rotations = Vec::with_capacity(capacity);
        let mut bounds = Bounds::default();

        let mut record = vec![0.0f32; layout.property_count];
        for index in 0..vertex_count {
            let bytes: &mut [u8] = bytemuck::cast_slice_mut(&mut record);
            let read = read_record(reader, bytes)?;
            if read != record_len {
                return Err(DecodeError::TruncatedRecord {
                    index,
                    read,
                    expected: record_len,
                });
            }
            for value in record.iter_mut() {
                *value = f32::from_bits(u32::from_le(value.to_bits()));
            }
            let r = record.as_slice();

            let position = Vec3::from_slice(&r[layout.position..]);
            positions.push(position);

            let c = layout.color;
            colors.push(Vec4::new(r[c], r[c + 1], r[c + 2], sigmoid(r[layout.opacity])));

            if let Some(sh) = layout.sh {
                let k = sh_per_point;
                for j in 0..k {
                    sh_coefficients.push(Vec3::new(r[sh + j], r[sh + j + k], r[sh + j + 2 * k]));
                }
            }

            let s = layout.scale;
            scales.push(Vec3::new(r[s].exp(), r[s + 1].exp(), r[s + 2].exp()));

            let rotation = Vec4::from_slice(&r[layout.rotation..]);
            rotations.push(match normalize_rotation(rotation) {
                Some(rotation) => rotation,
                None => match self.zero_rotation {
                    ZeroRotationPolicy::Identity => IDENTITY_ROTATION,
                    ZeroRotationPolicy::Reject => {
                        return Err(DecodeError::DegenerateRotation { index });
                    }
                },
            });

            if index == 0 {
                bounds = Bounds::from_point(position);
            } else {
                bounds.encapsulate(position);
            }

            if let Some(progress) = self.progress.as_mut() {
                progress((index + 1) as f32 / vertex_count as f32);
            }
        }

        Ok(SplatAttributes {
            positions,
            colors,
            sh_coefficients,
            scales,
            rotations,
            bounds,
            sh_bands: layout.sh_bands,
        })
    }
}

impl Default for SplatPlyDecoder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

/// Fill `buf` from `reader`, returning how many bytes were available.
fn read_record<R: Read>(reader: &mut R, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == io::ErrorKind::Interrupted => continue,
            Err(e) => return Err(e),
        }
    }
    Ok(filled)
}

fn stream_len<S: Seek>(stream: &mut S) -> io::Result<u64> {
    let position = stream.stream_position()?;
    let len = stream.seek(SeekFrom::End(0))?;
    if position != len {
        stream.seek(SeekFrom::Start(position))?;
    }
    Ok(len)
}
